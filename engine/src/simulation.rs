use crate::body::{BodyHandle, BodyPose};
use crate::config::{EngineConfig, Viewport};
use crate::world::World;
use bubble_shared::vec2::Vec2;

/// Lifecycle of the simulation
pub enum SimulationState {
    Uninitialized,
    Running(Box<World>),
}

/// Single owner of the bubble world.
///
/// Every operation on an uninitialized simulation is a silent no-op (or
/// `None`); callers retry on their next pass once [`Simulation::init`] ran.
pub struct Simulation {
    config: EngineConfig,
    state: SimulationState,
    generation: u64,
}

impl Simulation {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: SimulationState::Uninitialized,
            generation: 0,
        }
    }

    /// Build the world: walls around `viewport`, no bodies, no gravity.
    /// Calling this while running keeps the current world.
    pub fn init(&mut self, viewport: Viewport) {
        if self.is_running() {
            tracing::warn!("Simulation already running, ignoring init");
            return;
        }
        let seed = self.config.rng_seed.wrapping_add(self.generation);
        self.generation += 1;
        let world = World::new(
            viewport,
            self.config.wall_thickness,
            self.config.simulation,
            seed,
        );
        self.state = SimulationState::Running(Box::new(world));
        tracing::info!(
            "Simulation started ({}x{}, {} Hz)",
            viewport.width,
            viewport.height,
            self.config.tick_rate_hz
        );
    }

    /// Release all world state. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        if let SimulationState::Running(world) = &mut self.state {
            world.clear();
            tracing::info!("Simulation torn down after {} ticks", world.tick());
        }
        self.state = SimulationState::Uninitialized;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SimulationState::Running(_))
    }

    pub fn world(&self) -> Option<&World> {
        match &self.state {
            SimulationState::Running(world) => Some(&**world),
            SimulationState::Uninitialized => None,
        }
    }

    fn world_mut(&mut self) -> Option<&mut World> {
        match &mut self.state {
            SimulationState::Running(world) => Some(&mut **world),
            SimulationState::Uninitialized => None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn register(&mut self, id: &str, position: Vec2, radius: f64) -> Option<BodyHandle> {
        let Some(world) = self.world_mut() else {
            tracing::debug!("Register {} before init, ignored", id);
            return None;
        };
        Some(world.register(id, position, radius))
    }

    pub fn unregister(&mut self, id: &str) {
        if let Some(world) = self.world_mut() {
            world.unregister(id);
        }
    }

    pub fn position(&self, id: &str) -> Option<BodyPose> {
        self.world()?.position(id)
    }

    pub fn scale(&mut self, id: &str, factor: f64) -> bool {
        self.world_mut().is_some_and(|w| w.scale(id, factor))
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if !viewport.is_valid() {
            tracing::warn!("Ignoring resize to {}x{}", viewport.width, viewport.height);
            return;
        }
        if let Some(world) = self.world_mut() {
            world.resize(viewport);
            tracing::debug!("Walls moved to {}x{}", viewport.width, viewport.height);
        }
    }

    pub fn pointer_down(&mut self, pointer_id: u32, point: Vec2) -> Option<BodyHandle> {
        self.world_mut()?.begin_drag(pointer_id, point)
    }

    pub fn pointer_move(&mut self, pointer_id: u32, point: Vec2) {
        if let Some(world) = self.world_mut() {
            world.move_drag(pointer_id, point);
        }
    }

    pub fn pointer_up(&mut self, pointer_id: u32) {
        if let Some(world) = self.world_mut() {
            world.end_drag(pointer_id);
        }
    }

    /// Advance one fixed step. Returns false when not running.
    pub fn step(&mut self) -> bool {
        let dt = self.config.dt();
        match self.world_mut() {
            Some(world) => {
                world.step(dt);
                true
            }
            None => false,
        }
    }
}
