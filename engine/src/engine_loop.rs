use crate::body::{BodyHandle, BodyPose};
use crate::bridge::{RenderBridge, WorldSnapshot};
use crate::config::{EngineConfig, Viewport};
use crate::gesture::InteractionController;
use crate::simulation::Simulation;
use crate::sync::EntitySync;
use bubble_shared::decay::now_millis;
use bubble_shared::entity::BubbleEntity;
use bubble_shared::protocol::{EngineEventMsg, PointerMsg};
use bubble_shared::vec2::vec2;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;

/// Keeps spawn positions independent of the world's velocity stream
const SYNC_SEED_SALT: u64 = 0x5eed_b0b1;

/// Commands into the engine loop. Applied between ticks, in order.
pub enum EngineCommand {
    Register {
        id: String,
        x: f64,
        y: f64,
        radius: f64,
        response: oneshot::Sender<Option<BodyHandle>>,
    },
    Unregister {
        id: String,
    },
    Scale {
        id: String,
        factor: f64,
    },
    /// Replace the entity list the loop keeps bodies in sync with
    SetEntities {
        entities: Vec<BubbleEntity>,
    },
    Resize {
        viewport: Viewport,
    },
    Pointer(PointerMsg),
    Shutdown,
}

/// Run the engine loop. Owns the simulation until shutdown.
///
/// `alive` is checked before every tick; once it reads false the loop stops
/// without stepping, even if a tick was already due.
pub async fn run_engine_loop(
    mut cmd_rx: mpsc::Receiver<EngineCommand>,
    bridge: RenderBridge,
    events_tx: broadcast::Sender<EngineEventMsg>,
    alive: Arc<AtomicBool>,
    config: EngineConfig,
) {
    let mut sim = Simulation::new(config.clone());
    let mut sync = EntitySync::new(config.spawn_margin, config.rng_seed ^ SYNC_SEED_SALT);
    let mut controller = InteractionController::new(config.tap);
    let mut entities: Vec<BubbleEntity> = Vec::new();

    let tick_duration = Duration::from_secs_f64(config.dt());
    let mut tick_interval = tokio::time::interval(tick_duration);
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    if alive.load(Ordering::Acquire) {
        sim.init(config.viewport);
    }

    loop {
        if !alive.load(Ordering::Acquire) {
            break;
        }

        tokio::select! {
            _ = tick_interval.tick() => {
                if !alive.load(Ordering::Acquire) {
                    break;
                }
                sync.reconcile(&mut sim, &entities, now_millis());
                if sim.step() {
                    if let Some(world) = sim.world() {
                        bridge.publish(WorldSnapshot::capture(world));
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break };
                match cmd {
                    EngineCommand::Register { id, x, y, radius, response } => {
                        let handle = sim.register(&id, vec2(x, y), radius);
                        let _ = response.send(handle);
                    }
                    EngineCommand::Unregister { id } => {
                        sim.unregister(&id);
                    }
                    EngineCommand::Scale { id, factor } => {
                        sim.scale(&id, factor);
                    }
                    EngineCommand::SetEntities { entities: next } => {
                        tracing::debug!("Entity list replaced ({} bubbles)", next.len());
                        entities = next;
                    }
                    EngineCommand::Resize { viewport } => {
                        sim.resize(viewport);
                    }
                    EngineCommand::Pointer(msg) => {
                        handle_pointer(&mut sim, &mut controller, &events_tx, msg);
                    }
                    EngineCommand::Shutdown => break,
                }
            }
        }
    }

    alive.store(false, Ordering::Release);
    sim.teardown();
    sync.reset();
    bridge.clear();
    tracing::info!("Engine loop ended");
}

fn handle_pointer(
    sim: &mut Simulation,
    controller: &mut InteractionController,
    events_tx: &broadcast::Sender<EngineEventMsg>,
    msg: PointerMsg,
) {
    match msg {
        PointerMsg::Down {
            pointer_id,
            x,
            y,
            at_ms,
            target,
        } => {
            controller.pointer_down(pointer_id, vec2(x, y), at_ms, target);
            sim.pointer_down(pointer_id, vec2(x, y));
        }
        PointerMsg::Move { pointer_id, x, y } => {
            sim.pointer_move(pointer_id, vec2(x, y));
        }
        PointerMsg::Up {
            pointer_id,
            x,
            y,
            at_ms,
        } => {
            sim.pointer_up(pointer_id);
            if let Some(event) = controller.pointer_up(pointer_id, vec2(x, y), at_ms) {
                tracing::debug!("Gesture: {:?}", event);
                let _ = events_tx.send(event);
            }
        }
        PointerMsg::Leave { pointer_id } => {
            controller.pointer_leave(pointer_id);
        }
    }
}

/// Front door to a running engine task.
///
/// All mutations go through the command channel; reads come from the latest
/// published snapshot and never block on the loop. Dropping the handle closes
/// the channel, which also ends the loop.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    snapshots: watch::Receiver<Arc<WorldSnapshot>>,
    events_tx: broadcast::Sender<EngineEventMsg>,
    alive: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl EngineHandle {
    /// Spawn the engine loop on the current tokio runtime.
    pub fn spawn(config: EngineConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>(config.command_capacity);
        let (events_tx, _) = broadcast::channel::<EngineEventMsg>(config.event_capacity);
        let bridge = RenderBridge::new();
        let snapshots = bridge.subscribe();
        let alive = Arc::new(AtomicBool::new(true));

        let loop_events = events_tx.clone();
        let loop_alive = alive.clone();
        let task = tokio::spawn(async move {
            run_engine_loop(cmd_rx, bridge, loop_events, loop_alive, config).await;
        });

        Self {
            cmd_tx,
            snapshots,
            events_tx,
            alive,
            task,
        }
    }

    async fn send(&self, cmd: EngineCommand) -> bool {
        if self.cmd_tx.send(cmd).await.is_err() {
            tracing::debug!("Engine loop gone, command dropped");
            return false;
        }
        true
    }

    /// Register a body. `None` if the engine is not running.
    pub async fn register(&self, id: &str, x: f64, y: f64, radius: f64) -> Option<BodyHandle> {
        let (response, rx) = oneshot::channel();
        let cmd = EngineCommand::Register {
            id: id.to_string(),
            x,
            y,
            radius,
            response,
        };
        if !self.send(cmd).await {
            return None;
        }
        rx.await.ok().flatten()
    }

    pub async fn unregister(&self, id: &str) {
        self.send(EngineCommand::Unregister { id: id.to_string() })
            .await;
    }

    pub async fn scale(&self, id: &str, factor: f64) {
        self.send(EngineCommand::Scale {
            id: id.to_string(),
            factor,
        })
        .await;
    }

    pub async fn set_entities(&self, entities: Vec<BubbleEntity>) {
        self.send(EngineCommand::SetEntities { entities }).await;
    }

    pub async fn resize(&self, viewport: Viewport) {
        self.send(EngineCommand::Resize { viewport }).await;
    }

    pub async fn pointer(&self, msg: PointerMsg) {
        self.send(EngineCommand::Pointer(msg)).await;
    }

    /// Pose of `id` as of the last published tick.
    pub fn position(&self, id: &str) -> Option<BodyPose> {
        self.snapshots.borrow().position(id)
    }

    /// Latest snapshot
    pub fn snapshot(&self) -> Arc<WorldSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// New receiver, woken once per tick
    pub fn snapshots(&self) -> watch::Receiver<Arc<WorldSnapshot>> {
        self.snapshots.clone()
    }

    pub fn events(&self) -> broadcast::Receiver<EngineEventMsg> {
        self.events_tx.subscribe()
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Stop the loop. Idempotent; a tick already scheduled sees the cleared
    /// flag and does nothing.
    pub fn teardown(&self) {
        if self.alive.swap(false, Ordering::AcqRel) {
            // Best effort: the flag alone stops the loop if the queue is full.
            let _ = self.cmd_tx.try_send(EngineCommand::Shutdown);
            tracing::info!("Engine teardown requested");
        }
    }

    /// Tear down and wait for the loop task to finish.
    pub async fn join(self) {
        self.teardown();
        if let Err(e) = self.task.await {
            tracing::warn!("Engine task ended abnormally: {}", e);
        }
    }
}
