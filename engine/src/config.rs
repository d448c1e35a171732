use bubble_shared::config::SimulationConfig;
use bubble_shared::decay::MAX_SIZE;

/// Visible area the bubbles live in (px)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Gesture thresholds for telling taps from drags
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TapThresholds {
    /// Max pointer travel for a tap (px, exclusive)
    pub max_distance: f64,
    /// Max duration of a tap on the bubble body (ms, exclusive)
    pub body_max_ms: i64,
    /// Max duration of a tap on the label (ms, exclusive)
    pub label_max_ms: i64,
}

impl Default for TapThresholds {
    fn default() -> Self {
        Self {
            max_distance: 10.0,
            body_max_ms: 300,
            label_max_ms: 500,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub tick_rate_hz: u32,
    pub viewport: Viewport,
    /// Thickness of each containment wall; must exceed the largest radius
    pub wall_thickness: f64,
    /// Distance from the viewport edge kept clear when spawning (px)
    pub spawn_margin: f64,
    pub rng_seed: u64,
    pub command_capacity: usize,
    pub event_capacity: usize,
    pub simulation: SimulationConfig,
    pub tap: TapThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            viewport: Viewport::new(1280.0, 800.0),
            wall_thickness: 100.0,
            spawn_margin: 100.0,
            rng_seed: 42,
            command_capacity: 256,
            event_capacity: 64,
            simulation: SimulationConfig::default(),
            tap: TapThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Fixed step length in seconds
    pub fn dt(&self) -> f64 {
        1.0 / self.tick_rate_hz as f64
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.tick_rate_hz == 0 {
            return Err("tick_rate_hz must be > 0".to_string());
        }
        if !self.viewport.is_valid() {
            return Err("viewport must have finite, positive dimensions".to_string());
        }
        if !self.wall_thickness.is_finite() || self.wall_thickness <= MAX_SIZE {
            return Err(format!("wall_thickness must be > {}", MAX_SIZE));
        }
        if !self.spawn_margin.is_finite() || self.spawn_margin < 0.0 {
            return Err("spawn_margin must be finite and >= 0".to_string());
        }
        if self.command_capacity == 0 || self.event_capacity == 0 {
            return Err("channel capacities must be > 0".to_string());
        }
        self.simulation.validate()?;
        // One step at full speed must not carry a body through a wall.
        if self.simulation.max_speed * self.dt() >= self.wall_thickness {
            return Err("max_speed per step must be < wall_thickness".to_string());
        }
        if !self.tap.max_distance.is_finite() || self.tap.max_distance <= 0.0 {
            return Err("tap max_distance must be finite and > 0".to_string());
        }
        if self.tap.body_max_ms <= 0 || self.tap.label_max_ms <= 0 {
            return Err("tap durations must be > 0".to_string());
        }
        Ok(())
    }
}
