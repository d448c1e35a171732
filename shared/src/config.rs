/// Physics tuning for the bubble field.
///
/// Velocities are in px/s, friction and restitution are unitless. `air_friction`
/// is applied once per step as `v *= 1 - air_friction`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export, export_to = "../../web/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Bounciness of every contact (0 = dead stop, 1 = perfectly elastic)
    pub restitution: f64,
    /// Coulomb friction coefficient along the contact tangent
    pub friction: f64,
    /// Fraction of velocity lost per step
    pub air_friction: f64,
    /// Mass per unit area; only ratios matter
    pub density: f64,
    /// Spawn velocity is drawn per axis from [-initial_speed, initial_speed]
    pub initial_speed: f64,
    /// Hard cap on body speed (px/s)
    pub max_speed: f64,
    /// Fraction of the pointer gap closed per step by the drag spring
    pub drag_stiffness: f64,
    /// Fraction of body velocity removed per step while dragged
    pub drag_damping: f64,
    /// Penetration allowed before positional correction kicks in (px)
    pub penetration_slop: f64,
    /// Fraction of the remaining penetration corrected per step
    pub correction_percent: f64,
    /// When set, contact friction never spins a body
    pub lock_rotation: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.1,
            air_friction: 0.04,
            density: 0.001,
            initial_speed: 180.0, // ±3 px per step at 60 Hz
            max_speed: 3000.0,
            drag_stiffness: 0.2,
            drag_damping: 0.1,
            penetration_slop: 0.05,
            correction_percent: 0.8,
            lock_rotation: true,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.restitution.is_finite() || !(0.0..=1.0).contains(&self.restitution) {
            return Err("restitution must be in [0, 1]".to_string());
        }
        if !self.friction.is_finite() || self.friction < 0.0 {
            return Err("friction must be finite and >= 0".to_string());
        }
        if !self.air_friction.is_finite() || !(0.0..1.0).contains(&self.air_friction) {
            return Err("air_friction must be in [0, 1)".to_string());
        }
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err("density must be finite and > 0".to_string());
        }
        if !self.initial_speed.is_finite() || self.initial_speed < 0.0 {
            return Err("initial_speed must be finite and >= 0".to_string());
        }
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err("max_speed must be finite and > 0".to_string());
        }
        if !self.drag_stiffness.is_finite()
            || self.drag_stiffness <= 0.0
            || self.drag_stiffness > 1.0
        {
            return Err("drag_stiffness must be in (0, 1]".to_string());
        }
        if !self.drag_damping.is_finite() || !(0.0..=1.0).contains(&self.drag_damping) {
            return Err("drag_damping must be in [0, 1]".to_string());
        }
        if !self.penetration_slop.is_finite() || self.penetration_slop < 0.0 {
            return Err("penetration_slop must be finite and >= 0".to_string());
        }
        if !self.correction_percent.is_finite()
            || !(0.0..=1.0).contains(&self.correction_percent)
        {
            return Err("correction_percent must be in [0, 1]".to_string());
        }
        Ok(())
    }
}
