use crate::error::{Result, ScopeError};
use crate::sim::material::{Material, MaterialKey};

/// Inclusive range and keyboard step for one numeric control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    fn check(&self, name: &'static str, value: f64) -> Result<f64> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(ScopeError::InvalidParameter { name, value })
        }
    }
}

pub const RESISTANCE: Bounds = Bounds::new(1.0, 50.0, 1.0);
pub const VOLTAGE: Bounds = Bounds::new(1.0, 20.0, 1.0);
pub const FREQUENCY: Bounds = Bounds::new(1.0, 100.0, 1.0);
pub const GAIN: Bounds = Bounds::new(0.5, 2.0, 0.1);
pub const FREQUENCY_COARSE_STEP: f64 = 10.0;

/// Live excitation and display settings.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationParameters {
    material: MaterialKey,
    resistance: f64,
    voltage: f64,
    frequency: f64,
    gain_x: f64,
    gain_y: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            material: MaterialKey::SoftIron,
            resistance: 10.0,
            voltage: 5.0,
            frequency: 50.0,
            gain_x: 1.0,
            gain_y: 1.0,
        }
    }
}

impl SimulationParameters {
    pub fn material_key(&self) -> MaterialKey { self.material }
    pub fn material(&self) -> &'static Material { self.material.material() }
    pub fn resistance(&self) -> f64 { self.resistance }
    pub fn voltage(&self) -> f64 { self.voltage }
    pub fn frequency(&self) -> f64 { self.frequency }
    pub fn gain_x(&self) -> f64 { self.gain_x }
    pub fn gain_y(&self) -> f64 { self.gain_y }

    pub fn set_material(&mut self, key: MaterialKey) {
        self.material = key;
    }

    pub fn set_resistance(&mut self, value: f64) -> Result<()> {
        self.resistance = RESISTANCE.check("resistance", value)?;
        Ok(())
    }

    pub fn set_voltage(&mut self, value: f64) -> Result<()> {
        self.voltage = VOLTAGE.check("voltage", value)?;
        Ok(())
    }

    pub fn set_frequency(&mut self, value: f64) -> Result<()> {
        self.frequency = FREQUENCY.check("frequency", value)?;
        Ok(())
    }

    pub fn set_gain_x(&mut self, value: f64) -> Result<()> {
        self.gain_x = GAIN.check("gain_x", value)?;
        Ok(())
    }

    pub fn set_gain_y(&mut self, value: f64) -> Result<()> {
        self.gain_y = GAIN.check("gain_y", value)?;
        Ok(())
    }
}

/// One step from `current` in direction `dir`, clamped to `bounds`.
///
/// Gains are rounded to a tenth so repeated steps don't drift.
pub fn stepped(bounds: &Bounds, current: f64, dir: f64, step: f64) -> f64 {
    let raw = current + dir.signum() * step;
    let rounded = if step < 1.0 { (raw * 10.0).round() / 10.0 } else { raw.round() };
    bounds.clamp(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_bench_setup() {
        let p = SimulationParameters::default();
        assert_eq!(p.material_key(), MaterialKey::SoftIron);
        assert_eq!(p.resistance(), 10.0);
        assert_eq!(p.voltage(), 5.0);
        assert_eq!(p.frequency(), 50.0);
        assert_eq!(p.gain_x(), 1.0);
        assert_eq!(p.gain_y(), 1.0);
    }

    #[test]
    fn setters_accept_bounds_inclusive() {
        let mut p = SimulationParameters::default();
        p.set_resistance(1.0).unwrap();
        p.set_resistance(50.0).unwrap();
        p.set_voltage(20.0).unwrap();
        p.set_frequency(1.0).unwrap();
        p.set_gain_x(0.5).unwrap();
        p.set_gain_y(2.0).unwrap();
        assert_eq!(p.resistance(), 50.0);
        assert_eq!(p.gain_y(), 2.0);
    }

    #[test]
    fn zero_resistance_is_rejected_and_state_kept() {
        let mut p = SimulationParameters::default();
        let err = p.set_resistance(0.0).unwrap_err();
        assert!(matches!(err, ScopeError::InvalidParameter { name: "resistance", .. }));
        assert_eq!(p.resistance(), 10.0);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut p = SimulationParameters::default();
        assert!(p.set_voltage(f64::NAN).is_err());
        assert!(p.set_frequency(f64::INFINITY).is_err());
        assert!(p.set_gain_x(3.0).is_err());
    }

    #[test]
    fn stepping_clamps_at_the_edges() {
        assert_eq!(stepped(&RESISTANCE, 1.0, -1.0, RESISTANCE.step), 1.0);
        assert_eq!(stepped(&VOLTAGE, 20.0, 1.0, VOLTAGE.step), 20.0);
        assert_eq!(stepped(&FREQUENCY, 95.0, 1.0, FREQUENCY_COARSE_STEP), 100.0);
        assert_eq!(stepped(&FREQUENCY, 50.0, -1.0, FREQUENCY_COARSE_STEP), 40.0);
    }

    #[test]
    fn gain_steps_stay_on_tenths() {
        let mut g = 1.0;
        for _ in 0..7 {
            g = stepped(&GAIN, g, 1.0, GAIN.step);
        }
        assert_eq!(g, 1.7);
        for _ in 0..20 {
            g = stepped(&GAIN, g, -1.0, GAIN.step);
        }
        assert_eq!(g, 0.5);
    }
}
