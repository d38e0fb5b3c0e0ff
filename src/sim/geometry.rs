use std::f64::consts::TAU;

use crate::error::{Result, ScopeError};
use crate::sim::material::Material;

pub const LOOP_RESOLUTION: usize = 100;
/// Smallest field amplitude used for drawing, so a weak drive still shows a visible trace.
pub const H_DISPLAY_MIN: f64 = 0.2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One sample of the B-H curve. `physical` feeds the integrator, `display` feeds the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopPoint {
    pub physical: Point,
    pub display: Point,
}

/// Closed-form loop for one material at one drive level, evaluated at any phase `t`.
#[derive(Clone, Copy, Debug)]
pub struct LoopShape<'a> {
    material: &'a Material,
    h_amp: f64,
    h_disp_amp: f64,
    eff_coercivity: f64,
}

impl<'a> LoopShape<'a> {
    pub fn new(material: &'a Material, voltage: f64, resistance: f64) -> Result<Self> {
        if !voltage.is_finite() {
            return Err(ScopeError::InvalidParameter { name: "voltage", value: voltage });
        }
        if !resistance.is_finite() || resistance <= 0.0 {
            return Err(ScopeError::InvalidParameter { name: "resistance", value: resistance });
        }

        let h_amp = (voltage / resistance) * 2.0;
        let h_disp_amp = h_amp.max(H_DISPLAY_MIN);

        // Weak drive narrows the loop; 0/0 at zero drive collapses to no lag.
        let denom = h_amp + material.coercivity;
        let eff_coercivity = if denom == 0.0 { 0.0 } else { material.coercivity * h_amp / denom };

        Ok(Self { material, h_amp, h_disp_amp, eff_coercivity })
    }

    pub fn h_amp(&self) -> f64 {
        self.h_amp
    }

    pub fn eff_coercivity(&self) -> f64 {
        self.eff_coercivity
    }

    pub fn at(&self, t: f64) -> LoopPoint {
        let (sin_t, cos_t) = t.sin_cos();
        let h_phys = self.h_amp * sin_t;
        let h_disp = self.h_disp_amp * sin_t;

        let lag = self.eff_coercivity * cos_t;
        let b = self.material.saturation * ((h_phys - lag) / self.material.softness()).tanh();

        LoopPoint {
            physical: Point { x: h_phys, y: b },
            display: Point { x: h_disp, y: b },
        }
    }

    /// `n` samples with `t` evenly spaced over `[0, 2π)`.
    pub fn sample(&self, n: usize) -> Vec<LoopPoint> {
        (0..n).map(|i| self.at(TAU * i as f64 / n as f64)).collect()
    }
}

/// Generate one full loop of `resolution` points for the given drive.
pub fn generate_loop(
    material: &Material,
    voltage: f64,
    resistance: f64,
    resolution: usize,
) -> Result<Vec<LoopPoint>> {
    if resolution == 0 {
        return Err(ScopeError::InvalidParameter { name: "loop_resolution", value: 0.0 });
    }
    Ok(LoopShape::new(material, voltage, resistance)?.sample(resolution))
}
