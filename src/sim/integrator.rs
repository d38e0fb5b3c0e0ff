use crate::sim::geometry::LoopPoint;

/// Normalization from raw shoelace area to the displayed area.
pub const AREA_DISPLAY_SCALE: f64 = 10.0;
pub const LOSS_SCALE: f64 = 0.01;

/// Enclosed area of the loop over its physical coordinates.
///
/// The sequence is treated as a closed polygon, the last point joining the first.
pub fn loop_area(points: &[LoopPoint]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let p1 = points[i].physical;
        let p2 = points[(i + 1) % n].physical;
        sum += p1.x * p2.y;
        sum -= p2.x * p1.y;
    }
    sum.abs() / 2.0
}

/// Hysteresis loss for a raw loop area at the given excitation frequency.
pub fn hysteresis_loss(area: f64, frequency: f64) -> f64 {
    (area * AREA_DISPLAY_SCALE) * frequency * LOSS_SCALE
}

/// Derived measurements for one loop at one frequency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopStats {
    /// Normalized area, `raw * AREA_DISPLAY_SCALE`.
    pub area: f64,
    pub loss: f64,
}

impl LoopStats {
    pub fn measure(points: &[LoopPoint], frequency: f64) -> Self {
        let raw = loop_area(points);
        Self {
            area: raw * AREA_DISPLAY_SCALE,
            loss: hysteresis_loss(raw, frequency),
        }
    }

    pub fn area_label(&self) -> String {
        format!("{:.2}", self.area)
    }

    pub fn loss_label(&self) -> String {
        format!("{:.2}", self.loss)
    }

    /// Loss as logged in the observation table, to four places.
    pub fn loss_reading_label(&self) -> String {
        format!("{:.4}", self.loss)
    }
}
