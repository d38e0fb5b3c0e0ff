pub mod braille;

use log::trace;
use ratatui::style::Color;

use crate::sim::geometry::Point;
use crate::sim::Session;

pub const BEAM_COLOR: Color = Color::Rgb(242, 207, 42);
pub const MARKER_COLOR: Color = Color::Rgb(255, 255, 255);
pub const GRATICULE_COLOR: Color = Color::Rgb(40, 80, 60);

/// A 2D pixel target. Origin top-left, y grows downwards.
pub trait DrawSurface {
    /// Pixel dimensions, or `None` while the surface has not been laid out.
    fn size(&self) -> Option<(f64, f64)>;
    fn clear(&mut self);
    fn dot(&mut self, p: (f64, f64), color: Color);
    fn polyline(&mut self, points: &[(f64, f64)], closed: bool, color: Color);
    fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Color);
}

/// Draws the graticule, loop trace and beam marker for a session.
#[derive(Clone, Copy, Debug)]
pub struct LoopRenderer {
    /// Pixels per display unit at unit gain.
    pub base_scale: f64,
    pub marker_radius: f64,
}

impl LoopRenderer {
    pub fn new(base_scale: f64, marker_radius: f64) -> Self {
        Self { base_scale, marker_radius }
    }

    pub fn to_pixel(&self, p: Point, center: (f64, f64), gain_x: f64, gain_y: f64) -> (f64, f64) {
        (
            center.0 + p.x * self.base_scale * gain_x,
            center.1 - p.y * self.base_scale * gain_y,
        )
    }

    /// Paint one frame. Returns `false` without touching the surface if it has no area yet.
    pub fn render<S: DrawSurface>(&self, surface: &mut S, session: &Session) -> bool {
        let Some((w, h)) = surface.size().filter(|&(w, h)| w > 0.0 && h > 0.0) else {
            trace!("frame skipped: surface not laid out");
            return false;
        };
        let center = (w / 2.0, h / 2.0);

        surface.clear();
        self.draw_graticule(surface, w, h, center);

        // With the power off the screen keeps only its graticule
        if !session.is_on() {
            return true;
        }

        let params = session.parameters();
        let (gx, gy) = (params.gain_x(), params.gain_y());
        let trace: Vec<(f64, f64)> = session
            .loop_points()
            .iter()
            .map(|p| self.to_pixel(p.display, center, gx, gy))
            .collect();
        surface.polyline(&trace, true, BEAM_COLOR);

        if let Some(marker) = session.marker() {
            let at = self.to_pixel(marker.display, center, gx, gy);
            surface.fill_circle(at, self.marker_radius, MARKER_COLOR);
        }
        true
    }

    fn draw_graticule<S: DrawSurface>(&self, surface: &mut S, w: f64, h: f64, center: (f64, f64)) {
        // Dotted axes
        let mut x = 0.0;
        while x < w {
            surface.dot((x, center.1), GRATICULE_COLOR);
            x += 4.0;
        }
        let mut y = 0.0;
        while y < h {
            surface.dot((center.0, y), GRATICULE_COLOR);
            y += 4.0;
        }

        // Division ticks every half display unit
        let div = self.base_scale / 2.0;
        if div < 2.0 {
            return;
        }
        let mut k = 1.0;
        while k * div < w.max(h) / 2.0 {
            for sign in [-1.0, 1.0] {
                let tx = center.0 + sign * k * div;
                let ty = center.1 + sign * k * div;
                for d in [-1.0, 0.0, 1.0] {
                    surface.dot((tx, center.1 + d), GRATICULE_COLOR);
                    surface.dot((center.0 + d, ty), GRATICULE_COLOR);
                }
            }
            k += 1.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::braille::BrailleSurface;
    use crate::sim::geometry::LOOP_RESOLUTION;
    use crate::sim::params::SimulationParameters;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Recorder {
        size: Option<(f64, f64)>,
        clears: usize,
        polylines: Vec<(Vec<(f64, f64)>, bool, Color)>,
        circles: Vec<((f64, f64), f64, Color)>,
        dots: usize,
    }

    impl DrawSurface for Recorder {
        fn size(&self) -> Option<(f64, f64)> { self.size }
        fn clear(&mut self) { self.clears += 1; }
        fn dot(&mut self, _p: (f64, f64), _color: Color) { self.dots += 1; }
        fn polyline(&mut self, points: &[(f64, f64)], closed: bool, color: Color) {
            self.polylines.push((points.to_vec(), closed, color));
        }
        fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Color) {
            self.circles.push((center, radius, color));
        }
    }

    fn running_session() -> Session {
        let mut s = Session::new(SimulationParameters::default(), LOOP_RESOLUTION).unwrap();
        s.power_on();
        s.tick(0.0).unwrap();
        s
    }

    #[test]
    fn unsized_surface_is_left_alone() {
        let r = LoopRenderer::new(40.0, 2.0);
        let mut rec = Recorder::default();
        assert!(!r.render(&mut rec, &running_session()));
        rec.size = Some((0.0, 30.0));
        assert!(!r.render(&mut rec, &running_session()));
        assert_eq!(rec.clears, 0);
        assert_eq!(rec.dots, 0);
    }

    #[test]
    fn stopped_session_draws_graticule_only() {
        let r = LoopRenderer::new(40.0, 2.0);
        let mut rec = Recorder { size: Some((200.0, 100.0)), ..Recorder::default() };
        let s = Session::new(SimulationParameters::default(), LOOP_RESOLUTION).unwrap();
        assert!(r.render(&mut rec, &s));
        assert_eq!(rec.clears, 1);
        assert!(rec.dots > 0);
        assert!(rec.polylines.is_empty());
        assert!(rec.circles.is_empty());
    }

    #[test]
    fn trace_uses_display_coordinates_and_gain() {
        let r = LoopRenderer::new(40.0, 2.0);
        let mut rec = Recorder { size: Some((200.0, 100.0)), ..Recorder::default() };
        let mut s = running_session();
        s.set_gain_x(2.0).unwrap();
        s.set_gain_y(0.5).unwrap();
        r.render(&mut rec, &s);

        let (points, closed, color) = &rec.polylines[0];
        assert!(*closed);
        assert_eq!(*color, BEAM_COLOR);
        assert_eq!(points.len(), LOOP_RESOLUTION);
        for (px, lp) in points.iter().zip(s.loop_points()) {
            assert_relative_eq!(px.0, 100.0 + lp.display.x * 40.0 * 2.0);
            assert_relative_eq!(px.1, 50.0 - lp.display.y * 40.0 * 0.5);
        }
    }

    #[test]
    fn marker_sits_on_the_current_sample() {
        let r = LoopRenderer::new(40.0, 3.0);
        let mut rec = Recorder { size: Some((200.0, 100.0)), ..Recorder::default() };
        let mut s = running_session();
        s.tick(5.0).unwrap();
        r.render(&mut rec, &s);

        let (center, radius, color) = rec.circles[0];
        let expected = r.to_pixel(s.loop_points()[s.marker_index()].display, (100.0, 50.0), 1.0, 1.0);
        assert_eq!(center, expected);
        assert_eq!(radius, 3.0);
        assert_eq!(color, MARKER_COLOR);
    }

    #[test]
    fn braille_frame_shows_beam_when_running() {
        let r = LoopRenderer::new(20.0, 1.0);
        let s = running_session();
        let mut surface = BrailleSurface::new(40, 12);
        r.render(&mut surface, &s);
        let p = r.to_pixel(s.loop_points()[10].display, (40.0, 24.0), 1.0, 1.0);
        assert!(surface.is_set(p.0.round() as i64, p.1.round() as i64));

        let mut stopped = s.clone();
        stopped.power_off();
        let mut blank = BrailleSurface::new(40, 12);
        r.render(&mut blank, &stopped);
        assert!(blank.lit_count() < surface.lit_count());
    }

    #[test]
    fn extreme_scale_and_marker_stay_on_the_surface() {
        let s = running_session();
        let r = LoopRenderer::new(1e300, 1e10);
        let mut surface = BrailleSurface::new(40, 12);
        assert!(r.render(&mut surface, &s));
        assert!(surface.lit_count() <= 80 * 48);
        assert!(surface.lit_count() > 0);
    }
}
