use ratatui::prelude::*;

use crate::render::DrawSurface;

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    bits: u8,
    color: Color,
}

const EMPTY: Cell = Cell { bits: 0, color: Color::Reset };

/// Terminal drawing surface with 2x4 braille dots per character cell.
pub struct BrailleSurface {
    width: usize,
    height: usize,
    cells: Vec<Vec<Cell>>,
}

impl BrailleSurface {
    /// A surface covering `width` x `height` terminal cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![EMPTY; width]; height],
        }
    }

    pub fn dot_width(&self) -> i64 {
        (self.width * 2) as i64
    }

    pub fn dot_height(&self) -> i64 {
        (self.height * 4) as i64
    }

    fn braille_bit(sub_x: usize, sub_y: usize) -> u8 {
        match (sub_x, sub_y) {
            (0, 0) => 0x01,
            (0, 1) => 0x02,
            (0, 2) => 0x04,
            (0, 3) => 0x40,
            (1, 0) => 0x08,
            (1, 1) => 0x10,
            (1, 2) => 0x20,
            (1, 3) => 0x80,
            _ => 0,
        }
    }

    fn line_cells(x0: i64, y0: i64, x1: i64, y1: i64) -> Vec<(i64, i64)> {
        let mut cells = Vec::new();
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut cx = x0;
        let mut cy = y0;
        loop {
            cells.push((cx, cy));
            if cx == x1 && cy == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; cx += sx; }
            if e2 <= dx { err += dx; cy += sy; }
        }
        cells
    }

    /// Clip a segment to the dot grid. Endpoints come back in bounds, or `None` if nothing is visible.
    fn clip_segment(&self, (x0, y0): (f64, f64), (x1, y1): (f64, f64)) -> Option<((i64, i64), (i64, i64))> {
        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            return None;
        }
        let (xmax, ymax) = ((self.dot_width() - 1) as f64, (self.dot_height() - 1) as f64);
        if xmax < 0.0 || ymax < 0.0 {
            return None;
        }
        let (dx, dy) = (x1 - x0, y1 - y0);
        let (mut t0, mut t1) = (0.0f64, 1.0f64);
        // Coordinate pinned to the edge that moved each end
        let (mut entry, mut exit) = ((None, None), (None, None));
        let edges = [
            (-dx, x0, (Some(0.0), None)),
            (dx, xmax - x0, (Some(xmax), None)),
            (-dy, y0, (None, Some(0.0))),
            (dy, ymax - y0, (None, Some(ymax))),
        ];
        for (p, q, edge) in edges {
            if p == 0.0 {
                if q < 0.0 { return None; }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 { return None; }
                if r > t0 { t0 = r; entry = edge; }
            } else {
                if r < t0 { return None; }
                if r < t1 { t1 = r; exit = edge; }
            }
        }
        let end = |t: f64, (px, py): (Option<f64>, Option<f64>)| -> Option<(i64, i64)> {
            let x = px.unwrap_or(x0 + t * dx);
            let y = py.unwrap_or(y0 + t * dy);
            if !(x.is_finite() && y.is_finite()) { return None; }
            Some((x.round().clamp(0.0, xmax) as i64, y.round().clamp(0.0, ymax) as i64))
        };
        Some((end(t0, entry)?, end(t1, exit)?))
    }

    fn set_dot(&mut self, bx: i64, by: i64, color: Color) {
        if bx < 0 || by < 0 || bx >= self.dot_width() || by >= self.dot_height() { return; }
        let cell = &mut self.cells[by as usize / 4][bx as usize / 2];
        cell.bits |= Self::braille_bit(bx as usize % 2, by as usize % 4);
        cell.color = color;
    }

    pub fn to_lines(&self, bg: Color) -> Vec<Line<'static>> {
        self.cells
            .iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .iter()
                    .map(|cell| {
                        if cell.bits == 0 {
                            Span::styled(" ", Style::default().bg(bg))
                        } else {
                            let ch = char::from_u32(0x2800 + cell.bits as u32).unwrap_or(' ');
                            Span::styled(String::from(ch), Style::default().fg(cell.color).bg(bg))
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

#[cfg(test)]
impl BrailleSurface {
    /// Whether the dot at braille coordinates `(bx, by)` is lit.
    pub fn is_set(&self, bx: i64, by: i64) -> bool {
        if bx < 0 || by < 0 || bx >= self.dot_width() || by >= self.dot_height() { return false; }
        let cell = self.cells[by as usize / 4][bx as usize / 2];
        cell.bits & Self::braille_bit(bx as usize % 2, by as usize % 4) != 0
    }

    /// Color of the character cell holding dot `(bx, by)`, if any dot in it is lit.
    pub fn color_at(&self, bx: i64, by: i64) -> Option<Color> {
        if bx < 0 || by < 0 || bx >= self.dot_width() || by >= self.dot_height() { return None; }
        let cell = self.cells[by as usize / 4][bx as usize / 2];
        (cell.bits != 0).then_some(cell.color)
    }

    pub fn lit_count(&self) -> usize {
        self.cells.iter().flatten().map(|c| c.bits.count_ones() as usize).sum()
    }
}

impl DrawSurface for BrailleSurface {
    fn size(&self) -> Option<(f64, f64)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some((self.dot_width() as f64, self.dot_height() as f64))
    }

    fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(EMPTY);
        }
    }

    fn dot(&mut self, (x, y): (f64, f64), color: Color) {
        if !(x.is_finite() && y.is_finite()) { return; }
        self.set_dot(x.round() as i64, y.round() as i64, color);
    }

    fn polyline(&mut self, points: &[(f64, f64)], closed: bool, color: Color) {
        let n = points.len();
        if n == 0 { return; }
        if n == 1 {
            self.dot(points[0], color);
            return;
        }
        let segments = if closed { n } else { n - 1 };
        for i in 0..segments {
            let Some(((x0, y0), (x1, y1))) = self.clip_segment(points[i], points[(i + 1) % n]) else {
                continue;
            };
            for (px, py) in Self::line_cells(x0, y0, x1, y1) {
                self.set_dot(px, py, color);
            }
        }
    }

    fn fill_circle(&mut self, (cx, cy): (f64, f64), radius: f64, color: Color) {
        if !(cx.is_finite() && cy.is_finite() && radius.is_finite()) { return; }
        let (w, h) = (self.dot_width(), self.dot_height());
        // A disc wider than the diagonal covers the whole grid
        let r = radius.max(0.0).round().min((w + h) as f64) as i64;
        let (cx, cy) = (cx.round(), cy.round());
        if cx < -(r as f64) || cy < -(r as f64) || cx > (w + r) as f64 || cy > (h + r) as f64 {
            return;
        }
        let (cx, cy) = (cx as i64, cy as i64);
        for y in (cy - r).max(0)..=(cy + r).min(h - 1) {
            for x in (cx - r).max(0)..=(cx + r).min(w - 1) {
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy <= r * r {
                    self.set_dot(x, y, color);
                }
            }
        }
    }
}
