use std::f64::consts::TAU;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::render::braille::BrailleSurface;
use crate::sim::geometry::LoopShape;
use crate::sim::material::MaterialKey;
use crate::sim::params::{Bounds, FREQUENCY, GAIN, RESISTANCE, VOLTAGE};

const SCREEN_BG: Color = Color::Rgb(5, 12, 8);
const LABEL: Color = Color::Rgb(140, 140, 160);
const DIM: Color = Color::Rgb(80, 80, 100);

pub fn render_scope(frame: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),    // Scope screen
            Constraint::Length(34), // Controls + stats
        ])
        .split(area);

    render_screen(frame, cols[0], app);
    render_panel(frame, cols[1], app);
}

fn render_screen(frame: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 120, 90)))
        .title(" Oscilloscope ")
        .title_style(Style::default().fg(Color::Rgb(120, 220, 160)).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(SCREEN_BG));

    // Beam readout along the bottom edge
    if let (true, Some(p)) = (session.is_on(), session.marker()) {
        block = block.title_bottom(Line::from(vec![
            Span::styled(format!(" H {:+.3} ", p.physical.x), Style::default().fg(Color::Rgb(242, 207, 42))),
            Span::styled(format!(" B {:+.3} ", p.physical.y), Style::default().fg(Color::Rgb(242, 207, 42))),
            Span::styled(
                format!(" φ {:>3.0}° ", session.phase().rem_euclid(TAU).to_degrees()),
                Style::default().fg(DIM),
            ),
        ]));
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut surface = BrailleSurface::new(inner.width as usize, inner.height as usize);
    if app.renderer.render(&mut surface, session) {
        frame.render_widget(Paragraph::new(surface.to_lines(SCREEN_BG)), inner);
    }
}

fn slider(value: f64, bounds: &Bounds, width: usize) -> String {
    let frac = ((value - bounds.min) / (bounds.max - bounds.min)).clamp(0.0, 1.0);
    let filled = (frac * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn control_line(name: &str, value: String, fill: String, color: Color) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(format!("  {:<12}", name), Style::default().fg(LABEL)),
            Span::styled(value, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("  ", Style::default()),
            Span::styled(fill, Style::default().fg(color)),
        ]),
    ]
}

fn render_panel(frame: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let params = session.parameters();
    let mat = params.material();
    let (r, g, b) = mat.color;
    let mat_color = Color::Rgb(r, g, b);
    let bar_w = 26;

    let mut lines: Vec<Line> = vec![Line::from("")];

    // ── Specimen ───────────────────────────────────────────────────────
    let picker: Vec<Span> = MaterialKey::all()
        .iter()
        .map(|k| {
            if *k == params.material_key() {
                Span::styled("●", Style::default().fg(mat_color))
            } else {
                Span::styled("○", Style::default().fg(DIM))
            }
        })
        .collect();
    lines.push(Line::from(vec![
        Span::styled("  Specimen    ", Style::default().fg(LABEL)),
        Span::styled(mat.name, Style::default().fg(mat_color).add_modifier(Modifier::BOLD)),
    ]));
    let mut picker_line = vec![Span::styled("              ", Style::default())];
    picker_line.extend(picker);
    lines.push(Line::from(picker_line));
    lines.push(Line::from(vec![
        Span::styled(
            format!("  Hc {:.2}  Br {:.2}  Bs {:.2}", mat.coercivity, mat.retentivity, mat.saturation),
            Style::default().fg(DIM),
        ),
    ]));
    lines.push(Line::from(""));

    // ── Drive ──────────────────────────────────────────────────────────
    lines.extend(control_line(
        "Voltage",
        format!("{:.0} V", params.voltage()),
        slider(params.voltage(), &VOLTAGE, bar_w),
        Color::Rgb(242, 207, 42),
    ));
    lines.extend(control_line(
        "Resistance",
        format!("{:.0} Ω", params.resistance()),
        slider(params.resistance(), &RESISTANCE, bar_w),
        Color::Rgb(100, 180, 255),
    ));
    lines.extend(control_line(
        "Frequency",
        format!("{:.0} Hz", params.frequency()),
        slider(params.frequency(), &FREQUENCY, bar_w),
        Color::Rgb(200, 120, 255),
    ));
    if let Ok(shape) = LoopShape::new(mat, params.voltage(), params.resistance()) {
        lines.push(Line::from(vec![Span::styled(
            format!("  Hmax {:.2}  Hc eff {:.3}", shape.h_amp(), shape.eff_coercivity()),
            Style::default().fg(DIM),
        )]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Gain        ", Style::default().fg(LABEL)),
        Span::styled(
            format!("X {:.1}  Y {:.1}", params.gain_x(), params.gain_y()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  ", Style::default()),
        Span::styled(slider(params.gain_x(), &GAIN, bar_w / 2 - 1), Style::default().fg(Color::Rgb(80, 220, 160))),
        Span::styled("  ", Style::default()),
        Span::styled(slider(params.gain_y(), &GAIN, bar_w / 2 - 1), Style::default().fg(Color::Rgb(80, 220, 160))),
    ]));
    lines.push(Line::from(""));

    // ── Stats ──────────────────────────────────────────────────────────
    let stat_style = if session.is_on() {
        Style::default().fg(Color::Rgb(255, 215, 0)).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DIM)
    };
    let (area_txt, loss_txt) = match session.stats() {
        Some(s) => (s.area_label(), s.loss_label()),
        None => ("--".to_string(), "--".to_string()),
    };
    lines.push(Line::from(vec![
        Span::styled("  Loop Area   ", Style::default().fg(LABEL)),
        Span::styled(area_txt, stat_style),
        Span::styled(" T·A/m", Style::default().fg(DIM)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  H-Loss      ", Style::default().fg(LABEL)),
        Span::styled(loss_txt, stat_style),
        Span::styled(" W", Style::default().fg(DIM)),
    ]));

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" Controls ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(panel, area);
}
