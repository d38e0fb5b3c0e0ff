use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;

pub fn render_readings(frame: &mut Frame, area: Rect, app: &App) {
    let log = app.session.readings();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(" Observation Table ")
        .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD));

    if log.is_empty() {
        let hint = if app.session.is_on() {
            "  Press Enter to log the current loop."
        } else {
            "  Switch the power on (Space), then press Enter to log a reading."
        };
        let p = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("  No readings yet", Style::default().fg(Color::Rgb(100, 100, 130)))),
            Line::from(Span::styled(hint, Style::default().fg(Color::Rgb(80, 80, 100)))),
        ])
        .block(block);
        frame.render_widget(p, area);
        return;
    }

    let header = Row::new(["#", "Material", "Freq (Hz)", "R (Ω)", "Area", "H-Loss"])
        .style(Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let rows: Vec<Row> = log
        .rows()
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let stripe = if i % 2 == 0 { Color::Rgb(15, 15, 25) } else { Color::Rgb(22, 22, 36) };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)).style(Style::default().fg(Color::Rgb(100, 100, 130))),
                Cell::from(r.material).style(Style::default().fg(Color::Rgb(200, 200, 220))),
                Cell::from(format!("{:.0}", r.frequency)),
                Cell::from(format!("{:.0}", r.resistance)),
                Cell::from(r.area.clone()).style(Style::default().fg(Color::Rgb(255, 215, 0))),
                Cell::from(r.loss.clone()).style(Style::default().fg(Color::Rgb(255, 160, 60)).add_modifier(Modifier::BOLD)),
            ])
            .style(Style::default().bg(stripe))
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .block(block);

    // Keep the newest reading in view
    let mut state = TableState::default();
    state.select(Some(log.len() - 1));
    frame.render_stateful_widget(table, area, &mut state);
}
