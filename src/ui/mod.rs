pub mod readings;
pub mod scope;
pub mod tabs;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Tab};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),   // Content
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    tabs::render_tabs(frame, app, chunks[0]);

    match app.current_tab {
        Tab::Scope => scope::render_scope(frame, chunks[1], app),
        Tab::Readings => readings::render_readings(frame, chunks[1], app),
    }

    render_help(frame, chunks[2], app);
}

fn render_help(frame: &mut Frame, area: Rect, app: &App) {
    if let Some((ref msg, _, color)) = app.message {
        let p = Paragraph::new(Line::from(vec![
            Span::styled(format!(" {} ", msg), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ]));
        frame.render_widget(p, area);
        return;
    }

    let key = Style::default().fg(Color::Rgb(80, 200, 255));
    let label = Style::default().fg(Color::DarkGray);
    let sep = Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60)));
    let help = Paragraph::new(Line::from(vec![
        Span::styled(" Space ", key), Span::styled("Power ", label), sep.clone(),
        Span::styled("m ", key), Span::styled("Material ", label), sep.clone(),
        Span::styled("v/V r/R f/F [ ] ", key), Span::styled("Drive ", label), sep.clone(),
        Span::styled("x/X y/Y ", key), Span::styled("Gain ", label), sep.clone(),
        Span::styled("Enter ", key), Span::styled("Log ", label), sep.clone(),
        Span::styled("c ", key), Span::styled("Clear ", label), sep.clone(),
        Span::styled("Tab ", key), Span::styled("View ", label), sep,
        Span::styled("q ", key), Span::styled("Quit", label),
    ]));
    frame.render_widget(help, area);
}
