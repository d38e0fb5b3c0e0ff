use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;
use ratatui::style::Color;

use crate::config::ScopeConfig;
use crate::error::Result;
use crate::render::LoopRenderer;
use crate::sim::Session;

const MESSAGE_TICKS: u32 = 120;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Tab {
    Scope,
    Readings,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Scope, Tab::Readings]
    }

    pub fn title(&self) -> &str {
        match self {
            Tab::Scope => " Scope ",
            Tab::Readings => " Readings ",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Scope => 0,
            Tab::Readings => 1,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub session: Session,
    pub renderer: LoopRenderer,
    // Flash message: (text, ticks_remaining, color)
    pub message: Option<(String, u32, Color)>,
    epoch: Instant,
}

impl App {
    pub fn new(config: &ScopeConfig) -> Result<Self> {
        Ok(Self {
            should_quit: false,
            current_tab: Tab::Scope,
            session: Session::from_config(config)?,
            renderer: LoopRenderer::new(config.base_scale, config.marker_radius),
            message: None,
            epoch: Instant::now(),
        })
    }

    pub fn on_tick(&mut self, at: Instant) {
        let timestamp_ms = at.saturating_duration_since(self.epoch).as_secs_f64() * 1000.0;
        if let Err(e) = self.session.tick(timestamp_ms) {
            warn!("frame failed: {e}");
        }

        if let Some((_, ticks, _)) = &mut self.message {
            *ticks = ticks.saturating_sub(1);
            if *ticks == 0 {
                self.message = None;
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            _ => {}
        }

        if let Err(e) = self.handle_control(key) {
            warn!("control rejected: {e}");
            self.flash(e.to_string(), Color::Rgb(255, 60, 60));
        }
    }

    fn handle_control(&mut self, key: KeyEvent) -> Result<()> {
        let s = &mut self.session;
        match key.code {
            KeyCode::Char(' ') => s.toggle_power(),
            KeyCode::Char('m') => s.set_material(s.parameters().material_key().next())?,
            KeyCode::Char('M') => s.set_material(s.parameters().material_key().prev())?,
            KeyCode::Char('v') => s.step_voltage(-1.0)?,
            KeyCode::Char('V') => s.step_voltage(1.0)?,
            KeyCode::Char('r') => s.step_resistance(-1.0)?,
            KeyCode::Char('R') => s.step_resistance(1.0)?,
            KeyCode::Char('f') => s.step_frequency(-1.0, false)?,
            KeyCode::Char('F') => s.step_frequency(1.0, false)?,
            KeyCode::Char('[') => s.step_frequency(-1.0, true)?,
            KeyCode::Char(']') => s.step_frequency(1.0, true)?,
            KeyCode::Char('x') => s.step_gain_x(-1.0)?,
            KeyCode::Char('X') => s.step_gain_x(1.0)?,
            KeyCode::Char('y') => s.step_gain_y(-1.0)?,
            KeyCode::Char('Y') => s.step_gain_y(1.0)?,
            KeyCode::Enter | KeyCode::Char('a') | KeyCode::Char('A') => self.add_reading()?,
            KeyCode::Char('c') | KeyCode::Char('C') => {
                s.clear_table();
                self.flash("Table cleared".to_string(), Color::Rgb(255, 200, 80));
            }
            KeyCode::Backspace => {
                s.reset();
                self.flash("Reset".to_string(), Color::Rgb(255, 200, 80));
            }
            _ => {}
        }
        Ok(())
    }

    fn add_reading(&mut self) -> Result<()> {
        if self.session.add_reading()?.is_some() {
            let n = self.session.readings().len();
            self.flash(format!("Reading #{} logged", n), Color::Rgb(80, 255, 80));
        } else {
            self.flash("Switch the power on to take a reading".to_string(), Color::Rgb(255, 160, 50));
        }
        Ok(())
    }

    fn flash(&mut self, text: String, color: Color) {
        self.message = Some((text, MESSAGE_TICKS, color));
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.current_tab = tabs[(idx + 1) % tabs.len()];
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.current_tab = tabs[(idx + tabs.len() - 1) % tabs.len()];
    }
}
