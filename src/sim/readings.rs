use crate::sim::integrator::LoopStats;
use crate::sim::params::SimulationParameters;

/// One row of the observation table.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub material: &'static str,
    pub frequency: f64,
    pub resistance: f64,
    pub area: String,
    pub loss: String,
}

impl Reading {
    pub fn snapshot(params: &SimulationParameters, stats: &LoopStats) -> Self {
        Reading {
            material: params.material().name,
            frequency: params.frequency(),
            resistance: params.resistance(),
            area: stats.area_label(),
            loss: stats.loss_reading_label(),
        }
    }
}

/// Append-only list of readings for the current session.
#[derive(Clone, Debug, Default)]
pub struct ReadingLog {
    rows: Vec<Reading>,
}

impl ReadingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reading: Reading) {
        self.rows.push(reading);
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Reading] {
        &self.rows
    }

    pub fn last(&self) -> Option<&Reading> {
        self.rows.last()
    }
}
