pub mod driver;
pub mod geometry;
pub mod integrator;
pub mod material;
pub mod params;
pub mod readings;

use log::{debug, info};

use crate::config::ScopeConfig;
use crate::error::Result;
use driver::AnimationDriver;
use geometry::{generate_loop, LoopPoint};
use integrator::LoopStats;
use material::MaterialKey;
use params::{stepped, Bounds, SimulationParameters, FREQUENCY, GAIN, RESISTANCE, VOLTAGE};
use readings::{Reading, ReadingLog};

/// All mutable state of one scope session. Every change goes through a command method.
#[derive(Clone, Debug)]
pub struct Session {
    params: SimulationParameters,
    driver: AnimationDriver,
    log: ReadingLog,
    resolution: usize,
    points: Vec<LoopPoint>,
    stats: Option<LoopStats>,
}

impl Session {
    pub fn new(params: SimulationParameters, resolution: usize) -> Result<Self> {
        let points = generate_loop(params.material(), params.voltage(), params.resistance(), resolution)?;
        Ok(Self {
            params,
            driver: AnimationDriver::new(),
            log: ReadingLog::new(),
            resolution,
            points,
            stats: None,
        })
    }

    pub fn from_config(config: &ScopeConfig) -> Result<Self> {
        Self::new(config.parameters()?, config.loop_resolution)
    }

    // ── Reads ──────────────────────────────────────────────────────────

    pub fn parameters(&self) -> &SimulationParameters { &self.params }
    pub fn is_on(&self) -> bool { self.driver.is_running() }
    pub fn phase(&self) -> f64 { self.driver.phase() }
    pub fn loop_points(&self) -> &[LoopPoint] { &self.points }
    pub fn readings(&self) -> &ReadingLog { &self.log }

    /// Stats from the most recent running frame.
    pub fn stats(&self) -> Option<LoopStats> {
        self.stats
    }

    pub fn marker_index(&self) -> usize {
        self.driver.marker_index(self.points.len())
    }

    pub fn marker(&self) -> Option<&LoopPoint> {
        self.points.get(self.marker_index())
    }

    // ── Parameter commands ─────────────────────────────────────────────

    pub fn set_material(&mut self, key: MaterialKey) -> Result<()> {
        self.params.set_material(key);
        debug!("material -> {}", key);
        self.regenerate()
    }

    pub fn set_resistance(&mut self, value: f64) -> Result<()> {
        self.params.set_resistance(value)?;
        debug!("resistance -> {}", value);
        self.regenerate()
    }

    pub fn set_voltage(&mut self, value: f64) -> Result<()> {
        self.params.set_voltage(value)?;
        debug!("voltage -> {}", value);
        self.regenerate()
    }

    pub fn set_frequency(&mut self, value: f64) -> Result<()> {
        self.params.set_frequency(value)?;
        debug!("frequency -> {}", value);
        Ok(())
    }

    pub fn set_gain_x(&mut self, value: f64) -> Result<()> {
        self.params.set_gain_x(value)?;
        debug!("gain x -> {}", value);
        Ok(())
    }

    pub fn set_gain_y(&mut self, value: f64) -> Result<()> {
        self.params.set_gain_y(value)?;
        debug!("gain y -> {}", value);
        Ok(())
    }

    pub fn step_resistance(&mut self, dir: f64) -> Result<()> {
        self.set_resistance(step(&RESISTANCE, self.params.resistance(), dir))
    }

    pub fn step_voltage(&mut self, dir: f64) -> Result<()> {
        self.set_voltage(step(&VOLTAGE, self.params.voltage(), dir))
    }

    pub fn step_frequency(&mut self, dir: f64, coarse: bool) -> Result<()> {
        let size = if coarse { params::FREQUENCY_COARSE_STEP } else { FREQUENCY.step };
        self.set_frequency(stepped(&FREQUENCY, self.params.frequency(), dir, size))
    }

    pub fn step_gain_x(&mut self, dir: f64) -> Result<()> {
        self.set_gain_x(step(&GAIN, self.params.gain_x(), dir))
    }

    pub fn step_gain_y(&mut self, dir: f64) -> Result<()> {
        self.set_gain_y(step(&GAIN, self.params.gain_y(), dir))
    }

    // ── Power ──────────────────────────────────────────────────────────

    pub fn power_on(&mut self) {
        if !self.driver.is_running() {
            info!("power on: {} at {} Hz", self.params.material().name, self.params.frequency());
        }
        self.driver.start();
    }

    pub fn power_off(&mut self) {
        if self.driver.is_running() {
            info!("power off at phase {:.3}", self.driver.phase());
        }
        self.driver.stop();
    }

    pub fn toggle_power(&mut self) {
        if self.is_on() {
            self.power_off();
        } else {
            self.power_on();
        }
    }

    /// One display frame. Returns `true` when the frame advanced the simulation.
    pub fn tick(&mut self, timestamp_ms: f64) -> Result<bool> {
        if self.driver.tick(timestamp_ms, self.params.frequency()).is_none() {
            return Ok(false);
        }
        self.regenerate()?;
        self.stats = Some(LoopStats::measure(&self.points, self.params.frequency()));
        Ok(true)
    }

    // ── Observation table ──────────────────────────────────────────────

    /// Log the current measurement. Does nothing while the power is off.
    pub fn add_reading(&mut self) -> Result<Option<&Reading>> {
        if !self.is_on() {
            debug!("reading ignored: power is off");
            return Ok(None);
        }
        self.regenerate()?;
        let stats = LoopStats::measure(&self.points, self.params.frequency());
        self.stats = Some(stats);
        let reading = Reading::snapshot(&self.params, &stats);
        info!(
            "reading #{}: {} f={} R={} area={} loss={}",
            self.log.len() + 1,
            reading.material,
            reading.frequency,
            reading.resistance,
            reading.area,
            reading.loss
        );
        self.log.push(reading);
        Ok(self.log.last())
    }

    /// Empty the table and start a fresh observation run: power off, phase zero.
    pub fn clear_table(&mut self) {
        info!("clearing {} readings", self.log.len());
        self.log.clear();
        self.reset();
    }

    /// Power off and rewind the beam, keeping logged readings.
    pub fn reset(&mut self) {
        self.power_off();
        self.driver.reset_phase();
    }

    fn regenerate(&mut self) -> Result<()> {
        self.points = generate_loop(
            self.params.material(),
            self.params.voltage(),
            self.params.resistance(),
            self.resolution,
        )?;
        Ok(())
    }
}

fn step(bounds: &Bounds, current: f64, dir: f64) -> f64 {
    stepped(bounds, current, dir, bounds.step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use super::geometry::LOOP_RESOLUTION;
    use super::integrator::loop_area;

    fn session() -> Session {
        Session::new(SimulationParameters::default(), LOOP_RESOLUTION).unwrap()
    }

    fn running() -> Session {
        let mut s = session();
        s.power_on();
        s.tick(0.0).unwrap();
        s
    }

    #[test]
    fn starts_stopped_with_a_full_loop() {
        let s = session();
        assert!(!s.is_on());
        assert_eq!(s.loop_points().len(), LOOP_RESOLUTION);
        assert_eq!(s.stats(), None);
        assert_eq!(s.marker_index(), 0);
    }

    #[test]
    fn stopped_ticks_do_nothing() {
        let mut s = session();
        assert!(!s.tick(100.0).unwrap());
        assert_eq!(s.stats(), None);
        assert_eq!(s.phase(), 0.0);
    }

    #[test]
    fn running_ticks_refresh_stats() {
        let mut s = running();
        assert!(s.tick(20.0).unwrap());
        let stats = s.stats().unwrap();
        let raw = loop_area(s.loop_points());
        assert_relative_eq!(stats.area, raw * 10.0);
        assert_relative_eq!(stats.loss, raw * 5.0, epsilon = 1e-12);
    }

    #[test]
    fn marker_moves_with_time() {
        let mut s = running();
        // 50 Hz: 5.5 ms is 0.275 of a cycle
        s.tick(5.5).unwrap();
        assert_eq!(s.marker_index(), 27);
        assert_eq!(s.marker(), s.loop_points().get(27));
    }

    #[test]
    fn gain_does_not_change_stats() {
        let mut s = running();
        s.tick(10.0).unwrap();
        let before = s.stats().unwrap();
        s.set_gain_x(2.0).unwrap();
        s.set_gain_y(0.5).unwrap();
        s.tick(20.0).unwrap();
        assert_eq!(s.stats().unwrap(), before);
    }

    #[test]
    fn parameter_changes_regenerate_geometry() {
        let mut s = session();
        let before = s.loop_points().to_vec();
        s.set_voltage(10.0).unwrap();
        assert_ne!(s.loop_points(), &before[..]);
        s.set_voltage(5.0).unwrap();
        assert_eq!(s.loop_points(), &before[..]);
        s.set_material(MaterialKey::Ferrite).unwrap();
        assert_ne!(s.loop_points(), &before[..]);
    }

    #[test]
    fn rejected_parameter_leaves_session_intact() {
        let mut s = session();
        assert!(s.set_resistance(0.0).is_err());
        assert_eq!(s.parameters().resistance(), 10.0);
        assert_eq!(s.loop_points().len(), LOOP_RESOLUTION);
    }

    #[test]
    fn steps_clamp_to_bounds() {
        let mut s = session();
        for _ in 0..100 {
            s.step_resistance(-1.0).unwrap();
            s.step_voltage(1.0).unwrap();
            s.step_frequency(1.0, true).unwrap();
            s.step_gain_x(1.0).unwrap();
            s.step_gain_y(-1.0).unwrap();
        }
        let p = s.parameters();
        assert_eq!(p.resistance(), 1.0);
        assert_eq!(p.voltage(), 20.0);
        assert_eq!(p.frequency(), 100.0);
        assert_eq!(p.gain_x(), 2.0);
        assert_eq!(p.gain_y(), 0.5);
        assert!(s.loop_points().iter().all(|p| p.physical.y.is_finite()));
    }

    #[test]
    fn reading_while_stopped_is_ignored() {
        let mut s = session();
        assert!(s.add_reading().unwrap().is_none());
        assert!(s.readings().is_empty());
    }

    #[test]
    fn readings_append_in_order() {
        let mut s = running();
        s.add_reading().unwrap();
        s.set_frequency(80.0).unwrap();
        s.set_resistance(20.0).unwrap();
        let second = s.add_reading().unwrap().cloned().unwrap();
        assert_eq!(second.frequency, 80.0);
        assert_eq!(second.resistance, 20.0);

        let rows = s.readings().rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].frequency, 50.0);
        assert_eq!(rows[1], second);
    }

    #[test]
    fn reading_uses_current_parameters_not_last_frame() {
        let mut s = running();
        s.set_material(MaterialKey::Steel).unwrap();
        let r = s.add_reading().unwrap().cloned().unwrap();
        let expected = LoopStats::measure(s.loop_points(), 50.0);
        assert_eq!(r.material, "Hard Steel");
        assert_eq!(r.area, expected.area_label());
        assert_eq!(r.loss, expected.loss_reading_label());
    }

    #[test]
    fn clear_table_stops_and_rewinds() {
        let mut s = running();
        s.tick(7.0).unwrap();
        s.add_reading().unwrap();
        assert!(s.phase() > 0.0);

        s.clear_table();
        assert!(s.readings().is_empty());
        assert!(!s.is_on());
        assert_eq!(s.phase(), 0.0);
        assert!(s.add_reading().unwrap().is_none());
    }

    #[test]
    fn reset_keeps_readings() {
        let mut s = running();
        s.tick(3.0).unwrap();
        s.add_reading().unwrap();
        s.reset();
        assert!(!s.is_on());
        assert_eq!(s.phase(), 0.0);
        assert_eq!(s.readings().len(), 1);
    }

    #[test]
    fn toggle_power_round_trip() {
        let mut s = session();
        s.toggle_power();
        assert!(s.is_on());
        s.toggle_power();
        assert!(!s.is_on());
    }
}
