//! Per-frame visitor motion
//!
//! Walking visitors steer straight at their target. The rendered position
//! gets a sinusoidal latitude wobble that is recomputed from the clock every
//! tick and never stored, so it jitters without drifting.

use rand::Rng;

use crate::core::config::{MotionConfig, StepMode};
use crate::core::types::LatLng;
use crate::render::RenderSink;
use crate::simulation::visitors::{VisitorPool, VisitorState};

/// What one tick did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub moved: usize,
    pub arrived: usize,
    pub fidgets_started: usize,
    pub fidgets_ended: usize,
}

/// Advances visitors once per frame
#[derive(Debug, Default)]
pub struct MotionStepper {
    last_tick_ms: Option<f64>,
}

impl MotionStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one tick at wall-clock time `now_ms`
    pub fn step(
        &mut self,
        pool: &mut VisitorPool,
        now_ms: f64,
        config: &MotionConfig,
        rng: &mut impl Rng,
        sink: &mut impl RenderSink,
    ) -> StepReport {
        let scale = self.step_scale(now_ms, config.step_mode);
        let mut report = StepReport::default();

        for visitor in pool.iter_mut() {
            match visitor.state {
                VisitorState::Walking => {
                    let delta = visitor.target() - visitor.current;
                    let dist = delta.length();

                    if dist < config.arrival_radius {
                        visitor.state = VisitorState::Arrived;
                        sink.set_walking_cue(visitor.marker(), false);
                        report.arrived += 1;
                    } else {
                        // Never step past the target
                        let step = (visitor.speed() * scale).min(dist);
                        visitor.current += delta.normalize() * step;
                        let shown = visitor.current
                            + LatLng::new(wobble(now_ms, visitor.wobble_offset(), config), 0.0);
                        sink.update_marker_position(visitor.marker(), shown);
                        report.moved += 1;
                    }
                }
                VisitorState::Arrived => match visitor.fidget_until {
                    Some(until) if now_ms >= until => {
                        visitor.fidget_until = None;
                        sink.set_walking_cue(visitor.marker(), false);
                        report.fidgets_ended += 1;
                    }
                    Some(_) => {}
                    None => {
                        if rng.gen_bool(config.fidget_probability) {
                            visitor.fidget_until = Some(now_ms + config.fidget_duration_ms);
                            sink.set_walking_cue(visitor.marker(), true);
                            report.fidgets_started += 1;
                        }
                    }
                },
            }
        }

        report
    }

    fn step_scale(&mut self, now_ms: f64, mode: StepMode) -> f64 {
        let previous = self.last_tick_ms.replace(now_ms);
        match (mode, previous) {
            (StepMode::FixedPerTick, _) => 1.0,
            (StepMode::ElapsedScaled { reference_frame_ms }, Some(prev)) => {
                (now_ms - prev).max(0.0) / reference_frame_ms
            }
            (StepMode::ElapsedScaled { .. }, None) => 1.0,
        }
    }
}

/// Latitude offset drawn on top of a walking visitor's position
pub fn wobble(now_ms: f64, offset: f64, config: &MotionConfig) -> f64 {
    (now_ms / config.wobble_period_ms + offset).sin() * config.wobble_amplitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSink;
    use crate::simulation::visitors::test_visitor;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const TARGET: LatLng = LatLng::new(35.70, 140.60);

    fn quiet_config() -> MotionConfig {
        MotionConfig {
            fidget_probability: 0.0,
            ..MotionConfig::default()
        }
    }

    fn pool_with(start: LatLng, speed: f64, sink: &mut RecordingSink) -> VisitorPool {
        let mut pool = VisitorPool::new();
        pool.push(test_visitor("a", start, TARGET, speed, sink));
        pool
    }

    fn ticks_until_arrival(
        pool: &mut VisitorPool,
        config: &MotionConfig,
        sink: &mut RecordingSink,
    ) -> usize {
        let mut stepper = MotionStepper::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for tick in 0..100_000 {
            if pool.iter().all(|v| v.state() == VisitorState::Arrived) {
                return tick;
            }
            stepper.step(pool, tick as f64 * 16.0, config, &mut rng, sink);
        }
        panic!("visitor never arrived");
    }

    #[test]
    fn test_walking_visitor_moves_by_speed_towards_target() {
        let config = quiet_config();
        let mut sink = RecordingSink::new();
        let start = TARGET + LatLng::new(0.004, 0.003);
        let mut pool = pool_with(start, 0.00005, &mut sink);

        let report = MotionStepper::new().step(
            &mut pool,
            0.0,
            &config,
            &mut ChaCha8Rng::seed_from_u64(1),
            &mut sink,
        );
        assert_eq!(report.moved, 1);
        let visitor = pool.iter().next().unwrap();
        assert!((visitor.distance_to_target() - (0.005 - 0.00005)).abs() < 1e-12);
        assert_eq!(sink.position_updates, 1);
    }

    #[test]
    fn test_wobble_is_not_accumulated() {
        let config = quiet_config();
        let mut sink = RecordingSink::new();
        let start = TARGET + LatLng::new(0.0, 0.004);
        let mut pool = pool_with(start, 0.00005, &mut sink);
        let mut stepper = MotionStepper::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for tick in 0..10 {
            stepper.step(&mut pool, 100.0 + tick as f64 * 16.0, &config, &mut rng, &mut sink);
        }
        let visitor = pool.iter().next().unwrap();
        // Moving due west: the stored latitude stays on the target's line
        assert!((visitor.position().lat - TARGET.lat).abs() < 1e-12);
        let shown = sink.get(visitor.marker()).unwrap().position;
        let expected = wobble(100.0 + 9.0 * 16.0, visitor.wobble_offset(), &config);
        assert!((shown.lat - TARGET.lat - expected).abs() < 1e-12);
        assert!(expected.abs() <= config.wobble_amplitude);
    }

    #[test]
    fn test_arrival_takes_expected_ticks() {
        let config = quiet_config();
        let mut sink = RecordingSink::new();
        let speed = 0.00004;
        let distance = 10.0 * config.arrival_radius;
        let mut pool = pool_with(TARGET + LatLng::new(distance, 0.0), speed, &mut sink);

        let ticks = ticks_until_arrival(&mut pool, &config, &mut sink);
        // Movement ticks to get inside the radius, plus the tick that notices
        let moving = ((distance - config.arrival_radius) / speed).floor() as usize + 1;
        assert_eq!(ticks, moving + 1);
        assert!(ticks >= ((distance - config.arrival_radius) / speed).ceil() as usize);
    }

    #[test]
    fn test_inside_arrival_radius_arrives_without_moving() {
        let config = quiet_config();
        let mut sink = RecordingSink::new();
        let start = TARGET + LatLng::new(0.0001, 0.0);
        let mut pool = pool_with(start, 0.00004, &mut sink);

        let report = MotionStepper::new().step(
            &mut pool,
            0.0,
            &config,
            &mut ChaCha8Rng::seed_from_u64(1),
            &mut sink,
        );
        assert_eq!(report, StepReport { arrived: 1, ..Default::default() });
        let visitor = pool.iter().next().unwrap();
        assert_eq!(visitor.position(), start);
        assert_eq!(sink.position_updates, 0);
        assert!(!sink.get(visitor.marker()).unwrap().walking);
    }

    #[test]
    fn test_arrived_visitor_never_walks_again() {
        let config = MotionConfig {
            fidget_probability: 1.0,
            fidget_duration_ms: 32.0,
            ..MotionConfig::default()
        };
        let mut sink = RecordingSink::new();
        let start = TARGET + LatLng::new(0.0001, 0.0);
        let mut pool = pool_with(start, 0.00004, &mut sink);
        let mut stepper = MotionStepper::new();
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let mut totals = StepReport::default();
        for tick in 0..20 {
            let r = stepper.step(&mut pool, tick as f64 * 16.0, &config, &mut rng, &mut sink);
            totals.moved += r.moved;
            totals.fidgets_started += r.fidgets_started;
            totals.fidgets_ended += r.fidgets_ended;
            assert_eq!(pool.iter().next().unwrap().position(), start);
        }
        assert_eq!(totals.moved, 0);
        assert!(totals.fidgets_started > 1);
        assert!(totals.fidgets_ended >= totals.fidgets_started - 1);
        assert_eq!(pool.iter().next().unwrap().state(), VisitorState::Arrived);
    }

    #[test]
    fn test_fidget_cue_clears_after_duration() {
        let config = MotionConfig {
            fidget_probability: 1.0,
            fidget_duration_ms: 1000.0,
            ..MotionConfig::default()
        };
        let mut sink = RecordingSink::new();
        let mut pool = pool_with(TARGET, 0.00004, &mut sink);
        let mut stepper = MotionStepper::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let marker = pool.iter().next().unwrap().marker();

        stepper.step(&mut pool, 0.0, &config, &mut rng, &mut sink); // arrives
        stepper.step(&mut pool, 16.0, &config, &mut rng, &mut sink); // fidget starts
        assert!(sink.get(marker).unwrap().walking);
        assert!(pool.iter().next().unwrap().is_fidgeting());

        stepper.step(&mut pool, 500.0, &config, &mut rng, &mut sink);
        assert!(sink.get(marker).unwrap().walking);

        stepper.step(&mut pool, 1016.0, &config, &mut rng, &mut sink);
        assert!(!sink.get(marker).unwrap().walking);
        assert!(!pool.iter().next().unwrap().is_fidgeting());
    }

    #[test]
    fn test_speed_and_target_never_change() {
        let config = MotionConfig::default();
        let mut sink = RecordingSink::new();
        let mut pool = pool_with(TARGET + LatLng::new(0.003, -0.002), 0.00005, &mut sink);
        let before = pool.iter().next().unwrap().clone();
        let mut stepper = MotionStepper::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        for tick in 0..500 {
            stepper.step(&mut pool, tick as f64 * 16.0, &config, &mut rng, &mut sink);
        }
        let after = pool.iter().next().unwrap();
        assert_eq!(after.speed(), before.speed());
        assert_eq!(after.target(), before.target());
        assert_eq!(after.id(), before.id());
    }

    #[test]
    fn test_elapsed_scaled_step() {
        let config = MotionConfig {
            fidget_probability: 0.0,
            step_mode: StepMode::ElapsedScaled { reference_frame_ms: 16.0 },
            ..MotionConfig::default()
        };
        let mut sink = RecordingSink::new();
        let start = TARGET + LatLng::new(0.005, 0.0);
        let mut pool = pool_with(start, 0.00005, &mut sink);
        let mut stepper = MotionStepper::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        stepper.step(&mut pool, 0.0, &config, &mut rng, &mut sink);
        let after_first = pool.iter().next().unwrap().distance_to_target();
        assert!((after_first - (0.005 - 0.00005)).abs() < 1e-12);

        // A frame twice as long moves twice as far
        stepper.step(&mut pool, 32.0, &config, &mut rng, &mut sink);
        let after_second = pool.iter().next().unwrap().distance_to_target();
        assert!((after_first - after_second - 0.0001).abs() < 1e-12);
    }

    #[test]
    fn test_long_frame_gap_stops_at_target() {
        let config = MotionConfig {
            fidget_probability: 0.0,
            step_mode: StepMode::ElapsedScaled { reference_frame_ms: 16.0 },
            ..MotionConfig::default()
        };
        let mut sink = RecordingSink::new();
        let mut pool = pool_with(TARGET + LatLng::new(0.005, 0.0), 0.00005, &mut sink);
        let mut stepper = MotionStepper::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        stepper.step(&mut pool, 0.0, &config, &mut rng, &mut sink);
        // 2 s hitch: 125 reference frames, far more than the remaining distance
        stepper.step(&mut pool, 2000.0, &config, &mut rng, &mut sink);
        let visitor = pool.iter().next().unwrap();
        assert!(visitor.position().lat - TARGET.lat >= -1e-12);
        assert!(visitor.distance_to_target() < 1e-12);

        let report = stepper.step(&mut pool, 2016.0, &config, &mut rng, &mut sink);
        assert_eq!(report.arrived, 1);
    }

    #[test]
    fn test_step_wider_than_arrival_zone_still_arrives() {
        let config = quiet_config();
        let mut sink = RecordingSink::new();
        let speed = 3.0 * config.arrival_radius;
        let mut pool = pool_with(TARGET + LatLng::new(0.004, 0.0), speed, &mut sink);

        let ticks = ticks_until_arrival(&mut pool, &config, &mut sink);
        assert!(ticks <= (0.004 / speed).ceil() as usize + 1);
        let visitor = pool.iter().next().unwrap();
        assert!(visitor.distance_to_target() < config.arrival_radius);
    }
}
