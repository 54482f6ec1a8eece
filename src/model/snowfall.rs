//! Falling snow: a fixed pool of flakes recycled as they leave the viewport.

use std::f64::consts::TAU;

use crate::config::SnowfallConfig;
use crate::state::Lifecycle;
use crate::util::rand_between;

/// Flakes spawn this far above the top edge.
pub const SPAWN_Y: f64 = -20.0;
/// Margin past the bottom edge before a flake is recycled.
const BOTTOM_MARGIN: f64 = 20.0;
/// Horizontal margin past either side before a flake is recycled.
const SIDE_MARGIN: f64 = 100.0;
const PHASE_STEP: f64 = 0.01;
/// How long an intensified snowfall lasts before reverting.
pub const BOOST_MS: f64 = 5000.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Snowflake {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// Pixels per frame.
    pub speed: f64,
    pub opacity: f64,
    pub wind_phase: f64,
    /// Degrees.
    pub rotation: f64,
    pub rotation_speed: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Boost {
    target: usize,
    remaining_ms: f64,
}

pub struct SnowfallSim {
    cfg: SnowfallConfig,
    pub flakes: Vec<Snowflake>,
    width: f64,
    height: f64,
    lifecycle: Lifecycle,
    boost: Option<Boost>,
    rng: fastrand::Rng,
}

impl SnowfallSim {
    pub fn new(cfg: SnowfallConfig, width: f64, height: f64, rng: fastrand::Rng) -> Self {
        let mut sim = Self {
            flakes: Vec::with_capacity(cfg.count),
            cfg,
            width,
            height,
            lifecycle: Lifecycle::Idle,
            boost: None,
            rng,
        };
        sim.fill_to(sim.cfg.count);
        sim.lifecycle.start();
        sim
    }

    pub fn baseline(&self) -> usize {
        self.cfg.count
    }

    pub fn is_paused(&self) -> bool {
        !self.lifecycle.is_running()
    }

    pub fn is_boosted(&self) -> bool {
        self.boost.is_some()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn spawn(&mut self) -> Snowflake {
        let [min_size, max_size] = self.cfg.size_range;
        let [min_speed, max_speed] = self.cfg.speed_range;
        let rng = &mut self.rng;
        Snowflake {
            x: rng.f64() * self.width,
            y: SPAWN_Y,
            size: rand_between(rng, min_size, max_size),
            speed: rand_between(rng, min_speed, max_speed),
            opacity: rand_between(rng, 0.2, 1.0),
            wind_phase: rng.f64() * TAU,
            rotation: 0.0,
            rotation_speed: rand_between(rng, -1.0, 1.0),
        }
    }

    fn fill_to(&mut self, target: usize) {
        while self.flakes.len() < target {
            let flake = self.spawn();
            self.flakes.push(flake);
        }
    }

    fn out_of_bounds(&self, f: &Snowflake) -> bool {
        f.y > self.height + BOTTOM_MARGIN || f.x < -SIDE_MARGIN || f.x > self.width + SIDE_MARGIN
    }

    /// Advances one frame. `dt_ms` only drives the boost timer, which keeps
    /// running while the snow is paused.
    pub fn step(&mut self, dt_ms: f64) {
        self.tick_boost(dt_ms);
        if !self.lifecycle.is_running() {
            return;
        }
        let wind = self.cfg.wind_force;
        for i in 0..self.flakes.len() {
            let f = &mut self.flakes[i];
            f.y += f.speed;
            f.wind_phase += PHASE_STEP;
            f.x += f.wind_phase.sin() * wind * f.size;
            f.rotation += f.rotation_speed;
            if self.out_of_bounds(&self.flakes[i]) {
                let fresh = self.spawn();
                self.flakes[i] = fresh;
            }
        }
    }

    fn tick_boost(&mut self, dt_ms: f64) {
        if let Some(boost) = self.boost.as_mut() {
            boost.remaining_ms -= dt_ms;
            if boost.remaining_ms <= 0.0 {
                self.normalize();
            }
        }
    }

    /// Grows the pool to `baseline * factor` for [`BOOST_MS`]. Overlapping
    /// boosts keep the larger target and the later deadline.
    pub fn intensify(&mut self, factor: usize) {
        let target = self.cfg.count * factor.max(1);
        let boost = match self.boost {
            Some(b) => Boost {
                target: b.target.max(target),
                remaining_ms: b.remaining_ms.max(BOOST_MS),
            },
            None => Boost {
                target,
                remaining_ms: BOOST_MS,
            },
        };
        log::debug!("snowfall: boost to {} flakes", boost.target);
        self.boost = Some(boost);
        self.fill_to(boost.target);
    }

    /// Drops flakes beyond the baseline and ends any boost.
    pub fn normalize(&mut self) {
        self.boost = None;
        self.flakes.truncate(self.cfg.count);
    }

    pub fn pause(&mut self) {
        if self.lifecycle.stop() {
            log::debug!("snowfall paused");
        }
    }

    pub fn resume(&mut self) {
        if self.lifecycle.start() {
            log::debug!("snowfall resumed");
        }
    }

    /// Flips pause; returns whether snow is now running.
    pub fn toggle(&mut self) -> bool {
        if self.lifecycle.is_running() {
            self.pause();
        } else {
            self.resume();
        }
        self.lifecycle.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sim(seed: u64) -> SnowfallSim {
        SnowfallSim::new(
            SnowfallConfig::default(),
            800.0,
            600.0,
            fastrand::Rng::with_seed(seed),
        )
    }

    #[test]
    fn starts_with_baseline_pool_above_viewport() {
        let s = sim(1);
        assert_eq!(s.flakes.len(), 100);
        for f in &s.flakes {
            assert_eq!(f.y, SPAWN_Y);
            assert!((1.0..8.0).contains(&f.size));
            assert!((1.0..5.0).contains(&f.speed));
            assert!((0.0..800.0).contains(&f.x));
        }
    }

    #[test]
    fn flakes_fall_by_their_speed() {
        let mut s = sim(2);
        let before = s.flakes[0].clone();
        s.step(16.0);
        let after = &s.flakes[0];
        assert!((after.y - (before.y + before.speed)).abs() < 1e-9);
        let drift = (before.wind_phase + PHASE_STEP).sin() * 0.5 * before.size;
        assert!((after.x - (before.x + drift)).abs() < 1e-9);
    }

    #[test]
    fn paused_snow_does_not_move() {
        let mut s = sim(3);
        s.pause();
        let before = s.flakes.clone();
        s.step(16.0);
        assert_eq!(before, s.flakes);
        assert!(s.toggle());
        s.step(16.0);
        assert_ne!(before, s.flakes);
    }

    #[test]
    fn intensify_reverts_after_boost() {
        let mut s = sim(4);
        s.intensify(3);
        assert_eq!(s.flakes.len(), 300);
        for _ in 0..(4_900 / 100) {
            s.step(100.0);
        }
        assert_eq!(s.flakes.len(), 300);
        s.step(100.0);
        s.step(100.0);
        assert_eq!(s.flakes.len(), 100);
        assert!(!s.is_boosted());
    }

    #[test]
    fn boost_reverts_while_paused() {
        let mut s = sim(6);
        s.pause();
        s.intensify(3);
        assert_eq!(s.flakes.len(), 300);
        for _ in 0..6 {
            s.step(1000.0);
        }
        assert_eq!(s.flakes.len(), 100);
        assert!(!s.is_boosted());
        assert!(s.is_paused());
    }

    #[test]
    fn flakes_leaving_either_side_are_recycled() {
        let mut s = sim(7);
        s.flakes[0].x = -SIDE_MARGIN - 1.0;
        s.flakes[0].y = 300.0;
        s.flakes[1].x = 800.0 + SIDE_MARGIN + 1.0;
        s.flakes[1].y = 300.0;
        // No wind, so the step itself cannot pull them back in bounds.
        s.cfg.wind_force = 0.0;
        s.step(16.0);
        for f in &s.flakes[..2] {
            assert_eq!(f.y, SPAWN_Y);
            assert!((0.0..800.0).contains(&f.x));
        }
    }

    #[test]
    fn overlapping_boosts_coalesce() {
        let mut s = sim(5);
        s.intensify(3);
        for _ in 0..20 {
            s.step(100.0);
        }
        s.intensify(2);
        assert_eq!(s.flakes.len(), 300);
        // The second boost pushes the deadline to 5 s from now.
        for _ in 0..45 {
            s.step(100.0);
        }
        assert_eq!(s.flakes.len(), 300);
        for _ in 0..6 {
            s.step(100.0);
        }
        assert_eq!(s.flakes.len(), 100);
    }

    proptest! {
        #[test]
        fn recycled_flakes_reappear_above_viewport(seed in 0u64..200, frames in 1usize..400) {
            let mut s = SnowfallSim::new(
                SnowfallConfig::default(),
                300.0,
                200.0,
                fastrand::Rng::with_seed(seed),
            );
            for _ in 0..frames {
                let before: Vec<f64> = s.flakes.iter().map(|f| f.y).collect();
                s.step(16.0);
                for (f, y0) in s.flakes.iter().zip(before) {
                    if f.y < y0 {
                        // Only a recycle moves a flake up.
                        prop_assert_eq!(f.y, SPAWN_Y);
                    }
                    prop_assert!(f.y <= 200.0 + BOTTOM_MARGIN);
                }
            }
        }
    }
}
