//! Firework projectiles, explosion particles and the auto launcher.

use std::collections::VecDeque;
use std::f64::consts::{PI, TAU};

use crate::config::{FireworksConfig, Rgb};
use crate::util::{jitter, rand_between};

/// Frames a projectile needs to reach its target.
pub const PROJECTILE_FRAMES: f64 = 60.0;
/// A projectile explodes once it is this close to its target.
pub const EXPLODE_DISTANCE: f64 = 5.0;
pub const TRAIL_LENGTH: f64 = 10.0;
pub const TRAIL_MARKER_RADIUS: f64 = 2.0;
/// Extra frames of random lifetime on top of the configured base.
const LIFETIME_SPREAD: f64 = 30.0;
const COLOR_JITTER: f64 = 50.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f64,
    pub y: f64,
    pub target_x: f64,
    pub target_y: f64,
    pub dx: f64,
    pub dy: f64,
    pub color: Rgb,
    pub manual: bool,
}

impl Projectile {
    pub fn new(from: (f64, f64), to: (f64, f64), color: Rgb, manual: bool) -> Self {
        Self {
            x: from.0,
            y: from.1,
            target_x: to.0,
            target_y: to.1,
            dx: (to.0 - from.0) / PROJECTILE_FRAMES,
            dy: (to.1 - from.1) / PROJECTILE_FRAMES,
            color,
            manual,
        }
    }

    pub fn distance_to_target(&self) -> f64 {
        (self.target_x - self.x).hypot(self.target_y - self.y)
    }

    /// Moves one frame; returns true once within [`EXPLODE_DISTANCE`].
    pub fn advance(&mut self) -> bool {
        self.x += self.dx;
        self.y += self.dy;
        self.distance_to_target() < EXPLODE_DISTANCE
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplosionPattern {
    Circle,
    Random,
    /// Eight rays.
    Star,
    /// Six petals.
    Flower,
}

impl ExplosionPattern {
    pub const ALL: [ExplosionPattern; 4] = [
        ExplosionPattern::Circle,
        ExplosionPattern::Random,
        ExplosionPattern::Star,
        ExplosionPattern::Flower,
    ];

    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::ALL[rng.usize(..Self::ALL.len())]
    }

    /// Base direction of particle `i` out of `count`, before the shared jitter.
    pub fn angle(&self, i: usize, count: usize, rng: &mut fastrand::Rng) -> f64 {
        let frac = i as f64 / count.max(1) as f64;
        match self {
            ExplosionPattern::Circle => frac * TAU,
            ExplosionPattern::Random => rng.f64() * TAU,
            ExplosionPattern::Star => {
                let ray = (frac * 8.0).floor();
                ray * PI / 4.0 + jitter(rng, 0.25)
            }
            ExplosionPattern::Flower => {
                let petal = (frac * 6.0).floor();
                petal * PI / 3.0 + jitter(rng, 0.35)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    Normal,
    /// Drawn with a halo.
    Sparkle,
    /// Drawn with a streak behind it.
    Trail,
}

impl ParticleKind {
    fn random(rng: &mut fastrand::Rng) -> Self {
        match rng.u8(..3) {
            0 => ParticleKind::Normal,
            1 => ParticleKind::Sparkle,
            _ => ParticleKind::Trail,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub color: Rgb,
    /// Remaining frames.
    pub life: f64,
    pub max_life: f64,
    pub gravity: f64,
    pub drag: f64,
    pub size: f64,
    pub kind: ParticleKind,
}

impl Particle {
    pub fn step(&mut self) {
        self.x += self.dx;
        self.y += self.dy;
        self.dy += self.gravity;
        self.dx *= self.drag;
        self.dy *= self.drag;
        self.life -= 1.0;
    }

    pub fn alpha(&self) -> f64 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    /// Rendered radius, shrinking with the remaining lifetime.
    pub fn radius(&self) -> f64 {
        (self.size * self.alpha()).max(0.0)
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    /// Tail end of the streak drawn for [`ParticleKind::Trail`].
    pub fn trail_start(&self) -> (f64, f64) {
        (
            self.x - self.dx * TRAIL_LENGTH,
            self.y - self.dy * TRAIL_LENGTH,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaunchMode {
    Steady,
    Intensified,
}

impl LaunchMode {
    fn interval_ms(&self, base: f64) -> f64 {
        match self {
            LaunchMode::Steady => base,
            LaunchMode::Intensified => base / 2.0,
        }
    }

    fn salvo_size(&self, rng: &mut fastrand::Rng) -> u32 {
        match self {
            LaunchMode::Steady => rng.u32(3..=5),
            LaunchMode::Intensified => rng.u32(5..=8),
        }
    }

    fn stagger_ms(&self) -> f64 {
        match self {
            LaunchMode::Steady => 100.0,
            LaunchMode::Intensified => 80.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingLaunch {
    due_in_ms: f64,
    manual: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Explosion {
    pub x: f64,
    pub y: f64,
    pub pattern: ExplosionPattern,
    pub manual: bool,
}

/// What happened during one [`FireworksSim::step`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub launched: u32,
    pub explosions: Vec<Explosion>,
    /// Tones the audio layer should play.
    pub sound_cues: u32,
}

pub struct FireworksSim {
    cfg: FireworksConfig,
    pub projectiles: Vec<Projectile>,
    pub particles: VecDeque<Particle>,
    width: f64,
    height: f64,
    mode: LaunchMode,
    since_salvo_ms: f64,
    pending: Vec<PendingLaunch>,
    auto_launch: bool,
    /// Cues raised by launches outside `step`, drained by the next frame.
    queued_cues: u32,
    rng: fastrand::Rng,
}

impl FireworksSim {
    pub fn new(cfg: FireworksConfig, width: f64, height: f64, rng: fastrand::Rng) -> Self {
        Self {
            cfg,
            projectiles: Vec::new(),
            particles: VecDeque::new(),
            width,
            height,
            mode: LaunchMode::Steady,
            since_salvo_ms: 0.0,
            pending: Vec::new(),
            auto_launch: true,
            queued_cues: 0,
            rng,
        }
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn mode(&self) -> LaunchMode {
        self.mode
    }

    pub fn set_auto_launch(&mut self, on: bool) {
        self.auto_launch = on;
    }

    pub fn pending_launches(&self) -> usize {
        self.pending.len()
    }

    pub fn launch(&mut self, from: (f64, f64), to: (f64, f64), manual: bool) {
        let color = self.cfg.colors[self.rng.usize(..self.cfg.colors.len())];
        self.projectiles.push(Projectile::new(from, to, color, manual));
        if manual || self.rng.bool() {
            self.queued_cues += 1;
        }
    }

    /// From a random point on the bottom edge to a random point in the upper sky.
    pub fn launch_random(&mut self, manual: bool) {
        let (w, h) = (self.width, self.height);
        let from = (self.rng.f64() * w, h);
        let to = (self.rng.f64() * w, self.rng.f64() * h * 0.6 + h * 0.05);
        self.launch(from, to, manual);
    }

    /// Queues `count` random launches, `stagger_ms` apart, starting now.
    pub fn queue_salvo(&mut self, count: u32, stagger_ms: f64, manual: bool) {
        self.pending.extend((0..count).map(|i| PendingLaunch {
            due_in_ms: i as f64 * stagger_ms,
            manual,
        }));
    }

    /// Faster, bigger automatic salvos until [`Self::reset_auto_launch`].
    pub fn intensify(&mut self) {
        if self.mode != LaunchMode::Intensified {
            log::debug!("fireworks: intensified auto launch");
        }
        self.mode = LaunchMode::Intensified;
        self.since_salvo_ms = 0.0;
    }

    pub fn reset_auto_launch(&mut self) {
        if self.mode != LaunchMode::Steady {
            log::debug!("fireworks: steady auto launch");
        }
        self.mode = LaunchMode::Steady;
        self.since_salvo_ms = 0.0;
    }

    pub fn clear(&mut self) {
        self.projectiles.clear();
        self.particles.clear();
        self.pending.clear();
        self.queued_cues = 0;
    }

    /// A small burst of sparks at a point, without a projectile.
    pub fn ember_burst(&mut self, x: f64, y: f64, count: u32, color: Rgb) {
        for _ in 0..count {
            let angle = self.rng.f64() * TAU;
            let speed = rand_between(&mut self.rng, 2.0, 5.0);
            let life = rand_between(&mut self.rng, 60.0, 100.0);
            self.particles.push_back(Particle {
                x,
                y,
                dx: angle.cos() * speed,
                dy: angle.sin() * speed,
                color,
                life,
                max_life: life,
                gravity: 0.1,
                drag: 0.99,
                size: 1.5,
                kind: ParticleKind::Normal,
            });
        }
        self.trim();
    }

    pub fn explode(&mut self, x: f64, y: f64, color: Rgb, manual: bool) -> Explosion {
        let pattern = ExplosionPattern::random(&mut self.rng);
        let count = self.cfg.particle_count as usize;
        let brightness = if manual {
            self.cfg.manual_brightness
        } else {
            1.0
        };
        for i in 0..count {
            let rng = &mut self.rng;
            let angle = pattern.angle(i, count, rng) + jitter(rng, 0.2);
            let speed = rand_between(rng, self.cfg.min_speed, self.cfg.max_speed)
                * rand_between(rng, 0.8, 1.2);
            let base = color[i % 3] as f64 * brightness;
            let mut channel = || (base + jitter(rng, COLOR_JITTER)).clamp(0.0, 255.0) as u8;
            let tint = [channel(), channel(), channel()];
            let kind = ParticleKind::random(rng);
            let life = self.cfg.particle_lifetime + rng.f64() * LIFETIME_SPREAD;
            let size = match kind {
                ParticleKind::Sparkle => rand_between(rng, 2.0, 5.0),
                _ => rand_between(rng, 1.0, 3.5),
            };
            self.particles.push_back(Particle {
                x,
                y,
                dx: angle.cos() * speed,
                dy: angle.sin() * speed,
                color: tint,
                life,
                max_life: life,
                gravity: rand_between(rng, 0.01, 0.05),
                drag: self.cfg.drag,
                size,
                kind,
            });
        }
        Explosion {
            x,
            y,
            pattern,
            manual,
        }
    }

    /// Drops the oldest particles beyond the cap.
    fn trim(&mut self) {
        let cap = self.cfg.particle_cap;
        if self.particles.len() > cap {
            let excess = self.particles.len() - cap;
            self.particles.drain(..excess);
        }
    }

    fn run_auto_launcher(&mut self, dt_ms: f64) {
        if !self.auto_launch {
            return;
        }
        self.since_salvo_ms += dt_ms;
        let interval = self.mode.interval_ms(self.cfg.launch_interval_ms as f64);
        if self.since_salvo_ms >= interval {
            self.since_salvo_ms -= interval;
            // Long pauses (background tabs) must not replay every missed salvo.
            self.since_salvo_ms = self.since_salvo_ms.min(interval);
            let count = self.mode.salvo_size(&mut self.rng);
            self.queue_salvo(count, self.mode.stagger_ms(), false);
        }
    }

    fn fire_due_launches(&mut self, dt_ms: f64) -> u32 {
        let mut manual_due = Vec::new();
        self.pending.retain_mut(|p| {
            p.due_in_ms -= dt_ms;
            if p.due_in_ms <= 0.0 {
                manual_due.push(p.manual);
                false
            } else {
                true
            }
        });
        for &manual in &manual_due {
            self.launch_random(manual);
        }
        manual_due.len() as u32
    }

    pub fn step(&mut self, dt_ms: f64) -> FrameReport {
        let mut report = FrameReport::default();
        self.run_auto_launcher(dt_ms);
        report.launched = self.fire_due_launches(dt_ms);

        let mut arrived = Vec::new();
        self.projectiles.retain_mut(|p| {
            if p.advance() {
                arrived.push((p.x, p.y, p.color, p.manual));
                false
            } else {
                true
            }
        });
        for (x, y, color, manual) in arrived {
            if manual {
                self.queued_cues += 1;
            }
            let explosion = self.explode(x, y, color, manual);
            report.explosions.push(explosion);
        }

        for p in self.particles.iter_mut() {
            p.step();
        }
        self.particles.retain(|p| !p.is_dead());
        self.trim();

        report.sound_cues = std::mem::take(&mut self.queued_cues);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sim(seed: u64) -> FireworksSim {
        FireworksSim::new(
            FireworksConfig::default(),
            800.0,
            600.0,
            fastrand::Rng::with_seed(seed),
        )
    }

    #[test]
    fn projectile_steps_linearly_and_explodes_near_target() {
        let mut p = Projectile::new((100.0, 500.0), (300.0, 200.0), [255, 0, 0], true);
        assert!((p.dx - 200.0 / 60.0).abs() < 1e-9);
        assert!((p.dy + 300.0 / 60.0).abs() < 1e-9);
        let mut frames = 0;
        while !p.advance() {
            frames += 1;
            assert!(frames < 60, "projectile never arrived");
        }
        assert!(p.distance_to_target() < EXPLODE_DISTANCE);
        // Step length is ~6 px, so arrival happens on the 59th or 60th frame.
        assert!(frames >= 58);
    }

    #[test]
    fn launch_then_frames_produce_one_explosion() {
        let mut s = sim(1);
        s.set_auto_launch(false);
        s.launch((100.0, 500.0), (300.0, 200.0), true);
        let mut explosions = Vec::new();
        for _ in 0..70 {
            explosions.extend(s.step(16.0).explosions);
        }
        assert_eq!(explosions.len(), 1);
        let e = explosions[0];
        assert!((e.x - 300.0).abs() < EXPLODE_DISTANCE);
        assert!((e.y - 200.0).abs() < EXPLODE_DISTANCE);
        assert!(e.manual);
        assert!(s.projectiles.is_empty());
    }

    #[test]
    fn manual_launch_and_explosion_cue_sound() {
        let mut s = sim(2);
        s.set_auto_launch(false);
        s.launch((0.0, 100.0), (0.0, 0.0), true);
        let first = s.step(16.0);
        assert_eq!(first.sound_cues, 1);
        let mut later = 0;
        for _ in 0..70 {
            later += s.step(16.0).sound_cues;
        }
        assert_eq!(later, 1);
    }

    #[test]
    fn explosion_spawns_configured_count() {
        let mut s = sim(3);
        s.explode(10.0, 10.0, [0, 255, 0], false);
        assert_eq!(s.particles.len(), 100);
        for p in &s.particles {
            assert_eq!(p.life, p.max_life);
            assert!(p.life >= 60.0 && p.life < 90.0);
        }
    }

    #[test]
    fn circle_pattern_spreads_evenly() {
        let mut rng = fastrand::Rng::with_seed(0);
        let a = ExplosionPattern::Circle.angle(25, 100, &mut rng);
        assert!((a - TAU / 4.0).abs() < 1e-9);
    }

    #[test]
    fn star_pattern_stays_near_its_ray() {
        let mut rng = fastrand::Rng::with_seed(9);
        for i in 0..80 {
            let a = ExplosionPattern::Star.angle(i, 80, &mut rng);
            let ray = (i / 10) as f64 * PI / 4.0;
            assert!((a - ray).abs() <= 0.25);
        }
    }

    #[test]
    fn cap_discards_oldest() {
        let mut cfg = FireworksConfig::default();
        cfg.particle_cap = 100;
        let mut s = FireworksSim::new(cfg, 800.0, 600.0, fastrand::Rng::with_seed(4));
        s.explode(1.0, 1.0, [255, 255, 255], false);
        s.explode(500.0, 500.0, [255, 255, 255], false);
        s.step(16.0);
        assert_eq!(s.particles.len(), 100);
        // The survivors all come from the second explosion.
        assert!(s.particles.iter().all(|p| p.x > 100.0));
    }

    #[test]
    fn steady_auto_launch_fires_three_to_five() {
        let mut s = sim(5);
        let mut launched = 0;
        // One salvo at 1000 ms, staggered 100 ms; stop before the next salvo.
        for _ in 0..(1900 / 10) {
            launched += s.step(10.0).launched;
        }
        assert!((3..=5).contains(&launched), "launched {launched}");
    }

    #[test]
    fn intensify_and_reset_switch_modes() {
        let mut s = sim(6);
        s.intensify();
        assert_eq!(s.mode(), LaunchMode::Intensified);
        let mut launched = 0;
        for _ in 0..(950 / 10) {
            launched += s.step(10.0).launched;
        }
        // Salvo at 500 ms of 5..=8, 80 ms apart, fully fired by 1060 ms at most.
        assert!(launched >= 5, "launched {launched}");
        s.reset_auto_launch();
        assert_eq!(s.mode(), LaunchMode::Steady);
    }

    #[test]
    fn queued_salvo_fires_on_schedule() {
        let mut s = sim(7);
        s.set_auto_launch(false);
        s.queue_salvo(5, 200.0, false);
        assert_eq!(s.step(0.0).launched, 1);
        assert_eq!(s.step(199.0).launched, 0);
        assert_eq!(s.step(1.0).launched, 1);
        assert_eq!(s.step(600.0).launched, 3);
        assert_eq!(s.pending_launches(), 0);
    }

    #[test]
    fn ember_burst_falls_and_fades() {
        let mut s = sim(8);
        s.set_auto_launch(false);
        s.ember_burst(100.0, 100.0, 15, [0xec, 0xc9, 0x4b]);
        assert_eq!(s.particles.len(), 15);
        for _ in 0..101 {
            s.step(16.0);
        }
        assert!(s.particles.is_empty());
    }

    proptest! {
        #[test]
        fn radius_never_grows_and_hits_zero_only_at_expiry(seed in 0u64..500) {
            let mut s = sim(seed);
            s.explode(400.0, 300.0, [255, 192, 203], seed % 2 == 0);
            for p in s.particles.iter() {
                let mut p = p.clone();
                let mut prev = p.radius();
                while !p.is_dead() {
                    p.step();
                    let r = p.radius();
                    prop_assert!(r <= prev + 1e-12);
                    if r <= 0.0 {
                        prop_assert!(p.life <= 0.0);
                    }
                    prev = r;
                }
                prop_assert_eq!(p.radius(), 0.0);
            }
        }

        #[test]
        fn particle_count_never_exceeds_cap(cap in 1usize..400, bursts in 1usize..6) {
            let mut cfg = FireworksConfig::default();
            cfg.particle_cap = cap;
            let mut s = FireworksSim::new(cfg, 800.0, 600.0, fastrand::Rng::with_seed(cap as u64));
            for b in 0..bursts {
                s.explode(b as f64 * 10.0, 50.0, [255, 0, 0], false);
                s.step(16.0);
                prop_assert!(s.particles.len() <= cap);
            }
        }
    }
}
