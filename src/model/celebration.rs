//! The celebratory cascade run when the countdown completes, laid out as a
//! timeline of events up front and replayed against elapsed time.

use std::collections::VecDeque;

pub const OPENING_LAUNCHES: u32 = 80;
pub const OPENING_SPACING_MS: f64 = 50.0;
pub const CONTINUOUS_PERIOD_MS: f64 = 600.0;
pub const CONTINUOUS_LAUNCHES: u32 = 8;
pub const FIREWORKS_DURATION_MS: f64 = 90_000.0;
pub const OPENING_FIRECRACKERS: u32 = 50;
pub const FIRECRACKER_SPACING_MS: f64 = 100.0;
pub const FIRECRACKER_PERIOD_MS: f64 = 800.0;
pub const FIRECRACKER_GROUP_SPACING_MS: f64 = 50.0;
pub const FIRECRACKERS_DURATION_MS: f64 = 60_000.0;
pub const SNOW_FACTOR: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CascadeEvent {
    IntensifyFireworks,
    /// `n` manual launches at random points.
    Launch(u32),
    Firecracker,
    IntensifySnow(usize),
    RestoreFireworks,
}

#[derive(Clone, Debug)]
pub struct Cascade {
    timeline: VecDeque<(f64, CascadeEvent)>,
    elapsed_ms: f64,
}

impl Cascade {
    pub fn new(rng: &mut fastrand::Rng) -> Self {
        let mut events: Vec<(f64, CascadeEvent)> = vec![
            (0.0, CascadeEvent::IntensifyFireworks),
            (0.0, CascadeEvent::IntensifySnow(SNOW_FACTOR)),
        ];
        for i in 0..OPENING_LAUNCHES {
            events.push((i as f64 * OPENING_SPACING_MS, CascadeEvent::Launch(1)));
        }
        let mut t = CONTINUOUS_PERIOD_MS;
        while t < FIREWORKS_DURATION_MS {
            events.push((t, CascadeEvent::Launch(CONTINUOUS_LAUNCHES)));
            t += CONTINUOUS_PERIOD_MS;
        }
        for i in 0..OPENING_FIRECRACKERS {
            events.push((i as f64 * FIRECRACKER_SPACING_MS, CascadeEvent::Firecracker));
        }
        let mut t = FIRECRACKER_PERIOD_MS;
        while t < FIRECRACKERS_DURATION_MS {
            for k in 0..rng.u32(3..=5) {
                events.push((
                    t + k as f64 * FIRECRACKER_GROUP_SPACING_MS,
                    CascadeEvent::Firecracker,
                ));
            }
            t += FIRECRACKER_PERIOD_MS;
        }
        events.push((FIREWORKS_DURATION_MS, CascadeEvent::RestoreFireworks));
        // Stable sort keeps same-time events in insertion order.
        events.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self {
            timeline: events.into(),
            elapsed_ms: 0.0,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn is_finished(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Everything due by `elapsed + dt_ms`, in timeline order.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<CascadeEvent> {
        self.elapsed_ms += dt_ms;
        let mut due = Vec::new();
        while let Some(&(at, ev)) = self.timeline.front() {
            if at > self.elapsed_ms {
                break;
            }
            self.timeline.pop_front();
            due.push(ev);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cascade() -> Cascade {
        Cascade::new(&mut fastrand::Rng::with_seed(3))
    }

    #[test]
    fn opens_with_intensify_and_first_launch() {
        let mut c = cascade();
        let first = c.advance(0.0);
        assert_eq!(
            &first[..2],
            &[
                CascadeEvent::IntensifyFireworks,
                CascadeEvent::IntensifySnow(3)
            ]
        );
        assert!(first.contains(&CascadeEvent::Launch(1)));
        assert!(first.contains(&CascadeEvent::Firecracker));
    }

    #[test]
    fn opening_burst_is_eighty_launches_in_four_seconds() {
        let mut c = cascade();
        let mut singles = 0;
        for _ in 0..(3_950 / 50 + 1) {
            singles += c
                .advance(if singles == 0 { 0.0 } else { 50.0 })
                .iter()
                .filter(|e| **e == CascadeEvent::Launch(1))
                .count();
        }
        assert_eq!(singles, 80);
    }

    #[test]
    fn restores_fireworks_at_ninety_seconds_and_finishes() {
        let mut c = cascade();
        let mut restored = false;
        let mut volleys = 0;
        while !c.is_finished() {
            for ev in c.advance(100.0) {
                match ev {
                    CascadeEvent::RestoreFireworks => {
                        restored = true;
                        assert!(c.elapsed_ms() >= FIREWORKS_DURATION_MS);
                    }
                    CascadeEvent::Launch(8) => {
                        assert!(!restored);
                        volleys += 1;
                    }
                    CascadeEvent::Firecracker => assert!(c.elapsed_ms() < 61_000.0),
                    _ => {}
                }
            }
        }
        assert!(restored);
        assert_eq!(volleys, 149);
    }

    #[test]
    fn large_step_drains_everything_due() {
        let mut c = cascade();
        let all = c.advance(1_000_000.0);
        assert!(c.is_finished());
        assert_eq!(all.last(), Some(&CascadeEvent::RestoreFireworks));
    }
}
