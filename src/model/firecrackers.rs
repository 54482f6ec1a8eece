//! Rising firecracker glyphs that pop into a short-lived explosion glyph.

use crate::util::rand_between;

pub const CRACKER_GLYPHS: [&str; 4] = ["🧨", "🎇", "🎆", "✨"];
pub const EXPLOSION_GLYPHS: [&str; 4] = ["💥", "✨", "🎇", "🎆"];
pub const CRACKER_COLORS: [&str; 7] = [
    "#ff0000", "#ff6600", "#ffff00", "#00ff00", "#00ffff", "#0000ff", "#ff00ff",
];
/// Live crackers plus explosions; spawns beyond this are dropped.
pub const MAX_LIVE: usize = 100;
const CRACKER_LIFETIME_MS: f64 = 4000.0;
const EXPLOSION_LIFETIME_MS: f64 = 1000.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Firecracker {
    pub id: u64,
    pub glyph: &'static str,
    pub color: &'static str,
    pub x: f64,
    pub start_y: f64,
    pub end_y: f64,
    pub size_px: f64,
    pub duration_s: f64,
    pub rotation_deg: f64,
    pub spawned_ms: f64,
    pub explode_at_ms: f64,
    pub exploded: bool,
}

impl Firecracker {
    pub fn style(&self) -> String {
        format!(
            "left:{:.0}px; top:{:.0}px; font-size:{:.0}px; color:{c}; text-shadow:0 0 10px {c}, 0 0 20px {c}; animation-duration:{:.2}s; --end-y:{:.0}px; --rotation-speed:{:.0}deg;",
            self.x,
            self.start_y,
            self.size_px,
            self.duration_s,
            self.end_y - self.start_y,
            self.rotation_deg,
            c = self.color,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Burst {
    pub id: u64,
    pub glyph: &'static str,
    pub color: &'static str,
    pub x: f64,
    pub y: f64,
    pub size_px: f64,
    pub spawned_ms: f64,
}

impl Burst {
    pub fn style(&self) -> String {
        format!(
            "left:{:.0}px; top:{:.0}px; font-size:{:.0}px; color:{c}; text-shadow:0 0 20px {c}, 0 0 40px {c};",
            self.x,
            self.y,
            self.size_px,
            c = self.color,
        )
    }
}

pub struct FirecrackerField {
    pub crackers: Vec<Firecracker>,
    pub bursts: Vec<Burst>,
    next_id: u64,
    rng: fastrand::Rng,
}

impl FirecrackerField {
    pub fn new(rng: fastrand::Rng) -> Self {
        Self {
            crackers: Vec::new(),
            bursts: Vec::new(),
            next_id: 0,
            rng,
        }
    }

    pub fn live(&self) -> usize {
        self.crackers.len() + self.bursts.len()
    }

    /// Changes whenever a glyph is added or removed.
    pub fn revision(&self) -> (u64, usize) {
        (self.next_id, self.live())
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Returns false when the field is full and the spawn was dropped.
    pub fn spawn(&mut self, now_ms: f64, width: f64, height: f64) -> bool {
        if self.live() >= MAX_LIVE {
            return false;
        }
        let id = self.next_id();
        let rng = &mut self.rng;
        let cracker = Firecracker {
            id,
            glyph: CRACKER_GLYPHS[rng.usize(..CRACKER_GLYPHS.len())],
            color: CRACKER_COLORS[rng.usize(..CRACKER_COLORS.len())],
            x: rng.f64() * width,
            start_y: height + 50.0,
            end_y: rng.f64() * height * 0.4 + height * 0.05,
            size_px: rand_between(rng, 15.0, 40.0),
            duration_s: rand_between(rng, 2.0, 4.0),
            rotation_deg: rand_between(rng, -10.0, 10.0),
            spawned_ms: now_ms,
            explode_at_ms: now_ms + rand_between(rng, 2000.0, 3000.0),
            exploded: false,
        };
        self.crackers.push(cracker);
        true
    }

    /// Pops due crackers and expires old glyphs. Returns whether anything changed.
    pub fn step(&mut self, now_ms: f64) -> bool {
        let mut new_bursts = Vec::new();
        for c in self.crackers.iter_mut().filter(|c| !c.exploded) {
            if now_ms >= c.explode_at_ms {
                c.exploded = true;
                new_bursts.push((c.x, c.end_y, c.color));
            }
        }
        let changed = !new_bursts.is_empty();
        for (x, y, color) in new_bursts {
            let id = self.next_id();
            let glyph = EXPLOSION_GLYPHS[self.rng.usize(..EXPLOSION_GLYPHS.len())];
            let size_px = rand_between(&mut self.rng, 30.0, 70.0);
            self.bursts.push(Burst {
                id,
                glyph,
                color,
                x,
                y,
                size_px,
                spawned_ms: now_ms,
            });
        }
        let before = self.live();
        self.crackers
            .retain(|c| now_ms - c.spawned_ms < CRACKER_LIFETIME_MS);
        self.bursts
            .retain(|b| now_ms - b.spawned_ms < EXPLOSION_LIFETIME_MS);
        changed || self.live() != before
    }

    pub fn clear(&mut self) {
        self.crackers.clear();
        self.bursts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cracker_explodes_once_then_expires() {
        let mut f = FirecrackerField::new(fastrand::Rng::with_seed(1));
        assert!(f.spawn(0.0, 800.0, 600.0));
        let c = f.crackers[0].clone();
        assert!(c.start_y > 600.0);
        assert!(c.end_y >= 30.0 && c.end_y < 270.0);
        assert!(!f.step(1000.0));
        assert!(f.step(3000.0));
        assert_eq!(f.bursts.len(), 1);
        assert_eq!(f.bursts[0].y, c.end_y);
        f.step(3100.0);
        assert_eq!(f.bursts.len(), 1);
        f.step(4000.0);
        assert!(f.crackers.is_empty());
        assert!(f.bursts.is_empty());
    }

    #[test]
    fn spawns_are_capped() {
        let mut f = FirecrackerField::new(fastrand::Rng::with_seed(2));
        for _ in 0..MAX_LIVE {
            assert!(f.spawn(0.0, 800.0, 600.0));
        }
        let rev = f.revision();
        assert!(!f.spawn(0.0, 800.0, 600.0));
        assert_eq!(f.live(), MAX_LIVE);
        assert_eq!(f.revision(), rev);
    }
}
