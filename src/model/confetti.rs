//! One-shot confetti burst shown with the completion greeting. The pieces are
//! rendered as CSS-animated elements; this module only picks their parameters.

use crate::util::rand_between;

pub const CONFETTI_COUNT: usize = 100;
pub const CONFETTI_COLORS: [&str; 5] = ["#ff0080", "#00c3ff", "#ffd700", "#00ff88", "#ffffff"];

#[derive(Clone, Debug, PartialEq)]
pub struct ConfettiPiece {
    pub color: &'static str,
    pub size_px: f64,
    pub rotation_deg: f64,
    pub left_vw: f64,
    pub delay_s: f64,
    pub duration_s: f64,
}

impl ConfettiPiece {
    pub fn style(&self) -> String {
        format!(
            "background-color:{}; width:{:.1}px; height:{:.1}px; left:{:.2}vw; transform:rotate({:.0}deg); animation:confetti-fall {:.2}s linear {:.2}s forwards;",
            self.color,
            self.size_px,
            self.size_px,
            self.left_vw,
            self.rotation_deg,
            self.duration_s,
            self.delay_s
        )
    }

    pub fn ends_at_s(&self) -> f64 {
        self.delay_s + self.duration_s
    }
}

pub fn burst(rng: &mut fastrand::Rng, count: usize) -> Vec<ConfettiPiece> {
    (0..count)
        .map(|_| ConfettiPiece {
            color: CONFETTI_COLORS[rng.usize(..CONFETTI_COLORS.len())],
            size_px: rand_between(rng, 5.0, 15.0),
            rotation_deg: rng.f64() * 360.0,
            left_vw: rng.f64() * 100.0,
            delay_s: rng.f64() * 2.0,
            duration_s: rand_between(rng, 2.0, 5.0),
        })
        .collect()
}

/// Milliseconds until the last piece has landed.
pub fn burst_lifetime_ms(pieces: &[ConfettiPiece]) -> u32 {
    let secs = pieces
        .iter()
        .map(ConfettiPiece::ends_at_s)
        .fold(0.0_f64, f64::max);
    (secs * 1000.0).ceil() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_respects_ranges() {
        let mut rng = fastrand::Rng::with_seed(11);
        let pieces = burst(&mut rng, CONFETTI_COUNT);
        assert_eq!(pieces.len(), 100);
        for p in &pieces {
            assert!((5.0..15.0).contains(&p.size_px));
            assert!((0.0..100.0).contains(&p.left_vw));
            assert!(p.ends_at_s() < 7.0);
        }
        let life = burst_lifetime_ms(&pieces);
        assert!(life > 2000 && life <= 7000);
    }

    #[test]
    fn empty_burst_has_no_lifetime() {
        assert_eq!(burst_lifetime_ms(&[]), 0);
    }
}
