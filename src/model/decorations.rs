//! Timers behind the decorative ornaments: knot swing, lantern flicker and
//! dragon sway, plus the scroll-reveal and New Year's Day checks.

use chrono::{Datelike, NaiveDate};

use crate::util::rand_between;

pub const SWING_TICK_MS: u32 = 100;
pub const FLICKER_TICK_MS: u32 = 500;
pub const SWAY_TICK_MS: u32 = 3000;
/// Elements reveal once their top edge passes this fraction of the viewport.
pub const REVEAL_FRACTION: f64 = 0.8;
pub const NEW_YEARS_DAY_WISH_DELAY_MS: u32 = 1000;
pub const BUTTON_BURST_COUNT: u32 = 15;
pub const BUTTON_BURST_COLOR: &str = "#ECC94B";

const SWING_LIMIT_DEG: f64 = 10.0;
const SWING_STEP_DEG: f64 = 0.5;

/// Pendulum for the hanging knot: walks ±10° in half-degree steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Swing {
    pub angle_deg: f64,
    direction: f64,
}

impl Default for Swing {
    fn default() -> Self {
        Self {
            angle_deg: 0.0,
            direction: 1.0,
        }
    }
}

impl Swing {
    pub fn tick(&mut self) -> f64 {
        self.angle_deg += SWING_STEP_DEG * self.direction;
        if self.angle_deg.abs() >= SWING_LIMIT_DEG {
            self.angle_deg = SWING_LIMIT_DEG * self.direction;
            self.direction = -self.direction;
        }
        self.angle_deg
    }

    pub fn transform(&self) -> String {
        format!("rotate({:.1}deg)", self.angle_deg)
    }
}

pub fn lantern_brightness(rng: &mut fastrand::Rng) -> f64 {
    rand_between(rng, 0.8, 1.2)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragonPose {
    pub scale: f64,
    pub rotation_deg: f64,
}

impl Default for DragonPose {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation_deg: 0.0,
        }
    }
}

impl DragonPose {
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self {
            scale: rand_between(rng, 0.95, 1.05),
            rotation_deg: rand_between(rng, -2.0, 2.0),
        }
    }

    pub fn transform(&self) -> String {
        format!(
            "scale({:.3}) rotate({:.2}deg)",
            self.scale, self.rotation_deg
        )
    }
}

pub fn is_revealed(element_top: f64, viewport_height: f64) -> bool {
    element_top < viewport_height * REVEAL_FRACTION
}

pub fn is_new_years_day(date: NaiveDate) -> bool {
    date.month() == 1 && date.day() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swing_turns_at_the_limits() {
        let mut s = Swing::default();
        let angles: Vec<f64> = (0..80).map(|_| s.tick()).collect();
        assert_eq!(angles[19], 10.0);
        assert_eq!(angles[20], 9.5);
        assert_eq!(angles[59], -10.0);
        assert_eq!(angles[60], -9.5);
        assert!(angles.iter().all(|a| a.abs() <= 10.0));
    }

    #[test]
    fn random_ornaments_stay_in_range() {
        let mut rng = fastrand::Rng::with_seed(4);
        for _ in 0..200 {
            let b = lantern_brightness(&mut rng);
            assert!((0.8..1.2).contains(&b));
            let d = DragonPose::random(&mut rng);
            assert!((0.95..1.05).contains(&d.scale));
            assert!((-2.0..2.0).contains(&d.rotation_deg));
        }
    }

    #[test]
    fn reveal_threshold() {
        assert!(is_revealed(100.0, 1000.0));
        assert!(!is_revealed(800.0, 1000.0));
        assert!(!is_revealed(950.0, 1000.0));
    }

    #[test]
    fn new_years_day() {
        let jan1 = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let jan2 = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        assert!(is_new_years_day(jan1));
        assert!(!is_new_years_day(jan2));
    }
}
