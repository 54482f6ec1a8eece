//! Countdown arithmetic and the countdown's lifecycle.

use crate::util::format_two_digits;

pub const SECS_PER_DAY: u64 = 86_400;
pub const SECS_PER_HOUR: u64 = 3_600;
pub const SECS_PER_MINUTE: u64 = 60;
/// How long the digit pulse class stays on an element.
pub const PULSE_MS: u32 = 500;

/// Time left until the target, split into display units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Remaining {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Remaining {
    pub const ZERO: Remaining = Remaining {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Splits `floor(ms / 1000)` into days, hours, minutes and seconds.
    pub fn from_millis(ms: f64) -> Self {
        if !(ms > 0.0) {
            return Self::ZERO;
        }
        let total = (ms / 1000.0).floor() as u64;
        Self {
            days: total / SECS_PER_DAY,
            hours: (total % SECS_PER_DAY) / SECS_PER_HOUR,
            minutes: (total % SECS_PER_HOUR) / SECS_PER_MINUTE,
            seconds: total % SECS_PER_MINUTE,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.days * SECS_PER_DAY
            + self.hours * SECS_PER_HOUR
            + self.minutes * SECS_PER_MINUTE
            + self.seconds
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// `[days, hours, minutes, seconds]`, zero padded.
    pub fn fields(&self) -> [String; 4] {
        [
            format_two_digits(self.days),
            format_two_digits(self.hours),
            format_two_digits(self.minutes),
            format_two_digits(self.seconds),
        ]
    }

    fn changed_since(&self, prev: Option<Remaining>) -> ChangedUnits {
        match prev {
            None => ChangedUnits::ALL,
            Some(p) => ChangedUnits {
                days: p.days != self.days,
                hours: p.hours != self.hours,
                minutes: p.minutes != self.minutes,
                seconds: p.seconds != self.seconds,
            },
        }
    }
}

/// Which displayed units differ from the previous tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChangedUnits {
    pub days: bool,
    pub hours: bool,
    pub minutes: bool,
    pub seconds: bool,
}

impl ChangedUnits {
    pub const ALL: ChangedUnits = ChangedUnits {
        days: true,
        hours: true,
        minutes: true,
        seconds: true,
    };

    pub fn as_array(&self) -> [bool; 4] {
        [self.days, self.hours, self.minutes, self.seconds]
    }
}

/// Grows the display in the final minute and again in the final ten seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Urgency {
    #[default]
    Calm,
    Large,
    Huge,
}

impl Urgency {
    pub fn for_seconds(total: u64) -> Self {
        match total {
            0..=10 => Urgency::Huge,
            11..=60 => Urgency::Large,
            _ => Urgency::Calm,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Urgency::Calm => "",
            Urgency::Large => "countdown-large",
            Urgency::Huge => "countdown-large countdown-huge",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownPhase {
    Idle,
    Running,
    Stopped,
    /// Terminal; reached once per target.
    Completed,
    Disposed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tick {
    Updated {
        remaining: Remaining,
        changed: ChangedUnits,
        urgency: Urgency,
    },
    /// Emitted exactly once, with all-zero fields.
    Completed {
        remaining: Remaining,
        changed: ChangedUnits,
    },
    Suppressed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Countdown {
    target_ms: f64,
    last: Option<Remaining>,
    phase: CountdownPhase,
}

impl Countdown {
    pub fn new(target_ms: f64) -> Self {
        Self {
            target_ms,
            last: None,
            phase: CountdownPhase::Idle,
        }
    }

    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    pub fn target_ms(&self) -> f64 {
        self.target_ms
    }

    pub fn last(&self) -> Option<Remaining> {
        self.last
    }

    pub fn start(&mut self) -> bool {
        match self.phase {
            CountdownPhase::Idle | CountdownPhase::Stopped => {
                self.phase = CountdownPhase::Running;
                true
            }
            _ => false,
        }
    }

    pub fn stop(&mut self) {
        if self.phase == CountdownPhase::Running {
            self.phase = CountdownPhase::Stopped;
        }
    }

    pub fn dispose(&mut self) {
        self.phase = CountdownPhase::Disposed;
    }

    pub fn tick(&mut self, now_ms: f64) -> Tick {
        if self.phase != CountdownPhase::Running {
            return Tick::Suppressed;
        }
        let diff = self.target_ms - now_ms;
        if diff <= 0.0 {
            let changed = Remaining::ZERO.changed_since(self.last);
            self.last = Some(Remaining::ZERO);
            self.phase = CountdownPhase::Completed;
            return Tick::Completed {
                remaining: Remaining::ZERO,
                changed,
            };
        }
        let remaining = Remaining::from_millis(diff);
        let changed = remaining.changed_since(self.last);
        self.last = Some(remaining);
        Tick::Updated {
            remaining,
            changed,
            urgency: Urgency::for_seconds(remaining.total_seconds()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn one_hour_one_minute_one_second() {
        let mut c = Countdown::new(1_000_000.0 + 3_661_000.0);
        c.start();
        match c.tick(1_000_000.0) {
            Tick::Updated { remaining, .. } => {
                assert_eq!(remaining.fields(), ["00", "01", "01", "01"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn completes_exactly_once() {
        let mut c = Countdown::new(5_000.0);
        c.start();
        assert!(matches!(c.tick(4_000.0), Tick::Updated { .. }));
        match c.tick(5_000.0) {
            Tick::Completed { remaining, .. } => assert!(remaining.is_zero()),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(c.phase(), CountdownPhase::Completed);
        assert_eq!(c.tick(6_000.0), Tick::Suppressed);
        assert!(!c.start());
        assert_eq!(c.tick(7_000.0), Tick::Suppressed);
    }

    #[test]
    fn past_target_completes_on_first_tick() {
        let mut c = Countdown::new(0.0);
        c.start();
        assert!(matches!(c.tick(10.0), Tick::Completed { .. }));
    }

    #[test]
    fn idle_and_stopped_ticks_are_suppressed() {
        let mut c = Countdown::new(100_000.0);
        assert_eq!(c.tick(0.0), Tick::Suppressed);
        c.start();
        c.stop();
        assert_eq!(c.phase(), CountdownPhase::Stopped);
        assert_eq!(c.tick(0.0), Tick::Suppressed);
        assert!(c.start());
        assert!(matches!(c.tick(0.0), Tick::Updated { .. }));
        c.dispose();
        assert!(!c.start());
    }

    #[test]
    fn changed_units_track_previous_tick() {
        let mut c = Countdown::new(3_600_000.0 + 500.0);
        c.start();
        let Tick::Updated { changed, .. } = c.tick(0.0) else {
            panic!("expected update")
        };
        assert_eq!(changed, ChangedUnits::ALL);
        // 01:00:00 -> 00:59:59
        let Tick::Updated { changed, .. } = c.tick(1_000.0) else {
            panic!("expected update")
        };
        assert!(!changed.days);
        assert!(changed.hours && changed.minutes && changed.seconds);
        // 00:59:59 -> 00:59:58
        let Tick::Updated { changed, .. } = c.tick(2_000.0) else {
            panic!("expected update")
        };
        assert_eq!(changed.as_array(), [false, false, false, true]);
    }

    #[test]
    fn urgency_thresholds() {
        assert_eq!(Urgency::for_seconds(61), Urgency::Calm);
        assert_eq!(Urgency::for_seconds(60), Urgency::Large);
        assert_eq!(Urgency::for_seconds(11), Urgency::Large);
        assert_eq!(Urgency::for_seconds(10), Urgency::Huge);
    }

    proptest! {
        #[test]
        fn fields_sum_to_floor_and_stay_in_bounds(diff in 1u64..10_000_000_000u64) {
            let r = Remaining::from_millis(diff as f64);
            prop_assert_eq!(r.total_seconds(), diff / 1000);
            prop_assert!(r.hours < 24);
            prop_assert!(r.minutes < 60);
            prop_assert!(r.seconds < 60);
        }
    }
}
