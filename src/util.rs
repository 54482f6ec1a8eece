// Small helpers shared by the models and the canvas layers.

use crate::config::Rgb;

/// Two-digit zero padding; values of 100 and above print in full.
pub fn format_two_digits(n: u64) -> String {
    format!("{:02}", n)
}

/// Uniform sample in `min..max`.
pub fn rand_between(rng: &mut fastrand::Rng, min: f64, max: f64) -> f64 {
    min + rng.f64() * (max - min)
}

/// Symmetric jitter in `-half..half`.
pub fn jitter(rng: &mut fastrand::Rng, half: f64) -> f64 {
    (rng.f64() - 0.5) * 2.0 * half
}

pub fn css_rgb(c: Rgb) -> String {
    format!("rgb({}, {}, {})", c[0], c[1], c[2])
}

pub fn css_rgba(c: Rgb, alpha: f64) -> String {
    format!("rgba({}, {}, {}, {:.3})", c[0], c[1], c[2], alpha.clamp(0.0, 1.0))
}

/// Parses `#rrggbb`; anything else yields white.
pub fn parse_hex_color(hex: &str) -> Rgb {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 || !h.is_ascii() {
        return [255, 255, 255];
    }
    let ch = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).unwrap_or(255);
    [ch(0), ch(2), ch(4)]
}

/// Current viewport size in CSS pixels.
pub fn viewport_size() -> (f64, f64) {
    let Some(win) = web_sys::window() else {
        return (800.0, 600.0);
    };
    let w = win
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    let h = win
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(600.0);
    (w, h)
}

pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_single_digits() {
        assert_eq!(format_two_digits(0), "00");
        assert_eq!(format_two_digits(7), "07");
        assert_eq!(format_two_digits(42), "42");
        assert_eq!(format_two_digits(365), "365");
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#ECC94B"), [0xec, 0xc9, 0x4b]);
        assert_eq!(parse_hex_color("nope"), [255, 255, 255]);
    }

    #[test]
    fn rand_between_stays_in_range() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..1000 {
            let v = rand_between(&mut rng, 2.0, 5.0);
            assert!((2.0..5.0).contains(&v));
            let j = jitter(&mut rng, 0.25);
            assert!((-0.25..0.25).contains(&j));
        }
    }
}
