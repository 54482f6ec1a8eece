//! Short synthesized "pop" played when fireworks launch or explode.
//!
//! Browsers only allow audio after a user gesture, so the context is created
//! lazily by [`ToneSynth::unlock`] from the first click.

use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioContextState, AudioScheduledSourceNode, OscillatorType};

use crate::config::SoundConfig;
use crate::error::{SiteError, SiteResult};
use crate::util::rand_between;

const ATTACK_S: f64 = 0.01;
const PEAK_SCALE: f64 = 0.3;
/// Exponential ramps cannot reach zero.
const FLOOR_GAIN: f64 = 0.001;

/// Gain envelope of a single tone, in seconds relative to its start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneEnvelope {
    pub frequency: f64,
    pub peak: f64,
    pub attack_s: f64,
    pub release_s: f64,
}

impl ToneEnvelope {
    pub fn for_config(cfg: &SoundConfig, rng: &mut fastrand::Rng) -> Self {
        Self {
            frequency: rand_between(rng, cfg.min_frequency, cfg.max_frequency),
            peak: cfg.volume * PEAK_SCALE,
            attack_s: ATTACK_S,
            release_s: (cfg.duration_ms as f64 / 1000.0).max(ATTACK_S),
        }
    }
}

fn js_err(context: &str, e: JsValue) -> SiteError {
    SiteError::Audio(format!("{context}: {e:?}"))
}

pub struct ToneSynth {
    cfg: SoundConfig,
    ctx: Option<AudioContext>,
    rng: fastrand::Rng,
}

impl ToneSynth {
    pub fn new(cfg: SoundConfig, rng: fastrand::Rng) -> Self {
        Self {
            cfg,
            ctx: None,
            rng,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.ctx.is_some()
    }

    /// Creates the audio context. Call from a user gesture.
    pub fn unlock(&mut self) {
        if !self.cfg.enabled || self.ctx.is_some() {
            return;
        }
        match AudioContext::new() {
            Ok(ctx) => {
                log::debug!("audio unlocked");
                self.ctx = Some(ctx);
            }
            Err(e) => log::warn!("{}", js_err("AudioContext", e)),
        }
    }

    /// Plays one tone; failures are logged and the tone skipped.
    pub fn play(&mut self) {
        if !self.cfg.enabled {
            return;
        }
        let Some(ctx) = self.ctx.as_ref() else {
            return;
        };
        let env = ToneEnvelope::for_config(&self.cfg, &mut self.rng);
        if let Err(e) = play_tone(ctx, env) {
            log::warn!("{e}");
        }
    }
}

fn play_tone(ctx: &AudioContext, env: ToneEnvelope) -> SiteResult<()> {
    if ctx.state() == AudioContextState::Suspended {
        ctx.resume().map_err(|e| js_err("resume", e))?;
    }
    let osc = ctx
        .create_oscillator()
        .map_err(|e| js_err("create_oscillator", e))?;
    let gain = ctx.create_gain().map_err(|e| js_err("create_gain", e))?;
    osc.set_type(OscillatorType::Sine);
    let now = ctx.current_time();
    osc.frequency()
        .set_value_at_time(env.frequency as f32, now)
        .map_err(|e| js_err("frequency", e))?;
    let g = gain.gain();
    g.set_value_at_time(0.0, now)
        .and_then(|p| p.linear_ramp_to_value_at_time(env.peak as f32, now + env.attack_s))
        .and_then(|p| p.exponential_ramp_to_value_at_time(FLOOR_GAIN as f32, now + env.release_s))
        .map_err(|e| js_err("envelope", e))?;
    osc.connect_with_audio_node(&gain)
        .and_then(|_| gain.connect_with_audio_node(&ctx.destination()))
        .map_err(|e| js_err("connect", e))?;
    let source: &AudioScheduledSourceNode = &osc;
    source
        .start_with_when(now)
        .and_then(|_| source.stop_with_when(now + env.release_s))
        .map_err(|e| js_err("start", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_follows_config() {
        let cfg = SoundConfig::default();
        let mut rng = fastrand::Rng::with_seed(5);
        for _ in 0..50 {
            let env = ToneEnvelope::for_config(&cfg, &mut rng);
            assert!((80.0..120.0).contains(&env.frequency));
            assert!((env.peak - 0.15).abs() < 1e-12);
            assert_eq!(env.attack_s, 0.01);
            assert!((env.release_s - 0.3).abs() < 1e-12);
        }
    }

    #[test]
    fn disabled_synth_stays_locked() {
        let cfg = SoundConfig {
            enabled: false,
            ..SoundConfig::default()
        };
        let mut synth = ToneSynth::new(cfg, fastrand::Rng::with_seed(1));
        synth.unlock();
        synth.play();
        assert!(!synth.is_unlocked());
    }
}
