//! Site configuration: compiled-in defaults plus an optional JSON override
//! embedded in the page as `<script id="site-config" type="application/json">`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use web_sys::Document;

use crate::error::ConfigError;
use crate::model::wishes::Wish;

pub const CONFIG_ELEMENT_ID: &str = "site-config";
pub const TARGET_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub type Rgb = [u8; 3];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub fireworks: FireworksConfig,
    pub countdown: CountdownConfig,
    pub sound: SoundConfig,
    pub wishes: WishesConfig,
    pub decorations: DecorationsConfig,
    pub snowfall: SnowfallConfig,
    pub gallery: GalleryConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworksConfig {
    pub colors: Vec<Rgb>,
    pub launch_interval_ms: u32,
    pub particle_count: u32,
    pub min_speed: f64,
    pub max_speed: f64,
    /// Base particle lifetime in frames.
    pub particle_lifetime: f64,
    /// Color multiplier for click-launched fireworks.
    pub manual_brightness: f64,
    pub particle_cap: usize,
    /// Per-frame velocity multiplier.
    pub drag: f64,
}

impl Default for FireworksConfig {
    fn default() -> Self {
        Self {
            colors: vec![
                [255, 0, 0],
                [0, 255, 0],
                [0, 0, 255],
                [255, 255, 0],
                [255, 0, 255],
                [0, 255, 255],
                [255, 165, 0],
                [255, 192, 203],
            ],
            launch_interval_ms: 1000,
            particle_count: 100,
            min_speed: 1.0,
            max_speed: 5.0,
            particle_lifetime: 60.0,
            manual_brightness: 2.0,
            particle_cap: 1500,
            drag: 0.99,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountdownConfig {
    /// Local time, `YYYY-MM-DDTHH:MM:SS`.
    pub target_date: String,
    pub update_interval_ms: u32,
    pub title: String,
    pub completed_title: String,
    pub completed_lines: Vec<String>,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            target_date: "2026-01-01T00:00:00".to_string(),
            update_interval_ms: 1000,
            title: "2025 → 2026".to_string(),
            completed_title: "🎉 新年快乐！ 🎉".to_string(),
            completed_lines: vec![
                "2025 → 2026".to_string(),
                "愿你在新的一年里万事如意！".to_string(),
            ],
        }
    }
}

impl CountdownConfig {
    pub fn target(&self) -> Result<NaiveDateTime, ConfigError> {
        NaiveDateTime::parse_from_str(&self.target_date, TARGET_DATE_FORMAT).map_err(|e| {
            ConfigError::TargetDate {
                value: self.target_date.clone(),
                reason: e.to_string(),
            }
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub enabled: bool,
    pub volume: f64,
    pub min_frequency: f64,
    pub max_frequency: f64,
    pub duration_ms: u32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.5,
            min_frequency: 80.0,
            max_frequency: 120.0,
            duration_ms: 300,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WishesConfig {
    pub show_on_load: bool,
    pub delay_ms: u32,
    pub wishes: Vec<Wish>,
    /// Greeting shown after the countdown completes.
    pub special: Wish,
}

impl Default for WishesConfig {
    fn default() -> Self {
        Self {
            show_on_load: true,
            delay_ms: 3000,
            wishes: vec![
                Wish::new("新年快乐！", "愿2026年带给你无尽的欢乐与幸福！", "🎉", "#ff0080"),
                Wish::new(
                    "Happy New Year!",
                    "Wishing you prosperity and joy in 2026!",
                    "🎊",
                    "#00c3ff",
                ),
                Wish::new("新年吉祥！", "身体健康，万事如意，财源滚滚！", "💰", "#ffd700"),
                Wish::new("新年快乐！", "新的一年，新的开始，新的希望！", "🌟", "#00ff88"),
            ],
            special: Wish::new(
                "新年快乐！🎉",
                "2025已经过去，2026年正式来临！\n愿你在新的一年里梦想成真，万事如意！",
                "🎇",
                "#ff0080",
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationsConfig {
    pub show_snowfall: bool,
    pub show_decorations: bool,
    /// Run the celebration cascade when the countdown completes.
    pub celebration_mode: bool,
}

impl Default for DecorationsConfig {
    fn default() -> Self {
        Self {
            show_snowfall: true,
            show_decorations: true,
            celebration_mode: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowfallConfig {
    pub count: usize,
    pub size_range: [f64; 2],
    pub speed_range: [f64; 2],
    pub wind_force: f64,
}

impl Default for SnowfallConfig {
    fn default() -> Self {
        Self {
            count: 100,
            size_range: [1.0, 8.0],
            speed_range: [1.0, 5.0],
            wind_force: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Name,
    Random,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub allowed_extensions: Vec<String>,
    pub fallback_color: String,
    pub sort_order: SortOrder,
    /// Manually maintained; the browser cannot list a directory.
    pub images: Vec<String>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: vec![".jpg".into(), ".jpeg".into(), ".png".into()],
            fallback_color: "#333333".to_string(),
            sort_order: SortOrder::Name,
            images: (1..=13).map(|i| format!("gallery/{i}.jpg")).collect(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: SiteConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::Json(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads the embedded override if the page has one. Any problem is logged
    /// and the defaults are used instead.
    pub fn load(document: &Document) -> Self {
        let Some(el) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
            log::debug!("no #{CONFIG_ELEMENT_ID} element, using default config");
            return Self::default();
        };
        let raw = el.text_content().unwrap_or_default();
        match Self::from_json(&raw) {
            Ok(cfg) => {
                log::info!("loaded config override from #{CONFIG_ELEMENT_ID}");
                cfg
            }
            Err(e) => {
                log::error!("{e}; falling back to default config");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fw = &self.fireworks;
        if fw.colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        check_range("fireworks.speed", fw.min_speed, fw.max_speed)?;
        if fw.particle_cap == 0 {
            return Err(ConfigError::Zero("fireworks.particle_cap"));
        }
        if fw.launch_interval_ms == 0 {
            return Err(ConfigError::Zero("fireworks.launch_interval_ms"));
        }
        if self.countdown.update_interval_ms == 0 {
            return Err(ConfigError::Zero("countdown.update_interval_ms"));
        }
        self.countdown.target()?;
        let snow = &self.snowfall;
        check_range("snowfall.size_range", snow.size_range[0], snow.size_range[1])?;
        check_range("snowfall.speed_range", snow.speed_range[0], snow.speed_range[1])?;
        let sound = &self.sound;
        check_range("sound.frequency", sound.min_frequency, sound.max_frequency)?;
        if !(0.0..=1.0).contains(&sound.volume) {
            return Err(ConfigError::Volume(sound.volume));
        }
        Ok(())
    }
}

fn check_range(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min > max {
        Err(ConfigError::InvertedRange { field, min, max })
    } else {
        Ok(())
    }
}
