use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PulseError;

/// Couleur `RRGGBB` lue depuis une chaîne hexadécimale
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct HexColor(pub [u8; 3]);

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            let digits = hex
                .get(range)
                .ok_or_else(|| format!("couleur {:?} : 6 chiffres hexadécimaux attendus", value))?;
            u8::from_str_radix(digits, 16).map_err(|e| format!("couleur {:?} : {}", value, e))
        };
        Ok(HexColor([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
    }
}

/// Paramètres du rendu des pulsations, un champ par clé du fichier JSON
#[derive(Clone, Debug, Deserialize)]
pub struct PulseConfig {
    pub render_width: u32,
    pub render_height: u32,
    pub leading_frames: u32,
    pub trailing_frames: u32,
    pub color_circle: HexColor,
    pub color_background: HexColor,
    pub use_background: bool,
    pub color_overlay: HexColor,
    pub use_overlay: bool,
    /// Décroissance de l'opacité des cercles à chaque frame
    pub circle_decay_rate: f32,
    /// Croissance du rayon des cercles à chaque frame
    pub circle_growth_rate: f32,
    pub overlay_radius_decay_rate: f32,
    pub overlay_opacity_decay_rate: f32,
    pub overlay_radius_growth_rate: f32,
    /// Part d'aléa appliquée aux taux de croissance et de décroissance
    pub circle_chaos: f32,
    /// Seuil sous lequel aucune émission n'a lieu
    pub audio_amplitude_floor: f64,
    /// Amplitude à laquelle l'opacité plafonne
    pub audio_amplitude_roof: f64,
    pub smoothing_amount: u32,
    pub use_smoothing: bool,
    pub circle_radius_min: f32,
    pub overlay_radius_max: f32,
    pub overlay_radius_min: f32,
    pub overlay_opacity_floor: f32,
    pub stroke_circle: f32,
    pub data_path: PathBuf,
}

impl PulseConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PulseError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|source| PulseError::ConfigRead { path: path.to_path_buf(), source })?;
        let config: PulseConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PulseError> {
        if self.render_width == 0 || self.render_height == 0 {
            return Err(PulseError::InvalidProperty {
                field: "render_width/render_height",
                reason: format!("{}x{}", self.render_width, self.render_height),
            });
        }
        if self.audio_amplitude_roof.is_nan() || self.audio_amplitude_roof <= 0.0 {
            return Err(PulseError::InvalidProperty {
                field: "audio_amplitude_roof",
                reason: format!("doit être positif, reçu {}", self.audio_amplitude_roof),
            });
        }
        if self.circle_chaos < 0.0 {
            return Err(PulseError::InvalidProperty {
                field: "circle_chaos",
                reason: format!("doit être positif ou nul, reçu {}", self.circle_chaos),
            });
        }
        if !(0.0..=1.0).contains(&self.overlay_opacity_floor) {
            return Err(PulseError::InvalidProperty {
                field: "overlay_opacity_floor",
                reason: format!("hors de [0, 1] : {}", self.overlay_opacity_floor),
            });
        }
        Ok(())
    }

    /// Centre du rendu, en pixels entiers
    pub fn center(&self) -> (f32, f32) {
        ((self.render_width / 2) as f32, (self.render_height / 2) as f32)
    }
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            render_width: 1080,
            render_height: 1080,
            leading_frames: 15,
            trailing_frames: 60,
            color_circle: HexColor([0xff, 0xff, 0xff]),
            color_background: HexColor([0x10, 0x10, 0x18]),
            use_background: true,
            color_overlay: HexColor([0xff, 0xff, 0xff]),
            use_overlay: true,
            circle_decay_rate: 0.93,
            circle_growth_rate: 1.02,
            overlay_radius_decay_rate: 0.97,
            overlay_opacity_decay_rate: 0.95,
            overlay_radius_growth_rate: 1.1,
            circle_chaos: 0.05,
            audio_amplitude_floor: 0.2,
            audio_amplitude_roof: 1.0,
            smoothing_amount: 1,
            use_smoothing: true,
            circle_radius_min: 100.0,
            overlay_radius_max: 140.0,
            overlay_radius_min: 100.0,
            overlay_opacity_floor: 0.05,
            stroke_circle: 2.0,
            data_path: PathBuf::from("data.json"),
        }
    }
}
