use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::TimeFormat;

#[derive(Serialize, Deserialize, Debug)]
pub struct EnvelopeAnalysis {
    pub metadata: Metadata,
    pub stats: ScanStats,
    pub document: EnvelopeDocument,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Metadata {
    pub file_path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
    pub frame_count: u32,
    pub duration_seconds: f64,
}

/// Statistiques du scan avant normalisation
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ScanStats {
    pub columns_scanned: u32,
    pub entries: usize,
    pub max_amplitude: u32,
    pub sum_amplitude: u64,
    pub average_amplitude: f64,
}

/// Document écrit sur disque : `{"timecodes": [...]}`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct EnvelopeDocument {
    pub timecodes: Vec<Timecode>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Timecode {
    pub time: TimeStamp,
    pub amplitude: f64,
}

/// Le temps est écrit en texte par défaut, en nombre sur demande
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TimeStamp {
    Number(f64),
    Text(String),
}

impl TimeStamp {
    pub fn new(value: f64, format: TimeFormat) -> Self {
        match format {
            TimeFormat::Number => TimeStamp::Number(value),
            TimeFormat::Text => TimeStamp::Text(float_text(value)),
        }
    }

    /// Valeur numérique, `None` si le texte ne représente pas un nombre
    pub fn value(&self) -> Option<f64> {
        match self {
            TimeStamp::Number(v) => Some(*v),
            TimeStamp::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Texte d'un flottant à 12 chiffres significatifs, avec au moins une décimale ("1.0", "0.05")
pub fn float_text(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0.0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (11 - magnitude).max(0) as usize;
    let mut text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').len();
        text.truncate(trimmed);
        if text.ends_with('.') {
            text.push('0');
        }
    } else {
        text.push_str(".0");
    }
    text
}
