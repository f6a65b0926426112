use image::{Rgb, RgbImage};

use crate::config::ScanWindow;
use crate::error::EnvelopeError;

/// Mesure d'une colonne contenant de l'encre
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub column: u32,
    pub time: f64,
    /// Longueur du premier segment continu de pixels non-fond
    pub amplitude: u32,
}

#[derive(Clone, Debug, Default)]
pub struct ScanOutcome {
    pub measurements: Vec<Measurement>,
    pub columns_scanned: u32,
    pub max_amplitude: u32,
    pub sum_amplitude: u64,
}

/// Parcourt la fenêtre colonne par colonne, sans modifier l'image
pub struct EnvelopeScanner {
    pub window: ScanWindow,
    /// Seul le canal rouge sert au test de fond
    pub background: [u8; 3],
}

impl EnvelopeScanner {
    pub fn new(window: ScanWindow, background: [u8; 3]) -> Self {
        Self { window, background }
    }

    /// `duration * time_scale` donne l'étendue de l'axe temporel sur la largeur de la fenêtre
    pub fn scan(&self, image: &RgbImage, duration: f64, time_scale: f64) -> Result<ScanOutcome, EnvelopeError> {
        let w = self.window;
        if w.x_start > w.x_end || w.y_start > w.y_end || w.x_end > image.width() || w.y_end > image.height() {
            return Err(EnvelopeError::ScanWindowOutOfBounds {
                x_start: w.x_start,
                x_end: w.x_end,
                y_start: w.y_start,
                y_end: w.y_end,
                width: image.width(),
                height: image.height(),
            });
        }

        let span = duration * time_scale;
        let width = w.width() as f64;
        let mut outcome = ScanOutcome { columns_scanned: w.width(), ..ScanOutcome::default() };

        for column in w.x_start..w.x_end {
            let Some(amplitude) = self.column_run(image, column) else {
                continue;
            };
            outcome.max_amplitude = outcome.max_amplitude.max(amplitude);
            outcome.sum_amplitude += amplitude as u64;
            outcome.measurements.push(Measurement {
                column,
                time: (column - w.x_start) as f64 / width * span,
                amplitude,
            });
        }

        Ok(outcome)
    }

    /// Longueur du segment qui commence au premier pixel non-fond ; `None` si la colonne est vide
    fn column_run(&self, image: &RgbImage, column: u32) -> Option<u32> {
        let start = (self.window.y_start..self.window.y_end).find(|&y| !self.is_background(image.get_pixel(column, y)))?;
        let run = (start..self.window.y_end)
            .take_while(|&y| !self.is_background(image.get_pixel(column, y)))
            .count();
        Some(run as u32)
    }

    fn is_background(&self, pixel: &Rgb<u8>) -> bool {
        pixel.0[0] == self.background[0]
    }
}
