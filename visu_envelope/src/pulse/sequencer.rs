use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tiny_skia::{Color, Pixmap};
use tracing::{debug, info, warn};

use super::{Emitter, PulseConfig};
use crate::error::PulseError;
use crate::model::EnvelopeDocument;
use crate::read_document;

/// Lit le document JSON produit par l'extracteur et en tire les timings
pub fn load_timings<P: AsRef<Path>>(path: P) -> Result<BTreeMap<u64, f64>, PulseError> {
    let document = read_document(path)?;
    read_timings(&document)
}

/// Index de frame (temps tronqué vers zéro) vers amplitude ; en cas de doublon la dernière l'emporte
pub fn read_timings(document: &EnvelopeDocument) -> Result<BTreeMap<u64, f64>, PulseError> {
    let mut timings = BTreeMap::new();
    for timecode in &document.timecodes {
        let time = timecode
            .time
            .value()
            .ok_or_else(|| PulseError::InvalidTime(format!("{:?}", timecode.time)))?;
        let frame = time.trunc();
        // -0.5 tronqué donne -0.0, qui tombe sur la frame 0
        if !frame.is_finite() || frame < 0.0 {
            warn!("Timecode hors de l'horloge des frames ignoré : {}", time);
            continue;
        }
        timings.insert(frame as u64, timecode.amplitude);
    }
    Ok(timings)
}

/// Boucle de rendu : frames d'amorce, une frame par unité de temps, frames de fin
pub struct FrameSequencer<'a> {
    config: &'a PulseConfig,
    emitter: Emitter,
    out_dir: PathBuf,
    frames_written: usize,
}

impl<'a> FrameSequencer<'a> {
    pub fn new<P: AsRef<Path>>(config: &'a PulseConfig, out_dir: P) -> Self {
        Self {
            config,
            emitter: Emitter::new(config),
            out_dir: out_dir.as_ref().to_path_buf(),
            frames_written: 0,
        }
    }

    /// Rend toute la séquence et retourne le nombre de frames écrites
    pub fn run(mut self, timings: &BTreeMap<u64, f64>) -> Result<usize, PulseError> {
        fs::create_dir_all(&self.out_dir)?;
        let last = timings.keys().next_back().copied();
        let total = self.config.leading_frames as usize
            + last.map_or(0, |t| t as usize + 1)
            + self.config.trailing_frames as usize;
        info!("Rendu de {} frames dans {:?}", total, self.out_dir);

        for _ in 0..self.config.leading_frames {
            self.step(None)?;
        }
        if let Some(last) = last {
            for time in 0..=last {
                self.step(timings.get(&time).copied())?;
            }
        }
        for _ in 0..self.config.trailing_frames {
            self.step(None)?;
        }

        info!("{} frames écrites", self.frames_written);
        Ok(self.frames_written)
    }

    fn step(&mut self, amplitude: Option<f64>) -> Result<(), PulseError> {
        if let Some(amplitude) = amplitude {
            self.emitter.emit(amplitude, self.config);
        }
        self.emitter.tick(self.config);
        let pixmap = self.render()?;
        self.write(&pixmap)
    }

    fn render(&self) -> Result<Pixmap, PulseError> {
        let mut pixmap = Pixmap::new(self.config.render_width, self.config.render_height).ok_or(
            PulseError::InvalidProperty {
                field: "render_width/render_height",
                reason: format!("{}x{}", self.config.render_width, self.config.render_height),
            },
        )?;
        if self.config.use_background {
            let [r, g, b] = self.config.color_background.0;
            pixmap.fill(Color::from_rgba8(r, g, b, 255));
        }
        self.emitter.render(&mut pixmap, self.config);
        Ok(pixmap)
    }

    fn write(&mut self, pixmap: &Pixmap) -> Result<(), PulseError> {
        let path = self.out_dir.join(format!("frame{}.png", self.frames_written));
        pixmap.save_png(&path).map_err(|e| PulseError::FrameWrite {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        debug!("Frame écrite : {:?}", path);
        self.frames_written += 1;
        Ok(())
    }
}
