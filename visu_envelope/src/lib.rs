pub mod analysis;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod pulse;

pub use config::{AverageMode, EnvelopeConfig, RenderConfig, ScanWindow, TimeFormat};
pub use error::{EnvelopeError, PulseError};
pub use model::{EnvelopeAnalysis, EnvelopeDocument, Timecode, TimeStamp};

use image::RgbImage;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use analysis::normalizer::{average_amplitude, normalize};
use analysis::scanner::EnvelopeScanner;
use model::{Metadata, ScanStats};

pub fn run(config: &EnvelopeConfig) -> Result<EnvelopeAnalysis, EnvelopeError> {
    // 1. Décodage du WAV
    let audio = analysis::decoder::load_wave(&config.file_path)?;
    let duration_seconds = audio.duration_seconds();
    info!("Durée : {} s ({} frames à {} Hz)", duration_seconds, audio.frame_count, audio.sample_rate);

    // 2. Rendu du graphique, écrit puis relu depuis le disque
    let pixmap = analysis::renderer::render_waveform(&audio.samples, &config.render)?;
    analysis::renderer::save_plot(&pixmap, &config.image_path)?;
    let image = image::open(&config.image_path)?.to_rgb8();

    // 3. Scan, normalisation et construction du document
    let (stats, document) = extract_envelope(&image, duration_seconds, config)?;
    info!(
        "{} entrées sur {} colonnes (max {}, moyenne {:.3})",
        stats.entries, stats.columns_scanned, stats.max_amplitude, stats.average_amplitude
    );

    Ok(EnvelopeAnalysis {
        metadata: Metadata {
            file_path: config.file_path.clone(),
            sample_rate: audio.sample_rate,
            channels: audio.channels,
            frame_count: audio.frame_count,
            duration_seconds,
        },
        stats,
        document,
    })
}

/// Étapes qui ne dépendent que de l'image rendue et de la durée
pub fn extract_envelope(
    image: &RgbImage,
    duration_seconds: f64,
    config: &EnvelopeConfig,
) -> Result<(ScanStats, EnvelopeDocument), EnvelopeError> {
    let scanner = EnvelopeScanner::new(config.scan_window(), config.render.background);
    let outcome = scanner.scan(image, duration_seconds, config.time_scale)?;
    debug!("Scan : {} colonnes non vides", outcome.measurements.len());

    let average = average_amplitude(&outcome, duration_seconds, config.time_scale, config.average_mode)?;
    let amplitudes = normalize(&outcome, average, &config.curve)?;

    let timecodes = outcome
        .measurements
        .iter()
        .zip(amplitudes)
        .map(|(m, amplitude)| Timecode { time: TimeStamp::new(m.time, config.time_format), amplitude })
        .collect();

    let stats = ScanStats {
        columns_scanned: outcome.columns_scanned,
        entries: outcome.measurements.len(),
        max_amplitude: outcome.max_amplitude,
        sum_amplitude: outcome.sum_amplitude,
        average_amplitude: average,
    };
    Ok((stats, EnvelopeDocument { timecodes }))
}

/// Écrit le document dans un fichier temporaire voisin puis le renomme
pub fn write_document<P: AsRef<Path>>(document: &EnvelopeDocument, path: P) -> Result<(), EnvelopeError> {
    let path = path.as_ref();
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let written = write_then_rename(document, &tmp_path, path);
    if written.is_err() {
        // pas de .tmp orphelin
        let _ = fs::remove_file(&tmp_path);
    }
    written?;
    debug!("Document écrit dans {:?}", path);
    Ok(())
}

fn write_then_rename(document: &EnvelopeDocument, tmp_path: &Path, path: &Path) -> Result<(), EnvelopeError> {
    let mut writer = BufWriter::new(File::create(tmp_path)?);
    serde_json::to_writer(&mut writer, document)?;
    writer.flush()?;
    drop(writer);
    fs::rename(tmp_path, path)?;
    Ok(())
}

pub fn read_document<P: AsRef<Path>>(path: P) -> Result<EnvelopeDocument, EnvelopeError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::path::PathBuf;

    fn config() -> EnvelopeConfig {
        EnvelopeConfig::new(PathBuf::from("unused.wav"))
    }

    #[test]
    fn test_blank_image_is_silent_scan() {
        let image = RgbImage::from_pixel(800, 600, Rgb([255, 255, 255]));
        let result = extract_envelope(&image, 1.0, &config());
        assert!(matches!(result, Err(EnvelopeError::SilentScan)));
    }

    #[test]
    fn test_write_then_read_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let document = EnvelopeDocument {
            timecodes: vec![
                Timecode { time: TimeStamp::new(0.0, TimeFormat::Text), amplitude: 0.25 },
                Timecode { time: TimeStamp::new(0.05, TimeFormat::Text), amplitude: 1.0 },
            ],
        };
        write_document(&document, &path).unwrap();

        assert!(!dir.path().join("data.json.tmp").exists());
        assert_eq!(read_document(&path).unwrap(), document);
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with(r#"{"timecodes":[{"time":"0.0","amplitude":0.25}"#));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("data.json");
        let result = write_document(&EnvelopeDocument::default(), &path);
        assert!(matches!(result, Err(EnvelopeError::Io(_))));
    }

    #[test]
    fn test_failed_rename_removes_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        // un répertoire non vide à la place de la cible fait échouer le renommage
        let path = dir.path().join("data.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();

        let result = write_document(&EnvelopeDocument::default(), &path);

        assert!(matches!(result, Err(EnvelopeError::Io(_))));
        assert!(!dir.path().join("data.json.tmp").exists());
        assert!(path.join("keep").exists());
    }
}
