use hound::{SampleFormat, WavReader};
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::EnvelopeError;

/// Échantillons PCM entrelacés, tels que lus dans le conteneur
#[derive(Clone, Debug)]
pub struct DecodedAudio {
    pub samples: Vec<i16>,
    pub channels: u16,
    pub sample_rate: u32,
    pub frame_count: u32,
}

impl DecodedAudio {
    /// Durée en secondes : nombre de frames / fréquence d'échantillonnage
    pub fn duration_seconds(&self) -> f64 {
        self.frame_count as f64 / self.sample_rate as f64
    }
}

/// Charge un fichier WAV et le décode en entiers signés 16 bits
pub fn load_wave<P: AsRef<Path>>(path: P) -> Result<DecodedAudio, EnvelopeError> {
    let path = path.as_ref();
    let reader = WavReader::open(path)
        .map_err(|e| EnvelopeError::Decode(format!("impossible d'ouvrir {:?} : {}", path, e)))?;
    decode_reader(reader)
}

/// Décode depuis n'importe quelle source (fichier ou mémoire)
pub fn decode_reader<R: Read>(mut reader: WavReader<R>) -> Result<DecodedAudio, EnvelopeError> {
    let spec = reader.spec();
    let frame_count = reader.duration();

    if spec.sample_rate == 0 {
        return Err(EnvelopeError::InvalidAudio("fréquence d'échantillonnage nulle".to_string()));
    }

    let samples: Vec<i16> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| (v * i16::MAX as f32).clamp(i16::MIN as f32, i16::MAX as f32) as i16))
            .collect::<Result<Vec<_>, _>>(),
        SampleFormat::Int if spec.bits_per_sample <= 16 => {
            reader.samples::<i16>().collect::<Result<Vec<_>, _>>()
        }
        SampleFormat::Int => {
            // 24/32 bits ramenés sur 16 bits
            let shift = spec.bits_per_sample - 16;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| (v >> shift) as i16))
                .collect::<Result<Vec<_>, _>>()
        }
    }
    .map_err(|e| EnvelopeError::Decode(format!("lecture des échantillons : {}", e)))?;

    if frame_count == 0 || samples.is_empty() {
        return Err(EnvelopeError::InvalidAudio("aucune frame audio".to_string()));
    }

    debug!(
        "WAV décodé : {} canaux, {} Hz, {} bits, {} frames",
        spec.channels, spec.sample_rate, spec.bits_per_sample, frame_count
    );

    Ok(DecodedAudio {
        samples,
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        frame_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};
    use std::io::Cursor;

    fn wav_bytes(spec: WavSpec, frames: usize, value: i32) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            for _ in 0..frames * spec.channels as usize {
                writer.write_sample(value).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    fn int_spec(channels: u16, bits: u16) -> WavSpec {
        WavSpec { channels, sample_rate: 44100, bits_per_sample: bits, sample_format: SampleFormat::Int }
    }

    #[test]
    fn test_duration_is_frames_over_rate() {
        let bytes = wav_bytes(int_spec(1, 16), 44100, 1000);
        let audio = decode_reader(WavReader::new(Cursor::new(bytes)).unwrap()).unwrap();
        assert_eq!(audio.frame_count, 44100);
        assert_eq!(audio.samples.len(), 44100);
        assert!((audio.duration_seconds() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_stereo_keeps_interleaved_samples() {
        let bytes = wav_bytes(int_spec(2, 16), 22050, -5);
        let audio = decode_reader(WavReader::new(Cursor::new(bytes)).unwrap()).unwrap();
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.frame_count, 22050);
        assert_eq!(audio.samples.len(), 44100);
        assert!((audio.duration_seconds() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_24_bit_is_shifted_to_16_bit() {
        let bytes = wav_bytes(int_spec(1, 24), 10, 0x10_0000);
        let audio = decode_reader(WavReader::new(Cursor::new(bytes)).unwrap()).unwrap();
        assert!(audio.samples.iter().all(|&s| s == 0x1000));
    }

    #[test]
    fn test_empty_file_is_invalid() {
        let bytes = wav_bytes(int_spec(1, 16), 0, 0);
        let result = decode_reader(WavReader::new(Cursor::new(bytes)).unwrap());
        assert!(matches!(result, Err(EnvelopeError::InvalidAudio(_))));
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let result = load_wave("/nonexistent/path/to/audio.wav");
        assert!(matches!(result, Err(EnvelopeError::Decode(_))));
    }
}
