//! Tests d'intégration du rendu des pulsations à partir d'un document de timecodes

use envelope_extractor::pulse::{load_timings, FrameSequencer, PulseConfig};
use envelope_extractor::{write_document, EnvelopeDocument, TimeFormat, TimeStamp, Timecode};
use std::fs;
use std::path::PathBuf;

fn sample_properties() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("properties.json")
}

#[test]
fn test_sample_properties_load() {
    let config = PulseConfig::load(sample_properties()).expect("properties.json doit être valide");
    assert_eq!(config.render_width, 1080);
    assert!(config.use_overlay);
}

#[test]
fn test_document_to_frames() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("data.json");
    let document = EnvelopeDocument {
        timecodes: [(0.0, 0.8), (1.5, 0.1), (3.0, 1.0)]
            .iter()
            .map(|&(t, a)| Timecode { time: TimeStamp::new(t, TimeFormat::Text), amplitude: a })
            .collect(),
    };
    write_document(&document, &data_path).unwrap();

    let mut config = PulseConfig::load(sample_properties()).unwrap();
    config.render_width = 48;
    config.render_height = 32;
    config.leading_frames = 1;
    config.trailing_frames = 2;
    config.circle_radius_min = 4.0;
    config.overlay_radius_min = 4.0;
    config.overlay_radius_max = 8.0;

    let timings = load_timings(&data_path).unwrap();
    let out_dir = dir.path().join("renders");
    let written = FrameSequencer::new(&config, &out_dir).run(&timings).unwrap();

    // 1 + (0..=3) + 2
    assert_eq!(written, 7);
    assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 7);

    let frame = image::open(out_dir.join("frame1.png")).unwrap().to_rgba8();
    assert_eq!(frame.dimensions(), (48, 32));
    // fond opaque
    assert_eq!(frame.get_pixel(0, 0).0, [0x10, 0x10, 0x18, 0xff]);
    // le disque central est plus clair que le fond
    let center = frame.get_pixel(24, 16).0;
    assert!(center[0] > 0x10);
}
