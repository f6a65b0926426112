//! Rendu animé des timecodes : des cercles émis à chaque pic d'amplitude,
//! et un disque central qui pulse avec eux.

pub mod circle;
pub mod config;
pub mod emitter;
pub mod pulser;
pub mod sequencer;

pub use config::{HexColor, PulseConfig};
pub use emitter::Emitter;
pub use sequencer::{load_timings, read_timings, FrameSequencer};

/// Opacité [0, 1] vers un canal alpha 8 bits, arrondi au plus proche
pub(crate) fn alpha_u8(opacity: f32) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

/// Arc tangente appliquée `amount` fois
pub(crate) fn atan_smooth(value: f64, amount: u32) -> f64 {
    (0..amount).fold(value, |v, _| v.atan())
}
