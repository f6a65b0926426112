use rand::Rng;
use tiny_skia::{Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::{alpha_u8, atan_smooth, PulseConfig};

/// Cercle émis au centre ; son rayon grandit et son opacité décroît à chaque frame
#[derive(Clone, Debug)]
pub struct Circle {
    radius: f64,
    decay: f32,
    growth: f32,
    alpha: u8,
}

impl Circle {
    /// Plus l'amplitude est forte, plus le cercle est opaque
    pub fn new<R: Rng>(amplitude: f64, config: &PulseConfig, rng: &mut R) -> Self {
        let decay = config.circle_decay_rate * jitter(config.circle_chaos, rng);
        let growth = config.circle_growth_rate * jitter(config.circle_chaos, rng);
        Self {
            radius: config.circle_radius_min as f64,
            decay,
            growth,
            alpha: alpha_u8(opacity(amplitude, config)),
        }
    }

    pub fn tick(&mut self) {
        self.radius *= self.growth as f64;
        self.alpha = alpha_u8(self.alpha as f32 / 255.0 * self.decay);
    }

    pub fn width(&self) -> f64 {
        self.radius * 2.0
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Opacité 0-255
    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn draw(&self, pixmap: &mut Pixmap, config: &PulseConfig) {
        let (cx, cy) = config.center();
        let Some(path) = PathBuilder::from_circle(cx, cy, self.radius as f32) else {
            return;
        };
        let [r, g, b] = config.color_circle.0;
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, self.alpha);
        paint.anti_alias = true;
        let stroke = Stroke { width: config.stroke_circle, ..Stroke::default() };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

/// Facteur 1 + k/1000 avec k tiré dans [0, chaos * 1000)
fn jitter<R: Rng>(chaos: f32, rng: &mut R) -> f32 {
    let bound = (chaos * 1000.0).round() as u32;
    if bound == 0 {
        return 1.0;
    }
    1.0 + rng.random_range(0..bound) as f32 / 1000.0
}

/// Opacité de départ : amplitude rapportée au plafond, puis lissée
fn opacity(amplitude: f64, config: &PulseConfig) -> f32 {
    let output = (amplitude / config.audio_amplitude_roof).min(1.0) as f32;
    if !config.use_smoothing {
        return output;
    }
    atan_smooth(output as f64, config.smoothing_amount).max(0.0) as f32
}
