use rand::rngs::StdRng;
use rand::SeedableRng;
use tiny_skia::Pixmap;

use super::circle::Circle;
use super::pulser::Pulser;
use super::PulseConfig;

/// Graine fixe : deux rendus des mêmes données sont identiques
const CHAOS_SEED: u64 = 123456;

/// Point d'émission de toutes les particules
pub struct Emitter {
    circles: Vec<Circle>,
    pulser: Pulser,
    rng: StdRng,
}

impl Emitter {
    pub fn new(config: &PulseConfig) -> Self {
        Self {
            circles: Vec::new(),
            pulser: Pulser::new(config),
            rng: StdRng::seed_from_u64(CHAOS_SEED),
        }
    }

    /// Émet un cercle si l'amplitude franchit le seuil (noise gate)
    pub fn emit(&mut self, amplitude: f64, config: &PulseConfig) -> bool {
        if amplitude < config.audio_amplitude_floor {
            return false;
        }
        let circle = Circle::new(amplitude, config, &mut self.rng);
        self.pulser.bump(&circle, config);
        self.circles.push(circle);
        true
    }

    /// Avance d'une frame ; les cercles plus larges que le rendu sont abandonnés
    pub fn tick(&mut self, config: &PulseConfig) {
        let max_width = config.render_width as f64;
        for circle in &mut self.circles {
            circle.tick();
        }
        self.circles.retain(|c| c.width() <= max_width);
        self.pulser.tick(config);
    }

    pub fn render(&self, pixmap: &mut Pixmap, config: &PulseConfig) {
        for circle in &self.circles {
            circle.draw(pixmap, config);
        }
        if config.use_overlay {
            self.pulser.draw(pixmap, config);
        }
    }

    pub fn circle_count(&self) -> usize {
        self.circles.len()
    }

    pub fn pulser(&self) -> &Pulser {
        &self.pulser
    }
}
