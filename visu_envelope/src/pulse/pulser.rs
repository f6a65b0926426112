use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use super::circle::Circle;
use super::{alpha_u8, atan_smooth, PulseConfig};

/// Disque central unique : grossit à chaque émission, puis se résorbe
#[derive(Clone, Debug)]
pub struct Pulser {
    radius: f64,
    /// Opacité maximale atteignable une fois le lissage appliqué
    opacity_peak: f64,
    alpha: u8,
}

impl Pulser {
    pub fn new(config: &PulseConfig) -> Self {
        Self {
            radius: config.overlay_radius_min as f64,
            opacity_peak: atan_smooth(1.0, config.smoothing_amount),
            alpha: alpha_u8(config.overlay_opacity_floor),
        }
    }

    /// Croissance proportionnelle à l'opacité du cercle qui vient d'être émis
    pub fn bump(&mut self, peak: &Circle, config: &PulseConfig) {
        let strength = peak.alpha() as f32 / 255.0 / self.opacity_peak as f32;
        let growth = 1.0 + strength * (config.overlay_radius_growth_rate - 1.0);
        self.radius = (self.radius * growth as f64).min(config.overlay_radius_max as f64);
        self.alpha = alpha_u8(self.opacity_peak as f32 / 10.0);
    }

    pub fn tick(&mut self, config: &PulseConfig) {
        self.radius = (self.radius * config.overlay_radius_decay_rate as f64).max(config.overlay_radius_min as f64);
        let opacity = self.alpha as f32 * config.overlay_opacity_decay_rate / 255.0;
        self.alpha = alpha_u8(opacity.max(config.overlay_opacity_floor));
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn draw(&self, pixmap: &mut Pixmap, config: &PulseConfig) {
        let (cx, cy) = config.center();
        let Some(path) = PathBuilder::from_circle(cx, cy, self.radius as f32) else {
            return;
        };
        let [r, g, b] = config.color_overlay.0;
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, self.alpha);
        paint.anti_alias = true;
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> PulseConfig {
        PulseConfig {
            circle_chaos: 0.0,
            smoothing_amount: 0,
            overlay_radius_min: 100.0,
            overlay_radius_max: 140.0,
            overlay_radius_growth_rate: 1.2,
            ..PulseConfig::default()
        }
    }

    #[test]
    fn test_starts_at_minimum() {
        let config = config();
        let pulser = Pulser::new(&config);
        assert_eq!(pulser.radius(), 100.0);
        assert_eq!(pulser.alpha(), alpha_u8(config.overlay_opacity_floor));
    }

    #[test]
    fn test_bump_grows_and_caps() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(0);
        let loud = Circle::new(1.0, &config, &mut rng);
        let mut pulser = Pulser::new(&config);

        pulser.bump(&loud, &config);
        assert!((pulser.radius() - 120.0).abs() < 1e-3);
        assert_eq!(pulser.alpha(), alpha_u8(0.1));

        pulser.bump(&loud, &config);
        assert_eq!(pulser.radius(), 140.0);
    }

    #[test]
    fn test_quiet_circle_bumps_less() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(0);
        let mut quiet = Pulser::new(&config);
        let mut loud = Pulser::new(&config);
        quiet.bump(&Circle::new(0.3, &config, &mut rng), &config);
        loud.bump(&Circle::new(0.9, &config, &mut rng), &config);
        assert!(quiet.radius() < loud.radius());
    }

    #[test]
    fn test_tick_decays_to_floors() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(0);
        let mut pulser = Pulser::new(&config);
        pulser.bump(&Circle::new(1.0, &config, &mut rng), &config);
        for _ in 0..500 {
            pulser.tick(&config);
        }
        assert_eq!(pulser.radius(), 100.0);
        assert_eq!(pulser.alpha(), alpha_u8(config.overlay_opacity_floor));
    }
}
