use std::path::Path;
use tiny_skia::{Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};
use tracing::debug;

use crate::config::RenderConfig;
use crate::error::EnvelopeError;

/// Au-delà de ce nombre d'échantillons par colonne, on ne trace que min/max par colonne
const POINTS_PER_COLUMN: usize = 4;

/// Trace la courbe amplitude / indice d'échantillon dans la zone des axes
pub fn render_waveform(samples: &[i16], config: &RenderConfig) -> Result<Pixmap, EnvelopeError> {
    let mut pixmap = Pixmap::new(config.width, config.height).ok_or_else(|| {
        EnvelopeError::Render(format!("dimensions invalides {}x{}", config.width, config.height))
    })?;
    let area = config.plot_area;
    if area.width() == 0 || area.height() == 0 || area.right > config.width || area.bottom > config.height {
        return Err(EnvelopeError::Render(format!(
            "zone des axes {:?} hors de l'image {}x{}",
            area, config.width, config.height
        )));
    }

    let [r, g, b] = config.background;
    pixmap.fill(Color::from_rgba8(r, g, b, 255));

    if let Some(path) = waveform_path(samples, config) {
        let mut paint = Paint::default();
        let [r, g, b] = config.line_color;
        paint.set_color_rgba8(r, g, b, 255);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: config.line_width,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    // Cadre des axes, aligné sur les centres de pixels
    let frame = Rect::from_ltrb(
        area.left as f32 + 0.5,
        area.top as f32 + 0.5,
        area.right as f32 - 0.5,
        area.bottom as f32 - 0.5,
    )
    .map(PathBuilder::from_rect);
    if let Some(frame) = frame {
        let mut paint = Paint::default();
        paint.set_color_rgba8(0, 0, 0, 255);
        let stroke = Stroke { width: 1.0, ..Stroke::default() };
        pixmap.stroke_path(&frame, &paint, &stroke, Transform::identity(), None);
    }

    Ok(pixmap)
}

/// Écrit le graphique en PNG, en écrasant un éventuel fichier existant
pub fn save_plot<P: AsRef<Path>>(pixmap: &Pixmap, path: P) -> Result<(), EnvelopeError> {
    let path = path.as_ref();
    pixmap
        .save_png(path)
        .map_err(|e| EnvelopeError::Render(format!("écriture de {:?} : {}", path, e)))?;
    debug!("Graphique écrit dans {:?}", path);
    Ok(())
}

fn waveform_path(samples: &[i16], config: &RenderConfig) -> Option<tiny_skia::Path> {
    if samples.is_empty() {
        return None;
    }
    let area = config.plot_area;
    let points = plot_points(samples, area.width() as usize);

    // Axes auto-ajustés avec une marge relative autour des données
    let span = (samples.len() - 1).max(1) as f32;
    let x_min = -span * config.data_margin;
    let x_max = span * (1.0 + config.data_margin);

    let lo = *samples.iter().min()? as f32;
    let hi = *samples.iter().max()? as f32;
    let (lo, hi) = if lo == hi { (lo - 1.0, hi + 1.0) } else { (lo, hi) };
    let pad = (hi - lo) * config.data_margin;
    let (y_min, y_max) = (lo - pad, hi + pad);

    let to_px = |index: f32, value: f32| {
        let x = area.left as f32 + (index - x_min) / (x_max - x_min) * area.width() as f32;
        let y = area.bottom as f32 - (value - y_min) / (y_max - y_min) * area.height() as f32;
        (x, y)
    };

    let mut builder = PathBuilder::new();
    let (first_index, first_value) = points[0];
    let (x, y) = to_px(first_index, first_value);
    builder.move_to(x, y);
    if points.len() == 1 {
        // Un seul point : segment horizontal d'un pixel
        builder.line_to(x + 1.0, y);
    }
    for &(index, value) in &points[1..] {
        let (x, y) = to_px(index, value);
        builder.line_to(x, y);
    }
    builder.finish()
}

/// Points (indice, valeur) à tracer ; décimés en paires min/max quand la densité dépasse la résolution
fn plot_points(samples: &[i16], columns: usize) -> Vec<(f32, f32)> {
    let columns = columns.max(1);
    if samples.len() <= columns * POINTS_PER_COLUMN {
        return samples.iter().enumerate().map(|(i, &s)| (i as f32, s as f32)).collect();
    }

    let bucket = samples.len().div_ceil(columns);
    let mut points = Vec::with_capacity(columns * 2);
    for (chunk_idx, chunk) in samples.chunks(bucket).enumerate() {
        let base = chunk_idx * bucket;
        let mut min_at = 0;
        let mut max_at = 0;
        for (i, &s) in chunk.iter().enumerate() {
            if s < chunk[min_at] {
                min_at = i;
            }
            if s > chunk[max_at] {
                max_at = i;
            }
        }
        let (first, second) = if min_at <= max_at { (min_at, max_at) } else { (max_at, min_at) };
        points.push(((base + first) as f32, chunk[first] as f32));
        points.push(((base + second) as f32, chunk[second] as f32));
    }
    points
}
