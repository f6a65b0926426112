use crate::analysis::scanner::ScanOutcome;
use crate::config::{AverageMode, CurveConfig};
use crate::error::EnvelopeError;

/// Moyenne des amplitudes mesurées, selon le diviseur choisi
pub fn average_amplitude(
    outcome: &ScanOutcome,
    duration: f64,
    time_scale: f64,
    mode: AverageMode,
) -> Result<f64, EnvelopeError> {
    if outcome.measurements.is_empty() {
        return Err(EnvelopeError::SilentScan);
    }
    let divisor = match mode {
        AverageMode::ColumnBudget => duration * time_scale,
        AverageMode::EntryCount => outcome.measurements.len() as f64,
    };
    if !divisor.is_finite() || divisor <= 0.0 {
        return Err(EnvelopeError::InvalidAudio(format!(
            "diviseur de moyenne invalide : {}",
            divisor
        )));
    }
    Ok(outcome.sum_amplitude as f64 / divisor)
}

/// Ramène chaque amplitude dans [0, 1] avec une courbe à deux régimes autour de la moyenne
pub fn normalize(outcome: &ScanOutcome, average: f64, curve: &CurveConfig) -> Result<Vec<f64>, EnvelopeError> {
    if outcome.measurements.is_empty() || outcome.max_amplitude == 0 {
        return Err(EnvelopeError::SilentScan);
    }
    let max = outcome.max_amplitude as f64;
    let avgnorm = average / max;

    Ok(outcome
        .measurements
        .iter()
        .map(|m| shape(m.amplitude as f64 / max, avgnorm, curve))
        .collect())
}

/// Compression au-dessus de la moyenne, expansion en dessous
fn shape(ratio: f64, avgnorm: f64, curve: &CurveConfig) -> f64 {
    if ratio > avgnorm {
        ratio.powf(curve.above_average)
    } else {
        ratio.powf(curve.at_or_below_average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scanner::Measurement;

    fn outcome(amplitudes: &[u32]) -> ScanOutcome {
        let measurements: Vec<Measurement> = amplitudes
            .iter()
            .enumerate()
            .map(|(i, &a)| Measurement { column: 110 + i as u32, time: i as f64, amplitude: a })
            .collect();
        ScanOutcome {
            columns_scanned: 600,
            max_amplitude: amplitudes.iter().copied().max().unwrap_or(0),
            sum_amplitude: amplitudes.iter().map(|&a| a as u64).sum(),
            measurements,
        }
    }

    #[test]
    fn test_constant_runs_normalize_to_one() {
        let scan = outcome(&[12; 600]);
        let average = average_amplitude(&scan, 20.0, 30.0, AverageMode::ColumnBudget).unwrap();
        assert_eq!(average, 12.0);
        let values = normalize(&scan, average, &CurveConfig::default()).unwrap();
        assert!(values.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_three_levels_use_both_curves() {
        // moyenne sur le nombre d'entrées : (10 + 30 + 40) / 3
        let scan = outcome(&[10, 30, 40]);
        let average = average_amplitude(&scan, 1.0, 30.0, AverageMode::EntryCount).unwrap();
        let values = normalize(&scan, average, &CurveConfig::default()).unwrap();

        assert!((values[0] - 0.25f64.powf(1.4)).abs() < 1e-12);
        assert!((values[1] - 0.75f64.powf(0.6)).abs() < 1e-12);
        assert_eq!(values[2], 1.0);
    }

    #[test]
    fn test_column_budget_divides_by_duration_times_scale() {
        let scan = outcome(&[10, 20]);
        let average = average_amplitude(&scan, 2.0, 30.0, AverageMode::ColumnBudget).unwrap();
        assert!((average - 0.5).abs() < 1e-12);
        let average = average_amplitude(&scan, 2.0, 30.0, AverageMode::EntryCount).unwrap();
        assert_eq!(average, 15.0);
    }

    #[test]
    fn test_ratio_equal_to_average_takes_expansive_curve() {
        let curve = CurveConfig::default();
        assert_eq!(shape(0.5, 0.5, &curve), 0.5f64.powf(1.4));
        assert_eq!(shape(0.6, 0.5, &curve), 0.6f64.powf(0.6));
    }

    #[test]
    fn test_silent_scan_is_an_error() {
        let scan = outcome(&[]);
        assert!(matches!(
            average_amplitude(&scan, 1.0, 30.0, AverageMode::ColumnBudget),
            Err(EnvelopeError::SilentScan)
        ));
        assert!(matches!(normalize(&scan, 0.0, &CurveConfig::default()), Err(EnvelopeError::SilentScan)));
    }

    #[test]
    fn test_zero_runs_are_silent() {
        let scan = outcome(&[0, 0]);
        assert!(matches!(normalize(&scan, 0.0, &CurveConfig::default()), Err(EnvelopeError::SilentScan)));
    }

    #[test]
    fn test_zero_time_scale_is_rejected() {
        let scan = outcome(&[3]);
        assert!(average_amplitude(&scan, 1.0, 0.0, AverageMode::ColumnBudget).is_err());
    }
}
