use crate::error::AnalysisError;
use crate::signal::Signal;
use realfft::RealFftPlanner;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Samples dropped from each end of the denoised operand before the Welch
/// comparison, where reconstruction edge effects concentrate.
const EDGE_TRIM: usize = 5;

/// Which SNR estimator to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnrMethod {
    Statistical,
    Welch,
    Periodogram,
}

/// Direction of travel for table-wide statistical SNR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Rows,
    Columns,
}

/// Mean over population standard deviation. Empty or constant input gives
/// 0.0 rather than NaN.
pub fn statistical_snr(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();
    if std == 0.0 {
        return 0.0;
    }
    mean / std
}

/// [`statistical_snr`] down one axis of a record table. Column traversal
/// stops at the shortest row so ragged tables stay in bounds.
pub fn statistical_snr_axis(records: &[Vec<f64>], axis: Axis) -> Vec<f64> {
    match axis {
        Axis::Rows => records.iter().map(|row| statistical_snr(row)).collect(),
        Axis::Columns => {
            let width = records.iter().map(|row| row.len()).min().unwrap_or(0);
            (0..width)
                .map(|col| {
                    let column: Vec<f64> = records.iter().map(|row| row[col]).collect();
                    statistical_snr(&column)
                })
                .collect()
        }
    }
}

/// Welch power spectral density: Hann-windowed segments of min(256, n)
/// samples at 50% overlap, one-sided, averaged. Returns (freqs, powers);
/// both are empty below two samples.
pub fn welch_psd(samples: &[f64], fs: f64) -> (Vec<f64>, Vec<f64>) {
    let n = samples.len();
    if n < 2 {
        return (Vec::new(), Vec::new());
    }
    let window = n.min(256);
    let step = (window / 2).max(1);
    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(window);
    let window_func = hann(window);
    let mut freqs = Vec::new();
    let mut powers = Vec::new();
    let mut pos = 0;
    let mut segments = 0;
    while pos + window <= n {
        let mut frame: Vec<f64> = samples[pos..pos + window]
            .iter()
            .zip(window_func.iter())
            .map(|(x, w)| x * w)
            .collect();
        let mut spectrum = r2c.make_output_vec();
        r2c.process(&mut frame, &mut spectrum).unwrap();
        let scale = 1.0 / window as f64;
        for (k, val) in spectrum.iter().enumerate() {
            if segments == 0 {
                freqs.push(k as f64 * fs / window as f64);
                powers.push(0.0);
            }
            let power = if k == 0 || (window % 2 == 0 && k == window / 2) {
                val.norm_sqr()
            } else {
                2.0 * val.norm_sqr()
            } * scale;
            powers[k] += power;
        }
        segments += 1;
        pos += step;
    }
    if segments > 0 {
        for p in powers.iter_mut() {
            *p /= segments as f64;
        }
    }
    (freqs, powers)
}

/// Single full-length one-sided periodogram, no window function.
pub fn periodogram(samples: &[f64], fs: f64) -> (Vec<f64>, Vec<f64>) {
    let n = samples.len();
    if n < 2 {
        return (Vec::new(), Vec::new());
    }
    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(n);
    let mut buffer = samples.to_vec();
    let mut spectrum = r2c.make_output_vec();
    r2c.process(&mut buffer, &mut spectrum).unwrap();
    let scale = 1.0 / n as f64;
    let mut freqs = Vec::with_capacity(spectrum.len());
    let mut powers = Vec::with_capacity(spectrum.len());
    for (k, val) in spectrum.iter().enumerate() {
        freqs.push(k as f64 * fs / n as f64);
        let power = if k == 0 || (n % 2 == 0 && k == n / 2) {
            val.norm_sqr()
        } else {
            2.0 * val.norm_sqr()
        } * scale;
        powers.push(power);
    }
    (freqs, powers)
}

/// Welch-based estimate: total PSD of the original over total PSD of the
/// denoised record with [`EDGE_TRIM`] samples dropped from each end.
pub fn spectral_snr(original: &Signal, denoised: &Signal) -> Result<f64, AnalysisError> {
    let trimmed = trim_edges(denoised.samples(), EDGE_TRIM)?;
    let (_, signal_psd) = welch_psd(original.samples(), original.fs());
    let (_, noise_psd) = welch_psd(trimmed, denoised.fs());
    snr_log_ratio(signal_psd.iter().sum(), noise_psd.iter().sum())
}

/// Periodogram-based estimate against the reconstruction residual.
pub fn periodogram_snr(original: &Signal, denoised: &Signal) -> Result<f64, AnalysisError> {
    if original.len() != denoised.len() {
        return Err(AnalysisError::InvalidParameter(format!(
            "records differ in length: {} vs {}",
            original.len(),
            denoised.len()
        )));
    }
    let residual: Vec<f64> = original
        .samples()
        .iter()
        .zip(denoised.samples())
        .map(|(a, b)| a - b)
        .collect();
    let (_, signal_psd) = periodogram(original.samples(), original.fs());
    let (_, noise_psd) = periodogram(&residual, original.fs());
    snr_log_ratio(signal_psd.iter().sum(), noise_psd.iter().sum())
}

/// Run the chosen estimator. `Statistical` reads the original record alone;
/// the spectral methods compare it with its denoised counterpart.
pub fn estimate_snr(
    method: SnrMethod,
    original: &Signal,
    denoised: &Signal,
) -> Result<f64, AnalysisError> {
    match method {
        SnrMethod::Statistical => Ok(statistical_snr(original.samples())),
        SnrMethod::Welch => spectral_snr(original, denoised),
        SnrMethod::Periodogram => periodogram_snr(original, denoised),
    }
}

/// SNR in the house convention: 20 times the base-2 log of the power ratio.
fn snr_log_ratio(signal_power: f64, noise_power: f64) -> Result<f64, AnalysisError> {
    if noise_power <= 0.0 {
        return Err(AnalysisError::NumericDegeneracy(
            "noise power is zero; the ratio is unbounded".into(),
        ));
    }
    if signal_power <= 0.0 {
        return Err(AnalysisError::NumericDegeneracy(
            "signal power is zero; the log ratio is undefined".into(),
        ));
    }
    Ok(20.0 * (signal_power / noise_power).log2())
}

fn trim_edges(samples: &[f64], trim: usize) -> Result<&[f64], AnalysisError> {
    if samples.len() <= 2 * trim {
        return Err(AnalysisError::InsufficientData(format!(
            "{} samples cannot spare {trim} from each end",
            samples.len()
        )));
    }
    Ok(&samples[trim..samples.len() - trim])
}

fn hann(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / (size as f64)).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistical_snr_matches_hand_computation() {
        let snr = statistical_snr(&[1.0, 2.0, 3.0]);
        assert!((snr - 6.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn flat_or_empty_records_have_zero_statistical_snr() {
        assert_eq!(statistical_snr(&[]), 0.0);
        assert_eq!(statistical_snr(&[5.0, 5.0, 5.0]), 0.0);
    }

    #[test]
    fn axis_selects_rows_or_columns() {
        let table = vec![vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0]];
        let rows = statistical_snr_axis(&table, Axis::Rows);
        assert_eq!(rows.len(), 2);
        for snr in rows {
            assert!((snr - 6.0f64.sqrt()).abs() < 1e-12);
        }
        assert_eq!(
            statistical_snr_axis(&table, Axis::Columns),
            vec![3.0, 3.0, 3.0]
        );
    }

    #[test]
    fn ragged_tables_use_the_shortest_row() {
        let table = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]];
        assert_eq!(
            statistical_snr_axis(&table, Axis::Columns),
            vec![0.0, 0.0]
        );
        assert_eq!(statistical_snr_axis(&[], Axis::Columns), Vec::<f64>::new());
    }

    #[test]
    fn welch_psd_guards_tiny_input() {
        assert_eq!(welch_psd(&[1.0], 100.0), (Vec::new(), Vec::new()));
        let (freqs, powers) = welch_psd(&vec![1.0; 64], 100.0);
        assert_eq!(freqs.len(), 33);
        assert_eq!(powers.len(), 33);
    }

    #[test]
    fn periodogram_snr_separates_known_tones() {
        // Two tones on exact bins: amplitude 1 at bin 32 and 0.25 at
        // bin 200. Removing only the second leaves a power ratio of
        // (1 + 1/16) / (1/16) = 17.
        let n = 1024;
        let fs = 512.0;
        let carrier: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 32.0 * i as f64 / n as f64).sin())
            .collect();
        let original: Vec<f64> = (0..n)
            .map(|i| {
                carrier[i] + 0.25 * (2.0 * PI * 200.0 * i as f64 / n as f64).sin()
            })
            .collect();
        let original = Signal::new(fs, original).unwrap();
        let denoised = Signal::new(fs, carrier).unwrap();
        let snr = periodogram_snr(&original, &denoised).unwrap();
        let expected = 20.0 * 17.0f64.log2();
        assert!((snr - expected).abs() < 1e-6, "snr {snr} vs {expected}");
    }

    #[test]
    fn welch_snr_of_a_clean_reconstruction_is_near_zero() {
        // Period-16 tone lands on an exact bin of the 256-sample window,
        // so every segment sees the same spectrum regardless of phase and
        // trimming five samples cannot move the power.
        let samples: Vec<f64> = (0..1210)
            .map(|i| (2.0 * PI * i as f64 / 16.0).sin())
            .collect();
        let original = Signal::new(125.0, samples.clone()).unwrap();
        let denoised = Signal::new(125.0, samples).unwrap();
        let snr = spectral_snr(&original, &denoised).unwrap();
        assert!(snr.abs() < 1e-6, "snr {snr}");
    }

    #[test]
    fn zero_residual_is_degenerate() {
        let samples: Vec<f64> = (0..600).map(|i| (i as f64 * 0.1).sin()).collect();
        let signal = Signal::new(125.0, samples).unwrap();
        assert!(matches!(
            periodogram_snr(&signal, &signal.clone()),
            Err(AnalysisError::NumericDegeneracy(_))
        ));
    }

    #[test]
    fn welch_trim_needs_enough_samples() {
        let original = Signal::new(125.0, vec![1.0; 100]).unwrap();
        let short = Signal::new(125.0, vec![1.0; 10]).unwrap();
        assert!(matches!(
            spectral_snr(&original, &short),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let a = Signal::new(125.0, vec![1.0; 100]).unwrap();
        let b = Signal::new(125.0, vec![1.0; 99]).unwrap();
        assert!(matches!(
            periodogram_snr(&a, &b),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn dispatch_routes_each_method() {
        let samples: Vec<f64> = (0..300)
            .map(|i| 1.0 + (2.0 * PI * i as f64 / 16.0).sin())
            .collect();
        let original = Signal::new(125.0, samples.clone()).unwrap();
        let denoised = Signal::new(125.0, samples).unwrap();
        let stat = estimate_snr(SnrMethod::Statistical, &original, &denoised).unwrap();
        assert!((stat - statistical_snr(original.samples())).abs() < 1e-12);
        assert!(estimate_snr(SnrMethod::Welch, &original, &denoised).is_ok());
        assert!(matches!(
            estimate_snr(SnrMethod::Periodogram, &original, &denoised),
            Err(AnalysisError::NumericDegeneracy(_))
        ));
    }
}
