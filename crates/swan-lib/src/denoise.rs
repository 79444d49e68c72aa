use crate::error::AnalysisError;
use crate::signal::Signal;
use crate::wavelet::Wavelet;

/// Zero every coefficient whose magnitude reaches `threshold`, keeping the
/// small ones. A threshold of zero (or below) leaves the band untouched.
pub fn gate_coefficients(coeffs: &mut [f64], threshold: f64) {
    if threshold <= 0.0 {
        return;
    }
    for c in coeffs.iter_mut() {
        if c.abs() >= threshold {
            *c = 0.0;
        }
    }
}

/// Wavelet-domain denoising: decompose to `level`, gate the finest detail
/// band, reconstruct. Coarser bands pass through unchanged, so a zero
/// threshold reproduces the input exactly.
pub fn denoise(
    signal: &Signal,
    wavelet: &Wavelet,
    level: usize,
    threshold: f64,
) -> Result<Signal, AnalysisError> {
    if !(threshold >= 0.0) {
        return Err(AnalysisError::InvalidParameter(format!(
            "denoise threshold must be non-negative, got {threshold}"
        )));
    }
    let mut decomp = wavelet.wavedec(signal.samples(), level)?;
    gate_coefficients(&mut decomp.details[0], threshold);
    Signal::new(signal.fs(), decomp.reconstruct())
}
