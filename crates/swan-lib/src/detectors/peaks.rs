use crate::signal::{PeakSet, Signal};

/// Indices of strict local maxima, in ascending order.
///
/// A run of equal samples counts as one candidate reported at its first
/// index, and only if the run both rises from the left and falls to the
/// right. `height` keeps peaks whose amplitude is at least the bound.
pub fn find_peaks(samples: &[f64], height: Option<f64>) -> Vec<usize> {
    let mut peaks = Vec::new();
    if samples.len() < 3 {
        return peaks;
    }
    let mut i = 1;
    while i < samples.len() - 1 {
        if samples[i] > samples[i - 1] {
            let start = i;
            let mut end = i;
            while end + 1 < samples.len() && samples[end + 1] == samples[start] {
                end += 1;
            }
            let falls = end + 1 < samples.len() && samples[end + 1] < samples[start];
            if falls && height.map_or(true, |h| samples[start] >= h) {
                peaks.push(start);
            }
            i = end + 1;
        } else {
            i += 1;
        }
    }
    peaks
}

/// R-peak candidates of a conditioned record.
pub fn find_r_peaks(signal: &Signal, height: f64) -> PeakSet {
    PeakSet::from_indices(find_peaks(signal.samples(), Some(height)))
}
