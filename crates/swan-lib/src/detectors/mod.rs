pub mod peaks;

pub use peaks::{find_peaks, find_r_peaks};
