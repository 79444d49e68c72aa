use crate::signal::Signal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Style {
    pub width: f32,
    pub dash: Option<[f32; 2]>,
    pub color: Color,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Color(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub style: Style,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Series {
    Line(LineSeries),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub title: Option<String>,
    pub x: Axis,
    pub y: Axis,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(title: impl Into<Option<String>>) -> Self {
        Self {
            title: title.into(),
            x: Axis { label: None },
            y: Axis { label: None },
            series: Vec::new(),
        }
    }

    pub fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }
}

pub fn decimate_points(points: &[[f64; 2]], max_points: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_points {
        return points.to_vec();
    }
    let bucket_size = points.len() as f64 / max_points as f64;
    let mut result = Vec::with_capacity(max_points);
    for i in 0..max_points {
        let start = (i as f64 * bucket_size).floor() as usize;
        if start >= points.len() {
            break;
        }
        result.push(points[start]);
    }
    result
}

fn signal_points(signal: &Signal) -> Vec<[f64; 2]> {
    let dt = 1.0 / signal.fs();
    signal
        .samples()
        .iter()
        .enumerate()
        .map(|(i, value)| [i as f64 * dt, *value])
        .collect()
}

fn line(name: &str, points: Vec<[f64; 2]>, color: u32) -> Series {
    Series::Line(LineSeries {
        name: name.into(),
        points,
        style: Style {
            width: 1.4,
            dash: None,
            color: Color(color),
        },
    })
}

pub fn figure_from_signal(title: &str, signal: &Signal, max_points: usize, color: u32) -> Figure {
    let mut fig = Figure::new(Some(title.into()));
    fig.add_series(line(
        title,
        decimate_points(&signal_points(signal), max_points),
        color,
    ));
    fig
}

/// Raw and conditioned waveforms on one pair of axes.
pub fn overlay_figure(original: &Signal, denoised: &Signal, max_points: usize) -> Figure {
    let mut fig = Figure::new(Some("waveform".into()));
    fig.add_series(line(
        "original",
        decimate_points(&signal_points(original), max_points),
        0x1F77B4,
    ));
    fig.add_series(line(
        "denoised",
        decimate_points(&signal_points(denoised), max_points),
        0xD62728,
    ));
    fig
}

/// What the conditioning removed, point by point.
pub fn residual_figure(original: &Signal, denoised: &Signal, max_points: usize) -> Figure {
    let dt = 1.0 / original.fs();
    let points: Vec<[f64; 2]> = original
        .samples()
        .iter()
        .zip(denoised.samples())
        .enumerate()
        .map(|(i, (a, b))| [i as f64 * dt, a - b])
        .collect();
    let mut fig = Figure::new(Some("residual".into()));
    fig.add_series(line("residual", decimate_points(&points, max_points), 0x2CA02C));
    fig
}
