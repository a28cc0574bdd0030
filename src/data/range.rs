use std::fmt;
use std::ops::Range;

use ndarray::{s, Array2};

use super::model::SeismicDataset;
use crate::error::{Axis, Result, SeismicError};

// ---------------------------------------------------------------------------
// Request: which part of the section to show and on which coordinates
// ---------------------------------------------------------------------------

/// Everything the plotters need to cut a view out of a dataset.
///
/// The ranges are plain lists so that the "exactly two elements" rule is
/// enforced here rather than by the caller's types; the UI builds them from
/// free-form text.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRequest {
    /// `[start, end)` trace indices.
    pub trace_range: Option<Vec<f64>>,
    /// `[start, end)` sample indices, or seconds when `time_in_seconds`.
    pub time_range: Option<Vec<f64>>,
    pub time_in_seconds: bool,
    /// Explicit x-coordinates, one per trace of the full dataset.
    pub x: Option<Vec<f64>>,
    /// Explicit time axis, one value per sample of the full dataset.
    pub t: Option<Vec<f64>>,
    /// Percentile of |amplitude| used as the clip bound; 100 disables clipping.
    pub percentile: f64,
}

impl Default for SectionRequest {
    fn default() -> Self {
        Self {
            trace_range: None,
            time_range: None,
            time_in_seconds: false,
            x: None,
            t: None,
            percentile: 100.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Axis labels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisLabel {
    Distance,
    TraceNumber,
    Time,
    SampleNumber,
}

impl fmt::Display for AxisLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisLabel::Distance => write!(f, "Distance [m]"),
            AxisLabel::TraceNumber => write!(f, "Trace number"),
            AxisLabel::Time => write!(f, "Time [s]"),
            AxisLabel::SampleNumber => write!(f, "Sample number"),
        }
    }
}

// ---------------------------------------------------------------------------
// SectionView – the sliced copy plus its axes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SectionView {
    /// `data[sample][trace]`, an owned copy of the selected window.
    pub data: Array2<f64>,
    /// One coordinate per visible trace.
    pub x: Vec<f64>,
    /// One coordinate per visible sample.
    pub y: Vec<f64>,
    pub x_label: AxisLabel,
    pub y_label: AxisLabel,
    pub traces: Range<usize>,
    pub samples: Range<usize>,
}

impl SectionView {
    pub fn num_traces(&self) -> usize {
        self.data.ncols()
    }

    pub fn num_samples(&self) -> usize {
        self.data.nrows()
    }
}

/// Cut the requested window out of `dataset`.
///
/// All validation happens before the matrix is touched. Seconds are turned
/// into sample indices by truncation (`floor(seconds / dt)`), so a window
/// end falling between two samples excludes the later one.
pub fn select(dataset: &SeismicDataset, request: &SectionRequest) -> Result<SectionView> {
    let ntraces = dataset.num_traces();
    let ns = dataset.num_samples();

    let traces = match &request.trace_range {
        Some(range) => {
            let [start, end] = two_elements(range, "trace_interval")?;
            index_range(start, end, ntraces, "trace_interval")?
        }
        None => 0..ntraces,
    };

    let samples = match &request.time_range {
        Some(range) => {
            let [mut start, mut end] = two_elements(range, "timesample_interval")?;
            if request.time_in_seconds {
                start = (start / dataset.dt()).floor();
                end = (end / dataset.dt()).floor();
            }
            index_range(start, end, ns, "timesample_interval")?
        }
        None => 0..ns,
    };

    if let Some(x) = &request.x {
        check_len(x, ntraces, Axis::Traces)?;
    }
    if let Some(t) = &request.t {
        check_len(t, ns, Axis::Samples)?;
    }

    let (x, x_label) = match &request.x {
        Some(x) => (x[traces.clone()].to_vec(), AxisLabel::Distance),
        None => (
            traces.clone().map(|i| i as f64).collect(),
            AxisLabel::TraceNumber,
        ),
    };
    let (y, y_label) = match &request.t {
        Some(t) => (t[samples.clone()].to_vec(), AxisLabel::Time),
        None => (
            samples.clone().map(|k| k as f64).collect(),
            AxisLabel::SampleNumber,
        ),
    };

    let data = dataset
        .samples()
        .slice(s![samples.clone(), traces.clone()])
        .to_owned();

    log::debug!(
        "selected traces {:?} and samples {:?} ({}x{})",
        traces,
        samples,
        data.nrows(),
        data.ncols()
    );

    Ok(SectionView {
        data,
        x,
        y,
        x_label,
        y_label,
        traces,
        samples,
    })
}

fn two_elements(range: &[f64], name: &str) -> Result<[f64; 2]> {
    match range {
        [start, end] => Ok([*start, *end]),
        _ => Err(SeismicError::config(format!(
            "{name} must have two elements, got {}",
            range.len()
        ))),
    }
}

fn index_range(start: f64, end: f64, len: usize, name: &str) -> Result<Range<usize>> {
    let as_index = |v: f64| -> Result<usize> {
        if v.is_finite() && v >= 0.0 && v.fract() == 0.0 {
            Ok(v as usize)
        } else {
            Err(SeismicError::config(format!(
                "{name} endpoints must be non-negative integers, got {v}"
            )))
        }
    };
    let (start, end) = (as_index(start)?, as_index(end)?);
    if start > end || end > len {
        return Err(SeismicError::config(format!(
            "{name} [{start}, {end}) is outside 0..{len}"
        )));
    }
    Ok(start..end)
}

fn check_len(coords: &[f64], expected: usize, axis: Axis) -> Result<()> {
    if coords.len() != expected {
        return Err(SeismicError::ShapeMismatch {
            axis,
            expected,
            actual: coords.len(),
        });
    }
    Ok(())
}
