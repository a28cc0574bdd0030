use std::collections::BTreeMap;
use std::fmt;

use ndarray::Array2;

use crate::error::{Axis, Result, SeismicError};

/// Header column holding the receiver position along the line.
pub const RECEIVER_X: &str = "receiver_x";
/// Header column holding the source–receiver offset.
pub const OFFSET: &str = "offset";

// ---------------------------------------------------------------------------
// HeaderValue – a single cell of the trace header table
// ---------------------------------------------------------------------------

/// A dynamically-typed trace header attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Integer(i64),
    Float(f64),
    String(String),
    Null,
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Integer(i) => write!(f, "{i}"),
            HeaderValue::Float(v) => write!(f, "{v:.4}"),
            HeaderValue::String(s) => write!(f, "{s}"),
            HeaderValue::Null => write!(f, "<null>"),
        }
    }
}

impl HeaderValue {
    /// Try to interpret the value as an `f64` (used for coordinate columns).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HeaderValue::Float(v) => Some(*v),
            HeaderValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// HeaderTable – one row of attributes per trace
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct HeaderTable {
    /// Column names in display order.
    pub columns: Vec<String>,
    /// One row per trace: column name → value.
    pub rows: Vec<BTreeMap<String, HeaderValue>>,
}

impl HeaderTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row; missing columns read back as [`HeaderValue::Null`].
    pub fn push_row(&mut self, row: BTreeMap<String, HeaderValue>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn value(&self, trace: usize, column: &str) -> &HeaderValue {
        self.rows
            .get(trace)
            .and_then(|row| row.get(column))
            .unwrap_or(&HeaderValue::Null)
    }

    /// Extract a whole column as floats. `None` if any row lacks a numeric value.
    pub fn column_f64(&self, column: &str) -> Option<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| row.get(column).and_then(HeaderValue::as_f64))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SeismicDataset – samples[time][trace] + dt + headers
// ---------------------------------------------------------------------------

/// The in-memory section handed over by the format reader. Read-only for
/// everything downstream: selections and clipping work on copies.
#[derive(Debug, Clone)]
pub struct SeismicDataset {
    samples: Array2<f64>,
    dt: f64,
    headers: HeaderTable,
}

impl SeismicDataset {
    pub fn new(samples: Array2<f64>, dt: f64, headers: HeaderTable) -> Result<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SeismicError::config(format!(
                "sample interval must be positive, got {dt}"
            )));
        }
        let (ns, ntraces) = samples.dim();
        if ns == 0 || ntraces == 0 {
            return Err(SeismicError::config(format!(
                "dataset must hold at least one sample and one trace, got {ns}x{ntraces}"
            )));
        }
        if headers.len() != ntraces {
            return Err(SeismicError::ShapeMismatch {
                axis: Axis::Traces,
                expected: ntraces,
                actual: headers.len(),
            });
        }
        Ok(Self {
            samples,
            dt,
            headers,
        })
    }

    /// Build a dataset with an empty-attribute header row per trace.
    pub fn without_headers(samples: Array2<f64>, dt: f64) -> Result<Self> {
        let mut headers = HeaderTable::new(Vec::new());
        for _ in 0..samples.ncols() {
            headers.push_row(BTreeMap::new());
        }
        Self::new(samples, dt, headers)
    }

    pub fn samples(&self) -> &Array2<f64> {
        &self.samples
    }

    /// Sample interval in seconds.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn headers(&self) -> &HeaderTable {
        &self.headers
    }

    pub fn num_samples(&self) -> usize {
        self.samples.nrows()
    }

    pub fn num_traces(&self) -> usize {
        self.samples.ncols()
    }

    /// Physical time of every sample, `k * dt`.
    pub fn time_axis(&self) -> Vec<f64> {
        (0..self.num_samples()).map(|k| k as f64 * self.dt).collect()
    }

    pub fn summary(&self) -> DatasetSummary {
        let receiver_spacing = if self.num_traces() >= 2 {
            match (
                self.headers.value(0, RECEIVER_X).as_f64(),
                self.headers.value(1, RECEIVER_X).as_f64(),
            ) {
                (Some(first), Some(second)) => Some(second - first),
                _ => None,
            }
        } else {
            None
        };
        DatasetSummary {
            dt: self.dt,
            receiver_spacing,
            num_samples: self.num_samples(),
            num_traces: self.num_traces(),
        }
    }
}

// ---------------------------------------------------------------------------
// DatasetSummary – the quick facts shown in the top bar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetSummary {
    /// Time step in seconds.
    pub dt: f64,
    /// Receiver sampling: `receiver_x[1] - receiver_x[0]`.
    pub receiver_spacing: Option<f64>,
    pub num_samples: usize,
    pub num_traces: usize,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} traces × {} samples, time step {} s",
            self.num_traces, self.num_samples, self.dt
        )?;
        if let Some(spacing) = self.receiver_spacing {
            write!(f, ", receiver sampling {spacing}")?;
        }
        Ok(())
    }
}
