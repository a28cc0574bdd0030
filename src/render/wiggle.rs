use eframe::egui::Color32;

use super::{finite_extent, nan_max, Axes, Content, RenderSession};
use crate::data::clip::percentile_clip;
use crate::data::model::SeismicDataset;
use crate::data::range::{select, SectionRequest};
use crate::error::{Result, SeismicError, Warning};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// Shade positive excursions between the baseline and the trace.
    VariableArea,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WiggleOptions {
    /// Draw every n-th trace.
    pub trace_skip: usize,
    /// Upper bound on drawn traces; when exceeded the skip becomes
    /// `floor(ntraces / max_traces)`.
    pub max_traces: Option<usize>,
    pub line_width: f32,
    pub gain: f64,
    pub fill: FillMode,
    pub color: Color32,
}

impl Default for WiggleOptions {
    fn default() -> Self {
        Self {
            trace_skip: 1,
            max_traces: None,
            line_width: 0.5,
            gain: 1.0,
            fill: FillMode::VariableArea,
            color: Color32::RED,
        }
    }
}

impl WiggleOptions {
    fn validate(&self) -> Result<()> {
        if self.trace_skip == 0 {
            return Err(SeismicError::config("trace skip must be at least 1"));
        }
        if self.max_traces == Some(0) {
            return Err(SeismicError::config("max traces must be at least 1"));
        }
        if !self.gain.is_finite() {
            return Err(SeismicError::config(format!(
                "gain must be finite, got {}",
                self.gain
            )));
        }
        if !(self.line_width.is_finite() && self.line_width >= 0.0) {
            return Err(SeismicError::config(format!(
                "line width must be non-negative, got {}",
                self.line_width
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Output geometry
// ---------------------------------------------------------------------------

/// A convex polygon in plot coordinates (`[x, y]` vertices).
#[derive(Debug, Clone, PartialEq)]
pub struct FillPatch {
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WiggleTrace {
    /// Column index within the visible view.
    pub column: usize,
    pub baseline: f64,
    /// Working copy of the trace: endpoints pinned to zero and, in
    /// variable-area mode, negative samples zeroed.
    pub amplitudes: Vec<f64>,
    /// Horizontal position of the trace line at each sample.
    pub offsets: Vec<f64>,
    pub fill: Vec<FillPatch>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WigglePlot {
    /// Vertical coordinate of every sample, shared by all traces.
    pub y: Vec<f64>,
    pub traces: Vec<WiggleTrace>,
    pub color: Color32,
    pub line_width: f32,
}

// ---------------------------------------------------------------------------
// Plotter
// ---------------------------------------------------------------------------

impl RenderSession {
    /// Wiggle display of the selected, clipped window.
    ///
    /// On error the session keeps whatever it showed before.
    pub fn wiggle(
        &mut self,
        dataset: &SeismicDataset,
        request: &SectionRequest,
        options: &WiggleOptions,
    ) -> Result<()> {
        options.validate()?;
        let view = select(dataset, request)?;
        let clipped = percentile_clip(&view.data, request.percentile)?;
        let mut warnings: Vec<Warning> = clipped.warning.into_iter().collect();
        let data = clipped.data;

        let ntraces = data.ncols();
        let skip = match options.max_traces {
            Some(max) if max < ntraces => (ntraces / max).max(1),
            _ => options.trace_skip,
        };
        let dx = if view.x.len() >= 2 {
            view.x[1] - view.x[0]
        } else {
            1.0
        };

        // Normalise by the largest sample, not the largest magnitude.
        let max_val = nan_max(data.iter()).map(f64::abs).unwrap_or(0.0);
        let scale = if max_val > 0.0 && max_val.is_finite() {
            options.gain * skip as f64 * dx / max_val
        } else {
            if ntraces > 0 && data.nrows() > 0 && warnings.is_empty() {
                warnings.push(Warning::DegenerateScale {
                    stage: "wiggle normalisation",
                });
            }
            0.0
        };

        let traces: Vec<WiggleTrace> = (0..ntraces)
            .step_by(skip)
            .map(|i| {
                let baseline = view.x[i];
                let mut amplitudes = data.column(i).to_vec();
                if let Some(first) = amplitudes.first_mut() {
                    *first = 0.0;
                }
                if let Some(last) = amplitudes.last_mut() {
                    *last = 0.0;
                }

                // NaN samples stay NaN and leave a gap in the line.
                let reach = dx.abs();
                let offsets: Vec<f64> = amplitudes
                    .iter()
                    .map(|&a| {
                        if a.is_nan() {
                            f64::NAN
                        } else {
                            (baseline + scale * a).max(baseline - reach).min(baseline + reach)
                        }
                    })
                    .collect();

                let fill = match options.fill {
                    FillMode::VariableArea => {
                        for a in amplitudes.iter_mut().filter(|a| **a < 0.0) {
                            *a = 0.0;
                        }
                        positive_patches(baseline, &offsets, &view.y)
                    }
                    FillMode::None => Vec::new(),
                };

                WiggleTrace {
                    column: i,
                    baseline,
                    amplitudes,
                    offsets,
                    fill,
                }
            })
            .collect();

        let axes = Axes {
            x_label: view.x_label,
            y_label: view.y_label,
            x_limits: match (view.x.first(), view.x.last()) {
                (Some(first), Some(last)) => Some((first - 1.0, last + 1.0)),
                _ => None,
            },
            y_limits: finite_extent(&view.y),
            y_inverted: true,
        };

        log::debug!(
            "wiggle: {} of {} traces, skip {skip}, dx {dx}, max {max_val}",
            traces.len(),
            ntraces
        );

        self.install(
            axes,
            Content::Wiggle(WigglePlot {
                y: view.y,
                traces,
                color: options.color,
                line_width: options.line_width,
            }),
            warnings,
        );
        Ok(())
    }
}

/// Convex pieces of the region between `baseline` and the trace where the
/// trace lies to the right of it. Baseline crossings are located by linear
/// interpolation.
fn positive_patches(baseline: f64, offsets: &[f64], y: &[f64]) -> Vec<FillPatch> {
    offsets
        .windows(2)
        .zip(y.windows(2))
        .filter(|(x, _)| !x[0].is_nan() && !x[1].is_nan())
        .filter_map(|(x, y)| {
            let (a0, a1) = (x[0] - baseline, x[1] - baseline);
            let crossing = || y[0] + a0 / (a0 - a1) * (y[1] - y[0]);
            let points = if a0 > 0.0 && a1 > 0.0 {
                vec![[baseline, y[0]], [x[0], y[0]], [x[1], y[1]], [baseline, y[1]]]
            } else if a0 > 0.0 {
                vec![[baseline, y[0]], [x[0], y[0]], [baseline, crossing()]]
            } else if a1 > 0.0 {
                vec![[baseline, crossing()], [x[1], y[1]], [baseline, y[1]]]
            } else {
                return None;
            };
            Some(FillPatch { points })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::range::AxisLabel;
    use ndarray::{array, Array2};

    fn dataset(samples: Array2<f64>) -> SeismicDataset {
        SeismicDataset::without_headers(samples, 0.001).unwrap()
    }

    fn noisy(ns: usize, ntraces: usize) -> SeismicDataset {
        dataset(Array2::from_shape_fn((ns, ntraces), |(k, i)| {
            ((k * 7 + i * 3) as f64).sin() + 0.3
        }))
    }

    #[test]
    fn endpoints_are_pinned_to_zero() {
        let ds = noisy(25, 6);
        let mut session = RenderSession::new();
        for fill in [FillMode::VariableArea, FillMode::None] {
            let options = WiggleOptions {
                fill,
                ..Default::default()
            };
            session.wiggle(&ds, &SectionRequest::default(), &options).unwrap();
            for trace in session.traces() {
                assert_eq!(trace.amplitudes[0], 0.0);
                assert_eq!(trace.amplitudes[24], 0.0);
                assert_eq!(trace.offsets[0], trace.baseline);
                assert_eq!(trace.offsets[24], trace.baseline);
            }
        }
        // The source dataset is untouched.
        assert_ne!(ds.samples()[[0, 0]], 0.0);
    }

    #[test]
    fn excursions_stay_between_neighbours() {
        let ds = noisy(40, 5);
        let mut session = RenderSession::new();
        let options = WiggleOptions {
            gain: 25.0,
            ..Default::default()
        };
        session.wiggle(&ds, &SectionRequest::default(), &options).unwrap();
        for trace in session.traces() {
            assert!(trace
                .offsets
                .iter()
                .all(|&o| o >= trace.baseline - 1.0 && o <= trace.baseline + 1.0));
        }
    }

    #[test]
    fn normalises_by_max_not_max_magnitude() {
        let ds = dataset(array![[0.0, 0.0], [1.0, -4.0], [0.0, 0.0]]);
        let mut session = RenderSession::new();
        session
            .wiggle(&ds, &SectionRequest::default(), &WiggleOptions::default())
            .unwrap();
        let traces = session.traces();
        // max(data) = 1, so the first trace reaches a full trace spacing ...
        assert_eq!(traces[0].offsets[1], 1.0);
        // ... and the strongly negative one saturates at its left neighbour.
        assert_eq!(traces[1].offsets[1], 0.0);
    }

    #[test]
    fn all_zero_data_renders_at_baseline() {
        let ds = dataset(Array2::zeros((3, 4)));
        let request = SectionRequest {
            percentile: 50.0,
            ..Default::default()
        };
        let mut session = RenderSession::new();
        session.wiggle(&ds, &request, &WiggleOptions::default()).unwrap();
        assert_eq!(session.traces().len(), 4);
        for trace in session.traces() {
            assert!(trace.offsets.iter().all(|&o| o == trace.baseline));
            assert!(trace.fill.is_empty());
        }
        assert!(session
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::DegenerateScale { .. })));
    }

    #[test]
    fn trace_skip_draws_every_nth_trace() {
        let ds = noisy(10, 10);
        let mut session = RenderSession::new();
        let options = WiggleOptions {
            trace_skip: 3,
            ..Default::default()
        };
        session.wiggle(&ds, &SectionRequest::default(), &options).unwrap();
        let columns: Vec<usize> = session.traces().iter().map(|t| t.column).collect();
        assert_eq!(columns, vec![0, 3, 6, 9]);
    }

    #[test]
    fn max_traces_caps_the_trace_count() {
        let ds = noisy(10, 10);
        let mut session = RenderSession::new();
        let options = WiggleOptions {
            max_traces: Some(4),
            ..Default::default()
        };
        session.wiggle(&ds, &SectionRequest::default(), &options).unwrap();
        assert_eq!(session.traces().len(), 5);
    }

    #[test]
    fn variable_area_fills_positive_lobes_only() {
        let ds = dataset(array![[0.0], [1.0], [1.0], [-1.0], [-1.0], [0.0]]);
        let mut session = RenderSession::new();
        session
            .wiggle(&ds, &SectionRequest::default(), &WiggleOptions::default())
            .unwrap();
        let trace = &session.traces()[0];
        assert!(trace.amplitudes.iter().all(|&a| a >= 0.0));
        // rising edge triangle, one quad, falling crossing triangle
        assert_eq!(trace.fill.len(), 3);
        assert_eq!(trace.fill[1].points.len(), 4);
        for patch in &trace.fill {
            assert!(patch.points.iter().all(|p| p[0] >= trace.baseline));
            assert!(patch.points.iter().all(|p| (0.0..=3.0).contains(&p[1])));
        }
        // crossing between samples 2 and 3 lies halfway
        assert_eq!(trace.fill[2].points[2], [0.0, 2.5]);
    }

    #[test]
    fn no_fill_mode_keeps_negative_samples() {
        let ds = dataset(array![[0.0], [1.0], [-1.0], [0.0]]);
        let mut session = RenderSession::new();
        let options = WiggleOptions {
            fill: FillMode::None,
            ..Default::default()
        };
        session.wiggle(&ds, &SectionRequest::default(), &options).unwrap();
        let trace = &session.traces()[0];
        assert_eq!(trace.amplitudes[2], -1.0);
        assert!(trace.fill.is_empty());
    }

    #[test]
    fn axes_for_small_section() {
        let ds = dataset(array![[1.0, -1.0], [2.0, -2.0], [0.0, 0.0]]);
        let mut session = RenderSession::new();
        session
            .wiggle(&ds, &SectionRequest::default(), &WiggleOptions::default())
            .unwrap();
        assert_eq!(session.axes.x_label, AxisLabel::TraceNumber);
        assert_eq!(session.axes.y_label, AxisLabel::SampleNumber);
        assert_eq!(session.axes.x_limits, Some((-1.0, 2.0)));
        assert_eq!(session.axes.y_limits, Some((0.0, 2.0)));
        assert!(session.axes.y_inverted);
        let Content::Wiggle(plot) = &session.content else {
            panic!("expected wiggle content");
        };
        assert_eq!(plot.y, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn empty_trace_window_is_a_no_op() {
        let ds = noisy(10, 10);
        let request = SectionRequest {
            trace_range: Some(vec![4.0, 4.0]),
            ..Default::default()
        };
        let mut session = RenderSession::new();
        session.wiggle(&ds, &request, &WiggleOptions::default()).unwrap();
        assert!(session.traces().is_empty());
        assert_eq!(session.axes.x_limits, None);
        assert!(session.axes.y_inverted);
    }

    #[test]
    fn errors_leave_the_session_untouched() {
        let ds = noisy(10, 10);
        let mut session = RenderSession::new();
        session
            .wiggle(&ds, &SectionRequest::default(), &WiggleOptions::default())
            .unwrap();
        let before = session.traces().to_vec();

        let bad_range = SectionRequest {
            trace_range: Some(vec![1.0, 2.0, 3.0]),
            ..Default::default()
        };
        assert!(session
            .wiggle(&ds, &bad_range, &WiggleOptions::default())
            .is_err());
        let bad_skip = WiggleOptions {
            trace_skip: 0,
            ..Default::default()
        };
        assert!(session
            .wiggle(&ds, &SectionRequest::default(), &bad_skip)
            .is_err());
        assert_eq!(session.traces(), before.as_slice());
    }

    #[test]
    fn nan_samples_leave_a_gap() {
        let ds = dataset(array![[0.0], [1.0], [f64::NAN], [0.5], [0.0]]);
        let mut session = RenderSession::new();
        session
            .wiggle(&ds, &SectionRequest::default(), &WiggleOptions::default())
            .unwrap();
        let trace = &session.traces()[0];
        assert_eq!(trace.offsets[1], 1.0);
        assert!(trace.offsets[2].is_nan());
        assert_eq!(trace.offsets[3], 0.5);
        // no patch touches the missing sample
        assert_eq!(trace.fill.len(), 2);
        assert!(trace
            .fill
            .iter()
            .flat_map(|p| &p.points)
            .all(|p| p[0].is_finite() && p[1].is_finite()));
    }

    #[test]
    fn all_zero_data_reports_one_warning() {
        let ds = dataset(Array2::zeros((3, 4)));
        let mut session = RenderSession::new();
        session
            .wiggle(&ds, &SectionRequest::default(), &WiggleOptions::default())
            .unwrap();
        assert_eq!(
            session.warnings,
            vec![Warning::DegenerateScale {
                stage: "percentile clip"
            }]
        );
    }

    #[test]
    fn single_trace_uses_unit_spacing() {
        let ds = dataset(array![[0.0], [2.0], [0.0]]);
        let mut session = RenderSession::new();
        session
            .wiggle(&ds, &SectionRequest::default(), &WiggleOptions::default())
            .unwrap();
        assert_eq!(session.traces()[0].offsets[1], 1.0);
    }
}
