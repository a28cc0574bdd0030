//! Backend-neutral rendering.
//!
//! A [`RenderSession`] plays the role of a figure/axes handle: each plotter
//! validates its input, then replaces the session's content with the lines,
//! fill patches or raster it produced. The egui layer in `ui::plot` only
//! reads sessions; it never computes geometry.

pub mod image;
pub mod wiggle;

use crate::data::range::AxisLabel;
use crate::error::Warning;

pub use image::{ImageOptions, ImageSession, Raster};
pub use wiggle::{FillMode, WiggleOptions, WigglePlot, WiggleTrace};

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub x_label: AxisLabel,
    pub y_label: AxisLabel,
    /// `None` when there is nothing to frame (empty view).
    pub x_limits: Option<(f64, f64)>,
    pub y_limits: Option<(f64, f64)>,
    /// Time grows downwards on seismic sections.
    pub y_inverted: bool,
}

impl Default for Axes {
    fn default() -> Self {
        Self {
            x_label: AxisLabel::TraceNumber,
            y_label: AxisLabel::SampleNumber,
            x_limits: None,
            y_limits: None,
            y_inverted: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Scene content
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub enum Content {
    #[default]
    Empty,
    Wiggle(WigglePlot),
    Image(ImageSession),
}

// ---------------------------------------------------------------------------
// RenderSession
// ---------------------------------------------------------------------------

/// One plot window: axes, drawn content and the warnings of the last render.
#[derive(Debug, Default)]
pub struct RenderSession {
    pub axes: Axes,
    pub content: Content,
    pub warnings: Vec<Warning>,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn traces(&self) -> &[WiggleTrace] {
        match &self.content {
            Content::Wiggle(plot) => &plot.traces,
            _ => &[],
        }
    }

    pub fn image_session(&self) -> Option<&ImageSession> {
        match &self.content {
            Content::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn image_session_mut(&mut self) -> Option<&mut ImageSession> {
        match &mut self.content {
            Content::Image(image) => Some(image),
            _ => None,
        }
    }

    fn install(&mut self, axes: Axes, content: Content, warnings: Vec<Warning>) {
        for w in &warnings {
            log::warn!("{w}");
        }
        self.axes = axes;
        self.content = content;
        self.warnings = warnings;
    }
}

/// `[min, max]` of the finite values, or `None` if there are none.
pub(crate) fn finite_extent(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// `max(data)` ignoring NaN, as a seismic normaliser. `None` for empty data.
pub(crate) fn nan_max<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<f64> {
    values
        .into_iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}
