use eframe::egui::Color32;
use ndarray::Array2;

use super::{finite_extent, nan_max, Axes, Content, RenderSession};
use crate::color::SeismicColormap;
use crate::data::clip::percentile_clip;
use crate::data::model::SeismicDataset;
use crate::data::range::{select, SectionRequest};
use crate::error::{Result, SeismicError, Warning};

#[derive(Debug, Clone, PartialEq)]
pub struct ImageOptions {
    pub gain: f64,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self { gain: 1.0 }
    }
}

// ---------------------------------------------------------------------------
// Rescale observer
// ---------------------------------------------------------------------------

/// Receives new colour limits whenever a display control changes.
pub trait Rescale {
    fn on_rescale(&mut self, min: f64, max: f64);
}

// ---------------------------------------------------------------------------
// Raster – gained values plus the current colour limits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Raster {
    /// Cell centres along x, one per visible trace.
    pub x: Vec<f64>,
    /// Cell centres along y, one per visible sample.
    pub y: Vec<f64>,
    /// `data * gain`; computed once, never touched by rescaling.
    values: Array2<f64>,
    clim: (f64, f64),
    /// Bumped whenever the colour limits actually change.
    revision: u64,
}

impl Raster {
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn color_limits(&self) -> (f64, f64) {
        self.clim
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// `[width, height]` in cells.
    pub fn size(&self) -> [usize; 2] {
        [self.values.ncols(), self.values.nrows()]
    }

    /// Row-major colours, sample 0 first, for texture upload.
    pub fn colors(&self, cmap: &SeismicColormap) -> Vec<Color32> {
        let (lo, hi) = self.clim;
        self.values.iter().map(|&v| cmap.map(v, lo, hi)).collect()
    }

    /// `(min, max)` corners of the area covered by the cells, each cell
    /// extending half a spacing around its centre.
    pub fn extent(&self) -> Option<([f64; 2], [f64; 2])> {
        let (x0, x1) = cell_span(&self.x)?;
        let (y0, y1) = cell_span(&self.y)?;
        Some(([x0, y0], [x1, y1]))
    }
}

impl Rescale for Raster {
    fn on_rescale(&mut self, min: f64, max: f64) {
        if self.clim != (min, max) {
            self.clim = (min, max);
            self.revision += 1;
        }
    }
}

fn cell_span(centres: &[f64]) -> Option<(f64, f64)> {
    let (lo, hi) = finite_extent(centres)?;
    let half = if centres.len() >= 2 {
        (hi - lo) / (centres.len() - 1) as f64 / 2.0
    } else {
        0.5
    };
    Some((lo - half, hi + half))
}

// ---------------------------------------------------------------------------
// Display controls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderControl {
    pub min: f64,
    pub max: f64,
    pub value: f64,
}

impl SliderControl {
    fn new(min: f64, max: f64, value: f64) -> Self {
        Self { min, max, value }
    }

    fn set(&mut self, value: f64) {
        if !value.is_nan() {
            self.value = value.max(self.min).min(self.max);
        }
    }
}

/// The min-clip / max-clip / gain triple of an image plot.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub min_clip: SliderControl,
    pub max_clip: SliderControl,
    pub gain: SliderControl,
}

impl DisplayState {
    /// Controls sized from the largest magnitude of the displayed data.
    pub fn new(max_abs: f64, gain: f64) -> Self {
        Self {
            min_clip: SliderControl::new(-max_abs, 0.0, -max_abs),
            max_clip: SliderControl::new(0.0, max_abs, max_abs),
            gain: SliderControl::new(gain, 10.0 * gain, gain),
        }
    }

    /// Colour limits implied by the current control values.
    pub fn effective_limits(&self) -> (f64, f64) {
        (
            self.min_clip.value / self.gain.value,
            self.max_clip.value / self.gain.value,
        )
    }

    pub fn set_min_clip(&mut self, value: f64, target: &mut dyn Rescale) -> (f64, f64) {
        self.min_clip.set(value);
        self.notify(target)
    }

    pub fn set_max_clip(&mut self, value: f64, target: &mut dyn Rescale) -> (f64, f64) {
        self.max_clip.set(value);
        self.notify(target)
    }

    pub fn set_gain(&mut self, value: f64, target: &mut dyn Rescale) -> (f64, f64) {
        self.gain.set(value);
        self.notify(target)
    }

    fn notify(&self, target: &mut dyn Rescale) -> (f64, f64) {
        let (min, max) = self.effective_limits();
        target.on_rescale(min, max);
        (min, max)
    }
}

// ---------------------------------------------------------------------------
// ImageSession – raster + its controls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ImageSession {
    pub raster: Raster,
    pub display: DisplayState,
}

impl ImageSession {
    pub fn set_min_clip(&mut self, value: f64) -> (f64, f64) {
        self.display.set_min_clip(value, &mut self.raster)
    }

    pub fn set_max_clip(&mut self, value: f64) -> (f64, f64) {
        self.display.set_max_clip(value, &mut self.raster)
    }

    pub fn set_gain(&mut self, value: f64) -> (f64, f64) {
        self.display.set_gain(value, &mut self.raster)
    }
}

// ---------------------------------------------------------------------------
// Plotter
// ---------------------------------------------------------------------------

impl RenderSession {
    /// False-colour image of the selected, clipped window with interactive
    /// clip and gain controls. Returns the new image session.
    pub fn image(
        &mut self,
        dataset: &SeismicDataset,
        request: &SectionRequest,
        options: &ImageOptions,
    ) -> Result<&mut ImageSession> {
        let gain = options.gain;
        if !(gain.is_finite() && gain > 0.0) {
            return Err(SeismicError::config(format!(
                "image gain must be positive, got {gain}"
            )));
        }
        let view = select(dataset, request)?;
        let clipped = percentile_clip(&view.data, request.percentile)?;
        let mut warnings: Vec<Warning> = clipped.warning.into_iter().collect();
        let data = clipped.data;

        // Symmetric limits from max(data), not max(|data|). With no positive
        // sample the range is empty or reversed and every cell maps to the
        // centre colour.
        let maxval = nan_max(data.iter()).unwrap_or(0.0) * gain;
        if !(maxval > 0.0) && !data.is_empty() && warnings.is_empty() {
            warnings.push(Warning::DegenerateScale {
                stage: "image colour range",
            });
        }
        let max_abs = data.iter().fold(0.0f64, |m, v| m.max(v.abs()));

        let raster = Raster {
            values: data.mapv(|v| v * gain),
            clim: (-maxval, maxval),
            revision: 0,
            x: view.x,
            y: view.y,
        };

        let axes = Axes {
            x_label: view.x_label,
            y_label: view.y_label,
            x_limits: raster.extent().map(|(min, max)| (min[0], max[0])),
            y_limits: raster.extent().map(|(min, max)| (min[1], max[1])),
            y_inverted: true,
        };

        log::debug!(
            "image: {}x{} cells, limits ±{maxval}, max |amplitude| {max_abs}",
            raster.size()[0],
            raster.size()[1]
        );

        self.install(
            axes,
            Content::Image(ImageSession {
                raster,
                display: DisplayState::new(max_abs, gain),
            }),
            warnings,
        );
        self.image_session_mut()
            .ok_or_else(|| SeismicError::config("image session was not installed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::range::AxisLabel;
    use ndarray::array;

    fn dataset(samples: Array2<f64>) -> SeismicDataset {
        SeismicDataset::without_headers(samples, 0.002).unwrap()
    }

    #[test]
    fn initial_state_from_data() {
        let ds = dataset(array![[1.0, -3.0], [2.0, 0.5]]);
        let mut session = RenderSession::new();
        let image = session
            .image(&ds, &SectionRequest::default(), &ImageOptions { gain: 2.0 })
            .unwrap();
        assert_eq!(image.raster.values(), &array![[2.0, -6.0], [4.0, 1.0]]);
        assert_eq!(image.raster.color_limits(), (-4.0, 4.0));
        assert_eq!(image.display.min_clip, SliderControl::new(-3.0, 0.0, -3.0));
        assert_eq!(image.display.max_clip, SliderControl::new(0.0, 3.0, 3.0));
        assert_eq!(image.display.gain, SliderControl::new(2.0, 20.0, 2.0));
    }

    #[test]
    fn colour_scale_uses_max_not_max_magnitude() {
        let ds = dataset(array![[1.0, -4.0]]);
        let mut session = RenderSession::new();
        let image = session
            .image(&ds, &SectionRequest::default(), &ImageOptions::default())
            .unwrap();
        // max(|data|) would be 4
        assert_eq!(image.raster.color_limits(), (-1.0, 1.0));
    }

    #[test]
    fn control_changes_rescale_without_touching_values() {
        let ds = dataset(array![[1.0, -3.0], [2.0, 0.5]]);
        let mut session = RenderSession::new();
        let image = session
            .image(&ds, &SectionRequest::default(), &ImageOptions { gain: 2.0 })
            .unwrap();
        let values = image.raster.values().clone();

        image.set_min_clip(-2.0);
        image.set_max_clip(3.0);
        assert_eq!(image.raster.color_limits(), (-1.0, 1.5));
        assert_eq!(image.set_gain(4.0), (-0.5, 0.75));
        assert_eq!(image.raster.color_limits(), (-0.5, 0.75));
        assert_eq!(image.raster.values(), &values);
    }

    #[test]
    fn repeated_updates_are_idempotent() {
        let ds = dataset(array![[1.0, -3.0], [2.0, 0.5]]);
        let mut session = RenderSession::new();
        let image = session
            .image(&ds, &SectionRequest::default(), &ImageOptions::default())
            .unwrap();

        let first = image.set_max_clip(1.5);
        let revision = image.raster.revision();
        let second = image.set_max_clip(1.5);
        assert_eq!(first, second);
        assert_eq!(image.raster.color_limits(), second);
        assert_eq!(image.raster.revision(), revision);
    }

    #[test]
    fn controls_clamp_to_their_ranges() {
        let ds = dataset(array![[1.0, -3.0]]);
        let mut session = RenderSession::new();
        let image = session
            .image(&ds, &SectionRequest::default(), &ImageOptions::default())
            .unwrap();
        image.set_min_clip(-100.0);
        image.set_max_clip(-5.0);
        image.set_gain(0.0);
        assert_eq!(image.display.min_clip.value, -3.0);
        assert_eq!(image.display.max_clip.value, 0.0);
        assert_eq!(image.display.gain.value, 1.0);
        assert_eq!(image.raster.color_limits(), (-3.0, 0.0));
    }

    #[test]
    fn display_state_notifies_any_observer() {
        struct Recorder(Vec<(f64, f64)>);
        impl Rescale for Recorder {
            fn on_rescale(&mut self, min: f64, max: f64) {
                self.0.push((min, max));
            }
        }
        let mut state = DisplayState::new(2.0, 1.0);
        let mut recorder = Recorder(Vec::new());
        state.set_gain(2.0, &mut recorder);
        state.set_min_clip(-1.0, &mut recorder);
        assert_eq!(recorder.0, vec![(-1.0, 1.0), (-0.5, 1.0)]);
    }

    #[test]
    fn rejects_non_positive_gain_before_drawing() {
        let ds = dataset(array![[1.0]]);
        let mut session = RenderSession::new();
        for gain in [0.0, -1.0, f64::NAN] {
            assert!(session
                .image(&ds, &SectionRequest::default(), &ImageOptions { gain })
                .is_err());
        }
        assert!(session.image_session_mut().is_none());
    }

    #[test]
    fn zero_data_gets_centre_colours() {
        let ds = dataset(Array2::zeros((3, 4)));
        let mut session = RenderSession::new();
        let cmap = SeismicColormap::default();
        let image = session
            .image(&ds, &SectionRequest::default(), &ImageOptions::default())
            .unwrap();
        assert_eq!(image.raster.color_limits(), (-0.0, 0.0));
        assert!(image
            .raster
            .colors(&cmap)
            .iter()
            .all(|&c| c == Color32::WHITE));
        // one cause, one warning
        assert_eq!(session.warnings.len(), 1);
    }

    #[test]
    fn all_negative_data_reports_a_degenerate_scale() {
        let ds = dataset(array![[-1.0, -3.0], [-2.0, -0.5]]);
        let mut session = RenderSession::new();
        let cmap = SeismicColormap::default();
        let image = session
            .image(&ds, &SectionRequest::default(), &ImageOptions::default())
            .unwrap();
        // max(data) = -0.5 gives reversed limits
        assert_eq!(image.raster.color_limits(), (0.5, -0.5));
        assert!(image
            .raster
            .colors(&cmap)
            .iter()
            .all(|&c| c == Color32::WHITE));
        // the clip controls still span the data
        assert_eq!(image.display.min_clip.value, -3.0);
        assert_eq!(
            session.warnings,
            vec![Warning::DegenerateScale {
                stage: "image colour range"
            }]
        );
    }

    #[test]
    fn colours_follow_the_limits() {
        let ds = dataset(array![[-1.0, 0.0, 1.0]]);
        let mut session = RenderSession::new();
        let cmap = SeismicColormap::default();
        let image = session
            .image(&ds, &SectionRequest::default(), &ImageOptions::default())
            .unwrap();
        let colors = image.raster.colors(&cmap);
        assert_eq!(colors[0], cmap.color_at(0.0));
        assert_eq!(colors[1], Color32::WHITE);
        assert_eq!(colors[2], cmap.color_at(1.0));
    }

    #[test]
    fn axes_cover_the_cells() {
        let ds = dataset(array![[1.0, -1.0], [2.0, -2.0], [0.0, 0.0]]);
        let mut session = RenderSession::new();
        session
            .image(&ds, &SectionRequest::default(), &ImageOptions::default())
            .unwrap();
        assert_eq!(session.axes.x_label, AxisLabel::TraceNumber);
        assert_eq!(session.axes.y_label, AxisLabel::SampleNumber);
        assert_eq!(session.axes.x_limits, Some((-0.5, 1.5)));
        assert_eq!(session.axes.y_limits, Some((-0.5, 2.5)));
        assert!(session.axes.y_inverted);
        let raster = &session.image_session().unwrap().raster;
        assert_eq!(raster.x, vec![0.0, 1.0]);
        assert_eq!(raster.y, vec![0.0, 1.0, 2.0]);
    }
}
