use anyhow::{Context, Result};

use crate::data::model::{SeismicDataset, OFFSET};
use crate::data::range::SectionRequest;
use crate::data::synthetic::{shot_gather, SynthConfig};
use crate::render::{ImageOptions, RenderSession, WiggleOptions};

// ---------------------------------------------------------------------------
// View settings – what the side panel edits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Wiggle,
    Image,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub kind: PlotKind,
    /// Free text `start, end`; empty means the whole section.
    pub trace_range: String,
    pub time_range: String,
    pub time_in_seconds: bool,
    /// Use the offset header as x-coordinates.
    pub x_from_offset: bool,
    /// Label samples by `k * dt` instead of their index.
    pub t_from_dt: bool,
    pub percentile: f64,
    pub wiggle: WiggleOptions,
    pub image: ImageOptions,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            kind: PlotKind::Wiggle,
            trace_range: String::new(),
            time_range: String::new(),
            time_in_seconds: false,
            x_from_offset: false,
            t_from_dt: false,
            percentile: 100.0,
            wiggle: WiggleOptions::default(),
            image: ImageOptions::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Section on display (None until the generator has run).
    pub dataset: Option<SeismicDataset>,

    /// Parameters of the synthetic shot gather.
    pub synth: SynthConfig,

    /// Plot parameters edited in the side panel.
    pub settings: ViewSettings,

    /// Result of the last successful render.
    pub session: RenderSession,

    /// Incremented on every successful render, so cached textures can be dropped.
    pub generation: u64,

    /// Whether the trace header window is open.
    pub show_headers: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            synth: SynthConfig::default(),
            settings: ViewSettings::default(),
            session: RenderSession::new(),
            generation: 0,
            show_headers: false,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a new dataset and draw it with the current settings.
    pub fn set_dataset(&mut self, dataset: SeismicDataset) {
        log::info!("Loaded section: {}", dataset.summary());
        self.dataset = Some(dataset);
        self.session.clear();
        self.apply();
    }

    /// Rebuild the synthetic gather from `synth`.
    pub fn regenerate(&mut self) {
        match shot_gather(&self.synth).context("generating synthetic shot gather") {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => self.report(e),
        }
    }

    /// Re-render with the current settings, keeping the old plot on failure.
    pub fn apply(&mut self) {
        match self.render() {
            Ok(()) => {
                self.generation += 1;
                self.status_message = None;
            }
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, e: anyhow::Error) {
        log::error!("{e:#}");
        self.status_message = Some(format!("Error: {e:#}"));
    }

    fn render(&mut self) -> Result<()> {
        let Some(dataset) = &self.dataset else {
            return Ok(());
        };
        let request = self.request(dataset)?;
        match self.settings.kind {
            PlotKind::Wiggle => {
                self.session
                    .wiggle(dataset, &request, &self.settings.wiggle)
                    .context("wiggle plot")?;
                log::info!("Rendered {} wiggle traces", self.session.traces().len());
            }
            PlotKind::Image => {
                let image = self
                    .session
                    .image(dataset, &request, &self.settings.image)
                    .context("image plot")?;
                let [w, h] = image.raster.size();
                log::info!("Rendered {w}x{h} image");
            }
        }
        Ok(())
    }

    /// Translate the panel settings into a section request.
    pub fn request(&self, dataset: &SeismicDataset) -> Result<SectionRequest> {
        let x = if self.settings.x_from_offset {
            Some(
                dataset
                    .headers()
                    .column_f64(OFFSET)
                    .with_context(|| format!("header column '{OFFSET}' is not numeric"))?,
            )
        } else {
            None
        };
        Ok(SectionRequest {
            trace_range: parse_range(&self.settings.trace_range).context("trace range")?,
            time_range: parse_range(&self.settings.time_range).context("time range")?,
            time_in_seconds: self.settings.time_in_seconds,
            x,
            t: self.settings.t_from_dt.then(|| dataset.time_axis()),
            percentile: self.settings.percentile,
        })
    }
}

/// Parse `"start, end"` (commas and/or whitespace) into numbers. The element
/// count is checked later, by the range selection.
pub fn parse_range(text: &str) -> Result<Option<Vec<f64>>> {
    let tokens: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return Ok(None);
    }
    tokens
        .iter()
        .map(|tok| {
            tok.parse::<f64>()
                .with_context(|| format!("'{tok}' is not a number"))
        })
        .collect::<Result<Vec<f64>>>()
        .map(Some)
}
