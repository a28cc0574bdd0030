/// Data layer: dataset model, window selection, clipping and the synthetic source.
///
/// Architecture:
/// ```text
///   synthetic shot gather (format reader stand-in)
///        │
///        ▼
///   ┌────────────────┐
///   │ SeismicDataset │  samples[time][trace], dt, header table
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  range   │  trace / time window → SectionView + axis labels
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   clip   │  percentile bound → saturated copy
///   └──────────┘
/// ```

pub mod clip;
pub mod model;
pub mod range;
pub mod synthetic;
