use std::collections::BTreeMap;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use super::model::{HeaderTable, HeaderValue, SeismicDataset, OFFSET, RECEIVER_X};
use crate::error::{Result, SeismicError};

// ---------------------------------------------------------------------------
// Synthetic shot gather – stands in for the SEG-Y reader
// ---------------------------------------------------------------------------

/// One flat reflector: zero-offset two-way time, RMS velocity, amplitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflector {
    pub t0: f64,
    pub velocity: f64,
    pub amplitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub num_traces: usize,
    pub num_samples: usize,
    /// Sample interval in seconds.
    pub dt: f64,
    /// Receiver spacing in metres.
    pub receiver_spacing: f64,
    /// Source position along the line in metres.
    pub source_x: f64,
    /// Peak frequency of the Ricker wavelet in Hz.
    pub peak_frequency: f64,
    pub reflectors: Vec<Reflector>,
    pub noise_level: f64,
    pub seed: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            num_traces: 48,
            num_samples: 500,
            dt: 0.002,
            receiver_spacing: 12.5,
            source_x: 0.0,
            peak_frequency: 25.0,
            reflectors: vec![
                Reflector { t0: 0.20, velocity: 1800.0, amplitude: 1.0 },
                Reflector { t0: 0.45, velocity: 2300.0, amplitude: -0.7 },
                Reflector { t0: 0.70, velocity: 2900.0, amplitude: 0.5 },
            ],
            noise_level: 0.02,
            seed: 42,
        }
    }
}

fn ricker(t: f64, peak_frequency: f64) -> f64 {
    let a = (std::f64::consts::PI * peak_frequency * t).powi(2);
    (1.0 - 2.0 * a) * (-a).exp()
}

/// Generate a shot gather with hyperbolic moveout `t(x) = sqrt(t0² + x²/v²)`.
pub fn shot_gather(config: &SynthConfig) -> Result<SeismicDataset> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, config.noise_level).map_err(|e| {
        SeismicError::config(format!("noise level {}: {e}", config.noise_level))
    })?;
    let offsets: Vec<f64> = (0..config.num_traces)
        .map(|i| i as f64 * config.receiver_spacing)
        .collect();

    let mut samples = Array2::zeros((config.num_samples, config.num_traces));
    for (i, &offset) in offsets.iter().enumerate() {
        for k in 0..config.num_samples {
            let t = k as f64 * config.dt;
            let signal: f64 = config
                .reflectors
                .iter()
                .map(|r| {
                    let arrival = (r.t0.powi(2) + (offset / r.velocity).powi(2)).sqrt();
                    r.amplitude * ricker(t - arrival, config.peak_frequency)
                })
                .sum();
            samples[[k, i]] = signal + noise.sample(&mut rng);
        }
    }

    let mut headers = HeaderTable::new(
        ["trace", OFFSET, RECEIVER_X, "cdp"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
    );
    for (i, &offset) in offsets.iter().enumerate() {
        let receiver_x = config.source_x + offset;
        let mut row = BTreeMap::new();
        row.insert("trace".to_string(), HeaderValue::Integer(i as i64 + 1));
        row.insert(OFFSET.to_string(), HeaderValue::Float(offset));
        row.insert(RECEIVER_X.to_string(), HeaderValue::Float(receiver_x));
        row.insert(
            "cdp".to_string(),
            HeaderValue::Integer(((config.source_x + receiver_x) / config.receiver_spacing) as i64),
        );
        headers.push_row(row);
    }

    SeismicDataset::new(samples, config.dt, headers)
}
