use ndarray::Array2;

use crate::error::{Result, SeismicError, Warning};

/// Result of percentile clipping: the saturated copy and the bound used.
#[derive(Debug, Clone)]
pub struct Clipped {
    pub data: Array2<f64>,
    pub bound: f64,
    pub warning: Option<Warning>,
}

/// Percentile of `values` with linear interpolation between closest ranks.
///
/// `values` is sorted in place. Returns `None` for an empty slice.
pub fn percentile(values: &mut [f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let rank = p / 100.0 * (values.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(values[lo] + (values[hi] - values[lo]) * frac)
}

/// Saturate `data` to `±|percentile(|data|, p)|`.
///
/// Values inside the bound are copied unchanged, so `p = 100` reproduces
/// the input exactly.
pub fn percentile_clip(data: &Array2<f64>, p: f64) -> Result<Clipped> {
    if !(p.is_finite() && (0.0..=100.0).contains(&p)) {
        return Err(SeismicError::config(format!(
            "percentile must lie in [0, 100], got {p}"
        )));
    }

    let mut magnitudes: Vec<f64> = data
        .iter()
        .filter(|v| !v.is_nan())
        .map(|v| v.abs())
        .collect();
    let Some(bound) = percentile(&mut magnitudes, p).map(f64::abs) else {
        return Ok(Clipped {
            data: data.clone(),
            bound: 0.0,
            warning: None,
        });
    };

    // Reported by the session that installs the result.
    let warning = (bound == 0.0).then_some(Warning::DegenerateScale {
        stage: "percentile clip",
    });

    let clipped = data.mapv(|v| {
        if v > bound {
            bound
        } else if v < -bound {
            -bound
        } else {
            v
        }
    });

    log::debug!("clipped {} samples at p{p} -> bound {bound}", data.len());

    Ok(Clipped {
        data: clipped,
        bound,
        warning,
    })
}
