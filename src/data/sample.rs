//! Synthetic quarterly GDP series for offline runs.
//!
//! The series starts near the 1947 level and compounds a noisy quarterly growth
//! rate. Output rows use the same `["YYYY-MM-DD", "value"]` shape as the real
//! source so they go through the normal transform path.

use chrono::NaiveDate;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{GdpDataset, RawRow, SampleConfig};
use crate::error::AppError;

const START_LEVEL: f64 = 243.1;

/// Mean and volatility of quarter-over-quarter growth (log terms).
const GROWTH_MEAN: f64 = 0.0155;
const GROWTH_SIGMA: f64 = 0.011;

/// Ten thousand years of quarters.
pub const MAX_QUARTERS: usize = 4 * 10_000;

pub fn generate_sample(config: &SampleConfig) -> Result<GdpDataset, AppError> {
    if config.quarters == 0 {
        return Err(AppError::new(2, "Sample quarter count must be > 0."));
    }
    if config.quarters > MAX_QUARTERS {
        return Err(AppError::new(
            2,
            format!("Sample quarter count must be <= {MAX_QUARTERS} (got {}).", config.quarters),
        ));
    }
    if NaiveDate::from_ymd_opt(config.start_year, 1, 1).is_none() {
        return Err(AppError::new(2, format!("Invalid sample start year {}.", config.start_year)));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(GROWTH_MEAN, GROWTH_SIGMA)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut level = START_LEVEL;
    let mut rows = Vec::with_capacity(config.quarters);
    for i in 0..config.quarters {
        let Some(date) = quarter_start(config.start_year, i) else {
            break;
        };
        rows.push(RawRow::text(date.format("%Y-%m-%d").to_string(), format!("{level:.1}")));

        let growth: f64 = normal.sample(&mut rng);
        level *= growth.exp();
    }

    let to_date = rows.last().map(|RawRow(d, _)| d.to_string());
    Ok(GdpDataset {
        name: Some("Synthetic GDP (demo)".to_string()),
        description: Some("Units: Billions of Dollars (synthetic)".to_string()),
        frequency: Some("quarterly".to_string()),
        from_date: rows.first().map(|RawRow(d, _)| d.to_string()),
        to_date,
        updated_at: None,
        data: rows,
    })
}

/// First day of the `index`-th quarter after January 1st of `start_year`.
fn quarter_start(start_year: i32, index: usize) -> Option<NaiveDate> {
    let months = i32::try_from(index).ok()?.checked_mul(3)?;
    let year = start_year.checked_add(months / 12)?;
    NaiveDate::from_ymd_opt(year, (months % 12) as u32 + 1, 1)
}
