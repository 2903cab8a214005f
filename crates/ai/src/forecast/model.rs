//! Additive trend + weekly-seasonality demand model.
//!
//! `y(t) = k + m·t + Σₙ (aₙ·sin(2πn·d/7) + bₙ·cos(2πn·d/7))`, n = 1..=3,
//! where `d` is the absolute day number and `t` is time since the first
//! observation scaled to [0, 1]. Daily and yearly components are not
//! modelled. Fitted by ridge-regularised least squares on max-scaled `y`,
//! so irregular spacing and gaps in the dates need no special handling.

use std::f64::consts::PI;

use chrono::{Datelike, Duration, NaiveDate};
use thiserror::Error;

/// Fourier order of the weekly component.
const WEEKLY_ORDER: usize = 3;
const WEEK_DAYS: f64 = 7.0;
const PARAMS: usize = 2 + 2 * WEEKLY_ORDER;
/// Ridge penalty on every coefficient except the intercept.
const RIDGE: f64 = 1e-2;
const PIVOT_EPSILON: f64 = 1e-12;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("series is degenerate: {0}")]
    Degenerate(&'static str),

    #[error("normal equations are singular")]
    Singular,
}

/// A fitted weekly-seasonal model.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySeasonalModel {
    coefficients: [f64; PARAMS],
    origin: NaiveDate,
    span_days: f64,
    y_scale: f64,
}

impl WeeklySeasonalModel {
    /// Fit to `(date, value)` observations. Dates may repeat, be unordered,
    /// or have gaps.
    pub fn fit(points: &[(NaiveDate, f64)]) -> Result<Self, ModelError> {
        if points.is_empty() {
            return Err(ModelError::Degenerate("no observations"));
        }
        if points.iter().any(|(_, y)| !y.is_finite()) {
            return Err(ModelError::Degenerate("non-finite observation"));
        }

        let y_scale = points.iter().map(|(_, y)| y.abs()).fold(0.0_f64, f64::max);
        if y_scale == 0.0 {
            return Err(ModelError::Degenerate("all observations are zero"));
        }

        let dates = || points.iter().map(|(d, _)| *d);
        let origin = dates().min().ok_or(ModelError::Degenerate("no observations"))?;
        let last = dates().max().ok_or(ModelError::Degenerate("no observations"))?;
        let span_days = (last - origin).num_days() as f64;
        if span_days <= 0.0 {
            return Err(ModelError::Degenerate("single distinct date"));
        }

        let mut model = Self {
            coefficients: [0.0; PARAMS],
            origin,
            span_days,
            y_scale,
        };

        // Accumulate XᵀX + λI and Xᵀy.
        let mut xtx = [[0.0_f64; PARAMS]; PARAMS];
        let mut xty = [0.0_f64; PARAMS];
        for (date, y) in points {
            let x = model.features(*date);
            let y = y / y_scale;
            for i in 0..PARAMS {
                xty[i] += x[i] * y;
                for j in 0..PARAMS {
                    xtx[i][j] += x[i] * x[j];
                }
            }
        }
        for (i, row) in xtx.iter_mut().enumerate().skip(1) {
            row[i] += RIDGE;
        }

        model.coefficients = solve(xtx, xty)?;
        Ok(model)
    }

    /// Point estimate for a single date.
    pub fn predict(&self, date: NaiveDate) -> f64 {
        let x = self.features(date);
        let scaled: f64 = x.iter().zip(self.coefficients.iter()).map(|(a, b)| a * b).sum();
        scaled * self.y_scale
    }

    /// Point estimates for the `horizon` days following `after`.
    pub fn forecast_after(&self, after: NaiveDate, horizon: u32) -> Vec<f64> {
        (1..=i64::from(horizon))
            .map(|h| self.predict(after + Duration::days(h)))
            .collect()
    }

    fn features(&self, date: NaiveDate) -> [f64; PARAMS] {
        let t = (date - self.origin).num_days() as f64 / self.span_days;
        let day = f64::from(date.num_days_from_ce());

        let mut x = [0.0; PARAMS];
        x[0] = 1.0;
        x[1] = t;
        for n in 1..=WEEKLY_ORDER {
            let angle = 2.0 * PI * n as f64 * day / WEEK_DAYS;
            x[2 * n] = angle.sin();
            x[2 * n + 1] = angle.cos();
        }
        x
    }
}

/// Gaussian elimination with partial pivoting.
fn solve(
    mut a: [[f64; PARAMS]; PARAMS],
    mut b: [f64; PARAMS],
) -> Result<[f64; PARAMS], ModelError> {
    for col in 0..PARAMS {
        let pivot = (col..PARAMS)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < PIVOT_EPSILON {
            return Err(ModelError::Singular);
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..PARAMS {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..PARAMS {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0; PARAMS];
    for row in (0..PARAMS).rev() {
        let tail: f64 = ((row + 1)..PARAMS).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }

    if x.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::Singular);
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: i64) -> NaiveDate {
        // 2025-01-06 is a Monday.
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap() + Duration::days(n)
    }

    #[test]
    fn flat_series_forecasts_its_level() {
        let points: Vec<_> = (0..28).map(|d| (day(d), 12.0)).collect();
        let model = WeeklySeasonalModel::fit(&points).unwrap();
        for y in model.forecast_after(day(27), 7) {
            assert!((y - 12.0).abs() < 0.5, "got {y}");
        }
    }

    #[test]
    fn weekly_pattern_is_recovered() {
        // Weekends sell triple.
        let points: Vec<_> = (0..56)
            .map(|d| {
                let weekday = day(d).weekday().num_days_from_monday();
                (day(d), if weekday >= 5 { 30.0 } else { 10.0 })
            })
            .collect();
        let model = WeeklySeasonalModel::fit(&points).unwrap();
        let saturday = model.predict(day(61));
        let tuesday = model.predict(day(57));
        assert!(saturday > 25.0, "saturday {saturday}");
        assert!(tuesday < 15.0, "tuesday {tuesday}");
        let week: f64 = model.forecast_after(day(55), 7).iter().sum();
        assert!((week - 110.0).abs() < 5.0, "week total {week}");
    }

    #[test]
    fn linear_trend_is_extrapolated() {
        let points: Vec<_> = (0..30).map(|d| (day(d), 10.0 + d as f64)).collect();
        let model = WeeklySeasonalModel::fit(&points).unwrap();
        let next = model.predict(day(30));
        assert!((next - 40.0).abs() < 1.5, "next {next}");
    }

    #[test]
    fn irregular_dates_fit() {
        let points = vec![
            (day(0), 5.0),
            (day(3), 7.0),
            (day(4), 6.0),
            (day(11), 8.0),
            (day(20), 5.0),
        ];
        let model = WeeklySeasonalModel::fit(&points).unwrap();
        assert!(model.forecast_after(day(20), 7).iter().all(|y| y.is_finite()));
    }

    #[test]
    fn degenerate_series_are_rejected() {
        let zeros: Vec<_> = (0..10).map(|d| (day(d), 0.0)).collect();
        assert_eq!(
            WeeklySeasonalModel::fit(&zeros),
            Err(ModelError::Degenerate("all observations are zero"))
        );

        let same_day = vec![(day(0), 1.0), (day(0), 2.0), (day(0), 3.0)];
        assert_eq!(
            WeeklySeasonalModel::fit(&same_day),
            Err(ModelError::Degenerate("single distinct date"))
        );

        assert!(WeeklySeasonalModel::fit(&[]).is_err());
        assert!(WeeklySeasonalModel::fit(&[(day(0), f64::NAN), (day(1), 1.0)]).is_err());
    }
}
