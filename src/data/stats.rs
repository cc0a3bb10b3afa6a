use super::error::InvalidColumnError;
use super::model::{Column, Table};

/// `(x, y)` for every row, in table order, for a scatter / regression plot.
pub fn pairs(table: &Table, x: Column, y: Column) -> Result<Vec<[f64; 2]>, InvalidColumnError> {
    for column in [x, y] {
        if !column.is_numeric() {
            return Err(InvalidColumnError::NotNumeric(column));
        }
    }
    Ok(table
        .iter()
        .filter_map(|rec| Some([rec.number(x)?, rec.number(y)?]))
        .collect())
}

/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fit a line through `points`.
    ///
    /// Returns `None` with fewer than two points or when every x is equal.
    pub fn least_squares(points: &[[f64; 2]]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let n = points.len() as f64;
        let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / n;
        let mean_y = points.iter().map(|p| p[1]).sum::<f64>() / n;

        let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), p| {
            let dx = p[0] - mean_x;
            (sxy + dx * (p[1] - mean_y), sxx + dx * dx)
        });
        // Relative to the magnitude of x so finely scaled inputs still fit.
        let sum_x2 = points.iter().map(|p| p[0] * p[0]).sum::<f64>();
        if sxx <= f64::EPSILON * sum_x2 {
            return None;
        }

        let slope = sxy / sxx;
        Some(LinearFit {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}
