//! Нормализация данных

use ndarray::{Array1, Array2};

use crate::error::PreprocessError;

pub struct RangeNormalizer {
    min: Option<Array1<f64>>,
    max: Option<Array1<f64>>,
    feature_range: (f64, f64),
    is_fitted: bool,
}

impl RangeNormalizer {
    pub fn new(feature_range: (f64, f64)) -> Self {
        Self {
            min: None,
            max: None,
            feature_range,
            is_fitted: false,
        }
    }

    /// Запоминает наблюденные минимум и максимум каждого признака.
    /// Состояние живет в пределах одного запуска и не сохраняется.
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<(), PreprocessError> {
        if x.nrows() == 0 {
            return Err(PreprocessError::EmptyTable);
        }

        let mut min = Array1::from_elem(x.ncols(), f64::INFINITY);
        let mut max = Array1::from_elem(x.ncols(), f64::NEG_INFINITY);
        for row in x.rows() {
            for (i, &val) in row.iter().enumerate() {
                if val < min[i] {
                    min[i] = val;
                }
                if val > max[i] {
                    max[i] = val;
                }
            }
        }

        self.min = Some(min);
        self.max = Some(max);
        self.is_fitted = true;
        Ok(())
    }

    /// Линейно отображает каждый признак на целевой интервал.
    /// Вырожденная колонка (min == max) отображается в середину интервала.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, PreprocessError> {
        if !self.is_fitted {
            return Err(PreprocessError::NotFitted);
        }

        let min = self.min.as_ref().ok_or(PreprocessError::NotFitted)?;
        let max = self.max.as_ref().ok_or(PreprocessError::NotFitted)?;
        let (low, high) = self.feature_range;

        let mut normalized = x.clone();
        for mut row in normalized.rows_mut() {
            for (i, val) in row.iter_mut().enumerate() {
                let range = max[i] - min[i];
                if range == 0.0 {
                    *val = 0.5 * (low + high);
                } else {
                    *val = low + (*val - min[i]) / range * (high - low);
                }
            }
        }

        Ok(normalized)
    }

    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>, PreprocessError> {
        self.fit(x)?;
        self.transform(x)
    }
}
