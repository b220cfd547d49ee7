//! Таблица признаков

use ndarray::Array2;

/// Центральная сущность конвейера: матрица признаков плюс целевая колонка.
/// Метки хранятся исходными токенами, чтобы целевая колонка проходила
/// конвейер без изменений (целочисленный класс газа или, в историческом
/// варианте, вещественная величина дрейфа).
///
/// Инварианты: число строк матрицы равно числу меток; порядок строк и
/// колонок стабилен на всех этапах после сборки.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    features: Array2<f64>,
    labels: Vec<String>,
}

impl FeatureTable {
    pub fn new(features: Array2<f64>, labels: Vec<String>) -> Self {
        debug_assert_eq!(features.nrows(), labels.len());
        Self { features, labels }
    }

    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    pub fn features_mut(&mut self) -> &mut Array2<f64> {
        &mut self.features
    }

    /// Замена матрицы признаков той же формы (результат нормализации)
    pub fn set_features(&mut self, features: Array2<f64>) {
        debug_assert_eq!(features.dim(), self.features.dim());
        self.features = features;
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn dimensions_are_reported() {
        let table = FeatureTable::new(
            array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]],
            vec!["1".to_string(), "2".to_string(), "1".to_string()],
        );
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.n_features(), 2);
        assert_eq!(table.labels(), ["1", "2", "1"]);
    }

    #[test]
    fn set_features_replaces_matrix() {
        let mut table = FeatureTable::new(
            array![[1.0, 2.0]],
            vec!["1".to_string()],
        );
        table.set_features(array![[9.0, 8.0]]);
        assert_eq!(table.features()[[0, 0]], 9.0);
        assert_eq!(table.features()[[0, 1]], 8.0);
    }
}
