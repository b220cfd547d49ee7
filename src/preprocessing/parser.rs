//! Разбор разреженного формата batch-файлов
//!
//! Каждая строка файла: `<метка> <индекс>:<значение> ...`, индексы с единицы,
//! пропущенные индексы считаются нулями. Все исходные признаки сохраняются
//! без группировки по каналам.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ndarray::Array2;

use crate::error::PreprocessError;

pub struct RecordParser {
    num_features: usize,
}

impl RecordParser {
    pub fn new(num_features: usize) -> Self {
        Self { num_features }
    }

    /// Читает один batch-файл в плотную матрицу признаков и вектор меток.
    /// Пустые строки пропускаются; каждая непустая строка дает одну строку
    /// таблицы.
    pub fn parse_file(
        &self,
        path: &Path,
    ) -> Result<(Array2<f64>, Vec<String>), PreprocessError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut values: Vec<f64> = Vec::new();
        let mut labels: Vec<String> = Vec::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = line_no + 1;
            if line.trim().is_empty() {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let label = tokens.next().ok_or_else(|| self.malformed(
                path,
                line_no,
                "missing label".to_string(),
            ))?;
            if label.parse::<f64>().is_err() {
                return Err(self.malformed(
                    path,
                    line_no,
                    format!("label '{}' is not numeric", label),
                ));
            }

            let mut row = vec![0.0; self.num_features];
            for token in tokens {
                let (index, value) = token.split_once(':').ok_or_else(|| {
                    self.malformed(
                        path,
                        line_no,
                        format!("token '{}' has no ':' separator", token),
                    )
                })?;

                let index: usize = index.parse().map_err(|_| {
                    self.malformed(
                        path,
                        line_no,
                        format!("feature index '{}' is not an integer", index),
                    )
                })?;
                let value: f64 = value.parse().map_err(|_| {
                    self.malformed(
                        path,
                        line_no,
                        format!("feature value '{}' is not a float", value),
                    )
                })?;

                if index < 1 || index > self.num_features {
                    return Err(self.malformed(
                        path,
                        line_no,
                        format!(
                            "feature index {} outside [1, {}]",
                            index, self.num_features
                        ),
                    ));
                }

                // Повторный индекс в строке: последнее значение побеждает
                row[index - 1] = value;
            }

            values.extend_from_slice(&row);
            labels.push(label.to_string());
        }

        let features = Array2::from_shape_vec((labels.len(), self.num_features), values)
            .map_err(|e| self.malformed(path, 0, e.to_string()))?;
        Ok((features, labels))
    }

    fn malformed(&self, path: &Path, line: usize, detail: String) -> PreprocessError {
        PreprocessError::MalformedRecord {
            file: path.to_path_buf(),
            line,
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_batch(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_dense_rows_with_implicit_zeros() {
        let dir = TempDir::new().unwrap();
        let path = write_batch(&dir, "batch1.dat", "1 1:0.5 3:2.5\n2 2:-1.5\n");

        let parser = RecordParser::new(4);
        let (features, labels) = parser.parse_file(&path).unwrap();

        assert_eq!(features.nrows(), 2);
        assert_eq!(features.ncols(), 4);
        assert_eq!(features.row(0).to_vec(), vec![0.5, 0.0, 2.5, 0.0]);
        assert_eq!(features.row(1).to_vec(), vec![0.0, -1.5, 0.0, 0.0]);
        assert_eq!(labels, ["1", "2"]);
    }

    #[test]
    fn row_count_matches_non_empty_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_batch(&dir, "batch1.dat", "1 1:0.5\n\n   \n2 1:0.9\n\n");

        let parser = RecordParser::new(2);
        let (features, labels) = parser.parse_file(&path).unwrap();
        assert_eq!(features.nrows(), 2);
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn token_without_colon_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_batch(&dir, "batch1.dat", "1 1:0.5 20.3\n");

        let parser = RecordParser::new(2);
        let err = parser.parse_file(&path).unwrap_err();
        assert!(matches!(
            err,
            PreprocessError::MalformedRecord { line: 1, .. }
        ));
    }

    #[test]
    fn index_zero_is_out_of_range() {
        let dir = TempDir::new().unwrap();
        let path = write_batch(&dir, "batch1.dat", "1 0:0.5\n");

        let parser = RecordParser::new(2);
        assert!(matches!(
            parser.parse_file(&path).unwrap_err(),
            PreprocessError::MalformedRecord { .. }
        ));
    }

    #[test]
    fn index_above_num_features_is_out_of_range() {
        let dir = TempDir::new().unwrap();
        let path = write_batch(&dir, "batch1.dat", "1 3:0.5\n");

        let parser = RecordParser::new(2);
        assert!(matches!(
            parser.parse_file(&path).unwrap_err(),
            PreprocessError::MalformedRecord { .. }
        ));
    }

    #[test]
    fn non_numeric_label_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_batch(&dir, "batch1.dat", "gas 1:0.5\n");

        let parser = RecordParser::new(2);
        assert!(matches!(
            parser.parse_file(&path).unwrap_err(),
            PreprocessError::MalformedRecord { .. }
        ));
    }

    #[test]
    fn legacy_float_label_is_accepted() {
        let dir = TempDir::new().unwrap();
        let path = write_batch(&dir, "batch1.dat", "-12.75 1:0.5\n");

        let parser = RecordParser::new(2);
        let (_, labels) = parser.parse_file(&path).unwrap();
        assert_eq!(labels, ["-12.75"]);
    }

    #[test]
    fn duplicate_index_last_wins() {
        let dir = TempDir::new().unwrap();
        let path = write_batch(&dir, "batch1.dat", "1 1:0.5 1:0.9\n");

        let parser = RecordParser::new(2);
        let (features, _) = parser.parse_file(&path).unwrap();
        assert_eq!(features[[0, 0]], 0.9);
    }

    #[test]
    fn missing_file_is_io_error() {
        let parser = RecordParser::new(2);
        let err = parser.parse_file(Path::new("/nonexistent/batch1.dat")).unwrap_err();
        match err {
            PreprocessError::Io(e) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
