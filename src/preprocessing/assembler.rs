//! Сборка набора данных из batch-файлов

use std::path::{Path, PathBuf};

use ndarray::Array2;

use crate::error::PreprocessError;
use crate::preprocessing::parser::RecordParser;
use crate::preprocessing::table::FeatureTable;

/// Имя подкаталога с сырыми данными внутри каталога выгрузки
const DATASET_SUBDIR: &str = "Dataset";

pub struct DatasetAssembler {
    num_features: usize,
}

impl DatasetAssembler {
    pub fn new(num_features: usize) -> Self {
        Self { num_features }
    }

    /// Находит все batch*.dat в `<raw_dir>/Dataset/`, разбирает каждый и
    /// склеивает в одну таблицу. Порядок файлов лексикографический, порядок
    /// строк внутри файла сохраняется. Один неразобранный файл прерывает
    /// всю сборку.
    pub fn assemble(&self, raw_dir: &Path) -> Result<FeatureTable, PreprocessError> {
        let dataset_dir = raw_dir.join(DATASET_SUBDIR);
        let files = self.discover(&dataset_dir)?;

        if files.is_empty() {
            return Err(PreprocessError::NoDataFound { dir: dataset_dir });
        }
        tracing::info!("Found {} batch files to process", files.len());

        let parser = RecordParser::new(self.num_features);
        let mut values: Vec<f64> = Vec::new();
        let mut labels: Vec<String> = Vec::new();

        for file in &files {
            let (features, file_labels) =
                parser
                    .parse_file(file)
                    .map_err(|e| PreprocessError::PartialLoad {
                        file: file.clone(),
                        source: Box::new(e),
                    })?;
            values.extend(features.iter().copied());
            labels.extend(file_labels);
        }

        let features = Array2::from_shape_vec((labels.len(), self.num_features), values)
            .expect("row buffers are always num_features wide");
        Ok(FeatureTable::new(features, labels))
    }

    fn discover(&self, dataset_dir: &Path) -> Result<Vec<PathBuf>, PreprocessError> {
        let entries = match std::fs::read_dir(dataset_dir) {
            Ok(entries) => entries,
            // Отсутствующий каталог эквивалентен нулю подходящих файлов
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            if name.starts_with("batch") && name.ends_with(".dat") {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}
