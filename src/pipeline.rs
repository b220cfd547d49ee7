//! Конвейер предобработки
//!
//! Единая точка входа для тренировочного и предсказательного путей:
//! сборка -> коррекция асимметрии -> нормализация -> сохранение артефакта.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PreprocessError;
use crate::preprocessing::assembler::DatasetAssembler;
use crate::preprocessing::normalization::RangeNormalizer;
use crate::preprocessing::skew::{SkewCorrector, DEFAULT_SKEW_THRESHOLD};
use crate::preprocessing::table::FeatureTable;
use crate::types::PreprocessingConfig;

pub struct PreprocessingPipeline {
    config: PreprocessingConfig,
    assembler: DatasetAssembler,
    corrector: SkewCorrector,
}

impl PreprocessingPipeline {
    /// Конфигурация проверяется здесь, до запуска этапов
    pub fn new(config: PreprocessingConfig) -> Result<Self, PreprocessError> {
        config.validate()?;
        Ok(Self {
            assembler: DatasetAssembler::new(config.num_features),
            corrector: SkewCorrector::new(DEFAULT_SKEW_THRESHOLD),
            config,
        })
    }

    /// Прогоняет этапы в фиксированном порядке и возвращает путь артефакта.
    /// Ошибка любого этапа прерывает запуск; артефакт пишется последним
    /// действием, частичный результат на диск не попадает.
    pub fn run(&self, raw_dir: &Path) -> Result<PathBuf, PreprocessError> {
        tracing::info!("Preprocessing started: {}", raw_dir.display());

        let mut table = self
            .assembler
            .assemble(raw_dir)
            .map_err(|e| PreprocessError::at_stage("assemble", e))?;
        tracing::info!(
            "Assembled {} rows x {} features",
            table.n_rows(),
            table.n_features()
        );

        let report = self.corrector.correct(&mut table);
        tracing::info!(
            "Skew correction: {} features transformed, {} skipped",
            report.transformed.len(),
            report.skipped.len()
        );

        let mut normalizer = RangeNormalizer::new(self.config.feature_range);
        let normalized = normalizer
            .fit_transform(table.features())
            .map_err(|e| PreprocessError::at_stage("normalize", e))?;
        table.set_features(normalized);

        let path = self
            .persist(&table)
            .map_err(|e| PreprocessError::at_stage("persist", e))?;
        tracing::info!("Preprocessed data saved to: {}", path.display());
        Ok(path)
    }

    /// CSV с заголовком feature_1..feature_N,target; метки пишутся
    /// исходными токенами. Содержимое собирается в памяти и пишется одним
    /// вызовом.
    fn persist(&self, table: &FeatureTable) -> Result<PathBuf, PreprocessError> {
        let path = self.config.artifact_path();

        fs::create_dir_all(&self.config.preprocessed_dir).map_err(|e| {
            PreprocessError::Persistence {
                path: path.clone(),
                detail: e.to_string(),
            }
        })?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        let mut header: Vec<String> = (1..=table.n_features())
            .map(|i| format!("feature_{}", i))
            .collect();
        header.push("target".to_string());
        writer
            .write_record(&header)
            .map_err(|e| PreprocessError::Persistence {
                path: path.clone(),
                detail: e.to_string(),
            })?;

        for (row, label) in table.features().rows().into_iter().zip(table.labels()) {
            let mut record: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            record.push(label.clone());
            writer
                .write_record(&record)
                .map_err(|e| PreprocessError::Persistence {
                    path: path.clone(),
                    detail: e.to_string(),
                })?;
        }

        let buffer = writer
            .into_inner()
            .map_err(|e| PreprocessError::Persistence {
                path: path.clone(),
                detail: e.to_string(),
            })?;
        fs::write(&path, buffer).map_err(|e| PreprocessError::Persistence {
            path: path.clone(),
            detail: e.to_string(),
        })?;

        Ok(path)
    }
}
