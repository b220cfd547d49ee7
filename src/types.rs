/// Типы данных и конфигурация конвейера

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PreprocessError;

/// Конфигурация этапа предобработки. Создается один раз на запуск
/// внешним загрузчиком конфигурации (или динамически в памяти) и
/// передается компонентам явно, без глобального состояния.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    pub num_features: usize,
    pub feature_range: (f64, f64),
    pub preprocessed_dir: String,
    pub preprocessed_file: String,
}

impl PreprocessingConfig {
    /// Проверка конфигурации при старте конвейера, а не при первом обращении
    pub fn validate(&self) -> Result<(), PreprocessError> {
        if self.num_features == 0 {
            return Err(PreprocessError::Configuration(
                "num_features must be positive".to_string(),
            ));
        }

        let (low, high) = self.feature_range;
        if !low.is_finite() || !high.is_finite() {
            return Err(PreprocessError::Configuration(
                "feature_range bounds must be finite".to_string(),
            ));
        }
        if low >= high {
            return Err(PreprocessError::Configuration(format!(
                "feature_range low ({}) must be below high ({})",
                low, high
            )));
        }

        if self.preprocessed_dir.is_empty() {
            return Err(PreprocessError::Configuration(
                "preprocessed_dir must not be empty".to_string(),
            ));
        }
        if self.preprocessed_file.is_empty() {
            return Err(PreprocessError::Configuration(
                "preprocessed_file must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Путь итогового артефакта
    pub fn artifact_path(&self) -> PathBuf {
        Path::new(&self.preprocessed_dir).join(&self.preprocessed_file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessRequest {
    /// Каталог с извлеченными сырыми данными (внутри ожидается Dataset/)
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessResponse {
    pub artifact: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> PreprocessingConfig {
        PreprocessingConfig {
            num_features: 128,
            feature_range: (0.0, 1.0),
            preprocessed_dir: "artifacts/preprocessed".to_string(),
            preprocessed_file: "preprocessed_data.csv".to_string(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn zero_features_rejected() {
        let mut config = base_config();
        config.num_features = 0;
        assert!(matches!(
            config.validate(),
            Err(PreprocessError::Configuration(_))
        ));
    }

    #[test]
    fn inverted_range_rejected() {
        let mut config = base_config();
        config.feature_range = (1.0, 0.0);
        assert!(matches!(
            config.validate(),
            Err(PreprocessError::Configuration(_))
        ));
    }

    #[test]
    fn non_finite_range_rejected() {
        let mut config = base_config();
        config.feature_range = (0.0, f64::INFINITY);
        assert!(matches!(
            config.validate(),
            Err(PreprocessError::Configuration(_))
        ));
    }

    #[test]
    fn empty_paths_rejected() {
        let mut config = base_config();
        config.preprocessed_dir = String::new();
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.preprocessed_file = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_required_key_fails_deserialization() {
        // Внешний загрузчик обязан передать все обязательные ключи
        let json = r#"{"num_features": 128, "feature_range": [0.0, 1.0]}"#;
        let parsed: Result<PreprocessingConfig, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }

    #[test]
    fn artifact_path_joins_dir_and_file() {
        let config = base_config();
        assert_eq!(
            config.artifact_path(),
            Path::new("artifacts/preprocessed").join("preprocessed_data.csv")
        );
    }
}
