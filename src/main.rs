/// API сервер конвейера предобработки

use axum::{
    extract::State,
    http::Method,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber;

use sensor_ml::{
    PreprocessRequest, PreprocessResponse, PreprocessingConfig, PreprocessingPipeline,
};

#[derive(Clone)]
struct AppState {
    config: PreprocessingConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let state = AppState {
        config: load_service_config()?,
    };

    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/preprocess", post(preprocess))
        .route("/api/predict", post(predict))
        .layer(cors)
        .with_state(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], 8000));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://0.0.0.0:8000");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Конфигурация сервиса: JSON-файл из SENSOR_ML_CONFIG или значения по
/// умолчанию (128 каналов датчика дрейфа, диапазон [0, 1])
fn load_service_config() -> anyhow::Result<PreprocessingConfig> {
    use anyhow::Context;

    let config = match std::env::var("SENSOR_ML_CONFIG") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {}", path))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse config file {}", path))?
        }
        Err(_) => PreprocessingConfig {
            num_features: 128,
            feature_range: (0.0, 1.0),
            preprocessed_dir: "artifacts/preprocessed".to_string(),
            preprocessed_file: "preprocessed_data.csv".to_string(),
        },
    };
    config.validate()?;
    Ok(config)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Sensor ML API (Rust)",
        "version": "0.1.0"
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Тренировочный путь: конфигурация сервиса как есть
async fn preprocess(
    State(state): State<AppState>,
    Json(request): Json<PreprocessRequest>,
) -> Result<Json<PreprocessResponse>, String> {
    tracing::info!("Preprocess request: {}", request.data_dir);

    let pipeline =
        PreprocessingPipeline::new(state.config.clone()).map_err(|e| e.to_string())?;
    match pipeline.run(std::path::Path::new(&request.data_dir)) {
        Ok(artifact) => Ok(Json(PreprocessResponse {
            artifact: artifact.display().to_string(),
        })),
        Err(e) => Err(format!("Preprocessing error: {}", e)),
    }
}

/// Путь предсказания: конфигурация собирается в памяти на каждый запрос,
/// конвейер тот же — этапы связаны только типом конфигурации и путем
/// артефакта
async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PreprocessRequest>,
) -> Result<Json<PreprocessResponse>, String> {
    tracing::info!("Predict request: {}", request.data_dir);

    let config = PreprocessingConfig {
        num_features: state.config.num_features,
        feature_range: state.config.feature_range,
        preprocessed_dir: "artifacts/prediction".to_string(),
        preprocessed_file: "preprocessed_data.csv".to_string(),
    };

    let pipeline = PreprocessingPipeline::new(config).map_err(|e| e.to_string())?;
    match pipeline.run(std::path::Path::new(&request.data_dir)) {
        Ok(artifact) => Ok(Json(PreprocessResponse {
            artifact: artifact.display().to_string(),
        })),
        Err(e) => Err(format!("Prediction error: {}", e)),
    }
}
