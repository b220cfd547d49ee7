//! Sensor ML - Rust библиотека предобработки данных газовых сенсоров

pub mod error;
pub mod pipeline;
pub mod preprocessing;
pub mod types;

pub use error::PreprocessError;
pub use pipeline::PreprocessingPipeline;
pub use preprocessing::*;
pub use types::*;
