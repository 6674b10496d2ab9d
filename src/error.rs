//! Error taxonomy for the generator.
//!
//! Row validation failures are not errors: they are collected as reasons and
//! recorded in the batch manifest. Everything here aborts the current run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("CSV não encontrado: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("endereco_evm inválido: {0}")]
    InvalidAddress(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("QR encoding failed: {0}")]
    Qr(String),

    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, GeneratorError>;
