// errors.rs
use compound_domain::LookupError;
use thiserror::Error;

/// Errores al cargar una tabla de compuestos desde CSV.
#[derive(Debug, Error)]
pub enum ProviderError {
  #[error("Falta la columna obligatoria '{0}'")]
  MissingColumn(&'static str),
  #[error("Fila {row} mal formada: {message}")]
  Malformed { row: usize, message: String },
  #[error("Error CSV: {0}")]
  Csv(#[from] csv::Error),
  #[error("Error de E/S: {0}")]
  Io(#[from] std::io::Error),
  #[error("Error HTTP: {0}")]
  Http(#[from] reqwest::Error),
  #[error("Configuración inválida: {0}")]
  Config(String),
}

impl From<ProviderError> for LookupError {
  fn from(e: ProviderError) -> Self {
    LookupError::DataSource(e.to_string())
  }
}
