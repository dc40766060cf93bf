// errors.rs
use compound_domain::LookupError;
use thiserror::Error;

/// Errores del adaptador relacional.
#[derive(Debug, Error)]
pub enum PersistenceError {
  #[error("Configuración inválida: {0}")]
  Config(String),
  #[error("pool: {0}")]
  Pool(#[from] r2d2::Error),
  #[error("db: {0}")]
  Query(#[from] diesel::result::Error),
  #[error("migraciones: {0}")]
  Migration(String),
}

impl From<PersistenceError> for LookupError {
  fn from(e: PersistenceError) -> Self {
    LookupError::DataSource(e.to_string())
  }
}
