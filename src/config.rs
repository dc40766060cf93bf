use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
  #[error("COMPOUND_SOURCE inválido: '{0}' (use mock, csv o db)")]
  InvalidSource(String),
}

/// Origen de la tabla de compuestos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
  Mock,
  Csv,
  Database,
}

impl FromStr for SourceKind {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "" | "mock" | "memory" => Ok(Self::Mock),
      "csv" | "file" => Ok(Self::Csv),
      "db" | "database" | "postgres" | "sqlite" => Ok(Self::Database),
      _ => Err(ConfigError::InvalidSource(s.to_string())),
    }
  }
}

impl fmt::Display for SourceKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Mock => "mock",
      Self::Csv => "csv",
      Self::Database => "db",
    };
    f.write_str(s)
  }
}

/// Configuración de la aplicación. Los detalles de cada fuente (URL de la BD,
/// ruta del CSV) los leen los propios adaptadores con su `*_from_env`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
  pub source: SourceKind,
  pub log_filter: String,
}

impl AppConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where F: Fn(&str) -> Option<String>
  {
    let source = match get("COMPOUND_SOURCE") {
      Some(raw) => raw.parse()?,
      None => SourceKind::Mock,
    };
    let log_filter = get("RUST_LOG").unwrap_or_else(|| "info".into());
    Ok(Self { source, log_filter })
  }
}
