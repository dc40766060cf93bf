// errors.rs
use thiserror::Error;

/// Errores que puede devolver una búsqueda de compuestos.
///
/// - `InvalidField`: campo de búsqueda no reconocido (error de
///   programación/configuración, debería rechazarse en la frontera).
/// - `EmptyTerm`: el usuario no dio un término utilizable.
/// - `DataSource`: fallo de la fuente de datos externa, propagado tal cual.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LookupError {
  #[error("Campo de búsqueda inválido: {0}")]
  InvalidField(String),
  #[error("El término de búsqueda está vacío")]
  EmptyTerm,
  #[error("Error de la fuente de datos: {0}")]
  DataSource(String),
}

impl LookupError {
  /// `true` cuando basta con volver a pedir la entrada al usuario.
  pub fn is_user_error(&self) -> bool {
    matches!(self, Self::EmptyTerm)
  }
}
