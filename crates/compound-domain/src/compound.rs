// compound.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Una fila del conjunto de compuestos.
///
/// El registro es inmutable una vez cargado: los adaptadores de datos lo
/// construyen y el servicio de búsqueda solo lo lee. `smiles` se trata como
/// una cadena opaca; nunca se interpreta químicamente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compound {
  id: Option<String>,
  name: Option<String>,
  smiles: Option<String>,
  formula: Option<String>,
  molecular_weight: Option<f64>,
}

impl Compound {
  pub fn new(name: Option<String>, smiles: Option<String>) -> Self {
    Self { id: None,
           name: non_blank(name),
           smiles: non_blank(smiles),
           formula: None,
           molecular_weight: None }
  }

  /// Atajo para datos de ejemplo y pruebas.
  pub fn named(name: &str, smiles: &str) -> Self {
    Self::new(Some(name.to_string()), Some(smiles.to_string()))
  }

  pub fn with_id(mut self, id: impl Into<String>) -> Self {
    self.id = non_blank(Some(id.into()));
    self
  }

  pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
    self.formula = non_blank(Some(formula.into()));
    self
  }

  pub fn with_molecular_weight(mut self, weight: f64) -> Self {
    self.molecular_weight = Some(weight);
    self
  }

  pub fn id(&self) -> Option<&str> {
    self.id.as_deref()
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn smiles(&self) -> Option<&str> {
    self.smiles.as_deref()
  }

  pub fn formula(&self) -> Option<&str> {
    self.formula.as_deref()
  }

  pub fn molecular_weight(&self) -> Option<f64> {
    self.molecular_weight
  }
}

// Celdas vacías (CSV) y NULL (BD) se tratan igual: valor ausente.
fn non_blank(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

impl fmt::Display for Compound {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f,
           "Compound(Name: {}, SMILES: {}, ID: {})",
           self.name.as_deref().unwrap_or("-"),
           self.smiles.as_deref().unwrap_or("-"),
           self.id.as_deref().unwrap_or("-"))
  }
}
