// search.rs
//! Política de coincidencia única para todas las fuentes de datos.
//!
//! - `Name` e `Identifier`: subcadena sin distinguir mayúsculas.
//! - `Smiles`: se eliminan todos los espacios del término y se compara por
//!   igualdad exacta (sin plegado de mayúsculas ni subcadenas). Una subcadena
//!   de SMILES no tiene sentido químico.
use crate::{Compound, LookupError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Atributo contra el que se compara el término de búsqueda.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchField {
  Name,
  Smiles,
  Identifier,
}

impl SearchField {
  /// Orden usado por los menús.
  pub const ALL: [SearchField; 3] = [SearchField::Name, SearchField::Smiles, SearchField::Identifier];

  pub fn label(&self) -> &'static str {
    match self {
      Self::Name => "Name",
      Self::Smiles => "SMILES",
      Self::Identifier => "Identifier",
    }
  }

  /// Nombre de la columna en la tabla relacional.
  pub fn column(&self) -> &'static str {
    match self {
      Self::Name => "name",
      Self::Smiles => "canonical_smiles",
      Self::Identifier => "identifier",
    }
  }

  fn value_of<'a>(&self, compound: &'a Compound) -> Option<&'a str> {
    match self {
      Self::Name => compound.name(),
      Self::Smiles => compound.smiles(),
      Self::Identifier => compound.id(),
    }
  }
}

impl FromStr for SearchField {
  type Err = LookupError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "name" => Ok(Self::Name),
      "smiles" => Ok(Self::Smiles),
      "identifier" | "id" | "mnpi_id" => Ok(Self::Identifier),
      _ => Err(LookupError::InvalidField(s.to_string())),
    }
  }
}

impl fmt::Display for SearchField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Consulta validada y normalizada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
  field: SearchField,
  term: String,
}

impl SearchQuery {
  /// Valida el término y lo normaliza según el campo.
  ///
  /// Devuelve `LookupError::EmptyTerm` si tras recortar no queda nada.
  pub fn new(field: SearchField, term: &str) -> Result<Self, LookupError> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
      return Err(LookupError::EmptyTerm);
    }
    let term = match field {
      SearchField::Smiles => normalize_smiles(trimmed),
      SearchField::Name | SearchField::Identifier => trimmed.to_lowercase(),
    };
    Ok(Self { field, term })
  }

  pub fn field(&self) -> SearchField {
    self.field
  }

  /// Término normalizado (plegado o sin espacios, según el campo).
  pub fn term(&self) -> &str {
    &self.term
  }

  pub fn matches(&self, compound: &Compound) -> bool {
    let Some(value) = self.field.value_of(compound) else {
      return false;
    };
    match self.field {
      SearchField::Smiles => value == self.term,
      SearchField::Name | SearchField::Identifier => value.to_lowercase().contains(&self.term),
    }
  }
}

/// Quita todos los caracteres de espacio en blanco de un SMILES.
pub fn normalize_smiles(smiles: &str) -> String {
  smiles.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Devuelve, en el orden original, todos los compuestos que coinciden.
///
/// Función pura: no modifica `dataset`, no deduplica ni limita el resultado.
pub fn lookup(field: SearchField, term: &str, dataset: &[Compound]) -> Result<Vec<Compound>, LookupError> {
  let query = SearchQuery::new(field, term)?;
  Ok(filter(&query, dataset))
}

/// Variante para conjuntos que llegan fila a fila desde un adaptador.
///
/// El primer error de la fuente se propaga sin cambios y no se devuelve un
/// resultado parcial. El término se valida antes de consumir filas.
pub fn lookup_stream<I, E>(field: SearchField, term: &str, rows: I) -> Result<Vec<Compound>, LookupError>
  where I: IntoIterator<Item = Result<Compound, E>>,
        E: Into<LookupError>
{
  let query = SearchQuery::new(field, term)?;
  let mut out = Vec::new();
  for row in rows {
    let compound = row.map_err(Into::into)?;
    if query.matches(&compound) {
      out.push(compound);
    }
  }
  Ok(out)
}

pub(crate) fn filter(query: &SearchQuery, dataset: &[Compound]) -> Vec<Compound> {
  dataset.iter().filter(|c| query.matches(c)).cloned().collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn dataset() -> Vec<Compound> {
    vec![Compound::named("Aspirin", "CC(=O)OC1=CC=CC=C1C(=O)O").with_id("1001"),
         Compound::named("Caffeine", "CN1C=NC2=C1C(=O)N(C(=O)N2C)C").with_id("1002"),
         Compound::named("aspirin lysine", "CC(=O)OC1=CC=CC=C1C(=O)O").with_id("2001"),
         Compound::new(None, Some("CCO".into())).with_id("3001")]
  }

  #[test]
  fn field_parsing_is_case_insensitive() {
    assert_eq!("NAME".parse::<SearchField>().unwrap(), SearchField::Name);
    assert_eq!(" smiles ".parse::<SearchField>().unwrap(), SearchField::Smiles);
    assert_eq!("MNPI_ID".parse::<SearchField>().unwrap(), SearchField::Identifier);
    assert_eq!("id".parse::<SearchField>().unwrap(), SearchField::Identifier);
  }

  #[test]
  fn unknown_field_is_rejected() {
    match "formula".parse::<SearchField>() {
      Err(LookupError::InvalidField(f)) => assert_eq!(f, "formula"),
      other => panic!("expected InvalidField, got {:?}", other),
    }
  }

  #[test]
  fn blank_term_fails_for_every_field() {
    for field in SearchField::ALL {
      assert_eq!(lookup(field, "", &dataset()), Err(LookupError::EmptyTerm));
      assert_eq!(lookup(field, " \t\n", &dataset()), Err(LookupError::EmptyTerm));
      assert_eq!(lookup(field, "   ", &[]), Err(LookupError::EmptyTerm));
    }
  }

  #[test]
  fn name_is_case_insensitive_substring_in_order() {
    let found = lookup(SearchField::Name, "ASPIRIN", &dataset()).unwrap();
    let names: Vec<_> = found.iter().map(|c| c.name().unwrap()).collect();
    assert_eq!(names, vec!["Aspirin", "aspirin lysine"]);
  }

  #[test]
  fn missing_names_never_match() {
    let found = lookup(SearchField::Name, "a", &dataset()).unwrap();
    assert!(found.iter().all(|c| c.name().is_some()));
    assert_eq!(found.len(), 3);
  }

  #[test]
  fn smiles_is_exact_and_case_sensitive() {
    let ds = dataset();
    let found = lookup(SearchField::Smiles, "CC(=O)OC1=CC=CC=C1C(=O)O", &ds).unwrap();
    assert_eq!(found.len(), 2);
    assert!(lookup(SearchField::Smiles, "CC(=O)OC1=CC=CC=C1C(=O)Ox", &ds).unwrap().is_empty());
    assert!(lookup(SearchField::Smiles, "cco", &ds).unwrap().is_empty());
    // una subcadena no basta
    assert!(lookup(SearchField::Smiles, "CC(=O)", &ds).unwrap().is_empty());
  }

  #[test]
  fn smiles_whitespace_is_removed_before_matching() {
    let ds = vec![Compound::named("Acetic acid", "CC(=O)O")];
    let spaced = lookup(SearchField::Smiles, " CC(=O) O ", &ds).unwrap();
    let compact = lookup(SearchField::Smiles, "CC(=O)O", &ds).unwrap();
    assert_eq!(spaced, compact);
    assert_eq!(spaced.len(), 1);
    assert_eq!(normalize_smiles("C C\t(=O)\nO"), "CC(=O)O");
  }

  #[test]
  fn identifier_is_substring_match() {
    let found = lookup(SearchField::Identifier, "100", &dataset()).unwrap();
    assert_eq!(found.len(), 2);
  }

  #[test]
  fn duplicates_are_kept() {
    let ds = vec![Compound::named("Aspirin", "A"), Compound::named("Aspirin", "A")];
    assert_eq!(lookup(SearchField::Name, "asp", &ds).unwrap().len(), 2);
  }

  #[test]
  fn repeated_lookups_are_identical() {
    let ds = dataset();
    let first = lookup(SearchField::Name, "caf", &ds).unwrap();
    let second = lookup(SearchField::Name, "caf", &ds).unwrap();
    assert_eq!(first, second);
    assert_eq!(ds, dataset());
  }

  #[test]
  fn stream_propagates_first_source_error() {
    let rows: Vec<Result<Compound, LookupError>> =
      vec![Ok(Compound::named("Aspirin", "A")), Err(LookupError::DataSource("connection reset".into()))];
    let res = lookup_stream(SearchField::Name, "asp", rows);
    assert_eq!(res, Err(LookupError::DataSource("connection reset".into())));
  }

  #[test]
  fn stream_validates_term_before_reading_rows() {
    let rows = vec![Err::<Compound, LookupError>(LookupError::DataSource("unreachable".into()))];
    assert_eq!(lookup_stream(SearchField::Name, " ", rows), Err(LookupError::EmptyTerm));
  }
}
