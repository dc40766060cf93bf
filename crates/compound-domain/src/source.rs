use crate::search::filter;
use crate::{Compound, LookupError, SearchField, SearchQuery};
use std::sync::Arc;

/// Contrato que cumplen los adaptadores de datos (memoria, CSV, BD).
///
/// `candidates` puede prefiltrar (por ejemplo con SQL) y limitar el número de
/// filas, pero dentro de ese límite debe devolver un superconjunto de lo que
/// la política de `SearchQuery` aceptaría.
pub trait CompoundSource: Send + Sync {
  /// Filas candidatas para la consulta, en el orden de la fuente.
  fn candidates(&self, query: &SearchQuery) -> Result<Vec<Compound>, LookupError>;

  /// Descripción corta de la fuente para mensajes y logs.
  fn describe(&self) -> String;
}

impl<S: CompoundSource + ?Sized> CompoundSource for Arc<S> {
  fn candidates(&self, query: &SearchQuery) -> Result<Vec<Compound>, LookupError> {
    (**self).candidates(query)
  }

  fn describe(&self) -> String {
    (**self).describe()
  }
}

impl<S: CompoundSource + ?Sized> CompoundSource for Box<S> {
  fn candidates(&self, query: &SearchQuery) -> Result<Vec<Compound>, LookupError> {
    (**self).candidates(query)
  }

  fn describe(&self) -> String {
    (**self).describe()
  }
}

/// Tabla estática en memoria. Se carga una vez y no cambia.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
  rows: Arc<Vec<Compound>>,
  label: String,
}

impl InMemorySource {
  pub fn new(rows: Vec<Compound>) -> Self {
    Self::labelled(rows, "in-memory")
  }

  pub fn labelled(rows: Vec<Compound>, label: impl Into<String>) -> Self {
    Self { rows: Arc::new(rows),
           label: label.into() }
  }

  pub fn rows(&self) -> &[Compound] {
    &self.rows
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }
}

impl CompoundSource for InMemorySource {
  fn candidates(&self, _query: &SearchQuery) -> Result<Vec<Compound>, LookupError> {
    Ok(self.rows.to_vec())
  }

  fn describe(&self) -> String {
    format!("{} ({} compounds)", self.label, self.rows.len())
  }
}

/// Resultado de una búsqueda correcta. "Sin filas" no es un error.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
  Found(Vec<Compound>),
  Empty,
}

impl SearchOutcome {
  fn from_rows(rows: Vec<Compound>) -> Self {
    if rows.is_empty() {
      Self::Empty
    } else {
      Self::Found(rows)
    }
  }

  pub fn compounds(&self) -> &[Compound] {
    match self {
      Self::Found(rows) => rows,
      Self::Empty => &[],
    }
  }

  pub fn len(&self) -> usize {
    self.compounds().len()
  }

  pub fn is_empty(&self) -> bool {
    matches!(self, Self::Empty)
  }
}

/// Servicio de búsqueda sobre una fuente construida explícitamente.
///
/// La fuente se crea una vez al arrancar el proceso y se pasa por referencia;
/// el servicio no guarda estado propio y puede usarse desde varios hilos.
pub struct CompoundSearch<S> {
  source: S,
}

impl<S: CompoundSource> CompoundSearch<S> {
  pub fn new(source: S) -> Self {
    Self { source }
  }

  pub fn source(&self) -> &S {
    &self.source
  }

  /// Busca con un campo en texto (p. ej. el valor de un widget o de la CLI).
  pub fn search(&self, field: &str, term: &str) -> Result<SearchOutcome, LookupError> {
    let field: SearchField = field.parse()?;
    self.search_field(field, term)
  }

  pub fn search_field(&self, field: SearchField, term: &str) -> Result<SearchOutcome, LookupError> {
    let query = SearchQuery::new(field, term)?;
    let candidates = self.source.candidates(&query).map_err(|e| {
                                                     log::warn!("lookup on {} failed: {}", self.source.describe(), e);
                                                     e
                                                   })?;
    // La política se vuelve a aplicar aquí para que sea la misma con
    // independencia del prefiltrado que haga el adaptador.
    let rows = filter(&query, &candidates);
    log::info!("lookup field={} candidates={} matches={} source={}",
               field,
               candidates.len(),
               rows.len(),
               self.source.describe());
    Ok(SearchOutcome::from_rows(rows))
  }
}
