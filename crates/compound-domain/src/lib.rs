//! Crate `compound-domain` — servicio de búsqueda de compuestos.
//!
//! Define el registro `Compound`, la política de coincidencia (`SearchQuery`,
//! `lookup`), el contrato de las fuentes de datos (`CompoundSource`) y el
//! servicio `CompoundSearch` que los combina. No hace E/S: las fuentes CSV y
//! relacional viven en `compound-providers` y `compound-persistence`.
//!
//! ```rust
//! use compound_domain::{sample_source, CompoundSearch};
//! let svc = CompoundSearch::new(sample_source());
//! let found = svc.search("Name", "asp").unwrap();
//! assert_eq!(found.len(), 1);
//! ```
mod compound;
mod errors;
mod sample;
mod search;
mod source;

pub use compound::Compound;
pub use errors::LookupError;
pub use sample::{sample_compounds, sample_source};
pub use search::{lookup, lookup_stream, normalize_smiles, SearchField, SearchQuery};
pub use source::{CompoundSearch, CompoundSource, InMemorySource, SearchOutcome};
