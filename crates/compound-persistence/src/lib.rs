//! Adaptador relacional para la búsqueda de compuestos.
//! Expone el módulo `schema` y el repositorio Diesel que implementa
//! `CompoundSource` sobre la tabla `compounds`. La implementación detallada
//! está en `compound_repository.rs`.

mod compound_repository;
mod errors;
pub mod schema;

pub use compound_repository::{new_from_env, DieselCompoundRepository, RepositoryConfig, DEFAULT_RESULT_LIMIT};
pub use errors::PersistenceError;
