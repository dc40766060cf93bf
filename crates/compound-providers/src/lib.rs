//! Adaptador de ficheros planos: carga una tabla de compuestos desde CSV
//! (ruta local, lector arbitrario, URL o identificador de Google Drive) y la
//! expone como `CompoundSource` inmutable.

mod csv_source;
mod errors;

pub use csv_source::{csv_source_from_env, drive_download_url, CsvSource, HttpConfig};
pub use errors::ProviderError;
