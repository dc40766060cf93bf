mod config;
mod render;

use compound_domain::{sample_source, Compound, CompoundSearch, CompoundSource, SearchField};
use compound_persistence::DieselCompoundRepository;
use compound_providers::CsvSource;
use config::{AppConfig, SourceKind};
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fuente activa. El repositorio se guarda aparte para poder importar CSV.
struct Session {
  search: CompoundSearch<Arc<dyn CompoundSource>>,
  repo: Option<Arc<DieselCompoundRepository>>,
  last: Vec<Compound>,
}

fn open_session(kind: SourceKind) -> Result<Session, Box<dyn Error>> {
  let (source, repo) = match kind {
    SourceKind::Mock => (Arc::new(sample_source()) as Arc<dyn CompoundSource>, None),
    SourceKind::Csv => (Arc::new(compound_providers::csv_source_from_env()?) as Arc<dyn CompoundSource>, None),
    SourceKind::Database => {
      let repo = Arc::new(compound_persistence::new_from_env()?);
      (Arc::clone(&repo) as Arc<dyn CompoundSource>, Some(repo))
    }
  };
  Ok(Session { search: CompoundSearch::new(source),
               repo,
               last: Vec::new() })
}

/// Pequeño menú interactivo para buscar compuestos.
///
/// Opciones soportadas:
/// 1-3) Buscar por Name, SMILES o Identifier
/// 4) Importar un CSV en la base de datos (solo con `COMPOUND_SOURCE=db`)
/// 5) Exportar los últimos resultados a JSON
/// 6) Ver la fuente activa
/// 7) Salir
fn main() -> Result<(), Box<dyn Error>> {
  let cfg = AppConfig::from_env()?;
  tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_new(&cfg.log_filter)
                                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")))
                                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                                .init();

  // La fuente se crea una sola vez y se libera al salir del bucle.
  let mut session = open_session(cfg.source)?;
  log::info!("using source {} ({})", cfg.source, session.search.source().describe());

  loop {
    println!("\n== Compound search ==");
    for (i, field) in SearchField::ALL.iter().enumerate() {
      println!("{}) Buscar por {}", i + 1, field);
    }
    println!("4) Importar CSV en la base de datos");
    println!("5) Exportar últimos resultados (JSON)");
    println!("6) Ver fuente activa");
    println!("7) Salir");
    let choice = prompt("Elige una opción: ")?;
    match choice.trim() {
      n @ ("1" | "2" | "3") => {
        let field = SearchField::ALL[n.parse::<usize>()? - 1];
        let value = prompt(&format!("Enter {}: ", field))?;
        let result = session.search.search_field(field, &value);
        println!("{}", render::render_outcome(&result));
        session.last = result.map(|o| o.compounds().to_vec()).unwrap_or_default();
      }
      "4" => {
        let Some(repo) = session.repo.as_ref() else {
          eprintln!("La importación requiere COMPOUND_SOURCE=db");
          continue;
        };
        let path = prompt("Ruta del CSV: ")?;
        match CsvSource::from_path(Path::new(path.trim())).map_err(|e| e.to_string())
                                                          .and_then(|csv| {
                                                            repo.insert_compounds(csv.compounds())
                                                                .map_err(|e| e.to_string())
                                                          }) {
          Ok(n) => println!("Importados {} compuestos", n),
          Err(e) => eprintln!("Error importando CSV: {}", e),
        }
      }
      "5" => {
        if session.last.is_empty() {
          println!("No hay resultados que exportar");
          continue;
        }
        let path = prompt("Fichero de salida: ")?;
        match export_json(Path::new(path.trim()), &session.last) {
          Ok(()) => println!("Exportados {} compuestos a {}", session.last.len(), path.trim()),
          Err(e) => eprintln!("Error exportando: {}", e),
        }
      }
      "6" => {
        println!("Fuente: {} ({})", cfg.source, session.search.source().describe());
        if let Some(repo) = session.repo.as_ref() {
          match repo.count() {
            Ok(n) => println!("Filas en la tabla: {}", n),
            Err(e) => eprintln!("Error contando filas: {}", e),
          }
        }
      }
      "7" => {
        println!("Saliendo...");
        break;
      }
      other => {
        println!("Opción inválida: {}", other);
      }
    }
  }

  Ok(())
}

fn export_json(path: &Path, compounds: &[Compound]) -> Result<(), Box<dyn Error>> {
  let file = std::fs::File::create(path)?;
  serde_json::to_writer_pretty(io::BufWriter::new(file), compounds)?;
  Ok(())
}

fn prompt(msg: &str) -> io::Result<String> {
  print!("{}", msg);
  io::stdout().flush()?;
  let mut s = String::new();
  if io::stdin().read_line(&mut s)? == 0 {
    return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin cerrado"));
  }
  Ok(s)
}
