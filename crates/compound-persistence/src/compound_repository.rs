use crate::schema;
use crate::schema::compounds::dsl as compounds_dsl;
use crate::PersistenceError;
use compound_domain::{Compound, CompoundSource, LookupError, SearchField, SearchQuery};
use diesel::prelude::*;
#[cfg(not(feature = "pg"))]
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Tope de filas por consulta, igual que el `LIMIT 500` de la aplicación web.
pub const DEFAULT_RESULT_LIMIT: i64 = 500;

#[cfg(feature = "pg")]
type DbConn = PgConnection;
#[cfg(not(feature = "pg"))]
type DbConn = SqliteConnection;
#[cfg(feature = "pg")]
type DbBackend = diesel::pg::Pg;
#[cfg(not(feature = "pg"))]
type DbBackend = diesel::sqlite::Sqlite;
type DbPool = Pool<ConnectionManager<DbConn>>;

// `lower()` de SQLite solo conoce ASCII; esta versión se registra en cada
// conexión y pliega igual que `str::to_lowercase`.
#[cfg(not(feature = "pg"))]
define_sql_function! {
  fn unicode_lower(x: diesel::sql_types::Nullable<diesel::sql_types::Text>) -> diesel::sql_types::Nullable<diesel::sql_types::Text>;
}

/// Parámetros del pool y de las consultas.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
  pub database_url: String,
  pub pool_size: u32,
  pub connection_timeout: Duration,
  pub result_limit: i64,
}

impl RepositoryConfig {
  pub fn new(database_url: impl Into<String>) -> Self {
    Self { database_url: database_url.into(),
           pool_size: 4,
           connection_timeout: Duration::from_secs(30),
           result_limit: DEFAULT_RESULT_LIMIT }
  }

  /// Lee `COMPOUND_DB_URL` (o `DATABASE_URL`) y los ajustes opcionales
  /// `COMPOUND_POOL_SIZE`, `COMPOUND_TIMEOUT_SECS` y `COMPOUND_RESULT_LIMIT`.
  pub fn from_env() -> Result<Self, PersistenceError> {
    dotenvy::dotenv().ok();
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  pub fn from_lookup<F>(get: F) -> Result<Self, PersistenceError>
    where F: Fn(&str) -> Option<String>
  {
    let url = get("COMPOUND_DB_URL").or_else(|| get("DATABASE_URL"))
                                    .ok_or_else(|| {
                                      PersistenceError::Config("COMPOUND_DB_URL / DATABASE_URL not set".into())
                                    })?;
    check_url(&url)?;
    let mut cfg = Self::new(url);
    if let Some(n) = number::<u32>(&get, "COMPOUND_POOL_SIZE")? {
      cfg.pool_size = n;
    }
    if let Some(secs) = number::<u64>(&get, "COMPOUND_TIMEOUT_SECS")? {
      cfg.connection_timeout = Duration::from_secs(secs);
    }
    if let Some(limit) = number::<i64>(&get, "COMPOUND_RESULT_LIMIT")? {
      cfg.result_limit = limit;
    }
    cfg.validate()?;
    Ok(cfg)
  }

  /// r2d2 entra en pánico con `max_size` o `connection_timeout` a cero, así
  /// que se rechazan antes de construir el pool.
  pub fn validate(&self) -> Result<(), PersistenceError> {
    if self.pool_size == 0 {
      return Err(PersistenceError::Config("COMPOUND_POOL_SIZE debe ser positivo: 0".into()));
    }
    if self.connection_timeout.is_zero() {
      return Err(PersistenceError::Config("COMPOUND_TIMEOUT_SECS debe ser positivo: 0".into()));
    }
    if self.result_limit <= 0 {
      return Err(PersistenceError::Config(format!("COMPOUND_RESULT_LIMIT debe ser positivo: {}", self.result_limit)));
    }
    Ok(())
  }
}

fn number<T: std::str::FromStr>(get: &impl Fn(&str) -> Option<String>,
                                key: &str)
                                -> Result<Option<T>, PersistenceError> {
  match get(key) {
    Some(raw) => raw.trim()
                    .parse::<T>()
                    .map(Some)
                    .map_err(|_| PersistenceError::Config(format!("{} inválido: '{}'", key, raw))),
    None => Ok(None),
  }
}

/// `%term%` con `\`, `%` y `_` escapados para usar con `ESCAPE '\'`.
fn like_pattern(term: &str) -> String {
  let mut pattern = String::with_capacity(term.len() + 2);
  pattern.push('%');
  for ch in term.chars() {
    if matches!(ch, '\\' | '%' | '_') {
      pattern.push('\\');
    }
    pattern.push(ch);
  }
  pattern.push('%');
  pattern
}

// Ajustes por conexión de SQLite: la función `unicode_lower` y los PRAGMA.
#[cfg(not(feature = "pg"))]
#[derive(Debug)]
struct SqliteSetup;

#[cfg(not(feature = "pg"))]
impl diesel::r2d2::CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqliteSetup {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    unicode_lower_utils::register_impl(conn, |s: Option<String>| s.map(|v| v.to_lowercase()))
      .map_err(diesel::r2d2::Error::QueryError)?;
    for pragma in ["PRAGMA journal_mode = WAL;", "PRAGMA busy_timeout = 5000;"] {
      if let Err(e) = conn.batch_execute(pragma) {
        log::warn!("{} failed: {}", pragma, e);
      }
    }
    Ok(())
  }
}

fn looks_like_postgres(url: &str) -> bool {
  let l = url.to_lowercase();
  l.starts_with("postgres://") || l.starts_with("postgresql://")
}

// La URL tiene que corresponder al backend con el que se compiló el crate.
fn check_url(url: &str) -> Result<(), PersistenceError> {
  if cfg!(feature = "pg") && !looks_like_postgres(url) {
    return Err(PersistenceError::Config("COMPOUND_DB_URL / DATABASE_URL does not look like Postgres URL".into()));
  }
  if !cfg!(feature = "pg") && looks_like_postgres(url) {
    return Err(PersistenceError::Config("compound-persistence was compiled without 'pg' feature; enable the 'pg' \
                                         feature to use Postgres"
                                                                 .into()));
  }
  Ok(())
}

// Fila Diesel de la tabla `compounds`
#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = schema::compounds)]
struct CompoundRow {
  pub identifier: String,
  pub name: Option<String>,
  pub canonical_smiles: Option<String>,
  pub formula: Option<String>,
  pub molecular_weight: Option<f64>,
}

impl CompoundRow {
  fn from_compound(c: &Compound) -> Self {
    Self { identifier: c.id().map(str::to_string).unwrap_or_else(|| Uuid::new_v4().to_string()),
           name: c.name().map(str::to_string),
           canonical_smiles: c.smiles().map(str::to_string),
           formula: c.formula().map(str::to_string),
           molecular_weight: c.molecular_weight() }
  }

  fn into_compound(self) -> Compound {
    let mut c = Compound::new(self.name, self.canonical_smiles).with_id(self.identifier);
    if let Some(f) = self.formula {
      c = c.with_formula(f);
    }
    if let Some(w) = self.molecular_weight {
      c = c.with_molecular_weight(w);
    }
    c
  }
}

/// Repositorio Diesel sobre la tabla `compounds`.
///
/// Se construye una vez al arrancar y se comparte por referencia (o `Arc`);
/// el pool se libera al soltar el último manejador.
pub struct DieselCompoundRepository {
  pool: Arc<DbPool>,
  result_limit: i64,
}

impl DieselCompoundRepository {
  /// Crea el pool y aplica las migraciones embebidas.
  pub fn new(config: &RepositoryConfig) -> Result<Self, PersistenceError> {
    config.validate()?;
    let manager = ConnectionManager::<DbConn>::new(config.database_url.as_str());
    let builder = Pool::builder().max_size(config.pool_size)
                                 .connection_timeout(config.connection_timeout);
    #[cfg(not(feature = "pg"))]
    let builder = builder.connection_customizer(Box::new(SqliteSetup));
    let pool = builder.build(manager)?;
    let repo = DieselCompoundRepository { pool: Arc::new(pool),
                                          result_limit: config.result_limit };
    let mut c = repo.conn()?;
    c.run_pending_migrations(MIGRATIONS).map_err(|e| PersistenceError::Migration(e.to_string()))?;
    drop(c);
    log::info!("compound repository ready (pool_size={}, limit={})", config.pool_size, config.result_limit);
    Ok(repo)
  }

  fn conn(&self) -> Result<PooledConnection<ConnectionManager<DbConn>>, PersistenceError> {
    Ok(self.pool.get()?)
  }

  pub fn result_limit(&self) -> i64 {
    self.result_limit
  }

  /// Consulta parametrizada con tope de filas.
  ///
  /// `Name` e `Identifier` usan `ILIKE '%term%'` en PostgreSQL; en SQLite,
  /// `unicode_lower(col) LIKE '%term%'`, porque su `LIKE` solo ignora
  /// mayúsculas ASCII. Los comodines del término se escapan. `Smiles`
  /// compara por igualdad con el término normalizado.
  pub fn find_candidates(&self, query: &SearchQuery) -> Result<Vec<Compound>, PersistenceError> {
    let mut conn = self.conn()?;
    let pattern = like_pattern(query.term());
    let base = compounds_dsl::compounds.into_boxed::<DbBackend>();
    #[cfg(feature = "pg")]
    let filtered = match query.field() {
      SearchField::Name => base.filter(compounds_dsl::name.ilike(pattern).escape('\\')),
      SearchField::Identifier => base.filter(compounds_dsl::identifier.ilike(pattern).escape('\\')),
      SearchField::Smiles => base.filter(compounds_dsl::canonical_smiles.eq(query.term().to_string())),
    };
    #[cfg(not(feature = "pg"))]
    let filtered = match query.field() {
      SearchField::Name => base.filter(unicode_lower(compounds_dsl::name).like(pattern).escape('\\')),
      SearchField::Identifier => {
        base.filter(unicode_lower(compounds_dsl::identifier.nullable()).like(pattern).escape('\\'))
      }
      SearchField::Smiles => base.filter(compounds_dsl::canonical_smiles.eq(query.term().to_string())),
    };
    let rows = filtered.order(compounds_dsl::identifier.asc())
                       .limit(self.result_limit)
                       .load::<CompoundRow>(&mut conn)?;
    log::debug!("query on {} returned {} rows", query.field().column(), rows.len());
    Ok(rows.into_iter().map(CompoundRow::into_compound).collect())
  }

  /// Inserta o reemplaza compuestos en una sola transacción.
  ///
  /// Los compuestos sin identificador reciben un UUID nuevo.
  pub fn insert_compounds(&self, compounds: &[Compound]) -> Result<usize, PersistenceError> {
    let rows: Vec<CompoundRow> = compounds.iter().map(CompoundRow::from_compound).collect();
    let mut conn = self.conn()?;
    let inserted = conn.transaction::<_, diesel::result::Error, _>(|conn| {
                         for row in &rows {
                           diesel::delete(compounds_dsl::compounds.filter(compounds_dsl::identifier.eq(&row.identifier)))
                             .execute(conn)?;
                           diesel::insert_into(compounds_dsl::compounds).values(row).execute(conn)?;
                         }
                         Ok(rows.len())
                       })?;
    log::info!("imported {} compounds", inserted);
    Ok(inserted)
  }

  pub fn count(&self) -> Result<i64, PersistenceError> {
    let mut conn = self.conn()?;
    Ok(compounds_dsl::compounds.count().get_result::<i64>(&mut conn)?)
  }
}

impl CompoundSource for DieselCompoundRepository {
  fn candidates(&self, query: &SearchQuery) -> Result<Vec<Compound>, LookupError> {
    self.find_candidates(query).map_err(LookupError::from)
  }

  fn describe(&self) -> String {
    format!("database (limit {})", self.result_limit)
  }
}

/// Crear repo desde las variables de entorno.
pub fn new_from_env() -> Result<DieselCompoundRepository, PersistenceError> {
  let cfg = RepositoryConfig::from_env()?;
  DieselCompoundRepository::new(&cfg)
}
