use crate::ProviderError;
use compound_domain::{Compound, CompoundSource, InMemorySource, LookupError, SearchQuery};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Opciones del cliente HTTP usado para descargar el CSV remoto.
#[derive(Debug, Clone)]
pub struct HttpConfig {
  pub timeout: Duration,
}

impl Default for HttpConfig {
  fn default() -> Self {
    Self { timeout: Duration::from_secs(30) }
  }
}

impl HttpConfig {
  /// Aplica `COMPOUND_TIMEOUT_SECS` sobre los valores por defecto.
  pub fn from_lookup<F>(get: F) -> Result<Self, ProviderError>
    where F: Fn(&str) -> Option<String>
  {
    let mut http = Self::default();
    if let Some(raw) = get("COMPOUND_TIMEOUT_SECS") {
      let secs = raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ProviderError::Config(format!("COMPOUND_TIMEOUT_SECS inválido: '{}'", raw)))?;
      http.timeout = Duration::from_secs(secs);
    }
    http.validate()?;
    Ok(http)
  }

  // Con timeout cero cada petición fallaría al instante.
  fn validate(&self) -> Result<(), ProviderError> {
    if self.timeout.is_zero() {
      return Err(ProviderError::Config("COMPOUND_TIMEOUT_SECS debe ser positivo: 0".into()));
    }
    Ok(())
  }
}

/// Índices de las columnas reconocidas en la cabecera.
#[derive(Debug)]
struct Columns {
  name: usize,
  smiles: usize,
  formula: Option<usize>,
  weight: Option<usize>,
  id: Option<usize>,
}

// "Molecular Weight", "molecular_weight" y "MOLECULAR-WEIGHT" se comparan igual.
fn header_key(h: &str) -> String {
  h.chars().filter(|c| c.is_alphanumeric()).flat_map(char::to_lowercase).collect()
}

impl Columns {
  fn resolve(headers: &StringRecord) -> Result<Self, ProviderError> {
    let keys: Vec<String> = headers.iter().map(header_key).collect();
    let find = |aliases: &[&str]| keys.iter().position(|k| aliases.contains(&k.as_str()));
    Ok(Self { name: find(&["name", "compoundname"]).ok_or(ProviderError::MissingColumn("Name"))?,
              smiles: find(&["smiles", "canonicalsmiles"]).ok_or(ProviderError::MissingColumn("SMILES"))?,
              formula: find(&["formula", "molecularformula"]),
              weight: find(&["molecularweight", "mw", "molweight"]),
              id: find(&["id", "identifier", "mnpiid"]) })
  }

  fn compound(&self, row: usize, record: &StringRecord) -> Result<Compound, ProviderError> {
    let cell = |idx: usize| record.get(idx).map(str::to_string);
    let mut c = Compound::new(cell(self.name), cell(self.smiles));
    if let Some(v) = self.id.and_then(cell) {
      c = c.with_id(v);
    }
    if let Some(v) = self.formula.and_then(cell) {
      c = c.with_formula(v);
    }
    if let Some(raw) = self.weight.and_then(cell).filter(|v| !v.is_empty()) {
      let weight = raw.parse::<f64>()
                      .map_err(|e| ProviderError::Malformed { row,
                                                              message: format!("peso molecular '{}': {}", raw, e) })?;
      c = c.with_molecular_weight(weight);
    }
    Ok(c)
  }
}

/// Tabla de compuestos cargada una sola vez desde CSV.
///
/// Tras la construcción los datos no cambian; cada búsqueda trabaja sobre la
/// misma tabla sin volver a descargarla.
#[derive(Debug, Clone)]
pub struct CsvSource {
  table: InMemorySource,
}

impl CsvSource {
  pub fn from_reader<R: Read>(reader: R, origin: &str) -> Result<Self, ProviderError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let columns = Columns::resolve(&headers)?;
    let mut rows = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
      let record = record?;
      rows.push(columns.compound(idx + 1, &record)?);
    }
    log::info!("loaded {} compounds from {}", rows.len(), origin);
    Ok(Self { table: InMemorySource::labelled(rows, format!("csv {}", origin)) })
  }

  pub fn from_path(path: &Path) -> Result<Self, ProviderError> {
    let file = std::fs::File::open(path)?;
    Self::from_reader(file, &path.display().to_string())
  }

  pub fn parse(text: &str) -> Result<Self, ProviderError> {
    Self::from_reader(text.as_bytes(), "inline")
  }

  /// Descarga el CSV con un cliente bloqueante y tiempo máximo acotado.
  pub fn from_url(url: &str, http: &HttpConfig) -> Result<Self, ProviderError> {
    http.validate()?;
    let client = reqwest::blocking::Client::builder().timeout(http.timeout).build()?;
    log::debug!("downloading compound table from {}", url);
    let body = client.get(url).send()?.error_for_status()?.bytes()?;
    Self::from_reader(body.as_ref(), url)
  }

  pub fn from_drive_file_id(file_id: &str, http: &HttpConfig) -> Result<Self, ProviderError> {
    Self::from_url(&drive_download_url(file_id)?, http)
  }

  pub fn compounds(&self) -> &[Compound] {
    self.table.rows()
  }

  pub fn len(&self) -> usize {
    self.table.len()
  }

  pub fn is_empty(&self) -> bool {
    self.table.is_empty()
  }
}

impl CompoundSource for CsvSource {
  fn candidates(&self, query: &SearchQuery) -> Result<Vec<Compound>, LookupError> {
    self.table.candidates(query)
  }

  fn describe(&self) -> String {
    self.table.describe()
  }
}

/// URL de descarga directa para un fichero compartido de Google Drive.
pub fn drive_download_url(file_id: &str) -> Result<String, ProviderError> {
  let id = file_id.trim();
  if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
    return Err(ProviderError::Config(format!("identificador de Drive inválido: '{}'", file_id)));
  }
  Ok(format!("https://drive.google.com/uc?export=download&id={}", id))
}

/// Construye la fuente CSV a partir de las variables de entorno.
///
/// Se usa la primera definida de `COMPOUND_CSV_PATH`, `COMPOUND_CSV_URL` y
/// `COMPOUND_CSV_DRIVE_ID`. `COMPOUND_TIMEOUT_SECS` acota la descarga.
pub fn csv_source_from_env() -> Result<CsvSource, ProviderError> {
  dotenvy::dotenv().ok();
  let http = HttpConfig::from_lookup(|key| std::env::var(key).ok())?;
  if let Ok(path) = std::env::var("COMPOUND_CSV_PATH") {
    return CsvSource::from_path(Path::new(&path));
  }
  if let Ok(url) = std::env::var("COMPOUND_CSV_URL") {
    return CsvSource::from_url(&url, &http);
  }
  if let Ok(id) = std::env::var("COMPOUND_CSV_DRIVE_ID") {
    return CsvSource::from_drive_file_id(&id, &http);
  }
  Err(ProviderError::Config("COMPOUND_CSV_PATH / COMPOUND_CSV_URL / COMPOUND_CSV_DRIVE_ID not set".into()))
}
