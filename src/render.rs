use compound_domain::{Compound, LookupError, SearchOutcome};

const HEADERS: [&str; 5] = ["ID", "Name", "SMILES", "Formula", "MW"];

fn cells(c: &Compound) -> [String; 5] {
  [c.id().unwrap_or("-").to_string(),
   c.name().unwrap_or("-").to_string(),
   c.smiles().unwrap_or("-").to_string(),
   c.formula().unwrap_or("-").to_string(),
   c.molecular_weight().map(|w| format!("{:.2}", w)).unwrap_or_else(|| "-".into())]
}

/// Tabla de texto con columnas alineadas.
pub fn render_table(compounds: &[Compound]) -> String {
  let rows: Vec<[String; 5]> = compounds.iter().map(cells).collect();
  let mut widths = HEADERS.map(|h| h.chars().count());
  for row in &rows {
    for (w, cell) in widths.iter_mut().zip(row.iter()) {
      *w = (*w).max(cell.chars().count());
    }
  }
  let line = |values: &[String]| {
    values.iter()
          .zip(widths.iter())
          .map(|(v, w)| format!("{:<width$}", v, width = *w))
          .collect::<Vec<_>>()
          .join(" | ")
          .trim_end()
          .to_string()
  };
  let mut out = String::new();
  out.push_str(&line(&HEADERS.map(String::from)[..]));
  out.push('\n');
  out.push_str(&widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));
  out.push('\n');
  for row in &rows {
    out.push_str(&line(&row[..]));
    out.push('\n');
  }
  out
}

/// Mensaje para el usuario según el resultado de la búsqueda.
pub fn render_outcome(result: &Result<SearchOutcome, LookupError>) -> String {
  match result {
    Ok(SearchOutcome::Found(rows)) => format!("Found {} compound(s).\n{}", rows.len(), render_table(rows)),
    Ok(SearchOutcome::Empty) => "No compounds found.".to_string(),
    Err(LookupError::EmptyTerm) => "Please enter a value.".to_string(),
    Err(LookupError::InvalidField(f)) => format!("Unsupported search field: {}", f),
    Err(LookupError::DataSource(msg)) => format!("Error querying data source:\n{}", msg),
  }
}
