use compound_domain::{sample_compounds, Compound, CompoundSearch, LookupError, SearchOutcome};
use compound_persistence::{DieselCompoundRepository, PersistenceError, RepositoryConfig};
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

// Repositorio SQLite sobre un fichero temporal propio de cada test.
fn setup_repo(limit: i64) -> Option<(DieselCompoundRepository, PathBuf)> {
  // If crate was built with the `pg` feature, skip these sqlite-only tests at
  // runtime.
  if cfg!(feature = "pg") {
    eprintln!("skipping sqlite-only persistence test because 'pg' feature is enabled");
    return None;
  }
  let tmp_path = std::env::temp_dir().join(format!("compound_test_{}.db", Uuid::new_v4()));
  let mut cfg = RepositoryConfig::new(tmp_path.to_str().unwrap());
  cfg.result_limit = limit;
  let repo = DieselCompoundRepository::new(&cfg).expect("failed to create repo");
  Some((repo, tmp_path))
}

fn cleanup(path: PathBuf) {
  let _ = std::fs::remove_file(&path);
  let _ = std::fs::remove_file(path.with_extension("db-wal"));
  let _ = std::fs::remove_file(path.with_extension("db-shm"));
}

fn natural_products() -> Vec<Compound> {
  sample_compounds().into_iter()
                    .enumerate()
                    .map(|(i, c)| c.with_id(format!("{}", 1001 + i)))
                    .collect()
}

#[test]
fn import_and_search_by_every_field() {
  let Some((repo, path)) = setup_repo(500) else { return };
  assert_eq!(repo.insert_compounds(&natural_products()).expect("insert"), 4);
  assert_eq!(repo.count().expect("count"), 4);

  let svc = CompoundSearch::new(repo);
  let by_name = svc.search("Name", "ASPIRIN").expect("name search");
  assert_eq!(by_name.len(), 1);
  let aspirin = &by_name.compounds()[0];
  assert_eq!(aspirin.id(), Some("1001"));
  assert_eq!(aspirin.formula(), Some("C9H8O4"));
  assert_eq!(aspirin.molecular_weight(), Some(180.16));

  let by_smiles = svc.search("SMILES", "CN1C=NC2=C1C(=O)N(C(=O) N2C)C").expect("smiles search");
  assert_eq!(by_smiles.compounds()[0].name(), Some("Caffeine"));
  assert_eq!(svc.search("SMILES", "CN1C=NC2").expect("smiles search"), SearchOutcome::Empty);

  let by_id = svc.search("MNPI_ID", "100").expect("id search");
  let ids: Vec<_> = by_id.compounds().iter().map(|c| c.id().unwrap().to_string()).collect();
  assert_eq!(ids, vec!["1001", "1002", "1003", "1004"]);

  assert_eq!(svc.search("Name", "xyz").expect("empty search"), SearchOutcome::Empty);
  drop(svc);
  cleanup(path);
}

#[test]
fn reimport_replaces_rows_with_the_same_identifier() {
  let Some((repo, path)) = setup_repo(500) else { return };
  repo.insert_compounds(&natural_products()).expect("insert");
  let renamed = vec![Compound::named("Acetylsalicylic acid", "CC(=O)OC1=CC=CC=C1C(=O)O").with_id("1001")];
  repo.insert_compounds(&renamed).expect("reinsert");
  assert_eq!(repo.count().expect("count"), 4);

  let svc = CompoundSearch::new(repo);
  assert!(svc.search("name", "aspirin").expect("search").is_empty());
  assert_eq!(svc.search("name", "salicylic").expect("search").len(), 1);
  drop(svc);
  cleanup(path);
}

#[test]
fn result_limit_caps_candidates_in_identifier_order() {
  let Some((repo, path)) = setup_repo(3) else { return };
  let rows: Vec<Compound> =
    (1..=10).map(|i| Compound::named(&format!("Compound {:02}", i), &format!("C{}", i)).with_id(format!("{:03}", i)))
            .collect();
  repo.insert_compounds(&rows).expect("insert");
  assert_eq!(repo.result_limit(), 3);

  let svc = CompoundSearch::new(repo);
  let out = svc.search("name", "compound").expect("search");
  let ids: Vec<_> = out.compounds().iter().map(|c| c.id().unwrap().to_string()).collect();
  assert_eq!(ids, vec!["001", "002", "003"]);
  drop(svc);
  cleanup(path);
}

#[test]
fn null_names_never_match() {
  let Some((repo, path)) = setup_repo(500) else { return };
  repo.insert_compounds(&[Compound::new(None, Some("CCO".into())).with_id("x1"), Compound::named("Ethanol", "CCO")])
      .expect("insert");
  let svc = CompoundSearch::new(repo);
  let out = svc.search("name", "e").expect("search");
  assert_eq!(out.len(), 1);
  assert_eq!(svc.search("smiles", "CCO").expect("search").len(), 2);
  drop(svc);
  cleanup(path);
}

#[test]
fn unreachable_database_is_a_pool_error() {
  if cfg!(feature = "pg") {
    return;
  }
  let mut cfg = RepositoryConfig::new("/nonexistent-dir-for-compound-tests/sub/compounds.db");
  cfg.connection_timeout = Duration::from_millis(300);
  match DieselCompoundRepository::new(&cfg) {
    Err(e @ PersistenceError::Pool(_)) => {
      let lookup: LookupError = e.into();
      assert!(matches!(lookup, LookupError::DataSource(_)));
    }
    Err(other) => panic!("expected pool error, got {:?}", other),
    Ok(_) => panic!("expected pool error, got a repository"),
  }
}

#[test]
fn wildcards_in_the_term_are_literal_under_the_cap() {
  let Some((repo, path)) = setup_repo(3) else { return };
  let mut rows: Vec<Compound> =
    (0..5).map(|i| Compound::named(&format!("a{}b", i), &format!("C{}", i)).with_id(format!("{:02}", i))).collect();
  rows.push(Compound::named("a_b", "CC").with_id("99"));
  rows.push(Compound::named("100% pure", "CCC").with_id("98"));
  repo.insert_compounds(&rows).expect("insert");

  let svc = CompoundSearch::new(repo);
  let out = svc.search("name", "a_b").expect("search");
  assert_eq!(out.len(), 1);
  assert_eq!(out.compounds()[0].id(), Some("99"));
  let out = svc.search("name", "0%").expect("search");
  assert_eq!(out.len(), 1);
  assert_eq!(out.compounds()[0].name(), Some("100% pure"));
  assert_eq!(svc.search("name", "%").expect("search").len(), 1);
  assert_eq!(svc.search("id", "_").expect("search"), SearchOutcome::Empty);
  drop(svc);
  cleanup(path);
}

#[test]
fn non_ascii_names_match_regardless_of_case() {
  let Some((repo, path)) = setup_repo(500) else { return };
  repo.insert_compounds(&[Compound::named("Ácido acetilsalicílico", "CC(=O)OC1=CC=CC=C1C(=O)O").with_id("A-1"),
                          Compound::named("Cafeína", "CN1C=NC2=C1C(=O)N(C(=O)N2C)C").with_id("B-1")])
      .expect("insert");

  let svc = CompoundSearch::new(repo);
  let out = svc.search("name", "ÁCIDO").expect("search");
  assert_eq!(out.len(), 1);
  assert_eq!(out.compounds()[0].id(), Some("A-1"));
  assert_eq!(svc.search("name", "CAFEÍNA").expect("search").len(), 1);
  assert_eq!(svc.search("name", "salicílico").expect("search").len(), 1);
  assert_eq!(svc.search("id", "a-").expect("search").len(), 1);
  drop(svc);
  cleanup(path);
}

#[test]
fn connections_use_write_ahead_log() {
  let Some((repo, path)) = setup_repo(500) else { return };
  repo.insert_compounds(&natural_products()).expect("insert");
  // El fichero -wal existe mientras el pool mantiene conexiones abiertas.
  assert!(path.with_extension("db-wal").exists());
  drop(repo);
  cleanup(path);
}
