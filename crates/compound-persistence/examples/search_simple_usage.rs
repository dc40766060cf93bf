use compound_domain::{sample_compounds, CompoundSearch};
use compound_persistence::new_from_env;

fn main() {
  // El ejemplo usa la variable de entorno COMPOUND_DB_URL (o DATABASE_URL).
  // Para demos locales rápidas con SQLite puedes exportar:
  //   export COMPOUND_DB_URL="/tmp/compounds.db"
  // Compilado con `--features pg` espera una URL postgres://.
  let repo = new_from_env().expect("no se pudo inicializar el repositorio");

  let ids: Vec<_> = sample_compounds().into_iter()
                                      .enumerate()
                                      .map(|(i, c)| c.with_id(format!("{}", 1001 + i)))
                                      .collect();
  let n = repo.insert_compounds(&ids).expect("insert");
  println!("imported {} compounds", n);

  let svc = CompoundSearch::new(repo);
  for (field, term) in [("Name", "asp"), ("SMILES", "CC(=O)NC1=CC=C(O)C=C1"), ("Identifier", "1004"), ("Name", "xyz")] {
    match svc.search(field, term) {
      Ok(found) if found.is_empty() => println!("{}={}: no compounds found", field, term),
      Ok(found) => {
        for c in found.compounds() {
          println!("{}={}: {}", field, term, c);
        }
      }
      Err(e) => eprintln!("{}={}: {}", field, term, e),
    }
  }
}
