use crate::{Compound, InMemorySource};

/// Tabla de ejemplo usada cuando no hay fuente configurada.
pub fn sample_compounds() -> Vec<Compound> {
  vec![Compound::named("Aspirin", "CC(=O)OC1=CC=CC=C1C(=O)O").with_formula("C9H8O4")
                                                             .with_molecular_weight(180.16),
       Compound::named("Caffeine", "CN1C=NC2=C1C(=O)N(C(=O)N2C)C").with_formula("C8H10N4O2")
                                                                  .with_molecular_weight(194.19),
       Compound::named("Paracetamol", "CC(=O)NC1=CC=C(O)C=C1").with_formula("C8H9NO2")
                                                             .with_molecular_weight(151.16),
       Compound::named("Ibuprofen", "CC(C)CC1=CC=C(C=C1)C(C)C(=O)O").with_formula("C13H18O2")
                                                                    .with_molecular_weight(206.29),]
}

/// Fuente en memoria pre-poblada con `sample_compounds`.
pub fn sample_source() -> InMemorySource {
  InMemorySource::labelled(sample_compounds(), "mock table")
}
