// Diesel schema de la tabla de compuestos (SQLite en tests, Postgres en producción).
diesel::table! {
    compounds (identifier) {
        identifier -> Text,
        name -> Nullable<Text>,
        canonical_smiles -> Nullable<Text>,
        formula -> Nullable<Text>,
        molecular_weight -> Nullable<Double>,
    }
}
