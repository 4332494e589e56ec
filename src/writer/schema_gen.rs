use crate::schema::TableSchema;

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", schema.name);
    let mut columns = Vec::new();

    for col in schema.columns {
        let pk = if col.primary_key { " PRIMARY KEY" } else { "" };
        let null_constraint = if !col.nullable && !col.primary_key {
            " NOT NULL"
        } else {
            ""
        };
        let check = col
            .check
            .map(|expr| format!(" CHECK ({})", expr))
            .unwrap_or_default();

        columns.push(format!(
            "    {} {}{}{}{}",
            col.name,
            col.col_type.sql_type(),
            pk,
            null_constraint,
            check
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements, unique indexes first
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    let mut indexes: Vec<_> = schema.indexes.iter().collect();
    indexes.sort_by_key(|i| !i.unique);

    indexes
        .into_iter()
        .map(|index| {
            let kind = if index.unique { "UNIQUE INDEX" } else { "INDEX" };
            format!(
                "CREATE {} IF NOT EXISTS idx_{}_{} ON {}({})",
                kind,
                schema.name,
                index.columns.join("_"),
                schema.name,
                index.columns.join(", ")
            )
        })
        .collect()
}
