use rusqlite::{params, Connection, OpenFlags, Transaction};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, error, info, warn};

use super::schema_gen::{generate_create_table, generate_indexes};
use crate::error::{ImportError, ImportResult};
use crate::parser::TypeId;
use crate::report::{ImportReport, InsertCounts};
use crate::schema::{
    TableSchema, ALL_TABLES, BLUEPRINTS, BLUEPRINT_MATERIALS, EVE_TYPES, MATERIAL_REPROCESSING,
};
use crate::transform::NormalizedRecord;
use crate::ui::Ui;

/// Result of writing one id's rows
#[derive(Debug)]
pub enum UnitOutcome {
    Written(InsertCounts),
    /// Everything written for the id was rolled back
    Failed(rusqlite::Error),
}

/// Insert-if-absent writer for the catalog tables.
///
/// The database and its tables must already exist. Each id is written inside
/// its own savepoint, and the surrounding transaction is committed every
/// `batch_size` ids.
pub struct SqliteWriter {
    conn: Connection,
    batch_size: usize,
}

impl SqliteWriter {
    /// Open an existing catalog database
    pub fn open(db_path: &Path, batch_size: usize) -> ImportResult<Self> {
        if !db_path.is_file() {
            return Err(ImportError::StoreMissing(db_path.to_path_buf()));
        }

        // No SQLITE_OPEN_CREATE: the store is provisioned elsewhere
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.execute_batch(
            "PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;",
        )?;

        Self::from_connection(conn, batch_size)
    }

    /// Wrap an open connection after checking that all tables exist
    pub fn from_connection(conn: Connection, batch_size: usize) -> ImportResult<Self> {
        for schema in ALL_TABLES {
            let exists: bool = conn.query_row(
                "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
                [schema.name],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(ImportError::SchemaMissing(schema.name));
            }
        }

        Ok(Self {
            conn,
            batch_size: batch_size.max(1),
        })
    }

    /// Write the rows of every id, in iteration order of `ids`.
    ///
    /// A failing id is logged and counted, then skipped. Only errors from
    /// the transaction itself (begin/commit) end the run.
    pub fn write_all<F>(
        &mut self,
        ids: &BTreeSet<TypeId>,
        transform: F,
        ui: &mut impl Ui,
    ) -> ImportResult<ImportReport>
    where
        F: Fn(TypeId) -> NormalizedRecord,
    {
        let ids: Vec<TypeId> = ids.iter().copied().collect();
        let total = ids.len() as u64;
        let mut report = ImportReport::new();

        for batch in ids.chunks(self.batch_size) {
            let batch_report = self.write_batch(batch, &transform)?;
            report.merge(&batch_report);

            debug!(processed = report.processed, "Committed batch");
            ui.set_progress(
                report.processed,
                total,
                format!(
                    "{} types, {} reprocessing, {} blueprints",
                    report.inserted.types, report.inserted.reprocessing, report.inserted.blueprints
                ),
            );
        }

        Ok(report)
    }

    /// Write one batch in a single transaction and commit it.
    ///
    /// Some errors (`RAISE(ROLLBACK)`, disk full, I/O errors) roll back the
    /// whole transaction rather than the id's savepoint. The failing id is
    /// then excluded and the batch is written again from its start, so the
    /// returned counters only describe rows that were committed.
    fn write_batch<F>(&mut self, batch: &[TypeId], transform: &F) -> ImportResult<ImportReport>
    where
        F: Fn(TypeId) -> NormalizedRecord,
    {
        let mut failed: BTreeSet<TypeId> = BTreeSet::new();

        'attempt: loop {
            let mut tx = self.conn.transaction()?;
            let mut report = ImportReport::new();

            for &type_id in batch {
                let record = transform(type_id);
                report.record_processed();
                if let Some(reason) = record.skip_reason() {
                    report.record_skip(reason);
                }
                if failed.contains(&type_id) {
                    report.record_failure();
                    continue;
                }

                match write_unit(&mut tx, &record) {
                    UnitOutcome::Written(counts) => report.record_inserts(counts),
                    UnitOutcome::Failed(e) => {
                        error!(
                            type_id,
                            name = %record.display_name(),
                            error = %e,
                            "Error importing type"
                        );
                        report.record_failure();
                        failed.insert(type_id);

                        if tx.is_autocommit() {
                            warn!(type_id, "Batch transaction was rolled back, rewriting batch");
                            continue 'attempt;
                        }
                    }
                }
            }

            tx.commit()?;
            return Ok(report);
        }
    }

    /// Release the connection
    pub fn close(self) -> ImportResult<()> {
        self.conn.execute_batch("PRAGMA optimize;")?;
        self.conn.close().map_err(|(_, e)| ImportError::Database(e))
    }
}

/// Write one id's rows inside a savepoint
pub fn write_unit(tx: &mut Transaction, record: &NormalizedRecord) -> UnitOutcome {
    let result = tx.savepoint().and_then(|sp| {
        let counts = insert_record(&sp, record)?;
        sp.commit()?;
        Ok(counts)
    });

    match result {
        Ok(counts) => UnitOutcome::Written(counts),
        Err(e) => UnitOutcome::Failed(e),
    }
}

/// Insert rows in the order type, reprocessing, blueprint, blueprint materials
fn insert_record(conn: &Connection, record: &NormalizedRecord) -> rusqlite::Result<InsertCounts> {
    let mut counts = InsertCounts::default();

    if let Ok(row) = &record.type_row {
        let mut stmt = conn.prepare_cached(&insert_sql(&EVE_TYPES))?;
        counts.types += stmt.execute(params![
            row.type_id,
            row.name,
            row.description,
            row.group_id,
            row.category_id,
            row.volume,
            row.base_price,
            row.market_group_id,
            row.portion_size,
        ])? as u64;
    }

    if !record.reprocessing.is_empty() {
        let mut stmt = conn.prepare_cached(&insert_sql(&MATERIAL_REPROCESSING))?;
        for row in &record.reprocessing {
            counts.reprocessing +=
                stmt.execute(params![row.source_type_id, row.material_type_id, row.quantity])? as u64;
        }
    }

    if let Some(row) = &record.blueprint {
        let mut stmt = conn.prepare_cached(&insert_sql(&BLUEPRINTS))?;
        counts.blueprints += stmt.execute(params![
            row.blueprint_type_id,
            row.product_type_id,
            row.manufacturing_time
        ])? as u64;
    }

    if !record.blueprint_materials.is_empty() {
        let mut stmt = conn.prepare_cached(&insert_sql(&BLUEPRINT_MATERIALS))?;
        for row in &record.blueprint_materials {
            counts.blueprint_materials +=
                stmt.execute(params![row.blueprint_type_id, row.material_type_id, row.quantity])?
                    as u64;
        }
    }

    Ok(counts)
}

/// `INSERT OR IGNORE` over every column of the table
fn insert_sql(schema: &TableSchema) -> String {
    let columns = schema.column_names();
    let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
    format!(
        "INSERT OR IGNORE INTO {} ({}) VALUES ({})",
        schema.name,
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// Create all managed tables and indexes that do not exist yet
pub fn create_tables(conn: &Connection) -> ImportResult<()> {
    for schema in ALL_TABLES {
        conn.execute(&generate_create_table(schema), [])?;
        for index_sql in generate_indexes(schema) {
            conn.execute(&index_sql, [])?;
        }
    }
    Ok(())
}

/// Create the database file if needed and provision the catalog tables
pub fn init_database(db_path: &Path) -> ImportResult<()> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(db_path)?;
    create_tables(&conn)?;
    info!(path = %db_path.display(), tables = ALL_TABLES.len(), "Catalog schema ready");
    Ok(())
}
