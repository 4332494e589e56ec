//! One import run: check the store, load sources, compute the relevant ids,
//! then transform and write each id.

use std::collections::BTreeSet;
use tracing::info;

use crate::closure::relevant_ids;
use crate::config::ImportConfig;
use crate::error::ImportResult;
use crate::parser::{
    extract_blueprints, extract_reprocessing, extract_types, load_mapping, BlueprintData,
    ReprocessingData, TypeCatalog, TypeId,
};
use crate::report::ImportReport;
use crate::transform::RecordTransformer;
use crate::ui::{Phase, Ui};
use crate::writer::SqliteWriter;

/// Parsed contents of the three source files
#[derive(Debug, Default)]
pub struct SourceData {
    pub reprocessing: ReprocessingData,
    pub blueprints: BlueprintData,
    pub types: TypeCatalog,
}

impl SourceData {
    pub fn load(config: &ImportConfig) -> Self {
        let reprocessing = extract_reprocessing(&load_mapping(&config.sources.materials));
        info!("Found {} items with reprocessing data", reprocessing.materials.len());

        let blueprints = extract_blueprints(&load_mapping(&config.sources.blueprints));
        info!("Found {} blueprints with manufacturing data", blueprints.blueprints.len());

        let types = extract_types(&load_mapping(&config.sources.types), &config.locale);
        info!("Loaded {} types", types.len());

        Self {
            reprocessing,
            blueprints,
            types,
        }
    }

    pub fn relevant_ids(&self) -> BTreeSet<TypeId> {
        relevant_ids(&self.reprocessing, &self.blueprints)
    }
}

/// Run a full import against an existing catalog database.
///
/// Fails before touching any source file when the configuration is invalid
/// or the database (or one of its tables) is missing. After that, only a
/// failing transaction commit stops the run.
pub fn run_import(config: &ImportConfig, ui: &mut impl Ui) -> ImportResult<ImportReport> {
    config.validate()?;

    ui.set_phase(Phase::Checking);
    let mut writer = SqliteWriter::open(&config.db_path, config.batch_size)?;

    ui.set_phase(Phase::Loading);
    let sources = SourceData::load(config);
    let ids = sources.relevant_ids();
    ui.log(format!("Importing {} types...", ids.len()));

    ui.set_phase(Phase::Importing);
    let transformer =
        RecordTransformer::new(&sources.reprocessing, &sources.blueprints, &sources.types)
            .published_only(config.published_only);
    let report = writer.write_all(&ids, |type_id| transformer.transform(type_id), ui)?;

    writer.close()?;
    ui.set_phase(Phase::Complete);

    info!(
        types = report.inserted.types,
        reprocessing = report.inserted.reprocessing,
        blueprints = report.inserted.blueprints,
        blueprint_materials = report.inserted.blueprint_materials,
        skipped = report.skipped,
        unpublished = report.unpublished,
        failed = report.failed,
        "Import finished"
    );

    Ok(report)
}
