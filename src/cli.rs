use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{ImportConfig, SourcePaths, DEFAULT_BATCH_SIZE, DEFAULT_LOCALE};

#[derive(Parser, Debug)]
#[command(name = "eve-sde-catalog")]
#[command(version, about = "Import EVE Online SDE reprocessing and blueprint data into SQLite")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import types, reprocessing yields and blueprints into an existing database
    Import {
        /// Directory of an extracted SDE
        #[arg(short, long, env = "SDE_DIR")]
        sde_dir: PathBuf,

        /// Catalog SQLite database (must already exist)
        #[arg(short, long, env = "SDE_IMPORT_DB", default_value = "salvo.db")]
        db: PathBuf,

        /// Override the reprocessing materials file
        #[arg(long)]
        materials: Option<PathBuf>,

        /// Override the blueprints file
        #[arg(long)]
        blueprints: Option<PathBuf>,

        /// Override the types file
        #[arg(long)]
        types: Option<PathBuf>,

        /// Commit after this many type ids
        #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Locale for type names
        #[arg(short, long, default_value = DEFAULT_LOCALE)]
        locale: String,

        /// Skip type rows of unpublished types
        #[arg(long)]
        published_only: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create the catalog tables in a (new or existing) database
    InitDb {
        /// SQLite database path
        db: PathBuf,
    },

    /// List the tables managed by the importer
    ListTables,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Build the import configuration from `import` arguments
#[allow(clippy::too_many_arguments)]
pub fn import_config(
    sde_dir: PathBuf,
    db: PathBuf,
    materials: Option<PathBuf>,
    blueprints: Option<PathBuf>,
    types: Option<PathBuf>,
    batch_size: usize,
    locale: String,
    published_only: bool,
) -> ImportConfig {
    let discovered = SourcePaths::discover(&sde_dir);
    let sources = SourcePaths {
        materials: materials.unwrap_or(discovered.materials),
        blueprints: blueprints.unwrap_or(discovered.blueprints),
        types: types.unwrap_or(discovered.types),
    };

    ImportConfig::new(sources, db)
        .with_batch_size(batch_size)
        .with_locale(locale)
        .with_published_only(published_only)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_defaults() {
        let cli = Cli::try_parse_from(["eve-sde-catalog", "import", "--sde-dir", "sde"]).unwrap();
        match cli.command {
            Commands::Import {
                sde_dir,
                batch_size,
                locale,
                published_only,
                ..
            } => {
                assert_eq!(sde_dir, PathBuf::from("sde"));
                assert_eq!(batch_size, 1000);
                assert_eq!(locale, "en");
                assert!(!published_only);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_import_config_overrides() {
        let config = import_config(
            PathBuf::from("sde"),
            PathBuf::from("catalog.db"),
            Some(PathBuf::from("custom/materials.jsonl")),
            None,
            None,
            250,
            "de".to_string(),
            true,
        );

        assert_eq!(config.sources.materials, PathBuf::from("custom/materials.jsonl"));
        assert_eq!(config.sources.blueprints, PathBuf::from("sde/fsd/blueprints.yaml"));
        assert_eq!(config.batch_size, 250);
        assert_eq!(config.locale, "de");
        assert!(config.published_only);
    }
}
