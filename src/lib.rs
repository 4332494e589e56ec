pub mod cli;
pub mod closure;
pub mod config;
pub mod error;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod transform;
pub mod ui;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::{ImportConfig, SourcePaths};
pub use error::{ImportError, ImportResult};
pub use pipeline::run_import;
pub use report::ImportReport;
pub use ui::{LogUi, Phase, SilentUi, Ui};
