use anyhow::{Context, Result};
use eve_sde_catalog::{
    cli::{import_config, Cli, Commands},
    logging,
    pipeline::run_import,
    schema::table_names,
    writer::init_database,
    LogUi,
};
use std::time::Instant;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init();

    match cli.command {
        Commands::Import {
            sde_dir,
            db,
            materials,
            blueprints,
            types,
            batch_size,
            locale,
            published_only,
            json,
        } => {
            let start = Instant::now();

            let config = import_config(
                sde_dir,
                db,
                materials,
                blueprints,
                types,
                batch_size,
                locale,
                published_only,
            );
            let mut ui = LogUi::new();
            let report = run_import(&config, &mut ui)
                .with_context(|| format!("Import into {:?} failed", config.db_path))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("\n{}", report);
                println!(
                    "\nProcessed {} type ids in {:.1}s",
                    report.processed,
                    start.elapsed().as_secs_f64()
                );
            }
        }

        Commands::InitDb { db } => {
            init_database(&db).with_context(|| format!("Failed to initialise {:?}", db))?;
            println!("Catalog tables ready in {:?}", db);
        }

        Commands::ListTables => {
            println!("Managed tables:\n");
            for name in table_names() {
                println!("  {}", name);
            }
        }
    }

    Ok(())
}
