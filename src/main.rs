use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::info;

use product_shop::{db, logger, read_dataset, write_result, AppConfig, ExportKind, ImportKind};

#[derive(Parser, Debug)]
#[command(name = "product-shop", version, about = "Import and export product shop data as XML")]
struct Cli {
    /// TOML file with database_path / datasets_dir / output_dir
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, env = "PRODUCT_SHOP_DB", global = true)]
    db: Option<PathBuf>,

    /// Directory holding the XML datasets
    #[arg(long, env = "PRODUCT_SHOP_DATASETS", global = true)]
    datasets: Option<PathBuf>,

    /// Directory export-all writes into
    #[arg(long, env = "PRODUCT_SHOP_OUTPUT", global = true)]
    output_dir: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drop and recreate every table
    Reset,

    /// Import one dataset and print the summary
    Import {
        #[arg(value_enum)]
        kind: ImportKind,

        /// Dataset file, defaults to the standard file in the datasets directory
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Import users, products, categories and category products in that order
    ImportAll,

    /// Run one export and print the XML (or write it to --output)
    Export {
        #[arg(value_enum)]
        kind: ExportKind,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Write every export into the output directory
    ExportAll,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    }
    .with_overrides(cli.db.clone(), cli.datasets.clone(), cli.output_dir.clone())?;

    let conn = db::open(&config.database_path)
        .with_context(|| format!("Failed to open {}", config.database_path.display()))?;

    match cli.command {
        Command::Reset => {
            db::reset_database(&conn)?;
            println!("Db Reset Succeed!");
        }
        Command::Import { kind, file } => {
            let path = file.unwrap_or_else(|| config.dataset_path(kind));
            run_import(&conn, kind, &path)?;
        }
        Command::ImportAll => {
            for kind in ImportKind::ALL {
                run_import(&conn, kind, &config.dataset_path(kind))?;
            }
        }
        Command::Export { kind, output } => {
            let xml = kind.run(&conn)?;
            match output {
                Some(path) => {
                    write_result(&path, &xml)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), "export written");
                }
                None => println!("{}", xml),
            }
        }
        Command::ExportAll => {
            for kind in ExportKind::ALL {
                let path = config.result_path(kind);
                let xml = kind.run(&conn)?;
                write_result(&path, &xml)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

fn run_import(conn: &Connection, kind: ImportKind, path: &Path) -> Result<()> {
    let input_xml = read_dataset(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;
    let summary = kind
        .run(conn, &input_xml)
        .with_context(|| format!("Import of {} failed", path.display()))?;
    println!("{}", summary);
    Ok(())
}
