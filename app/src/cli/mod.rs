use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use fortpeg_driver::{Database, render_reports_io};

use crate::global_settings::GlobalSettings;

mod check;
mod compile;
mod ignore_colors;
mod ir;
mod terminal;

pub fn exec() {
    use Command::*;
    let settings = GlobalSettings::from_env();
    env_logger::Builder::new()
        .filter_level(settings.log_level)
        .write_style(settings.write_style())
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Compile(args) => compile::exec(args),
        Ir(args) => ir::exec(args, &settings),
        Check(args) => check::exec(args),
    };

    if let Err(reports) = result {
        let mut stderr = std::io::stderr();
        if render_reports_io(&mut stderr, &reports, settings.colorize).is_err() {
            log::error!("Failed to render {} error report(s)", reports.len());
        }
        std::process::exit(1);
    }
}

#[derive(Parser)]
#[clap(version, author, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate a grammar document into a Fortran module
    Compile(compile::Args),
    /// Print the resolved matcher IR of a grammar document
    Ir(ir::Args),
    /// Check that a grammar document can be translated
    Check(check::Args),
}

/// Options shared by all subcommands.
#[derive(clap::Args)]
pub struct Input {
    /// The grammar document (JSON)
    #[clap(value_parser, value_name = "FILE")]
    filepath: PathBuf,
    /// Code generation options (TOML)
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Input {
    fn open(&self) -> Result<Database, Vec<miette::Report>> {
        let mut db = Database::from_path(&self.filepath).map_err(|err| vec![err.into()])?;
        if let Some(config) = &self.config {
            db.load_config(config).map_err(|err| vec![err.into()])?;
        }
        Ok(db)
    }

    fn path(&self) -> &Path {
        &self.filepath
    }
}
