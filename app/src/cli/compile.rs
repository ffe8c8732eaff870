use std::io::{self, Write};
use std::path::PathBuf;

use fortpeg_driver::write_string;

use super::Input;

#[derive(clap::Args)]
pub struct Args {
    #[clap(flatten)]
    input: Input,
    /// Write the generated module to FILE instead of stdout
    #[clap(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Name of the generated module
    #[clap(long, value_name = "NAME")]
    module: Option<String>,
    /// Name of the runtime module providing the match primitives
    #[clap(long, value_name = "NAME")]
    runtime: Option<String>,
    /// Spaces of indentation per nesting level
    #[clap(long)]
    indent: Option<usize>,
}

pub fn exec(cmd: Args) -> Result<(), Vec<miette::Report>> {
    let mut db = cmd.input.open()?;

    // command line flags take precedence over the configuration file
    if let Some(module) = cmd.module {
        db.cfg.module_name = module;
    }
    if let Some(runtime) = cmd.runtime {
        db.cfg.runtime_module = runtime;
    }
    if let Some(indent) = cmd.indent {
        db.cfg.indent = indent;
    }

    let translation = db.translate().map_err(|errs| db.pretty_errors(errs))?;

    match &cmd.output {
        Some(path) => write_string(path, &translation.source).map_err(|err| vec![err.into()])?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(translation.source.as_bytes())
                .map_err(|err| vec![miette::Report::msg(format!("Failed to write to stdout: {err}"))])?;
        }
    }

    log::info!(
        "Translated {} with {} action function(s)",
        cmd.input.path().display(),
        translation.actions.len()
    );
    Ok(())
}
