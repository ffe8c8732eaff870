use std::fs;
use std::io::Write;
use std::path::PathBuf;

use fortpeg_printer::{Print, PrintCfg, StandardStream};

use super::Input;
use super::ignore_colors::IgnoreColors;
use super::terminal;
use crate::global_settings::GlobalSettings;

#[derive(clap::Args)]
pub struct Args {
    #[clap(flatten)]
    input: Input,
    /// Write the IR to FILE instead of stdout
    #[clap(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

pub fn exec(cmd: Args, settings: &GlobalSettings) -> Result<(), Vec<miette::Report>> {
    let db = cmd.input.open()?;
    let parser = db.ir().map_err(|errs| db.pretty_errors(errs))?;

    let io_error = |err: std::io::Error| vec![miette::Report::msg(format!("Failed to print the IR: {err}"))];

    match &cmd.output {
        Some(path) => {
            let cfg = db.cfg.print_cfg();
            let file = fs::File::create(path).map_err(io_error)?;
            let mut out = IgnoreColors::new(file);
            parser.print_colored(&cfg, &mut out).map_err(io_error)?;
        }
        None => {
            let cfg = PrintCfg { width: terminal::width(), indent: db.cfg.indent as isize };
            let mut stream = StandardStream::stdout(settings.colorize);
            parser.print_colored(&cfg, &mut stream).map_err(io_error)?;
            stream.flush().map_err(io_error)?;
        }
    }
    Ok(())
}
