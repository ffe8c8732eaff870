use std::{env, str::FromStr};

use fortpeg_printer::ColorChoice;

/// Settings taken from the environment rather than from the command line.
#[derive(Debug, Clone)]
pub struct GlobalSettings {
    pub colorize: ColorChoice,
    pub log_level: log::LevelFilter,
}

impl GlobalSettings {
    pub fn from_env() -> Self {
        let colorize = env::var("FORTPEG_COLORIZE")
            .ok()
            .and_then(|var| ColorChoice::from_str(&var).ok())
            .unwrap_or(ColorChoice::Auto);

        // the generated code goes to stdout, so stay quiet by default
        let log_level = env::var("FORTPEG_LOG_LEVEL")
            .ok()
            .and_then(|var| log::LevelFilter::from_str(&var.to_uppercase()).ok())
            .unwrap_or(log::LevelFilter::Warn);

        Self { colorize, log_level }
    }

    pub fn write_style(&self) -> env_logger::WriteStyle {
        match self.colorize {
            ColorChoice::Always | ColorChoice::AlwaysAnsi => env_logger::WriteStyle::Always,
            ColorChoice::Auto => env_logger::WriteStyle::Auto,
            ColorChoice::Never => env_logger::WriteStyle::Never,
        }
    }
}
