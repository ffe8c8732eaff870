//! Loading of grammar documents and configuration files, and the translation pipeline on top
//! of them, for the command line.

mod database;
mod fs;
mod render_reports;
mod result;

pub use database::Database;

pub use fs::*;
pub use render_reports::*;
pub use result::*;
