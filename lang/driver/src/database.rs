use std::path::{Path, PathBuf};

use fortpeg_backend::{CodegenCfg, Translation, ir};
use fortpeg_cst::CstDocument;

use crate::fs::{read_config, read_document};
use crate::result::{DriverError, MainError, MainErrors, MainResult};

/// A loaded grammar document together with the options used to translate it.
#[derive(Debug, Clone)]
pub struct Database {
    /// Where the document was read from, for error messages
    pub path: PathBuf,
    pub document: CstDocument,
    pub cfg: CodegenCfg,
}

impl Database {
    pub fn from_path(path: &Path) -> Result<Self, DriverError> {
        log::debug!("Loading grammar document {}", path.display());
        let document = read_document(path)?;
        Ok(Database { path: path.to_path_buf(), document, cfg: CodegenCfg::default() })
    }

    pub fn from_document(path: &Path, document: CstDocument) -> Self {
        Database { path: path.to_path_buf(), document, cfg: CodegenCfg::default() }
    }

    /// Replace the code generation options by the ones in a TOML file.
    pub fn load_config(&mut self, path: &Path) -> Result<(), DriverError> {
        log::debug!("Loading configuration {}", path.display());
        self.cfg = read_config(path)?;
        Ok(())
    }

    /// The matcher IR of the grammar.
    pub fn ir(&self) -> MainResult<ir::Parser> {
        let CstDocument { grammar, action_types } = &self.document;
        fortpeg_backend::grammar_to_ir(grammar, action_types).map_err(MainErrors::from)
    }

    /// The generated Fortran document.
    pub fn translate(&self) -> MainResult<Translation> {
        let CstDocument { grammar, action_types } = &self.document;
        let translation =
            fortpeg_backend::translate(grammar, action_types, &self.cfg).map_err(MainErrors::from)?;
        log::debug!(
            "Translated {} into {} line(s)",
            self.path.display(),
            translation.source.lines().count()
        );
        Ok(translation)
    }

    /// Turn the errors of a pipeline run into reports that can be rendered.
    pub fn pretty_errors(&self, errs: MainErrors) -> Vec<miette::Report> {
        let MainErrors(errs) = errs;
        errs.into_iter().map(|err| self.pretty_error(err)).collect()
    }

    pub fn pretty_error(&self, err: MainError) -> miette::Report {
        log::debug!("Translation of {} failed: {err}", self.path.display());
        err.into()
    }
}
