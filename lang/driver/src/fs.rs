use std::fs;
use std::path::Path;

use fortpeg_backend::CodegenCfg;
use fortpeg_cst::CstDocument;

use crate::result::DriverError;

/// Read a file, normalizing Windows line endings.
///
/// Depending on how git is configured on Windows, fixtures may be checked out with `\r\n` line
/// endings; the verbatim code blocks of a grammar must not carry them into the generated code.
pub fn read_to_string(path: &Path) -> Result<String, DriverError> {
    if !path.exists() {
        return Err(DriverError::FileNotFound(path.to_path_buf()));
    }
    let source = fs::read_to_string(path).map_err(DriverError::io)?;
    Ok(source.replace("\r\n", "\n"))
}

/// Read a grammar document in its JSON encoding.
pub fn read_document(path: &Path) -> Result<CstDocument, DriverError> {
    let source = read_to_string(path)?;
    parse_document(path, &source)
}

pub fn parse_document(path: &Path, source: &str) -> Result<CstDocument, DriverError> {
    serde_json::from_str(source).map_err(|err| DriverError::InvalidDocument {
        path: path.to_path_buf(),
        message: strip_position(&err.to_string()),
        line: err.line(),
        column: err.column(),
    })
}

/// serde_json appends the position to its messages; we report it separately.
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(idx) => message[..idx].to_owned(),
        None => message.to_owned(),
    }
}

/// Read code generation options from a TOML file; missing keys keep their defaults.
pub fn read_config(path: &Path) -> Result<CodegenCfg, DriverError> {
    let source = read_to_string(path)?;
    toml::from_str(&source).map_err(|err| DriverError::InvalidConfig {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

pub fn write_string(path: &Path, contents: &str) -> Result<(), DriverError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(DriverError::io)?;
        }
    }
    log::debug!("Writing {}", path.display());
    fs::write(path, contents).map_err(DriverError::io)
}
