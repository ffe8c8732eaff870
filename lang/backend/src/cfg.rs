use serde_derive::Deserialize;

use fortpeg_printer::PrintCfg;

/// Options of the generated Fortran document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodegenCfg {
    /// Name of the generated module.
    pub module_name: String,
    /// Name of the module providing `input`, `cursor` and the `accept*` primitives.
    pub runtime_module: String,
    /// How many spaces of indentation are used
    pub indent: usize,
    /// Lines longer than this are split with continuation lines where possible.
    pub width: usize,
}

impl Default for CodegenCfg {
    fn default() -> Self {
        Self {
            module_name: "parser".to_owned(),
            runtime_module: "peg_runtime".to_owned(),
            indent: 4,
            width: fortpeg_printer::DEFAULT_WIDTH,
        }
    }
}

impl CodegenCfg {
    pub fn print_cfg(&self) -> PrintCfg {
        PrintCfg { width: self.width, indent: self.indent as isize }
    }
}
