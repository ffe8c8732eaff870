//! Keywords of the generated Fortran code and symbols of the PEG notation used to print the IR.

// Fortran keywords
//
//

pub const MODULE: &str = "module";
pub const USE: &str = "use";
pub const IMPLICIT_NONE: &str = "implicit none";
pub const CONTAINS: &str = "contains";
pub const RECURSIVE: &str = "recursive";
pub const FUNCTION: &str = "function";
pub const RESULT: &str = "result";
pub const END: &str = "end";
pub const IF: &str = "if";
pub const THEN: &str = "then";
pub const ELSE: &str = "else";
pub const DO: &str = "do";
pub const SELECT_CASE: &str = "select case";
pub const SELECT: &str = "select";
pub const CASE: &str = "case";
pub const CASE_DEFAULT: &str = "case default";
pub const BLOCK: &str = "block";
pub const EXIT: &str = "exit";
pub const CYCLE: &str = "cycle";
pub const RETURN: &str = "return";
pub const NOT: &str = ".not.";
pub const TRUE: &str = ".true.";
pub const FALSE: &str = ".false.";
pub const CONCAT: &str = "//";

// PEG notation
//
//

/// The symbol `<-`
pub const DEFINES: &str = "<-";

/// The symbol `/`
pub const SLASH: &str = "/";

/// The symbol `:`
pub const COLON: &str = ":";

/// The symbol `&`
pub const AMPERSAND: &str = "&";

/// The symbol `!`
pub const BANG: &str = "!";

/// The symbol `.`
pub const DOT: &str = ".";

/// The symbol `?`
pub const QUESTION_MARK: &str = "?";

/// The symbol `*`
pub const STAR: &str = "*";

/// The symbol `+`
pub const PLUS: &str = "+";

/// The symbol `|`
pub const PIPE: &str = "|";

/// The symbol `,`
pub const COMMA: &str = ",";

/// The symbol `..`
pub const DOT_DOT: &str = "..";

/// The symbol `=>`
pub const FAT_ARROW: &str = "=>";

/// The keyword `start`
pub const START: &str = "start";
