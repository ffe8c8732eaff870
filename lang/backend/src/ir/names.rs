//! Generated identifiers and value types.
//!
//! Fortran identifiers are case-insensitive, at most 63 characters long, start with a letter and
//! consist of letters, digits and underscores. Every generated name carries a prefix that keeps it
//! apart from Fortran keywords, the runtime support module and the other kinds of generated names.

use std::fmt::{self, Display};

use fortpeg_cst::{ActionTypes, HashMap};

/// Prefix of generated rule functions.
pub const RULE_PREFIX: &str = "peg_";
/// Prefix of generated action functions.
pub const ACTION_PREFIX: &str = "action_";
/// Prefix of generated predicate functions.
pub const PREDICATE_PREFIX: &str = "pred_";
/// Prefix of the per-position capture variables.
pub const CAPTURE_PREFIX: &str = "capture_";
/// Prefix of the variables holding the value of a captured group.
pub const GROUP_PREFIX: &str = "group";
/// Name of the result variable of rule, action and predicate functions.
pub const RESULT_VAR: &str = "res";

const MAX_IDENT_LEN: usize = 63;
/// Leaves room for prefixes and numeric suffixes within [`MAX_IDENT_LEN`].
const MAX_BASE_LEN: usize = 40;

/// The sanitized base name of a rule, from which all its generated names are derived.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    pub name: String,
    pub id: Option<usize>,
}

impl Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ident { name, id } = self;

        match id {
            Some(id) => write!(f, "{name}_{id}"),
            None => write!(f, "{name}"),
        }
    }
}

/// The base names of all rules of a grammar.
///
/// Names are assigned in source order; when two rule ids sanitize to the same name, the later
/// one receives the smallest numeric suffix that is still free.
#[derive(Debug, Clone, Default)]
pub struct RuleNames {
    names: HashMap<String, Ident>,
}

impl RuleNames {
    pub fn new<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut names = HashMap::default();
        let mut occupied: Vec<String> = Vec::new();

        for id in ids {
            if names.contains_key(id) {
                continue;
            }
            let mut ident = Ident { name: rename_to_valid_identifier(id), id: None };
            disambiguate_ident(&mut ident, &occupied);
            occupied.push(ident.to_string());
            names.insert(id.to_owned(), ident);
        }

        RuleNames { names }
    }

    pub fn base(&self, rule: &str) -> Option<&Ident> {
        self.names.get(rule)
    }

    /// The name of the generated function for `rule`.
    pub fn rule_function_name(&self, rule: &str) -> Option<String> {
        self.base(rule).map(rule_function_name)
    }
}

fn disambiguate_ident(ident: &mut Ident, occupied: &[String]) {
    if !occupied.contains(&ident.to_string()) {
        return;
    }
    for id in 1.. {
        ident.id = Some(id);
        if !occupied.contains(&ident.to_string()) {
            return;
        }
    }
}

/// Map an arbitrary rule id to a lowercase name made of `[a-z0-9_]`.
pub fn rename_to_valid_identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .take(MAX_BASE_LEN)
        .collect();

    // make sure the ident is non-empty
    if ident.is_empty() {
        ident = String::from("rule");
    }

    ident
}

/// Whether `name` can be used verbatim as a Fortran identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    name.len() <= MAX_IDENT_LEN && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn rule_function_name(base: &Ident) -> String {
    format!("{RULE_PREFIX}{base}")
}

/// The action attached to one alternative of a rule.
pub fn action_id(base: &Ident, alternative: usize) -> String {
    format!("{ACTION_PREFIX}{base}_{alternative}")
}

/// The `index`-th predicate of a rule, counted in traversal order.
///
/// A single numeric suffix keeps the name unambiguous: the part before the last `_` is always
/// the base, which is unique among the rules.
pub fn predicate_id(base: &Ident, index: usize) -> String {
    format!("{PREDICATE_PREFIX}{base}_{index}")
}

/// The variable holding the value captured at `position` of `alternative`.
pub fn capture_var(alternative: usize, position: usize) -> String {
    format!("{CAPTURE_PREFIX}{alternative}_{position}")
}

/// The variable holding the value of the group found at `path`.
pub fn group_var(path: &[(usize, usize)]) -> String {
    format!("{GROUP_PREFIX}{}", render_path(path))
}

fn render_path(path: &[(usize, usize)]) -> String {
    path.iter().map(|(alternative, position)| format!("_{alternative}_{position}")).collect()
}

/// The type of a value produced by a rule, an action or a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// A captured substring of arbitrary length.
    Text,
    /// A target-language type declared for an action.
    Declared(String),
}

impl ValueType {
    /// A blank declaration stands for text.
    pub fn declared(typ: &str) -> Self {
        match typ.trim() {
            "" => ValueType::Text,
            typ => ValueType::Declared(typ.to_owned()),
        }
    }

    /// The Fortran type specification, without the entity-specific attributes.
    pub fn type_spec(&self) -> &str {
        match self {
            ValueType::Text => "character(len=:), allocatable",
            ValueType::Declared(typ) => typ,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ValueType::Text)
    }

    /// Whether two types denote the same Fortran type, ignoring case.
    pub fn same_as(&self, other: &ValueType) -> bool {
        match (self, other) {
            (ValueType::Text, ValueType::Text) => true,
            (ValueType::Declared(a), ValueType::Declared(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Text => write!(f, "text"),
            ValueType::Declared(typ) => write!(f, "{typ}"),
        }
    }
}

/// The declared return type of an action, or captured text when the table has no entry.
pub fn result_type(rule: &str, alternative: usize, action_types: &ActionTypes) -> ValueType {
    match action_types.declared(rule, alternative) {
        Some(typ) => ValueType::declared(typ),
        None => ValueType::Text,
    }
}
