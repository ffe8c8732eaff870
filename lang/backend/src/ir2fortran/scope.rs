use crate::fortran::Decl;
use crate::ir::ValueType;

/// The local variables of one generated function.
///
/// Every construct that needs locals draws a fresh number from the scope, so that nested
/// constructs never share a variable or a construct label.
#[derive(Debug, Default)]
pub struct Scope {
    counter: usize,
    integers: Vec<String>,
    logicals: Vec<String>,
    /// Variables of other types, in order of creation
    others: Vec<(String, ValueType)>,
}

impl Scope {
    pub fn fresh(&mut self) -> usize {
        self.counter += 1;
        self.counter
    }

    pub fn integer(&mut self, prefix: &str, k: usize) -> String {
        let name = format!("{prefix}_{k}");
        self.integers.push(name.clone());
        name
    }

    pub fn logical(&mut self, prefix: &str, k: usize) -> String {
        let name = format!("{prefix}_{k}");
        self.logicals.push(name.clone());
        name
    }

    /// A variable receiving values of `ty` that are never read, shared by all calls in the function.
    pub fn scratch(&mut self, ty: &ValueType) -> String {
        if let Some((name, _)) =
            self.others.iter().find(|(name, other)| name.starts_with("scratch_") && other.same_as(ty))
        {
            return name.clone();
        }
        let name = format!("scratch_{}", self.fresh());
        self.others.push((name.clone(), ty.clone()));
        name
    }

    /// Declare a function-level variable with a fixed name, unless it exists already.
    pub fn declare(&mut self, name: &str, ty: &ValueType) {
        if !self.others.iter().any(|(other, _)| other == name) {
            self.others.push((name.to_owned(), ty.clone()));
        }
    }

    pub fn decls(&self) -> Vec<Decl> {
        let mut decls = Vec::new();
        if !self.integers.is_empty() {
            decls.push(Decl::new("integer", self.integers.clone()));
        }
        if !self.logicals.is_empty() {
            decls.push(Decl::new("logical", self.logicals.clone()));
        }
        decls.extend(self.others.iter().map(|(name, ty)| value_decl(ty, name)));
        decls
    }
}

/// The declaration of a local variable holding a value of `ty`.
pub fn value_decl(ty: &ValueType, name: &str) -> Decl {
    Decl::new(ty.type_spec(), vec![name.to_owned()])
}
