//! Hooks for semantic analysis between parsing and code generation.
//!
//! The compiler ships without a resolver; code is generated straight from the
//! parsed tree unless one is installed with
//! [`Compiler::with_resolver`](crate::compiler::Compiler::with_resolver).

use std::collections::HashMap;

use thiserror::Error;

use crate::parser::ast::{Program, Type};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("semantic error: {message}")]
pub struct SemanticError {
    pub message: String,
}

impl SemanticError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A pass that checks (and may annotate) the tree before code generation.
/// Returning any errors aborts the compilation.
pub trait Resolver {
    fn resolve(&mut self, program: &mut Program) -> Vec<SemanticError>;
}

/// Lexically scoped name to type map. The global scope is never popped.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, Type>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            let _ = self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Binds `name` in the innermost scope. Returns `false` if that scope
    /// already had a binding for it; the new type replaces the old one.
    pub fn define(&mut self, name: impl Into<String>, ty: Type) -> bool {
        match self.scopes.last_mut() {
            Some(scope) => scope.insert(name.into(), ty).is_none(),
            None => false,
        }
    }

    /// Innermost binding of `name`, searching outward.
    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}
