//! Code generation backends
//!
//! Every backend is a [`Visitor`] over the same read-only [`Program`]:
//! - GLSL (`#version 330 core` source)
//! - CUDA (`__global__` kernels and `__device__` functions)
//!
//! [`Backend::generate`] drives one full traversal: preamble, program,
//! postamble. Backends keep all mutable state in their own [`Emitter`], so one
//! tree can be walked by any number of backends in turn.

pub mod cuda;
pub mod glsl;

use crate::parser::ast::{
    BinaryOp, Expr, ExprKind, Program, Qualifier, Stmt, Type, UnaryOp, VarDecl,
};
use crate::parser::visitor::Visitor;

pub use cuda::CudaGenerator;
pub use glsl::GlslGenerator;

const INDENT: &str = "    ";

/// Indentation-aware, append-only output buffer.
#[derive(Debug, Default)]
pub struct Emitter {
    buffer: String,
    indent_level: usize,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.indent_level = 0;
    }

    /// Writes the current indentation.
    pub fn indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(INDENT);
        }
    }

    pub fn write(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn write_line(&mut self, line: &str) {
        if !line.is_empty() {
            self.indent();
        }
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    pub fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Hands out the buffer and leaves the emitter empty.
    pub fn finish(&mut self) -> String {
        self.indent_level = 0;
        std::mem::take(&mut self.buffer)
    }
}

/// Target-specific half of code generation. Implementors provide the lexical
/// mappings and the preamble/postamble; the traversal itself comes from their
/// [`Visitor`] implementation.
pub trait Backend: Visitor {
    fn name(&self) -> &'static str;

    fn emitter(&mut self) -> &mut Emitter;

    fn type_name(&self, ty: &Type) -> String;

    /// Storage qualifier text; empty when the target has no equivalent.
    fn qualifier(&self, qualifier: Qualifier) -> &'static str;

    fn binary_operator(&self, op: BinaryOp) -> &'static str;

    fn unary_operator(&self, op: UnaryOp) -> &'static str;

    /// Maps a called function name to the target's builtin.
    fn builtin<'a>(&self, name: &'a str) -> &'a str {
        name
    }

    fn preamble(&mut self);

    fn postamble(&mut self);

    fn generate(&mut self, program: &Program) -> String {
        self.emitter().clear();
        self.preamble();
        program.accept(self);
        self.postamble();
        self.emitter().finish()
    }

    /// `qualifier type name[N] = init` with no indentation or terminator.
    fn write_declarator(&mut self, var: &VarDecl) {
        let qualifier = self.qualifier(var.qualifier);
        if !qualifier.is_empty() {
            self.emitter().write(qualifier);
            self.emitter().write(" ");
        }

        var.ty.accept(self);
        self.emitter().write(" ");
        self.emitter().write(&var.name);

        if let Some(size) = var.ty.array_size {
            self.emitter().write(&format!("[{}]", size));
        }

        if let Some(initializer) = &var.initializer {
            self.emitter().write(" = ");
            initializer.accept(self);
        }
    }

    fn write_params(&mut self, params: &[VarDecl]) {
        self.emitter().write("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.emitter().write(", ");
            }
            self.write_declarator(param);
        }
        self.emitter().write(")");
    }

    fn write_args(&mut self, args: &[Expr]) {
        self.emitter().write("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.emitter().write(", ");
            }
            arg.accept(self);
        }
        self.emitter().write(")");
    }

    /// A statement used inside a `for (...)` header: no indentation and no
    /// trailing semicolon.
    fn write_inline(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Variable(var) => self.write_declarator(var),
            Stmt::Assign { target, value } => {
                target.accept(self);
                self.emitter().write(" = ");
                value.accept(self);
            }
            Stmt::Expr(expr) => expr.accept(self),
            other => {
                tracing::warn!(
                    backend = self.name(),
                    ?other,
                    "statement not allowed in for header"
                );
            }
        }
    }

    /// Emits the body of a braced construct. A block body is flattened into
    /// the surrounding braces instead of getting a second pair.
    fn write_body(&mut self, body: &Stmt) {
        self.emitter().increase_indent();
        match body {
            Stmt::Block(statements) => {
                for statement in statements {
                    statement.accept(self);
                }
            }
            other => other.accept(self),
        }
        self.emitter().decrease_indent();
    }

    /// `if (...) { ... } else { ... }`, shared by every C-like target.
    fn write_if(&mut self, condition: &Expr, then_branch: &Stmt, else_branch: Option<&Stmt>) {
        self.emitter().indent();
        self.emitter().write("if (");
        condition.accept(self);
        self.emitter().write(") {\n");
        self.write_body(then_branch);
        if let Some(else_branch) = else_branch {
            self.emitter().write_line("} else {");
            self.write_body(else_branch);
        }
        self.emitter().write_line("}");
    }

    fn write_return(&mut self, value: Option<&Expr>) {
        self.emitter().indent();
        self.emitter().write("return");
        if let Some(value) = value {
            self.emitter().write(" ");
            value.accept(self);
        }
        self.emitter().write(";\n");
    }

    fn write_unary(&mut self, op: UnaryOp, operand: &Expr) {
        let symbol = self.unary_operator(op);
        self.emitter().write(symbol);
        // `- -x` must not collapse into a decrement.
        if matches!(operand.kind, ExprKind::Unary { .. }) {
            self.emitter().write("(");
            operand.accept(self);
            self.emitter().write(")");
        } else {
            operand.accept(self);
        }
    }
}
