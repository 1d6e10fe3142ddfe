//! GLSL backend.
//!
//! Emits `#version 330 core` source. Binary expressions are always wrapped in
//! parentheses so the grouping survives re-parsing by the driver's compiler.
//! A shader declaration only becomes a comment followed by its body; nothing
//! distinguishes a vertex entry point from a fragment one in the output.

use crate::parser::ast::{
    BinaryOp, Expr, FunctionDecl, LiteralKind, Program, Qualifier, ShaderDecl, Stmt, Type,
    TypeKind, UnaryOp, VarDecl,
};
use crate::parser::visitor::Visitor;

use super::{Backend, Emitter};

#[derive(Debug, Default)]
pub struct GlslGenerator {
    out: Emitter,
}

impl GlslGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for GlslGenerator {
    fn name(&self) -> &'static str {
        "glsl"
    }

    fn emitter(&mut self) -> &mut Emitter {
        &mut self.out
    }

    fn type_name(&self, ty: &Type) -> String {
        let name = match ty.kind {
            TypeKind::Void => "void",
            TypeKind::Bool => "bool",
            TypeKind::Int => "int",
            TypeKind::Float => "float",
            TypeKind::Vec2 => "vec2",
            TypeKind::Vec3 => "vec3",
            TypeKind::Vec4 => "vec4",
            TypeKind::Mat2 => "mat2",
            TypeKind::Mat3 => "mat3",
            TypeKind::Mat4 => "mat4",
            TypeKind::Sampler2D => "sampler2D",
            TypeKind::Sampler3D => "sampler3D",
            TypeKind::SamplerCube => "samplerCube",
            TypeKind::Struct => return ty.name.clone().unwrap_or_else(|| "unknown".to_string()),
            TypeKind::Array => "unknown",
        };
        name.to_string()
    }

    fn qualifier(&self, qualifier: Qualifier) -> &'static str {
        match qualifier {
            Qualifier::None => "",
            Qualifier::In => "in",
            Qualifier::Out => "out",
            Qualifier::Uniform => "uniform",
            Qualifier::Const => "const",
        }
    }

    fn binary_operator(&self, op: BinaryOp) -> &'static str {
        op.symbol()
    }

    fn unary_operator(&self, op: UnaryOp) -> &'static str {
        op.symbol()
    }

    fn preamble(&mut self) {
        self.out.write_line("#version 330 core");
        self.out.write_line("");
    }

    fn postamble(&mut self) {}
}

impl Visitor for GlslGenerator {
    fn visit_program(&mut self, program: &Program) {
        for declaration in &program.declarations {
            declaration.accept(self);
        }
    }

    fn visit_shader(&mut self, shader: &ShaderDecl) {
        self.out.write_line(&format!("// Shader: {}", shader.name));
        for statement in &shader.body {
            statement.accept(self);
        }
    }

    fn visit_function(&mut self, function: &FunctionDecl) {
        self.out.indent();
        match &function.return_type {
            Some(ty) => ty.accept(self),
            None => self.out.write("void"),
        }
        self.out.write(" ");
        self.out.write(&function.name);
        self.write_params(&function.params);

        let Some(body) = &function.body else {
            self.out.write(";\n");
            return;
        };

        self.out.write(" {\n");
        self.out.increase_indent();
        for statement in body {
            statement.accept(self);
        }
        self.out.decrease_indent();
        self.out.write_line("}");
        self.out.write_line("");
    }

    fn visit_variable(&mut self, var: &VarDecl) {
        self.out.indent();
        self.write_declarator(var);
        self.out.write(";\n");
    }

    fn visit_type(&mut self, ty: &Type) {
        let name = self.type_name(ty);
        self.out.write(&name);
    }

    fn visit_block(&mut self, statements: &[Stmt]) {
        self.out.write_line("{");
        self.out.increase_indent();
        for statement in statements {
            statement.accept(self);
        }
        self.out.decrease_indent();
        self.out.write_line("}");
    }

    fn visit_if(&mut self, condition: &Expr, then_branch: &Stmt, else_branch: Option<&Stmt>) {
        self.write_if(condition, then_branch, else_branch);
    }

    fn visit_for(
        &mut self,
        init: Option<&Stmt>,
        condition: Option<&Expr>,
        update: Option<&Stmt>,
        body: &Stmt,
    ) {
        self.out.indent();
        self.out.write("for (");
        if let Some(init) = init {
            self.write_inline(init);
        }
        self.out.write("; ");
        if let Some(condition) = condition {
            condition.accept(self);
        }
        self.out.write("; ");
        if let Some(update) = update {
            self.write_inline(update);
        }
        self.out.write(") {\n");
        self.write_body(body);
        self.out.write_line("}");
    }

    fn visit_while(&mut self, condition: &Expr, body: &Stmt) {
        self.out.indent();
        self.out.write("while (");
        condition.accept(self);
        self.out.write(") {\n");
        self.write_body(body);
        self.out.write_line("}");
    }

    fn visit_return(&mut self, value: Option<&Expr>) {
        self.write_return(value);
    }

    fn visit_expression_statement(&mut self, expr: &Expr) {
        self.out.indent();
        expr.accept(self);
        self.out.write(";\n");
    }

    fn visit_assignment(&mut self, target: &Expr, value: &Expr) {
        self.out.indent();
        target.accept(self);
        self.out.write(" = ");
        value.accept(self);
        self.out.write(";\n");
    }

    fn visit_identifier(&mut self, name: &str) {
        self.out.write(name);
    }

    fn visit_literal(&mut self, kind: LiteralKind, value: &str) {
        if kind == LiteralKind::String {
            self.out.write(&format!("\"{}\"", value));
        } else {
            self.out.write(value);
        }
    }

    fn visit_binary(&mut self, lhs: &Expr, op: BinaryOp, rhs: &Expr) {
        let symbol = self.binary_operator(op);
        self.out.write("(");
        lhs.accept(self);
        self.out.write(&format!(" {} ", symbol));
        rhs.accept(self);
        self.out.write(")");
    }

    fn visit_unary(&mut self, op: UnaryOp, operand: &Expr) {
        self.write_unary(op, operand);
    }

    fn visit_call(&mut self, name: &str, args: &[Expr]) {
        let name = self.builtin(name);
        self.out.write(name);
        self.write_args(args);
    }

    fn visit_member(&mut self, object: &Expr, member: &str) {
        object.accept(self);
        self.out.write(".");
        self.out.write(member);
    }

    fn visit_index(&mut self, object: &Expr, index: &Expr) {
        object.accept(self);
        self.out.write("[");
        index.accept(self);
        self.out.write("]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn emit(source: &str) -> String {
        let outcome = parse(source);
        assert!(outcome.is_ok(), "parse errors: {:?}", outcome.errors);
        GlslGenerator::new().generate(&outcome.program)
    }

    #[test]
    fn empty_program_is_only_the_version_directive() {
        assert_eq!(emit(""), "#version 330 core\n\n");
    }

    #[test]
    fn function_body_is_indented() {
        let out = emit("float twice(float x) { return x * 2.0; }");
        assert!(out.contains("float twice(float x) {\n    return (x * 2.0);\n}\n"));
    }

    #[test]
    fn prototype_ends_with_semicolon() {
        let out = emit("vec3 shade(vec3 n);");
        assert!(out.contains("vec3 shade(vec3 n);\n"));
    }
}
