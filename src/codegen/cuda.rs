//! CUDA backend.
//!
//! Shader declarations become `__global__` kernels with a fixed parameter list
//! per stage; free functions become `__device__` functions. CUDA has no nested
//! functions and `__constant__` storage is only legal at file scope, so
//! function and `uniform` members of a shader are emitted ahead of its kernel.

use crate::parser::ast::{
    BinaryOp, Expr, ExprKind, FunctionDecl, LiteralKind, Program, Qualifier, ShaderDecl,
    ShaderKind, Stmt, Type, TypeKind, UnaryOp, VarDecl,
};
use crate::parser::visitor::Visitor;

use super::{Backend, Emitter};

#[derive(Debug, Default)]
pub struct CudaGenerator {
    out: Emitter,
}

impl CudaGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn kernel_params(kind: ShaderKind) -> &'static str {
        match kind {
            ShaderKind::Vertex => "float* vertices, float* output, int numVertices",
            ShaderKind::Fragment => "float* pixels, int width, int height",
            ShaderKind::Compute => "float* input, float* output, int width, int height",
        }
    }

    /// Writes `expr`, parenthesized only when it would otherwise bind looser
    /// than the surrounding operator.
    fn write_operand(&mut self, expr: &Expr, parent: BinaryOp, right: bool) {
        let needs_parens = match &expr.kind {
            ExprKind::Binary { op, .. } => {
                let (child, parent) = (op.precedence(), parent.precedence());
                child < parent || (right && child == parent)
            }
            _ => false,
        };
        self.write_grouped(expr, needs_parens);
    }

    fn write_grouped(&mut self, expr: &Expr, parens: bool) {
        if parens {
            self.out.write("(");
            expr.accept(self);
            self.out.write(")");
        } else {
            expr.accept(self);
        }
    }
}

fn is_operator(expr: &Expr) -> bool {
    matches!(expr.kind, ExprKind::Binary { .. } | ExprKind::Unary { .. })
}

fn hoisted(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Function(_) => true,
        Stmt::Variable(var) => var.qualifier == Qualifier::Uniform,
        _ => false,
    }
}

impl Backend for CudaGenerator {
    fn name(&self) -> &'static str {
        "cuda"
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
            TypeKind::Vec2 => "float2",
            TypeKind::Vec3 => "float3",
            TypeKind::Vec4 => "float4",
            TypeKind::Mat2 => "float2x2",
            TypeKind::Mat3 => "float3x3",
            TypeKind::Mat4 => "float4x4",
            TypeKind::Sampler2D | TypeKind::Sampler3D | TypeKind::SamplerCube => {
                "cudaTextureObject_t"
            }
            TypeKind::Struct => return ty.name.clone().unwrap_or_else(|| "unknown".to_string()),
            TypeKind::Array => "unknown",
        };
        name.to_string()
    }

    fn qualifier(&self, qualifier: Qualifier) -> &'static str {
        match qualifier {
            Qualifier::Uniform => "__constant__",
            Qualifier::Const => "const",
            Qualifier::None | Qualifier::In | Qualifier::Out => "",
        }
    }

    fn binary_operator(&self, op: BinaryOp) -> &'static str {
        op.symbol()
    }

    fn unary_operator(&self, op: UnaryOp) -> &'static str {
        op.symbol()
    }

    /// Vector constructors become the CUDA `make_floatN` helpers. Matrix
    /// constructors have no runtime counterpart and keep their name.
    fn builtin<'a>(&self, name: &'a str) -> &'a str {
        match name {
            "texture" => "tex2D",
            "vec2" => "make_float2",
            "vec3" => "make_float3",
            "vec4" => "make_float4",
            other => other,
        }
    }

    fn preamble(&mut self) {
        self.out.write_line("#include <cuda_runtime.h>");
        self.out.write_line("#include <device_launch_parameters.h>");
        self.out.write_line("");
    }

    fn postamble(&mut self) {}
}

impl Visitor for CudaGenerator {
    fn visit_program(&mut self, program: &Program) {
        for declaration in &program.declarations {
            declaration.accept(self);
        }
    }

    fn visit_shader(&mut self, shader: &ShaderDecl) {
        for member in shader.body.iter().filter(|stmt| hoisted(stmt)) {
            member.accept(self);
        }

        self.out
            .write_line(&format!("// CUDA Kernel: {}", shader.name));
        self.out.write_line(&format!(
            "__global__ void {}_kernel({}) {{",
            shader.name,
            Self::kernel_params(shader.kind)
        ));
        self.out.increase_indent();

        if shader.kind == ShaderKind::Compute {
            self.out.write_line("// Thread indexing");
            self.out
                .write_line("int idx = blockIdx.x * blockDim.x + threadIdx.x;");
            self.out
                .write_line("int idy = blockIdx.y * blockDim.y + threadIdx.y;");
            self.out.write_line("");
        }

        for statement in shader.body.iter().filter(|stmt| !hoisted(stmt)) {
            statement.accept(self);
        }

        self.out.decrease_indent();
        self.out.write_line("}");
        self.out.write_line("");
    }

    fn visit_function(&mut self, function: &FunctionDecl) {
        self.out.indent();
        self.out.write("__device__ ");
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
        self.write_operand(lhs, op, false);
        self.out.write(&format!(" {} ", symbol));
        self.write_operand(rhs, op, true);
    }

    fn visit_unary(&mut self, op: UnaryOp, operand: &Expr) {
        let symbol = self.unary_operator(op);
        self.out.write(symbol);
        self.write_grouped(operand, is_operator(operand));
    }

    fn visit_call(&mut self, name: &str, args: &[Expr]) {
        let name = self.builtin(name);
        self.out.write(name);
        self.write_args(args);
    }

    fn visit_member(&mut self, object: &Expr, member: &str) {
        self.write_grouped(object, is_operator(object));
        self.out.write(".");
        self.out.write(member);
    }

    fn visit_index(&mut self, object: &Expr, index: &Expr) {
        self.write_grouped(object, is_operator(object));
        self.out.write("[");
        index.accept(self);
        self.out.write("]");
    }
}
