//! Syntax tree produced by the parser and walked by the backends.
//!
//! Every node is owned by exactly one parent through `Box`/`Vec`, so the tree
//! has no sharing and no cycles. After parsing it is only read.

use super::visitor::Visitor;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level declarations in source order; backends emit in this order.
    pub declarations: Vec<Stmt>,
}

impl Program {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_program(self);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind {
    Vertex,
    Fragment,
    Compute,
}

impl ShaderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShaderKind::Vertex => "vertex",
            ShaderKind::Fragment => "fragment",
            ShaderKind::Compute => "compute",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShaderDecl {
    pub name: String,
    pub kind: ShaderKind,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: Option<Type>,
    pub params: Vec<VarDecl>,
    /// `None` for a prototype (`float f(float x);`).
    pub body: Option<Vec<Stmt>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Qualifier {
    #[default]
    None,
    In,
    Out,
    Uniform,
    Const,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub qualifier: Qualifier,
    pub ty: Type,
    pub name: String,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Void,
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
    Sampler2D,
    Sampler3D,
    SamplerCube,
    Struct,
    Array,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    pub kind: TypeKind,
    /// Struct name, only meaningful for [`TypeKind::Struct`].
    pub name: Option<String>,
    /// Element count; `None` means "not an array".
    pub array_size: Option<usize>,
}

impl Type {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            name: None,
            array_size: None,
        }
    }

    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_type(self);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Shader(ShaderDecl),
    Function(FunctionDecl),
    Variable(VarDecl),
    Block(Vec<Stmt>),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        update: Option<Box<Stmt>>,
        body: Box<Stmt>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    Return {
        value: Option<Expr>,
    },
    Expr(Expr),
    Assign {
        target: Expr,
        value: Expr,
    },
}

impl Stmt {
    /// Forwards to the visitor operation matching this variant.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Stmt::Shader(shader) => visitor.visit_shader(shader),
            Stmt::Function(function) => visitor.visit_function(function),
            Stmt::Variable(var) => visitor.visit_variable(var),
            Stmt::Block(statements) => visitor.visit_block(statements),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => visitor.visit_if(condition, then_branch, else_branch.as_deref()),
            Stmt::For {
                init,
                condition,
                update,
                body,
            } => visitor.visit_for(
                init.as_deref(),
                condition.as_ref(),
                update.as_deref(),
                body,
            ),
            Stmt::While { condition, body } => visitor.visit_while(condition, body),
            Stmt::Return { value } => visitor.visit_return(value.as_ref()),
            Stmt::Expr(expr) => visitor.visit_expression_statement(expr),
            Stmt::Assign { target, value } => visitor.visit_assignment(target, value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    /// Filled in by a semantic pass when one runs; the parser leaves it unset.
    pub result_type: Option<Type>,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            result_type: None,
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Identifier(name.into()))
    }

    pub fn literal(kind: LiteralKind, value: impl Into<String>) -> Self {
        Self::new(ExprKind::Literal {
            kind,
            value: value.into(),
        })
    }

    pub fn binary(lhs: Expr, op: BinaryOp, rhs: Expr) -> Self {
        Self::new(ExprKind::Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        })
    }

    /// Identifiers, member accesses and index expressions may appear on the
    /// left of `=`.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Identifier(_) | ExprKind::Member { .. } | ExprKind::Index { .. }
        )
    }

    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match &self.kind {
            ExprKind::Identifier(name) => visitor.visit_identifier(name),
            ExprKind::Literal { kind, value } => visitor.visit_literal(*kind, value),
            ExprKind::Binary { lhs, op, rhs } => visitor.visit_binary(lhs, *op, rhs),
            ExprKind::Unary { op, operand } => visitor.visit_unary(*op, operand),
            ExprKind::Call { name, args } => visitor.visit_call(name, args),
            ExprKind::Member { object, member } => visitor.visit_member(object, member),
            ExprKind::Index { object, index } => visitor.visit_index(object, index),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Identifier(String),
    Literal {
        kind: LiteralKind,
        /// Raw source text; string literals exclude the quotes.
        value: String,
    },
    Binary {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    Member {
        object: Box<Expr>,
        member: String,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Float,
    Bool,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOp {
    /// Binding strength, loosest first. Mirrors the parser's call chain.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Equal | BinaryOp::NotEqual => 3,
            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => 4,
            BinaryOp::Add | BinaryOp::Subtract => 5,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => 6,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
        }
    }
}
