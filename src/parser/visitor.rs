//! One operation per node variant. Nodes dispatch through `accept`, so a new
//! traversal implements this trait and a new node variant fails to compile
//! until every traversal handles it.

use super::ast::{
    BinaryOp, Expr, FunctionDecl, LiteralKind, Program, ShaderDecl, Stmt, Type, UnaryOp, VarDecl,
};

pub trait Visitor {
    fn visit_program(&mut self, program: &Program);
    fn visit_shader(&mut self, shader: &ShaderDecl);
    fn visit_function(&mut self, function: &FunctionDecl);
    fn visit_variable(&mut self, var: &VarDecl);
    fn visit_type(&mut self, ty: &Type);

    fn visit_block(&mut self, statements: &[Stmt]);
    fn visit_if(&mut self, condition: &Expr, then_branch: &Stmt, else_branch: Option<&Stmt>);
    fn visit_for(
        &mut self,
        init: Option<&Stmt>,
        condition: Option<&Expr>,
        update: Option<&Stmt>,
        body: &Stmt,
    );
    fn visit_while(&mut self, condition: &Expr, body: &Stmt);
    fn visit_return(&mut self, value: Option<&Expr>);
    fn visit_expression_statement(&mut self, expr: &Expr);
    fn visit_assignment(&mut self, target: &Expr, value: &Expr);

    fn visit_identifier(&mut self, name: &str);
    fn visit_literal(&mut self, kind: LiteralKind, value: &str);
    fn visit_binary(&mut self, lhs: &Expr, op: BinaryOp, rhs: &Expr);
    fn visit_unary(&mut self, op: UnaryOp, operand: &Expr);
    fn visit_call(&mut self, name: &str, args: &[Expr]);
    fn visit_member(&mut self, object: &Expr, member: &str);
    fn visit_index(&mut self, object: &Expr, index: &Expr);
}
