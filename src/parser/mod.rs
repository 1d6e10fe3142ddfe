pub mod ast;
mod expr;
pub mod visitor;

use thiserror::Error;
use tracing::debug;

use crate::lexer::token::{Token, TokenKind};
use ast::{FunctionDecl, Program, Qualifier, ShaderDecl, ShaderKind, Stmt, Type, TypeKind, VarDecl};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, token: &Token) -> Self {
        Self {
            message: message.into(),
            line: token.line,
            column: token.column,
        }
    }
}

/// Result of parsing a whole source: every declaration that parsed, plus one
/// error per top-level declaration that had to be skipped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseOutcome {
    pub program: Program,
    pub errors: Vec<ParseError>,
}

impl ParseOutcome {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parses `source` end to end, recovering at top-level declarations.
pub fn parse(source: &str) -> ParseOutcome {
    Parser::new(crate::lexer::tokenize(source)).parse()
}

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EndOfFile) {
            let (line, column) = tokens
                .last()
                .map(|token| (token.line, token.column))
                .unwrap_or((1, 1));
            tokens.push(Token::new(TokenKind::EndOfFile, String::new(), line, column));
        }
        Self { tokens, current: 0 }
    }

    /// Parses declarations until end of input. A failure anywhere inside a
    /// top-level declaration abandons that declaration only: the error is
    /// recorded and parsing resumes after [`Parser::synchronize`].
    pub fn parse(&mut self) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();

        while !self.is_at_end() {
            match self.declaration() {
                Ok(declaration) => outcome.program.declarations.push(declaration),
                Err(err) => {
                    debug!(%err, "recovering from parse error");
                    outcome.errors.push(err);
                    self.synchronize();
                }
            }
        }

        outcome
    }

    /// All-or-nothing variant of [`Parser::parse`].
    pub fn parse_program(&mut self) -> Result<Program, Vec<ParseError>> {
        let outcome = self.parse();
        if outcome.errors.is_empty() {
            Ok(outcome.program)
        } else {
            Err(outcome.errors)
        }
    }

    /// Panic-mode recovery. Always steps over at least one token, then stops
    /// right after a `;` or in front of a token that can start a new construct.
    pub fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }

            match self.peek_kind() {
                TokenKind::Shader
                | TokenKind::If
                | TokenKind::For
                | TokenKind::While
                | TokenKind::Return => return,
                _ => {}
            }

            self.advance();
        }
    }

    /// Index of the next unconsumed token.
    pub fn position(&self) -> usize {
        self.current
    }

    fn declaration(&mut self) -> Result<Stmt, ParseError> {
        if self.matches(TokenKind::Shader) {
            return self.shader_declaration();
        }

        if self.peek_kind().is_qualifier() || self.peek_kind().is_type() {
            return self.typed_declaration();
        }

        self.statement()
    }

    fn shader_declaration(&mut self) -> Result<Stmt, ParseError> {
        let name = self.consume_identifier("Expected shader name")?;
        self.consume(TokenKind::Colon, "Expected ':' after shader name")?;
        let kind = self.shader_kind()?;
        self.consume(TokenKind::LeftBrace, "Expected '{' to begin shader body")?;

        let mut body = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            body.push(self.shader_member()?);
        }
        self.consume(TokenKind::RightBrace, "Expected '}' to end shader body")?;

        Ok(Stmt::Shader(ShaderDecl { name, kind, body }))
    }

    fn shader_member(&mut self) -> Result<Stmt, ParseError> {
        let declares = self.peek_kind().is_type()
            && self.peek_kind_at(1) == Some(TokenKind::Identifier);
        if self.peek_kind().is_qualifier() || declares {
            return self.typed_declaration();
        }
        self.statement()
    }

    fn shader_kind(&mut self) -> Result<ShaderKind, ParseError> {
        let kind = match self.peek_kind() {
            TokenKind::Vertex => ShaderKind::Vertex,
            TokenKind::Fragment => ShaderKind::Fragment,
            TokenKind::Compute => ShaderKind::Compute,
            _ => {
                return Err(ParseError::new(
                    "Expected shader type (vertex, fragment, or compute)",
                    self.peek(),
                ))
            }
        };
        self.advance();
        Ok(kind)
    }

    /// `qualifier? type name` followed by `(` for a function, anything else
    /// for a variable.
    fn typed_declaration(&mut self) -> Result<Stmt, ParseError> {
        let qualifier = self.qualifier();
        let ty = self.parse_type()?;

        if !self.check(TokenKind::Identifier) {
            return Err(ParseError::new("Expected identifier after type", self.peek()));
        }
        let name = self.consume_identifier("Expected identifier")?;

        if self.check(TokenKind::LeftParen) {
            return self.function_rest(ty, name);
        }

        let var = self.variable_rest(qualifier, ty, name)?;
        self.consume(TokenKind::Semicolon, "Expected ';' after variable declaration")?;
        Ok(Stmt::Variable(var))
    }

    fn function_rest(&mut self, return_type: Type, name: String) -> Result<Stmt, ParseError> {
        self.consume(TokenKind::LeftParen, "Expected '('")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let qualifier = self.qualifier();
                let ty = self.parse_type()?;
                let param_name = self.consume_identifier("Expected parameter name")?;
                params.push(VarDecl {
                    qualifier,
                    ty,
                    name: param_name,
                    initializer: None,
                });

                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expected ')'")?;

        let body = if self.matches(TokenKind::LeftBrace) {
            Some(self.block_statements()?)
        } else {
            self.consume(TokenKind::Semicolon, "Expected ';' after function declaration")?;
            None
        };

        Ok(Stmt::Function(FunctionDecl {
            name,
            return_type: Some(return_type),
            params,
            body,
        }))
    }

    /// Parses `[N]? (= expr)?` after a declared name. The terminating `;`
    /// is left to the caller because `for` headers have none.
    fn variable_rest(
        &mut self,
        qualifier: Qualifier,
        mut ty: Type,
        name: String,
    ) -> Result<VarDecl, ParseError> {
        if self.matches(TokenKind::LeftBracket) {
            let lexeme = self
                .consume(TokenKind::IntegerLiteral, "Expected array size")?
                .lexeme
                .clone();
            let size = lexeme
                .parse::<usize>()
                .map_err(|_| ParseError::new("Invalid array size", self.previous()))?;
            self.consume(TokenKind::RightBracket, "Expected ']' after array size")?;
            ty.array_size = Some(size);
        }

        let initializer = if self.matches(TokenKind::Assign) {
            Some(self.expression()?)
        } else {
            None
        };

        Ok(VarDecl {
            qualifier,
            ty,
            name,
            initializer,
        })
    }

    fn local_declaration(&mut self) -> Result<VarDecl, ParseError> {
        let qualifier = self.qualifier();
        let ty = self.parse_type()?;
        let name = self.consume_identifier("Expected variable name")?;
        self.variable_rest(qualifier, ty, name)
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        if self.matches(TokenKind::LeftBrace) {
            return Ok(Stmt::Block(self.block_statements()?));
        }

        if self.matches(TokenKind::If) {
            return self.if_statement();
        }

        if self.matches(TokenKind::For) {
            return self.for_statement();
        }

        if self.matches(TokenKind::While) {
            return self.while_statement();
        }

        if self.matches(TokenKind::Return) {
            return self.return_statement();
        }

        if self.starts_local_declaration() {
            let var = self.local_declaration()?;
            self.consume(TokenKind::Semicolon, "Expected ';' after variable declaration")?;
            return Ok(Stmt::Variable(var));
        }

        if self.check(TokenKind::Identifier) && self.peek_kind_at(1) == Some(TokenKind::Assign) {
            let name = self.consume_identifier("Expected identifier")?;
            self.consume(TokenKind::Assign, "Expected '='")?;
            let value = self.expression()?;
            self.consume(TokenKind::Semicolon, "Expected ';' after assignment")?;
            return Ok(Stmt::Assign {
                target: ast::Expr::identifier(name),
                value,
            });
        }

        let statement = self.simple_statement()?;
        let message = if matches!(statement, Stmt::Assign { .. }) {
            "Expected ';' after assignment"
        } else {
            "Expected ';' after expression"
        };
        self.consume(TokenKind::Semicolon, message)?;
        Ok(statement)
    }

    /// A type keyword starts a local variable only when it is followed by a
    /// name that is not itself called. `vec3(...)` stays a constructor
    /// expression and `vec3 g(...)` is not a declaration.
    fn starts_local_declaration(&mut self) -> bool {
        if self.check(TokenKind::Const) {
            return true;
        }
        if !self.peek_kind().is_type() {
            return false;
        }

        let checkpoint = self.current;
        self.advance();
        let is_declaration = self.check(TokenKind::Identifier)
            && self.peek_kind_at(1) != Some(TokenKind::LeftParen);
        self.current = checkpoint;
        is_declaration
    }

    /// Expression or assignment without the trailing `;`.
    fn simple_statement(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.expression()?;

        if self.matches(TokenKind::Assign) {
            if !expr.is_assignable() {
                return Err(ParseError::new("Invalid assignment target", self.previous()));
            }
            let value = self.expression()?;
            return Ok(Stmt::Assign {
                target: expr,
                value,
            });
        }

        Ok(Stmt::Expr(expr))
    }

    fn block_statements(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut body = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            body.push(self.statement()?);
        }
        self.consume(TokenKind::RightBrace, "Expected '}'")?;
        Ok(body)
    }

    fn if_statement(&mut self) -> Result<Stmt, ParseError> {
        self.consume(TokenKind::LeftParen, "Expected '(' after 'if'")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after if condition")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.matches(TokenKind::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn for_statement(&mut self) -> Result<Stmt, ParseError> {
        self.consume(TokenKind::LeftParen, "Expected '(' after 'for'")?;

        let init = if self.check(TokenKind::Semicolon) {
            None
        } else if self.starts_local_declaration() {
            Some(Box::new(Stmt::Variable(self.local_declaration()?)))
        } else {
            Some(Box::new(self.simple_statement()?))
        };
        self.consume(TokenKind::Semicolon, "Expected ';' after for init")?;

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::Semicolon, "Expected ';' after for condition")?;

        let update = if self.check(TokenKind::RightParen) {
            None
        } else {
            Some(Box::new(self.simple_statement()?))
        };
        self.consume(TokenKind::RightParen, "Expected ')' after for clauses")?;

        let body = Box::new(self.statement()?);

        Ok(Stmt::For {
            init,
            condition,
            update,
            body,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt, ParseError> {
        self.consume(TokenKind::LeftParen, "Expected '(' after 'while'")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after while condition")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While { condition, body })
    }

    fn return_statement(&mut self) -> Result<Stmt, ParseError> {
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::Semicolon, "Expected ';' after return statement")?;
        Ok(Stmt::Return { value })
    }

    fn qualifier(&mut self) -> Qualifier {
        let qualifier = match self.peek_kind() {
            TokenKind::In => Qualifier::In,
            TokenKind::Out => Qualifier::Out,
            TokenKind::Uniform => Qualifier::Uniform,
            TokenKind::Const => Qualifier::Const,
            _ => return Qualifier::None,
        };
        self.advance();
        qualifier
    }

    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let kind = match self.peek_kind() {
            TokenKind::Void => TypeKind::Void,
            TokenKind::Bool => TypeKind::Bool,
            TokenKind::Int => TypeKind::Int,
            TokenKind::Float => TypeKind::Float,
            TokenKind::Vec2 => TypeKind::Vec2,
            TokenKind::Vec3 => TypeKind::Vec3,
            TokenKind::Vec4 => TypeKind::Vec4,
            TokenKind::Mat2 => TypeKind::Mat2,
            TokenKind::Mat3 => TypeKind::Mat3,
            TokenKind::Mat4 => TypeKind::Mat4,
            TokenKind::Sampler2D => TypeKind::Sampler2D,
            TokenKind::Sampler3D => TypeKind::Sampler3D,
            TokenKind::SamplerCube => TypeKind::SamplerCube,
            _ => return Err(ParseError::new("Expected type", self.peek())),
        };
        self.advance();
        Ok(Type::new(kind))
    }

    pub(crate) fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn consume(&mut self, kind: TokenKind, message: &str) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::new(message, self.peek()))
        }
    }

    pub(crate) fn consume_identifier(&mut self, message: &str) -> Result<String, ParseError> {
        self.consume(TokenKind::Identifier, message)
            .map(|token| token.lexeme.clone())
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.peek_kind() == kind
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek_kind() == TokenKind::EndOfFile
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn peek_kind_at(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.current + offset).map(|token| token.kind)
    }

    /// The most recently consumed token, or the first token when nothing has
    /// been consumed yet.
    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }
}
