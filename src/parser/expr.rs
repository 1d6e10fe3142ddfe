use crate::lexer::token::TokenKind;

use super::ast::{BinaryOp, Expr, ExprKind, LiteralKind, UnaryOp};
use super::{ParseError, Parser};

impl Parser {
    pub(crate) fn expression(&mut self) -> Result<Expr, ParseError> {
        self.logical_or()
    }

    fn logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.logical_and()?;

        while self.matches(TokenKind::OrOr) {
            let rhs = self.logical_and()?;
            expr = Expr::binary(expr, BinaryOp::Or, rhs);
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.equality()?;

        while self.matches(TokenKind::AndAnd) {
            let rhs = self.equality()?;
            expr = Expr::binary(expr, BinaryOp::And, rhs);
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.comparison()?;

        loop {
            let op = if self.matches(TokenKind::EqualEqual) {
                Some(BinaryOp::Equal)
            } else if self.matches(TokenKind::BangEqual) {
                Some(BinaryOp::NotEqual)
            } else {
                None
            };

            let Some(op) = op else { break };
            let rhs = self.comparison()?;
            expr = Expr::binary(expr, op, rhs);
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.term()?;

        loop {
            let op = if self.matches(TokenKind::Less) {
                Some(BinaryOp::Less)
            } else if self.matches(TokenKind::LessEqual) {
                Some(BinaryOp::LessEqual)
            } else if self.matches(TokenKind::Greater) {
                Some(BinaryOp::Greater)
            } else if self.matches(TokenKind::GreaterEqual) {
                Some(BinaryOp::GreaterEqual)
            } else {
                None
            };

            let Some(op) = op else { break };
            let rhs = self.term()?;
            expr = Expr::binary(expr, op, rhs);
        }

        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.factor()?;

        loop {
            let op = if self.matches(TokenKind::Plus) {
                Some(BinaryOp::Add)
            } else if self.matches(TokenKind::Minus) {
                Some(BinaryOp::Subtract)
            } else {
                None
            };

            let Some(op) = op else { break };
            let rhs = self.factor()?;
            expr = Expr::binary(expr, op, rhs);
        }

        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.unary()?;

        loop {
            let op = if self.matches(TokenKind::Star) {
                Some(BinaryOp::Multiply)
            } else if self.matches(TokenKind::Slash) {
                Some(BinaryOp::Divide)
            } else if self.matches(TokenKind::Percent) {
                Some(BinaryOp::Modulo)
            } else {
                None
            };

            let Some(op) = op else { break };
            let rhs = self.unary()?;
            expr = Expr::binary(expr, op, rhs);
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = if self.matches(TokenKind::Bang) {
            UnaryOp::Not
        } else if self.matches(TokenKind::Minus) {
            UnaryOp::Negate
        } else {
            return self.postfix();
        };

        let operand = self.unary()?;
        Ok(Expr::new(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        }))
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;

        loop {
            if self.matches(TokenKind::Dot) {
                let member = self.consume_identifier("Expected property name after '.'")?;
                expr = Expr::new(ExprKind::Member {
                    object: Box::new(expr),
                    member,
                });
                continue;
            }

            if self.check(TokenKind::LeftParen) {
                let ExprKind::Identifier(name) = expr.kind else {
                    return Err(ParseError::new(
                        "Expected function name before '('",
                        self.peek(),
                    ));
                };
                self.advance();

                let mut args = Vec::new();
                if !self.check(TokenKind::RightParen) {
                    loop {
                        args.push(self.expression()?);
                        if !self.matches(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.consume(
                    TokenKind::RightParen,
                    "Expected ')' after function arguments",
                )?;
                expr = Expr::new(ExprKind::Call { name, args });
                continue;
            }

            if self.matches(TokenKind::LeftBracket) {
                let index = self.expression()?;
                self.consume(TokenKind::RightBracket, "Expected ']' after array index")?;
                expr = Expr::new(ExprKind::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                });
                continue;
            }

            break;
        }

        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let literal = match self.peek_kind() {
            TokenKind::IntegerLiteral => Some(LiteralKind::Int),
            TokenKind::FloatLiteral => Some(LiteralKind::Float),
            TokenKind::StringLiteral => Some(LiteralKind::String),
            TokenKind::True | TokenKind::False => Some(LiteralKind::Bool),
            _ => None,
        };
        if let Some(kind) = literal {
            let value = self.advance().lexeme.clone();
            return Ok(Expr::literal(kind, value));
        }

        match self.peek_kind() {
            // Type names double as constructor calls: `vec3(1.0)`.
            TokenKind::Identifier
            | TokenKind::Vec2
            | TokenKind::Vec3
            | TokenKind::Vec4
            | TokenKind::Mat2
            | TokenKind::Mat3
            | TokenKind::Mat4
            | TokenKind::Bool
            | TokenKind::Int
            | TokenKind::Float => {
                let name = self.advance().lexeme.clone();
                Ok(Expr::identifier(name))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(TokenKind::RightParen, "Expected ')' after expression")?;
                Ok(expr)
            }
            _ => Err(ParseError::new("Expected expression", self.peek())),
        }
    }
}
