use std::fmt::{Display, Formatter};
use std::rc::Rc;
use crate::interpreter::lexer::{Token, TokenType};
use crate::util;

/// Access to the token a node was parsed from.
pub trait TokenNode {
    fn token(&self) -> &Token;

    fn token_literal(&self) -> &str {
        self.token().literal()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn token_literal(&self) -> &str {
        self.statements.first().map(|stmt| stmt.token_literal()).unwrap_or("")
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&util::join(&self.statements, "; "))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub name: String,
}

impl Identifier {
    pub fn new(token: Token) -> Identifier {
        let name = token.literal().to_owned();
        Identifier { token, name }
    }
}

impl TokenNode for Identifier {
    fn token(&self) -> &Token { &self.token }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlockStatement {
    /// The opening `{`
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl TokenNode for BlockStatement {
    fn token(&self) -> &Token { &self.token }
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.statements.is_empty() {
            f.write_str("{ }")
        } else {
            write!(f, "{{ {} }}", util::join(&self.statements, "; "))
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionLiteral {
    /// The `fn` keyword
    pub token: Token,
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "fn({}) {}", util::join(&self.parameters, ", "), self.body)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Let {
        token: Token,
        name: Identifier,
        value: Expression,
    },
    Return {
        token: Token,
        value: Expression,
    },
    Expression {
        token: Token,
        value: Expression,
    },
    Block(BlockStatement),

    /// A statement the parser could not make sense of.
    Error {
        token: Token,
    },
}

impl TokenNode for Statement {
    fn token(&self) -> &Token {
        match self {
            Statement::Let { token, .. } => token,
            Statement::Return { token, .. } => token,
            Statement::Expression { token, .. } => token,
            Statement::Block(block) => &block.token,
            Statement::Error { token } => token,
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Let { name, value, .. } => write!(f, "let {} = {}", name, value),
            Statement::Return { value, .. } => write!(f, "return {}", value),
            Statement::Expression { value, .. } => write!(f, "{}", value),
            Statement::Block(block) => write!(f, "{}", block),
            Statement::Error { token } => write!(f, "<error at {}>", token),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Integer {
        token: Token,
        value: i64,
    },
    Boolean {
        token: Token,
        value: bool,
    },

    Prefix {
        operator: Token,
        operand: Box<Expression>,
    },
    Infix {
        left: Box<Expression>,
        operator: Token,
        right: Box<Expression>,
    },
    If {
        token: Token,
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    Function(Rc<FunctionLiteral>),
    Call {
        /// The `(` opening the argument list
        token: Token,
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },

    /// Placeholder for an expression that failed to parse.
    Error {
        token: Token,
        expected: Option<TokenType>,
        message: Option<String>,
    },
}

impl TokenNode for Expression {
    fn token(&self) -> &Token {
        match self {
            Expression::Identifier(identifier) => &identifier.token,
            Expression::Integer { token, .. } => token,
            Expression::Boolean { token, .. } => token,
            Expression::Prefix { operator, .. } => operator,
            Expression::Infix { operator, .. } => operator,
            Expression::If { token, .. } => token,
            Expression::Function(function) => &function.token,
            Expression::Call { token, .. } => token,
            Expression::Error { token, .. } => token,
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Identifier(identifier) => write!(f, "{}", identifier),
            Expression::Integer { value, .. } => write!(f, "{}", value),
            Expression::Boolean { value, .. } => write!(f, "{}", value),
            Expression::Prefix { operator, operand } => write!(f, "({}{})", operator.literal(), operand),
            Expression::Infix { left, operator, right } => write!(f, "({} {} {})", left, operator.literal(), right),
            Expression::If { condition, consequence, alternative, .. } => {
                write!(f, "if ({}) {}", condition, consequence)?;

                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }

                Ok(())
            },
            Expression::Function(function) => write!(f, "{}", function),
            Expression::Call { callee, arguments, .. } => write!(f, "{}({})", callee, util::join(arguments, ", ")),
            Expression::Error { token, expected, message } => match (expected, message) {
                (_, Some(message)) => write!(f, "<error at {}: {}>", token, message),
                (Some(expected), None) => write!(f, "<error at {}: expected {}>", token, expected),
                (None, None) => write!(f, "<error at {}>", token),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::interpreter::lexer::TokenPos;
    use super::*;

    fn token(token_type: TokenType, literal: &str) -> Token {
        Token::new(token_type, literal.to_owned(), TokenPos::begin())
    }

    fn identifier(name: &str) -> Identifier {
        Identifier::new(token(TokenType::Identifier, name))
    }

    fn integer(value: i64) -> Expression {
        Expression::Integer { token: token(TokenType::Int, &value.to_string()), value }
    }

    #[test]
    fn test_render_let() {
        let program = Program {
            statements: vec![
                Statement::Let {
                    token: token(TokenType::Let, "let"),
                    name: identifier("my_var"),
                    value: Expression::Identifier(identifier("another_var")),
                },
            ],
        };

        assert_eq!(program.to_string(), "let my_var = another_var");
        assert_eq!(program.token_literal(), "let");
    }

    #[test]
    fn test_render_nested_control_flow() {
        let body = BlockStatement {
            token: token(TokenType::BracketLeft, "{"),
            statements: vec![
                Statement::Return {
                    token: token(TokenType::Return, "return"),
                    value: Expression::Infix {
                        left: Box::new(Expression::Identifier(identifier("x"))),
                        operator: token(TokenType::Plus, "+"),
                        right: Box::new(integer(1)),
                    },
                },
            ],
        };

        let condition = Expression::Prefix {
            operator: token(TokenType::Not, "!"),
            operand: Box::new(Expression::Identifier(identifier("flag"))),
        };

        let function = Expression::Function(Rc::new(FunctionLiteral {
            token: token(TokenType::Function, "fn"),
            parameters: vec![identifier("x")],
            body: BlockStatement {
                token: token(TokenType::BracketLeft, "{"),
                statements: vec![Statement::Expression {
                    token: token(TokenType::If, "if"),
                    value: Expression::If {
                        token: token(TokenType::If, "if"),
                        condition: Box::new(condition),
                        consequence: body,
                        alternative: Some(BlockStatement {
                            token: token(TokenType::BracketLeft, "{"),
                            statements: vec![],
                        }),
                    },
                }],
            },
        }));

        let call = Expression::Call {
            token: token(TokenType::ParenthesisLeft, "("),
            callee: Box::new(function),
            arguments: vec![integer(2), integer(3)],
        };

        assert_eq!(call.to_string(), "fn(x) { if ((!flag)) { return (x + 1) } else { } }(2, 3)");
        assert_eq!(call.token_literal(), "(");
    }

    #[test]
    fn test_render_error_nodes() {
        let expected = Expression::Error {
            token: token(TokenType::Eof, ""),
            expected: Some(TokenType::ParenthesisRight),
            message: None,
        };
        let with_message = Expression::Error {
            token: token(TokenType::Assign, "="),
            expected: None,
            message: Some(String::from("no prefix parse function")),
        };

        assert_eq!(expected.to_string(), "<error at EOF: expected )>");
        assert_eq!(with_message.to_string(), "<error at `=`: no prefix parse function>");
        assert_eq!(Statement::Error { token: token(TokenType::Illegal, "@") }.to_string(), "<error at `@`>");
    }

    #[test]
    fn test_empty_program() {
        let program = Program::default();

        assert_eq!(program.to_string(), "");
        assert_eq!(program.token_literal(), "");
    }
}
