use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use lazy_static::lazy_static;
use crate::interpreter::ast::{BlockStatement, Expression, FunctionLiteral, Identifier, Program, Statement};
use crate::interpreter::lexer::{Lexer, Token, TokenType};


#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,      // == !=
    LessGreater, // < > <= >=
    Sum,         // + -
    Product,     // * / %
    Prefix,      // -x !x
    Call,        // f(x)
}

lazy_static! {
    static ref PRECEDENCES: HashMap<TokenType, Precedence> = HashMap::from([
        (TokenType::Equal, Precedence::Equals),
        (TokenType::NotEqual, Precedence::Equals),
        (TokenType::Less, Precedence::LessGreater),
        (TokenType::Greater, Precedence::LessGreater),
        (TokenType::LessEqual, Precedence::LessGreater),
        (TokenType::GreaterEqual, Precedence::LessGreater),
        (TokenType::Plus, Precedence::Sum),
        (TokenType::Minus, Precedence::Sum),
        (TokenType::Multiply, Precedence::Product),
        (TokenType::Divide, Precedence::Product),
        (TokenType::Modulo, Precedence::Product),
        (TokenType::ParenthesisLeft, Precedence::Call),
    ]);
}

fn precedence_of(token_type: TokenType) -> Precedence {
    PRECEDENCES.get(&token_type).copied().unwrap_or(Precedence::Lowest)
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParseError {
    UnexpectedToken {
        expected: TokenType,
        got: Token,
    },
    NoPrefixParseFn {
        token: Token,
    },
    InvalidInteger {
        token: Token,
        reason: String,
    },
}

impl ParseError {
    pub fn token(&self) -> &Token {
        match self {
            ParseError::UnexpectedToken { got, .. } => got,
            ParseError::NoPrefixParseFn { token } => token,
            ParseError::InvalidInteger { token, .. } => token,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ", self.token().pos())?;

        match self {
            ParseError::UnexpectedToken { expected, got } =>
                write!(f, "Expected next token to be {}, got {}", expected, got),
            ParseError::NoPrefixParseFn { token } =>
                write!(f, "No prefix parse function for {} found at {}", token.token_type(), token),
            ParseError::InvalidInteger { token, reason } =>
                write!(f, "Could not parse {} as integer: {}", token, reason),
        }
    }
}

type PrefixParseFn<'source> = fn(&mut Parser<'source>) -> Expression;
type InfixParseFn<'source> = fn(&mut Parser<'source>, Expression) -> Expression;

/// Pratt parser over a [`Lexer`].
///
/// Syntax errors never stop the parse. The broken construct is replaced by
/// an error node, the error is recorded in [`Parser::errors`], and parsing
/// carries on with the next token.
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    current: Token, peek: Token,

    errors: Vec<ParseError>,

    prefix_parse_fns: HashMap<TokenType, PrefixParseFn<'source>>,
    infix_parse_fns: HashMap<TokenType, InfixParseFn<'source>>,
}

impl<'source> Parser<'source> {
    pub fn new(lexer: Lexer<'source>) -> Parser<'source> {
        let mut parser = Parser {
            lexer,
            current: Token::empty(), peek: Token::empty(),
            errors: Vec::new(),
            prefix_parse_fns: HashMap::new(),
            infix_parse_fns: HashMap::new(),
        };

        parser.register_prefix(TokenType::Identifier, Self::parse_identifier);
        parser.register_prefix(TokenType::Int, Self::parse_integer_literal);
        parser.register_prefix(TokenType::True, Self::parse_boolean);
        parser.register_prefix(TokenType::False, Self::parse_boolean);
        parser.register_prefix(TokenType::Not, Self::parse_prefix_expression);
        parser.register_prefix(TokenType::Minus, Self::parse_prefix_expression);
        parser.register_prefix(TokenType::ParenthesisLeft, Self::parse_grouped_expression);
        parser.register_prefix(TokenType::If, Self::parse_if_expression);
        parser.register_prefix(TokenType::Function, Self::parse_function_literal);

        for token_type in [
            TokenType::Plus, TokenType::Minus,
            TokenType::Multiply, TokenType::Divide, TokenType::Modulo,
            TokenType::Equal, TokenType::NotEqual,
            TokenType::Less, TokenType::Greater,
            TokenType::LessEqual, TokenType::GreaterEqual,
        ] {
            parser.register_infix(token_type, Self::parse_infix_expression);
        }

        parser.register_infix(TokenType::ParenthesisLeft, Self::parse_call_expression);

        // Fill both `current` and `peek`
        parser.consume();
        parser.consume();
        parser
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    fn register_prefix(&mut self, token_type: TokenType, function: PrefixParseFn<'source>) {
        self.prefix_parse_fns.insert(token_type, function);
    }

    fn register_infix(&mut self, token_type: TokenType, function: InfixParseFn<'source>) {
        self.infix_parse_fns.insert(token_type, function);
    }

    // Statement parsing

    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        while !self.check(TokenType::Eof) {
            if let Some(stmt) = self.parse_statement() {
                program.statements.push(stmt);
            }

            self.consume();
        }

        program
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.token_type() {
            TokenType::Let => Some(self.parse_let_statement()),
            TokenType::Return => Some(self.parse_return_statement()),
            TokenType::Semicolon => None,
            _ => Some(self.parse_expression_statement()),
        }
    }

    fn parse_let_statement(&mut self) -> Statement {
        let token = self.current.clone();

        if !self.expect_peek(TokenType::Identifier) {
            return Statement::Error { token: self.peek.clone() };
        }

        let name = Identifier::new(self.current.clone());

        if !self.expect_peek(TokenType::Assign) {
            return Statement::Error { token: self.peek.clone() };
        }

        self.consume();
        let value = self.parse_expression(Precedence::Lowest);
        self.skip_statement_end();

        Statement::Let { token, name, value }
    }

    fn parse_return_statement(&mut self) -> Statement {
        let token = self.current.clone();

        self.consume();
        let value = self.parse_expression(Precedence::Lowest);
        self.skip_statement_end();

        Statement::Return { token, value }
    }

    fn parse_expression_statement(&mut self) -> Statement {
        let token = self.current.clone();

        let value = self.parse_expression(Precedence::Lowest);
        self.skip_statement_end();

        Statement::Expression { token, value }
    }

    // Leaves `current` on the closing `}`
    fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.current.clone();
        let mut statements = Vec::new();

        self.consume();

        while !self.check(TokenType::BracketRight) && !self.check(TokenType::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }

            self.consume();
        }

        if self.check(TokenType::Eof) {
            self.error(ParseError::UnexpectedToken { expected: TokenType::BracketRight, got: self.current.clone() });
        }

        BlockStatement { token, statements }
    }

    #[inline]
    fn skip_statement_end(&mut self) {
        if self.check_peek(TokenType::Semicolon) {
            self.consume();
        }
    }

    // Expression parsing

    fn parse_expression(&mut self, precedence: Precedence) -> Expression {
        let prefix = match self.prefix_parse_fns.get(&self.current.token_type()).copied() {
            Some(prefix) => prefix,
            None => {
                let token = self.current.clone();
                let message = format!("no prefix parse function for {}", token.token_type());
                self.error(ParseError::NoPrefixParseFn { token: token.clone() });

                return Expression::Error { token, expected: None, message: Some(message) };
            },
        };

        let mut left = prefix(self);

        while !self.check_peek(TokenType::Semicolon) && precedence < self.peek_precedence() {
            let infix = match self.infix_parse_fns.get(&self.peek.token_type()).copied() {
                Some(infix) => infix,
                None => return left,
            };

            self.consume();
            left = infix(self, left);
        }

        left
    }

    fn parse_identifier(&mut self) -> Expression {
        Expression::Identifier(Identifier::new(self.current.clone()))
    }

    fn parse_integer_literal(&mut self) -> Expression {
        let token = self.current.clone();

        match token.literal().parse::<i64>() {
            Ok(value) => Expression::Integer { token, value },
            Err(err) => {
                let reason = err.to_string();
                self.error(ParseError::InvalidInteger { token: token.clone(), reason: reason.clone() });

                Expression::Error { token, expected: None, message: Some(reason) }
            },
        }
    }

    fn parse_boolean(&mut self) -> Expression {
        Expression::Boolean {
            token: self.current.clone(),
            value: self.check(TokenType::True),
        }
    }

    fn parse_prefix_expression(&mut self) -> Expression {
        let operator = self.current.clone();

        self.consume();
        let operand = self.parse_expression(Precedence::Prefix);

        Expression::Prefix { operator, operand: Box::new(operand) }
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Expression {
        let operator = self.current.clone();
        let precedence = self.current_precedence();

        self.consume();
        let right = self.parse_expression(precedence);

        Expression::Infix { left: Box::new(left), operator, right: Box::new(right) }
    }

    fn parse_grouped_expression(&mut self) -> Expression {
        self.consume();
        let expr = self.parse_expression(Precedence::Lowest);

        if !self.expect_peek(TokenType::ParenthesisRight) {
            return self.expectation_error(TokenType::ParenthesisRight);
        }

        expr
    }

    fn parse_if_expression(&mut self) -> Expression {
        let token = self.current.clone();

        if !self.expect_peek(TokenType::ParenthesisLeft) {
            return self.expectation_error(TokenType::ParenthesisLeft);
        }

        self.consume();
        let condition = self.parse_expression(Precedence::Lowest);

        if !self.expect_peek(TokenType::ParenthesisRight) {
            return self.expectation_error(TokenType::ParenthesisRight);
        }

        if !self.expect_peek(TokenType::BracketLeft) {
            return self.expectation_error(TokenType::BracketLeft);
        }

        let consequence = self.parse_block_statement();
        let mut alternative = None;

        if self.check_peek(TokenType::Else) {
            self.consume();

            if !self.expect_peek(TokenType::BracketLeft) {
                return self.expectation_error(TokenType::BracketLeft);
            }

            alternative = Some(self.parse_block_statement());
        }

        Expression::If { token, condition: Box::new(condition), consequence, alternative }
    }

    fn parse_function_literal(&mut self) -> Expression {
        let token = self.current.clone();

        if !self.expect_peek(TokenType::ParenthesisLeft) {
            return self.expectation_error(TokenType::ParenthesisLeft);
        }

        let parameters = match self.parse_function_parameters() {
            Ok(parameters) => parameters,
            Err(expected) => return self.expectation_error(expected),
        };

        if !self.expect_peek(TokenType::BracketLeft) {
            return self.expectation_error(TokenType::BracketLeft);
        }

        let body = self.parse_block_statement();
        Expression::Function(Rc::new(FunctionLiteral { token, parameters, body }))
    }

    // On failure, returns the token type that was expected
    fn parse_function_parameters(&mut self) -> Result<Vec<Identifier>, TokenType> {
        let mut parameters = Vec::new();

        if self.check_peek(TokenType::ParenthesisRight) {
            self.consume();
            return Ok(parameters);
        }

        if !self.expect_peek(TokenType::Identifier) {
            return Err(TokenType::Identifier);
        }

        parameters.push(Identifier::new(self.current.clone()));

        while self.check_peek(TokenType::Comma) {
            self.consume();

            if !self.expect_peek(TokenType::Identifier) {
                return Err(TokenType::Identifier);
            }

            parameters.push(Identifier::new(self.current.clone()));
        }

        if !self.expect_peek(TokenType::ParenthesisRight) {
            return Err(TokenType::ParenthesisRight);
        }

        Ok(parameters)
    }

    fn parse_call_expression(&mut self, callee: Expression) -> Expression {
        let token = self.current.clone();

        match self.parse_call_arguments() {
            Ok(arguments) => Expression::Call { token, callee: Box::new(callee), arguments },
            Err(expected) => self.expectation_error(expected),
        }
    }

    fn parse_call_arguments(&mut self) -> Result<Vec<Expression>, TokenType> {
        let mut arguments = Vec::new();

        if self.check_peek(TokenType::ParenthesisRight) {
            self.consume();
            return Ok(arguments);
        }

        self.consume();
        arguments.push(self.parse_expression(Precedence::Lowest));

        while self.check_peek(TokenType::Comma) {
            self.consume();
            self.consume();
            arguments.push(self.parse_expression(Precedence::Lowest));
        }

        if !self.expect_peek(TokenType::ParenthesisRight) {
            return Err(TokenType::ParenthesisRight);
        }

        Ok(arguments)
    }

    // Token handling

    fn consume(&mut self) {
        self.current = std::mem::replace(&mut self.peek, self.lexer.next_token());
    }

    fn expect_peek(&mut self, token_type: TokenType) -> bool {
        if self.check_peek(token_type) {
            self.consume();
            return true;
        }

        self.error(ParseError::UnexpectedToken { expected: token_type, got: self.peek.clone() });
        false
    }

    #[inline]
    fn check(&self, token_type: TokenType) -> bool {
        self.current.token_type() == token_type
    }

    #[inline]
    fn check_peek(&self, token_type: TokenType) -> bool {
        self.peek.token_type() == token_type
    }

    fn current_precedence(&self) -> Precedence {
        precedence_of(self.current.token_type())
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek.token_type())
    }

    // Error handling

    fn expectation_error(&self, expected: TokenType) -> Expression {
        Expression::Error {
            token: self.peek.clone(),
            expected: Some(expected),
            message: None,
        }
    }

    fn error(&mut self, error: ParseError) {
        tracing::debug!(%error, "syntax error");
        self.errors.push(error);
    }
}
