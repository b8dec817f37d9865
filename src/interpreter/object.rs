use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;
use crate::interpreter::ast::{BlockStatement, FunctionLiteral, Identifier};
use crate::interpreter::environment::Env;

pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);
pub const NULL: Object = Object::Null;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectType {
    Integer,
    Boolean,
    Null,
    ReturnValue,
    Error,
    Function,
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::Null => "NULL",
            ObjectType::ReturnValue => "RETURN_VALUE",
            ObjectType::Error => "ERROR",
            ObjectType::Function => "FUNCTION",
        })
    }
}

/// A closure: a function literal together with the scope it was defined in.
pub struct Function {
    pub literal: Rc<FunctionLiteral>,
    pub env: Env,
}

impl Function {
    pub fn parameters(&self) -> &[Identifier] {
        &self.literal.parameters
    }

    pub fn body(&self) -> &BlockStatement {
        &self.literal.body
    }
}

impl Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Function({})", self.literal)
    }
}

#[derive(Clone, Debug)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Null,

    /// Carries a `return` out of nested blocks. Unwrapped at the call or
    /// program boundary.
    ReturnValue(Box<Object>),
    Error(String),

    Function(Rc<Function>),
}

impl Object {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::Null => ObjectType::Null,
            Object::ReturnValue(_) => ObjectType::ReturnValue,
            Object::Error(_) => ObjectType::Error,
            Object::Function(_) => ObjectType::Function,
        }
    }

    pub fn from_bool(value: bool) -> Object {
        if value { TRUE } else { FALSE }
    }

    /// `null` and `false` are falsy, everything else (including `0`) is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    /// Whether this value stops evaluation of the enclosing block: a pending
    /// `return` or an error.
    pub fn is_unwinding(&self) -> bool {
        matches!(self, Object::ReturnValue(_) | Object::Error(_))
    }
}

/// Identity comparison: scalars compare by value, functions only equal
/// themselves.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(left), Object::Integer(right)) => left == right,
            (Object::Boolean(left), Object::Boolean(right)) => left == right,
            (Object::Null, Object::Null) => true,
            (Object::ReturnValue(left), Object::ReturnValue(right)) => left == right,
            (Object::Error(left), Object::Error(right)) => left == right,
            (Object::Function(left), Object::Function(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::Null => f.write_str("null"),
            Object::ReturnValue(value) => write!(f, "{}", value),
            Object::Error(message) => write!(f, "ERROR: {}", message),
            Object::Function(function) => write!(f, "{}", function.literal),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::interpreter::environment::Environment;
    use crate::interpreter::lexer::Lexer;
    use crate::interpreter::parser::Parser;
    use crate::interpreter::ast::{Expression, Statement};
    use super::*;

    fn function(source: &str) -> Object {
        let mut parser = Parser::new(Lexer::new(source));
        let program = parser.parse_program();

        match program.statements.into_iter().next() {
            Some(Statement::Expression { value: Expression::Function(literal), .. }) => {
                Object::Function(Rc::new(Function { literal, env: Environment::new_global() }))
            },
            other => panic!("expected a function literal, got {:?}", other),
        }
    }

    #[test]
    fn test_truthiness() {
        assert!(TRUE.is_truthy());
        assert!(!FALSE.is_truthy());
        assert!(!NULL.is_truthy());
        assert!(Object::Integer(0).is_truthy());
        assert!(Object::Integer(-3).is_truthy());
        assert!(function("fn() { }").is_truthy());
    }

    #[test]
    fn test_type_tags() {
        assert_eq!(Object::Integer(5).object_type().to_string(), "INTEGER");
        assert_eq!(TRUE.object_type().to_string(), "BOOLEAN");
        assert_eq!(NULL.object_type().to_string(), "NULL");
        assert_eq!(Object::ReturnValue(Box::new(NULL)).object_type().to_string(), "RETURN_VALUE");
        assert_eq!(Object::Error(String::new()).object_type().to_string(), "ERROR");
        assert_eq!(function("fn(x) { x }").object_type().to_string(), "FUNCTION");
    }

    #[test]
    fn test_display() {
        assert_eq!(Object::Integer(-12).to_string(), "-12");
        assert_eq!(FALSE.to_string(), "false");
        assert_eq!(NULL.to_string(), "null");
        assert_eq!(Object::Error(String::from("boom")).to_string(), "ERROR: boom");
        assert_eq!(function("fn(x, y) { x + y }").to_string(), "fn(x, y) { (x + y) }");
    }

    #[test]
    fn test_functions_compare_by_identity() {
        let first = function("fn(x) { x }");
        let second = function("fn(x) { x }");

        assert_eq!(first, first.clone());
        assert_ne!(first, second);
    }

    #[test]
    fn test_unwinding() {
        assert!(Object::ReturnValue(Box::new(Object::Integer(1))).is_unwinding());
        assert!(Object::Error(String::from("boom")).is_unwinding());
        assert!(!Object::Integer(1).is_unwinding());
        assert!(!NULL.is_unwinding());
        assert!(Object::Error(String::from("boom")).is_error());
        assert!(!Object::ReturnValue(Box::new(NULL)).is_error());
    }

    #[test]
    fn test_from_bool_uses_shared_constants() {
        assert_eq!(Object::from_bool(true), TRUE);
        assert_eq!(Object::from_bool(false), FALSE);
    }
}
