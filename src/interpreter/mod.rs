pub mod lexer;
pub mod ast;
pub mod parser;
pub mod environment;
pub mod object;
pub mod evaluator;
pub mod repl;

use crate::interpreter::environment::Env;
use crate::interpreter::evaluator::Node;
use crate::interpreter::lexer::Lexer;
use crate::interpreter::object::Object;
use crate::interpreter::parser::{ParseError, Parser};

/// Parses `source` and evaluates it in `env`.
///
/// Nothing is evaluated if the parser reported any error.
pub fn interpret(source: &str, env: &Env) -> Result<Option<Object>, Vec<ParseError>> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();

    if parser.had_error() {
        return Err(parser.errors().to_vec());
    }

    Ok(evaluator::eval(Node::Program(&program), env))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::interpreter::environment::Environment;
    use super::*;

    #[test]
    fn test_interpret() {
        let env = Environment::new_global();

        assert_eq!(interpret("let a = 20; a + 1", &env), Ok(Some(Object::Integer(21))));
        assert_eq!(interpret("a * 2", &env), Ok(Some(Object::Integer(40))));
        assert_eq!(interpret("", &env), Ok(None));
    }

    #[test]
    fn test_interpret_skips_broken_programs() {
        let env = Environment::new_global();

        match interpret("let b = 1; let = 2", &env) {
            Err(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected parse errors, got {:?}", other),
        }

        assert_eq!(env.borrow().get("b"), None);
    }
}
