use std::rc::Rc;
use crate::interpreter::ast::{BlockStatement, Expression, Identifier, Program, Statement};
use crate::interpreter::environment::{Env, Environment};
use crate::interpreter::lexer::{Token, TokenType};
use crate::interpreter::object::{Function, Object, NULL};


/// Anything the evaluator can be pointed at.
#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
    Program(&'a Program),
    Statement(&'a Statement),
    Block(&'a BlockStatement),
    Expression(&'a Expression),
}

impl<'a> From<&'a Program> for Node<'a> {
    fn from(program: &'a Program) -> Self {
        Node::Program(program)
    }
}

impl<'a> From<&'a Statement> for Node<'a> {
    fn from(stmt: &'a Statement) -> Self {
        Node::Statement(stmt)
    }
}

impl<'a> From<&'a BlockStatement> for Node<'a> {
    fn from(block: &'a BlockStatement) -> Self {
        Node::Block(block)
    }
}

impl<'a> From<&'a Expression> for Node<'a> {
    fn from(expr: &'a Expression) -> Self {
        Node::Expression(expr)
    }
}

/// Evaluates `node` in `env`.
///
/// Returns `None` when the node produces no value: an empty program or
/// block, or one ending in a `let` statement. Runtime failures are not
/// reported through the return type; they come back as [`Object::Error`]
/// and stop evaluation of the enclosing program.
pub fn eval(node: Node<'_>, env: &Env) -> Option<Object> {
    match node {
        Node::Program(program) => eval_program(program, env),
        Node::Statement(stmt) => eval_statement(stmt, env),
        Node::Block(block) => eval_block(block, env),
        Node::Expression(expr) => Some(eval_expression(expr, env)),
    }
}

fn eval_program(program: &Program, env: &Env) -> Option<Object> {
    let mut result = None;

    for stmt in &program.statements {
        match eval_statement(stmt, env) {
            Some(Object::ReturnValue(value)) => return Some(*value),
            Some(error @ Object::Error(_)) => return Some(error),
            other => result = other,
        }
    }

    result
}

// Unlike a program, a block hands `return` values up unchanged so that the
// enclosing call can unwrap them
fn eval_block(block: &BlockStatement, env: &Env) -> Option<Object> {
    let mut result = None;

    for stmt in &block.statements {
        result = eval_statement(stmt, env);

        if result.as_ref().map_or(false, Object::is_unwinding) {
            return result;
        }
    }

    result
}

fn eval_statement(stmt: &Statement, env: &Env) -> Option<Object> {
    match stmt {
        Statement::Let { name, value, .. } => {
            let value = eval_expression(value, env);

            if value.is_unwinding() {
                return Some(value);
            }

            env.borrow_mut().set(name.name.clone(), value);
            None
        },
        Statement::Return { value, .. } => {
            let value = eval_expression(value, env);

            if value.is_unwinding() {
                return Some(value);
            }

            Some(Object::ReturnValue(Box::new(value)))
        },
        Statement::Expression { value, .. } => Some(eval_expression(value, env)),
        Statement::Block(block) => eval_block(block, env),
        Statement::Error { token } => Some(Object::Error(format!("parse error at {}: unexpected {}", token.pos(), token))),
    }
}

fn eval_expression(expr: &Expression, env: &Env) -> Object {
    match expr {
        Expression::Identifier(identifier) => eval_identifier(identifier, env),
        Expression::Integer { value, .. } => Object::Integer(*value),
        Expression::Boolean { value, .. } => Object::from_bool(*value),
        Expression::Prefix { operator, operand } => {
            let operand = eval_expression(operand, env);

            if operand.is_unwinding() {
                return operand;
            }

            eval_prefix_expression(operator, operand)
        },
        Expression::Infix { left, operator, right } => {
            let left = eval_expression(left, env);

            if left.is_unwinding() {
                return left;
            }

            let right = eval_expression(right, env);

            if right.is_unwinding() {
                return right;
            }

            eval_infix_expression(operator, left, right)
        },
        Expression::If { condition, consequence, alternative, .. } => {
            let condition = eval_expression(condition, env);

            if condition.is_unwinding() {
                return condition;
            }

            let branch = if condition.is_truthy() {
                Some(consequence)
            } else {
                alternative.as_ref()
            };

            branch.and_then(|block| eval_block(block, env)).unwrap_or(NULL)
        },
        Expression::Function(literal) => Object::Function(Rc::new(Function {
            literal: Rc::clone(literal),
            env: Rc::clone(env),
        })),
        Expression::Call { callee, arguments, .. } => {
            let function = eval_expression(callee, env);

            if function.is_unwinding() {
                return function;
            }

            let mut values = Vec::with_capacity(arguments.len());

            for arg in arguments {
                let value = eval_expression(arg, env);

                if value.is_unwinding() {
                    return value;
                }

                values.push(value);
            }

            tracing::trace!(callee = %callee, arguments = values.len(), "calling function");
            apply_function(function, values)
        },
        Expression::Error { token, expected, message } => Object::Error(match (expected, message) {
            (_, Some(message)) => format!("parse error at {}: {}", token.pos(), message),
            (Some(expected), None) => format!("parse error at {}: expected {}, got {}", token.pos(), expected, token),
            (None, None) => format!("parse error at {}: unexpected {}", token.pos(), token),
        }),
    }
}

fn eval_identifier(identifier: &Identifier, env: &Env) -> Object {
    let value = env.borrow().get(&identifier.name);

    match value {
        Some(value) => value,
        None => Object::Error(format!("identifier not found: {}", identifier.name)),
    }
}

fn eval_prefix_expression(operator: &Token, operand: Object) -> Object {
    match operator.token_type() {
        TokenType::Not => Object::from_bool(!operand.is_truthy()),
        TokenType::Minus => match operand {
            Object::Integer(value) => match value.checked_neg() {
                Some(result) => Object::Integer(result),
                None => Object::Error(format!("integer overflow: -({})", value)),
            },
            other => Object::Error(format!("unknown operator: -{}", other.object_type())),
        },
        _ => Object::Error(format!("unknown operator: {}{}", operator.literal(), operand.object_type())),
    }
}

fn eval_infix_expression(operator: &Token, left: Object, right: Object) -> Object {
    if let (Object::Integer(left), Object::Integer(right)) = (&left, &right) {
        return eval_integer_infix_expression(operator, *left, *right);
    }

    match operator.token_type() {
        TokenType::Equal => Object::from_bool(left == right),
        TokenType::NotEqual => Object::from_bool(left != right),
        _ if left.object_type() != right.object_type() => Object::Error(format!("type mismatch: {} {} {}",
            left.object_type(), operator.literal(), right.object_type())),
        _ => Object::Error(format!("unknown operator: {} {} {}",
            left.object_type(), operator.literal(), right.object_type())),
    }
}

fn eval_integer_infix_expression(operator: &Token, left: i64, right: i64) -> Object {
    let result = match operator.token_type() {
        TokenType::Plus => left.checked_add(right),
        TokenType::Minus => left.checked_sub(right),
        TokenType::Multiply => left.checked_mul(right),
        TokenType::Divide | TokenType::Modulo if right == 0 => return Object::Error(String::from("division by zero")),
        TokenType::Divide => left.checked_div(right),
        TokenType::Modulo => left.checked_rem(right),

        TokenType::Less => return Object::from_bool(left < right),
        TokenType::Greater => return Object::from_bool(left > right),
        TokenType::LessEqual => return Object::from_bool(left <= right),
        TokenType::GreaterEqual => return Object::from_bool(left >= right),
        TokenType::Equal => return Object::from_bool(left == right),
        TokenType::NotEqual => return Object::from_bool(left != right),

        _ => return Object::Error(format!("unknown operator: INTEGER {} INTEGER", operator.literal())),
    };

    match result {
        Some(value) => Object::Integer(value),
        None => Object::Error(format!("integer overflow: {} {} {}", left, operator.literal(), right)),
    }
}

fn apply_function(function: Object, arguments: Vec<Object>) -> Object {
    let function = match function {
        Object::Function(function) => function,
        other => return Object::Error(format!("not a function: {}", other.object_type())),
    };

    let parameters = function.parameters();

    if parameters.len() != arguments.len() {
        return Object::Error(format!("wrong number of arguments: want={}, got={}", parameters.len(), arguments.len()));
    }

    let call_env = Environment::new_enclosed(Rc::clone(&function.env));

    {
        let mut scope = call_env.borrow_mut();

        for (parameter, argument) in parameters.iter().zip(arguments) {
            scope.set(parameter.name.clone(), argument);
        }
    }

    match eval_block(function.body(), &call_env) {
        Some(Object::ReturnValue(value)) => *value,
        Some(value) => value,
        None => NULL,
    }
}
