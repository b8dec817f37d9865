pub mod util;
pub mod interpreter;

use std::path::{Path, PathBuf};
use clap::Parser as ClapParser;
use rustyline::error::ReadlineError;
use thiserror::Error;
use crate::interpreter::environment::Environment;
use crate::interpreter::lexer::Lexer;
use crate::interpreter::object::Object;
use crate::interpreter::parser::{ParseError, Parser};

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(help = "Script to run; starts the REPL when omitted")]
    pub input: Option<PathBuf>,

    #[clap(long, help = "Print the token stream instead of evaluating")]
    pub tokens: bool,
    #[clap(long, help = "Print the parsed program instead of evaluating")]
    pub ast: bool,

    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("line editor failed: {0}")]
    Readline(#[from] ReadlineError),
    #[error("aborting due to {0} syntax error(s)")]
    Parse(usize),
    #[error("{0}")]
    Runtime(String),
}

pub fn run(config: Config) -> Result<(), RunError> {
    match &config.input {
        Some(path) => run_file(path, &config),
        None => interpreter::repl::start(),
    }
}

fn run_file(path: &Path, config: &Config) -> Result<(), RunError> {
    let source = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "read script");

    if config.tokens {
        for token in Lexer::new(&source) {
            println!("{} {} {}", token.pos(), token.token_type(), token);
        }

        return Ok(());
    }

    if config.ast {
        let mut parser = Parser::new(Lexer::new(&source));
        let program = parser.parse_program();

        println!("{}", program);
        return check_parse_errors(parser.errors());
    }

    match interpreter::interpret(&source, &Environment::new_global()) {
        Ok(Some(Object::Error(message))) => Err(RunError::Runtime(message)),
        Ok(Some(value)) => {
            println!("{}", value);
            Ok(())
        },
        Ok(None) => Ok(()),
        Err(errors) => check_parse_errors(&errors),
    }
}

fn check_parse_errors(errors: &[ParseError]) -> Result<(), RunError> {
    if errors.is_empty() {
        return Ok(());
    }

    for error in errors {
        eprintln!("{}", error);
    }

    Err(RunError::Parse(errors.len()))
}
