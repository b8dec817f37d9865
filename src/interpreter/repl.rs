use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use crate::interpreter::environment::{Env, Environment};
use crate::interpreter::interpret;
use crate::RunError;

pub const PROMPT: &str = ">> ";

/// Reads lines until Ctrl-C or Ctrl-D, evaluating each one in a single root
/// environment so that bindings carry over between lines.
pub fn start() -> Result<(), RunError> {
    let mut editor = DefaultEditor::new()?;
    let env = Environment::new_global();

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                editor.add_history_entry(line.as_str())?;

                if let Some(output) = process_line(&line, &env) {
                    println!("{}", output);
                }
            },
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn process_line(line: &str, env: &Env) -> Option<String> {
    tracing::debug!(line, "evaluating line");

    match interpret(line, env) {
        Ok(value) => value.map(|value| value.to_string()),
        Err(errors) => {
            let mut output = String::from("parse errors:");

            for error in errors {
                output.push_str("\n    ");
                output.push_str(&error.to_string());
            }

            Some(output)
        },
    }
}
