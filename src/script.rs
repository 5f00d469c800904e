//! Scripted input for headless runs.
//!
//! A script is a whitespace separated list of tokens:
//!
//! | Token | Meaning                        |
//! |-------|--------------------------------|
//! | `R<n>`| hold right for `n` steps       |
//! | `L<n>`| hold left for `n` steps        |
//! | `W<n>`| wait `n` steps without input   |
//! | `J`   | jump on the next step          |
//!
//! `J` does not take a step of its own; it rides on the following token so
//! `R4 J R10` jumps while running. A trailing `J` becomes a single idle step
//! with the jump requested. Tokens are case-insensitive.

use thiserror::Error;

use crate::resources::input::Intents;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown token '{0}'")]
    UnknownToken(String),

    #[error("bad step count in '{0}'")]
    BadCount(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptCommand {
    Right(u32),
    Left(u32),
    Wait(u32),
    Jump,
}

pub fn parse_script(text: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    text.split_whitespace().map(parse_token).collect()
}

fn parse_token(token: &str) -> Result<ScriptCommand, ScriptError> {
    let mut chars = token.chars();
    let Some(head) = chars.next() else {
        return Err(ScriptError::UnknownToken(token.to_string()));
    };
    let count = || {
        chars
            .as_str()
            .parse::<u32>()
            .map_err(|_| ScriptError::BadCount(token.to_string()))
    };
    match head.to_ascii_uppercase() {
        'R' => Ok(ScriptCommand::Right(count()?)),
        'L' => Ok(ScriptCommand::Left(count()?)),
        'W' => Ok(ScriptCommand::Wait(count()?)),
        'J' if chars.as_str().is_empty() => Ok(ScriptCommand::Jump),
        _ => Err(ScriptError::UnknownToken(token.to_string())),
    }
}

/// One [`Intents`] value per step described by `commands`.
pub fn expand(commands: &[ScriptCommand]) -> Vec<Intents> {
    let mut steps = Vec::new();
    let mut jump = false;
    for command in commands {
        let (base, count) = match *command {
            ScriptCommand::Jump => {
                jump = true;
                continue;
            }
            ScriptCommand::Right(n) => (Intents::right(), n),
            ScriptCommand::Left(n) => (Intents::left(), n),
            ScriptCommand::Wait(n) => (Intents::idle(), n),
        };
        for _ in 0..count {
            let mut intents = base;
            intents.jump_requested = std::mem::take(&mut jump);
            steps.push(intents);
        }
    }
    if jump {
        steps.push(Intents::jump());
    }
    steps
}
