//! CLI error presentation and exit codes.

use std::fmt;

use grocer_core::{ErrorKind, GrocerError};

pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INVALID: i32 = 2;
pub const EXIT_NOT_FOUND: i32 = 3;

/// An error ready to be shown to the user.
#[derive(Debug)]
pub struct CliError {
    message: String,
    hint: Option<String>,
    code: i32,
}

impl CliError {
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: Some(hint.into()),
            code: EXIT_NOT_FOUND,
        }
    }

    pub fn invalid(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: Some(hint.into()),
            code: EXIT_INVALID,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: None,
            code: EXIT_FAILURE,
        }
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    /// Classify an error returned by a command handler.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        if let Some(cli) = err.downcast_ref::<CliError>() {
            return Self {
                message: cli.message.clone(),
                hint: cli.hint.clone(),
                code: cli.code,
            };
        }
        match err.downcast_ref::<GrocerError>() {
            Some(grocer) => Self::from_grocer(grocer),
            None => Self::failure(format!("{:#}", err)),
        }
    }

    fn from_grocer(err: &GrocerError) -> Self {
        let message = err.to_string();
        match (err.kind(), err) {
            (ErrorKind::NotFound, _) => Self::not_found(
                message,
                "Check the ids with `grocer recipe list`, `grocer groceries list`, `grocer unit list` or `grocer ingredient search`.",
            ),
            (ErrorKind::Invalid, GrocerError::Conflict(_)) => {
                Self::invalid(message, "Each ingredient or recipe may appear only once.")
            }
            (ErrorKind::Invalid, _) => Self::invalid(message, "Fix the input and retry."),
            (ErrorKind::Internal, GrocerError::Timeout(_)) => Self {
                message,
                hint: Some("The database is locked or the work ran past database.deadline_ms; retry shortly.".to_string()),
                code: EXIT_FAILURE,
            },
            (ErrorKind::Internal, _) => Self::failure(message),
        }
    }

    /// Print the error to stderr and exit the process.
    pub fn exit(self) -> ! {
        eprintln!("Error: {}", self.message);
        if let Some(hint) = &self.hint {
            eprintln!("{}", hint);
        }
        std::process::exit(self.code());
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}
