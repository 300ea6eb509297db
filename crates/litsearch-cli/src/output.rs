//! Envelope rendering

use crate::app::OutputFormat;
use anyhow::Result;
use litsearch_core::error::exit_codes;
use litsearch_core::ApiResponse;
use serde_json::Value;
use std::fmt;

/// Non-200 envelope surfaced as a command failure
#[derive(Debug)]
pub struct CommandFailed {
    pub status: u16,
    pub message: String,
}

impl CommandFailed {
    pub fn exit_code(&self) -> i32 {
        if self.status == 400 {
            exit_codes::INVALID_INPUT
        } else {
            exit_codes::GENERAL_ERROR
        }
    }
}

impl fmt::Display for CommandFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandFailed {}

/// Print a successful body, or turn a failed one into an error
pub fn emit(
    response: ApiResponse,
    format: OutputFormat,
    render: impl FnOnce(&Value) -> String,
) -> Result<()> {
    if !response.is_success() {
        let message = response
            .body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("request failed")
            .to_string();
        return Err(CommandFailed {
            status: response.status,
            message,
        }
        .into());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response.body)?),
        OutputFormat::Cli => print!("{}", render(&response.body)),
    }
    Ok(())
}
