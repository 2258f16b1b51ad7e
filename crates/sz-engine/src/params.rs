//! Collecting operator arguments from the player.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use colored::Colorize;
use thiserror::Error;
use tracing::{debug, warn};

use sz_core::{Arg, ParamDescriptor, ParamKind, ParameterSource};

use crate::console::Console;
use crate::editor::Editor;
use crate::error::{EngineError, EngineResult};

/// Why a typed value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Not parseable as an integer.
    #[error("Not a valid integer.")]
    NotInteger,
    /// Not parseable as a finite real number.
    #[error("Not a valid number.")]
    NotNumber,
    /// Below the lower bound.
    #[error("Too low: must be at least {0}.")]
    TooLow(String),
    /// Above the upper bound.
    #[error("Too high: must be at most {0}.")]
    TooHigh(String),
}

/// Parse an integer within `[min, max]`.
pub fn check_int(input: &str, min: i64, max: i64) -> Result<i64, InputError> {
    let value = input
        .trim()
        .parse::<i64>()
        .map_err(|_| InputError::NotInteger)?;
    check_bounds(value, min, max)
}

/// Parse a finite real number within `[min, max]`.
pub fn check_real(input: &str, min: f64, max: f64) -> Result<f64, InputError> {
    let value = input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(InputError::NotNumber)?;
    check_bounds(value, min, max)
}

fn check_bounds<T: PartialOrd + fmt::Display>(value: T, min: T, max: T) -> Result<T, InputError> {
    if value < min {
        Err(InputError::TooLow(min.to_string()))
    } else if value > max {
        Err(InputError::TooHigh(max.to_string()))
    } else {
        Ok(value)
    }
}

/// Ask for every parameter of an operator, left to right.
///
/// A computed source is resolved against `state` on each call.
pub fn collect_args<S>(
    console: &mut dyn Console,
    editor: &dyn Editor,
    op_name: &str,
    source: &ParameterSource<S>,
    state: &S,
) -> EngineResult<Vec<Arg>> {
    let params = source.resolve(state);
    let mut args = Vec::with_capacity(params.len());
    for param in &params {
        args.push(collect_one(console, editor, op_name, param)?);
    }
    debug!(operator = op_name, count = args.len(), "arguments collected");
    Ok(args)
}

/// Why no input could satisfy `kind`, if so.
fn empty_range(kind: &ParamKind) -> Option<String> {
    match kind {
        ParamKind::Int { min, max } if min > max => Some(format!("range [{min}..{max}] is empty")),
        ParamKind::Real { min, max } if !min.is_finite() || !max.is_finite() => {
            Some(format!("bounds [{min}..{max}] are not finite"))
        }
        ParamKind::Real { min, max } if min > max => {
            Some(format!("range [{min}..{max}] is empty"))
        }
        _ => None,
    }
}

fn collect_one(
    console: &mut dyn Console,
    editor: &dyn Editor,
    op_name: &str,
    param: &ParamDescriptor,
) -> EngineResult<Arg> {
    let name = &param.name;
    if let Some(reason) = empty_range(&param.kind) {
        return Err(EngineError::UnsatisfiableParam {
            operator: op_name.to_string(),
            param: name.clone(),
            reason,
        });
    }
    match &param.kind {
        ParamKind::Int { min, max } => {
            let prompt = format!(
                "  Enter an integer in [{min}..{max}] for parameter '{name}' (operator: \"{op_name}\"): "
            );
            loop {
                let input = console.prompt(&prompt)?;
                match check_int(&input, *min, *max) {
                    Ok(v) => return Ok(Arg::Int(v)),
                    Err(e) => reject(console, &e)?,
                }
            }
        }
        ParamKind::Real { min, max } => {
            let prompt = format!(
                "  Enter a number in [{min}..{max}] for parameter '{name}' (operator: \"{op_name}\"): "
            );
            loop {
                let input = console.prompt(&prompt)?;
                match check_real(&input, *min, *max) {
                    Ok(v) => return Ok(Arg::Real(v)),
                    Err(e) => reject(console, &e)?,
                }
            }
        }
        ParamKind::Text => {
            let prompt =
                format!("  Enter a value for parameter '{name}' (operator: \"{op_name}\"): ");
            Ok(Arg::Text(console.prompt(&prompt)?))
        }
        ParamKind::FileEdit { path, placeholder } => {
            edit_file(console, editor, path, placeholder).map(Arg::Text)
        }
    }
}

fn reject(console: &mut dyn Console, error: &InputError) -> EngineResult<()> {
    let message = format!("  {error}  Try again.");
    console.line(&message.yellow().to_string())
}

/// Seed `path` with `placeholder` unless it exists, run the editor on it,
/// and return the file's contents verbatim.
pub fn edit_file(
    console: &mut dyn Console,
    editor: &dyn Editor,
    path: &Path,
    placeholder: &str,
) -> EngineResult<String> {
    let file_error = |source: std::io::Error| EngineError::EditedFile {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(file_error)?;
    }
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            file.write_all(placeholder.as_bytes()).map_err(file_error)?;
            debug!(path = %path.display(), "seeded file for editing");
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
        Err(e) => return Err(file_error(e)),
    }

    console.line(&format!(
        "  Opening '{}' to edit: {}",
        editor.program(),
        path.display()
    ))?;
    console.line("  Save and exit the editor when done.")?;

    if let Err(e) = editor.edit(path) {
        warn!(error = %e, path = %path.display(), "editing failed");
        return Err(e);
    }
    fs::read_to_string(path).map_err(file_error)
}
