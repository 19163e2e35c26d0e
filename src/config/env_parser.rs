//! Parsers for `MEMORIA_*` environment values.

use crate::errors::Error;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::paths;

/// A set variable must hold something other than whitespace.
fn non_empty<'a>(name: &str, value: &'a str) -> Result<&'a str, Error> {
    match value.trim() {
        "" => Err(Error::Config(format!("{name} cannot be empty"))),
        trimmed => Ok(trimmed),
    }
}

pub fn parse_env_string(name: &str, value: &str) -> Result<String, Error> {
    non_empty(name, value).map(str::to_string)
}

/// Path value with a leading `~` expanded.
pub fn parse_env_path(name: &str, value: &str) -> Result<PathBuf, Error> {
    non_empty(name, value).map(|v| paths::expand_tilde_path(Path::new(v)))
}

/// Numeric value; range checks happen in validation.
pub fn parse_env_number<T>(name: &str, value: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    non_empty(name, value)?
        .parse()
        .map_err(|e| Error::Config(format!("Invalid {name} value: {e}")))
}

/// Overwrite `target` with the parsed value of `name` when it is set.
pub fn apply_override<T>(
    name: &str,
    target: &mut T,
    parse: fn(&str, &str) -> Result<T, Error>,
) -> Result<(), Error> {
    if let Ok(val) = std::env::var(name) {
        *target = parse(name, &val)?;
    }
    Ok(())
}
