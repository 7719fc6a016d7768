use crate::Key;
use std::convert::TryFrom;
use std::io;
use thiserror::Error;

/// Errors raised at the boundary between user input and the tree.
#[derive(Debug, Error)]
pub enum Error {
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("{0} is outside the key range 0..={}", Key::MAX)]
    OutOfRange(i64),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Parses a key, rejecting anything outside the key range.
pub fn parse_key(input: &str) -> Result<Key, Error> {
    let input = input.trim();
    let value: i64 = input
        .parse()
        .map_err(|_| Error::NotANumber(input.to_string()))?;
    Key::try_from(value).map_err(|_| Error::OutOfRange(value))
}
