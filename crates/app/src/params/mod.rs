//! Flat request parameters
//!
//! Requests reach the core as a flat map of string keys to string values.
//! List-shaped values use a zero-based bracket index (`key[0]`, `key[1]`, …)
//! and are read contiguously until the first missing index.

use std::str::FromStr;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

mod errors;

pub use errors::ValidationError;

/// Flat string-keyed request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(FxHashMap<String, String>);

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);

        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Parse `key=value` pairs, as given on a command line.
    ///
    /// # Errors
    ///
    /// Returns an error for a pair without `=` or with an empty key.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut params = Self::new();

        for pair in pairs {
            let pair = pair.as_ref();

            let Some((key, value)) = pair.split_once('=') else {
                return Err(ValidationError::new(pair, "expected key=value"));
            };

            let key = key.trim();

            if key.is_empty() {
                return Err(ValidationError::new(pair, "parameter name is empty"));
            }

            params.insert(key, value);
        }

        Ok(params)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw value, untrimmed.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Trimmed value of an optional field. Present but blank is an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the field is present but blank.
    pub fn text(&self, field: &str) -> Result<Option<&str>, ValidationError> {
        match self.get(field).map(str::trim) {
            None => Ok(None),
            Some("") => Err(ValidationError::blank(field)),
            Some(value) => Ok(Some(value)),
        }
    }

    /// Untrimmed value of an optional field. Present but blank is an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the field is present but blank.
    pub fn verbatim(&self, field: &str) -> Result<Option<&str>, ValidationError> {
        match self.get(field) {
            Some(value) if value.trim().is_empty() => Err(ValidationError::blank(field)),
            value => Ok(value),
        }
    }

    /// Trimmed value of a required field.
    ///
    /// # Errors
    ///
    /// Returns an error when the field is absent or blank.
    pub fn required_text(&self, field: &str) -> Result<&str, ValidationError> {
        self.text(field)?
            .ok_or_else(|| ValidationError::missing(field))
    }

    /// Values of a bracket-indexed list, in index order.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first blank element.
    pub fn list(&self, field: &str) -> Result<SmallVec<[&str; 4]>, ValidationError> {
        let mut values = SmallVec::new();

        for index in 0.. {
            let key = format!("{field}[{index}]");

            let Some(value) = self.get(&key) else {
                break;
            };

            let value = value.trim();

            if value.is_empty() {
                return Err(ValidationError::blank(key));
            }

            values.push(value);
        }

        Ok(values)
    }

    /// Parse an optional field with [`FromStr`], describing the expected shape
    /// in the error.
    ///
    /// # Errors
    ///
    /// Returns an error when the field is blank or does not parse.
    pub fn parse<T: FromStr>(&self, field: &str, expected: &str) -> Result<Option<T>, ValidationError> {
        self.text(field)?
            .map(|value| {
                value
                    .parse::<T>()
                    .map_err(|_parse_error| ValidationError::new(field, format!("must be {expected}")))
            })
            .transpose()
    }

    /// Optional `true`/`false` flag (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error for any other value.
    pub fn flag(&self, field: &str) -> Result<Option<bool>, ValidationError> {
        self.text(field)?
            .map(|value| {
                if value.eq_ignore_ascii_case("true") {
                    Ok(true)
                } else if value.eq_ignore_ascii_case("false") {
                    Ok(false)
                } else {
                    Err(ValidationError::new(field, "must be true or false"))
                }
            })
            .transpose()
    }

    /// Optional integer that must be at least one.
    ///
    /// # Errors
    ///
    /// Returns an error for non-integers and values below one.
    pub fn positive(&self, field: &str) -> Result<Option<u32>, ValidationError> {
        match self.parse::<u32>(field, "a positive integer")? {
            Some(0) => Err(ValidationError::new(field, "must be a positive integer")),
            value => Ok(value),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
