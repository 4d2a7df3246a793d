//! Product Codes
//!
//! A product code is the uppercased first character of every word of the
//! product name followed by an epoch-millisecond value. Two products with
//! the same initials created within the same millisecond would collide, so
//! creation walks a monotonic sequence of candidates (`t`, `t + 1`, …) and
//! keeps the first one the database accepts.

use jiff::Timestamp;

use crate::domain::products::records::ProductCode;

/// Candidates tried before creation gives up.
pub const MAX_CODE_ATTEMPTS: u32 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCodeGenerator {
    initials: String,
    base_millis: i64,
}

impl ProductCodeGenerator {
    #[must_use]
    pub fn new(name: &str, at: Timestamp) -> Self {
        Self {
            initials: initials(name),
            base_millis: at.as_millisecond(),
        }
    }

    /// The code for the given attempt, starting at zero.
    #[must_use]
    pub fn code(&self, attempt: u32) -> ProductCode {
        let millis = self.base_millis.saturating_add(i64::from(attempt));

        ProductCode::new(format!("{}{millis}", self.initials))
    }

    /// Every candidate code, in the order they should be tried.
    pub fn candidates(&self) -> impl Iterator<Item = ProductCode> + '_ {
        (0..MAX_CODE_ATTEMPTS).map(|attempt| self.code(attempt))
    }
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
