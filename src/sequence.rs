use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// One unicode scalar value as written in the corpus, e.g. `1F600`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codepoint(char);

impl Codepoint {
    pub fn new(c: char) -> Codepoint {
        Codepoint(c)
    }

    pub fn as_char(&self) -> char {
        self.0
    }

    pub fn value(&self) -> u32 {
        self.0 as u32
    }
}

impl FromStr for Codepoint {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidCodepoint(token.to_string());
        // from_str_radix accepts a leading '+', the corpus never does.
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(token, 16).map_err(|_| invalid())?;
        char::from_u32(value).map(Codepoint).ok_or_else(invalid)
    }
}

impl fmt::Display for Codepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0 as u32)
    }
}

impl From<char> for Codepoint {
    fn from(c: char) -> Self {
        Codepoint(c)
    }
}

/// Tokenizes a whitespace separated codepoint field.
///
/// Any invalid token fails the whole field.
pub fn parse(field: &str) -> Result<Vec<Codepoint>, Error> {
    field.split_whitespace().map(Codepoint::from_str).collect()
}

/// The text a rendering stack would receive for `codepoints`: the scalars
/// themselves, concatenated in order.
pub fn format(codepoints: &[Codepoint]) -> String {
    codepoints.iter().map(Codepoint::as_char).collect()
}

/// `1F468 200D 1F469`, for display.
pub fn to_hex(codepoints: &[Codepoint]) -> String {
    codepoints
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
