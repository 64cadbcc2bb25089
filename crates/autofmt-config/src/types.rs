use std::fmt;
use std::str::FromStr;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Separator
// ---------------------------------------------------------------------------

/// Slot separator parsed from a one-character string like `" "` or `"|"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separator(char);

impl Separator {
    pub fn as_char(&self) -> char {
        self.0
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self(' ')
    }
}

impl From<Separator> for char {
    fn from(sep: Separator) -> Self {
        sep.0
    }
}

impl TryFrom<char> for Separator {
    type Error = anyhow::Error;

    fn try_from(c: char) -> anyhow::Result<Self> {
        if c == '{' || c == '}' {
            anyhow::bail!("separator {c:?} would be read as a template brace");
        }
        Ok(Self(c))
    }
}

impl FromStr for Separator {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            (None, _) => anyhow::bail!("empty separator string"),
            (Some(_), Some(_)) => {
                anyhow::bail!("separator must be a single character, got {s:?}")
            }
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Separator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Separator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_char() {
        assert_eq!(" ".parse::<Separator>().unwrap().as_char(), ' ');
        assert_eq!("|".parse::<Separator>().unwrap().as_char(), '|');
        assert_eq!("→".parse::<Separator>().unwrap().as_char(), '→');
    }

    #[test]
    fn reject_empty_long_and_braces() {
        assert!("".parse::<Separator>().is_err());
        assert!(", ".parse::<Separator>().is_err());
        assert!("{".parse::<Separator>().is_err());
        assert!("}".parse::<Separator>().is_err());
    }

    #[test]
    fn display_roundtrip() {
        let sep: Separator = ";".parse().unwrap();
        assert_eq!(sep.to_string(), ";");
    }
}
