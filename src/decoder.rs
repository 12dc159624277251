//! Query decoding: opaque query strings into typed queries.
//!
//! The decoder only validates the *shape* of a raw query (non-empty, the
//! expected number of delimiter-separated fields, no empty fields). What the
//! fields mean is up to a pluggable [`QueryFactory`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Field separator of raw queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Delimiter {
    /// Any run of whitespace separates fields.
    #[default]
    Whitespace,
    /// A single character separates fields; surrounding whitespace is trimmed.
    Char(char),
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Whitespace => write!(f, "whitespace"),
            Delimiter::Char('\t') => write!(f, "tab"),
            Delimiter::Char(c) => write!(f, "{c}"),
        }
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whitespace" | "space" => Ok(Delimiter::Whitespace),
            "tab" | "\t" => Ok(Delimiter::Char('\t')),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_whitespace() => Ok(Delimiter::Char(c)),
                    _ => Err(format!(
                        "delimiter must be `whitespace`, `tab`, or a single character, got `{s}`"
                    )),
                }
            }
        }
    }
}

impl TryFrom<String> for Delimiter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Delimiter> for String {
    fn from(value: Delimiter) -> Self {
        value.to_string()
    }
}

/// Interprets the fields of a decoded query.
pub trait QueryFactory {
    type Query;

    /// Number of fields a raw query must have.
    fn arity(&self) -> usize;

    /// Build the typed query. `fields.len() == self.arity()` and no field is empty.
    fn create(&self, fields: &[&str]) -> Result<Self::Query, DecodeError>;
}

impl<F: QueryFactory + ?Sized> QueryFactory for &F {
    type Query = F::Query;

    fn arity(&self) -> usize {
        (**self).arity()
    }

    fn create(&self, fields: &[&str]) -> Result<Self::Query, DecodeError> {
        (**self).create(fields)
    }
}

/// Splits raw query strings and hands the fields to a factory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryDecoder {
    delimiter: Delimiter,
}

impl QueryDecoder {
    pub fn new(delimiter: Delimiter) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    /// Split `raw` into trimmed fields.
    pub fn split<'r>(&self, raw: &'r str) -> Result<Vec<&'r str>, DecodeError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DecodeError::Empty);
        }
        let fields: Vec<&str> = match self.delimiter {
            Delimiter::Whitespace => raw.split_whitespace().collect(),
            Delimiter::Char(c) => raw.split(c).map(str::trim).collect(),
        };
        if let Some(index) = fields.iter().position(|f| f.is_empty()) {
            return Err(DecodeError::EmptyField { index });
        }
        Ok(fields)
    }

    /// Decode `raw` into a typed query using `factory`.
    pub fn decode<F>(&self, raw: &str, factory: &F) -> Result<F::Query, DecodeError>
    where
        F: QueryFactory + ?Sized,
    {
        let fields = self.split(raw)?;
        let expected = factory.arity();
        if fields.len() != expected {
            return Err(DecodeError::FieldCount {
                expected,
                actual: fields.len(),
            });
        }
        factory.create(&fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A pair of integers, e.g. `"3,4"`.
    struct PairFactory;

    impl QueryFactory for PairFactory {
        type Query = (u32, u32);

        fn arity(&self) -> usize {
            2
        }

        fn create(&self, fields: &[&str]) -> Result<(u32, u32), DecodeError> {
            let parse = |index: usize| {
                fields[index].parse::<u32>().map_err(|e| DecodeError::InvalidName {
                    name: fields[index].to_string(),
                    reason: e.to_string(),
                })
            };
            Ok((parse(0)?, parse(1)?))
        }
    }

    fn csv() -> QueryDecoder {
        QueryDecoder::new(Delimiter::Char(','))
    }

    #[test]
    fn decodes_well_formed_queries() {
        assert_eq!(csv().decode("3,4", &PairFactory), Ok((3, 4)));
        assert_eq!(csv().decode("  3 , 4 \n", &PairFactory), Ok((3, 4)));
        assert_eq!(QueryDecoder::default().decode("3 \t 4", &PairFactory), Ok((3, 4)));
    }

    #[test]
    fn rejects_shape_errors() {
        assert_eq!(csv().decode("", &PairFactory), Err(DecodeError::Empty));
        assert_eq!(csv().decode("   ", &PairFactory), Err(DecodeError::Empty));
        assert_eq!(
            csv().decode("1,2,3", &PairFactory),
            Err(DecodeError::FieldCount {
                expected: 2,
                actual: 3
            })
        );
        assert_eq!(csv().decode("1,,2", &PairFactory), Err(DecodeError::EmptyField { index: 1 }));
        assert_eq!(csv().decode("1,", &PairFactory), Err(DecodeError::EmptyField { index: 1 }));
    }

    #[test]
    fn factory_errors_pass_through() {
        let err = csv().decode("1,x", &PairFactory).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidName { ref name, .. } if name == "x"));
    }

    #[test]
    fn decoding_is_deterministic() {
        let decoder = csv();
        let first = decoder.decode("7,9", &PairFactory);
        assert_eq!(decoder.decode("7,9", &PairFactory), first);
    }

    #[test]
    fn delimiter_parsing() {
        assert_eq!("whitespace".parse(), Ok(Delimiter::Whitespace));
        assert_eq!("tab".parse(), Ok(Delimiter::Char('\t')));
        assert_eq!(",".parse(), Ok(Delimiter::Char(',')));
        assert!(";;".parse::<Delimiter>().is_err());
        assert!(" ".parse::<Delimiter>().is_err());
        assert_eq!(Delimiter::Char('\t').to_string().parse(), Ok(Delimiter::Char('\t')));
    }
}
