//! Decoding `<Sub> SubClassOf <Sup>` query strings.

use std::collections::BTreeSet;

use crate::decoder::QueryFactory;
use crate::error::DecodeError;

use super::ontology::{ClassName, Ontology, SUBCLASS_OF, Subsumption};

/// Builds [`Subsumption`] queries from three fields: sub, keyword, sup.
///
/// When bound to a signature, classes outside it are rejected at decode time.
#[derive(Debug, Clone, Default)]
pub struct SubsumptionQueryFactory {
    signature: Option<BTreeSet<ClassName>>,
}

impl SubsumptionQueryFactory {
    /// A factory accepting any well-formed class name.
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory accepting only classes of `ontology`.
    pub fn bound_to(ontology: &Ontology) -> Self {
        Self {
            signature: Some(ontology.signature().clone()),
        }
    }

    fn class(&self, name: &str) -> Result<ClassName, DecodeError> {
        let class = ClassName::new(name).ok_or_else(|| DecodeError::InvalidName {
            name: name.to_string(),
            reason: "class names must be non-empty and free of whitespace".into(),
        })?;
        match &self.signature {
            Some(signature) if !signature.contains(&class) => Err(DecodeError::UnknownEntity {
                name: name.to_string(),
            }),
            _ => Ok(class),
        }
    }
}

impl QueryFactory for SubsumptionQueryFactory {
    type Query = Subsumption;

    fn arity(&self) -> usize {
        3
    }

    fn create(&self, fields: &[&str]) -> Result<Subsumption, DecodeError> {
        let [sub, keyword, sup] = fields else {
            return Err(DecodeError::FieldCount {
                expected: 3,
                actual: fields.len(),
            });
        };
        if *keyword != SUBCLASS_OF {
            return Err(DecodeError::UnexpectedToken {
                index: 1,
                expected: SUBCLASS_OF.to_string(),
                found: keyword.to_string(),
            });
        }
        Ok(Subsumption::new(self.class(sub)?, self.class(sup)?))
    }
}
