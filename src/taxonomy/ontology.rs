//! Class names, axioms, and ontologies of the told-subsumption backend.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{TaxonomyError, TaxonomyResult};

/// Keyword of a subclass axiom and of subsumption queries.
pub const SUBCLASS_OF: &str = "SubClassOf";
/// Keyword of an equivalence axiom.
pub const EQUIVALENT_TO: &str = "EquivalentTo";

/// A validated class name: non-empty, no whitespace or control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassName(String);

impl ClassName {
    /// Create a class name.
    ///
    /// Returns `None` if `name` is empty or contains whitespace or control characters.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        let valid = !name.is_empty()
            && !name.chars().any(|c| c.is_whitespace() || c.is_control());
        valid.then_some(ClassName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `sub ⊑ sup`: both the query and the conclusion type of the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Subsumption {
    pub sub: ClassName,
    pub sup: ClassName,
}

impl Subsumption {
    pub fn new(sub: ClassName, sup: ClassName) -> Self {
        Self { sub, sup }
    }
}

impl fmt::Display for Subsumption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {SUBCLASS_OF} {}", self.sub, self.sup)
    }
}

/// An ontology axiom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Axiom {
    SubClassOf { sub: ClassName, sup: ClassName },
    EquivalentClasses { first: ClassName, second: ClassName },
}

impl Axiom {
    pub fn subclass_of(sub: ClassName, sup: ClassName) -> Self {
        Axiom::SubClassOf { sub, sup }
    }

    pub fn equivalent(first: ClassName, second: ClassName) -> Self {
        Axiom::EquivalentClasses { first, second }
    }

    /// The subsumptions this axiom asserts directly.
    pub fn told(&self) -> Vec<Subsumption> {
        match self {
            Axiom::SubClassOf { sub, sup } => vec![Subsumption::new(sub.clone(), sup.clone())],
            Axiom::EquivalentClasses { first, second } => vec![
                Subsumption::new(first.clone(), second.clone()),
                Subsumption::new(second.clone(), first.clone()),
            ],
        }
    }

    /// The classes this axiom mentions.
    pub fn classes(&self) -> [&ClassName; 2] {
        match self {
            Axiom::SubClassOf { sub, sup } => [sub, sup],
            Axiom::EquivalentClasses { first, second } => [first, second],
        }
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axiom::SubClassOf { sub, sup } => write!(f, "{sub} {SUBCLASS_OF} {sup}"),
            Axiom::EquivalentClasses { first, second } => {
                write!(f, "{first} {EQUIVALENT_TO} {second}")
            }
        }
    }
}

impl FromStr for Axiom {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let [first, keyword, second] = tokens[..] else {
            return Err(format!("expected 3 tokens, found {}", tokens.len()));
        };
        let class = |name: &str| {
            ClassName::new(name).ok_or_else(|| format!("invalid class name `{name}`"))
        };
        match keyword {
            SUBCLASS_OF => Ok(Axiom::subclass_of(class(first)?, class(second)?)),
            EQUIVALENT_TO => Ok(Axiom::equivalent(class(first)?, class(second)?)),
            other => Err(format!(
                "unknown axiom keyword `{other}`, expected `{SUBCLASS_OF}` or `{EQUIVALENT_TO}`"
            )),
        }
    }
}

/// A set of axioms plus the classes they mention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ontology {
    axioms: Vec<Axiom>,
    signature: BTreeSet<ClassName>,
}

impl Ontology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an axiom. Returns `false` if it was already present.
    pub fn add(&mut self, axiom: Axiom) -> bool {
        if self.axioms.contains(&axiom) {
            return false;
        }
        for class in axiom.classes() {
            self.signature.insert(class.clone());
        }
        self.axioms.push(axiom);
        true
    }

    /// Parse one axiom per line; blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> TaxonomyResult<Self> {
        let mut ontology = Self::new();
        for (index, line) in text.lines().enumerate() {
            let content = line.split('#').next().unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }
            let axiom = content.parse().map_err(|message| TaxonomyError::Parse {
                line: index + 1,
                message,
            })?;
            ontology.add(axiom);
        }
        Ok(ontology)
    }

    /// Read and parse an ontology file.
    pub fn load(path: &Path) -> TaxonomyResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| TaxonomyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let ontology = Self::parse(&text)?;
        tracing::info!(
            path = %path.display(),
            axioms = ontology.axioms.len(),
            classes = ontology.signature.len(),
            "loaded ontology"
        );
        Ok(ontology)
    }

    /// Axioms in insertion order, without duplicates.
    pub fn axioms(&self) -> &[Axiom] {
        &self.axioms
    }

    pub fn signature(&self) -> &BTreeSet<ClassName> {
        &self.signature
    }

    pub fn contains_class(&self, class: &ClassName) -> bool {
        self.signature.contains(class)
    }
}

impl FromIterator<Axiom> for Ontology {
    fn from_iter<T: IntoIterator<Item = Axiom>>(iter: T) -> Self {
        let mut ontology = Self::new();
        for axiom in iter {
            ontology.add(axiom);
        }
        ontology
    }
}
