//! Conversion settings
//!
//! `ConversionOptions` carries the punctuation and erased-token policies used
//! by reconstruction, plus what an engine needs to produce relation lines.

use crate::error::ConversionError;
use std::fmt;
use std::str::FromStr;

/// Dependency representation requested from the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Representation {
    #[default]
    Basic,
    Collapsed,
    CcProcessed,
    CollapsedTree,
}

impl Representation {
    pub const ALL: [Representation; 4] = [
        Representation::Basic,
        Representation::Collapsed,
        Representation::CcProcessed,
        Representation::CollapsedTree,
    ];

    /// Name as used by the converter's command-line flags
    pub fn as_str(&self) -> &'static str {
        match self {
            Representation::Basic => "basic",
            Representation::Collapsed => "collapsed",
            Representation::CcProcessed => "CCprocessed",
            Representation::CollapsedTree => "collapsedTree",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Representation {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Representation::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ConversionError::UnknownRepresentation(s.to_string()))
    }
}

/// Which kind of engine produces relation lines.
///
/// Selection is always explicit: a failing engine is reported, never
/// silently swapped for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// One converter process per batch of trees
    Subprocess,
    /// Converter hosted in-process through a language bridge
    InProcess,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Subprocess => f.write_str("subprocess"),
            Backend::InProcess => f.write_str("in-process"),
        }
    }
}

impl FromStr for Backend {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subprocess" => Ok(Backend::Subprocess),
            "in-process" | "jpype" => Ok(Backend::InProcess),
            _ => Err(ConversionError::UnknownBackend(s.to_string())),
        }
    }
}

/// Options for converting trees and reconstructing sentences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOptions {
    pub representation: Representation,
    /// Emit tokens labeled `punct`
    pub include_punct: bool,
    /// Synthesize tokens for leaves that no relation covers
    pub include_erased: bool,
    /// Universal Dependencies rather than original Stanford Dependencies
    pub universal: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            representation: Representation::Basic,
            include_punct: true,
            include_erased: false,
            universal: true,
        }
    }
}

impl ConversionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }

    pub fn include_punct(mut self, include_punct: bool) -> Self {
        self.include_punct = include_punct;
        self
    }

    pub fn include_erased(mut self, include_erased: bool) -> Self {
        self.include_erased = include_erased;
        self
    }

    pub fn universal(mut self, universal: bool) -> Self {
        self.universal = universal;
        self
    }

    /// Engines must keep punctuation in their output whenever erased tokens
    /// are wanted, or punctuation leaves would be mistaken for erased ones.
    pub fn engine_keeps_punct(&self) -> bool {
        self.include_punct || self.include_erased
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_representation_names() {
        for representation in Representation::ALL {
            let parsed: Representation = representation.as_str().parse().unwrap();
            assert_eq!(parsed, representation);
        }
        assert_eq!(Representation::CcProcessed.to_string(), "CCprocessed");
    }

    #[test]
    fn test_unknown_representation() {
        assert!(matches!(
            "bogus".parse::<Representation>(),
            Err(ConversionError::UnknownRepresentation(name)) if name == "bogus"
        ));
        // Names are case sensitive
        assert!("Basic".parse::<Representation>().is_err());
    }

    #[test]
    fn test_backend_names() {
        assert_eq!("subprocess".parse::<Backend>().unwrap(), Backend::Subprocess);
        assert_eq!("jpype".parse::<Backend>().unwrap(), Backend::InProcess);
        assert_eq!("in-process".parse::<Backend>().unwrap(), Backend::InProcess);
        assert!(matches!(
            "bogus".parse::<Backend>(),
            Err(ConversionError::UnknownBackend(_))
        ));
    }

    #[test]
    fn test_defaults_and_builder() {
        let options = ConversionOptions::default();
        assert_eq!(options.representation, Representation::Basic);
        assert!(options.include_punct);
        assert!(!options.include_erased);
        assert!(options.universal);

        let options = ConversionOptions::new()
            .representation(Representation::CollapsedTree)
            .include_punct(false)
            .include_erased(true);
        assert_eq!(options.representation, Representation::CollapsedTree);
        assert!(options.engine_keeps_punct());
        assert!(!ConversionOptions::new().include_punct(false).engine_keeps_punct());
    }
}
