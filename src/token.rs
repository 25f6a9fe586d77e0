//! CoNLL-X token record
//!
//! A `Token` is one dependency-annotated word. Every column that may be
//! missing in CoNLL-X is an `Option`, so "absent" is part of the type
//! rather than a sentinel string.

use crate::conllx;
use crate::error::ConversionError;
use std::fmt;
use std::str::FromStr;

/// CoNLL-X column names, in serialization order
pub const FIELD_NAMES: [&str; 10] = [
    "index", "form", "lemma", "cpos", "pos", "feats", "head", "deprel", "phead", "pdeprel",
];

/// Copy-node markers from a relation line such as `nsubj(sells-4', Ed-1)`.
///
/// Counts are the number of trailing apostrophes on the governor and
/// dependent indices. Never serialized to CoNLL-X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CopyMarks {
    pub gov_copies: usize,
    pub dep_copies: usize,
}

impl CopyMarks {
    pub fn is_empty(&self) -> bool {
        self.gov_copies == 0 && self.dep_copies == 0
    }
}

/// A dependency-annotated word
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// 1-based position in the sentence
    pub index: usize,
    pub form: String,
    pub lemma: Option<String>,
    pub cpos: Option<String>,
    pub pos: Option<String>,
    pub feats: Option<Vec<String>>,
    /// Index of the governor, 0 for the sentence root
    pub head: usize,
    pub deprel: Option<String>,
    pub phead: Option<usize>,
    pub pdeprel: Option<String>,
    /// Copy-node marks from reconstruction.
    ///
    /// Compared by `==` but not written to CoNLL-X, so a token with marks
    /// does not equal its own parsed serialization.
    pub extra: Option<CopyMarks>,
}

impl Token {
    /// Create a root-attached token with only `index` and `form` set
    pub fn new(index: usize, form: impl Into<String>) -> Self {
        Self {
            index,
            form: form.into(),
            lemma: None,
            cpos: None,
            pos: None,
            feats: None,
            head: 0,
            deprel: None,
            phead: None,
            pdeprel: None,
            extra: None,
        }
    }

    /// Set both coarse and fine POS to the same tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        self.cpos = Some(tag.clone());
        self.pos = Some(tag);
        self
    }

    pub fn with_head(mut self, head: usize, deprel: impl Into<String>) -> Self {
        self.head = head;
        self.deprel = Some(deprel.into());
        self
    }

    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    pub fn with_feats<I, S>(mut self, feats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feats = Some(feats.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_root(&self) -> bool {
        self.head == 0
    }

    /// True if this token's relation is `deprel`
    pub fn has_deprel(&self, deprel: &str) -> bool {
        self.deprel.as_deref() == Some(deprel)
    }

    /// Render as one CoNLL-X line (no trailing newline)
    pub fn as_conll(&self) -> String {
        self.to_string()
    }

    /// Parse one CoNLL-X line
    pub fn from_conll(line: &str) -> Result<Self, ConversionError> {
        conllx::parse_line(line)
    }

    /// Labeled-field form listing only present fields, e.g.
    /// `Token(index=1, form='a', cpos='DT', pos='DT', head=2, deprel='det')`
    pub fn repr(&self) -> String {
        let feats = self.feats.as_ref().map(|feats| {
            let quoted: Vec<String> = feats.iter().map(|f| quote(f)).collect();
            if quoted.len() == 1 {
                format!("({},)", quoted[0])
            } else {
                format!("({})", quoted.join(", "))
            }
        });
        // One rendered value per column, in FIELD_NAMES order
        let values = [
            Some(self.index.to_string()),
            Some(quote(&self.form)),
            self.lemma.as_deref().map(quote),
            self.cpos.as_deref().map(quote),
            self.pos.as_deref().map(quote),
            feats,
            Some(self.head.to_string()),
            self.deprel.as_deref().map(quote),
            self.phead.map(|phead| phead.to_string()),
            self.pdeprel.as_deref().map(quote),
        ];

        let mut fields: Vec<String> = FIELD_NAMES
            .iter()
            .zip(values)
            .filter_map(|(name, value)| value.map(|value| format!("{}={}", name, value)))
            .collect();
        if let Some(extra) = self.extra.filter(|e| !e.is_empty()) {
            let mut marks = Vec::new();
            if extra.gov_copies > 0 {
                marks.push(format!("'gov_is_copy': {}", extra.gov_copies));
            }
            if extra.dep_copies > 0 {
                marks.push(format!("'dep_is_copy': {}", extra.dep_copies));
            }
            fields.push(format!("extra={{{}}}", marks.join(", ")));
        }
        format!("Token({})", fields.join(", "))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        conllx::write_token(f, self)
    }
}

impl FromStr for Token {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        conllx::parse_line(s)
    }
}

// Quote like a Python string literal: single quotes unless the text
// contains a single quote and no double quote.
fn quote(s: &str) -> String {
    let delim = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}
