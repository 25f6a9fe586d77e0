//! Sentences and their reconstruction from converter output
//!
//! A sentence is rebuilt by merging one block of relation lines with the
//! tagged yield of the tree it came from. Relations may arrive in any order
//! and a word may have several governors; the result is sorted by index.

use crate::error::ConversionError;
use crate::options::ConversionOptions;
use crate::ptb::{TaggedWord, tagged_yield};
use crate::relation::{RelationLine, RelationTriple, classify_line};
use crate::token::{CopyMarks, Token};
use rustc_hash::FxHashSet;
use std::fmt;
use std::ops::Deref;

/// Relation label of punctuation tokens
pub const PUNCT_DEPREL: &str = "punct";

/// Relation label given to synthesized tokens for uncovered leaves
pub const ERASED_DEPREL: &str = "erased";

/// An ordered sequence of tokens
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Sentence {
    tokens: Vec<Token>,
}

impl Sentence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap tokens as given, without reordering
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Rebuild one sentence from a shared relation-line cursor and its tree.
    ///
    /// Consumes lines up to and including the blank line that ends this
    /// sentence (or to the end of the stream). Blank lines before the first
    /// relation are skipped. A malformed line is reported with its 1-based
    /// position counted from where the cursor stood.
    pub fn from_stanford_dependencies<I>(
        lines: &mut I,
        tree: &str,
        options: &ConversionOptions,
    ) -> Result<Self, ConversionError>
    where
        I: Iterator,
        I::Item: AsRef<str>,
    {
        let mut numbered = lines.by_ref().enumerate().map(|(i, line)| (i + 1, line));
        Self::from_numbered_lines(&mut numbered, tree, options)
    }

    /// As `from_stanford_dependencies`, over `(line number, line)` pairs
    pub(crate) fn from_numbered_lines<I, S>(
        lines: &mut I,
        tree: &str,
        options: &ConversionOptions,
    ) -> Result<Self, ConversionError>
    where
        I: Iterator<Item = (usize, S)>,
        S: AsRef<str>,
    {
        let words = tagged_yield(tree)?;
        let mut tokens = Vec::with_capacity(words.len());
        let mut covered: FxHashSet<usize> = FxHashSet::default();
        let mut n_relations = 0;

        for (line_num, line) in lines.by_ref() {
            let relation = match classify_line(line.as_ref()).map_err(|e| e.at_line(line_num))? {
                RelationLine::Blank if n_relations > 0 => break,
                RelationLine::Blank => continue,
                RelationLine::Relation(relation) => relation,
            };
            n_relations += 1;

            let word = lookup_dependent(&words, &relation)?;
            covered.insert(relation.dep_index);

            if !options.include_punct && relation.deprel == PUNCT_DEPREL {
                log::trace!("skipping punctuation {}-{}", relation.dep_form, relation.dep_index);
                continue;
            }

            tokens.push(relation_token(relation, word));
        }

        if options.include_erased {
            for (position, word) in words.iter().enumerate() {
                let index = position + 1;
                if !covered.contains(&index) {
                    log::debug!("synthesizing erased token {}-{}", word.word, index);
                    tokens.push(
                        Token::new(index, word.word.as_str())
                            .with_tag(word.tag.as_str())
                            .with_head(0, ERASED_DEPREL),
                    );
                }
            }
        }

        // Stable: words with several governors keep relation order
        tokens.sort_by_key(|token| token.index);

        log::debug!(
            "reconstructed {} tokens from {} relations over {} leaves",
            tokens.len(),
            n_relations,
            words.len()
        );

        Ok(Self { tokens })
    }

    /// Copy of this sentence without `punct` tokens
    pub fn without_punct(&self) -> Self {
        self.filtered(|token| !token.has_deprel(PUNCT_DEPREL))
    }

    /// Copy of this sentence keeping only tokens accepted by `keep`
    pub fn filtered(&self, keep: impl Fn(&Token) -> bool) -> Self {
        Self {
            tokens: self.tokens.iter().filter(|t| keep(*t)).cloned().collect(),
        }
    }

    /// All entries for one word index; several when the word has several
    /// governors
    pub fn tokens_at(&self, index: usize) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(move |token| token.index == index)
    }

    /// Tokens attached to the artificial root
    pub fn roots(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|token| token.is_root())
    }

    /// Tokens governed by the word at `index`
    pub fn dependents(&self, index: usize) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(move |token| token.head == index)
    }

    /// True if no word index appears more than once
    pub fn is_tree(&self) -> bool {
        let mut seen = FxHashSet::default();
        self.tokens.iter().all(|token| seen.insert(token.index))
    }

    pub fn as_conll(&self) -> String {
        self.to_string()
    }
}

fn lookup_dependent<'a>(
    words: &'a [TaggedWord],
    relation: &RelationTriple,
) -> Result<&'a TaggedWord, ConversionError> {
    let word = relation
        .dep_index
        .checked_sub(1)
        .and_then(|position| words.get(position));

    match word {
        Some(word) if word.word == relation.dep_form => Ok(word),
        Some(word) => Err(ConversionError::Consistency {
            index: relation.dep_index,
            expected: word.word.clone(),
            found: relation.dep_form.clone(),
        }),
        None => Err(ConversionError::Consistency {
            index: relation.dep_index,
            expected: format!("one of {} leaves", words.len()),
            found: relation.dep_form.clone(),
        }),
    }
}

fn relation_token(relation: RelationTriple, word: &TaggedWord) -> Token {
    let marks = CopyMarks {
        gov_copies: relation.gov_copies,
        dep_copies: relation.dep_copies,
    };
    let mut token = Token::new(relation.dep_index, relation.dep_form)
        .with_tag(word.tag.as_str())
        .with_head(relation.gov_index, relation.deprel);
    if !marks.is_empty() {
        token.extra = Some(marks);
    }
    token
}

impl Deref for Sentence {
    type Target = [Token];

    fn deref(&self) -> &Self::Target {
        &self.tokens
    }
}

impl IntoIterator for Sentence {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a> IntoIterator for &'a Sentence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl FromIterator<Token> for Sentence {
    fn from_iter<T: IntoIterator<Item = Token>>(iter: T) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

/// CoNLL-X block: one line per token, no trailing newline
impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}
