//! End-to-end tree conversion
//!
//! A `Converter` runs the full pipeline:
//! 1. Validate each bracketed tree
//! 2. Hand the batch to a `DependencyEngine` for relation lines
//! 3. Reconstruct one sentence per tree from the relation stream
//! 4. Check that every tree came back as exactly one sentence
//!
//! The engine is the only part that talks to the external converter, so
//! reconstruction can be driven directly from captured relation text with
//! `reconstruct_corpus` or, for large batches, `reconstruct_corpus_parallel`.

use crate::corpus::{Corpus, check_count};
use crate::error::ConversionError;
use crate::options::{Backend, ConversionOptions};
use crate::relation::{split_blocks, split_numbered_blocks};
use crate::sentence::Sentence;
use pariter::IteratorExt as _;

/// Source of dependency relation lines for a batch of trees.
///
/// Implementations return the converter's output for all `trees`, one
/// relation per line, with a blank line after each sentence. They must
/// honor `options.representation` and `options.universal`, and keep
/// punctuation relations whenever `options.engine_keeps_punct()` holds.
pub trait DependencyEngine {
    fn backend(&self) -> Backend;

    fn relation_lines(
        &self,
        trees: &[&str],
        options: &ConversionOptions,
    ) -> Result<Vec<String>, ConversionError>;
}

/// Converts Penn Treebank trees to dependency sentences through an engine
#[derive(Debug, Clone)]
pub struct Converter<E> {
    engine: E,
    options: ConversionOptions,
    parallel: bool,
}

impl<E: DependencyEngine> Converter<E> {
    pub fn new(engine: E) -> Self {
        Self::with_options(engine, ConversionOptions::default())
    }

    pub fn with_options(engine: E, options: ConversionOptions) -> Self {
        Self {
            engine,
            options,
            parallel: false,
        }
    }

    /// Reconstruct sentences on worker threads
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn backend(&self) -> Backend {
        self.engine.backend()
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Convert a single tree
    pub fn convert_tree(&self, tree: &str) -> Result<Sentence, ConversionError> {
        let corpus = self.convert_trees(&[tree])?;
        corpus
            .into_sentences()
            .pop()
            .ok_or_else(|| ConversionError::CountMismatch {
                expected: 1,
                found: 0,
            })
    }

    /// Convert a batch of trees, one sentence per tree in input order
    pub fn convert_trees<T: AsRef<str>>(&self, trees: &[T]) -> Result<Corpus, ConversionError> {
        let trees: Vec<&str> = trees.iter().map(AsRef::as_ref).collect();
        for tree in &trees {
            validate_tree(tree)?;
        }
        if trees.is_empty() {
            return Ok(Corpus::new());
        }

        log::debug!(
            "converting {} trees with {} backend ({})",
            trees.len(),
            self.engine.backend(),
            self.options.representation
        );
        let lines = self.engine.relation_lines(&trees, &self.options)?;

        if self.parallel {
            reconstruct_corpus_parallel(lines, &trees, &self.options)
        } else {
            reconstruct_corpus(lines, &trees, &self.options)
        }
    }
}

/// Check that a tree is a single balanced bracketed expression
pub fn validate_tree(tree: &str) -> Result<(), ConversionError> {
    let trimmed = tree.trim();
    if !trimmed.starts_with('(') {
        return Err(ConversionError::InvalidTree(tree.to_string()));
    }

    let mut depth: usize = 0;
    for c in trimmed.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ConversionError::InvalidTree(tree.to_string()))?;
            }
            _ => {}
        }
    }

    if depth == 0 {
        Ok(())
    } else {
        Err(ConversionError::InvalidTree(tree.to_string()))
    }
}

/// Reconstruct one sentence per tree from captured relation lines
pub fn reconstruct_corpus<I, T>(
    lines: I,
    trees: &[T],
    options: &ConversionOptions,
) -> Result<Corpus, ConversionError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    T: AsRef<str>,
{
    Corpus::from_stanford_dependencies(lines, trees, options)
}

/// Split relation lines into per-sentence blocks
pub fn split_relation_blocks<I>(lines: I) -> Vec<Vec<String>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    split_blocks(lines)
}

/// Reconstruct sentences on worker threads.
///
/// The stream is split into blocks first, so the number of blocks must
/// match the number of trees before any work starts. Output order follows
/// input order.
pub fn reconstruct_corpus_parallel<I, T>(
    lines: I,
    trees: &[T],
    options: &ConversionOptions,
) -> Result<Corpus, ConversionError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    T: AsRef<str>,
{
    let blocks = split_numbered_blocks(lines);
    check_count(trees.len(), blocks.len())?;

    let jobs: Vec<(Vec<(usize, String)>, String)> = blocks
        .into_iter()
        .zip(trees.iter().map(|tree| tree.as_ref().to_string()))
        .collect();

    let options = options.clone();
    let sentences: Vec<Sentence> = jobs
        .into_iter()
        .parallel_map(move |(block, tree)| {
            Sentence::from_numbered_lines(&mut block.into_iter(), &tree, &options)
                .inspect_err(|e| log::warn!("Failed to rebuild tree {:?}: {}", tree, e))
        })
        .collect::<Result<_, _>>()?;

    let produced = sentences.iter().filter(|s| !s.is_empty()).count();
    check_count(trees.len(), produced)?;

    Ok(Corpus::from_sentences(sentences))
}
