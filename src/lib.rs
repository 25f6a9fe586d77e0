//! Treedeps: Penn Treebank trees to dependency sentences
//!
//! Rebuilds Stanford / Universal Dependencies sentences from converter
//! relation output and the bracketed trees it came from, and reads and
//! writes them as CoNLL-X. Core implementation in Rust with Python bindings.

// Core modules
pub mod conllx; // CoNLL-X line codec and sentence reader
pub mod convert; // End-to-end conversion through a dependency engine
pub mod corpus; // Sentence sequences, reconstruction in lockstep with trees
pub mod error;
pub mod options; // Representation, backend and token policies
pub mod ptb; // Tagged yield of bracketed trees
pub mod relation; // Relation line grammar
pub mod sentence; // Sentence reconstruction and queries
pub mod token; // Token record (one CoNLL-X line)
pub mod treebank; // CoNLL-X sources: string, files, glob

// Python bindings
#[cfg(feature = "pyo3")]
pub mod python;

// Re-exports for convenience
pub use conllx::ConllxReader;
pub use convert::{
    Converter, DependencyEngine, reconstruct_corpus, reconstruct_corpus_parallel,
    split_relation_blocks, validate_tree,
};
pub use corpus::Corpus;
pub use error::ConversionError;
pub use options::{Backend, ConversionOptions, Representation};
pub use ptb::{TaggedWord, tagged_yield};
pub use relation::{RelationTriple, parse_relation};
pub use sentence::Sentence;
pub use token::{CopyMarks, Token};
pub use treebank::Treebank;
