//! CoNLL-X sentence sources
//!
//! A `Treebank` reads sentences from a string, a file, several files, or a
//! glob pattern. Open and parse failures are yielded as errors rather than
//! skipped, so a partial corpus is never mistaken for a complete one.

use crate::conllx::ConllxReader;
use crate::corpus::Corpus;
use crate::error::ConversionError;
use crate::sentence::Sentence;
use std::path::{Path, PathBuf};

pub type SentenceIter = Box<dyn Iterator<Item = Result<Sentence, ConversionError>> + Send>;

/// Source of sentences
#[derive(Debug, Clone)]
enum SentenceSource {
    /// In-memory CoNLL-X text
    String(String),
    /// Single file path
    File(PathBuf),
    /// Multiple file paths (from glob or explicit paths)
    Files(Vec<PathBuf>),
}

/// Collection of CoNLL-X sentences from a string, file, or glob pattern
///
/// # Examples
///
/// ```no_run
/// use treedeps::Treebank;
/// use pariter::IteratorExt as _;
///
/// // Sequential iteration
/// for sentence in Treebank::from_file("data.conll") {
///     println!("{} tokens", sentence.unwrap().len());
/// }
///
/// // Parallel iteration
/// let count = Treebank::from_glob("data/*.conll.gz")
///     .unwrap()
///     .into_iter()
///     .parallel_map(|sentence| sentence.map(|s| s.len()))
///     .count();
/// ```
#[derive(Debug, Clone)]
pub struct Treebank {
    source: SentenceSource,
}

impl Treebank {
    /// Create from in-memory CoNLL-X text
    pub fn from_string(text: &str) -> Self {
        Self {
            source: SentenceSource::String(text.to_string()),
        }
    }

    /// Create from a single file path (`.gz` is decompressed)
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self {
            source: SentenceSource::File(path.as_ref().to_path_buf()),
        }
    }

    /// Create from a glob pattern
    ///
    /// Files are processed in sorted order for deterministic results. An
    /// entry the glob walk cannot read fails the whole call.
    pub fn from_glob(pattern: &str) -> Result<Self, ConversionError> {
        let mut file_paths = glob::glob(pattern)?
            .map(|entry| entry.inspect_err(|e| log::warn!("Failed to read {:?}: {}", e.path(), e)))
            .collect::<Result<Vec<PathBuf>, _>>()?;
        file_paths.sort();
        Ok(Self::from_paths(file_paths))
    }

    /// Create from explicit file paths
    pub fn from_paths(file_paths: Vec<PathBuf>) -> Self {
        Self {
            source: SentenceSource::Files(file_paths),
        }
    }

    pub fn iter(&self) -> SentenceIter {
        self.clone().into_iter()
    }

    /// Read every sentence, failing on the first error
    pub fn corpus(&self) -> Result<Corpus, ConversionError> {
        self.iter().collect()
    }
}

impl IntoIterator for Treebank {
    type Item = Result<Sentence, ConversionError>;
    type IntoIter = SentenceIter;

    fn into_iter(self) -> Self::IntoIter {
        match self.source {
            SentenceSource::String(text) => Box::new(ConllxReader::from_string(&text)),
            SentenceSource::File(path) => open_file_sentences(path),
            SentenceSource::Files(paths) => Box::new(paths.into_iter().flat_map(open_file_sentences)),
        }
    }
}

/// Helper: Open a file and return an iterator over its sentences
///
/// An open failure becomes a single error item.
fn open_file_sentences(path: PathBuf) -> SentenceIter {
    match ConllxReader::from_file(&path) {
        Ok(reader) => Box::new(reader),
        Err(e) => {
            log::warn!("Failed to open {:?}: {}", path, e);
            Box::new(std::iter::once(Err(e)))
        }
    }
}
