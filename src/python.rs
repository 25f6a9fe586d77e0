//! Python bindings for treedeps
//!
//! This module provides PyO3-based Python bindings for the Rust core.

use pyo3::exceptions::{PyIOError, PyIndexError, PyValueError};
use pyo3::prelude::*;
use std::path::PathBuf;

use crate::corpus::Corpus;
use crate::error::ConversionError;
use crate::options::{ConversionOptions, Representation};
use crate::sentence::Sentence;
use crate::token::Token;
use crate::treebank::Treebank;

/// Convert ConversionError to Python exception
impl From<ConversionError> for PyErr {
    fn from(err: ConversionError) -> PyErr {
        match err {
            ConversionError::Io(e) => PyIOError::new_err(e.to_string()),
            ConversionError::FileOpen { path, source } => PyIOError::new_err(format!(
                "Failed to open file {}: {}",
                path.display(),
                source
            )),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

#[pyclass(name = "Token")]
#[derive(Clone)]
pub struct PyToken {
    pub(crate) inner: Token,
}

#[pymethods]
impl PyToken {
    /// Parse a single CoNLL-X line.
    #[classmethod]
    fn from_conll(_cls: &Bound<'_, pyo3::types::PyType>, line: &str) -> PyResult<Self> {
        Ok(PyToken {
            inner: Token::from_conll(line)?,
        })
    }

    #[getter]
    fn index(&self) -> usize {
        self.inner.index
    }

    #[getter]
    fn form(&self) -> String {
        self.inner.form.clone()
    }

    #[getter]
    fn lemma(&self) -> Option<String> {
        self.inner.lemma.clone()
    }

    #[getter]
    fn cpos(&self) -> Option<String> {
        self.inner.cpos.clone()
    }

    #[getter]
    fn pos(&self) -> Option<String> {
        self.inner.pos.clone()
    }

    #[getter]
    fn feats(&self) -> Option<Vec<String>> {
        self.inner.feats.clone()
    }

    #[getter]
    fn head(&self) -> usize {
        self.inner.head
    }

    #[getter]
    fn deprel(&self) -> Option<String> {
        self.inner.deprel.clone()
    }

    #[getter]
    fn phead(&self) -> Option<usize> {
        self.inner.phead
    }

    #[getter]
    fn pdeprel(&self) -> Option<String> {
        self.inner.pdeprel.clone()
    }

    /// Copy-node marks as a dict, or None.
    #[getter]
    fn extra(&self) -> Option<std::collections::HashMap<String, usize>> {
        self.inner.extra.as_ref().map(|marks| {
            let mut extra = std::collections::HashMap::new();
            if marks.gov_copies > 0 {
                extra.insert("gov_is_copy".to_string(), marks.gov_copies);
            }
            if marks.dep_copies > 0 {
                extra.insert("dep_is_copy".to_string(), marks.dep_copies);
            }
            extra
        })
    }

    fn as_conll(&self) -> String {
        self.inner.as_conll()
    }

    fn __eq__(&self, other: &PyToken) -> bool {
        self.inner == other.inner
    }

    fn __repr__(&self) -> String {
        self.inner.repr()
    }
}

#[pyclass(name = "Sentence")]
#[derive(Clone)]
pub struct PySentence {
    pub(crate) inner: Sentence,
}

#[pymethods]
impl PySentence {
    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __getitem__(&self, position: usize) -> PyResult<PyToken> {
        self.inner
            .get(position)
            .map(|token| PyToken {
                inner: token.clone(),
            })
            .ok_or_else(|| PyIndexError::new_err(format!("token position out of range: {}", position)))
    }

    fn tokens(&self) -> Vec<PyToken> {
        self.inner
            .iter()
            .map(|token| PyToken {
                inner: token.clone(),
            })
            .collect()
    }

    /// Copy of the sentence without `punct` tokens.
    fn without_punct(&self) -> PySentence {
        PySentence {
            inner: self.inner.without_punct(),
        }
    }

    fn is_tree(&self) -> bool {
        self.inner.is_tree()
    }

    fn as_conll(&self) -> String {
        self.inner.as_conll()
    }

    fn __eq__(&self, other: &PySentence) -> bool {
        self.inner == other.inner
    }

    fn __repr__(&self) -> String {
        let forms: Vec<&str> = self.inner.iter().take(3).map(|t| t.form.as_str()).collect();
        if self.inner.len() > 3 {
            format!("<Sentence len={} words='{} ...'>", self.inner.len(), forms.join(" "))
        } else {
            format!("<Sentence len={} words='{}'>", self.inner.len(), forms.join(" "))
        }
    }
}

/// A sequence of dependency-annotated sentences.
#[pyclass(name = "Corpus")]
#[derive(Clone)]
pub struct PyCorpus {
    inner: Corpus,
}

#[pymethods]
impl PyCorpus {
    /// Parse CoNLL-X text.
    ///
    /// Raises:
    ///     ValueError: If a line is malformed
    #[classmethod]
    fn from_conll(_cls: &Bound<'_, pyo3::types::PyType>, text: &str) -> PyResult<Self> {
        Ok(PyCorpus {
            inner: Corpus::from_conll_str(text)?,
        })
    }

    /// Read a CoNLL-X file.
    ///
    /// Automatically detects and handles gzip-compressed files (.gz).
    #[classmethod]
    fn from_file(_cls: &Bound<'_, pyo3::types::PyType>, file_path: &str) -> PyResult<Self> {
        Ok(PyCorpus {
            inner: Corpus::from_file(PathBuf::from(file_path))?,
        })
    }

    /// Read every CoNLL-X file matching a glob pattern, in sorted order.
    #[classmethod]
    fn from_glob(_cls: &Bound<'_, pyo3::types::PyType>, pattern: &str) -> PyResult<Self> {
        Ok(PyCorpus {
            inner: Treebank::from_glob(pattern)?.corpus()?,
        })
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __getitem__(&self, position: usize) -> PyResult<PySentence> {
        self.inner
            .get(position)
            .map(|sentence| PySentence {
                inner: sentence.clone(),
            })
            .ok_or_else(|| {
                PyIndexError::new_err(format!("sentence position out of range: {}", position))
            })
    }

    fn sentences(&self) -> Vec<PySentence> {
        self.inner
            .iter()
            .map(|sentence| PySentence {
                inner: sentence.clone(),
            })
            .collect()
    }

    fn as_conll(&self) -> String {
        self.inner.as_conll()
    }

    /// Write CoNLL-X text, gzip-compressed if the name ends in .gz.
    fn to_file(&self, file_path: &str) -> PyResult<()> {
        Ok(self.inner.to_file(PathBuf::from(file_path))?)
    }

    fn __repr__(&self) -> String {
        format!(
            "<Corpus sentences={} tokens={}>",
            self.inner.len(),
            self.inner.n_tokens()
        )
    }
}

/// Reconstruct a corpus from converter output.
///
/// Args:
///     lines: Relation lines, blank line after each sentence
///     trees: Bracketed trees, one per sentence
///     include_erased: Add tokens for leaves no relation covers
///     include_punct: Keep tokens labeled punct
///     representation: basic, collapsed, CCprocessed or collapsedTree
///
/// Returns:
///     Corpus with one sentence per tree
///
/// Raises:
///     ValueError: If the output and trees disagree
#[pyfunction]
#[pyo3(signature = (lines, trees, include_erased=false, include_punct=true, representation="basic"))]
fn from_stanford_dependencies(
    lines: Vec<String>,
    trees: Vec<String>,
    include_erased: bool,
    include_punct: bool,
    representation: &str,
) -> PyResult<PyCorpus> {
    let options = ConversionOptions::new()
        .representation(representation.parse::<Representation>()?)
        .include_erased(include_erased)
        .include_punct(include_punct);
    Ok(PyCorpus {
        inner: Corpus::from_stanford_dependencies(lines, &trees, &options)?,
    })
}

#[pyfunction]
fn __version__() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pymodule]
fn treedeps(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyToken>()?;
    m.add_class::<PySentence>()?;
    m.add_class::<PyCorpus>()?;

    m.add_function(wrap_pyfunction!(from_stanford_dependencies, m)?)?;
    m.add_function(wrap_pyfunction!(__version__, m)?)?;

    Ok(())
}
