//! Corpora of dependency-annotated sentences
//!
//! A corpus is built either by reconstructing one sentence per tree from a
//! shared relation stream, or by reading CoNLL-X text. It serializes back to
//! CoNLL-X with a blank line between sentences.

use crate::conllx::{self, ConllxReader};
use crate::error::ConversionError;
use crate::options::ConversionOptions;
use crate::relation::split_blocks;
use crate::sentence::Sentence;
use crate::token::Token;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::Deref;
use std::path::Path;

/// An ordered sequence of sentences
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Corpus {
    sentences: Vec<Sentence>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sentences(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn into_sentences(self) -> Vec<Sentence> {
        self.sentences
    }

    /// Total number of token entries over all sentences
    pub fn n_tokens(&self) -> usize {
        self.sentences.iter().map(|s| s.len()).sum()
    }

    /// Reconstruct one sentence per tree from a relation stream.
    ///
    /// The stream is consumed in lockstep with `trees`. Every tree must
    /// produce tokens and the stream must hold no further sentences,
    /// otherwise the counts disagree and nothing is returned.
    pub fn from_stanford_dependencies<I, T>(
        lines: I,
        trees: &[T],
        options: &ConversionOptions,
    ) -> Result<Self, ConversionError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        T: AsRef<str>,
    {
        let mut lines = lines.into_iter().enumerate().map(|(i, line)| (i + 1, line));
        let mut sentences = Vec::with_capacity(trees.len());

        for tree in trees {
            let sentence = Sentence::from_numbered_lines(&mut lines, tree.as_ref(), options)
                .inspect_err(|e| log::warn!("Failed to rebuild tree {:?}: {}", tree.as_ref(), e))?;
            sentences.push(sentence);
        }

        let leftover = split_blocks(lines.map(|(_, line)| line)).len();
        let produced = sentences.iter().filter(|s| !s.is_empty()).count();
        check_count(trees.len(), produced + leftover)?;

        Ok(Self { sentences })
    }

    /// Parse CoNLL-X lines. Blank lines separate sentences.
    pub fn from_conll<I>(lines: I) -> Result<Self, ConversionError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self::from_conll_filtered(lines, |_| true)
    }

    /// Parse CoNLL-X lines, keeping only tokens accepted by `keep`.
    ///
    /// A sentence whose tokens are all rejected is dropped.
    pub fn from_conll_filtered<I, F>(lines: I, keep: F) -> Result<Self, ConversionError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        F: Fn(&Token) -> bool,
    {
        let text = lines.into_iter().fold(String::new(), |mut text, line| {
            text.push_str(line.as_ref());
            text.push('\n');
            text
        });

        ConllxReader::from_reader(text.as_bytes())
            .filter_map(|sentence| {
                sentence
                    .map(|s| s.filtered(&keep))
                    .map(|s| (!s.is_empty()).then_some(s))
                    .transpose()
            })
            .collect()
    }

    /// Parse CoNLL-X text
    pub fn from_conll_str(text: &str) -> Result<Self, ConversionError> {
        Self::from_conll(text.lines())
    }

    /// Read a CoNLL-X file, gzip-compressed if the name ends in `.gz`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConversionError> {
        ConllxReader::from_file(path)?.collect()
    }

    pub fn as_conll(&self) -> String {
        self.to_string()
    }

    /// Stream the CoNLL-X serialization, ending with a newline
    pub fn write_conll<W: Write>(&self, mut writer: W) -> Result<(), ConversionError> {
        writeln!(writer, "{}", self)?;
        writer.flush()?;
        Ok(())
    }

    /// Write to a file, gzip-compressed if the name ends in `.gz`
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConversionError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| ConversionError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        if conllx::is_gzip(path) {
            let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
            self.write_conll(&mut encoder)?;
            encoder.finish()?.flush()?;
            Ok(())
        } else {
            self.write_conll(BufWriter::new(file))
        }
    }
}

pub(crate) fn check_count(expected: usize, found: usize) -> Result<(), ConversionError> {
    if expected == found {
        Ok(())
    } else {
        log::warn!("Expected {} sentences but reconstructed {}", expected, found);
        Err(ConversionError::CountMismatch { expected, found })
    }
}

impl Deref for Corpus {
    type Target = [Sentence];

    fn deref(&self) -> &Self::Target {
        &self.sentences
    }
}

impl IntoIterator for Corpus {
    type Item = Sentence;
    type IntoIter = std::vec::IntoIter<Sentence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sentences.into_iter()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Sentence;
    type IntoIter = std::slice::Iter<'a, Sentence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sentences.iter()
    }
}

impl FromIterator<Sentence> for Corpus {
    fn from_iter<T: IntoIterator<Item = Sentence>>(iter: T) -> Self {
        Self {
            sentences: iter.into_iter().collect(),
        }
    }
}

/// CoNLL-X text: sentence blocks separated by one blank line
impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, sentence) in self.sentences.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{}", sentence)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // example from http://ilk.uvt.nl/conll/example.html
    const DUTCH: &str = "1\tCathy\tCathy\tN\tN\teigen|ev|neut\t2\tsu\t_\t_
2\tzag\tzie\tV\tV\ttrans|ovt|1of2of3|ev\t0\tROOT\t_\t_
3\then\then\tPron\tPron\tper|3|mv|datofacc\t2\tobj1\t_\t_
4\twild\twild\tAdj\tAdj\tattr|stell|onverv\t5\tmod\t_\t_
5\tzwaaien\tzwaai\tN\tN\tsoort|mv|neut\t2\tvc\t_\t_
6\t.\t.\tPunc\tPunc\tpunt\t5\tpunct\t_\t_";

    const TREES: [&str; 3] = [
        "(S1 (NP (DT a) (NN cow)))",
        "(S1 (NP (DT some) (NNS cows)))",
        "(S1 (NP (DT some) (JJ blue) (NN moose)))",
    ];

    const RELATIONS: &str = "det(cow-2, a-1)
root(ROOT-0, cow-2)

det(cows-2, some-1)
root(ROOT-0, cows-2)

det(moose-3, some-1)
amod(moose-3, blue-2)
root(ROOT-0, moose-3)
";

    #[test]
    fn test_readwrite_exact() {
        let text = format!("\n{}\n", DUTCH);
        let corpus = Corpus::from_conll(text.lines()).unwrap();

        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].len(), 6);
        assert_eq!(corpus.as_conll(), DUTCH);
    }

    #[test]
    fn test_multi_sentence_round_trip() {
        let text = format!("{}\n\n{}", DUTCH, "1\tja\t_\tInt\tInt\t_\t0\tROOT\t_\t_");
        let corpus = Corpus::from_conll_str(&text).unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.as_conll(), text);
        assert_eq!(Corpus::from_conll_str(&corpus.as_conll()).unwrap(), corpus);
    }

    #[test]
    fn test_trailing_blank_lines() {
        let text = format!("{}\n\n\n\n", DUTCH);
        let corpus = Corpus::from_conll_str(&text).unwrap();
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn test_filtered_read() {
        let corpus =
            Corpus::from_conll_filtered(DUTCH.lines(), |t| !t.has_deprel("punct")).unwrap();
        assert_eq!(corpus[0].len(), 5);
        assert!(corpus[0].iter().all(|t| t.form != "."));
    }

    #[test]
    fn test_bad_line_reports_position() {
        let text = format!("{}\n\n1\tonly\ttwo", DUTCH);
        match Corpus::from_conll_str(&text) {
            Err(ConversionError::Format { line, .. }) => assert_eq!(line, 8),
            other => panic!("Expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_reconstruct_corpus() {
        let corpus = Corpus::from_stanford_dependencies(
            RELATIONS.lines(),
            &TREES,
            &ConversionOptions::default(),
        )
        .unwrap();

        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.n_tokens(), 7);
        assert_eq!(
            corpus[2][1].repr(),
            "Token(index=2, form='blue', cpos='JJ', pos='JJ', head=3, deprel='amod')"
        );
    }

    #[test]
    fn test_reconstruct_too_few_trees() {
        let result = Corpus::from_stanford_dependencies(
            RELATIONS.lines(),
            &TREES[..2],
            &ConversionOptions::default(),
        );
        assert!(matches!(
            result,
            Err(ConversionError::CountMismatch {
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn test_reconstruct_missing_output() {
        let relations = "det(cow-2, a-1)\nroot(ROOT-0, cow-2)\n";
        let result = Corpus::from_stanford_dependencies(
            relations.lines(),
            &TREES[..2],
            &ConversionOptions::default(),
        );
        assert!(matches!(
            result,
            Err(ConversionError::CountMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_reconstruct_missed_boundary() {
        // No blank line between the first two sentences: the second block is
        // read against the first tree
        let relations = "det(cow-2, a-1)\nroot(ROOT-0, cow-2)\ndet(cows-2, some-1)\n";
        let result = Corpus::from_stanford_dependencies(
            relations.lines(),
            &TREES[..2],
            &ConversionOptions::default(),
        );
        assert!(matches!(result, Err(ConversionError::Consistency { .. })));
    }

    #[test]
    fn test_filter_drops_emptied_sentences() {
        let text = format!("1\t.\t_\t.\t.\t_\t0\tpunct\t_\t_\n\n{}", DUTCH);
        let corpus =
            Corpus::from_conll_filtered(text.lines(), |t| !t.has_deprel("punct")).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0][0].form, "Cathy");
    }

    #[test]
    fn test_copy_marks_not_serialized() {
        let tree = "(S1 (S (NP (NNP Ed)) (VP (VBZ cooks) (CC and) (VBZ sells))))";
        let relations = "nsubj(cooks-2, Ed-1)\nnsubj(sells-4', Ed-1)\nroot(ROOT-0, cooks-2)\n";
        let corpus = Corpus::from_stanford_dependencies(
            relations.lines(),
            &[tree],
            &ConversionOptions::new().include_erased(true),
        )
        .unwrap();
        let back = Corpus::from_conll_str(&corpus.as_conll()).unwrap();

        assert_ne!(back, corpus);
        let unmarked: Corpus = corpus
            .iter()
            .map(|s| {
                s.iter()
                    .cloned()
                    .map(|token| Token { extra: None, ..token })
                    .collect::<Sentence>()
            })
            .collect();
        assert_eq!(back, unmarked);
    }

    #[test]
    fn test_malformed_relation_reports_stream_line() {
        let relations = RELATIONS.replace("det(cows-2, some-1)", "det(cows-2 some-1)");
        let result = Corpus::from_stanford_dependencies(
            relations.lines(),
            &TREES,
            &ConversionOptions::default(),
        );
        assert!(matches!(result, Err(ConversionError::Format { line: 4, .. })));
    }

    #[test]
    fn test_file_round_trip() {
        let corpus = Corpus::from_stanford_dependencies(
            RELATIONS.lines(),
            &TREES,
            &ConversionOptions::default(),
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();

        for name in ["out.conll", "out.conll.gz"] {
            let path = dir.path().join(name);
            corpus.to_file(&path).unwrap();
            assert_eq!(Corpus::from_file(&path).unwrap(), corpus);
        }

        let plain = std::fs::read_to_string(dir.path().join("out.conll")).unwrap();
        assert_eq!(plain, format!("{}\n", corpus.as_conll()));
    }
}
