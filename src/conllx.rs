//! CoNLL-X line codec and sentence reader
//!
//! Each token is one line of 10 tab-separated columns:
//! ID, FORM, LEMMA, CPOSTAG, POSTAG, FEATS, HEAD, DEPREL, PHEAD, PDEPREL.
//! `_` marks an absent value in every column, FEATS is `|`-separated, and a
//! blank line ends a sentence.
//!
//! CoNLL-X format: https://ilk.uvt.nl/conll/#dataformat

use crate::error::ConversionError;
use crate::sentence::Sentence;
use crate::token::Token;
use atoi::FromRadix10Checked;
use flate2::read::MultiGzDecoder;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Lines};
use std::path::Path;

/// Placeholder for an absent value
pub const PLACEHOLDER: &str = "_";

const N_FIELDS: usize = 10;

/// Reader that iterates over CoNLL-X sentences
pub struct ConllxReader<R: BufRead> {
    lines: Lines<R>,
    line_num: usize,
}

impl<R: BufRead> ConllxReader<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_num: 0,
        }
    }
}

impl ConllxReader<Box<dyn BufRead + Send>> {
    /// Open a file, decompressing on the fly if the name ends in `.gz`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConversionError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConversionError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let reader: Box<dyn BufRead + Send> = if is_gzip(path) {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        Ok(Self::from_reader(reader))
    }
}

impl ConllxReader<Cursor<String>> {
    pub fn from_string(text: &str) -> Self {
        Self::from_reader(Cursor::new(text.to_string()))
    }
}

impl<R: BufRead> Iterator for ConllxReader<R> {
    type Item = Result<Sentence, ConversionError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut tokens = Vec::new();

        loop {
            match self.lines.next() {
                None => {
                    if tokens.is_empty() {
                        return None;
                    }
                    // Last sentence without trailing blank line
                    break;
                }
                Some(Err(e)) => return Some(Err(e.into())),
                Some(Ok(line)) => {
                    self.line_num += 1;
                    let line = line.trim();

                    if line.is_empty() {
                        if !tokens.is_empty() {
                            break;
                        }
                        // Skip runs of blank lines
                        continue;
                    }

                    match parse_line(line) {
                        Ok(token) => tokens.push(token),
                        Err(e) => return Some(Err(e.at_line(self.line_num))),
                    }
                }
            }
        }

        Some(Ok(Sentence::from_tokens(tokens)))
    }
}

pub(crate) fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Write a token as one CoNLL-X line (no newline)
pub fn write_token(f: &mut impl fmt::Write, token: &Token) -> fmt::Result {
    write!(f, "{}\t{}\t", token.index, token.form)?;
    write_opt(f, token.lemma.as_deref())?;
    f.write_char('\t')?;
    write_opt(f, token.cpos.as_deref())?;
    f.write_char('\t')?;
    write_opt(f, token.pos.as_deref())?;
    f.write_char('\t')?;
    match &token.feats {
        Some(feats) => f.write_str(&feats.join("|"))?,
        None => f.write_str(PLACEHOLDER)?,
    }
    write!(f, "\t{}\t", token.head)?;
    write_opt(f, token.deprel.as_deref())?;
    f.write_char('\t')?;
    match token.phead {
        Some(phead) => write!(f, "{}", phead)?,
        None => f.write_str(PLACEHOLDER)?,
    }
    f.write_char('\t')?;
    write_opt(f, token.pdeprel.as_deref())
}

fn write_opt(f: &mut impl fmt::Write, value: Option<&str>) -> fmt::Result {
    f.write_str(value.unwrap_or(PLACEHOLDER))
}

/// Parse a single CoNLL-X line into a Token.
///
/// Errors carry line 0; readers fill in the real line number.
pub fn parse_line(line: &str) -> Result<Token, ConversionError> {
    let fields = split_fields(line);

    if fields.len() != N_FIELDS {
        return Err(ConversionError::format(
            0,
            format!("Expected {} fields, found {}", N_FIELDS, fields.len()),
        ));
    }

    // Field 0: ID
    let index = parse_number(fields[0], "ID")?;
    if index == 0 {
        return Err(ConversionError::format(0, "Token ID must be positive"));
    }

    // Field 5: FEATS
    let feats = parse_string_field(fields[5]).map(|s| s.split('|').map(str::to_string).collect());

    // Field 6: HEAD
    let head = parse_number(fields[6], "HEAD")?;

    // Field 8: PHEAD
    let phead = match fields[8] {
        PLACEHOLDER => None,
        s => Some(parse_number(s, "PHEAD")?),
    };

    Ok(Token {
        index,
        // FORM is required, so a literal `_` stays a word
        form: fields[1].to_string(),
        lemma: parse_string_field(fields[2]),
        cpos: parse_string_field(fields[3]),
        pos: parse_string_field(fields[4]),
        feats,
        head,
        deprel: parse_string_field(fields[7]),
        phead,
        pdeprel: parse_string_field(fields[9]),
        extra: None,
    })
}

/// Split on tabs; tab is ASCII so every split point is a char boundary
fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::with_capacity(N_FIELDS);
    let mut start = 0;
    for tab in memchr::memchr_iter(b'\t', line.as_bytes()) {
        fields.push(&line[start..tab]);
        start = tab + 1;
    }
    fields.push(&line[start..]);
    fields
}

fn parse_string_field(s: &str) -> Option<String> {
    if s == PLACEHOLDER {
        None
    } else {
        Some(s.to_string())
    }
}

fn parse_number(s: &str, column: &str) -> Result<usize, ConversionError> {
    let bytes = s.as_bytes();
    match usize::from_radix_10_checked(bytes) {
        (Some(n), used) if used > 0 && used == bytes.len() => Ok(n),
        _ => Err(ConversionError::format(
            0,
            format!("Invalid {}: {}", column, s),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATHY: &str = "1\tCathy\tCathy\tN\tN\teigen|ev|neut\t2\tsu\t_\t_";

    #[test]
    fn test_parse_line_with_feats() {
        let token = parse_line(CATHY).unwrap();

        assert_eq!(token.index, 1);
        assert_eq!(token.form, "Cathy");
        assert_eq!(token.lemma.as_deref(), Some("Cathy"));
        assert_eq!(token.cpos.as_deref(), Some("N"));
        assert_eq!(token.pos.as_deref(), Some("N"));
        assert_eq!(
            token.feats,
            Some(vec!["eigen".to_string(), "ev".to_string(), "neut".to_string()])
        );
        assert_eq!(token.head, 2);
        assert_eq!(token.deprel.as_deref(), Some("su"));
        assert_eq!(token.phead, None);
        assert_eq!(token.pdeprel, None);

        assert_eq!(token.to_string(), CATHY);
    }

    #[test]
    fn test_parse_line_placeholders() {
        let token = parse_line("3\then\t_\t_\t_\t_\t2\t_\t_\t_").unwrap();
        assert_eq!(token.lemma, None);
        assert_eq!(token.cpos, None);
        assert_eq!(token.feats, None);
        assert_eq!(token.deprel, None);
    }

    #[test]
    fn test_parse_line_projective_columns() {
        let token = parse_line("2\tzag\tzie\tV\tV\t_\t0\tROOT\t0\tROOT").unwrap();
        assert_eq!(token.phead, Some(0));
        assert_eq!(token.pdeprel.as_deref(), Some("ROOT"));
        assert_eq!(token.to_string(), "2\tzag\tzie\tV\tV\t_\t0\tROOT\t0\tROOT");
    }

    #[test]
    fn test_parse_line_wrong_field_count() {
        let err = parse_line("1\tCathy\tCathy").unwrap_err();
        assert_eq!(err.to_string(), "Format error at line 0: Expected 10 fields, found 3");
    }

    #[test]
    fn test_parse_line_bad_numbers() {
        assert!(parse_line("x\tCathy\t_\t_\t_\t_\t2\tsu\t_\t_").is_err());
        assert!(parse_line("1\tCathy\t_\t_\t_\t_\t_\tsu\t_\t_").is_err());
        assert!(parse_line("1\tCathy\t_\t_\t_\t_\t2a\tsu\t_\t_").is_err());
        assert!(parse_line("0\tCathy\t_\t_\t_\t_\t2\tsu\t_\t_").is_err());
        assert!(parse_line("1\tCathy\t_\t_\t_\t_\t2\tsu\t-1\t_").is_err());
    }

    #[test]
    fn test_reader_sentences() {
        let text = "\n\n1\tThe\t_\tDT\tDT\t_\t2\tdet\t_\t_\n\
                    2\tdog\t_\tNN\tNN\t_\t0\troot\t_\t_\n\
                    \n\
                    \n\
                    1\tCats\t_\tNNS\tNNS\t_\t2\tnsubj\t_\t_\n\
                    2\tsleep\t_\tVBP\tVBP\t_\t0\troot\t_\t_\n\n\n";

        let sentences: Vec<_> = ConllxReader::from_string(text)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].len(), 2);
        assert_eq!(sentences[1][0].form, "Cats");
    }

    #[test]
    fn test_reader_reports_line_number() {
        let text = "1\tThe\t_\tDT\tDT\t_\t2\tdet\t_\t_\n\n1\tbroken\n";
        let mut reader = ConllxReader::from_string(text);

        assert!(reader.next().unwrap().is_ok());
        match reader.next().unwrap() {
            Err(ConversionError::Format { line, .. }) => assert_eq!(line, 3),
            other => panic!("Expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_reader_gzip_file() {
        use flate2::Compression;
        use flate2::write::GzEncoder;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.conll.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        write!(encoder, "{}\n\n{}\n", CATHY, CATHY).unwrap();
        encoder.finish().unwrap();

        let sentences: Vec<_> = ConllxReader::from_file(&path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[1][0].to_string(), CATHY);
    }

    #[test]
    fn test_reader_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConllxReader::from_file(dir.path().join("nope.conll"));
        assert!(matches!(result, Err(ConversionError::FileOpen { .. })));
    }
}
