//! Dependency relation line parser
//!
//! Parses converter output lines of the form
//! `label(govForm-govIndex, depForm-depIndex)` using a pest grammar.

use pest::Parser;
use pest_derive::Parser;

use crate::error::ConversionError;

#[derive(Parser)]
#[grammar = "relation.pest"]
struct RelationParser;

/// One parsed relation line
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationTriple {
    pub deprel: String,
    pub gov_form: String,
    pub gov_index: usize,
    pub dep_form: String,
    pub dep_index: usize,
    /// Trailing apostrophes on the governor index
    pub gov_copies: usize,
    /// Trailing apostrophes on the dependent index
    pub dep_copies: usize,
}

/// A line from the relation stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationLine {
    /// Whitespace-only: a sentence boundary
    Blank,
    Relation(RelationTriple),
}

/// Classify a line as a sentence boundary or a relation
pub fn classify_line(line: &str) -> Result<RelationLine, ConversionError> {
    if line.trim().is_empty() {
        Ok(RelationLine::Blank)
    } else {
        parse_relation(line).map(RelationLine::Relation)
    }
}

/// Split a relation stream into per-sentence blocks on blank lines.
///
/// Lines are not parsed. Runs of blank lines count as one boundary and
/// produce no empty blocks.
pub fn split_blocks<I>(lines: I) -> Vec<Vec<String>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    split_numbered_blocks(lines)
        .into_iter()
        .map(|block| block.into_iter().map(|(_, line)| line).collect())
        .collect()
}

/// `split_blocks`, keeping each line's 1-based position in the stream
pub(crate) fn split_numbered_blocks<I>(lines: I) -> Vec<Vec<(usize, String)>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for (i, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push((i + 1, line.to_string()));
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Parse one non-blank relation line
pub fn parse_relation(line: &str) -> Result<RelationTriple, ConversionError> {
    let cleaned = line.trim().replace(r"\/", "/");
    let mut pairs = RelationParser::parse(Rule::relation, &cleaned)
        .map_err(|e| ConversionError::format(0, format!("Malformed relation {:?}: {}", line, e)))?;

    let Some(relation) = pairs.next() else {
        return Err(ConversionError::format(0, format!("No relation found in {:?}", line)));
    };

    let mut deprel = None;
    let mut governor = None;
    let mut dependent = None;

    for pair in relation.into_inner() {
        match pair.as_rule() {
            Rule::label => deprel = Some(pair.as_str().to_string()),
            Rule::governor => governor = Some(parse_argument(pair)?),
            Rule::dependent => dependent = Some(parse_argument(pair)?),
            _ => {}
        }
    }

    let (Some(deprel), Some(governor), Some(dependent)) = (deprel, governor, dependent) else {
        return Err(ConversionError::format(
            0,
            format!("Incomplete relation {:?}", line),
        ));
    };

    Ok(RelationTriple {
        deprel,
        gov_form: governor.form,
        gov_index: governor.index,
        dep_form: dependent.form,
        dep_index: dependent.index,
        gov_copies: governor.copies,
        dep_copies: dependent.copies,
    })
}

struct Argument {
    form: String,
    index: usize,
    copies: usize,
}

/// Parse `form-index'*`
fn parse_argument(pair: pest::iterators::Pair<Rule>) -> Result<Argument, ConversionError> {
    let mut form = None;
    let mut index = None;
    let mut copies = 0;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::gov_form | Rule::dep_form => form = Some(inner.as_str().to_string()),
            Rule::index => {
                let value = inner.as_str().parse().map_err(|_| {
                    ConversionError::format(0, format!("Invalid index: {}", inner.as_str()))
                })?;
                index = Some(value);
            }
            Rule::copies => copies = inner.as_str().len(),
            _ => {}
        }
    }

    match (form, index) {
        (Some(form), Some(index)) => Ok(Argument {
            form,
            index,
            copies,
        }),
        _ => Err(ConversionError::format(0, "Expected form and index")),
    }
}
