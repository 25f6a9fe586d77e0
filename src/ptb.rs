//! Tagged yield of bracketed Penn Treebank trees
//!
//! Only leaf order and tags are needed downstream, so no tree is built:
//! the pest grammar scans for `(TAG word)` pre-terminals left to right.

use pest::Parser;
use pest_derive::Parser;

use crate::error::ConversionError;

#[derive(Parser)]
#[grammar = "ptb.pest"]
struct PtbParser;

/// Tag of PTB empty categories. The converter does not number them.
pub const EMPTY_CATEGORY: &str = "-NONE-";

/// One pre-terminal of the tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaggedWord {
    pub tag: String,
    pub word: String,
}

impl TaggedWord {
    pub fn new(tag: &str, word: &str) -> Self {
        Self {
            tag: tag.to_string(),
            word: word.to_string(),
        }
    }
}

/// Extract `(tag, word)` pairs in leaf order.
///
/// `\/` in a word is read as `/`. Empty categories are dropped. A tree
/// without a single pre-terminal is a format error.
pub fn tagged_yield(tree: &str) -> Result<Vec<TaggedWord>, ConversionError> {
    let mut pairs = PtbParser::parse(Rule::tagged_yield, tree)
        .map_err(|e| ConversionError::format(0, format!("Unreadable tree: {}", e)))?;

    let Some(scan) = pairs.next() else {
        return Err(ConversionError::format(0, "Unreadable tree"));
    };

    let mut words = Vec::new();
    for leaf in scan.into_inner().filter(|p| p.as_rule() == Rule::leaf) {
        let mut inner = leaf.into_inner();
        let (Some(tag), Some(word)) = (inner.next(), inner.next()) else {
            continue;
        };
        if tag.as_str() == EMPTY_CATEGORY {
            continue;
        }
        words.push(TaggedWord {
            tag: tag.as_str().to_string(),
            word: word.as_str().replace(r"\/", "/"),
        });
    }

    if words.is_empty() {
        return Err(ConversionError::format(
            0,
            format!("No tagged words in tree {:?}", tree),
        ));
    }

    Ok(words)
}
