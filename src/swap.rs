use indexmap::IndexMap;
use itertools::Itertools;
use regex::{Captures, Regex};
use strum_macros::{Display, EnumIter};
use thiserror::Error;

use crate::charset::Charset;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Cannot swap `{from}` with `{to}`: charsets have {from_len} and {to_len} tokens")]
    ArityMismatch {
        from: String,
        from_len: usize,
        to: String,
        to_len: usize,
    },

    #[error("No charset at index {index} (catalog has {len} charsets)")]
    UnknownCharset { index: usize, len: usize },

    #[error("A charset must have at least one token")]
    EmptyCharset,

    #[error("Charset `{charset}` contains an empty token")]
    EmptyToken { charset: String },

    #[error("Token {token:?} appears more than once in charset `{charset}`")]
    DuplicateToken { token: String, charset: String },

    #[error("Unable to compile swap pattern: {0}")]
    Pattern(String),
}

/// Replaces each token of a source charset with the token at the same
/// position in a target charset.
#[derive(Debug, Clone)]
pub struct SwapMapping {
    pairs: IndexMap<String, String>,
    regex: Regex,
}

impl PartialEq for SwapMapping {
    fn eq(&self, other: &Self) -> bool {
        self.pairs == other.pairs
    }
}

impl Eq for SwapMapping {}

impl SwapMapping {
    pub fn new(source: &Charset, target: &Charset) -> Result<SwapMapping, SwapError> {
        if source.len() != target.len() {
            return Err(SwapError::ArityMismatch {
                from: source.label(),
                from_len: source.len(),
                to: target.label(),
                to_len: target.len(),
            });
        }
        let pairs = source
            .tokens()
            .zip(target.tokens())
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect::<IndexMap<_, _>>();
        // Regex alternation is leftmost-first, so longer tokens must come
        // first for `{{` to win over `{`.
        let pattern = pairs
            .keys()
            .sorted_by_key(|key| std::cmp::Reverse(key.chars().count()))
            .map(|key| regex::escape(key))
            .join("|");
        let regex = Regex::new(&pattern).map_err(|err| SwapError::Pattern(err.to_string()))?;
        log::debug!("SwapMapping::new pattern = /{pattern}/");
        Ok(SwapMapping { pairs, regex })
    }

    /// Rewrite `text` in a single left-to-right pass.
    ///
    /// Replacements are never re-scanned, so a mapping that swaps `(` with
    /// `{` and `{` with `(` does not cascade.
    pub fn swap(&self, text: &str) -> String {
        self.regex
            .replace_all(text, |captures: &Captures| {
                let matched = &captures[0];
                self.pairs
                    .get(matched)
                    .cloned()
                    .unwrap_or_else(|| matched.to_string())
            })
            .into_owned()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(from, to)| (from.as_str(), to.as_str()))
    }

    /// The mapping that undoes this one, provided the text contained no
    /// target tokens beforehand.
    pub fn inverse(&self) -> Result<SwapMapping, SwapError> {
        let (source, target): (Vec<_>, Vec<_>) = self.pairs().unzip();
        SwapMapping::new(&Charset::new(target)?, &Charset::new(source)?)
    }
}

impl std::fmt::Display for SwapMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.pairs().map(|(from, to)| format!("{from}→{to}")).join(" ")
        )
    }
}

/// Hardcoded swaps that need no charset selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum PairwiseSwap {
    /// `(`↔`{` and `)`↔`}`.
    #[strum(to_string = "Swap Delimiters")]
    Delimiters,
    /// `{{`↔`[` and `}}`↔`]`.
    #[strum(to_string = "Swap Comment Delimiters")]
    CommentDelimiters,
}

impl PairwiseSwap {
    const fn charsets(self) -> ([&'static str; 4], [&'static str; 4]) {
        match self {
            PairwiseSwap::Delimiters => (["(", ")", "{", "}"], ["{", "}", "(", ")"]),
            PairwiseSwap::CommentDelimiters => {
                (["{{", "}}", "[", "]"], ["[", "]", "{{", "}}"])
            }
        }
    }

    pub fn mapping(self) -> Result<SwapMapping, SwapError> {
        let (source, target) = self.charsets();
        SwapMapping::new(&Charset::new(source)?, &Charset::new(target)?)
    }
}
