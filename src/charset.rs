use itertools::Itertools;
use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};

use crate::swap::SwapError;

/// An ordered family of delimiter tokens, e.g. `( ) ;`.
///
/// The position of a token is its role: swapping one charset for another
/// replaces the token at position `i` with the other charset's token at
/// position `i`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Charset(NonEmpty<String>);

impl Charset {
    pub fn new<I, S>(tokens: I) -> Result<Self, SwapError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens = tokens.into_iter().map(Into::into).collect_vec();
        let Some(tokens) = NonEmpty::from_vec(tokens) else {
            return Err(SwapError::EmptyCharset);
        };
        if tokens.iter().any(|token| token.is_empty()) {
            return Err(SwapError::EmptyToken {
                charset: tokens.iter().join(" "),
            });
        }
        if let Some(duplicate) = tokens.iter().duplicates().next() {
            return Err(SwapError::DuplicateToken {
                token: duplicate.clone(),
                charset: tokens.iter().join(" "),
            });
        }
        Ok(Self(tokens))
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The tokens joined by a single space, as shown in a picker.
    pub fn label(&self) -> String {
        self.0.iter().join(" ")
    }
}

impl TryFrom<Vec<String>> for Charset {
    type Error = SwapError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Charset::new(value)
    }
}

impl From<Charset> for Vec<String> {
    fn from(value: Charset) -> Self {
        value.0.into()
    }
}

impl std::fmt::Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The charsets offered for an indexed swap. Charsets are addressed by
/// position, never by value.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CharsetCatalog(Vec<Charset>);

const BRACKET_FAMILIES: [(&str, &str); 3] = [("(", ")"), ("[", "]"), ("{", "}")];
const SEPARATORS: [&str; 2] = [";", "|"];

impl Default for CharsetCatalog {
    /// Every bracket family on its own, then each family followed by a
    /// separator, then every ordered pair of distinct families followed by a
    /// separator.
    fn default() -> Self {
        let singles = BRACKET_FAMILIES
            .iter()
            .map(|(open, close)| vec![*open, *close]);
        let with_separator = BRACKET_FAMILIES
            .iter()
            .cartesian_product(SEPARATORS)
            .map(|((open, close), separator)| vec![*open, *close, separator]);
        let pairs_with_separator = BRACKET_FAMILIES
            .iter()
            .cartesian_product(BRACKET_FAMILIES.iter())
            .filter(|(outer, inner)| outer != inner)
            .cartesian_product(SEPARATORS)
            .map(|(((outer_open, outer_close), (inner_open, inner_close)), separator)| {
                vec![
                    *outer_open,
                    *outer_close,
                    *inner_open,
                    *inner_close,
                    separator,
                ]
            });
        Self(
            singles
                .chain(with_separator)
                .chain(pairs_with_separator)
                .map(|tokens| Charset(nonempty_strings(tokens)))
                .collect(),
        )
    }
}

fn nonempty_strings(tokens: Vec<&str>) -> NonEmpty<String> {
    let mut tokens = tokens.into_iter().map(String::from);
    let head = tokens.next().unwrap_or_default();
    NonEmpty {
        head,
        tail: tokens.collect(),
    }
}

impl CharsetCatalog {
    pub fn new(charsets: Vec<Charset>) -> Self {
        Self(charsets)
    }

    pub fn get(&self, index: usize) -> Result<&Charset, SwapError> {
        self.0.get(index).ok_or(SwapError::UnknownCharset {
            index,
            len: self.0.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Charset> {
        self.0.iter()
    }

    /// Index and label of every charset, in catalog order.
    pub fn labels(&self) -> Vec<(usize, String)> {
        self.0
            .iter()
            .enumerate()
            .map(|(index, charset)| (index, charset.label()))
            .collect()
    }

    /// Catalog indices of the charsets that have exactly `arity` tokens.
    pub fn indices_with_arity(&self, arity: usize) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, charset)| charset.len() == arity)
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
mod test_charset {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn label_is_space_joined() {
        let charset = Charset::new(["(", ")", ";"]).unwrap();
        assert_eq!(charset.label(), "( ) ;");
        assert_eq!(charset.len(), 3);
    }

    #[test]
    fn rejects_empty_charset() {
        assert_eq!(
            Charset::new(Vec::<String>::new()),
            Err(SwapError::EmptyCharset)
        );
    }

    #[test]
    fn rejects_empty_token() {
        assert!(matches!(
            Charset::new(["(", ""]),
            Err(SwapError::EmptyToken { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_token() {
        assert_eq!(
            Charset::new(["(", ")", "("]),
            Err(SwapError::DuplicateToken {
                token: "(".to_string(),
                charset: "( ) (".to_string()
            })
        );
    }

    #[test]
    fn multi_char_tokens_are_allowed() {
        let charset = Charset::new(["{{", "}}"]).unwrap();
        assert_eq!(charset.tokens().collect_vec(), vec!["{{", "}}"]);
    }

    #[test]
    fn deserialize_validates() {
        let charset: Charset = serde_json::from_str(r#"["[", "]"]"#).unwrap();
        assert_eq!(charset.label(), "[ ]");
        assert!(serde_json::from_str::<Charset>(r#"["[", "["]"#).is_err());
        assert!(serde_json::from_str::<Charset>("[]").is_err());
    }
}
