use std::borrow::Cow;

use crate::{
    engine::Engine,
    swap::{PairwiseSwap, SwapError, SwapMapping},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transformation {
    Pairwise(PairwiseSwap),
    Charsets { from: usize, to: usize },
}

impl Transformation {
    /// Resolve the mapping this transformation applies. Fixed swaps borrow
    /// the engine's precompiled mapping; charset swaps derive a fresh one.
    pub fn mapping<'a>(&self, engine: &'a Engine) -> Result<Cow<'a, SwapMapping>, SwapError> {
        match self {
            Transformation::Pairwise(kind) => Ok(Cow::Borrowed(engine.pairwise(*kind))),
            Transformation::Charsets { from, to } => {
                Ok(Cow::Owned(engine.build_mapping(*from, *to)?))
            }
        }
    }

    pub fn apply(&self, engine: &Engine, string: &str) -> Result<String, SwapError> {
        Ok(self.mapping(engine)?.swap(string))
    }
}

impl std::fmt::Display for Transformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transformation::Pairwise(kind) => write!(f, "{kind}"),
            Transformation::Charsets { from, to } => {
                write!(f, "Swap Charset #{from} with Charset #{to}")
            }
        }
    }
}

#[cfg(test)]
mod test_transformation {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::charset::CharsetCatalog;

    #[test]
    fn pairwise() {
        let engine = Engine::new(CharsetCatalog::default()).unwrap();
        let transformation = Transformation::Pairwise(PairwiseSwap::Delimiters);
        assert_eq!(
            transformation.apply(&engine, "a(b)c{d}e").unwrap(),
            "a{b}c(d)e"
        );
        assert!(matches!(
            transformation.mapping(&engine).unwrap(),
            Cow::Borrowed(_)
        ));
        assert_eq!(transformation.to_string(), "Swap Delimiters");
    }

    #[test]
    fn charsets() {
        let engine = Engine::new(CharsetCatalog::default()).unwrap();
        let transformation = Transformation::Charsets { from: 0, to: 1 };
        assert_eq!(transformation.apply(&engine, "f(x)").unwrap(), "f[x]");
        assert_eq!(
            transformation.to_string(),
            "Swap Charset #0 with Charset #1"
        );
    }

    #[test]
    fn charsets_arity_mismatch() {
        let engine = Engine::new(CharsetCatalog::default()).unwrap();
        let transformation = Transformation::Charsets { from: 0, to: 9 };
        assert!(matches!(
            transformation.apply(&engine, "f(x)"),
            Err(SwapError::ArityMismatch { .. })
        ));
    }
}
