use indexmap::IndexMap;
use strum::IntoEnumIterator;

use crate::{
    charset::{Charset, CharsetCatalog},
    swap::{PairwiseSwap, SwapError, SwapMapping},
};

/// The immutable state every command works against: the charset catalog and
/// the precompiled fixed swaps. Built once at startup.
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: CharsetCatalog,
    /// One entry per `PairwiseSwap` variant.
    pairwise: IndexMap<PairwiseSwap, SwapMapping>,
}

impl Engine {
    pub fn new(catalog: CharsetCatalog) -> Result<Self, SwapError> {
        log::info!("Engine::new with {} charsets", catalog.len());
        let pairwise = PairwiseSwap::iter()
            .map(|kind| Ok((kind, kind.mapping()?)))
            .collect::<Result<IndexMap<_, _>, SwapError>>()?;
        Ok(Self { catalog, pairwise })
    }

    pub fn catalog(&self) -> &CharsetCatalog {
        &self.catalog
    }

    pub fn list_charsets(&self) -> Vec<(usize, String)> {
        self.catalog.labels()
    }

    pub fn charset(&self, index: usize) -> Result<&Charset, SwapError> {
        self.catalog.get(index)
    }

    /// Derive the mapping from the charset at `source_index` to the one at
    /// `target_index`.
    pub fn build_mapping(
        &self,
        source_index: usize,
        target_index: usize,
    ) -> Result<SwapMapping, SwapError> {
        SwapMapping::new(self.charset(source_index)?, self.charset(target_index)?)
    }

    pub fn pairwise(&self, kind: PairwiseSwap) -> &SwapMapping {
        &self.pairwise[&kind]
    }
}

#[cfg(test)]
mod test_engine {
    use pretty_assertions::assert_eq;

    use super::*;

    fn engine() -> Engine {
        Engine::new(CharsetCatalog::default()).unwrap()
    }

    #[test]
    fn list_charsets() {
        let charsets = engine().list_charsets();
        assert_eq!(charsets.len(), 21);
        assert_eq!(charsets[0], (0, "( )".to_string()));
        assert_eq!(charsets[4], (4, "( ) |".to_string()));
        assert_eq!(charsets[20], (20, "{ } [ ] |".to_string()));
    }

    #[test]
    fn build_mapping_by_index() {
        let mapping = engine().build_mapping(0, 2).unwrap();
        assert_eq!(mapping.swap("foo(bar[baz]qux)"), "foo{bar[baz]qux}");

        let mapping = engine().build_mapping(3, 4).unwrap();
        assert_eq!(mapping.swap("x(y);z(w)|"), "x(y)|z(w)|");
    }

    #[test]
    fn build_mapping_arity_mismatch() {
        assert!(matches!(
            engine().build_mapping(0, 3),
            Err(SwapError::ArityMismatch {
                from_len: 2,
                to_len: 3,
                ..
            })
        ));
    }

    #[test]
    fn build_mapping_unknown_index() {
        assert_eq!(
            engine().build_mapping(0, 99),
            Err(SwapError::UnknownCharset { index: 99, len: 21 })
        );
    }

    #[test]
    fn pairwise_mappings_are_precompiled() {
        let engine = engine();
        for kind in PairwiseSwap::iter() {
            assert_eq!(engine.pairwise(kind), &kind.mapping().unwrap());
        }
        assert_eq!(
            engine.pairwise(PairwiseSwap::CommentDelimiters).to_string(),
            "{{→[ }}→] [→{{ ]→}}"
        );
    }
}
