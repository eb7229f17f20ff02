pub mod buffer;
pub mod char_index_range;
pub mod charset;
pub mod cli;
pub mod command;
pub mod config;
pub mod edit;
pub mod engine;
pub mod picker;
pub mod selection;
pub mod swap;
pub mod transformation;
mod undo_tree;

pub use buffer::Buffer;
pub use char_index_range::{CharIndexRange, Region};
pub use charset::{Charset, CharsetCatalog};
pub use engine::Engine;
pub use selection::select_regions;
pub use swap::{PairwiseSwap, SwapError, SwapMapping};

pub fn main() -> anyhow::Result<()> {
    cli::cli()
}
