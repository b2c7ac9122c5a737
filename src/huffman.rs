mod code;
mod codebook;
mod frequency;
mod transcoder;
mod tree;

pub use code::{CodeTable, CodeWord, ReverseCodeTable};
pub use codebook::Codebook;
pub use frequency::{FrequencyCounter, FrequencyTable, DEFAULT_MINIMUM_SYMBOL_COUNT};
pub use transcoder::{DecodeSummary, EncodeSummary, Transcoder};
pub use tree::{Branch, HuffmanTree, LeafPath};

/// A letter of the alphabet `a..=z`.
pub type Symbol = char;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolFrequency {
    pub symbol: Symbol,
    pub frequency: usize,
}

impl SymbolFrequency {
    pub fn new(symbol: Symbol, frequency: usize) -> Self {
        Self { symbol, frequency }
    }
}

impl From<(Symbol, usize)> for SymbolFrequency {
    fn from(value: (Symbol, usize)) -> Self {
        Self::new(value.0, value.1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolCodeLength {
    pub symbol: Symbol,
    pub length: usize,
}

impl From<(Symbol, usize)> for SymbolCodeLength {
    fn from(value: (Symbol, usize)) -> Self {
        Self {
            symbol: value.0,
            length: value.1,
        }
    }
}

/// Maps a raw input byte onto the alphabet.
///
/// Only ASCII letters are symbols, upper case is folded to lower case.
/// Everything else (digits, punctuation, whitespace, non ASCII bytes)
/// yields `None` and is skipped by the counter and the encoder alike.
pub fn fold_symbol(byte: u8) -> Option<Symbol> {
    byte.is_ascii_alphabetic()
        .then(|| char::from(byte.to_ascii_lowercase()))
}
