use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::tree::{Branch, HuffmanTree};
use super::Symbol;

/// Code word as readable code units, e.g. `"1101"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodeWord {
    units: String,
}

impl CodeWord {
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.units
    }

    pub fn is_prefix_of(&self, other: &CodeWord) -> bool {
        other.units.starts_with(&self.units)
    }
}

impl From<&[Branch]> for CodeWord {
    fn from(branches: &[Branch]) -> Self {
        Self {
            units: branches.iter().map(|branch| branch.code_unit()).collect(),
        }
    }
}

impl fmt::Display for CodeWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.units)
    }
}

/// Symbol to code word, iterated in symbol order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, CodeWord>,
}

impl CodeTable {
    pub fn get(&self, symbol: Symbol) -> Option<&CodeWord> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &CodeWord)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }
}

/// Code word to symbol.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReverseCodeTable {
    symbols: HashMap<String, Symbol>,
}

impl ReverseCodeTable {
    pub fn get(&self, units: &str) -> Option<Symbol> {
        self.symbols.get(units).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Reads both tables off the leaf paths of `tree`.
///
/// Leaf paths are distinct, so the reverse table never sees a collision.
pub(super) fn generate_code_tables(tree: &HuffmanTree) -> (CodeTable, ReverseCodeTable) {
    let mut codes = CodeTable::default();
    let mut reverse = ReverseCodeTable::default();
    for path in tree.leaf_paths() {
        let code = CodeWord::from(path.branches.as_slice());
        reverse.symbols.insert(code.units.clone(), path.symbol);
        codes.codes.insert(path.symbol, code);
    }
    (codes, reverse)
}
