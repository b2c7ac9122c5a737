use super::code::{generate_code_tables, CodeTable, ReverseCodeTable};
use super::frequency::FrequencyTable;
use super::tree::HuffmanTree;
use super::{SymbolCodeLength, SymbolFrequency};

/// Tree and code tables built from one frequency table.
///
/// All three parts are produced together by [`Codebook::build`] and never
/// change afterwards. New statistics mean a new codebook.
#[derive(Default)]
pub struct Codebook {
    tree: Option<HuffmanTree>,
    codes: CodeTable,
    reverse: ReverseCodeTable,
}

impl Codebook {
    /// An empty table yields an empty codebook, not an error.
    pub fn build(table: &FrequencyTable) -> Codebook {
        let symbol_frequencies: Vec<SymbolFrequency> = table.iter().collect();
        let Some(tree) = HuffmanTree::new(&symbol_frequencies) else {
            log::warn!("Frequency table is empty, building an empty codebook");
            return Codebook::default();
        };
        let (codes, reverse) = generate_code_tables(&tree);
        log::info!(
            "Built code table for {} symbols, weighted path length {}",
            codes.len(),
            tree.weighted_path_length()
        );
        Codebook {
            tree: Some(tree),
            codes,
            reverse,
        }
    }

    pub fn tree(&self) -> Option<&HuffmanTree> {
        self.tree.as_ref()
    }

    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    pub fn reverse(&self) -> &ReverseCodeTable {
        &self.reverse
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_none()
    }

    /// Code length per symbol, in symbol order.
    pub fn code_lengths(&self) -> Vec<SymbolCodeLength> {
        self.codes
            .iter()
            .map(|(symbol, code)| SymbolCodeLength::from((symbol, code.len())))
            .collect()
    }
}
