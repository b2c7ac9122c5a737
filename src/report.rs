use std::fmt;

use crate::huffman::{CodeTable, FrequencyTable};

/// Listing of a frequency table, most frequent symbol first.
pub struct FrequencyReport<'a>(pub &'a FrequencyTable);

impl fmt::Display for FrequencyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Symbol frequencies ===")?;
        for entry in self.0.sorted_by_descending_count() {
            writeln!(f, "symbol '{}': {} times", entry.symbol, entry.frequency)?;
        }
        writeln!(f, "distinct symbols: {}", self.0.len())?;
        write!(f, "counted symbols: {}", self.0.total())
    }
}

/// Listing of a code table in symbol order.
pub struct CodeTableReport<'a>(pub &'a CodeTable);

impl fmt::Display for CodeTableReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "=== Huffman code table ===")?;
        for (symbol, code) in self.0.iter() {
            write!(f, "\nsymbol '{}': {}", symbol, code)?;
        }
        Ok(())
    }
}
