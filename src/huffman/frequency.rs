use std::collections::BTreeMap;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{fold_symbol, Symbol, SymbolFrequency};
use crate::error::Error;
use crate::open_input_file;

/// Below this many counted symbols the statistics are considered thin.
pub const DEFAULT_MINIMUM_SYMBOL_COUNT: usize = 6000;

/// Occurrence count per symbol. Every stored count is at least 1.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<Symbol, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn increment_symbol(&mut self, symbol: Symbol) {
        self.add(symbol, 1);
    }

    fn add(&mut self, symbol: Symbol, frequency: usize) {
        if frequency > 0 {
            let count = self.counts.entry(symbol).or_default();
            *count = count.saturating_add(frequency);
        }
    }

    pub fn get(&self, symbol: Symbol) -> Option<usize> {
        self.counts.get(&symbol).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Number of counted symbol occurrences, saturating at `usize::MAX`.
    pub fn total(&self) -> usize {
        self.counts
            .values()
            .fold(0usize, |total, &count| total.saturating_add(count))
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = SymbolFrequency> + '_ {
        self.counts
            .iter()
            .map(|(&symbol, &frequency)| SymbolFrequency::new(symbol, frequency))
    }

    /// Entries by descending count, equal counts in ascending symbol order.
    pub fn sorted_by_descending_count(&self) -> Vec<SymbolFrequency> {
        let mut entries: Vec<SymbolFrequency> = self.iter().collect();
        entries.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        entries
    }

    pub fn merge(&mut self, other: &FrequencyTable) {
        for entry in other.iter() {
            self.add(entry.symbol, entry.frequency);
        }
    }
}

impl FromIterator<SymbolFrequency> for FrequencyTable {
    fn from_iter<T: IntoIterator<Item = SymbolFrequency>>(entries: T) -> Self {
        let mut table = FrequencyTable::new();
        for entry in entries {
            table.add(entry.symbol, entry.frequency);
        }
        table
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FrequencyCounter {
    minimum_symbol_count: usize,
}

impl FrequencyCounter {
    pub fn new(minimum_symbol_count: usize) -> Self {
        Self {
            minimum_symbol_count,
        }
    }

    /// Counts the letters of `source`, the name is only used in diagnostics.
    pub fn count<R: Read>(&self, source: R, source_name: &str) -> crate::Result<FrequencyTable> {
        let mut table = FrequencyTable::new();
        let mut skipped = 0usize;
        for byte in BufReader::new(source).bytes() {
            let byte = byte.map_err(|e| Error::source_unavailable(source_name, e))?;
            match fold_symbol(byte) {
                Some(symbol) => table.increment_symbol(symbol),
                None => skipped += 1,
            }
        }
        log::debug!("Skipped {} non letter characters in '{}'", skipped, source_name);
        if !self.is_adequate(&table) {
            log::debug!(
                "'{}' alone holds fewer than {} symbols",
                source_name,
                self.minimum_symbol_count
            );
        }
        log::info!(
            "Counted {} symbols ({} distinct) in '{}'",
            table.total(),
            table.len(),
            source_name
        );
        Ok(table)
    }

    pub fn count_file(&self, file_path: &Path) -> crate::Result<FrequencyTable> {
        let file = open_input_file(file_path)?;
        self.count(file, &file_path.display().to_string())
    }

    pub fn count_str(&self, text: &str) -> crate::Result<FrequencyTable> {
        self.count(text.as_bytes(), "<text>")
    }

    pub fn is_adequate(&self, table: &FrequencyTable) -> bool {
        table.total() >= self.minimum_symbol_count
    }

    /// Warns when `table` is too thin to train a code on, the result is
    /// advisory only.
    pub fn check_adequacy(&self, table: &FrequencyTable) -> bool {
        let adequate = self.is_adequate(table);
        if !adequate {
            log::warn!(
                "Only {} symbols counted, fewer than the expected minimum of {}",
                table.total(),
                self.minimum_symbol_count
            );
        }
        adequate
    }
}

impl Default for FrequencyCounter {
    fn default() -> Self {
        Self::new(DEFAULT_MINIMUM_SYMBOL_COUNT)
    }
}
