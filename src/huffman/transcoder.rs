use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use super::codebook::Codebook;
use super::frequency::FrequencyTable;
use super::tree::Branch;
use super::{fold_symbol, Symbol};
use crate::error::Error;
use crate::{open_input_file, open_output_file};

const INPUT_STREAM: &str = "<input>";
const OUTPUT_STREAM: &str = "<output>";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncodeSummary {
    pub symbols_encoded: usize,
    /// Letters that have no code word in the table.
    pub symbols_skipped: usize,
    pub code_units_written: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    pub code_units_read: usize,
    pub symbols_decoded: usize,
    /// Trailing code units that stopped short of a leaf.
    pub dangling_units: usize,
}

/// Encodes letters into `'0'`/`'1'` code units and back, using one codebook.
pub struct Transcoder<'a> {
    codebook: &'a Codebook,
}

impl<'a> Transcoder<'a> {
    pub fn new(codebook: &'a Codebook) -> Self {
        Self { codebook }
    }

    /// Writes the code word of every letter in `source` to `sink`.
    ///
    /// Non letters are skipped like the counter does. Letters missing from the
    /// code table are skipped as well and reported in the summary, encoding is
    /// best effort with respect to the trained alphabet.
    pub fn encode<R: Read, W: Write>(&self, source: R, sink: W) -> crate::Result<EncodeSummary> {
        let mut writer = BufWriter::new(sink);
        let mut summary = EncodeSummary::default();
        for byte in BufReader::new(source).bytes() {
            let byte = byte.map_err(|e| Error::source_unavailable(INPUT_STREAM, e))?;
            let Some(symbol) = fold_symbol(byte) else {
                continue;
            };
            match self.codebook.codes().get(symbol) {
                Some(code) => {
                    writer
                        .write_all(code.as_str().as_bytes())
                        .map_err(|e| Error::sink_unavailable(OUTPUT_STREAM, e))?;
                    summary.symbols_encoded += 1;
                    summary.code_units_written += code.len();
                }
                None => summary.symbols_skipped += 1,
            }
        }
        writer
            .flush()
            .map_err(|e| Error::sink_unavailable(OUTPUT_STREAM, e))?;
        if summary.symbols_skipped > 0 {
            log::debug!(
                "Skipped {} symbols without code word",
                summary.symbols_skipped
            );
        }
        Ok(summary)
    }

    /// Walks the tree once per code unit and writes a symbol at every leaf.
    ///
    /// Anything but `'0'` and `'1'` aborts with [`Error::InvalidCodeUnit`]; the
    /// symbols written up to that point stay in `sink` but are not a valid
    /// result. A single symbol tree has no edges, so any code unit fails with
    /// [`Error::CodeUnitsForSingleSymbol`].
    pub fn decode<R: Read, W: Write>(&self, source: R, sink: W) -> crate::Result<DecodeSummary> {
        let mut writer = BufWriter::new(sink);
        let mut summary = DecodeSummary::default();
        let tree = self.codebook.tree();
        let mut current = tree.map(|tree| tree.root_index());
        let mut pending_units = 0;

        for (position, byte) in BufReader::new(source).bytes().enumerate() {
            let byte = byte.map_err(|e| Error::source_unavailable(INPUT_STREAM, e))?;
            let branch = read_code_unit(byte, position)?;
            summary.code_units_read += 1;
            let (Some(tree), Some(node_index)) = (tree, current) else {
                return Err(Error::EmptyAlphabet);
            };
            let next = tree
                .descend(node_index, branch)
                .ok_or(Error::CodeUnitsForSingleSymbol { position })?;
            pending_units += 1;
            match tree.symbol_at(next) {
                Some(symbol) => {
                    write_symbol(&mut writer, symbol)?;
                    summary.symbols_decoded += 1;
                    pending_units = 0;
                    current = Some(tree.root_index());
                }
                None => current = Some(next),
            }
        }

        writer
            .flush()
            .map_err(|e| Error::sink_unavailable(OUTPUT_STREAM, e))?;
        summary.dangling_units = pending_units;
        warn_about_dangling_units(pending_units);
        Ok(summary)
    }

    /// Decodes by growing a code string until the reverse table knows it.
    ///
    /// Produces the same symbols and errors as [`Transcoder::decode`].
    pub fn decode_by_lookup<R: Read, W: Write>(
        &self,
        source: R,
        sink: W,
    ) -> crate::Result<DecodeSummary> {
        let mut writer = BufWriter::new(sink);
        let mut summary = DecodeSummary::default();
        let single_leaf = self.codebook.tree().map(|tree| tree.is_single_leaf());
        let mut pending = String::new();

        for (position, byte) in BufReader::new(source).bytes().enumerate() {
            let byte = byte.map_err(|e| Error::source_unavailable(INPUT_STREAM, e))?;
            let branch = read_code_unit(byte, position)?;
            summary.code_units_read += 1;
            match single_leaf {
                None => return Err(Error::EmptyAlphabet),
                Some(true) => return Err(Error::CodeUnitsForSingleSymbol { position }),
                Some(false) => (),
            }
            pending.push(branch.code_unit());
            if let Some(symbol) = self.codebook.reverse().get(&pending) {
                write_symbol(&mut writer, symbol)?;
                summary.symbols_decoded += 1;
                pending.clear();
            }
        }

        writer
            .flush()
            .map_err(|e| Error::sink_unavailable(OUTPUT_STREAM, e))?;
        summary.dangling_units = pending.len();
        warn_about_dangling_units(pending.len());
        Ok(summary)
    }

    pub fn encode_str(&self, text: &str) -> crate::Result<String> {
        let mut output = Vec::new();
        self.encode(text.as_bytes(), &mut output)?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    pub fn decode_str(&self, code_units: &str) -> crate::Result<String> {
        let mut output = Vec::new();
        self.decode(code_units.as_bytes(), &mut output)?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    pub fn encode_file(&self, input_file: &Path, output_file: &Path) -> crate::Result<EncodeSummary> {
        let input = open_input_file(input_file)?;
        let output = open_output_file(output_file)?;
        self.encode(input, output)
            .map_err(|e| e.with_stream_names(input_file, output_file))
    }

    pub fn decode_file(&self, input_file: &Path, output_file: &Path) -> crate::Result<DecodeSummary> {
        let input = open_input_file(input_file)?;
        let output = open_output_file(output_file)?;
        self.decode(input, output)
            .map_err(|e| e.with_stream_names(input_file, output_file))
    }

    /// Expected code units per symbol for the distribution in `table`.
    ///
    /// Symbols without code word count towards the total with zero units.
    pub fn estimate_cost(&self, table: &FrequencyTable) -> f64 {
        let total = table.total();
        if total == 0 {
            return 0.0;
        }
        let units = table
            .iter()
            .map(|entry| {
                let length = self.codebook.codes().get(entry.symbol).map_or(0, |c| c.len());
                entry.frequency.saturating_mul(length)
            })
            .fold(0usize, usize::saturating_add);
        units as f64 / total as f64
    }
}

fn read_code_unit(byte: u8, position: usize) -> crate::Result<Branch> {
    // The raw byte is reported, a UTF-8 lead byte is no character of its own.
    Branch::from_code_unit(char::from(byte)).ok_or(Error::InvalidCodeUnit { byte, position })
}

fn write_symbol<W: Write>(writer: &mut W, symbol: Symbol) -> crate::Result<()> {
    let mut buffer = [0; 4];
    writer
        .write_all(symbol.encode_utf8(&mut buffer).as_bytes())
        .map_err(|e| Error::sink_unavailable(OUTPUT_STREAM, e))
}

fn warn_about_dangling_units(dangling_units: usize) {
    if dangling_units > 0 {
        log::warn!(
            "Ignoring {} trailing code units that do not end in a symbol",
            dangling_units
        );
    }
}

#[cfg(test)]
mod test {
    use std::io::{self, Write};

    use super::Transcoder;
    use crate::error::Error;
    use crate::huffman::{Codebook, FrequencyCounter, FrequencyTable, SymbolFrequency};

    const CLASSIC_FREQUENCIES: &[(char, usize); 6] =
        &[('a', 5), ('b', 9), ('c', 12), ('d', 13), ('e', 16), ('f', 45)];

    fn create_codebook(symbols_and_frequencies: &[(char, usize)]) -> Codebook {
        Codebook::build(&create_table(symbols_and_frequencies))
    }

    fn create_table(symbols_and_frequencies: &[(char, usize)]) -> FrequencyTable {
        symbols_and_frequencies
            .iter()
            .copied()
            .map(SymbolFrequency::from)
            .collect()
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn test_encode_classic() {
        let codebook = create_codebook(CLASSIC_FREQUENCIES);
        let transcoder = Transcoder::new(&codebook);
        let encoded = transcoder.encode_str("Face, 42!").unwrap();
        assert_eq!(encoded, "01100100111");
    }

    #[test]
    fn test_encode_skips_symbols_without_code() {
        let codebook = create_codebook(&[('a', 2), ('b', 1)]);
        let transcoder = Transcoder::new(&codebook);
        let mut output = Vec::new();
        let summary = transcoder.encode("abcab".as_bytes(), &mut output).unwrap();
        assert_eq!(summary.symbols_encoded, 4);
        assert_eq!(summary.symbols_skipped, 1);
        assert_eq!(summary.code_units_written, 4);
        assert_eq!(output, b"1010");
    }

    #[test]
    fn test_decode_classic() {
        let codebook = create_codebook(CLASSIC_FREQUENCIES);
        let transcoder = Transcoder::new(&codebook);
        let decoded = transcoder.decode_str("011001001110").unwrap();
        assert_eq!(decoded, "facef");
    }

    #[test]
    fn test_round_trip() {
        let text = "The quick brown fox jumps over the lazy dog, twice: THE QUICK BROWN FOX!";
        let counter = FrequencyCounter::new(0);
        let table = counter.count_str(text).unwrap();
        let codebook = Codebook::build(&table);
        let transcoder = Transcoder::new(&codebook);

        let encoded = transcoder.encode_str(text).unwrap();
        let decoded = transcoder.decode_str(&encoded).unwrap();
        let expected: String = text
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_decode_invalid_code_unit() {
        let codebook = create_codebook(CLASSIC_FREQUENCIES);
        let transcoder = Transcoder::new(&codebook);
        let mut output = Vec::new();
        let result = transcoder.decode("010x1".as_bytes(), &mut output);
        match result {
            Err(Error::InvalidCodeUnit { byte, position }) => {
                assert_eq!(byte, b'x');
                assert_eq!(position, 3);
            }
            other => panic!("Expected InvalidCodeUnit, got {:?}", other),
        }
        assert_eq!(output, b"f", "Partial output before the invalid unit");
    }

    #[test]
    fn test_decode_trailing_newline_is_invalid() {
        let codebook = create_codebook(CLASSIC_FREQUENCIES);
        let transcoder = Transcoder::new(&codebook);
        assert!(matches!(
            transcoder.decode_str("0\n"),
            Err(Error::InvalidCodeUnit { byte: b'\n', position: 1 })
        ));
    }

    #[test]
    fn test_decode_reports_non_ascii_byte_unchanged() {
        let codebook = create_codebook(CLASSIC_FREQUENCIES);
        let transcoder = Transcoder::new(&codebook);
        for result in [
            transcoder.decode("0ä".as_bytes(), Vec::new()),
            transcoder.decode_by_lookup("0ä".as_bytes(), Vec::new()),
        ] {
            match result {
                Err(Error::InvalidCodeUnit { byte, position }) => {
                    assert_eq!(byte, 0xC3, "First UTF-8 byte of 'ä' expected");
                    assert_eq!(position, 1);
                }
                other => panic!("Expected InvalidCodeUnit, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_decode_reports_dangling_units() {
        let codebook = create_codebook(CLASSIC_FREQUENCIES);
        let transcoder = Transcoder::new(&codebook);
        let mut output = Vec::new();
        let summary = transcoder.decode("0110".as_bytes(), &mut output).unwrap();
        assert_eq!(output, b"f");
        assert_eq!(summary.symbols_decoded, 1);
        assert_eq!(summary.code_units_read, 4);
        assert_eq!(summary.dangling_units, 3);
    }

    #[test]
    fn test_decode_by_lookup_agrees_with_tree_walk() {
        let codebook = create_codebook(CLASSIC_FREQUENCIES);
        let transcoder = Transcoder::new(&codebook);
        let encoded = transcoder.encode_str("deadbeefcafe").unwrap();

        let mut walked = Vec::new();
        let walk_summary = transcoder.decode(encoded.as_bytes(), &mut walked).unwrap();
        let mut looked_up = Vec::new();
        let lookup_summary = transcoder
            .decode_by_lookup(encoded.as_bytes(), &mut looked_up)
            .unwrap();

        assert_eq!(walked, b"deadbeefcafe");
        assert_eq!(walked, looked_up);
        assert_eq!(walk_summary, lookup_summary);
    }

    #[test]
    fn test_decode_by_lookup_invalid_code_unit() {
        let codebook = create_codebook(CLASSIC_FREQUENCIES);
        let transcoder = Transcoder::new(&codebook);
        let result = transcoder.decode_by_lookup("012".as_bytes(), Vec::new());
        assert!(matches!(
            result,
            Err(Error::InvalidCodeUnit { byte: b'2', position: 2 })
        ));
    }

    #[test]
    fn test_single_symbol_encodes_to_nothing() {
        let codebook = create_codebook(&[('a', 5)]);
        let transcoder = Transcoder::new(&codebook);
        let mut output = Vec::new();
        let summary = transcoder.encode("aaaaa".as_bytes(), &mut output).unwrap();
        assert!(output.is_empty());
        assert_eq!(summary.symbols_encoded, 5);
        assert_eq!(summary.code_units_written, 0);
        assert_eq!(transcoder.decode_str("").unwrap(), "");
    }

    #[test]
    fn test_single_symbol_rejects_code_units() {
        let codebook = create_codebook(&[('a', 5)]);
        let transcoder = Transcoder::new(&codebook);
        assert!(matches!(
            transcoder.decode_str("0"),
            Err(Error::CodeUnitsForSingleSymbol { position: 0 })
        ));
        assert!(matches!(
            transcoder.decode_by_lookup("1".as_bytes(), Vec::new()),
            Err(Error::CodeUnitsForSingleSymbol { position: 0 })
        ));
    }

    #[test]
    fn test_empty_codebook() {
        let codebook = Codebook::build(&FrequencyTable::new());
        let transcoder = Transcoder::new(&codebook);
        assert_eq!(transcoder.encode_str("anything at all").unwrap(), "");
        assert_eq!(transcoder.decode_str("").unwrap(), "");
        assert!(matches!(transcoder.decode_str("01"), Err(Error::EmptyAlphabet)));
        assert_eq!(transcoder.estimate_cost(&FrequencyTable::new()), 0.0);
    }

    #[test]
    fn test_estimate_cost_classic() {
        let table = create_table(CLASSIC_FREQUENCIES);
        let codebook = Codebook::build(&table);
        let cost = Transcoder::new(&codebook).estimate_cost(&table);
        assert!((cost - 2.24).abs() < 1e-9, "Cost {} does not match", cost);
        assert!(cost < 3.0, "Must beat the fixed length code");
    }

    #[test]
    fn test_estimate_cost_counts_unknown_symbols_as_zero_units() {
        let codebook = create_codebook(&[('a', 1), ('b', 1)]);
        let table = create_table(&[('a', 1), ('b', 1), ('c', 2)]);
        let cost = Transcoder::new(&codebook).estimate_cost(&table);
        assert!((cost - 0.5).abs() < 1e-9, "Cost {} does not match", cost);
    }

    #[test]
    fn test_unwritable_sink_is_reported() {
        let codebook = create_codebook(CLASSIC_FREQUENCIES);
        let transcoder = Transcoder::new(&codebook);
        let result = transcoder.encode("face".as_bytes(), BrokenSink);
        assert!(matches!(result, Err(Error::SinkUnavailable(_, _))));
        let result = transcoder.decode("0".as_bytes(), BrokenSink);
        assert!(matches!(result, Err(Error::SinkUnavailable(_, _))));
    }
}
