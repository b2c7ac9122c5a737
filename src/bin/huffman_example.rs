use huffman_text_coder::huffman::{Codebook, FrequencyTable, SymbolFrequency, Transcoder};
use huffman_text_coder::report::CodeTableReport;
use huffman_text_coder::Result;

fn main() -> Result<()> {
    // symbol-frequency pairs
    let syms_and_freqs = [('a', 5), ('b', 9), ('c', 12), ('d', 13), ('e', 16), ('f', 45)];
    let table: FrequencyTable = syms_and_freqs
        .map(SymbolFrequency::from)
        .into_iter()
        .collect();

    let codebook = Codebook::build(&table);
    if let Some(tree) = codebook.tree() {
        println!("huffman tree\n{}", tree);
    }
    println!("{}", CodeTableReport(codebook.codes()));

    let coder = Transcoder::new(&codebook);
    println!(
        "average cost\n{:.2} bits per symbol",
        coder.estimate_cost(&table)
    );

    let sequence_to_encode = "A Bad Face, fed a Cabbage!";
    let encoded = coder.encode_str(sequence_to_encode)?;
    println!("sequence to encode\n{}", sequence_to_encode);
    println!("encoded sequence\n{}", encoded);

    let decoded = coder.decode_str(&encoded)?;
    println!("decoded sequence\n{}", decoded);
    Ok(())
}
