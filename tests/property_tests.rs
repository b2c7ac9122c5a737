use std::collections::{BTreeMap, VecDeque};

use huffman_text_coder::huffman::{
    Codebook, FrequencyCounter, FrequencyTable, HuffmanTree, SymbolFrequency, Transcoder,
};
use proptest::prelude::*;

fn create_table(frequencies: &BTreeMap<char, usize>) -> FrequencyTable {
    frequencies
        .iter()
        .map(|(&symbol, &frequency)| SymbolFrequency::new(symbol, frequency))
        .collect()
}

fn take_smallest(leaves: &mut VecDeque<usize>, merged: &mut VecDeque<usize>) -> Option<usize> {
    match (leaves.front().copied(), merged.front().copied()) {
        (Some(l), Some(m)) if m < l => merged.pop_front(),
        (Some(_), _) => leaves.pop_front(),
        (None, _) => merged.pop_front(),
    }
}

/// Optimal weighted path length by the two queue merge over sorted weights.
fn optimal_weighted_path_length(mut weights: Vec<usize>) -> usize {
    weights.sort_unstable();
    let mut leaves: VecDeque<usize> = weights.into();
    let mut merged: VecDeque<usize> = VecDeque::new();
    let mut cost = 0;
    while leaves.len() + merged.len() > 1 {
        let first = take_smallest(&mut leaves, &mut merged).unwrap();
        let second = take_smallest(&mut leaves, &mut merged).unwrap();
        cost += first + second;
        merged.push_back(first + second);
    }
    cost
}

fn frequencies_strategy() -> impl Strategy<Value = BTreeMap<char, usize>> {
    prop::collection::btree_map(prop::char::range('a', 'z'), 1usize..1000, 2..=26)
}

proptest! {
    #[test]
    fn test_round_trip(text in "[a-zA-Z0-9 ,.!\n]{1,300}") {
        let table = FrequencyCounter::new(0).count_str(&text).unwrap();
        prop_assume!(table.len() >= 2);
        let codebook = Codebook::build(&table);
        let transcoder = Transcoder::new(&codebook);

        let encoded = transcoder.encode_str(&text).unwrap();
        let decoded = transcoder.decode_str(&encoded).unwrap();
        let expected: String = text
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn test_codes_are_prefix_free(frequencies in frequencies_strategy()) {
        let codebook = Codebook::build(&create_table(&frequencies));
        let codes: Vec<_> = codebook.codes().iter().collect();
        prop_assert_eq!(codes.len(), frequencies.len());
        for (i, (symbol_a, code_a)) in codes.iter().enumerate() {
            prop_assert!(!code_a.is_empty());
            for (symbol_b, code_b) in codes.iter().skip(i + 1) {
                prop_assert!(
                    !code_a.is_prefix_of(code_b) && !code_b.is_prefix_of(code_a),
                    "codes of {} ({}) and {} ({}) overlap",
                    symbol_a, code_a, symbol_b, code_b
                );
            }
        }
    }

    #[test]
    fn test_code_lengths_satisfy_kraft_equality(frequencies in frequencies_strategy()) {
        let codebook = Codebook::build(&create_table(&frequencies));
        let lengths = codebook.code_lengths();
        let longest = lengths.iter().map(|l| l.length).max().unwrap() as u32;
        let sum: u64 = lengths.iter().map(|l| 1u64 << (longest - l.length as u32)).sum();
        prop_assert_eq!(sum, 1u64 << longest);
    }

    #[test]
    fn test_tree_is_optimal(frequencies in frequencies_strategy()) {
        let codebook = Codebook::build(&create_table(&frequencies));
        let tree = codebook.tree().unwrap();
        let expected = optimal_weighted_path_length(frequencies.values().copied().collect());
        prop_assert_eq!(tree.weighted_path_length(), expected);
    }

    #[test]
    fn test_path_length_is_independent_of_tie_order(frequencies in frequencies_strategy()) {
        let forward: Vec<SymbolFrequency> = frequencies
            .iter()
            .map(|(&symbol, &frequency)| SymbolFrequency::new(symbol, frequency))
            .collect();
        let mut backward = forward.clone();
        backward.reverse();
        let forward_tree = HuffmanTree::new(&forward).unwrap();
        let backward_tree = HuffmanTree::new(&backward).unwrap();
        prop_assert_eq!(
            forward_tree.weighted_path_length(),
            backward_tree.weighted_path_length()
        );

        let table = create_table(&frequencies);
        let codebook = Codebook::build(&table);
        let cost = Transcoder::new(&codebook).estimate_cost(&table);
        let expected = backward_tree.weighted_path_length() as f64 / table.total() as f64;
        prop_assert!((cost - expected).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_code_unit_is_rejected(
        frequencies in frequencies_strategy(),
        prefix in "[01]{0,20}",
        invalid in "[^01]"
    ) {
        let codebook = Codebook::build(&create_table(&frequencies));
        let transcoder = Transcoder::new(&codebook);
        let input = format!("{}{}", prefix, invalid);
        prop_assert!(transcoder.decode_str(&input).is_err());
    }
}
