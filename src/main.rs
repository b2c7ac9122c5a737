use std::env::args_os;

use huffman_text_coder::report::{CodeTableReport, FrequencyReport};
use huffman_text_coder::{run_pipeline, CLIParser};

fn main() {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match run_pipeline(&arguments) {
        Ok(outcome) => {
            println!("{}\n", FrequencyReport(&outcome.frequencies));
            println!("{}\n", CodeTableReport(outcome.codebook.codes()));
            println!("Average cost: {:.4} bits per symbol\n", outcome.average_cost);
            for report in outcome.file_reports.iter() {
                println!(
                    "{} -> {} -> {} ({} symbols, {} code units, round trip {})",
                    report.input_file.display(),
                    report.encoded_file.display(),
                    report.decoded_file.display(),
                    report.encode.symbols_encoded,
                    report.encode.code_units_written,
                    if report.round_trip_intact { "intact" } else { "differs" }
                );
            }
        }
        Err(e) => eprintln!("Coding failed because of: {}", e),
    }
}
