use crate::huffman::CodeTable;

const LOG_CONFIGURATION_FILE: &str = "log4rs.yaml";

#[ctor::ctor]
fn init() {
    if let Err(error) = log4rs::init_file(LOG_CONFIGURATION_FILE, Default::default()) {
        eprintln!(
            "Logging disabled, unable to load '{}': {}",
            LOG_CONFIGURATION_FILE, error
        );
    }
}

pub fn log_code_table(codes: &CodeTable) {
    fn get_code_list(codes: &CodeTable) -> Vec<String> {
        codes
            .iter()
            .map(|(symbol, code)| format!("{}={}", symbol, code))
            .collect()
    }
    log::debug!("{} code words {:?}", codes.len(), get_code_list(codes));
}
