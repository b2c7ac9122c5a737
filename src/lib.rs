use std::{
    collections::{HashMap, HashSet},
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
    sync::{mpsc, Arc},
};

pub use cli::CLIParser;
use error::Error;
use huffman::{
    fold_symbol, Codebook, DecodeSummary, EncodeSummary, FrequencyCounter, FrequencyTable,
    Transcoder,
};
use threadpool::ThreadPool;

mod cli;
pub mod error;
pub mod huffman;
mod logger;
pub mod report;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    input_files: Vec<PathBuf>,
    output_directory: PathBuf,
    minimum_symbol_count: usize,
    number_of_threads: usize,
}

/// Outcome of coding one input file.
#[derive(Debug)]
pub struct FileReport {
    pub input_file: PathBuf,
    pub encoded_file: PathBuf,
    pub decoded_file: PathBuf,
    pub encode: EncodeSummary,
    pub decode: DecodeSummary,
    /// The decoded file equals the letters of the input, case folded.
    pub round_trip_intact: bool,
}

pub struct PipelineOutcome {
    pub frequencies: FrequencyTable,
    /// The merged table reached the minimum symbol count.
    pub statistics_adequate: bool,
    pub codebook: Arc<Codebook>,
    pub average_cost: f64,
    pub file_reports: Vec<FileReport>,
}

pub(crate) fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path)
        .map_err(|e| Error::SourceUnavailable(file_path.display().to_string(), e))
}

pub(crate) fn open_output_file(file_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| Error::SinkUnavailable(file_path.display().to_string(), e))
}

/// Counts all input files, builds one codebook from the combined statistics,
/// then encodes and decodes every file with it.
pub fn run_pipeline(arguments: &Arguments) -> Result<PipelineOutcome> {
    let pool = ThreadPool::new(arguments.number_of_threads.max(1));
    let counter = FrequencyCounter::new(arguments.minimum_symbol_count);

    let output_files = plan_output_files(&arguments.input_files, &arguments.output_directory)?;
    let frequencies = count_input_files(&arguments.input_files, counter, &pool)?;
    let statistics_adequate = counter.check_adequacy(&frequencies);
    let codebook = Arc::new(Codebook::build(&frequencies));
    logger::log_code_table(codebook.codes());
    let average_cost = Transcoder::new(&codebook).estimate_cost(&frequencies);
    log::info!("Average cost {:.4} code units per symbol", average_cost);

    let file_reports =
        transcode_input_files(&arguments.input_files, output_files, &codebook, &pool)?;

    Ok(PipelineOutcome {
        frequencies,
        statistics_adequate,
        codebook,
        average_cost,
        file_reports,
    })
}

fn count_input_files(
    input_files: &[PathBuf],
    counter: FrequencyCounter,
    pool: &ThreadPool,
) -> Result<FrequencyTable> {
    let (sender, receiver) = mpsc::channel();
    for input_file in input_files.iter().cloned() {
        let sender = sender.clone();
        pool.execute(move || {
            let result = counter.count_file(&input_file);
            let _ = sender.send(result);
        });
    }
    drop(sender);

    let mut frequencies = FrequencyTable::new();
    let mut received = 0;
    for result in receiver.iter() {
        frequencies.merge(&result?);
        received += 1;
    }
    ensure_all_jobs_reported(received, input_files.len())?;
    Ok(frequencies)
}

fn transcode_input_files(
    input_files: &[PathBuf],
    output_files: Vec<OutputFiles>,
    codebook: &Arc<Codebook>,
    pool: &ThreadPool,
) -> Result<Vec<FileReport>> {
    let (sender, receiver) = mpsc::channel();
    let jobs = input_files.iter().cloned().zip(output_files).enumerate();
    for (index, (input_file, output_files)) in jobs {
        let sender = sender.clone();
        let codebook = Arc::clone(codebook);
        pool.execute(move || {
            let result = transcode_into(&codebook, &input_file, output_files);
            let _ = sender.send((index, result));
        });
    }
    drop(sender);

    let mut file_reports = Vec::with_capacity(input_files.len());
    for (index, result) in receiver.iter() {
        file_reports.push((index, result?));
    }
    ensure_all_jobs_reported(file_reports.len(), input_files.len())?;
    file_reports.sort_by_key(|(index, _)| *index);
    Ok(file_reports.into_iter().map(|(_, report)| report).collect())
}

fn ensure_all_jobs_reported(received: usize, expected: usize) -> Result<()> {
    if received < expected {
        return Err(Error::WorkerFailed {
            missing: expected - received,
            expected,
        });
    }
    Ok(())
}

/// Encoded and decoded file written for one input.
#[derive(Clone, Debug, PartialEq, Eq)]
struct OutputFiles {
    encoded: PathBuf,
    decoded: PathBuf,
}

impl OutputFiles {
    fn new(output_directory: &Path, stem: &str) -> Self {
        Self {
            encoded: output_directory.join(format!("{}.encoded.txt", stem)),
            decoded: output_directory.join(format!("{}.decoded.txt", stem)),
        }
    }
}

/// Names the outputs of every input before any file is written.
///
/// Inputs sharing a stem get their 1-based position appended to it. A path
/// that still equals an input or another output is an [`Error::OutputCollision`].
fn plan_output_files(
    input_files: &[PathBuf],
    output_directory: &Path,
) -> Result<Vec<OutputFiles>> {
    let stems: Vec<String> = input_files.iter().map(|file| file_stem(file)).collect();
    let mut stem_counts: HashMap<&str, usize> = HashMap::new();
    for stem in stems.iter() {
        *stem_counts.entry(stem.as_str()).or_default() += 1;
    }

    let planned: Vec<OutputFiles> = stems
        .iter()
        .enumerate()
        .map(|(index, stem)| {
            if stem_counts[stem.as_str()] > 1 {
                OutputFiles::new(output_directory, &format!("{}.{}", stem, index + 1))
            } else {
                OutputFiles::new(output_directory, stem)
            }
        })
        .collect();

    ensure_distinct_paths(input_files, &planned)?;
    Ok(planned)
}

fn ensure_distinct_paths(input_files: &[PathBuf], planned: &[OutputFiles]) -> Result<()> {
    let mut taken: HashSet<PathBuf> = input_files.iter().map(|file| resolve_path(file)).collect();
    for output_files in planned.iter() {
        for path in [&output_files.encoded, &output_files.decoded] {
            if !taken.insert(resolve_path(path)) {
                return Err(Error::OutputCollision(path.display().to_string()));
            }
        }
    }
    Ok(())
}

fn file_stem(input_file: &Path) -> String {
    input_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("input"))
}

/// Absolute form of `path` for comparison, the file itself need not exist yet.
fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    let Some(name) = path.file_name() else {
        return path.to_path_buf();
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    parent
        .canonicalize()
        .map(|parent| parent.join(name))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Encodes `input_file` next to its decoded counterpart in `output_directory`.
pub fn transcode_file(
    codebook: &Codebook,
    input_file: &Path,
    output_directory: &Path,
) -> Result<FileReport> {
    let output_files = OutputFiles::new(output_directory, &file_stem(input_file));
    ensure_distinct_paths(
        &[input_file.to_path_buf()],
        std::slice::from_ref(&output_files),
    )?;
    transcode_into(codebook, input_file, output_files)
}

fn transcode_into(
    codebook: &Codebook,
    input_file: &Path,
    output_files: OutputFiles,
) -> Result<FileReport> {
    let OutputFiles {
        encoded: encoded_file,
        decoded: decoded_file,
    } = output_files;
    let transcoder = Transcoder::new(codebook);

    let encode = transcoder.encode_file(input_file, &encoded_file)?;
    log::info!(
        "Encoded '{}' into {} code units",
        input_file.display(),
        encode.code_units_written
    );
    let decode = transcoder.decode_file(&encoded_file, &decoded_file)?;
    log::info!(
        "Decoded {} symbols into '{}'",
        decode.symbols_decoded,
        decoded_file.display()
    );

    let round_trip_intact =
        read_encodable_symbols(codebook, input_file)? == read_file(&decoded_file)?;
    if !round_trip_intact {
        log::warn!("Decoded '{}' differs from its input", decoded_file.display());
    }

    Ok(FileReport {
        input_file: input_file.to_path_buf(),
        encoded_file,
        decoded_file,
        encode,
        decode,
        round_trip_intact,
    })
}

fn read_file(file_path: &Path) -> Result<Vec<u8>> {
    std::fs::read(file_path).map_err(|e| Error::SourceUnavailable(file_path.display().to_string(), e))
}

fn read_encodable_symbols(codebook: &Codebook, file_path: &Path) -> Result<Vec<u8>> {
    Ok(read_file(file_path)?
        .into_iter()
        .filter(|&byte| fold_symbol(byte).is_some_and(|s| codebook.codes().get(s).is_some()))
        .map(|byte| byte.to_ascii_lowercase())
        .collect())
}
