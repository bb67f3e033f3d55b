use std::fs::{self, File};
use std::io::Write as _;
use std::path::PathBuf;

use clap::Parser;
use convert_dicts::convert::{self, RunConfig};
use convert_dicts::frequency_list::{MergePolicy, SortOrder};

const LOG_FILE: &str = "logs/converter.log";

/// Convert dictionary archives into flashcard-tool frequency lists.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of test cases to print after each conversion
    #[arg(short, long, default_value_t = 0)]
    tests: usize,

    /// Use this if the dictionaries use number of occurrences rather than
    /// frequency rank
    #[arg(short = 'r', long = "is_reverse")]
    is_reverse: bool,

    /// Directory containing the .zip dictionary archives
    #[arg(long, default_value = "dicts")]
    input: PathBuf,

    /// Directory the converted frequency lists are written to
    #[arg(long, default_value = "output")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    setup_logging()?;

    let args = Args::parse();
    let config = RunConfig {
        input: args.input,
        output: args.output,
        order: SortOrder::from_reverse_flag(args.is_reverse),
        merge_policy: MergePolicy::Append,
        tests: args.tests,
    };

    convert::run(&config)
}

/// Log everything to `logs/converter.log`; `RUST_LOG` overrides the level.
fn setup_logging() -> anyhow::Result<()> {
    fs::create_dir_all("logs")?;
    let log_file = File::create(LOG_FILE)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .format(|buf, record| writeln!(buf, "{} : {}", record.level(), record.args()))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}
