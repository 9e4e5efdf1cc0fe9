// esorun: run an esoteric-language program from the command line

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use esorun::{ExecutionConfig, Language};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "esorun", version, about = "Run esoteric-language programs under strict resource bounds")]
struct Cli {
    /// Language identifier (see --list)
    #[arg(required_unless_present = "list")]
    language: Option<String>,

    /// Source file, or `-` to read standard input
    #[arg(required_unless_present = "list")]
    file: Option<PathBuf>,

    /// Step ceiling applied to every machine
    #[arg(long)]
    max_steps: Option<u64>,

    /// Number of tape cells
    #[arg(long)]
    tape_size: Option<usize>,

    /// Seed for the grid machine's random turn
    #[arg(long)]
    seed: Option<u64>,

    /// JSON execution config; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// List supported languages and exit
    #[arg(long)]
    list: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "esorun=debug" } else { "esorun=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_source(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        fs::read_to_string(path)
    }
}

fn build_config(cli: &Cli) -> Result<ExecutionConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => ExecutionConfig::from_json(&fs::read_to_string(path)?)?,
        None => ExecutionConfig::default(),
    };
    if let Some(steps) = cli.max_steps {
        config = config.with_max_steps(steps);
    }
    if let Some(cells) = cli.tape_size {
        config = config.with_tape_size(cells);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list {
        for lang in Language::all() {
            println!("{:<12} {}", lang.id(), lang.name());
        }
        return Ok(());
    }

    let (Some(language_id), Some(file)) = (&cli.language, &cli.file) else {
        eprintln!("Error: a language and a source file are required");
        std::process::exit(2);
    };

    let language: Language = match language_id.parse() {
        Ok(language) => language,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run with --list to see supported languages.");
            std::process::exit(2);
        }
    };

    if file.as_os_str() != "-" && !file.exists() {
        eprintln!("Error: File '{}' not found", file.display());
        std::process::exit(1);
    }

    let source = read_source(file)?;
    let config = build_config(&cli)?;
    info!(language = language.id(), file = %file.display(), "running");

    let result = esorun::run(language, &source, &config);
    let mut stdout = io::stdout();

    match result {
        Ok(output) => {
            if cli.json {
                writeln!(stdout, "{}", serde_json::to_string_pretty(&output)?)?;
            } else {
                write!(stdout, "{}", output.text)?;
            }
            stdout.flush()?;
            Ok(())
        }
        Err(err) => {
            if cli.json {
                writeln!(stdout, "{}", serde_json::to_string_pretty(&err.report())?)?;
            } else {
                write!(stdout, "{}", err.partial_output())?;
                stdout.flush()?;
                eprintln!();
                eprintln!("Error: {}", err);
            }
            stdout.flush()?;
            std::process::exit(1);
        }
    }
}
