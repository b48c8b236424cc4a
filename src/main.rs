//! plainmerge CLI
//!
//! Entry point for the `plainmerge` command-line tool.

use clap::{Args, Parser, Subcommand};
use plainmerge::config::{
    default_host_config_path, ConfigError, EffectiveConfig, OutputOptions, REPO_CONFIG_FILE,
};
use plainmerge::{document, progressive};
use plainmerge::{ClassifyReport, Merger, Record, Vacancy, Value};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plainmerge")]
#[command(about = "Classify and deep-merge plain data documents", version)]
struct Cli {
    /// Log merge decisions to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Settings {
    /// Path to repo config file (default: .plainmerge.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Which nested target slots may be replaced (absent_or_null, falsy)
    #[arg(long)]
    vacancy: Option<Vacancy>,

    /// Deepest record nesting to merge
    #[arg(long)]
    max_depth: Option<usize>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,

    /// Sort keys in the output
    #[arg(long)]
    sort_keys: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge documents in order, later files win
    Merge {
        /// JSON or TOML documents (`-` reads JSON from stdin)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        settings: Settings,
    },

    /// Explain how a value classifies
    Classify {
        /// JSON or TOML document
        file: PathBuf,

        /// JSON pointer to the value inside the document
        #[arg(long, short = 'p', default_value = "")]
        pointer: String,

        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,
    },

    /// Print the cumulative fragment for each step of a step list
    Steps {
        /// Document whose top-level array holds one fragment per step
        file: PathBuf,

        /// Combine steps with the recursive merge instead of key overwrite
        #[arg(long)]
        deep: bool,

        #[command(flatten)]
        settings: Settings,
    },

    /// Print the effective configuration with provenance
    Config {
        #[command(flatten)]
        settings: Settings,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Merge { files, settings } => {
            run_merge(files, settings);
        }
        Commands::Classify {
            file,
            pointer,
            human,
        } => {
            run_classify(file, &pointer, human);
        }
        Commands::Steps {
            file,
            deep,
            settings,
        } => {
            run_steps(file, deep, settings);
        }
        Commands::Config { settings } => {
            run_config(settings);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", context, err);
    process::exit(1);
}

/// CLI flags as the highest-precedence config layer
fn cli_overrides(settings: &Settings) -> Option<Value> {
    let mut layer = Record::new();
    if let Some(depth) = settings.max_depth {
        layer.insert("max_depth", depth as u64);
    }
    if let Some(vacancy) = settings.vacancy {
        layer.insert("vacancy", vacancy.as_str());
    }

    let mut output = Record::new();
    if settings.compact {
        output.insert("pretty", false);
    }
    if settings.sort_keys {
        output.insert("sort_keys", true);
    }
    if !output.is_empty() {
        layer.insert("output", output);
    }

    (!layer.is_empty()).then_some(Value::Record(layer))
}

fn load_config(settings: &Settings) -> Result<EffectiveConfig, ConfigError> {
    let repo_path = settings
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(REPO_CONFIG_FILE));
    let host_path = default_host_config_path();

    EffectiveConfig::build(
        host_path.as_deref(),
        Some(repo_path.as_path()),
        cli_overrides(settings),
    )
}

fn print_value(mut value: Value, output: OutputOptions) {
    if output.sort_keys {
        value.sort_keys();
    }
    let rendered = if output.pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    };
    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => fail("Error serializing output", e),
    }
}

fn run_merge(files: Vec<PathBuf>, settings: Settings) {
    let config = match load_config(&settings) {
        Ok(c) => c,
        Err(e) => fail("Error loading config", e),
    };
    let merger = Merger::new(config.merge_options());

    let mut layers = Vec::with_capacity(files.len());
    for path in &files {
        match document::load(path) {
            Ok(doc) => layers.push(doc.value),
            Err(e) => fail("Error loading document", e),
        }
    }

    match merger.merge_layers(layers) {
        Ok(merged) => print_value(merged, config.output_options()),
        Err(e) => fail("Merge failed", e),
    }
}

fn run_classify(file: PathBuf, pointer: &str, human: bool) {
    let doc = match document::load(&file) {
        Ok(d) => d,
        Err(e) => fail("Error loading document", e),
    };

    let Some(value) = doc.value.pointer(pointer) else {
        fail("Error", format!("no value at pointer '{}'", pointer));
    };
    let report = ClassifyReport::new(pointer, value);

    if human {
        println!("{}", report.to_human());
    } else {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => fail("Error serializing output", e),
        }
    }
}

fn run_steps(file: PathBuf, deep: bool, settings: Settings) {
    let config = match load_config(&settings) {
        Ok(c) => c,
        Err(e) => fail("Error loading config", e),
    };
    let doc = match document::load(&file) {
        Ok(d) => d,
        Err(e) => fail("Error loading document", e),
    };

    let fragments = progressive::fragments_from(doc.value);
    let steps = if deep {
        let merger = Merger::new(config.merge_options());
        match progressive::cumulative_deep(fragments, &merger) {
            Ok(steps) => steps,
            Err(e) => fail("Merge failed", e),
        }
    } else {
        progressive::cumulative(fragments)
    };

    let steps = Value::Array(steps.into_iter().map(Value::Record).collect());
    print_value(steps, config.output_options());
}

fn run_config(settings: Settings) {
    match load_config(&settings).map(|c| c.to_json()) {
        Ok(Ok(json)) => println!("{}", json),
        Ok(Err(e)) => fail("Error serializing output", e),
        Err(e) => fail("Error loading config", e),
    }
}
