use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use info_parser::config::{self, DEFAULT_CONFIG_FILE, DEFAULT_CUSTOM_FILE};
use info_parser::{ApplicantResult, CustomKeywords, Result, SharedRegistry, samples};

#[derive(Parser)]
#[command(
    name = "info-parser",
    about = "Split applicant strings into organization, name and role"
)]
struct Cli {
    /// Keyword configuration (YAML); written with defaults if missing
    #[arg(long, global = true, env = "INFO_PARSER_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Custom abbreviations / excluded keywords (JSON)
    #[arg(long, global = true, default_value = DEFAULT_CUSTOM_FILE)]
    custom: PathBuf,

    /// Keep secondary units (e.g. 计算机学院) in the organization
    #[arg(long, global = true)]
    secondary_unit: Option<bool>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse one applicant string
    Parse {
        /// Input text; several words are joined with a space
        #[arg(required = true)]
        text: Vec<String>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
        /// Also print the segmentation
        #[arg(long)]
        tokens: bool,
    },
    /// Parse every line of a sample file ("-" reads stdin)
    Batch {
        file: PathBuf,
        /// One JSON object per line
        #[arg(long)]
        json: bool,
    },
    /// Show how a string is segmented
    Segment {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Add custom abbreviations or excluded keywords
    Keywords {
        /// Organization abbreviation, e.g. 哈理工
        #[arg(long = "abbreviation")]
        abbreviations: Vec<String>,
        /// Word kept whole inside a name, e.g. 张大 in 张大学生
        #[arg(long = "excluded")]
        excluded: Vec<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let outcome = match &cli.command {
        Command::Parse { text, json, tokens } => run_parse(&cli, &text.join(" "), *json, *tokens),
        Command::Batch { file, json } => run_batch(&cli, file, *json),
        Command::Segment { text } => run_segment(&cli, &text.join(" ")),
        Command::Keywords {
            abbreviations,
            excluded,
        } => run_keywords(&cli, abbreviations, excluded),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  REGISTRY
// ═══════════════════════════════════════════════════════════════════════

fn load_registry(cli: &Cli) -> Result<SharedRegistry> {
    let mut registry = config::load_or_init(&cli.config)?;
    CustomKeywords::load(&cli.custom)?.apply(&mut registry);
    if let Some(flag) = cli.secondary_unit {
        registry.formatting.include_secondary_unit = flag;
    }
    SharedRegistry::new(registry)
}

// ═══════════════════════════════════════════════════════════════════════
//  COMMANDS
// ═══════════════════════════════════════════════════════════════════════

fn print_result(result: &ApplicantResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(result)?);
    } else {
        println!("{result}");
    }
    Ok(())
}

fn run_parse(cli: &Cli, text: &str, json: bool, show_tokens: bool) -> Result<()> {
    let registry = load_registry(cli)?;
    let result = registry.parse(text);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if show_tokens {
        println!("输入：{}", result.input());
        println!("分词：{}", result.tokens().join(", "));
        println!("机构：{}", result.organization());
        println!("姓名：{}", result.name());
        println!("身份：{}", result.role().as_chinese());
    }
    print_result(&result, false)
}

fn run_batch(cli: &Cli, file: &Path, json: bool) -> Result<()> {
    let registry = load_registry(cli)?;
    let lines = if file == Path::new("-") {
        samples::read_samples(io::stdin().lock())?
    } else {
        samples::load_samples(file)?
    };
    info!(samples = lines.len(), "parsing batch");

    // one snapshot for the whole batch
    let engine = registry.snapshot();
    for line in &lines {
        print_result(&engine.parse(line), json)?;
    }
    Ok(())
}

fn run_segment(cli: &Cli, text: &str) -> Result<()> {
    let registry = load_registry(cli)?;
    let tokens = registry.snapshot().segment(text);
    println!("{}", tokens.join(" | "));
    Ok(())
}

fn run_keywords(cli: &Cli, abbreviations: &[String], excluded: &[String]) -> Result<()> {
    let registry = load_registry(cli)?;

    let mut custom = CustomKeywords::load(&cli.custom)?;
    custom.merge(abbreviations, excluded);

    // validate against the live registry before persisting
    registry.add_abbreviations(&custom.abbreviations)?;
    registry.add_excluded_keywords(&custom.excluded_keywords)?;
    custom.save(&cli.custom)?;

    let engine = registry.snapshot();
    eprintln!(
        "{}: {} abbreviations, {} excluded keywords ({} dictionary words)",
        cli.custom.display(),
        custom.abbreviations.len(),
        custom.excluded_keywords.len(),
        engine.segmenter().len()
    );
    Ok(())
}
