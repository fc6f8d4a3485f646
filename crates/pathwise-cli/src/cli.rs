//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use pathwise_domain::RecordKind;

/// Pathwise CLI - Normalize captured LLM output into roadmaps, quizzes and exams.
#[derive(Debug, Parser)]
#[command(name = "pathwise")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PATHWISE_CONFIG")]
    pub config: Option<String>,

    /// Log pipeline stages to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (one question or phase per line)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize captured model output
    Normalize(NormalizeArgs),

    /// Produce placeholder records without any model output
    Fallback(RequestArgs),

    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

/// Request fields shared by every record-producing command.
#[derive(Debug, Parser)]
pub struct RequestArgs {
    /// Record kind to produce
    #[arg(short, long, value_enum)]
    pub schema: SchemaArg,

    /// Number of records wanted
    #[arg(short = 'n', long, default_value = "5")]
    pub count: usize,

    /// Topic or goal the records are about
    #[arg(short, long)]
    pub topic: String,

    /// Difficulty (easy, medium, hard)
    #[arg(short, long)]
    pub difficulty: Option<String>,

    /// Comma-separated sub-topics
    #[arg(long)]
    pub sub_topics: Option<String>,

    /// Keep answers in the output
    #[arg(long)]
    pub keep_answers: bool,

    /// Caller is allowed to see answers
    #[arg(long)]
    pub authorized: bool,
}

/// Arguments for the normalize command.
#[derive(Debug, Parser)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// File containing the model output
    #[arg(short = 'i', long)]
    pub file: Option<String>,

    /// Read the model output from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Treat the input as a provider JSON response body rather than plain text
    #[arg(long)]
    pub provider_json: bool,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a configuration file
    Init {
        /// Normalizer preset
        #[arg(short, long, value_enum, default_value = "default")]
        preset: PresetArg,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Record kind argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaArg {
    /// Career roadmap phases
    Roadmap,
    /// Quiz questions
    Quiz,
    /// Exam question paper
    Exam,
}

/// Normalizer preset argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PresetArg {
    /// Balanced settings
    Default,
    /// Small requests, four-option questions only
    Strict,
    /// Large papers and long responses
    Lenient,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<SchemaArg> for RecordKind {
    fn from(schema: SchemaArg) -> Self {
        match schema {
            SchemaArg::Roadmap => RecordKind::Roadmap,
            SchemaArg::Quiz => RecordKind::Quiz,
            SchemaArg::Exam => RecordKind::Exam,
        }
    }
}

impl From<PresetArg> for pathwise_normalizer::NormalizerConfig {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Default => Self::default(),
            PresetArg::Strict => Self::strict(),
            PresetArg::Lenient => Self::lenient(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_command() {
        let cli = Cli::parse_from([
            "pathwise",
            "normalize",
            "--schema",
            "exam",
            "-n",
            "3",
            "--topic",
            "Rust",
            "--file",
            "out.txt",
        ]);
        match cli.command {
            Command::Normalize(args) => {
                assert!(matches!(args.request.schema, SchemaArg::Exam));
                assert_eq!(args.request.count, 3);
                assert_eq!(args.file.as_deref(), Some("out.txt"));
                assert!(!args.request.keep_answers);
            }
            _ => panic!("Expected Normalize command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "pathwise", "fallback", "-s", "quiz", "-t", "Go", "--format", "json", "-v",
        ]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Fallback(_)));
    }

    #[test]
    fn test_config_init_preset() {
        let cli = Cli::parse_from(["pathwise", "config", "init", "--preset", "strict"]);
        match cli.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { preset, force },
            }) => {
                assert!(matches!(preset, PresetArg::Strict));
                assert!(!force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_schema_conversion() {
        let kind: RecordKind = SchemaArg::Roadmap.into();
        assert_eq!(kind, RecordKind::Roadmap);
    }
}
