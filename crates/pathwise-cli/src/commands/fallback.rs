//! Fallback command implementation.

use super::{print_collection, request_from_args};
use crate::cli::RequestArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use pathwise_normalizer::Normalizer;

/// Execute the fallback command.
pub fn execute_fallback(args: RequestArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let (params, policy) = request_from_args(&args)?;
    let normalizer = Normalizer::new(config.normalizer.clone())?;
    let collection = normalizer.fallback(args.schema.into(), &params, policy)?;
    print_collection(&collection, formatter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use crate::config::OutputFormat;
    use crate::error::CliError;
    use clap::Parser;
    use pathwise_normalizer::NormalizeError;

    fn parse(argv: &[&str]) -> RequestArgs {
        match Cli::parse_from(argv.iter().copied()).command {
            Command::Fallback(args) => args,
            _ => panic!("Expected Fallback command"),
        }
    }

    #[test]
    fn test_fallback_runs() {
        let args = parse(&["pathwise", "fallback", "-s", "exam", "-t", "Rust", "-d", "hard"]);
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert!(execute_fallback(args, &Config::default(), &formatter).is_ok());
    }

    #[test]
    fn test_count_limited_by_config() {
        let args = parse(&["pathwise", "fallback", "-s", "quiz", "-t", "Rust", "-n", "500"]);
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let result = execute_fallback(args, &Config::default(), &formatter);
        assert!(matches!(
            result,
            Err(CliError::Normalize(NormalizeError::CountTooLarge { requested: 500, max: 50 }))
        ));
    }

    #[test]
    fn test_unknown_difficulty() {
        let args = parse(&["pathwise", "fallback", "-s", "exam", "-t", "Rust", "-d", "brutal"]);
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let result = execute_fallback(args, &Config::default(), &formatter);
        assert!(matches!(
            result,
            Err(CliError::Normalize(NormalizeError::InvalidDifficulty(_)))
        ));
    }
}
