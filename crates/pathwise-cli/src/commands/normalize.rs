//! Normalize command implementation.

use super::{print_collection, request_from_args};
use crate::cli::NormalizeArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pathwise_normalizer::{NormalizedCollection, Normalizer, RawModelResponse};
use std::fs;
use std::io::{self, Read};
use tracing::debug;

/// Execute the normalize command.
pub fn execute_normalize(args: NormalizeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let input = read_input(&args)?;
    let collection = normalize_input(&args, &input, config)?;
    print_collection(&collection, formatter)
}

/// Run the pipeline over captured model output.
fn normalize_input(args: &NormalizeArgs, input: &str, config: &Config) -> Result<NormalizedCollection> {
    let (params, policy) = request_from_args(&args.request)?;
    let normalizer = Normalizer::new(config.normalizer.clone())?;
    let kind = args.request.schema.into();

    let collection = if args.provider_json {
        let body: serde_json::Value = serde_json::from_str(input)?;
        let raw = RawModelResponse::from_body(body);
        normalizer.normalize(&raw, kind, &params, policy)?
    } else {
        normalizer.normalize(input, kind, &params, policy)?
    };
    Ok(collection)
}

/// Read model output from file or stdin.
fn read_input(args: &NormalizeArgs) -> Result<String> {
    let input = if args.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else if let Some(file_path) = &args.file {
        fs::read_to_string(file_path)?
    } else {
        return Err(CliError::InvalidInput(
            "Must specify either --file or --stdin".to_string(),
        ));
    };

    debug!("Read {} bytes of model output", input.len());
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use pathwise_normalizer::{CollectionSource, NormalizeError, TextProvenance};

    fn parse(extra: &[&str]) -> NormalizeArgs {
        let mut argv = vec!["pathwise", "normalize", "-s", "quiz", "-n", "2", "-t", "Rust"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Command::Normalize(args) => args,
            _ => panic!("Expected Normalize command"),
        }
    }

    #[test]
    fn test_plain_text_input() {
        let args = parse(&[]);
        let input = r#"Here: [{"question":"Q","options":["A","B"],"answer":"A"}]"#;
        let collection = normalize_input(&args, input, &Config::default()).unwrap();

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.meta.source, CollectionSource::Padded);
        assert_eq!(collection.meta.text_provenance, Some(TextProvenance::Plain));
    }

    #[test]
    fn test_provider_json_input() {
        let args = parse(&["--provider-json"]);
        let input = r#"{"choices":[{"message":{"content":"[{\"question\":\"Q\",\"options\":[\"A\",\"B\"],\"answer\":\"B\"}]"}}]}"#;
        let collection = normalize_input(&args, input, &Config::default()).unwrap();

        assert_eq!(collection.meta.text_provenance, Some(TextProvenance::ChoicesMessage));
        assert_eq!(collection.records[0].headline(), "Q");
    }

    #[test]
    fn test_provider_json_must_be_json() {
        let args = parse(&["--provider-json"]);
        let result = normalize_input(&args, "not json", &Config::default());
        assert!(matches!(result, Err(CliError::Serialization(_))));
    }

    #[test]
    fn test_answers_need_authorization() {
        let args = parse(&["--keep-answers"]);
        let result = normalize_input(&args, "[]", &Config::default());
        assert!(matches!(
            result,
            Err(CliError::Normalize(NormalizeError::UnauthorizedAnswerRequest))
        ));
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        fs::write(&path, "[]").unwrap();

        let args = parse(&["--file", path.to_str().unwrap()]);
        assert_eq!(read_input(&args).unwrap(), "[]");
    }

    #[test]
    fn test_missing_input_source() {
        let args = parse(&[]);
        assert!(matches!(read_input(&args), Err(CliError::InvalidInput(_))));
    }
}
