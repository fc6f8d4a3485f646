//! Command implementations.

pub mod config;
pub mod fallback;
pub mod normalize;

pub use self::config::execute_config;
pub use self::fallback::execute_fallback;
pub use self::normalize::execute_normalize;

use crate::cli::RequestArgs;
use crate::error::Result;
use crate::output::Formatter;
use pathwise_domain::RedactionPolicy;
use pathwise_normalizer::{NormalizeParams, NormalizedCollection};

/// Turn request flags into normalizer parameters and a redaction policy.
fn request_from_args(args: &RequestArgs) -> Result<(NormalizeParams, RedactionPolicy)> {
    let params = NormalizeParams::from_request(
        &args.topic,
        args.count,
        args.difficulty.as_deref(),
        args.sub_topics.as_deref(),
    )?;
    let policy = RedactionPolicy::new(args.keep_answers, args.authorized);
    Ok((params, policy))
}

/// Print a collection with its status line.
fn print_collection(collection: &NormalizedCollection, formatter: &Formatter) -> Result<()> {
    if let Some(status) = formatter.collection_status(collection) {
        eprintln!("{}", status);
    }
    println!("{}", formatter.format_collection(collection)?);
    Ok(())
}
