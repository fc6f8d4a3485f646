//! Strip answers before records leave the system

use crate::types::NormalizedCollection;
use pathwise_domain::{NormalizedRecord, RedactionPolicy};
use tracing::debug;

/// Apply `policy` to every record of a collection
///
/// Answers survive only when `keep_answers && authorized`; otherwise the field
/// is removed, so the serialized record carries no trace of it.
pub fn redact(mut collection: NormalizedCollection, policy: RedactionPolicy) -> NormalizedCollection {
    redact_records(&mut collection.records, policy);
    collection
}

/// Apply `policy` to a slice of records in place
pub fn redact_records(records: &mut [NormalizedRecord], policy: RedactionPolicy) {
    if policy.allows_answers() {
        return;
    }
    records.iter_mut().for_each(NormalizedRecord::clear_answer);
    debug!("Redacted answers from {} record(s)", records.len());
}
