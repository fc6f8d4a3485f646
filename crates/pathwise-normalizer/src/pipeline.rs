//! Core Normalizer implementation

use crate::config::NormalizerConfig;
use crate::error::NormalizeError;
use crate::fallback::{fallback_range, fallback_records};
use crate::normalize::normalize_records;
use crate::recovery::JsonRecovery;
use crate::redaction::redact;
use crate::response::{extract_text, CandidateText};
use crate::schema::{schema_for, RecordSchema, ShortfallPolicy};
use crate::types::{
    CollectionMeta, CollectionSource, ModelOutput, NormalizeParams, NormalizedCollection,
};
use pathwise_domain::{NormalizedRecord, RecordKind, RecordOrigin, RedactionPolicy};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Request-level pipeline stages, logged as they are entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Received,
    Extracting,
    RecoveringJson,
    Normalizing,
    Fallback,
    Redacting,
    Done,
}

fn enter(stage: Stage, kind: RecordKind) {
    debug!("{} pipeline: {:?}", kind, stage);
}

/// Turns unreliable model output into a validated, redacted collection
///
/// Stateless apart from its configuration; one instance can serve any number
/// of concurrent requests.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: NormalizerConfig,
    recovery: JsonRecovery,
}

impl Default for Normalizer {
    fn default() -> Self {
        let config = NormalizerConfig::default();
        Self {
            recovery: JsonRecovery::new(config.max_scan_bytes),
            config,
        }
    }
}

impl Normalizer {
    /// Create a new Normalizer, validating the configuration
    pub fn new(config: NormalizerConfig) -> Result<Self, NormalizeError> {
        config.validate().map_err(NormalizeError::Config)?;
        Ok(Self {
            recovery: JsonRecovery::new(config.max_scan_bytes),
            config,
        })
    }

    /// The active configuration
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize model output into exactly the records the caller can use
    ///
    /// Only malformed requests are errors. Unusable model output falls back
    /// to placeholder records; quiz collections are always exactly
    /// `params.count` long.
    pub fn normalize<'a>(
        &self,
        output: impl Into<ModelOutput<'a>>,
        kind: RecordKind,
        params: &NormalizeParams,
        policy: RedactionPolicy,
    ) -> Result<NormalizedCollection, NormalizeError> {
        enter(Stage::Received, kind);
        self.check_request(params, policy)?;

        enter(Stage::Extracting, kind);
        let candidate = match output.into() {
            ModelOutput::Raw(raw) => extract_text(raw),
            ModelOutput::Text(text) => CandidateText::plain(text),
        };

        enter(Stage::RecoveringJson, kind);
        let schema = schema_for(kind);
        let (records, dropped, recovery) = match self.recovery.recover(&candidate.text) {
            Ok(recovered) => {
                enter(Stage::Normalizing, kind);
                let outcome = normalize_records(&recovered.value, schema, params, &self.config);
                (outcome.records, outcome.dropped, Some(recovered.strategy))
            }
            Err(failure) => {
                info!("No usable JSON in {} response: {}", kind, failure);
                (Vec::new(), 0, None)
            }
        };

        let (records, source) = self.fill_shortfall(schema, params, records);

        let collection = NormalizedCollection {
            kind,
            meta: CollectionMeta {
                requested: params.count,
                count: records.len(),
                source,
                text_provenance: Some(candidate.provenance),
                recovery,
                dropped,
                generated_at: now_secs(),
            },
            records,
        };

        info!(
            "Normalized {} {} record(s) ({:?}, {} dropped)",
            collection.len(),
            kind,
            source,
            dropped
        );
        Ok(self.finish(collection, policy))
    }

    /// Fallback records only, for callers whose upstream model call failed
    pub fn fallback(
        &self,
        kind: RecordKind,
        params: &NormalizeParams,
        policy: RedactionPolicy,
    ) -> Result<NormalizedCollection, NormalizeError> {
        self.check_request(params, policy)?;
        enter(Stage::Fallback, kind);

        let records = fallback_records(kind, params);
        let collection = NormalizedCollection {
            kind,
            meta: CollectionMeta {
                requested: params.count,
                count: records.len(),
                source: CollectionSource::Fallback,
                text_provenance: None,
                recovery: None,
                dropped: 0,
                generated_at: now_secs(),
            },
            records,
        };
        Ok(self.finish(collection, policy))
    }

    /// Records loaded from the document store
    ///
    /// Stored records skip extraction and recovery but are still truncated to
    /// the requested count, marked as stored and redacted. Records of another
    /// kind are dropped.
    pub fn from_stored(
        &self,
        kind: RecordKind,
        records: Vec<NormalizedRecord>,
        params: &NormalizeParams,
        policy: RedactionPolicy,
    ) -> Result<NormalizedCollection, NormalizeError> {
        self.check_request(params, policy)?;

        let total = records.len();
        let mut records: Vec<_> = records.into_iter().filter(|r| r.kind() == kind).collect();
        let dropped = total - records.len();
        if dropped > 0 {
            warn!("Dropped {} stored record(s) that are not {}", dropped, kind);
        }
        records.truncate(params.count);
        for record in &mut records {
            record.set_source(RecordOrigin::Stored);
        }

        let collection = NormalizedCollection {
            kind,
            meta: CollectionMeta {
                requested: params.count,
                count: records.len(),
                source: CollectionSource::Stored,
                text_provenance: None,
                recovery: None,
                dropped,
                generated_at: now_secs(),
            },
            records,
        };
        Ok(self.finish(collection, policy))
    }

    fn check_request(
        &self,
        params: &NormalizeParams,
        policy: RedactionPolicy,
    ) -> Result<(), NormalizeError> {
        params.validate(&self.config)?;
        if policy.is_disallowed_request() {
            return Err(NormalizeError::UnauthorizedAnswerRequest);
        }
        Ok(())
    }

    /// Replace an empty result with fallbacks, or pad a short one per schema
    fn fill_shortfall(
        &self,
        schema: &RecordSchema,
        params: &NormalizeParams,
        mut records: Vec<NormalizedRecord>,
    ) -> (Vec<NormalizedRecord>, CollectionSource) {
        if records.is_empty() {
            enter(Stage::Fallback, schema.kind);
            return (fallback_records(schema.kind, params), CollectionSource::Fallback);
        }

        let short = records.len() < params.count;
        match (short, schema.shortfall) {
            (true, ShortfallPolicy::Pad) => {
                enter(Stage::Fallback, schema.kind);
                debug!(
                    "Padding {} {} record(s) to {}",
                    records.len(),
                    schema.kind,
                    params.count
                );
                let padding = fallback_range(schema.kind, params, records.len()..params.count);
                records.extend(padding);
                (records, CollectionSource::Padded)
            }
            _ => (records, CollectionSource::Model),
        }
    }

    /// Redaction is the last step of every path
    fn finish(&self, collection: NormalizedCollection, policy: RedactionPolicy) -> NormalizedCollection {
        enter(Stage::Redacting, collection.kind);
        let collection = redact(collection, policy);
        enter(Stage::Done, collection.kind);
        collection
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
