pub mod patterns;
pub mod structured;

pub use patterns::*;
pub use structured::*;

use tracing::debug;

use crate::models::NormalizedAnalysis;

/// Normalize raw model output into a [`NormalizedAnalysis`].
///
/// Never fails. Two strategies run in order:
/// 1. Structured object: the outermost `{...}` span, if it parses as a JSON
///    object, is overlaid onto the default record and returned as-is.
/// 2. Pattern fallback: independent label matchers for description,
///    observations and confidence, each contributing only when it matches.
///
/// `objects` and `tags` are only ever filled by the structured strategy.
/// `raw_text` is always the input, unchanged.
pub fn normalize(text: &str) -> NormalizedAnalysis {
    if let Some(parsed) = parse_structured(text) {
        debug!("Structured object found with {} keys", parsed.len());
        return overlay(parsed, text);
    }

    let mut analysis = NormalizedAnalysis::empty(text);

    if let Some(description) = match_description(text) {
        analysis.description = description;
    }
    if let Some(observations) = match_observations(text) {
        analysis.key_observations = observations;
    }
    if let Some(confidence) = match_confidence(text) {
        analysis.confidence = confidence;
    }

    debug!(
        "Pattern fallback: description={}, {} observations, confidence={}",
        !analysis.description.is_empty(),
        analysis.key_observations.len(),
        analysis.confidence
    );

    analysis
}
