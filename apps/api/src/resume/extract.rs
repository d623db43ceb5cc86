//! Structured-block extractor — locates the YAML payload embedded in a raw
//! model reply and parses it into a top-level mapping.
//!
//! Strategies run in a fixed priority order; the first one that matches and
//! parses wins. There is no scoring or best-match selection: the order is the
//! whole policy.

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::resume::PipelineError;

const FENCE_OPEN: &str = "```yaml";
const FENCE_CLOSE: &str = "```";

/// Known literals that open the structured payload when the model skips the
/// code fence. Order matters: the canonical schema root key first, then the
/// introductory phrase the model sometimes uses.
const START_MARKERS: [&str; 2] = ["personal_information:", "Here's the optimized YAML:"];

/// Outcome of the fenced-block strategy. A malformed fence is fatal to the
/// whole extraction, so it must be distinguishable from "no fence at all".
enum FenceOutcome {
    NoFence,
    Malformed,
    Parsed(Mapping),
}

/// Extracts the structured payload from a raw model reply.
///
/// 1. Fenced block: the region strictly between the first ```` ```yaml ````
///    and the next ```` ``` ````. If the fence is present but its payload
///    does not parse as a mapping, extraction fails outright — when the model
///    followed the formatting instructions, falling back to looser strategies
///    would trade precision for noise.
/// 2. Marker-anchored: each known start marker in order, taking the substring
///    from the marker to the end of the text. Per-marker parse failures are
///    logged and non-fatal.
/// 3. Whole-text parse of the entire reply.
pub fn extract_structured_block(reply: &str) -> Result<Mapping, PipelineError> {
    let mut attempted = Vec::new();

    attempted.push("fenced-block");
    match fenced_block(reply) {
        FenceOutcome::Parsed(map) => return Ok(map),
        FenceOutcome::Malformed => {
            return Err(PipelineError::ExtractionFailed { attempted });
        }
        FenceOutcome::NoFence => {}
    }

    attempted.push("start-marker");
    if let Some(map) = marker_anchored(reply) {
        return Ok(map);
    }

    attempted.push("whole-text");
    if let Some(map) = parse_mapping(reply) {
        return Ok(map);
    }

    Err(PipelineError::ExtractionFailed { attempted })
}

fn fenced_block(reply: &str) -> FenceOutcome {
    let Some(open) = reply.find(FENCE_OPEN) else {
        return FenceOutcome::NoFence;
    };
    let body = &reply[open + FENCE_OPEN.len()..];
    // An opening fence with no closing fence is not a match; the looser
    // strategies get their turn.
    let Some(close) = body.find(FENCE_CLOSE) else {
        return FenceOutcome::NoFence;
    };
    match parse_mapping(body[..close].trim()) {
        Some(map) => FenceOutcome::Parsed(map),
        None => FenceOutcome::Malformed,
    }
}

fn marker_anchored(reply: &str) -> Option<Mapping> {
    for marker in START_MARKERS {
        let Some(start) = reply.find(marker) else {
            continue;
        };
        match parse_mapping(&reply[start..]) {
            Some(map) => return Some(map),
            None => debug!(marker, "start marker matched but payload did not parse"),
        }
    }
    None
}

/// Parses a candidate region as YAML, accepting only a top-level mapping.
/// A bare scalar (e.g. a refusal sentence) parses fine as YAML but carries
/// no structure, so it is rejected here rather than downstream.
fn parse_mapping(input: &str) -> Option<Mapping> {
    match serde_yaml::from_str::<Value>(input) {
        Ok(Value::Mapping(map)) => Some(map),
        Ok(_) => {
            debug!("candidate region parsed but is not map-shaped");
            None
        }
        Err(e) => {
            debug!(error = %e, "candidate region failed to parse as YAML");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(map: &Mapping, name: &str) -> Value {
        map.get(name).cloned().unwrap_or(Value::Null)
    }

    #[test]
    fn test_fenced_block_ignores_surrounding_prose() {
        let reply = "Sure, here is the resume.\n\
                     ```yaml\npersonal_information:\n  name: Jane\n```\n\
                     Anything else?";
        let map = extract_structured_block(reply).unwrap();
        assert!(key(&map, "personal_information").is_mapping());
    }

    #[test]
    fn test_fenced_block_takes_first_fence_only() {
        let reply = "```yaml\nname: first\n```\ntext\n```yaml\nname: second\n```";
        let map = extract_structured_block(reply).unwrap();
        assert_eq!(key(&map, "name"), Value::String("first".to_string()));
    }

    #[test]
    fn test_malformed_fence_is_fatal_even_with_valid_marker_elsewhere() {
        // The fence payload is broken YAML; a valid marker-anchored region
        // follows, but the fenced strategy is exclusive on match.
        let reply = "```yaml\n: [ not yaml ::\n```\n\
                     personal_information:\n  name: Jane\n";
        let err = extract_structured_block(reply).unwrap_err();
        match err {
            PipelineError::ExtractionFailed { attempted } => {
                assert_eq!(attempted, vec!["fenced-block"]);
            }
            other => panic!("expected ExtractionFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_fence_with_scalar_payload_is_fatal() {
        let reply = "```yaml\njust a sentence\n```\npersonal_information:\n  name: Jane\n";
        assert!(extract_structured_block(reply).is_err());
    }

    #[test]
    fn test_unclosed_fence_falls_through_to_marker() {
        let reply = "```yaml is mentioned here but never closed...\n\
                     personal_information:\n  name: Jane\n";
        let map = extract_structured_block(reply).unwrap();
        assert!(key(&map, "personal_information").is_mapping());
    }

    #[test]
    fn test_marker_schema_root_key() {
        let reply = "Some preamble text without a fence.\n\
                     personal_information:\n  name: Jane\nsummary: Engineer\n";
        let map = extract_structured_block(reply).unwrap();
        assert_eq!(key(&map, "summary"), Value::String("Engineer".to_string()));
    }

    #[test]
    fn test_marker_introductory_phrase() {
        let reply = "Here's the optimized YAML:\nname: Jane\nsummary: Engineer\n";
        let map = extract_structured_block(reply).unwrap();
        assert_eq!(key(&map, "name"), Value::String("Jane".to_string()));
    }

    #[test]
    fn test_whole_text_fallback() {
        let reply = "name: Jane\nsummary: Engineer\n";
        let map = extract_structured_block(reply).unwrap();
        assert_eq!(key(&map, "name"), Value::String("Jane".to_string()));
    }

    #[test]
    fn test_refusal_sentence_fails_all_strategies() {
        let err = extract_structured_block("I cannot help with that request.").unwrap_err();
        match err {
            PipelineError::ExtractionFailed { attempted } => {
                assert_eq!(attempted, vec!["fenced-block", "start-marker", "whole-text"]);
            }
            other => panic!("expected ExtractionFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_reply_fails() {
        assert!(extract_structured_block("").is_err());
    }
}
