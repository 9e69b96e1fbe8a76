use serde_json::{Map, Value};

use crate::models::NormalizedAnalysis;

/// Outermost `{...}` span: first open brace through the last close brace
pub fn extract_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then_some(&text[start..=end])
}

/// Parse the outermost object span as a JSON mapping.
///
/// Returns `None` when there is no span or it is not valid JSON; the caller
/// treats that as "no contribution" and moves on.
pub fn parse_structured(text: &str) -> Option<Map<String, Value>> {
    let span = extract_object_span(text)?;
    serde_json::from_str::<Map<String, Value>>(span).ok()
}

/// Overlay parsed keys onto a default record for `raw_text`
pub fn overlay(parsed: Map<String, Value>, raw_text: &str) -> NormalizedAnalysis {
    let mut analysis = NormalizedAnalysis::empty(raw_text);

    for (key, value) in parsed {
        let applied = match key.as_str() {
            "description" => coerce_text(&value).map(|s| analysis.description = s),
            "key_observations" => coerce_list(&value).map(|l| analysis.key_observations = l),
            "objects" => coerce_list(&value).map(|l| analysis.objects = l),
            "tags" => coerce_list(&value).map(|l| analysis.tags = l),
            "confidence" => coerce_confidence(&value).map(|c| analysis.confidence = c),
            "raw_text" => Some(()),
            _ => {
                analysis.extra.insert(key, value);
                continue;
            }
        };

        // A known key we could not coerce survives verbatim under `<key>_raw`,
        // so it never collides with the typed field; null just means default
        if applied.is_none() && !value.is_null() {
            analysis.extra.insert(format!("{}_raw", key), value);
        }
    }

    analysis
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn coerce_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter(|item| !item.is_null())
                .map(|item| coerce_text(item).unwrap_or_else(|| item.to_string()))
                .collect(),
        ),
        Value::String(s) => Some(vec![s.clone()]),
        _ => None,
    }
}

fn coerce_confidence(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_is_outermost() {
        let text = r#"{"a": {"b": 1}} trailing {not json}"#;
        assert_eq!(extract_object_span(text), Some(text));
    }

    #[test]
    fn test_span_inside_prose() {
        let text = "Here you go: {\"tags\": [\"sky\"]} thanks";
        assert_eq!(extract_object_span(text), Some("{\"tags\": [\"sky\"]}"));
    }

    #[test]
    fn test_span_missing_or_reversed() {
        assert_eq!(extract_object_span("no braces"), None);
        assert_eq!(extract_object_span("{ open only"), None);
        assert_eq!(extract_object_span("} backwards {"), None);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_structured("{description: unquoted}").is_none());
        assert!(parse_structured(r#"{"a": {"b": 1}} trailing {not json}"#).is_none());
    }

    #[test]
    fn test_overlay_known_and_unknown_keys() {
        let parsed = parse_structured(
            r#"{"description": "a dog", "tags": ["pet", "dog"], "confidence": 77, "lighting": "bright"}"#,
        )
        .unwrap();

        let analysis = overlay(parsed, "input");

        assert_eq!(analysis.description, "a dog");
        assert_eq!(analysis.tags, vec!["pet", "dog"]);
        assert_eq!(analysis.confidence, 77);
        assert_eq!(analysis.extra["lighting"], "bright");
        assert_eq!(analysis.raw_text, "input");
    }

    #[test]
    fn test_overlay_coerces_loose_types() {
        let parsed = parse_structured(
            r#"{"confidence": "85%", "objects": "tree", "key_observations": ["leaf", 3, null]}"#,
        )
        .unwrap();

        let analysis = overlay(parsed, "x");

        assert_eq!(analysis.confidence, 85);
        assert_eq!(analysis.objects, vec!["tree"]);
        assert_eq!(analysis.key_observations, vec!["leaf", "3"]);
    }

    #[test]
    fn test_overlay_float_confidence_rounds() {
        let parsed = parse_structured(r#"{"confidence": 92.6}"#).unwrap();
        assert_eq!(overlay(parsed, "x").confidence, 93);
    }

    #[test]
    fn test_overlay_uncoercible_known_key_goes_to_extra() {
        let parsed =
            parse_structured(r#"{"confidence": {"score": 4}, "raw_text": "forged"}"#).unwrap();

        let analysis = overlay(parsed, "original");

        assert_eq!(analysis.confidence, 0);
        assert_eq!(analysis.extra["confidence_raw"]["score"], 4);
        assert!(!analysis.extra.contains_key("confidence"));
        assert_eq!(analysis.raw_text, "original");
        assert!(!analysis.extra.contains_key("raw_text"));
    }

    #[test]
    fn test_uncoercible_known_keys_serialize_without_duplicates() {
        let input = r#"{"confidence": {"score": 4}, "description": ["x"]}"#;
        let analysis = overlay(parse_structured(input).unwrap(), input);

        let json = serde_json::to_string(&analysis).unwrap();
        assert_eq!(json.matches("\"confidence\":").count(), 1);
        assert_eq!(json.matches("\"description\":").count(), 1);

        let read_back: NormalizedAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(read_back, analysis);
        assert_eq!(read_back.confidence, 0);
        assert!(read_back.description.is_empty());
        assert_eq!(read_back.extra["description_raw"][0], "x");
    }
}
