use once_cell::sync::Lazy;
use regex::Regex;

static DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:description|summary):[ \t]*(\S[^\r\n]*)").unwrap());

static OBSERVATIONS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:observations?|findings?):[ \t]*").unwrap());

static CONFIDENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)confidence:\s*([0-9]+)").unwrap());

/// Remainder of the first `description:` / `summary:` line
pub fn match_description(text: &str) -> Option<String> {
    let caps = DESCRIPTION_RE.captures(text)?;
    let value = caps[1].trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Lines of the block introduced by an `observations:` / `findings:` label.
///
/// The block runs until a blank line, a line starting with a capital letter
/// (the next heading), or the end of the text. Bullet markers are stripped and
/// empty or purely numeric lines dropped.
pub fn match_observations(text: &str) -> Option<Vec<String>> {
    let label = OBSERVATIONS_RE.find(text)?;
    let rest = &text[label.end()..];

    let mut lines = rest.split('\n');
    let mut block = Vec::new();

    // Anything after the label on its own line is the first entry
    if let Some(inline) = lines.next() {
        block.push(inline);
    }

    for line in lines {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with(|c: char| c.is_ascii_uppercase()) {
            break;
        }
        block.push(line);
    }

    let observations: Vec<String> = block
        .into_iter()
        .map(strip_bullet)
        .filter(|line| !line.is_empty() && !line.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect();

    Some(observations)
}

/// Digits following the first `confidence:` label
pub fn match_confidence(text: &str) -> Option<i64> {
    let caps = CONFIDENCE_RE.captures(text)?;
    caps[1].parse().ok()
}

fn strip_bullet(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| c == '-' || c == '•')
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_label_variants() {
        assert_eq!(
            match_description("Summary: two boats\nmore"),
            Some("two boats".to_string())
        );
        assert_eq!(
            match_description("IMAGE DESCRIPTION:  A red car.  \r\n"),
            Some("A red car.".to_string())
        );
        assert_eq!(match_description("no label here"), None);
    }

    #[test]
    fn test_description_first_match_wins() {
        let text = "Description: first\nSummary: second";
        assert_eq!(match_description(text), Some("first".to_string()));
    }

    #[test]
    fn test_description_skips_blank_label() {
        assert_eq!(
            match_description("Description:   \nSummary: real"),
            Some("real".to_string())
        );
        assert_eq!(
            match_description("Description:\nSummary: real"),
            Some("real".to_string())
        );
        assert_eq!(match_description("Description: \t \r\n"), None);
    }

    #[test]
    fn test_observations_blank_line_after_label_ends_block() {
        let text = "Observations:\n\n- a\n- b";
        assert_eq!(match_observations(text), Some(vec![]));
    }

    #[test]
    fn test_observations_stop_at_blank_line() {
        let text = "Findings:\n- one\n• two\n\n- not included";
        assert_eq!(
            match_observations(text),
            Some(vec!["one".to_string(), "two".to_string()])
        );
    }

    #[test]
    fn test_observations_stop_at_heading() {
        let text = "KEY OBSERVATIONS:\n- a cloud\n- a kite\nObjects Detected:\n- kite";
        assert_eq!(
            match_observations(text),
            Some(vec!["a cloud".to_string(), "a kite".to_string()])
        );
    }

    #[test]
    fn test_observations_drop_numeric_and_empty_lines() {
        let text = "observation:\n- 12\n-\n  - grass  \n- 3 cows";
        assert_eq!(
            match_observations(text),
            Some(vec!["grass".to_string(), "3 cows".to_string()])
        );
    }

    #[test]
    fn test_observations_inline_entry() {
        let text = "Observations: glare on the lens\n- motion blur";
        assert_eq!(
            match_observations(text),
            Some(vec!["glare on the lens".to_string(), "motion blur".to_string()])
        );
    }

    #[test]
    fn test_observations_missing_label() {
        assert_eq!(match_observations("- loose bullet"), None);
    }

    #[test]
    fn test_confidence() {
        assert_eq!(match_confidence("Overall CONFIDENCE: 72%"), Some(72));
        assert_eq!(match_confidence("confidence:\n 5"), Some(5));
        assert_eq!(match_confidence("confidence: high"), None);
        assert_eq!(match_confidence("confidence: 99999999999999999999999"), None);
    }
}
