use std::path::Path;

use anyhow::{Context, Result};

/// Default prompt sent alongside the image
pub const ANALYSIS_PROMPT: &str = r#"You are an expert image analyst. Describe the image you are given.

Respond with a single JSON object and nothing else, using these keys:

- "description": one paragraph summarising the image
- "key_observations": list of short, specific findings
- "objects": list of subjects and objects visible in the image
- "tags": list of lowercase keyword labels
- "confidence": integer from 0 to 100 for how certain you are

If you cannot produce JSON, use these labelled sections instead:

DESCRIPTION: <one paragraph>
KEY OBSERVATIONS:
- <finding>
OBJECTS DETECTED:
- <object>
SUGGESTED TAGS: <tag>, <tag>
CONFIDENCE: <0-100>"#;

/// Load a prompt from a text file, trimming surrounding whitespace
pub fn load_prompt_file(path: &Path) -> Result<String> {
    let prompt = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read prompt file: {:?}", path))?;
    let prompt = prompt.trim();
    if prompt.is_empty() {
        anyhow::bail!("Prompt file is empty: {:?}", path);
    }
    Ok(prompt.to_string())
}
