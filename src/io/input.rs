use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a model response from a file, or from stdin when no path is given
pub fn read_response_text(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {:?}", path)),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read response from stdin")?;
            Ok(text)
        }
    }
}

/// Read image bytes for sending to the model
pub fn read_image(path: &Path) -> Result<Vec<u8>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read image: {:?}", path))?;
    if bytes.is_empty() {
        anyhow::bail!("Image file is empty: {:?}", path);
    }
    Ok(bytes)
}
