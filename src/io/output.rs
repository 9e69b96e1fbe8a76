use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::NormalizedAnalysis;

/// Write an analysis to a JSON file
pub fn write_json(analysis: &NormalizedAnalysis, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, analysis).context("Failed to write JSON")?;
    Ok(())
}

/// Human-readable rendering of an analysis
pub struct HumanReport<'a> {
    analysis: &'a NormalizedAnalysis,
}

impl<'a> HumanReport<'a> {
    pub fn new(analysis: &'a NormalizedAnalysis) -> Self {
        Self { analysis }
    }

    /// Format the analysis as sectioned text
    pub fn format(&self) -> String {
        let analysis = self.analysis;

        // Nothing extracted: the model's own words are all we have
        if !analysis.has_structure() {
            let mut output = String::from("Raw Response\n============\n");
            output.push_str(analysis.raw_text.trim_end());
            output.push('\n');
            return output;
        }

        let mut output = String::new();

        if !analysis.description.is_empty() {
            push_heading(&mut output, "Description");
            output.push_str(&wrap_text(&analysis.description, 80));
            output.push_str("\n\n");
        }

        push_list(&mut output, "Key Observations", &analysis.key_observations);
        push_list(&mut output, "Objects", &analysis.objects);

        if !analysis.tags.is_empty() {
            push_heading(&mut output, "Tags");
            output.push_str(&analysis.tags.join(", "));
            output.push_str("\n\n");
        }

        push_heading(&mut output, "Confidence");
        output.push_str(&format!("{}%\n", analysis.confidence));

        if !analysis.extra.is_empty() {
            output.push('\n');
            push_heading(&mut output, "Other Fields");
            for (key, value) in &analysis.extra {
                match value.as_str() {
                    Some(s) => output.push_str(&format!("{}: {}\n", key, s)),
                    None => output.push_str(&format!("{}: {}\n", key, value)),
                }
            }
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

fn push_heading(output: &mut String, title: &str) {
    output.push_str(title);
    output.push('\n');
    output.push_str(&"-".repeat(title.len()));
    output.push('\n');
}

fn push_list(output: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    push_heading(output, title);
    for item in items {
        output.push_str(&format!("- {}\n", item));
    }
    output.push('\n');
}

/// Wrap text at approximately the given width
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        if line_len + word.len() + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word.len();
    }

    result
}
