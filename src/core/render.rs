//! Renderer module
//!
//! Renders a ReportSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, ReportItem, ReportSet};
use std::io::Write;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a new render config with default options
    #[allow(dead_code)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for report sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    #[allow(dead_code)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a report set to a string
    pub fn render(&self, report: &ReportSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(report),
            OutputFormat::Json => self.render_json(report),
            OutputFormat::Markdown => self.render_markdown(report),
            OutputFormat::Raw => self.render_raw(report),
        }
    }

    /// Render to a writer
    #[allow(dead_code)]
    pub fn render_to<W: Write>(&self, report: &ReportSet, mut writer: W) -> std::io::Result<()> {
        let output = self.render(report);
        writer.write_all(output.as_bytes())
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, report: &ReportSet) -> String {
        report
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, report: &ReportSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&report.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&report.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, report: &ReportSet) -> String {
        let mut output = String::new();

        // Group by kind
        let mut sources = Vec::new();
        let mut links = Vec::new();
        let mut letters = Vec::new();
        let mut errors = Vec::new();

        for item in &report.items {
            match item.kind {
                Kind::Source => sources.push(item),
                Kind::Link => links.push(item),
                Kind::Letters => letters.push(item),
                Kind::Error => errors.push(item),
            }
        }

        // Render each section
        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}\n", error.code, error.message));
                }
            }
            output.push('\n');
        }

        if !sources.is_empty() {
            output.push_str("## Source\n\n");
            for item in sources {
                self.render_source_md(&mut output, item);
            }
        }

        if !links.is_empty() {
            output.push_str("## Internal Links\n\n");
            let broken = links
                .iter()
                .filter(|i| link_status(i) == Some("broken"))
                .count();
            output.push_str(&format!("Internal links: **{}**\n", links.len()));
            output.push_str(&format!("Broken internal links: **{}**\n\n", broken));

            for item in links {
                let href = item
                    .data
                    .as_ref()
                    .and_then(|d| d.get("href"))
                    .and_then(|h| h.as_str())
                    .unwrap_or("?");
                match link_status(item) {
                    Some("broken") => output.push_str(&format!("- `{}` (**broken**)\n", href)),
                    _ => output.push_str(&format!("- `{}` (resolved)\n", href)),
                }
            }
            output.push('\n');
        }

        if !letters.is_empty() {
            output.push_str("## Letter Counts\n\n");
            for item in letters {
                if let Some(data) = &item.data {
                    if let Some(raw) = data.get("raw").and_then(|v| v.as_u64()) {
                        output
                            .push_str(&format!("- Letters (whitespace stripped): **{}**\n", raw));
                    }
                    if let Some(norm) = data.get("normalized").and_then(|v| v.as_u64()) {
                        output.push_str(&format!(
                            "- Letters and spaces (normalized): **{}**\n",
                            norm
                        ));
                    }
                }
            }
            output.push('\n');
        }

        output
    }

    fn render_source_md(&self, output: &mut String, item: &ReportItem) {
        if let Some(source) = &item.source {
            output.push_str(&format!("### `{}`", source));
            if let Some(size) = item.meta.size {
                output.push_str(&format!(" ({} bytes)", size));
            }
            output.push('\n');
        }

        if let Some(excerpt) = &item.excerpt {
            output.push_str("\n```xml\n");
            output.push_str(excerpt);
            if !excerpt.ends_with('\n') {
                output.push('\n');
            }
            output.push_str("```\n");
        }

        if item.meta.truncated {
            output.push_str("\n> ⚠️ Content was truncated\n");
        }

        output.push('\n');
    }

    /// Render as raw output (for debugging)
    fn render_raw(&self, report: &ReportSet) -> String {
        // Raw mode: just output excerpts directly
        report
            .items
            .iter()
            .filter_map(|item| item.excerpt.clone())
            .collect::<Vec<_>>()
            .join("\n---\n")
    }
}

fn link_status(item: &ReportItem) -> Option<&str> {
    item.data
        .as_ref()
        .and_then(|d| d.get("status"))
        .and_then(|s| s.as_str())
}
