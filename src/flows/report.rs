//! Report flow - the audit pipeline
//!
//! Threads an explicit result struct through fetch → parse → link scan →
//! broken link detection → letter counting, then hands it to the
//! renderer. The per-stage commands (source/links/broken/letters) run a
//! prefix of the same pipeline.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::analysis::letters::{normalized_letter_count, raw_letter_count};
use crate::analysis::links::{find_broken_links, find_internal_links, InternalLink};
use crate::backends::fetch::{fetch_source, FetchError, Fetched};
use crate::core::model::{LinkStatus, Meta, ReportItem, ReportSet, ScanError, Stage};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::{hash_bytes, truncate_string};
use crate::document::Document;

/// Maximum bytes of raw document text carried in the source excerpt
const MAX_EXCERPT_BYTES: usize = 65536;

/// Policy for a missing or empty source locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingSourcePolicy {
    /// Report an error and exit non-zero
    #[default]
    Error,
    /// Produce an empty report and exit zero
    Ignore,
}

impl std::str::FromStr for MissingSourcePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(MissingSourcePolicy::Error),
            "ignore" => Ok(MissingSourcePolicy::Ignore),
            _ => Err(format!("Unknown missing-source policy: {}", s)),
        }
    }
}

/// Letter counts over the root element's text content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterCounts {
    /// Letters only, all whitespace stripped
    pub raw: usize,
    /// Characters after NFKC normalization, line terminators stripped
    pub normalized: usize,
}

/// Result of one full pipeline run, handed to the presenter at the end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Resolved source locator
    pub source: String,

    /// Raw document text as fetched
    pub text: String,

    /// Internal links in document order
    pub internal_links: Vec<InternalLink>,

    /// Broken subsequence of the internal links
    pub broken_links: Vec<InternalLink>,

    /// Letter counts over the first root element's text content
    pub letters: LetterCounts,

    /// Parse error, when the document was malformed
    pub parse_error: Option<String>,
}

/// Run the pure pipeline stages over already-fetched text
pub fn build_report(source: &str, text: &str) -> PipelineReport {
    let doc = Document::parse(text);

    let internal_links = find_internal_links(&doc);
    let broken_links = find_broken_links(&doc, &internal_links);
    let letters = count_letters(&doc);

    PipelineReport {
        source: source.to_string(),
        text: text.to_string(),
        internal_links,
        broken_links,
        letters,
        parse_error: doc.parse_error().map(|e| e.to_string()),
    }
}

/// Letter counts for the first root element; zero when there is none
fn count_letters(doc: &Document) -> LetterCounts {
    match doc.root_element() {
        Some(root) => {
            let content = root.text_content();
            LetterCounts {
                raw: raw_letter_count(&content),
                normalized: normalized_letter_count(&content),
            }
        }
        None => LetterCounts::default(),
    }
}

impl PipelineReport {
    /// The source item: resolved locator plus (possibly truncated) raw text
    pub fn source_item(&self) -> ReportItem {
        let (excerpt, truncated) = truncate_string(&self.text, MAX_EXCERPT_BYTES);
        ReportItem::source(&self.source)
            .with_excerpt(excerpt)
            .with_meta(Meta {
                size: Some(self.text.len() as u64),
                hash: Some(hash_bytes(self.text.as_bytes())),
                truncated,
            })
    }

    /// One item per internal link, with its resolution status
    pub fn link_items(&self) -> Vec<ReportItem> {
        self.internal_links
            .iter()
            .map(|link| {
                let status = if self.broken_links.contains(link) {
                    LinkStatus::Broken
                } else {
                    LinkStatus::Resolved
                };
                link_item(&self.source, link, Some(status))
            })
            .collect()
    }

    /// The letter-count item
    pub fn letters_item(&self) -> ReportItem {
        ReportItem::letters(&self.source).with_data(json!({
            "raw": self.letters.raw,
            "normalized": self.letters.normalized,
        }))
    }

    /// A parse error item, when the document was malformed
    pub fn parse_error_item(&self) -> Option<ReportItem> {
        self.parse_error
            .as_ref()
            .map(|message| ReportItem::error(Stage::Parse, ScanError::new("PARSE_ERROR", message)))
    }

    /// Map the full pipeline result to the unified report model
    pub fn to_report_set(&self) -> ReportSet {
        let mut set = ReportSet::new();
        if let Some(item) = self.parse_error_item() {
            set.push(item);
        }
        set.push(self.source_item());
        set.extend(self.link_items());
        set.push(self.letters_item());
        set
    }
}

fn link_item(source: &str, link: &InternalLink, status: Option<LinkStatus>) -> ReportItem {
    let data = match status {
        Some(status) => json!({
            "href": link.href,
            "target": link.target_id(),
            "status": status,
        }),
        None => json!({
            "href": link.href,
            "target": link.target_id(),
        }),
    };
    ReportItem::link(source, link.range).with_data(data)
}

/// Resolve the source locator under the configured policy.
///
/// `Ok(None)` means the silent variant applies: render nothing, exit 0.
fn require_source(
    source: Option<&str>,
    policy: MissingSourcePolicy,
) -> Result<Option<String>> {
    match source {
        Some(s) if !s.is_empty() => Ok(Some(s.to_string())),
        _ => match policy {
            MissingSourcePolicy::Error => {
                Err(FetchError::MissingSource).context("the XML source parameter is missing or empty")
            }
            MissingSourcePolicy::Ignore => Ok(None),
        },
    }
}

/// Fetch with stage diagnostics
fn fetch_stage(source: &str, verbose: bool) -> Result<Fetched> {
    progress(verbose, format!("fetching {}", source));
    let fetched =
        fetch_source(source).with_context(|| format!("failed to fetch {}", source))?;
    progress(
        verbose,
        format!("{} {} bytes", "fetched".green(), fetched.text.len()),
    );
    Ok(fetched)
}

/// Parse with stage diagnostics; malformed input is not a pipeline abort
fn parse_stage(text: &str, verbose: bool) -> (Document, Option<ReportItem>) {
    let doc = Document::parse(text);
    let error_item = doc.parse_error().map(|message| {
        progress(verbose, format!("{} {}", "parse error:".red(), message));
        ReportItem::error(Stage::Parse, ScanError::new("PARSE_ERROR", message))
    });
    (doc, error_item)
}

fn progress(verbose: bool, message: impl AsRef<str>) {
    if verbose {
        eprintln!("{} {}", "•".cyan(), message.as_ref());
    }
}

fn render(set: &ReportSet, config: RenderConfig) {
    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render(set));
}

/// Run the source command (stages 1-2: resolved locator + raw text)
pub fn run_source(
    source: Option<&str>,
    policy: MissingSourcePolicy,
    verbose: bool,
    config: RenderConfig,
) -> Result<()> {
    let Some(source) = require_source(source, policy)? else {
        render(&ReportSet::new(), config);
        return Ok(());
    };

    let fetched = fetch_stage(&source, verbose)?;
    let (excerpt, truncated) = truncate_string(&fetched.text, MAX_EXCERPT_BYTES);

    let mut set = ReportSet::new();
    set.push(
        ReportItem::source(&source)
            .with_excerpt(excerpt)
            .with_meta(Meta {
                size: fetched.size,
                hash: Some(hash_bytes(fetched.text.as_bytes())),
                truncated,
            }),
    );

    render(&set, config);
    Ok(())
}

/// Run the links command (stages 1-4: internal links)
pub fn run_links(
    source: Option<&str>,
    policy: MissingSourcePolicy,
    verbose: bool,
    config: RenderConfig,
) -> Result<()> {
    let Some(source) = require_source(source, policy)? else {
        render(&ReportSet::new(), config);
        return Ok(());
    };

    let fetched = fetch_stage(&source, verbose)?;
    let (doc, error_item) = parse_stage(&fetched.text, verbose);

    let links = find_internal_links(&doc);
    progress(verbose, format!("{} internal links", links.len()));

    let mut set = ReportSet::new();
    set.extend(error_item);
    set.extend(links.iter().map(|link| link_item(&source, link, None)));

    render(&set, config);
    Ok(())
}

/// Run the broken command (stages 1-5: broken internal links only)
pub fn run_broken(
    source: Option<&str>,
    policy: MissingSourcePolicy,
    verbose: bool,
    config: RenderConfig,
) -> Result<()> {
    let Some(source) = require_source(source, policy)? else {
        render(&ReportSet::new(), config);
        return Ok(());
    };

    let fetched = fetch_stage(&source, verbose)?;
    let (doc, error_item) = parse_stage(&fetched.text, verbose);

    let links = find_internal_links(&doc);
    let broken = find_broken_links(&doc, &links);
    progress(
        verbose,
        format!("{} broken of {} internal links", broken.len(), links.len()),
    );

    let mut set = ReportSet::new();
    set.extend(error_item);
    set.extend(
        broken
            .iter()
            .map(|link| link_item(&source, link, Some(LinkStatus::Broken))),
    );

    render(&set, config);
    Ok(())
}

/// Run the letters command (stages 1-3 + 6: letter counts)
pub fn run_letters(
    source: Option<&str>,
    policy: MissingSourcePolicy,
    verbose: bool,
    config: RenderConfig,
) -> Result<()> {
    let Some(source) = require_source(source, policy)? else {
        render(&ReportSet::new(), config);
        return Ok(());
    };

    let fetched = fetch_stage(&source, verbose)?;
    let (doc, error_item) = parse_stage(&fetched.text, verbose);

    let letters = count_letters(&doc);
    progress(
        verbose,
        format!(
            "{} raw letters, {} normalized",
            letters.raw, letters.normalized
        ),
    );

    let mut set = ReportSet::new();
    set.extend(error_item);
    set.push(ReportItem::letters(&source).with_data(json!({
        "raw": letters.raw,
        "normalized": letters.normalized,
    })));

    render(&set, config);
    Ok(())
}

/// Run the report command (the whole pipeline)
pub fn run_report(
    source: Option<&str>,
    policy: MissingSourcePolicy,
    verbose: bool,
    config: RenderConfig,
) -> Result<()> {
    let Some(source) = require_source(source, policy)? else {
        render(&ReportSet::new(), config);
        return Ok(());
    };

    let fetched = fetch_stage(&source, verbose)?;
    let report = build_report(&source, &fetched.text);

    if let Some(message) = &report.parse_error {
        progress(verbose, format!("{} {}", "parse error:".red(), message));
    }
    progress(
        verbose,
        format!(
            "{} internal links, {} broken",
            report.internal_links.len(),
            report.broken_links.len()
        ),
    );
    progress(
        verbose,
        format!(
            "{} raw letters, {} normalized",
            report.letters.raw, report.letters.normalized
        ),
    );

    render(&report.to_report_set(), config);
    Ok(())
}
