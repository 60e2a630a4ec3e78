//! xmlscan - audit XML documents for internal link integrity and letter statistics
//!
//! xmlscan provides:
//! - Fetching an XML document from a file path or URL
//! - Internal link scanning (anchors with l:href="#...")
//! - Broken internal link detection (dangling id references)
//! - Letter statistics over the root element's text content
//! - Unified output format (jsonl/json/md/raw)

use anyhow::Result;
use clap::Parser;

mod analysis;
mod backends;
mod cli;
mod core;
mod document;
mod flows;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
