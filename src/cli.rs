//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::core::render::{OutputFormat, RenderConfig};
use crate::flows::report::MissingSourcePolicy;

/// xmlscan - audit an XML document for internal link integrity and letter statistics.
#[derive(Parser, Debug)]
#[command(name = "xmlscan")]
#[command(
    author,
    version,
    about,
    long_about = r#"xmlscan resolves an XML document (file path or http(s) URL), parses it and
emits a unified, machine-readable report for every command.

Each command prints a ReportSet in the selected format (default: jsonl).

Output formats:
- jsonl: one JSON object per line (best for piping into tools)
- json: a single JSON array
- md: human-friendly Markdown
- raw: excerpts only (unstable; intended for debugging)

The SOURCE argument may also be supplied through the XML environment
variable, mirroring the page parameter the tool originated from.

Examples:
    xmlscan report books/demo.fb2
    xmlscan links http://localhost:8080/demo.fb2
    xmlscan broken books/demo.fb2 --format md
    xmlscan letters books/demo.fb2
    XML=books/demo.fb2 xmlscan report
"#
)]
pub struct Cli {
    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for the ReportSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw\n\n\
Tip: Prefer jsonl when you want stable, line-oriented output for piping."
    )]
    pub format: String,

    /// Disable colored output (when applicable).
    #[arg(
        long,
        global = true,
        long_help = "Disable colored stage diagnostics on stderr. This is useful when piping\n\
to files or when your terminal does not support ANSI colors."
    )]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Suppress stage diagnostics. Machine-readable results are still printed\n\
to stdout."
    )]
    pub quiet: bool,

    /// Verbose mode (more diagnostics).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Print stage-by-stage pipeline diagnostics to stderr (fetched bytes,\n\
link counts, letter counts)."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON and JSONL output with indentation for human readability.\n\n\
This is useful when manually inspecting results. Has no effect on md/raw formats."
    )]
    pub pretty: bool,

    /// Policy for a missing or empty SOURCE (error/ignore).
    #[arg(
        long,
        global = true,
        default_value = "error",
        value_name = "POLICY",
        long_help = "What to do when SOURCE is missing or empty.\n\n\
Supported values:\n\
- error (default): print a diagnostic and exit non-zero\n\
- ignore: emit an empty report and exit zero\n\n\
Both behaviors existed in the page this tool replaces; the policy makes\n\
the choice explicit."
    )]
    pub if_missing: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the document and emit the resolved locator with its raw text.
    #[command(
        long_about = "Resolve SOURCE, fetch the document text and emit a single source item\n\
carrying the locator, the (possibly truncated) raw text, its size and its\n\
content hash.\n\n\
Examples:\n\
  xmlscan source books/demo.fb2\n\
  xmlscan source http://localhost:8080/demo.fb2\n"
    )]
    Source {
        /// XML document to audit (file path or http(s) URL).
        #[arg(value_name = "SOURCE", env = "XML")]
        source: Option<String>,
    },

    /// List internal links (anchors whose l:href starts with '#').
    #[command(
        long_about = "Fetch and parse the document, then emit one link item per anchor\n\
element carrying an l:href attribute whose value starts with '#', in\n\
document order. External links are not listed.\n\n\
Examples:\n\
  xmlscan links books/demo.fb2\n\
  xmlscan links books/demo.fb2 --format md\n"
    )]
    Links {
        /// XML document to audit (file path or http(s) URL).
        #[arg(value_name = "SOURCE", env = "XML")]
        source: Option<String>,
    },

    /// List broken internal links (dangling id references).
    #[command(
        long_about = "Fetch and parse the document, scan the internal links and emit one\n\
item per link whose target id matches no element. Order follows the\n\
scan; repeated broken hrefs appear once per occurrence.\n\n\
Examples:\n\
  xmlscan broken books/demo.fb2\n\
  xmlscan broken books/demo.fb2 --format md\n"
    )]
    Broken {
        /// XML document to audit (file path or http(s) URL).
        #[arg(value_name = "SOURCE", env = "XML")]
        source: Option<String>,
    },

    /// Count letters in the root element's text content.
    #[command(
        long_about = "Fetch and parse the document, then emit the two letter counts over the\n\
first root element's concatenated text content:\n\
- raw: letters only, all whitespace stripped\n\
- normalized: characters after NFKC normalization, line terminators\n\
  stripped, inline whitespace kept\n\n\
Example:\n\
  xmlscan letters books/demo.fb2\n"
    )]
    Letters {
        /// XML document to audit (file path or http(s) URL).
        #[arg(value_name = "SOURCE", env = "XML")]
        source: Option<String>,
    },

    /// Run the whole audit pipeline and emit the full report.
    #[command(
        long_about = "Run every stage in sequence - fetch, parse, link scan, broken link\n\
detection, letter counting - and emit the full report: the source item,\n\
one item per internal link with its resolution status, and the letter\n\
counts.\n\n\
Examples:\n\
  xmlscan report books/demo.fb2\n\
  xmlscan report books/demo.fb2 --format md\n\
  XML=books/demo.fb2 xmlscan report\n"
    )]
    Report {
        /// XML document to audit (file path or http(s) URL).
        #[arg(value_name = "SOURCE", env = "XML")]
        source: Option<String>,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    // Parse output format
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    let policy: MissingSourcePolicy = cli.if_missing.parse().unwrap_or_default();
    let verbose = cli.verbose && !cli.quiet;

    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Source { source } => {
            crate::flows::report::run_source(source.as_deref(), policy, verbose, render_config)
        }

        Commands::Links { source } => {
            crate::flows::report::run_links(source.as_deref(), policy, verbose, render_config)
        }

        Commands::Broken { source } => {
            crate::flows::report::run_broken(source.as_deref(), policy, verbose, render_config)
        }

        Commands::Letters { source } => {
            crate::flows::report::run_letters(source.as_deref(), policy, verbose, render_config)
        }

        Commands::Report { source } => {
            crate::flows::report::run_report(source.as_deref(), policy, verbose, render_config)
        }
    }
}
