use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use clap::Parser;
use copydeck_core::{EditOutcome, EditSession};
use owo_colors::OwoColorize;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for the processed document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Html,
    Preview,
    Fields,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "preview" => Ok(Self::Preview),
            "fields" => Ok(Self::Fields),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: html, preview, fields, json", s)),
        }
    }
}

impl OutputFormat {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Preview => "preview",
            Self::Fields => "fields",
            Self::Json => "json",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "copydeck")]
#[command(author = "Copydeck Contributors")]
#[command(version = VERSION)]
#[command(about = "Edit the content of HTML documents without touching their structure", long_about = None)]
struct Args {
    /// Local HTML file or '-' for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (html, preview, fields, json)
    #[arg(short, long, default_value = "html", value_name = "FORMAT")]
    format: OutputFormat,

    /// Apply a single edit as FIELD_ID=VALUE (repeatable)
    #[arg(long = "set", value_name = "ID=VALUE")]
    set: Vec<String>,

    /// Apply edits from a JSON object mapping field ids to values
    #[arg(long, value_name = "FILE")]
    edits: Option<PathBuf>,

    /// Write a session snapshot (original HTML plus changed values)
    #[arg(long, value_name = "FILE")]
    save_session: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Render the field listing as plain text, one block per group
fn format_fields(session: &EditSession) -> String {
    let mut out = String::new();

    for group in session.groups() {
        out.push_str(&format!("[{}] {}\n", group.id, group.label));
        for field in &group.fields {
            let marker = if field.is_unchanged() { ' ' } else { '*' };
            out.push_str(&format!("{} {:<18} {:<28} {}\n", marker, field.id, field.label, field.value));
        }
        out.push('\n');
    }

    out
}

/// Collect edits from the --edits file and --set flags, --set winning on conflict
fn collect_edits(args: &Args) -> anyhow::Result<BTreeMap<String, String>> {
    let mut edits: BTreeMap<String, String> = BTreeMap::new();

    if let Some(path) = &args.edits {
        let raw = fs::read_to_string(path).with_context(|| format!("Failed to read edits file: {}", path.display()))?;
        edits = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse edits file: {}", path.display()))?;
    }

    for pair in &args.set {
        let Some((id, value)) = pair.split_once('=') else {
            bail!("Invalid --set value: {} (expected FIELD_ID=VALUE)", pair);
        };
        edits.insert(id.to_string(), value.to_string());
    }

    Ok(edits)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.verbose {
        echo::print_banner();
    }

    let html = if args.input == "-" {
        if args.verbose {
            echo::print_step(1, 4, "Reading from stdin");
        }
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        if args.verbose {
            echo::print_step(1, 4, &format!("Reading {}", args.input));
        }
        fs::read_to_string(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?
    };

    if args.verbose {
        eprintln!("  {} {}", "Size:".dimmed(), echo::format_size(html.len()).bright_white());
        eprintln!();
        echo::print_step(2, 4, "Extracting editable fields");
    }

    let mut session = EditSession::new(&html).context("Failed to parse HTML")?;

    if !session.has_editable_content() {
        bail!("No editable content found. Make sure your HTML contains text, images, or links.");
    }

    if args.verbose {
        let field_count: usize = session.groups().iter().map(|g| g.fields.len()).sum();
        eprintln!("  {} {}", "Groups:".dimmed(), session.groups().len().to_string().bright_white());
        eprintln!("  {} {}", "Fields:".dimmed(), field_count.to_string().bright_white());
        eprintln!(
            "  {} {}",
            "Mode:".dimmed(),
            if session.is_full_document() { "full document" } else { "fragment" }.bright_white()
        );
        eprintln!();
        echo::print_step(3, 4, "Applying edits");
    }

    let edits = collect_edits(&args)?;
    let mut applied = 0usize;

    for (id, value) in &edits {
        match session.set_field(id, value) {
            EditOutcome::Applied => applied += 1,
            EditOutcome::Rejected => echo::print_warning(&format!("Blocked unsafe URL for {}; attribute removed", id)),
            EditOutcome::Stale => echo::print_warning(&format!("Unknown field id: {}", id)),
        }
    }

    if args.verbose {
        eprintln!(
            "  {} {} {}",
            "Applied:".dimmed(),
            applied.to_string().bright_white(),
            format!("of {}", edits.len()).dimmed()
        );
        eprintln!();
        echo::print_step(4, 4, &format!("Writing {} output", args.format.as_str()));
        eprintln!();
    }

    if let Some(path) = &args.save_session {
        let snapshot = serde_json::to_string_pretty(&session.snapshot()).context("Failed to serialize session")?;
        fs::write(path, snapshot).with_context(|| format!("Failed to write session file: {}", path.display()))?;
        if args.verbose {
            echo::print_info(&format!("Session saved to {}", path.display()));
        }
    }

    let output = match args.format {
        OutputFormat::Html => session.export(),
        OutputFormat::Preview => session.preview().context("Failed to render preview")?,
        OutputFormat::Fields => format_fields(&session),
        OutputFormat::Json => serde_json::to_string_pretty(session.groups()).context("Failed to serialize fields")?,
    };

    match args.output {
        Some(path) => {
            fs::write(&path, &output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display()));
        }
        None => print!("{}", output),
    }

    Ok(())
}
