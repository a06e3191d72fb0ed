//! Spotlight CLI
//!
//! Opens a saved HTML page in an interactive palette view, or runs a single
//! query against it from the command line.

use clap::{Parser, Subcommand};
use console::style;
use spotlight::{
    logging, page, Highlight, Palette, PaletteEvent, Selector, SpotlightConfig,
};
use std::path::{Path, PathBuf};

/// Spotlight - keyboard-driven link palette
///
/// Collects the links of a page and filters them as you type.
#[derive(Parser)]
#[command(name = "spotlight")]
#[command(author = "Spotlight Contributors")]
#[command(version)]
#[command(about = "Keyboard-driven link palette", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a page in the interactive view
    Run {
        /// HTML file to load
        #[arg(short, long)]
        page: PathBuf,

        /// Selector for candidate elements (e.g. "a", "a.nav", "a.nav, #home")
        #[arg(short, long)]
        target: Option<String>,

        /// Chord that reveals the palette (e.g. ctrl+space, ctrl+k)
        #[arg(short, long)]
        shortcut: Option<String>,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Record the chosen target without opening it
        #[arg(long)]
        no_open: bool,
    },

    /// Filter a page's links with one query
    Search {
        /// HTML file to load
        #[arg(short, long)]
        page: PathBuf,

        /// Selector for candidate elements
        #[arg(short, long)]
        target: Option<String>,

        /// Query (use -- before it if it starts with -)
        #[arg(allow_hyphen_values = true)]
        query: String,
    },

    /// List the candidates found on a page
    Links {
        /// HTML file to load
        #[arg(short, long)]
        page: PathBuf,

        /// Selector for candidate elements
        #[arg(short, long)]
        target: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },
}

fn main() {
    logging::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            page,
            target,
            shortcut,
            config,
            no_open,
        } => cmd_run(&page, target, shortcut, config.as_deref(), no_open),

        Commands::Search {
            page,
            target,
            query,
        } => cmd_search(&page, target.as_deref(), &query),

        Commands::Links {
            page,
            target,
            output,
        } => cmd_links(&page, target.as_deref(), &output),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

/// Interactive view
fn cmd_run(
    page_path: &Path,
    target: Option<String>,
    shortcut: Option<String>,
    config_path: Option<&Path>,
    no_open: bool,
) -> spotlight::Result<()> {
    let mut config = match config_path {
        Some(path) => SpotlightConfig::load(path)?,
        None => SpotlightConfig::default(),
    };
    if let Some(target) = target {
        config.target = target;
    }
    if let Some(shortcut) = shortcut {
        config.shortcut = shortcut;
    }
    if no_open {
        config.open_links = false;
    }
    config.validate()?;

    let html = page::load_page(page_path)?;
    spotlight::tui::run(&config, &html)
}

/// Search command implementation
fn cmd_search(page_path: &Path, target: Option<&str>, query: &str) -> spotlight::Result<()> {
    let selector = Selector::parse(target.unwrap_or("a"))?;
    let html = page::load_page(page_path)?;

    let mut palette = Palette::new(page::discover(&html, &selector));
    palette.handle_event(PaletteEvent::Reveal);
    palette.handle_event(PaletteEvent::QueryChanged(query.to_string()));

    println!(
        "{} Searching {} links for '{}'",
        style("→").cyan().bold(),
        palette.entries().len(),
        style(query).yellow()
    );
    println!();

    if palette.matched_indices().is_empty() {
        println!("  {}", style("No matches").dim());
        return Ok(());
    }

    for (i, entry) in palette.matched().enumerate() {
        let marker = if entry.is_selected() {
            style("›").green().bold().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "  {} {} {}  {}",
            marker,
            style(format!("{:3}.", i + 1)).dim(),
            styled_highlight(entry.highlight()),
            style(entry.target()).cyan()
        );
    }

    println!();
    println!("Found {} matches", style(palette.matched_indices().len()).green());
    Ok(())
}

fn styled_highlight(highlight: &Highlight) -> String {
    highlight
        .segments()
        .iter()
        .map(|seg| {
            if seg.is_emphasis() {
                style(seg.text()).yellow().bold().underlined().to_string()
            } else {
                seg.text().to_string()
            }
        })
        .collect()
}

/// Links command implementation
fn cmd_links(page_path: &Path, target: Option<&str>, output_format: &str) -> spotlight::Result<()> {
    let selector = Selector::parse(target.unwrap_or("a"))?;
    let html = page::load_page(page_path)?;
    let candidates = page::discover(&html, &selector);

    if output_format == "json" {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
        return Ok(());
    }

    println!(
        "{} {} candidates for '{}' in {}",
        style("→").cyan().bold(),
        style(candidates.len()).green(),
        style(selector.as_str()).yellow(),
        page_path.display()
    );
    println!();

    for (i, candidate) in candidates.iter().enumerate() {
        let target = if candidate.target.is_empty() {
            style("(no target)".to_string()).dim()
        } else {
            style(candidate.target.clone()).cyan()
        };
        println!(
            "  {} {}  {}",
            style(format!("{:3}.", i + 1)).dim(),
            candidate.title,
            target
        );
    }

    Ok(())
}
