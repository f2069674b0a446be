use clap::{Parser, Subcommand, ValueEnum};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process;

mod bibfile;
mod bibtex;
mod fmt;
mod publication;
mod settings;

use publication::{
    filter_guest_editorships, filter_peer_reviewed, sort_by_year, year_ordinal, Publication,
};

#[macro_export]
macro_rules! blog {
    ($category:expr, $($arg:tt)*) => {{
        use termion::color;
        let formatted_args = format!($($arg)*);
        println!("{}{:>12}{} {}",color::Fg(color::Green), $category,color::Fg(color::Reset), formatted_args);
    }};
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Bibliography file (defaults to the portfolio.toml setting)
    #[arg(long, global = true, value_name = "PATH")]
    file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List publications, most recent first
    List {
        /// Maximum number of entries to display
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only the peer-reviewed subset
        #[arg(long, conflicts_with = "editorships")]
        peer_reviewed: bool,

        /// Only guest editorships
        #[arg(long)]
        editorships: bool,
    },

    /// Print the citation for a single entry
    Cite {
        /// Citation key of the entry
        key: String,

        /// Emit the BibTeX block instead of the citation line
        #[arg(short, long)]
        bibtex: bool,
    },

    /// Export the publication list for the site build
    Export {
        /// Output file, default: stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,
    },

    /// Show bibliography statistics
    Stats,
}

#[derive(Clone, ValueEnum)]
enum ExportFormat {
    Json,
    Bibtex,
}

fn main() {
    let cli = Cli::parse();

    let config = match settings::read_config_file() {
        Ok(config) => config,
        Err(e) => {
            error_message(&format!("Broken {}: {}", settings::CONFIG_FILE, e));
            process::exit(1);
        }
    };
    let bib_path = cli.file.unwrap_or_else(|| config.bibliography.clone());

    let publications = bibfile::load_publications(&bib_path);

    let result = match cli.command {
        Commands::List {
            limit,
            peer_reviewed,
            editorships,
        } => list_publications(&publications, limit, peer_reviewed, editorships),

        Commands::Cite { key, bibtex } => cite_publication(&publications, &key, bibtex),

        Commands::Export { output, format } => export_publications(&publications, output, format),

        Commands::Stats => show_stats(&publications, &config),
    };

    match result {
        Ok(()) => (),
        Err(err) => error_message(&err),
    }
}

fn list_publications(
    publications: &[Publication],
    limit: Option<usize>,
    peer_reviewed: bool,
    editorships: bool,
) -> Result<(), String> {
    let selected = if peer_reviewed {
        filter_peer_reviewed(publications)
    } else if editorships {
        filter_guest_editorships(publications)
    } else {
        publications.to_vec()
    };
    let sorted = sort_by_year(&selected);

    if sorted.is_empty() {
        println!("No publications found.");
        return Ok(());
    }

    let width = terminal_width();
    let limit = limit.unwrap_or(sorted.len());
    for publication in sorted.iter().take(limit) {
        println!("{}", publication.display(width));
    }

    Ok(())
}

fn cite_publication(publications: &[Publication], key: &str, bibtex: bool) -> Result<(), String> {
    let publication = publications
        .iter()
        .find(|publication| publication.key == key)
        .ok_or(format!("No entry with key '{}'", key))?;

    if bibtex {
        println!("{}", fmt::generate_bibtex(publication));
    } else {
        println!("{}", fmt::format_citation(publication));
    }

    Ok(())
}

fn export_publications(
    publications: &[Publication],
    output: Option<PathBuf>,
    format: ExportFormat,
) -> Result<(), String> {
    let sorted = sort_by_year(publications);
    let payload = match format {
        ExportFormat::Json => serde_json::to_string_pretty(&sorted)
            .map_err(|e| format!("Could not serialize publications: {}", e))?,
        ExportFormat::Bibtex => sorted
            .iter()
            .map(fmt::generate_bibtex)
            .collect::<Vec<_>>()
            .join("\n\n"),
    };

    match output {
        Some(path) => {
            fs::write(&path, payload)
                .map_err(|e| format!("Could not write {}: {}", path.display(), e))?;
            blog!(
                "Exported",
                "{} publications to {}",
                sorted.len(),
                path.display()
            );
        }
        None => println!("{}", payload),
    }

    Ok(())
}

fn show_stats(publications: &[Publication], config: &settings::Config) -> Result<(), String> {
    if !config.title.is_empty() {
        blog!("Site", "{}", config.title);
    }

    println!("\nBibliography statistics:");
    println!("  Total publications: {}", publications.len());

    if publications.is_empty() {
        return Ok(());
    }

    println!(
        "  Peer-reviewed: {}",
        filter_peer_reviewed(publications).len()
    );
    println!(
        "  Guest editorships: {}",
        filter_guest_editorships(publications).len()
    );

    let years: Vec<i64> = publications
        .iter()
        .map(|publication| year_ordinal(&publication.year))
        .filter(|year| *year > 0)
        .collect();
    if let (Some(min), Some(max)) = (years.iter().min(), years.iter().max()) {
        println!("  Year range: {} - {}", min, max);
    }

    let mut year_counts = HashMap::new();
    for publication in publications {
        *year_counts
            .entry(year_ordinal(&publication.year))
            .or_insert(0) += 1;
    }

    println!("\n  Publications by year:");
    let mut years: Vec<_> = year_counts.keys().collect();
    years.sort_by(|a, b| b.cmp(a)); // Sort descending

    for year in years.iter().take(10) {
        let count: usize = year_counts[*year];
        if **year == 0 {
            println!("    undated: {} entry(s)", count);
        } else {
            println!("    {}: {} entry(s)", year, count);
        }
    }

    Ok(())
}

fn terminal_width() -> u16 {
    termion::terminal_size()
        .map(|(width, _)| width)
        .unwrap_or(100)
}

pub fn error_message(err: &str) {
    eprintln!(
        "{}{:>12}{} {}",
        termion::color::Fg(termion::color::Red),
        "Error",
        termion::color::Fg(termion::color::Reset),
        err
    );
}
