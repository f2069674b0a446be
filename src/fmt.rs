use crate::publication::Publication;

/// Renders one plain-text citation line: authors, year, title, venue,
/// volume(number), pages. An empty field drops its segment.
pub fn format_citation(publication: &Publication) -> String {
    let mut citation = publication.authors.join(", ");
    if !publication.year.is_empty() {
        citation.push_str(&format!(" ({})", publication.year));
    }
    if !publication.title.is_empty() {
        citation.push_str(&format!(" {}.", publication.title));
    }
    if let Some(venue) = &publication.venue {
        citation.push_str(&format!(" {}", venue));
    }
    if let Some(volume) = &publication.volume {
        citation.push_str(&format!(", {}", volume));
    }
    if let Some(number) = &publication.number {
        citation.push_str(&format!("({})", number));
    }
    if let Some(pages) = &publication.pages {
        citation.push_str(&format!(", {}", pages));
    }
    citation
}

/// Re-serializes a record as a BibTeX block with a stable field order. The
/// venue lands in `journal` for articles and `booktitle` for everything else.
pub fn generate_bibtex(publication: &Publication) -> String {
    let mut lines = vec![format!("@{}{{{},", publication.entry_type, publication.key)];
    if !publication.authors.is_empty() {
        lines.push(field_line("author", &publication.authors.join(" and ")));
    }
    if !publication.title.is_empty() {
        lines.push(field_line("title", &publication.title));
    }
    if let Some(venue) = &publication.venue {
        let name = if publication.entry_type == "article" {
            "journal"
        } else {
            "booktitle"
        };
        lines.push(field_line(name, venue));
    }
    if !publication.year.is_empty() {
        lines.push(field_line("year", &publication.year));
    }
    for (name, value) in [
        ("volume", &publication.volume),
        ("number", &publication.number),
        ("pages", &publication.pages),
        ("doi", &publication.doi),
        ("url", &publication.url),
        ("note", &publication.note),
    ] {
        if let Some(value) = value {
            lines.push(field_line(name, value));
        }
    }
    if !publication.keywords.is_empty() {
        lines.push(field_line("keywords", &publication.keywords.join(", ")));
    }
    lines.push("}".to_string());
    lines.join("\n")
}

fn field_line(name: &str, value: &str) -> String {
    format!("  {} = {{{}}},", name, value)
}
