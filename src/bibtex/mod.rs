mod error;
pub use error::BibError;

use crate::publication::Publication;
use biblatex::{Bibliography, Chunk, Entry, Spanned};
use indexmap::IndexMap;
use regex::Regex;

/// Loosely-typed entry as it comes out of the grammar parser: citation key,
/// entry type and a flat field map. Field name casing is whatever the parser
/// reports; `field` papers over it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub key: String,
    pub entry_type: String,
    pub fields: IndexMap<String, String>,
}

impl RawEntry {
    fn from_entry(entry: &Entry) -> Self {
        let mut fields = IndexMap::new();
        for (name, value) in entry.fields.iter() {
            fields.insert(name.clone(), flatten_field_value(value));
        }
        RawEntry {
            key: entry.key.clone(),
            entry_type: entry.entry_type.to_string(),
            fields,
        }
    }

    /// Field lookup tolerant of inconsistent key casing: uppercase first,
    /// then lowercase, then the name exactly as given.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_uppercase())
            .or_else(|| self.fields.get(&name.to_lowercase()))
            .or_else(|| self.fields.get(name))
            .map(String::as_str)
    }
}

/// Flattens a BibTeX field value into a single String.
fn flatten_field_value(value: &Vec<Spanned<Chunk>>) -> String {
    value
        .iter()
        .map(|spanned_chunk| match &spanned_chunk.v {
            Chunk::Normal(s) => s.clone(),
            Chunk::Verbatim(s) => s.clone(),
            Chunk::Math(s) => s.clone(),
        })
        .collect::<Vec<String>>()
        .join("")
}

/// Maps a raw entry onto the canonical record. Total: a missing or malformed
/// field defaults to empty, never to an error.
pub fn normalize(entry: &RawEntry) -> Publication {
    let field = |name: &str| entry.field(name).unwrap_or_default().to_string();

    // Edited volumes carry their people under editor instead of author.
    let author_field = match entry.field("author") {
        Some(author) if !author.is_empty() => author.to_string(),
        _ => field("editor"),
    };
    let venue = first_non_empty([field("journal"), field("booktitle"), field("publisher")]);
    let number = first_non_empty([field("number"), field("issue")]);

    Publication {
        key: entry.key.clone(),
        entry_type: entry.entry_type.to_lowercase(),
        authors: split_authors(&author_field),
        year: field("year"),
        title: field("title"),
        venue,
        volume: non_empty(field("volume")),
        number,
        pages: non_empty(field("pages")),
        doi: non_empty(field("doi")),
        url: non_empty(field("url")),
        note: non_empty(field("note")),
        editorship: non_empty(field("editorship")),
        keywords: split_keywords(&field("keywords")),
    }
}

/// Parses a whole bibliography source into canonical records. A grammar
/// failure fails the whole file; there is no per-entry recovery.
pub fn parse_bibliography(source: &str) -> Result<Vec<Publication>, BibError> {
    let bibliography =
        Bibliography::parse(source).map_err(|err| BibError::ParseFailed(err.to_string()))?;
    Ok(bibliography
        .into_iter()
        .map(|entry| normalize(&RawEntry::from_entry(&entry)))
        .collect())
}

/// Author order is meaningful, so splitting keeps it. The list separator is
/// the literal " and ".
fn split_authors(author_field: &str) -> Vec<String> {
    author_field
        .split(" and ")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

fn split_keywords(keyword_field: &str) -> Vec<String> {
    let re = Regex::new(r"[,;]").unwrap();
    re.split(keyword_field)
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(String::from)
        .collect()
}

fn first_non_empty<const N: usize>(candidates: [String; N]) -> Option<String> {
    candidates.into_iter().find(|value| !value.is_empty())
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(entry_type: &str, fields: &[(&str, &str)]) -> RawEntry {
        RawEntry {
            key: "abc2020".to_string(),
            entry_type: entry_type.to_string(),
            fields: fields
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }

    #[test]
    fn normalizes_uppercase_fields() {
        let entry = raw(
            "ARTICLE",
            &[
                ("AUTHOR", "Hofer, M. and Smith, J."),
                ("YEAR", "2020"),
                ("TITLE", "On Polarization"),
                ("JOURNAL", "J. of Complexity"),
            ],
        );
        let publication = normalize(&entry);
        assert_eq!(publication.key, "abc2020");
        assert_eq!(publication.entry_type, "article");
        assert_eq!(publication.authors, vec!["Hofer, M.", "Smith, J."]);
        assert_eq!(publication.year, "2020");
        assert_eq!(publication.title, "On Polarization");
        assert_eq!(publication.venue.as_deref(), Some("J. of Complexity"));
    }

    #[test]
    fn field_lookup_ignores_key_casing() {
        let upper = normalize(&raw("article", &[("TITLE", "On Polarization")]));
        let lower = normalize(&raw("article", &[("title", "On Polarization")]));
        assert_eq!(upper.title, lower.title);
    }

    #[test]
    fn editor_stands_in_for_missing_author() {
        let entry = raw("book", &[("EDITOR", "Hofer, M. and Smith, J.")]);
        assert_eq!(normalize(&entry).authors, vec!["Hofer, M.", "Smith, J."]);

        // An empty author field falls through to editor as well.
        let entry = raw("book", &[("AUTHOR", ""), ("EDITOR", "Hofer, M.")]);
        assert_eq!(normalize(&entry).authors, vec!["Hofer, M."]);
    }

    #[test]
    fn issue_aliases_number() {
        let entry = raw("article", &[("ISSUE", "4")]);
        assert_eq!(normalize(&entry).number.as_deref(), Some("4"));

        let entry = raw("article", &[("NUMBER", "3"), ("ISSUE", "4")]);
        assert_eq!(normalize(&entry).number.as_deref(), Some("3"));
    }

    #[test]
    fn venue_prefers_journal_over_booktitle_over_publisher() {
        let entry = raw("misc", &[("PUBLISHER", "Complexity Press")]);
        assert_eq!(normalize(&entry).venue.as_deref(), Some("Complexity Press"));

        let entry = raw(
            "inproceedings",
            &[("BOOKTITLE", "Proc. CCS"), ("PUBLISHER", "Complexity Press")],
        );
        assert_eq!(normalize(&entry).venue.as_deref(), Some("Proc. CCS"));

        let entry = raw("misc", &[]);
        assert_eq!(normalize(&entry).venue, None);
    }

    #[test]
    fn keywords_split_on_comma_and_semicolon() {
        let entry = raw(
            "article",
            &[("KEYWORDS", "opinion dynamics, polarization; complexity")],
        );
        assert_eq!(
            normalize(&entry).keywords,
            vec!["opinion dynamics", "polarization", "complexity"]
        );
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let publication = normalize(&raw("article", &[]));
        assert!(publication.authors.is_empty());
        assert_eq!(publication.year, "");
        assert_eq!(publication.title, "");
        assert_eq!(publication.volume, None);
        assert_eq!(publication.editorship, None);
        assert!(publication.keywords.is_empty());
    }

    #[test]
    fn parses_real_source() {
        let source = r#"@article{hofer2020polarization,
  author = {Hofer, M. and Smith, J.},
  title = {On Polarization},
  journal = {J. of Complexity},
  year = {2020},
}"#;
        let publications = parse_bibliography(source).unwrap();
        assert_eq!(publications.len(), 1);
        assert_eq!(publications[0].key, "hofer2020polarization");
        assert_eq!(publications[0].entry_type, "article");
        assert_eq!(publications[0].authors, vec!["Hofer, M.", "Smith, J."]);
        assert_eq!(publications[0].venue.as_deref(), Some("J. of Complexity"));
    }

    #[test]
    fn malformed_source_fails_the_whole_file() {
        let source = "@article{broken2020,\n  title = {Unterminated";
        assert!(parse_bibliography(source).is_err());
    }

    #[test]
    fn empty_source_yields_no_entries() {
        assert!(parse_bibliography("").unwrap().is_empty());
    }
}
