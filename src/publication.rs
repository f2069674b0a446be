use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;
use termion::color;

/// Canonical publication record. Built once per load and never mutated; the
/// derived views below return new lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub key: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub authors: Vec<String>,
    pub year: String,
    pub title: String,
    pub venue: Option<String>,
    pub volume: Option<String>,
    pub number: Option<String>,
    pub pages: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
    pub note: Option<String>,
    pub editorship: Option<String>,
    pub keywords: Vec<String>,
}

impl Publication {
    pub fn display(&self, max_width: u16) -> String {
        let year = if self.year.is_empty() {
            "----"
        } else {
            self.year.as_str()
        };
        let mut display_string = format!(
            "{} {}|{} {} {}| ",
            year,
            color::Fg(color::Rgb(83, 110, 122)),
            color::Fg(color::Reset),
            self.author_line(),
            color::Fg(color::Rgb(83, 110, 122)),
        );
        display_string.push_str(&format!(
            "{}{}",
            color::Fg(color::Reset),
            self.trim_details(&self.title, max_width),
        ));
        display_string
    }

    /// Short author form for one-line listings.
    fn author_line(&self) -> String {
        match self.authors.len() {
            0 => String::new(),
            1 => self.authors[0].clone(),
            2 => format!("{} and {}", self.authors[0], self.authors[1]),
            _ => format!("{} et al.", self.authors[0]),
        }
    }

    fn trim_details(&self, details: &str, max_length: u16) -> String {
        let length = (max_length as usize)
            .saturating_sub(4 + 2)
            .saturating_sub(self.author_line().len() + 4);
        fit_string_to_length(details, length)
    }
}

fn fit_string_to_length(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        return String::from(input);
    }
    let truncated: String = input.chars().take(max_length.saturating_sub(3)).collect();
    format!("{}...", truncated)
}

const PEER_REVIEWED_TYPES: [&str; 4] = ["article", "inproceedings", "incollection", "inbook"];

/// A guest editorship is flagged either by a boolean-like sentinel or by any
/// free-text editorship note.
pub fn filter_guest_editorships(publications: &[Publication]) -> Vec<Publication> {
    publications
        .iter()
        .filter(|publication| is_guest_editorship(publication))
        .cloned()
        .collect()
}

fn is_guest_editorship(publication: &Publication) -> bool {
    match publication.editorship.as_deref() {
        Some(editorship) => {
            let flag = editorship.to_lowercase();
            flag == "true" || flag == "yes" || flag == "1" || !editorship.trim().is_empty()
        }
        None => false,
    }
}

/// Conventional peer-reviewed entry types, minus anything already classified
/// as a guest editorship. The two views never share a key.
pub fn filter_peer_reviewed(publications: &[Publication]) -> Vec<Publication> {
    let editorship_keys: HashSet<String> = filter_guest_editorships(publications)
        .into_iter()
        .map(|publication| publication.key)
        .collect();
    publications
        .iter()
        .filter(|publication| {
            PEER_REVIEWED_TYPES.contains(&publication.entry_type.to_lowercase().as_str())
                && !editorship_keys.contains(&publication.key)
        })
        .cloned()
        .collect()
}

/// Most recent first. The sort is stable, so entries sharing a year keep
/// their source order.
pub fn sort_by_year(publications: &[Publication]) -> Vec<Publication> {
    let mut sorted = publications.to_vec();
    sorted.sort_by_key(|publication| Reverse(year_ordinal(&publication.year)));
    sorted
}

/// Year as an integer for ordering: the leading digits of the year string,
/// zero when there are none.
pub fn year_ordinal(year: &str) -> i64 {
    let re = Regex::new(r"^\s*(\d+)").unwrap();
    re.captures(year)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
        .unwrap_or(0)
}
