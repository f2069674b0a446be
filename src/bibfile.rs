use crate::bibtex;
use crate::publication::Publication;
use anyhow::{anyhow, Result};
use shellexpand::tilde;
use std::fs;
use std::path::Path;

/// Conventional bibliography location inside the site checkout.
pub const DEFAULT_BIB_PATH: &str = "src/content/publications.bib";

/// Reads and parses the bibliography at `path`. Errors here are the caller's
/// problem; `load_publications` is the recovery boundary.
pub fn read_bibliography(path: &str) -> Result<Vec<Publication>> {
    let expanded = tilde(path).to_string();
    let bib_path = Path::new(&expanded);
    let bib_content = fs::read_to_string(bib_path)
        .map_err(|err| anyhow!("Could not read bibliography {}: {}", path, err))?;
    let publications = bibtex::parse_bibliography(&bib_content)?;
    Ok(publications)
}

/// Loads the bibliography for a page build. Any failure, from a missing file
/// to a malformed entry, yields an empty list: the site must still build.
pub fn load_publications(path: &str) -> Vec<Publication> {
    match read_bibliography(path) {
        Ok(publications) => publications,
        Err(err) => {
            crate::error_message(&err.to_string());
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_publications_from_a_bib_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "@article{{hofer2020polarization,\n  \
             author = {{Hofer, M.}},\n  \
             title = {{On Polarization}},\n  \
             journal = {{J. of Complexity}},\n  \
             year = {{2020}},\n}}\n"
        )
        .unwrap();
        let publications = load_publications(file.path().to_str().unwrap());
        assert_eq!(publications.len(), 1);
        assert_eq!(publications[0].key, "hofer2020polarization");
    }

    #[test]
    fn missing_file_yields_an_empty_list() {
        let publications = load_publications("/nonexistent/publications.bib");
        assert!(publications.is_empty());
    }

    #[test]
    fn malformed_file_yields_an_empty_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "@article{{broken2020,\n  title = {{Unterminated").unwrap();
        assert!(load_publications(file.path().to_str().unwrap()).is_empty());
        assert!(read_bibliography(file.path().to_str().unwrap()).is_err());
    }
}
