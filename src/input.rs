// Prediction input contract.
//
// Raw documents handed to the model are jsonlines records of the form
// {"document_id": str, "cased_words": [str], "sent_id": [int], "speaker": [str]?}
// The model picks genre embeddings from the first two letters of the
// document id, so those must be a known OntoNotes genre.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// OntoNotes genres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Genre {
    /// Broadcast conversation
    Bc,
    /// Broadcast news
    Bn,
    /// Magazine
    Mz,
    /// Newswire
    Nw,
    /// Pivot text (the Bible)
    Pt,
    /// Telephone conversation
    Tc,
    /// Web text
    Wb,
}

impl Genre {
    pub const ALL: [Genre; 7] = [
        Genre::Bc,
        Genre::Bn,
        Genre::Mz,
        Genre::Nw,
        Genre::Pt,
        Genre::Tc,
        Genre::Wb,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Genre::Bc => "bc",
            Genre::Bn => "bn",
            Genre::Mz => "mz",
            Genre::Nw => "nw",
            Genre::Pt => "pt",
            Genre::Tc => "tc",
            Genre::Wb => "wb",
        }
    }

    /// Genre encoded in the first two characters of a document id.
    pub fn of_document(document_id: &str) -> Result<Self> {
        document_id
            .get(..2)
            .unwrap_or(document_id)
            .parse()
            .with_context(|| format!("Document id {document_id:?} does not start with a genre code"))
    }
}

impl FromStr for Genre {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Genre::ALL
            .into_iter()
            .find(|g| g.code() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Genre::ALL.iter().map(Genre::code).collect();
                anyhow::anyhow!("Unknown genre {s:?} (expected one of {})", known.join(", "))
            })
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A raw document as accepted for prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDocument {
    pub document_id: String,
    pub cased_words: Vec<String>,
    pub sent_id: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<Vec<String>>,
}

impl InputDocument {
    /// Check the record against the input contract and return its genre.
    pub fn validate(&self) -> Result<Genre> {
        let genre = Genre::of_document(&self.document_id)?;
        let n_words = self.cased_words.len();

        if self.sent_id.len() != n_words {
            anyhow::bail!(
                "{}: sent_id has {} entries for {n_words} words",
                self.document_id,
                self.sent_id.len()
            );
        }
        if let Some(speaker) = &self.speaker {
            if speaker.len() != n_words {
                anyhow::bail!(
                    "{}: speaker has {} entries for {n_words} words",
                    self.document_id,
                    speaker.len()
                );
            }
        }
        Ok(genre)
    }
}

/// Validate every record of a jsonlines input file.
/// Returns the number of valid documents; fails on the first bad line.
pub fn check_file(path: &Path) -> Result<usize> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut count = 0;
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let doc: InputDocument = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: invalid record", path.display(), lineno + 1))?;
        doc.validate()
            .with_context(|| format!("{}:{}", path.display(), lineno + 1))?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, words: usize, sents: usize) -> InputDocument {
        InputDocument {
            document_id: id.to_string(),
            cased_words: vec!["w".to_string(); words],
            sent_id: vec![0; sents],
            speaker: None,
        }
    }

    #[test]
    fn test_genre_of_document() {
        assert_eq!(Genre::of_document("tc/ch/00/ch_0000").unwrap(), Genre::Tc);
        assert_eq!(Genre::of_document("wb_my_blog").unwrap(), Genre::Wb);
    }

    #[test]
    fn test_unknown_genre_rejected() {
        assert!(Genre::of_document("xx/doc").is_err());
        assert!(Genre::of_document("n").is_err());
        assert!(Genre::of_document("").is_err());
    }

    #[test]
    fn test_validate_lengths() {
        assert_eq!(doc("nw/a", 3, 3).validate().unwrap(), Genre::Nw);
        assert!(doc("nw/a", 3, 2).validate().is_err());

        let mut with_speaker = doc("bc/a", 2, 2);
        with_speaker.speaker = Some(vec!["A".to_string()]);
        assert!(with_speaker.validate().is_err());
    }

    #[test]
    fn test_speaker_is_optional() {
        let parsed: InputDocument =
            serde_json::from_str(r#"{"document_id":"mz/x","cased_words":["Hi"],"sent_id":[0]}"#)
                .unwrap();
        assert!(parsed.speaker.is_none());
        assert!(parsed.validate().is_ok());
    }
}
