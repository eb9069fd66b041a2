// CoNLL-X dependency output reader.
//
// Columns (tab separated): ID FORM LEMMA CPOSTAG POSTAG FEATS HEAD DEPREL ...
// HEAD is 1-based within the sentence, 0 marks the root.

use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct DepToken {
    pub pos: String,
    /// Head position within the sentence (0-based), `None` for the root
    pub head: Option<usize>,
    pub deprel: String,
}

pub type DepSentence = Vec<DepToken>;

/// Parse CoNLL-X text into sentences.
///
/// Only lines starting with a digit are tokens; anything else (blank
/// lines, converter chatter) ends the current sentence.
pub fn read_dep_sentences(text: &str) -> Result<Vec<DepSentence>> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        if !line.starts_with(|c: char| c.is_ascii_digit()) {
            if !current.is_empty() {
                sentences.push(std::mem::take(&mut current));
            }
            continue;
        }
        let token = parse_token(line).with_context(|| format!("dependency line {}", lineno + 1))?;
        current.push(token);
    }
    if !current.is_empty() {
        sentences.push(current);
    }

    Ok(sentences)
}

fn parse_token(line: &str) -> Result<DepToken> {
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() < 8 {
        anyhow::bail!("Expected at least 8 tab-separated columns: {line:?}");
    }
    let head: usize = cols[6]
        .parse()
        .with_context(|| format!("Invalid head {:?}", cols[6]))?;

    Ok(DepToken {
        pos: cols[3].to_string(),
        head: head.checked_sub(1),
        deprel: cols[7].to_string(),
    })
}
