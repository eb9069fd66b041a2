// CoNLL-2012 `*_gold_conll` reader.
//
// Comment lines (`#begin document`, `#end document`) and blank lines
// separate sentences; every other line is one word.

use anyhow::{Context, Result};

/// Minimum number of columns on a word line (through speaker, NE and coref).
const MIN_COLUMNS: usize = 11;

/// One word line of a gold_conll file.
#[derive(Debug, Clone, PartialEq)]
pub struct WordLine {
    pub document_id: String,
    pub part_id: u32,
    /// Position within the sentence, starting at 0
    pub word_number: usize,
    pub word: String,
    pub pos: String,
    pub parse_bit: String,
    pub speaker: String,
    /// Raw coreference column, `-` when empty
    pub coref: String,
}

impl WordLine {
    pub fn parse(line: &str) -> Result<Self> {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < MIN_COLUMNS {
            anyhow::bail!(
                "Expected at least {MIN_COLUMNS} columns, found {}: {line:?}",
                cols.len()
            );
        }

        Ok(Self {
            document_id: cols[0].to_string(),
            part_id: cols[1]
                .parse()
                .with_context(|| format!("Invalid part number {:?}", cols[1]))?,
            word_number: cols[2]
                .parse()
                .with_context(|| format!("Invalid word number {:?}", cols[2]))?,
            word: cols[3].to_string(),
            pos: cols[4].to_string(),
            parse_bit: cols[5].to_string(),
            speaker: cols[9].to_string(),
            coref: cols[cols.len() - 1].to_string(),
        })
    }
}

pub type Sentence = Vec<WordLine>;

/// Split a gold_conll file into sentences of parsed word lines.
pub fn read_sentences(text: &str) -> Result<Vec<Sentence>> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            if !current.is_empty() {
                sentences.push(std::mem::take(&mut current));
            }
            continue;
        }
        let word = WordLine::parse(trimmed).with_context(|| format!("line {}", lineno + 1))?;
        current.push(word);
    }
    if !current.is_empty() {
        sentences.push(current);
    }

    Ok(sentences)
}
