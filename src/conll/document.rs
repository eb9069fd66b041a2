// Jsonlines document model and assembly from gold + dependency sentences.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::coref::{CorefSpans, Span};
use super::deps::DepSentence;
use super::reader::Sentence;

/// A whole gold_conll file, possibly spanning several parts.
///
/// Every per-word vector has one entry per word in `cased_words`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConllDocument {
    pub document_id: String,
    pub cased_words: Vec<String>,
    /// Word index → sentence index
    pub sent_id: Vec<usize>,
    /// Word index → part number
    pub part_id: Vec<u32>,
    pub speaker: Vec<String>,
    pub pos: Vec<String>,
    pub deprel: Vec<String>,
    /// Word index → head word index, `None` for the sentence root
    pub head: Vec<Option<usize>>,
    pub clusters: Vec<Vec<Span>>,
}

/// One part of a document, the unit written to the output jsonlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPart {
    pub document_id: String,
    pub cased_words: Vec<String>,
    pub sent_id: Vec<usize>,
    pub part_id: u32,
    pub speaker: Vec<String>,
    pub pos: Vec<String>,
    pub deprel: Vec<String>,
    pub head: Vec<Option<usize>>,
    pub clusters: Vec<Vec<Span>>,
}

/// Merge gold word lines with their dependency parses into one document.
///
/// Sentences and words must line up one to one; `source` names the file
/// in error messages.
pub fn build_document(
    source: &str,
    gold: &[Sentence],
    parsed: &[DepSentence],
) -> Result<ConllDocument> {
    if gold.len() != parsed.len() {
        anyhow::bail!(
            "{source}: {} gold sentences but {} dependency sentences",
            gold.len(),
            parsed.len()
        );
    }
    let Some(first) = gold.first().and_then(|s| s.first()) else {
        anyhow::bail!("{source}: no sentences");
    };

    let mut doc = ConllDocument {
        document_id: first.document_id.clone(),
        cased_words: Vec::new(),
        sent_id: Vec::new(),
        part_id: Vec::new(),
        speaker: Vec::new(),
        pos: Vec::new(),
        deprel: Vec::new(),
        head: Vec::new(),
        clusters: Vec::new(),
    };
    let mut coref = CorefSpans::new();
    let mut total_words = 0;

    for (sent_id, (sentence, dep_sentence)) in gold.iter().zip(parsed).enumerate() {
        if sentence.len() != dep_sentence.len() {
            anyhow::bail!(
                "{source}: sentence {sent_id} has {} words but {} dependency tokens",
                sentence.len(),
                dep_sentence.len()
            );
        }

        for (word, token) in sentence.iter().zip(dep_sentence) {
            if word.document_id != doc.document_id {
                anyhow::bail!(
                    "{source}: document id changed from {} to {}",
                    doc.document_id,
                    word.document_id
                );
            }
            let word_id = total_words + word.word_number;

            if word.coref != "-" {
                coref.add(&word.coref, word_id).map_err(|e| {
                    anyhow::anyhow!("{source}: sentence {sent_id}, word {}: {e}", word.word_number)
                })?;
            }

            doc.cased_words.push(word.word.clone());
            doc.sent_id.push(sent_id);
            doc.part_id.push(word.part_id);
            doc.speaker.push(word.speaker.clone());
            doc.pos.push(token.pos.clone());
            doc.deprel.push(token.deprel.clone());
            doc.head.push(token.head.map(|h| total_words + h));
        }

        total_words += sentence.len();
    }

    doc.clusters = coref
        .into_clusters()
        .map_err(|e| anyhow::anyhow!("{source}: {e}"))?;
    Ok(doc)
}

/// Split a document into its parts.
///
/// Each part is a contiguous run of words with the same part number.
/// Sentence ids and heads are rebased to the part; only mentions that
/// start inside a part are kept, and they must also end inside it. A
/// head pointing into another part is an error.
pub fn split_parts(doc: ConllDocument) -> Result<Vec<DocumentPart>> {
    let n_words = doc.cased_words.len();
    if n_words == 0 {
        return Ok(Vec::new());
    }

    let mut bounds = Vec::new();
    let mut start = 0;
    for i in 1..=n_words {
        if i == n_words || doc.part_id[i] != doc.part_id[start] {
            bounds.push((start, i));
            start = i;
        }
    }

    if bounds.len() == 1 {
        let part_id = doc.part_id[0];
        return Ok(vec![DocumentPart {
            document_id: doc.document_id,
            cased_words: doc.cased_words,
            sent_id: doc.sent_id,
            part_id,
            speaker: doc.speaker,
            pos: doc.pos,
            deprel: doc.deprel,
            head: doc.head,
            clusters: doc.clusters,
        }]);
    }

    let mut parts = Vec::with_capacity(bounds.len());
    for (start, end) in bounds {
        let sent_start = doc.sent_id[start];

        let mut clusters = Vec::new();
        for cluster in &doc.clusters {
            let mut part_cluster = Vec::new();
            for &[span_start, span_end] in cluster {
                if (start..end).contains(&span_start) {
                    if span_end <= span_start || span_end > end {
                        anyhow::bail!(
                            "{}: mention [{span_start}, {span_end}) crosses a part boundary",
                            doc.document_id
                        );
                    }
                    part_cluster.push([span_start - start, span_end - start]);
                }
            }
            if !part_cluster.is_empty() {
                clusters.push(part_cluster);
            }
        }

        let mut head = Vec::with_capacity(end - start);
        for (i, &h) in doc.head[start..end].iter().enumerate() {
            match h {
                Some(h) if !(start..end).contains(&h) => anyhow::bail!(
                    "{}: head {h} of word {} lies outside part [{start}, {end})",
                    doc.document_id,
                    start + i
                ),
                h => head.push(h.map(|h| h - start)),
            }
        }

        parts.push(DocumentPart {
            document_id: doc.document_id.clone(),
            cased_words: doc.cased_words[start..end].to_vec(),
            sent_id: doc.sent_id[start..end].iter().map(|s| s - sent_start).collect(),
            part_id: doc.part_id[start],
            speaker: doc.speaker[start..end].to_vec(),
            pos: doc.pos[start..end].to_vec(),
            deprel: doc.deprel[start..end].to_vec(),
            head,
            clusters,
        });
    }
    Ok(parts)
}
