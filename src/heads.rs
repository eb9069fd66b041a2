// Head-word clusters for word-level coreference.
//
// Every mention is reduced to a single head word. When two mentions share
// a head, the shortest one keeps it and the head is removed once from the
// clusters of the others. Clusters left with fewer than two heads are
// dropped.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conll::coref::Span;
use crate::conll::document::DocumentPart;
use crate::conll::splits::DataSplit;
use crate::jsonl::{self, JsonlWriter};

/// A document part with head-word clusters next to the original spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadDocument {
    pub document_id: String,
    pub cased_words: Vec<String>,
    pub sent_id: Vec<usize>,
    pub part_id: u32,
    pub speaker: Vec<String>,
    pub pos: Vec<String>,
    pub deprel: Vec<String>,
    pub head: Vec<Option<usize>>,
    /// `[head, start, end]` for the shortest mention of every head
    pub head2span: Vec<[usize; 3]>,
    pub word_clusters: Vec<Vec<usize>>,
    pub span_clusters: Vec<Vec<Span>>,
}

/// Counts of what head reduction removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadStats {
    pub total_spans: usize,
    pub deleted_spans: usize,
    pub total_clusters: usize,
    pub deleted_clusters: usize,
}

impl HeadStats {
    pub fn add(&mut self, other: HeadStats) {
        self.total_spans += other.total_spans;
        self.deleted_spans += other.deleted_spans;
        self.total_clusters += other.total_clusters;
        self.deleted_clusters += other.deleted_clusters;
    }
}

/// Percentage of `part` in `total`, 0 when `total` is 0.
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// The head of a span: the only word whose head lies outside the span (or
/// is the root). With zero or several such words, the rightmost word.
///
/// `span` must be non-empty and lie within `heads`; see [`check_span`].
pub fn span_head(span: Span, heads: &[Option<usize>]) -> usize {
    let [start, end] = span;
    let mut candidates = (start..end).filter(|&i| match heads[i] {
        None => true,
        Some(h) => !(start..end).contains(&h),
    });
    match (candidates.next(), candidates.next()) {
        (Some(only), None) => only,
        _ => end - 1,
    }
}

/// Fail unless `span` is a non-empty range of the document's `n_words` words.
pub fn check_span(document_id: &str, span: Span, n_words: usize) -> Result<()> {
    let [start, end] = span;
    if start >= end || end > n_words {
        anyhow::bail!("{document_id}: mention [{start}, {end}) is outside its {n_words} words");
    }
    Ok(())
}

/// Reduce a document's span clusters to head-word clusters.
pub fn to_head_document(doc: DocumentPart) -> Result<(HeadDocument, HeadStats)> {
    let n_words = doc.head.len().min(doc.cased_words.len());
    for &span in doc.clusters.iter().flatten() {
        check_span(&doc.document_id, span, n_words)?;
    }

    let mut stats = HeadStats {
        total_spans: doc.clusters.iter().map(Vec::len).sum(),
        total_clusters: doc.clusters.len(),
        ..HeadStats::default()
    };

    let mut head_clusters: Vec<Vec<usize>> = doc
        .clusters
        .iter()
        .map(|cluster| cluster.iter().map(|&span| span_head(span, &doc.head)).collect())
        .collect();

    // head → [(span, cluster index)], heads in first-seen order
    let mut order = Vec::new();
    let mut by_head: HashMap<usize, Vec<(Span, usize)>> = HashMap::new();
    for (cluster_idx, (cluster, heads)) in doc.clusters.iter().zip(&head_clusters).enumerate() {
        for (&span, &head) in cluster.iter().zip(heads) {
            by_head
                .entry(head)
                .or_insert_with(|| {
                    order.push(head);
                    Vec::new()
                })
                .push((span, cluster_idx));
        }
    }

    let mut head2span = Vec::with_capacity(order.len());
    for head in order {
        let Some(mut spans) = by_head.remove(&head) else {
            continue;
        };
        // stable: the first of equally short mentions wins
        spans.sort_by_key(|([start, end], _)| end - start);
        let [start, end] = spans[0].0;
        head2span.push([head, start, end]);

        if spans.len() > 1 {
            debug!(
                document = %doc.document_id,
                word = %doc.cased_words[head],
                mentions = spans.len(),
                "Mentions share a head"
            );
            for &(_, cluster_idx) in &spans[1..] {
                let cluster = &mut head_clusters[cluster_idx];
                if let Some(pos) = cluster.iter().position(|&h| h == head) {
                    cluster.remove(pos);
                    stats.deleted_spans += 1;
                }
            }
        }
    }

    let word_clusters: Vec<Vec<usize>> = head_clusters.into_iter().filter(|c| c.len() > 1).collect();
    stats.deleted_clusters = stats.total_clusters - word_clusters.len();

    let head_doc = HeadDocument {
        document_id: doc.document_id,
        cased_words: doc.cased_words,
        sent_id: doc.sent_id,
        part_id: doc.part_id,
        speaker: doc.speaker,
        pos: doc.pos,
        deprel: doc.deprel,
        head: doc.head,
        head2span,
        word_clusters,
        span_clusters: doc.clusters,
    };
    Ok((head_doc, stats))
}

/// Convert `<data_dir>/english_<split>.jsonlines` to `english_<split>_head.jsonlines`.
pub fn convert_split(data_dir: &Path, split: DataSplit) -> Result<HeadStats> {
    let input = data_dir.join(split.jsonlines_name(""));
    let output = data_dir.join(split.jsonlines_name("_head"));

    let docs: Vec<DocumentPart> = jsonl::read_all(&input)?;
    let mut writer = JsonlWriter::create(&output)?;
    let mut stats = HeadStats::default();

    for doc in docs {
        let (head_doc, doc_stats) = to_head_document(doc)
            .with_context(|| format!("Invalid document in {}", input.display()))?;
        writer.write(&head_doc)?;
        stats.add(doc_stats);
    }
    writer.finish()?;

    Ok(stats)
}
