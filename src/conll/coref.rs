// Coreference column decoder.
//
// The last column of a CoNLL-2012 word line carries mention brackets:
// "(50)" is a one-word mention of entity 50, "(50" opens one, "50)" closes
// the most recently opened mention of that entity, and several items can
// be joined with "|". Mentions of the same entity may nest, so open
// mentions are kept per entity as a stack.

use std::collections::HashMap;

use anyhow::Result;

/// A mention as `[start, end)` word indices.
pub type Span = [usize; 2];

/// Accumulates mention spans line by line.
///
/// Clusters come out in the order each entity's first mention was
/// completed, with mentions in completion order.
#[derive(Debug, Default)]
pub struct CorefSpans {
    open: HashMap<i64, Vec<usize>>,
    order: Vec<i64>,
    spans: HashMap<i64, Vec<Span>>,
}

impl CorefSpans {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the coreference annotation of word `word_id`.
    /// `coref_info` is the raw column, e.g. `(50)|(80`.
    pub fn add(&mut self, coref_info: &str, word_id: usize) -> Result<()> {
        for item in coref_info.split('|') {
            self.add_one(item, word_id)?;
        }
        Ok(())
    }

    fn add_one(&mut self, item: &str, word_id: usize) -> Result<()> {
        let opens = item.starts_with('(');
        let closes = item.len() > 1 && item.ends_with(')');

        match (opens, closes) {
            (true, true) => {
                let entity = parse_entity(&item[1..item.len() - 1], item)?;
                self.push_span(entity, [word_id, word_id + 1]);
            }
            (true, false) => {
                let entity = parse_entity(&item[1..], item)?;
                self.open.entry(entity).or_default().push(word_id);
            }
            (false, true) => {
                let entity = parse_entity(&item[..item.len() - 1], item)?;
                let start = self
                    .open
                    .get_mut(&entity)
                    .and_then(Vec::pop)
                    .ok_or_else(|| {
                        anyhow::anyhow!("Mention of entity {entity} closed at word {word_id} was never opened")
                    })?;
                self.push_span(entity, [start, word_id + 1]);
            }
            (false, false) => anyhow::bail!("Invalid coref info: {item:?}"),
        }
        Ok(())
    }

    fn push_span(&mut self, entity: i64, span: Span) {
        let spans = self.spans.entry(entity).or_insert_with(|| {
            self.order.push(entity);
            Vec::new()
        });
        spans.push(span);
    }

    /// Finish the document. Fails if any mention is still open.
    pub fn into_clusters(mut self) -> Result<Vec<Vec<Span>>> {
        if let Some((entity, starts)) = self.open.iter().find(|(_, starts)| !starts.is_empty()) {
            anyhow::bail!(
                "Mention of entity {entity} opened at word {} was never closed",
                starts[0]
            );
        }
        Ok(self
            .order
            .iter()
            .filter_map(|entity| self.spans.remove(entity))
            .collect())
    }
}

fn parse_entity(id: &str, item: &str) -> Result<i64> {
    id.parse()
        .map_err(|_| anyhow::anyhow!("Invalid coref info: {item:?}"))
}
