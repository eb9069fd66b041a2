// Constituency tree extraction.
//
// The parse column holds one fragment of a bracketed tree per word with
// a `*` where the leaf goes. Replacing the `*` by `(POS word)` and
// concatenating the fragments rebuilds the sentence's tree.

use anyhow::Result;

use super::reader::Sentence;

/// Rebuild the bracketed tree of a sentence.
pub fn sentence_tree(sentence: &Sentence) -> Result<String> {
    let mut tree = String::new();
    for word in sentence {
        let Some(star) = word.parse_bit.find('*') else {
            anyhow::bail!(
                "Parse bit {:?} of word {:?} has no leaf marker",
                word.parse_bit,
                word.word
            );
        };
        tree.push_str(&word.parse_bit[..star]);
        tree.push_str(&format!("({} {})", word.pos, word.word));
        tree.push_str(&word.parse_bit[star + 1..]);
    }
    Ok(tree)
}

/// One tree per line, in sentence order.
pub fn trees_text(sentences: &[Sentence]) -> Result<String> {
    let mut out = String::new();
    for sentence in sentences {
        out.push_str(&sentence_tree(sentence)?);
        out.push('\n');
    }
    Ok(out)
}
