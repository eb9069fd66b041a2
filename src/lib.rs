// corefprep: CoNLL-2012 coreference corpus preparation
//
// This is the library root. Each module corresponds to one stage of
// getting from a licensed OntoNotes release to model-ready jsonlines.

pub mod config;
pub mod conll;
pub mod fetch;
pub mod heads;
pub mod input;
pub mod jsonl;
pub mod score;
pub mod status;
