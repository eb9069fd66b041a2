// CoNLL-2012 corpus reading and conversion to jsonlines documents.

pub mod converter;
pub mod convert;
pub mod coref;
pub mod deps;
pub mod document;
pub mod reader;
pub mod splits;
pub mod trees;
