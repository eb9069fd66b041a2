// Provisioning: third-party tools and the CoNLL-2012 corpus.

pub mod conll_data;
pub mod download;
pub mod third_party;
pub mod tools;
