mod tfidf;

pub use tfidf::TfIdfProvider;
