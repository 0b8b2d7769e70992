// File: src/ingest.rs
//! Text producer boundary: speech-to-text, OCR and PDF extraction engines
//! are consumed as black boxes that yield plain text. An empty yield is a
//! terminal "could not extract" outcome reported to the user; it is never
//! passed further into the pipeline.
use anyhow::Result;

/// Which kind of media the text came from; selects the failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerKind {
    Voice,
    Photo,
    Pdf,
}

impl ProducerKind {
    /// Localized "could not extract" reply for this producer.
    pub fn empty_reply(self, locale: &str) -> String {
        match self {
            ProducerKind::Voice => rust_i18n::t!("voice_empty", locale = locale).to_string(),
            ProducerKind::Photo => rust_i18n::t!("photo_empty", locale = locale).to_string(),
            ProducerKind::Pdf => rust_i18n::t!("pdf_empty", locale = locale).to_string(),
        }
    }
}

/// A black-box producer of plain text from some media payload. Implemented
/// by the embedding application; the pipeline only consumes the output.
pub trait TextProducer {
    fn kind(&self) -> ProducerKind;
    fn produce(&self) -> impl std::future::Future<Output = Result<String>> + Send;
}
