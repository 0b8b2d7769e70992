// Crate root library declaration and module exports.
pub mod agent;
pub mod config;
pub mod extract;
pub mod ingest;
pub mod model;
pub mod paths;
pub mod pipeline;
pub mod session;
pub mod store;

rust_i18n::i18n!("locales", fallback = "en");
