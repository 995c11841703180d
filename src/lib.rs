//! Health companion core
//!
//! A mood classifier, an incremental text renderer with restart and dispose
//! semantics, and the symptom-checker, journal and check-in flows built on
//! them.

pub mod chat;
pub mod companion;
pub mod config;
pub mod inference;
pub mod mood;
pub mod reveal;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod wellness;

#[cfg(test)]
mod testing;

pub use companion::{CompanionError, Reply, SymptomChecker};
pub use config::CompanionConfig;
pub use mood::{classify, classify_numeric, MoodTag};
pub use reveal::{spawn_reveal, Renderer, RevealHandle};
pub use session::{UserIdentity, UserSession};
