//! # prakriti
//!
//! Core of the prakriti questionnaire. Transport-agnostic.
//!
//! A respondent answers a fixed list of three-option questions, then gives
//! some personal details. Each answer counts towards one of the three
//! doshas (Vata, Pitta, Kapha); the counts decide the constitution the
//! respondent is classified as.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prakriti::{MemoryStore, questions, submission::Submission};
//!
//! let store = MemoryStore::new();
//! let bank = questions::builtin();
//! let submission = Submission::from_slice(body)?;
//! let assessment = prakriti::submission::submit(&store, &submission, bank.len()).await?;
//! println!("{}", assessment.classification.label);
//! ```
//!
//! ## Modules
//!
//! - `validate` - Personal info field validators
//! - `classify` - Tally to constitution
//! - `submission` - Payload decoding, validation and persistence
//! - `flow` - The per-respondent state machine driven by front-ends
//! - `wire` - JSON bodies shared by server and clients
//! - `questions` - The built-in questionnaire

// Re-export all types from prakriti-types
pub use prakriti_types::*;

pub mod classify;
pub use classify::{DOMINANCE_THRESHOLD, classify};

pub mod flow;
pub use flow::{Effect, FlowEvent, Phase, SubmitFailure, SurveyFlow};

pub mod questions;

pub mod submission;
pub use submission::{Assessment, MalformedPayload, Rejection, SubmitError, Submission};

pub mod validate;
pub use validate::{FieldCheck, FieldError};

pub mod wire;

mod memory_store;
pub use memory_store::MemoryStore;
