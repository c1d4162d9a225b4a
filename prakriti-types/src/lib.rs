//! Core types for the prakriti survey.
//!
//! This crate provides the foundational, presentation-agnostic types:
//! - `Question` and `QuestionBank` - The fixed questionnaire
//! - `Choice`, `AnswerKey` and `AnswerSet` - What the respondent picked
//! - `Dosha` and `Tally` - Answer counts per constitution
//! - `PersonalInfo` and `Gender` - Respondent details collected after the questions
//! - `Classification` and `ResponseRecord` - The outcome and its persisted form
//! - `QuestionSource` and `ResponseStore` traits - For plugging in collaborators

mod answer_key;
pub use answer_key::AnswerKey;

mod choice;
pub use choice::{Choice, Dosha};

mod answers;
pub use answers::AnswerSet;

mod tally;
pub use tally::Tally;

mod question;
pub use question::{OPTIONS_PER_QUESTION, Question};

mod question_bank;
pub use question_bank::QuestionBank;

mod personal_info;
pub use personal_info::{Field, Gender, PersonalInfo};

mod classification;
pub use classification::{Classification, Constitution};

mod record;
pub use record::ResponseRecord;

mod error;
pub use error::{SourceError, StoreError};

mod traits;
pub use traits::{QuestionSource, ResponseStore};
