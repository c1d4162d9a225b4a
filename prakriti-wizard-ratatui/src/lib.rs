//! # prakriti-wizard-ratatui
//!
//! Terminal front-end for the prakriti questionnaire.
//!
//! The wizard shows one question at a time, then a personal info form, and
//! finally the classification returned by the server. All navigation rules
//! live in [`prakriti::SurveyFlow`]; this crate only renders its phases and
//! carries out its effects through a [`SurveyGateway`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prakriti_wizard_ratatui::{HttpGateway, RatatuiWizard};
//!
//! fn main() -> anyhow::Result<()> {
//!     let gateway = HttpGateway::new("http://127.0.0.1:3000")?;
//!     let result = RatatuiWizard::new().with_title("Prakriti").run(&gateway)?;
//!     println!("{}: {}", result.result, result.description);
//!     Ok(())
//! }
//! ```

mod draw;
mod gateway;
mod wizard;

pub use gateway::{GatewayError, HttpGateway, SurveyGateway};
pub use wizard::{RatatuiWizard, Theme, WizardError};
