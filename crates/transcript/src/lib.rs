//! `ar-transcript`: turning a Bey call listing and transcript into the
//! agent's structured answer.
//!
//! - [`latest_ended_call`] picks the call to inspect
//! - [`select_output`] picks the message(s) to read
//! - [`extract`] recovers the JSON payload from free text
//!
//! ```rust
//! use ar_domain::types::Message;
//! use ar_transcript::select_output;
//!
//! let messages = vec![
//!     Message::new("assistant", r#"Done! OUTPUT_JSON_START {"role":"SRE"} OUTPUT_JSON_END"#),
//!     Message::new("user", "Great, thanks"),
//! ];
//! let selection = select_output(&messages).unwrap();
//! assert_eq!(selection.value["role"], "SRE");
//! ```

pub mod calls;
pub mod extract;
pub mod select;

pub use calls::{ended_calls, latest_ended_call};
pub use extract::{extract, extract_opt, extract_with_strategy, Strategy};
pub use select::{is_assistant, select_output, transcript_text, Selection};
