//! Voice command front end for voxflow.
//!
//! - **[`dispatcher`]** -- [`VoiceCommandExecutor`], which routes an utterance
//!   to a static workflow, a catalog action, the UI or the workflow builder.
//! - **[`ui`]** -- the [`UiBridge`] port and the [`UiCommand`]s sent through it.
//! - **[`listener`]** -- [`listen`], the loop over a recognition event channel.

pub mod dispatcher;
pub mod listener;
pub mod ui;

pub use dispatcher::{VoiceCommandExecutor, is_stop};
pub use listener::{ListenOutcome, ListenReport, RecognitionEvent, Transcript, listen};
pub use ui::{SortDirection, UiBridge, UiCommand, UnattachedUi};
