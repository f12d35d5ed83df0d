//! # CLI Module
//!
//! User-facing commands of MelodyMap.
//!
//! - [`explore`] - interactive session: log in, fetch the listening history
//!   once, then browse views and ask for reflections at a prompt
//! - [`report`] - one-shot run printing every view and the requested
//!   reflections
//!
//! Both commands share the same pipeline:
//!
//! ```text
//! browser login → token exchange → recently played → album/artist lookups
//!     → dataset → tables / reflections
//! ```
//!
//! The individual steps live in [`pipeline`].
//!
//! A failure while logging in or fetching stops the pipeline before anything
//! is displayed. Reflection failures are reported one by one and never touch
//! the dataset.

mod display;
mod explore;
pub mod pipeline;
mod report;

pub use explore::ExploreCommand;
pub use explore::explore;
pub use report::ReportRequest;
pub use report::report;
