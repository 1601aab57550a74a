//! Prompt submission (MVVM)
//!
//! Structure:
//! - api.rs: HTTP calls behind `JockeyApi`
//! - stream.rs: SSE progress stream behind `EventStreamFactory`
//! - flow.rs: epoch-guarded submission flow
//! - view_model.rs: PromptFormVm with RwSignals
//! - view.rs: TextProcessorPage

pub mod api;
pub mod flow;
pub mod stream;
mod view;
mod view_model;

pub use api::{ApiError, HttpJockeyApi, JockeyApi};
pub use flow::{FlowDeps, SubmissionFlow, SubmissionState, SubmitError};
pub use stream::{BrowserEventStreams, EventStreamFactory, StreamHandle, StreamSignal};
pub use view::TextProcessorPage;
pub use view_model::PromptFormVm;
