//! Run orchestration for RealmPress.
//!
//! Wires the whole pipeline together: sync (or archive import) into the
//! entity cache, worldbook assembly, HTML and PDF rendering, optional
//! Drive publish. One [`run`] call executes the stages sequentially under
//! an exclusive run lock and returns a [`RunReport`].

mod config;
mod error;
mod runner;
mod telemetry;

pub use config::{PipelineConfig, PublishConfig, SyncMode};
pub use error::{PipelineError, PipelineResult};
pub use runner::{run, RunReport};
pub use telemetry::init_tracing;
