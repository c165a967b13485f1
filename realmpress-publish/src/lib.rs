//! Google Drive publishing for RealmPress.
//!
//! Uploads the rendered PDF behind a stable shareable link. The OAuth
//! token lifecycle is an explicit state machine ([`TokenState`]); the
//! interactive consent flow sits behind the [`Authenticator`] seam so the
//! library never blocks on a browser itself. A previously uploaded file's
//! remote id is persisted and reused, so re-publishing updates the same
//! file instead of creating duplicates.

mod drive;
mod error;
mod file_id;
mod token;

pub use drive::{DriveClient, DriveConfig, PublishOutcome};
pub use error::{PublishError, PublishResult};
pub use file_id::FileIdStore;
pub use token::{Authenticator, TokenCache, TokenState, TokenStore};
