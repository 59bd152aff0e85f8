//! Payload types for the guide channel.
//!
//! Everything that crosses the pub/sub boundary lives here: the
//! [`EntryUpdate`] payload clients exchange on the channel and the
//! [`Timetoken`] the messaging backend stamps on every published event.
//!
//! Payloads travel as JSON values. Decoding is strict by default; callers
//! that need to show something for a malformed payload can fall back to
//! [`payload::lossy_field`], which reads a single key and substitutes
//! [`NULL_TEXT`] when it is absent.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod payload;
pub mod timetoken;

pub use errors::{ProtocolError, Result};
pub use payload::{DEFAULT_ENTRY, EntryUpdate, NULL_TEXT};
pub use timetoken::Timetoken;
