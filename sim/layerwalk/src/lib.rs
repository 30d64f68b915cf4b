//! The Layerwalk front end: runs one exchange across the LAN topology and
//! plays its events back one at a time.

pub mod cli;

pub mod session;
pub use session::{AnnotatedEvent, Session, SessionError};

pub mod playback;
pub use playback::Playback;
