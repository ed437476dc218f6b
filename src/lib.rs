// Library surface for headless/integration tests and reuse.
// The terminal front end (main.rs, ui.rs) stays in the binary.
pub mod app_dirs;
pub mod bionic;
pub mod chunking;
pub mod clock;
pub mod config;
pub mod history;
pub mod runtime;
pub mod scheduler;
pub mod segment;
pub mod session;
pub mod timer;

pub use scheduler::{Pacer, PlaybackPhase, ReadingMode, Snapshot};
pub use session::SessionConfig;
