//! Engine-vs-engine games driven by a TOML description.
//!
//! ```bash
//! cargo run -p contest -- demos/contest.toml
//! RUST_LOG=debug cargo run -p contest -- demos/contest.toml
//! ```

mod config;
mod error;
mod observer;
mod record;
mod runner;

pub use config::*;
pub use error::*;
pub use observer::*;
pub use record::*;
pub use runner::*;
