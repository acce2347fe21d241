//! Core errors and tracing setup for the `tripwire` workspace.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias
//!   shared by the breaker crate and the CLI.
//! - **`tracing`**: Subscriber initialization used by binaries.

pub mod errors;
pub mod tracing;

pub use self::errors::{Error, Result};
