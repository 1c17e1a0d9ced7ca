//! # CLI Module
//!
//! Command-line surface of the contract compiler.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Compile an API schema directory into generated Rust artifacts:
//!
//! ```bash
//! rpcgen generate --api api/ --output src/generated
//! ```
//!
//! The output directory is cleared and recreated on every run. Requires
//! `jtd-codegen` and `rustfmt` on `PATH`.
//!
//! ### `inspect`
//!
//! Print the discovered endpoints and definitions without generating:
//!
//! ```bash
//! rpcgen inspect --api api/
//! ```

mod commands;

pub use commands::{run_cli, Cli, Commands};
