//! Core types for the balance sources
//!
//! This crate defines the shared pieces used by every source crate and
//! the CLI: the error type, source identifiers, asset valuation, and the
//! shell-export rendering of credential bundles.

pub mod asset;
pub mod env;
pub mod error;
pub mod export;
pub mod source;

pub use asset::{total_value, Asset, AssetSource};
pub use env::{load_dotenv, optional_env, require_env};
pub use error::{BalanceError, BalanceResult};
pub use export::{write_exports, EnvExport, ExportVars};
pub use source::Source;
