//! `swapmatch-recon` - cross-chain swap candidate reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded candidate rows, returns the final
//! one-to-one matches plus a run summary. No filesystem traversal.

pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod export;
pub mod filter;
pub mod load;
pub mod matcher;
pub mod model;
pub mod partition;
pub mod preprocess;

pub use config::{MatchConfig, Thresholds};
pub use engine::run;
pub use error::MatchError;
pub use load::{concat_sources, parse_source};
pub use model::{FinalMatch, MatchResult, MatchSummary, SwapBatch, SwapCandidate};
