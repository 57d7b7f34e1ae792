//! Decision logic: approval gating, pair sizing, the per-account step
//! pipeline, and the run driver that walks the account list.

pub mod approval;
pub mod driver;
pub mod orchestrator;
pub mod sizing;

pub use approval::ApprovalGate;
pub use driver::RunDriver;
pub use orchestrator::AccountOrchestrator;
pub use sizing::{size_liquidity_pair, PairAmounts, SizingError};
