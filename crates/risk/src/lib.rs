//! # TMEP Risk
//!
//! State-free pipeline over generative output: parse structured issues with
//! a tolerant grammar, optionally validate citations against the retrieved
//! evidence set, classify each citation into a risk tier by
//! longest-prefix-wins, and render the final attorney-facing report.
//!
//! Everything here is a pure function of its inputs; nothing talks to the
//! network or holds state between requests.

mod classify;
mod parse;
mod report;

pub use classify::{classify_section, RiskTier};
pub use parse::{parse_generated_output, Issue};
pub use report::{apply_risk_engine, DISCLAIMER, NO_PROVISION_FOUND};
