//! Record evaluators and the combined check.
//!
//! Each evaluator owns its error policy: SPF propagates, DKIM and DMARC
//! collapse failures into "absent" at their own boundary.

mod check;
mod dkim;
mod dmarc;
mod spf;

pub use check::AuthChecker;
pub use dkim::evaluate_dkim;
pub use dmarc::evaluate_dmarc;
pub use spf::evaluate_spf;
