mod dkim;
mod dmarc;
mod dns;
mod report;
mod spf;
mod target;
mod usage;

pub use dkim::*;
pub use dmarc::*;
pub use dns::*;
pub use report::*;
pub use spf::*;
pub use target::*;
pub use usage::*;
