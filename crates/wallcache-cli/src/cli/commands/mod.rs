//! CLI command handlers, one file per subcommand.

mod analyze;
mod check;
mod dedup;
mod import;
mod sample;
mod upgrade;
mod validate;

pub use analyze::run_analyze;
pub use check::run_check;
pub use dedup::run_dedup;
pub use import::run_import;
pub use sample::run_sample;
pub use upgrade::run_upgrade;
pub use validate::run_validate;
#[cfg(test)]
pub(crate) use validate::{persist_report, validate_files, Persisted};
