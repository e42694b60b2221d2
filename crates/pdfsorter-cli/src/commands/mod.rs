//! Command implementations.

pub mod check;
pub mod config;
pub mod report;
pub mod run;

pub use self::check::execute_check;
pub use self::config::execute_config;
pub use self::report::execute_report;
pub use self::run::execute_run;
