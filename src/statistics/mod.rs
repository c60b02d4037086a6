//! Statistic logging for the clause database, in the `PREFIX name=value`
//! format solvers print between search phases.
pub(crate) mod statistic_logger;
pub(crate) mod statistic_logging;

pub use statistic_logger::StatisticLogger;
pub use statistic_logging::configure_statistic_logging;
pub use statistic_logging::log_statistic;
pub use statistic_logging::log_statistic_postfix;
pub use statistic_logging::should_log_statistics;
pub use statistic_logging::StatisticOptions;
