use crate::statistics::StatisticLogger;

/// Counters of the solving process which the clause database reads and
/// maintains.
///
/// `conflicts` is incremented by the search loop; the remaining fields are
/// written by the database itself. Byte counts follow the exact record
/// footprints reported by [`Clause::bytes`](crate::Clause::bytes).
#[derive(Default, Debug, Copy, Clone)]
pub struct Counters {
    /// Conflicts generated by propagation; drives the reduction trigger.
    pub conflicts: u64,
    /// Running time stamp of conflict analysis touching redundant clauses.
    pub analyzed: u64,
    /// Number of reductions performed.
    pub reductions: u64,
    /// Number of clauses marked useless by reductions.
    pub reduced: u64,
    /// Number of garbage collections performed.
    pub collections: u64,
    /// Bytes reclaimed by deleting clauses.
    pub collected: u64,
    /// Number of live redundant clauses.
    pub redundant: u64,
    /// Number of live irredundant clauses.
    pub irredundant: u64,
    /// Bytes of live irredundant clauses.
    pub irrbytes: u64,
    /// Bytes of clauses currently marked garbage.
    pub garbage: u64,
}

impl Counters {
    pub fn log_statistics(&self, logger: &StatisticLogger) {
        logger.log_statistic("conflicts", self.conflicts);
        logger.log_statistic("analyzed", self.analyzed);
        logger.log_statistic("reductions", self.reductions);
        logger.log_statistic("reduced", self.reduced);
        logger.log_statistic("collections", self.collections);
        logger.log_statistic("collected", self.collected);
        logger.log_statistic("redundant", self.redundant);
        logger.log_statistic("irredundant", self.irredundant);
        logger.log_statistic("irrbytes", self.irrbytes);
        logger.log_statistic("garbage", self.garbage);
    }
}
