/// Limits recorded by the reduction policy.
///
/// The limits are written by [`ClauseDatabase::reduce`] and read back both by
/// the trigger check and by the extended-clause decision of future
/// allocations.
///
/// [`ClauseDatabase::reduce`]: crate::ClauseDatabase::reduce
#[derive(Debug, Copy, Clone)]
pub struct Limits {
    /// The conflict count at which the next reduction fires.
    pub reduce: u64,
    /// Reduction candidates must have an analyzed time stamp at or below this
    /// value; clauses touched by conflict analysis since the last reduction
    /// are kept.
    pub analyzed: u64,
    /// The maximum size over the clauses kept by the last reduction.
    pub keptsize: u32,
    /// The maximum glue over the clauses kept by the last reduction.
    pub keptglue: u32,
    /// The conflict count when the last reduction ran.
    pub conflicts_at_last_reduce: u64,
    /// The number of root-level assignments seen by the last satisfied-clause
    /// sweep; the sweep is skipped while this is current.
    pub fixed_at_last_collect: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            reduce: Increments::default().reduce,
            analyzed: 0,
            keptsize: 0,
            keptglue: 0,
            conflicts_at_last_reduce: 0,
            fixed_at_last_collect: 0,
        }
    }
}

/// Increments applied to the reduction trigger.
///
/// After every reduction `reduce` grows by `redinc`, and `redinc` itself
/// shrinks by one towards 1, so reductions become more frequent relative to
/// the conflict rate as the search ages.
#[derive(Debug, Copy, Clone)]
pub struct Increments {
    /// The conflict interval added to the reduction limit.
    pub reduce: u64,
    /// The amount by which the interval grows at each reduction.
    pub redinc: u64,
}

impl Default for Increments {
    fn default() -> Self {
        Self {
            reduce: 300,
            redinc: 10,
        }
    }
}
