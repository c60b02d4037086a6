/// Options which determine how the clause database manages its clauses.
///
/// These options influence when the database reduces the learned clauses, how
/// the reduction candidates are ordered, and how garbage is reclaimed.
#[derive(Debug, Copy, Clone)]
pub struct DatabaseOptions {
    /// Whether reduction of the learned clause database is enabled at all.
    pub reduce: bool,
    /// Use the glue (LBD) of a clause as the primary key when ordering
    /// reduction candidates; the analyzed time stamp breaks ties. When
    /// disabled only the time stamp is used.
    pub reduce_glue: bool,
    /// Clauses of at least this size carry a cached watch-replacement
    /// position even when they are not extended.
    pub pos_size: u32,
    /// Reclaim garbage with the moving collector. When disabled, collections
    /// only drop directory entries and watchers; the bytes of deleted clauses
    /// are reclaimed at the next moving collection.
    pub move_clauses: bool,
    /// Emit verbose reduction and collection reports.
    pub verbose: bool,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            reduce: true,
            reduce_glue: true,
            pos_size: 4,
            move_clauses: true,
            verbose: false,
        }
    }
}
