//! The clause database engine: assignment state, watch lists, the clause
//! arena, and the reduction and collection machinery built on top of them.
pub(crate) mod assignments;
pub mod clause_db;
pub(crate) mod limits;
pub(crate) mod options;
pub(crate) mod statistics;
pub(crate) mod watch_lists;

pub use assignments::Assignments;
pub use clause_db::ClauseDatabase;
pub use limits::Increments;
pub use limits::Limits;
pub use options::DatabaseOptions;
pub use statistics::Counters;
pub use watch_lists::WatchLists;
pub use watch_lists::Watcher;
