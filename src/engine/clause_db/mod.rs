//! The clause database proper: the packed clause record, the arena owning
//! all clause bytes, the directory of live clauses, the reduction policy, and
//! the garbage collectors.
mod arena;
mod clause;
mod collect;
mod database;
mod reduce;

pub use arena::ClauseArena;
pub use clause::Clause;
pub use clause::ClauseMut;
pub use clause::MAX_GLUE;
pub use collect::ClauseForwarding;
pub use database::ClauseDatabase;
pub use database::ClauseDatabaseError;
