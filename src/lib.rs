//! # Medlar
//! Medlar is the clause database core of a conflict-driven clause-learning
//! (CDCL) SAT solver. It owns the clause storage of the solver and the policy
//! deciding which learned clauses to keep: a bump-allocated arena of packed
//! variable-width clause records, a reduction policy which periodically marks
//! low-utility learned clauses as garbage, and a moving garbage collector
//! which compacts the surviving clauses into a fresh arena while rewriting
//! every reference held by watcher lists and the assignment trail.
//!
//! The search loop, unit propagation, conflict analysis, and the input layer
//! are collaborators of this crate rather than part of it. They interact with
//! the database through stable [`ClauseRef`] handles; the only operation that
//! invalidates a handle is a garbage collection, after which all registered
//! secondary references have been rewritten through the forwarding protocol.
//!
//! # Example
//! ```rust
//! use medlar::Assignments;
//! use medlar::ClauseDatabase;
//! use medlar::Literal;
//! use medlar::WatchLists;
//!
//! let mut database = ClauseDatabase::default();
//! let mut assignments = Assignments::default();
//! let mut watches = WatchLists::default();
//!
//! let literals = [Literal::new(1), Literal::new(-2), Literal::new(3)];
//! let learned = database.new_clause(&literals, true, 2);
//! watches.watch_clause(database.arena(), learned);
//!
//! // The search loop reports conflicts; once the reduction trigger fires the
//! // database reduces itself and compacts the arena.
//! database.counters_mut().conflicts += 500;
//! if database.reducing() {
//!     database.reduce(&mut assignments, &mut watches);
//! }
//! ```
//!
//! ## Feature flags
//! - `debug-checks`: enable the more expensive tiers of the internal contract
//!   checks. Turning this on slows the database down considerably, so it is
//!   off by default.

pub mod basic_types;
pub mod engine;
pub mod statistics;

#[doc(hidden)]
pub mod checks;

pub use basic_types::ClauseRef;
pub use basic_types::Literal;
pub use basic_types::Variable;
pub use engine::clause_db::Clause;
pub use engine::clause_db::ClauseArena;
pub use engine::clause_db::ClauseDatabase;
pub use engine::clause_db::ClauseDatabaseError;
pub use engine::clause_db::ClauseForwarding;
pub use engine::clause_db::ClauseMut;
pub use engine::clause_db::MAX_GLUE;
pub use engine::Assignments;
pub use engine::Counters;
pub use engine::DatabaseOptions;
pub use engine::Increments;
pub use engine::Limits;
pub use engine::WatchLists;
pub use engine::Watcher;
