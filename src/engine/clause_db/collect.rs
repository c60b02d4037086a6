use log::debug;

use crate::basic_types::ClauseRef;
use crate::basic_types::Variable;
use crate::engine::clause_db::Clause;
use crate::engine::clause_db::ClauseArena;
use crate::engine::Assignments;
use crate::engine::ClauseDatabase;
use crate::engine::WatchLists;
use crate::medlar_check;
use crate::medlar_debug_check;

/// The forwarding view handed to collaborators during the rewire pass of a
/// collection, mapping pre-collection handles to their post-collection
/// values.
pub struct ClauseForwarding<'a> {
    words: &'a [u32],
}

impl<'a> ClauseForwarding<'a> {
    pub(crate) fn new(words: &'a [u32]) -> ClauseForwarding<'a> {
        ClauseForwarding { words }
    }

    /// The post-collection handle for `reference`: `None` if the clause was
    /// collected, the handle of its copy if it was moved, and the unchanged
    /// handle if the collection did not move clauses.
    pub fn forward(&self, reference: ClauseRef) -> Option<ClauseRef> {
        let clause = Clause::new(self.words, reference);
        if clause.is_collectible() {
            return None;
        }
        if clause.is_moved() {
            Some(clause.forward())
        } else {
            Some(reference)
        }
    }
}

/// Drops the watchers of collected clauses, follows forwarding for the rest,
/// and refreshes the cached size and blocking literal of clauses shrunk
/// since being watched.
fn flush_watches(arena: &ClauseArena, forwarding: &ClauseForwarding<'_>, watches: &mut WatchLists) {
    watches.flush(|literal, watcher| {
        let Some(forwarded) = forwarding.forward(watcher.clause) else {
            return false;
        };
        watcher.clause = forwarded;
        let clause = arena.get_clause(forwarded);
        if clause.size() < watcher.size {
            // Root-level falsified literals were flushed from the clause, so
            // the saved size does not match anymore. Update the size and
            // eagerly the blocking literal, even if it was not removed.
            watcher.size = clause.size();
            let blocking_position = (clause.literal(0) == literal) as u32;
            medlar_check!(clause.literal(1 - blocking_position) == literal);
            watcher.blocking = clause.literal(blocking_position);
        } else {
            medlar_debug_check!(clause.size() == watcher.size);
        }
        true
    });
}

/// The garbage collectors: a moving two-pass copying collector and a
/// non-moving fallback which only drops references.
impl ClauseDatabase {
    /// Collects all collectible clauses and rewires the watcher lists and the
    /// trail reason handles.
    ///
    /// This is the only operation which invalidates clause handles; every
    /// collaborator must treat it (and [`ClauseDatabase::reduce`], which
    /// calls it) as a compaction barrier.
    pub fn garbage_collection(&mut self, assignments: &mut Assignments, watches: &mut WatchLists) {
        self.garbage_collection_with(assignments, watches, |_| {});
    }

    /// As [`ClauseDatabase::garbage_collection`], and additionally hands the
    /// forwarding view to `rewire` so collaborators can rewrite any further
    /// cached clause handles (a stored conflict clause, for instance).
    pub fn garbage_collection_with(
        &mut self,
        assignments: &mut Assignments,
        watches: &mut WatchLists,
        rewire: impl FnMut(&ClauseForwarding<'_>),
    ) {
        self.counters.collections += 1;
        debug!(
            "collect {}: garbage collecting clause database",
            self.counters.collections
        );
        self.mark_satisfied_clauses_as_garbage(assignments);
        if self.opts.move_clauses {
            self.copy_non_garbage_clauses(assignments, watches, rewire);
        } else {
            self.delete_garbage_clauses(watches, rewire);
        }
        self.check_clause_stats();
    }

    /// The moving garbage collector.
    ///
    /// The first pass copies the surviving clauses into a fresh arena in
    /// directory order, which keeps their relative order and already gives
    /// some cache locality, and records a forwarding handle in each old
    /// record. The second pass rewrites every secondary reference through
    /// forwarding and releases the old space.
    fn copy_non_garbage_clauses(
        &mut self,
        assignments: &mut Assignments,
        watches: &mut WatchLists,
        mut rewire: impl FnMut(&ClauseForwarding<'_>),
    ) {
        let mut collected_bytes: u64 = 0;
        let mut collected_clauses: u64 = 0;
        let mut moved_bytes: u64 = 0;
        let mut moved_clauses: u64 = 0;

        for &reference in &self.clauses {
            let clause = self.arena.get_clause(reference);
            if clause.is_collectible() {
                collected_bytes += clause.bytes() as u64;
                collected_clauses += 1;
            } else {
                moved_bytes += clause.bytes() as u64;
                moved_clauses += 1;
            }
        }

        if self.opts.verbose {
            debug!(
                "collect {}: moving {} bytes {:.0}% of {} non garbage clauses",
                self.counters.collections,
                moved_bytes,
                percent(moved_bytes, collected_bytes + moved_bytes),
                moved_clauses
            );
        }

        self.arena
            .prepare_to_space((moved_bytes as usize) / std::mem::size_of::<u32>());

        // First pass: copy the survivors, leaving forwarding handles behind.
        for index in 0..self.clauses.len() {
            let reference = self.clauses[index];
            if !self.arena.get_clause(reference).is_collectible() {
                let _ = self.arena.copy_record(reference);
            }
        }

        // The collected records vanish together with the old space.
        self.counters.collected += collected_bytes;
        medlar_check!(self.counters.garbage >= collected_bytes);
        self.counters.garbage -= collected_bytes;

        let old_words = self.arena.swap_spaces();
        let forwarding = ClauseForwarding::new(&old_words);

        // Second pass: rewrite the secondary references.
        flush_watches(&self.arena, &forwarding, watches);
        rewire_trail_reasons(assignments, &forwarding);
        let directory = std::mem::take(&mut self.clauses);
        self.clauses = directory
            .into_iter()
            .filter_map(|reference| forwarding.forward(reference))
            .collect();
        rewire(&forwarding);

        if self.opts.verbose {
            debug!(
                "collect {}: collected {} bytes {:.0}% of {} garbage clauses",
                self.counters.collections,
                collected_bytes,
                percent(collected_bytes, collected_bytes + moved_bytes),
                collected_clauses
            );
        }
    }

    /// The non-moving collector: drops the directory entries and watchers of
    /// collectible clauses without copying any record. Their bytes stay in
    /// the arena as dead space until the next moving collection.
    fn delete_garbage_clauses(
        &mut self,
        watches: &mut WatchLists,
        mut rewire: impl FnMut(&ClauseForwarding<'_>),
    ) {
        let mut collected_bytes: u64 = 0;
        let mut collected_clauses: u64 = 0;
        for &reference in &self.clauses {
            let clause = self.arena.get_clause(reference);
            if clause.is_collectible() {
                collected_bytes += clause.bytes() as u64;
                collected_clauses += 1;
            }
        }

        let forwarding = ClauseForwarding::new(self.arena.words());
        flush_watches(&self.arena, &forwarding, watches);
        let directory = std::mem::take(&mut self.clauses);
        self.clauses = directory
            .into_iter()
            .filter_map(|reference| forwarding.forward(reference))
            .collect();
        rewire(&forwarding);

        self.counters.collected += collected_bytes;
        medlar_check!(self.counters.garbage >= collected_bytes);
        self.counters.garbage -= collected_bytes;

        if self.opts.verbose {
            debug!(
                "collect {}: collected {} bytes of {} garbage clauses",
                self.counters.collections, collected_bytes, collected_clauses
            );
        }
    }
}

/// Rewrites the reason handle of every assignment on the trail through
/// forwarding. Root-level assignments never need their antecedent again, so
/// their reasons are dropped instead of forwarded.
fn rewire_trail_reasons(assignments: &mut Assignments, forwarding: &ClauseForwarding<'_>) {
    let variables: Vec<Variable> = assignments
        .trail()
        .iter()
        .map(|literal| literal.variable())
        .collect();
    for variable in variables {
        let Some(reason) = assignments.reason(variable) else {
            continue;
        };
        if assignments.level(variable) == 0 {
            assignments.set_reason(variable, None);
            continue;
        }
        let forwarded = forwarding.forward(reason);
        // Protected reasons are never collected.
        medlar_check!(forwarded.is_some());
        assignments.set_reason(variable, forwarded);
    }
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}
