use log::debug;

use crate::basic_types::ClauseRef;
use crate::engine::Assignments;
use crate::engine::ClauseDatabase;
use crate::engine::WatchLists;
use crate::medlar_check;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::StatisticLogger;

/// The reduction policy: deciding when to reduce and which redundant clauses
/// are useless enough to collect.
impl ClauseDatabase {
    /// Returns true iff reduction is enabled and the conflict count reached
    /// the reduction limit.
    pub fn reducing(&self) -> bool {
        if !self.opts.reduce {
            return false;
        }
        self.counters.conflicts >= self.lim.reduce
    }

    /// Sets the `reason` flag of every clause which is the antecedent of an
    /// assignment on a nonzero decision level.
    ///
    /// Reduction does not backtrack, so reason clauses of current assignments
    /// must be preserved across the collection. Collections triggered by a
    /// preprocessor run at the root level where no reasons exist, which makes
    /// the same collection code correct in both settings.
    pub fn protect_reasons(&mut self, assignments: &Assignments) {
        for &literal in assignments.trail() {
            let variable = literal.variable();
            if assignments.level(variable) == 0 {
                continue;
            }
            let Some(reason) = assignments.reason(variable) else {
                continue;
            };
            self.arena.get_mutable_clause(reason).mark_reason();
        }
    }

    /// The exact inverse of [`ClauseDatabase::protect_reasons`].
    pub fn unprotect_reasons(&mut self, assignments: &Assignments) {
        for &literal in assignments.trail() {
            let variable = literal.variable();
            if assignments.level(variable) == 0 {
                continue;
            }
            let Some(reason) = assignments.reason(variable) else {
                continue;
            };
            let mut clause = self.arena.get_mutable_clause(reason);
            medlar_check!(clause.is_reason());
            clause.clear_reason();
        }
    }

    /// Marks the less useful half of the reduction candidates as garbage.
    ///
    /// Candidates are redundant, not blocked, not a protected reason, not
    /// already garbage, and carry an analyzed time stamp at or below the
    /// threshold recorded by the previous reduction. Clauses with smaller
    /// glue are considered more useful; the time stamp breaks ties, so more
    /// recently analyzed clauses are preferred to keep.
    pub fn mark_useless_redundant_clauses_as_garbage(&mut self) {
        let mut stack: Vec<ClauseRef> = Vec::with_capacity(self.counters.redundant as usize);
        for &reference in &self.clauses {
            let clause = self.arena.get_clause(reference);
            if !clause.is_redundant() {
                continue; // keep irredundant
            }
            if clause.blocked().is_some() {
                continue; // keep blocked clauses
            }
            if clause.is_reason() {
                continue; // need to keep reasons
            }
            if clause.is_garbage() {
                continue; // already marked
            }
            if !clause.has_analyzed() {
                continue;
            }
            if clause.analyzed() > self.lim.analyzed {
                continue;
            }
            stack.push(reference);
        }

        // Stable sorts keep the marking deterministic when both keys tie.
        let arena = &self.arena;
        if self.opts.reduce_glue {
            stack.sort_by(|&left, &right| {
                let left = arena.get_clause(left);
                let right = arena.get_clause(right);
                right
                    .glue()
                    .cmp(&left.glue())
                    .then_with(|| left.analyzed().cmp(&right.analyzed()))
            });
        } else {
            stack.sort_by_key(|&reference| arena.get_clause(reference).analyzed());
        }

        // The front of the stack is now the least useful clause.
        let target = stack.len() / 2;
        for &reference in &stack[..target] {
            self.mark_garbage(reference);
            self.counters.reduced += 1;
        }

        self.lim.keptsize = 0;
        self.lim.keptglue = 0;
        for &reference in &stack[target..] {
            let clause = self.arena.get_clause(reference);
            self.lim.keptsize = self.lim.keptsize.max(clause.size());
            self.lim.keptglue = self.lim.keptglue.max(clause.glue());
        }
        if self.opts.verbose {
            debug!(
                "reduce {}: maximum kept size {} glue {}",
                self.counters.reductions, self.lim.keptsize, self.lim.keptglue
            );
        }
    }

    /// Performs one reduction cycle: protect reasons, mark root-satisfied
    /// and useless clauses as garbage, collect, unprotect, and push the
    /// trigger out.
    ///
    /// This is the compaction barrier of the database: every clause handle
    /// held by a collaborator is rewritten (or invalidated) here.
    pub fn reduce(&mut self, assignments: &mut Assignments, watches: &mut WatchLists) {
        self.counters.reductions += 1;
        debug!(
            "reduce {}: reducing clause database after {} conflicts",
            self.counters.reductions, self.counters.conflicts
        );

        self.protect_reasons(assignments);
        self.mark_satisfied_clauses_as_garbage(assignments);
        self.mark_useless_redundant_clauses_as_garbage();
        self.garbage_collection(assignments, watches);
        self.unprotect_reasons(assignments);

        // The additive increment shrinks towards one, so reductions become
        // more frequent relative to the conflict rate over time.
        self.inc.reduce += self.inc.redinc;
        if self.inc.redinc > 1 {
            self.inc.redinc -= 1;
        }
        self.lim.reduce = self.counters.conflicts + self.inc.reduce;
        self.lim.analyzed = self.counters.analyzed;
        self.lim.conflicts_at_last_reduce = self.counters.conflicts;

        debug!(
            "reduce {}: next reduction at {} conflicts",
            self.counters.reductions, self.lim.reduce
        );
        if should_log_statistics() {
            self.counters.log_statistics(&StatisticLogger::default());
            log_statistic_postfix();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Literal;

    fn clause_of_size(size: u32) -> Vec<Literal> {
        (1..=size as i32).map(Literal::new).collect()
    }

    /// Builds a database holding one redundant extended clause per
    /// `(size, glue, analyzed)` triple, with the analyzed threshold set so
    /// that every clause is a reduction candidate.
    fn database_with_candidates(candidates: &[(u32, u32, u64)]) -> (ClauseDatabase, Vec<ClauseRef>) {
        let mut database = ClauseDatabase::default();
        let references: Vec<ClauseRef> = candidates
            .iter()
            .map(|&(size, glue, analyzed)| {
                let reference = database.new_clause(&clause_of_size(size), true, glue);
                database.get_mutable_clause(reference).set_analyzed(analyzed);
                reference
            })
            .collect();
        let highest = candidates.iter().map(|&(_, _, a)| a).max().unwrap_or(0);
        database.counters.analyzed = highest;
        database.lim.analyzed = highest;
        (database, references)
    }

    fn garbage_flags(database: &ClauseDatabase, references: &[ClauseRef]) -> Vec<bool> {
        references
            .iter()
            .map(|&reference| database.get_clause(reference).is_garbage())
            .collect()
    }

    #[test]
    fn glue_orders_the_candidates_with_the_time_stamp_as_tie_break() {
        let (mut database, references) = database_with_candidates(&[
            (4, 3, 10),
            (6, 5, 20),
            (6, 5, 5),
            (9, 8, 30),
            (3, 2, 40),
        ]);
        database.opts.reduce_glue = true;

        database.mark_useless_redundant_clauses_as_garbage();

        // Least useful first: (8,30), (5,5), (5,20), (3,10), (2,40); the
        // front half of size 5/2 = 2 is marked.
        assert_eq!(
            garbage_flags(&database, &references),
            vec![false, false, true, true, false]
        );
        assert_eq!(database.counters().reduced, 2);
        assert_eq!(database.limits().keptglue, 5);
        assert_eq!(database.limits().keptsize, 6);
    }

    #[test]
    fn without_glue_ordering_only_the_time_stamp_counts() {
        let (mut database, references) = database_with_candidates(&[
            (4, 3, 10),
            (6, 5, 20),
            (6, 5, 5),
            (9, 8, 30),
            (3, 2, 40),
        ]);
        database.opts.reduce_glue = false;

        database.mark_useless_redundant_clauses_as_garbage();

        // By time stamp: (5,5), (3,10), (5,20), (8,30), (2,40); the first
        // two are marked.
        assert_eq!(
            garbage_flags(&database, &references),
            vec![true, false, true, false, false]
        );
        assert_eq!(database.limits().keptglue, 8);
        assert_eq!(database.limits().keptsize, 9);
    }

    #[test]
    fn an_empty_candidate_set_marks_nothing() {
        let mut database = ClauseDatabase::default();
        let original = database.new_clause(&clause_of_size(3), false, 0);

        database.mark_useless_redundant_clauses_as_garbage();

        assert!(!database.get_clause(original).is_garbage());
        assert_eq!(database.counters().reduced, 0);
        assert_eq!(database.limits().keptsize, 0);
        assert_eq!(database.limits().keptglue, 0);
    }

    #[test]
    fn reasons_blocked_and_recently_analyzed_clauses_are_not_candidates() {
        let (mut database, references) = database_with_candidates(&[
            (4, 4, 1),
            (4, 4, 2),
            (4, 4, 3),
            (4, 4, 4),
        ]);
        // A protected reason, a blocked clause, and a clause analyzed after
        // the threshold; only references[3] remains a candidate.
        database.get_mutable_clause(references[0]).mark_reason();
        database
            .get_mutable_clause(references[1])
            .set_blocked(Literal::new(1));
        database
            .get_mutable_clause(references[2])
            .set_analyzed(5);

        database.mark_useless_redundant_clauses_as_garbage();

        // A single candidate: 1/2 = 0 clauses are marked.
        assert_eq!(
            garbage_flags(&database, &references),
            vec![false, false, false, false]
        );
    }

    #[test]
    fn the_trigger_fires_once_the_conflicts_reach_the_limit() {
        let mut database = ClauseDatabase::default();
        database.lim.reduce = 300;

        database.counters.conflicts = 299;
        assert!(!database.reducing());
        database.counters.conflicts = 300;
        assert!(database.reducing());

        database.opts.reduce = false;
        assert!(!database.reducing());
    }

    #[test]
    fn reducing_updates_the_trigger_and_shrinks_the_increment() {
        let mut database = ClauseDatabase::default();
        let mut assignments = Assignments::default();
        let mut watches = WatchLists::default();
        database.inc.reduce = 300;
        database.inc.redinc = 4;
        database.counters.conflicts = 1000;

        database.reduce(&mut assignments, &mut watches);

        assert_eq!(database.increments().reduce, 304);
        assert_eq!(database.increments().redinc, 3);
        assert_eq!(database.limits().reduce, 1000 + 304);
        assert_eq!(database.limits().analyzed, database.counters().analyzed);
        assert_eq!(database.limits().conflicts_at_last_reduce, 1000);
        assert_eq!(database.counters().reductions, 1);
    }

    #[test]
    fn without_new_conflicts_the_trigger_does_not_refire() {
        let mut database = ClauseDatabase::default();
        let mut assignments = Assignments::default();
        let mut watches = WatchLists::default();
        database.counters.conflicts = database.lim.reduce;
        assert!(database.reducing());

        database.reduce(&mut assignments, &mut watches);

        // The limit moved past the current conflict count.
        assert!(!database.reducing());
    }

    #[test]
    fn the_increment_never_shrinks_below_one() {
        let mut database = ClauseDatabase::default();
        let mut assignments = Assignments::default();
        let mut watches = WatchLists::default();
        database.inc.redinc = 1;

        database.reduce(&mut assignments, &mut watches);
        assert_eq!(database.increments().redinc, 1);
    }

    #[test]
    fn protecting_and_unprotecting_reasons_restores_the_flags() {
        let mut database = ClauseDatabase::default();
        let mut assignments = Assignments::default();

        let reason = database.new_clause(&clause_of_size(3), true, 2);
        let unrelated = database.new_clause(&clause_of_size(4), true, 2);

        assignments.assign_unit(Literal::new(5));
        assignments.increase_decision_level();
        assignments.assign_decision(Literal::new(-6));
        assignments.assign_propagated(Literal::new(1), reason);

        database.protect_reasons(&assignments);
        assert!(database.get_clause(reason).is_reason());
        assert!(!database.get_clause(unrelated).is_reason());

        database.unprotect_reasons(&assignments);
        assert!(!database.get_clause(reason).is_reason());
        assert!(!database.get_clause(unrelated).is_reason());
    }

    #[test]
    fn root_level_reasons_are_not_protected() {
        let mut database = ClauseDatabase::default();
        let mut assignments = Assignments::default();

        let reason = database.new_clause(&clause_of_size(2), true, 1);
        // A root-level propagation; its antecedent needs no protection.
        assignments.assign_propagated(Literal::new(1), reason);

        database.protect_reasons(&assignments);
        assert!(!database.get_clause(reason).is_reason());
    }

    #[test]
    fn a_full_reduction_collects_the_marked_half() {
        let (mut database, references) = database_with_candidates(&[
            (4, 3, 10),
            (6, 5, 20),
            (6, 5, 5),
            (9, 8, 30),
            (3, 2, 40),
        ]);
        let mut assignments = Assignments::default();
        let mut watches = WatchLists::default();
        for &reference in &references {
            watches.watch_clause(database.arena(), reference);
        }
        database.counters.conflicts = 500;
        database.opts.verbose = true;

        database.reduce(&mut assignments, &mut watches);

        // The two useless clauses are gone, the rest were compacted.
        assert_eq!(database.num_clauses(), 3);
        for reference in database.clauses().collect::<Vec<_>>() {
            let clause = database.get_clause(reference);
            assert!(!clause.is_garbage());
            assert!(!clause.is_moved());
        }
        let sizes: Vec<u32> = database
            .clauses()
            .map(|reference| database.get_clause(reference).size())
            .collect();
        assert_eq!(sizes, vec![4, 6, 3]);

        // Variable 1 occurs in every clause; only the survivors remain
        // watched.
        assert_eq!(watches.watchers(Literal::new(1)).len(), 3);
    }
}
