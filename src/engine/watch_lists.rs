use crate::basic_types::ClauseRef;
use crate::basic_types::Literal;
use crate::engine::clause_db::ClauseArena;

/// A single watcher entry: the watched clause together with a blocking
/// literal and the clause size at the time of watching.
///
/// The blocking literal lets propagation skip the clause without touching its
/// record when the blocking literal is already true; the cached size lets the
/// collector detect clauses shrunk since being watched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Watcher {
    pub blocking: Literal,
    pub clause: ClauseRef,
    pub size: u32,
}

/// Watcher lists for all literals, stored at [`Literal::table_index`]
/// positions so both polarities of a variable sit next to each other.
///
/// The lists hold non-owning clause handles; after a garbage collection the
/// collector rewrites them through forwarding before they are used again.
#[derive(Default, Debug)]
pub struct WatchLists {
    lists: Vec<Vec<Watcher>>,
}

impl WatchLists {
    /// Watch `literal` in `clause` with blocking literal `blocking`.
    pub fn watch_literal(
        &mut self,
        literal: Literal,
        blocking: Literal,
        clause: ClauseRef,
        size: u32,
    ) {
        let slot = literal.table_index();
        if slot >= self.lists.len() {
            self.lists.resize_with(slot + 1, Vec::new);
        }
        self.lists[slot].push(Watcher {
            blocking,
            clause,
            size,
        });
    }

    /// Install watchers on the first two literals of `reference`, each with
    /// the other watched literal as blocking literal.
    pub fn watch_clause(&mut self, arena: &ClauseArena, reference: ClauseRef) {
        let clause = arena.get_clause(reference);
        let size = clause.size();
        let first = clause.literal(0);
        let second = clause.literal(1);
        self.watch_literal(first, second, reference, size);
        self.watch_literal(second, first, reference, size);
    }

    /// The watchers of `literal`.
    pub fn watchers(&self, literal: Literal) -> &[Watcher] {
        self.lists
            .get(literal.table_index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Visits every watcher in every list; watchers for which `keep` returns
    /// false are dropped, the rest may be updated in place.
    pub(crate) fn flush(&mut self, mut keep: impl FnMut(Literal, &mut Watcher) -> bool) {
        // The first two slots belong to the nonexistent variable 0.
        for slot in 2..self.lists.len() {
            let literal = Self::literal_at(slot);
            self.lists[slot].retain_mut(|watcher| keep(literal, watcher));
        }
    }

    /// The literal whose watchers live at table position `slot`; the inverse
    /// of [`Literal::table_index`].
    fn literal_at(slot: usize) -> Literal {
        let variable = (slot / 2) as i32;
        if slot % 2 == 0 {
            Literal::new(variable)
        } else {
            Literal::new(-variable)
        }
    }
}
