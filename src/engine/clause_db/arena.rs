use crate::basic_types::ClauseRef;
use crate::engine::clause_db::clause::elided_words;
use crate::engine::clause_db::clause::ClauseHeader;
use crate::engine::clause_db::clause::HEADER_WORD;
use crate::engine::clause_db::clause::LITERALS_WORD;
use crate::engine::clause_db::clause::SIZE_WORD;
use crate::engine::clause_db::Clause;
use crate::engine::clause_db::ClauseMut;
use crate::medlar_check;
use crate::medlar_debug_check;

/// Guard words at the front of each space so that the nominal handle of a
/// record with elided tail fields never underflows the arena.
const GUARD_WORDS: usize = 3;

/// The arena owning the bytes of every clause.
///
/// Records are bump-allocated over `u32` words; handles are the word offsets
/// of the records' nominal addresses. During a moving collection the arena
/// holds a second "to" space which surviving clauses are copied into before
/// the spaces are swapped.
#[derive(Debug)]
pub struct ClauseArena {
    words: Vec<u32>,
    to_space: Vec<u32>,
}

impl Default for ClauseArena {
    fn default() -> Self {
        ClauseArena {
            words: vec![0; GUARD_WORDS],
            to_space: Vec::new(),
        }
    }
}

impl ClauseArena {
    /// Allocates a zero-initialised record with `size` literal slots.
    /// `extended` requests space for the `pos` and `analyzed` tail fields.
    ///
    /// The caller fills the literals, glue, and blocking literal before
    /// publishing the handle.
    pub fn allocate(&mut self, size: u32, redundant: bool, extended: bool) -> ClauseRef {
        let header = ClauseHeader::new()
            .with_has_analyzed(extended)
            .with_has_pos(extended)
            .with_redundant(redundant);
        self.allocate_with(size, header)
    }

    /// Allocates a record with the exact shape described by `header`.
    pub(crate) fn allocate_with(&mut self, size: u32, header: ClauseHeader) -> ClauseRef {
        medlar_check!(size >= 2);
        // A record with `analyzed` but without `pos` would leave a hole in
        // the fixed layout.
        medlar_check!(header.has_pos() || !header.has_analyzed());

        let elided = elided_words(header) as usize;
        let top = self.words.len();
        let total = LITERALS_WORD as usize + size as usize - elided;
        assert!(
            top + total <= u32::MAX as usize,
            "clause arena exhausted the handle space"
        );

        let reference = ClauseRef::new((top - elided) as u32);
        self.words.resize(top + total, 0);
        let base = reference.code() as usize;
        self.words[base + HEADER_WORD as usize] = u32::from(header);
        self.words[base + SIZE_WORD as usize] = size;
        reference
    }

    pub fn get_clause(&self, reference: ClauseRef) -> Clause<'_> {
        medlar_debug_check!(
            (reference.code() + HEADER_WORD) < self.words.len() as u32,
            "clause handle past the end of the arena"
        );
        Clause::new(&self.words, reference)
    }

    pub fn get_mutable_clause(&mut self, reference: ClauseRef) -> ClauseMut<'_> {
        medlar_debug_check!(
            (reference.code() + HEADER_WORD) < self.words.len() as u32,
            "clause handle past the end of the arena"
        );
        ClauseMut::new(&mut self.words, reference)
    }

    /// The bytes handed out by the allocator so far, including the padding of
    /// shrunken clauses which is reclaimed at the next moving collection.
    pub fn allocated_bytes(&self) -> usize {
        (self.words.len() - GUARD_WORDS) * std::mem::size_of::<u32>()
    }

    pub(crate) fn words(&self) -> &[u32] {
        &self.words
    }

    /// Prepares a to-space which can hold `words` words of surviving clauses.
    pub(crate) fn prepare_to_space(&mut self, words: usize) {
        self.to_space = Vec::with_capacity(GUARD_WORDS + words);
        self.to_space.resize(GUARD_WORDS, 0);
    }

    /// Copies a record into the to-space, marks the old record as moved, and
    /// stores the forwarding handle over its first literal slot.
    pub(crate) fn copy_record(&mut self, reference: ClauseRef) -> ClauseRef {
        let clause = self.get_clause(reference);
        medlar_check!(!clause.is_moved());
        let elided = elided_words(clause.header()) as usize;
        let start = clause.start() as usize;
        let end = clause.end() as usize;

        let top = self.to_space.len();
        let new_reference = ClauseRef::new((top - elided) as u32);
        self.to_space.extend_from_slice(&self.words[start..end]);

        self.get_mutable_clause(reference).mark_moved(new_reference);
        new_reference
    }

    /// Installs the to-space as the live space and hands the retired words
    /// back to the caller for the rewire pass.
    pub(crate) fn swap_spaces(&mut self) -> Vec<u32> {
        std::mem::replace(&mut self.words, std::mem::take(&mut self.to_space))
    }
}
