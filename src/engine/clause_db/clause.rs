use bitfield_struct::bitfield;

use crate::basic_types::ClauseRef;
use crate::basic_types::Literal;
use crate::medlar_check;
use crate::medlar_debug_check;

/// Number of bits of the glue field in the clause header word.
pub(crate) const LD_MAX_GLUE: u32 = 25;

/// Upper bound for the glue of a clause; larger values are capped on write.
pub const MAX_GLUE: u32 = (1 << (LD_MAX_GLUE - 1)) - 1;

// A clause record is a sequence of `u32` words at fixed offsets from the
// nominal address the handle points at:
//
//   +0  analyzed (low word)     only if `has_analyzed`
//   +1  analyzed (high word)    only if `has_analyzed`
//   +2  pos                     only if `has_pos`
//   +3  header (have bits, flags, glue)
//   +4  blocked literal (0 = none)
//   +5  size
//   +6  literals[0] .. literals[size - 1]
//
// Absent tail fields are elided by starting the allocation at the header
// word, so the words before `start()` of a non-extended clause belong to the
// previous allocation and must never be touched. The header is always the
// first word that exists. Once `moved` is set the literal area is repurposed:
// word +6 holds the forwarding handle and the literals are unreadable.
pub(crate) const ANALYZED_LOW_WORD: u32 = 0;
pub(crate) const ANALYZED_HIGH_WORD: u32 = 1;
pub(crate) const POS_WORD: u32 = 2;
pub(crate) const HEADER_WORD: u32 = 3;
pub(crate) const BLOCKED_WORD: u32 = 4;
pub(crate) const SIZE_WORD: u32 = 5;
pub(crate) const LITERALS_WORD: u32 = 6;

/// The packed header word of a clause: the presence bits of the optional
/// tail fields, the four state flags, and the glue.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub(crate) struct ClauseHeader {
    pub(crate) has_analyzed: bool,
    pub(crate) has_pos: bool,
    pub(crate) redundant: bool,
    pub(crate) garbage: bool,
    pub(crate) reason: bool,
    pub(crate) moved: bool,
    #[bits(25)]
    pub(crate) glue: u32,
    #[bits(1)]
    __: u32,
}

/// The number of words elided from the front of a record because its tail
/// fields are absent.
pub(crate) fn elided_words(header: ClauseHeader) -> u32 {
    let mut elided = 0;
    if !header.has_analyzed() {
        elided += 2;
    }
    if !header.has_pos() {
        elided += 1;
    }
    elided
}

/// A read-only view of a clause record.
#[derive(Clone, Copy)]
pub struct Clause<'a> {
    words: &'a [u32],
    offset: usize,
}

impl<'a> Clause<'a> {
    pub(crate) fn new(words: &'a [u32], reference: ClauseRef) -> Clause<'a> {
        Clause {
            words,
            offset: reference.code() as usize,
        }
    }

    fn word(&self, index: u32) -> u32 {
        self.words[self.offset + index as usize]
    }

    pub(crate) fn header(&self) -> ClauseHeader {
        ClauseHeader::from(self.word(HEADER_WORD))
    }

    /// The number of embedded literals, always at least 2.
    pub fn size(&self) -> u32 {
        self.word(SIZE_WORD)
    }

    pub fn glue(&self) -> u32 {
        self.header().glue()
    }

    /// True iff the clause is learned rather than part of the input formula.
    pub fn is_redundant(&self) -> bool {
        self.header().redundant()
    }

    /// True iff the clause is scheduled for collection.
    pub fn is_garbage(&self) -> bool {
        self.header().garbage()
    }

    /// True iff the clause is currently protected as the antecedent of an
    /// assignment on a nonzero decision level.
    pub fn is_reason(&self) -> bool {
        self.header().reason()
    }

    /// True iff the record has been copied to the new arena by the moving
    /// collector; only [`Clause::forward`] may be read then.
    pub fn is_moved(&self) -> bool {
        self.header().moved()
    }

    pub fn has_pos(&self) -> bool {
        self.header().has_pos()
    }

    pub fn has_analyzed(&self) -> bool {
        self.header().has_analyzed()
    }

    /// Whether this clause is ready to be collected. The `reason` flag is
    /// only there for protecting reason clauses in a reduction, which does
    /// not backtrack to the root level. A collection triggered from a
    /// preprocessor backtracks to the root level first, so `reason` is false
    /// there and the same predicate is correct for both situations.
    pub fn is_collectible(&self) -> bool {
        let header = self.header();
        header.garbage() && !header.reason()
    }

    /// The blocking literal cached by the propagator, if any.
    pub fn blocked(&self) -> Option<Literal> {
        let code = self.word(BLOCKED_WORD) as i32;
        (code != 0).then(|| Literal::from_code(code))
    }

    pub fn literal(&self, index: u32) -> Literal {
        medlar_debug_check!(!self.is_moved());
        medlar_debug_check!(index < self.size());
        Literal::from_code(self.word(LITERALS_WORD + index) as i32)
    }

    pub fn literals(&self) -> impl Iterator<Item = Literal> + 'a {
        let this = *self;
        (0..this.size()).map(move |index| this.literal(index))
    }

    /// Cached position of the last watch replacement, at least 2. Requires
    /// the `pos` tail field to be present.
    pub fn pos(&self) -> u32 {
        medlar_debug_check!(self.has_pos());
        self.word(POS_WORD)
    }

    /// Time stamp of the most recent conflict analysis touching this clause.
    /// Requires the `analyzed` tail field to be present.
    pub fn analyzed(&self) -> u64 {
        medlar_debug_check!(self.has_analyzed());
        (self.word(ANALYZED_LOW_WORD) as u64) | ((self.word(ANALYZED_HIGH_WORD) as u64) << 32)
    }

    /// The handle of the clause's copy in the new arena; only valid once the
    /// clause is moved.
    pub fn forward(&self) -> ClauseRef {
        medlar_debug_check!(self.is_moved());
        ClauseRef::new(self.word(LITERALS_WORD))
    }

    /// The word offset of the actual allocation start, which lies past the
    /// nominal address by the size of the absent tail fields.
    pub fn start(&self) -> u32 {
        self.offset as u32 + elided_words(self.header())
    }

    /// The exact footprint of the record in bytes.
    pub fn bytes(&self) -> usize {
        let words = LITERALS_WORD + self.size() - elided_words(self.header());
        words as usize * std::mem::size_of::<u32>()
    }

    /// The word offset one past the end of the record.
    pub(crate) fn end(&self) -> u32 {
        self.offset as u32 + LITERALS_WORD + self.size()
    }
}

/// A mutable view of a clause record.
pub struct ClauseMut<'a> {
    words: &'a mut [u32],
    offset: usize,
}

impl<'a> ClauseMut<'a> {
    pub(crate) fn new(words: &'a mut [u32], reference: ClauseRef) -> ClauseMut<'a> {
        ClauseMut {
            words,
            offset: reference.code() as usize,
        }
    }

    pub fn as_clause(&self) -> Clause<'_> {
        Clause {
            words: self.words,
            offset: self.offset,
        }
    }

    fn word(&self, index: u32) -> u32 {
        self.words[self.offset + index as usize]
    }

    fn set_word(&mut self, index: u32, value: u32) {
        self.words[self.offset + index as usize] = value;
    }

    fn update_header(&mut self, update: impl FnOnce(ClauseHeader) -> ClauseHeader) {
        let header = ClauseHeader::from(self.word(HEADER_WORD));
        self.set_word(HEADER_WORD, u32::from(update(header)));
    }

    pub fn size(&self) -> u32 {
        self.as_clause().size()
    }

    pub fn glue(&self) -> u32 {
        self.as_clause().glue()
    }

    pub fn has_pos(&self) -> bool {
        self.as_clause().has_pos()
    }

    pub fn has_analyzed(&self) -> bool {
        self.as_clause().has_analyzed()
    }

    pub fn is_moved(&self) -> bool {
        self.as_clause().is_moved()
    }

    pub fn is_reason(&self) -> bool {
        self.as_clause().is_reason()
    }

    pub fn pos(&self) -> u32 {
        self.as_clause().pos()
    }

    pub fn literal(&self, index: u32) -> Literal {
        self.as_clause().literal(index)
    }

    pub fn set_glue(&mut self, glue: u32) {
        medlar_check!(glue <= MAX_GLUE);
        self.update_header(|header| header.with_glue(glue));
    }

    pub fn set_blocked(&mut self, blocking: Literal) {
        self.set_word(BLOCKED_WORD, blocking.code() as u32);
    }

    pub fn clear_blocked(&mut self) {
        self.set_word(BLOCKED_WORD, 0);
    }

    pub fn set_pos(&mut self, pos: u32) {
        medlar_debug_check!(self.has_pos());
        medlar_check!(pos >= 2);
        self.set_word(POS_WORD, pos);
    }

    pub fn set_analyzed(&mut self, stamp: u64) {
        medlar_debug_check!(self.has_analyzed());
        self.set_word(ANALYZED_LOW_WORD, stamp as u32);
        self.set_word(ANALYZED_HIGH_WORD, (stamp >> 32) as u32);
    }

    pub fn set_literal(&mut self, index: u32, literal: Literal) {
        medlar_debug_check!(!self.is_moved());
        medlar_debug_check!(index < self.size());
        self.set_word(LITERALS_WORD + index, literal.code() as u32);
    }

    pub(crate) fn mark_reason(&mut self) {
        self.update_header(|header| header.with_reason(true));
    }

    pub(crate) fn clear_reason(&mut self) {
        self.update_header(|header| header.with_reason(false));
    }

    pub(crate) fn set_garbage(&mut self) {
        self.update_header(|header| header.with_garbage(true));
    }

    pub(crate) fn mark_moved(&mut self, forward: ClauseRef) {
        medlar_check!(!self.is_moved());
        self.update_header(|header| header.with_moved(true));
        self.set_word(LITERALS_WORD, forward.code());
    }

    /// Shrinks the clause to `size` literals. The trailing literal slots
    /// become padding of the allocation; they are reclaimed by the next
    /// moving collection.
    pub(crate) fn set_size(&mut self, size: u32) {
        medlar_check!(size >= 2);
        medlar_check!(size <= self.size());
        self.set_word(SIZE_WORD, size);
    }

    /// Repairs the `pos` and `glue` invariants after the clause shrank.
    pub fn update_after_shrinking(&mut self) {
        medlar_check!(self.size() >= 2);
        let size = self.size();
        if self.has_pos() && self.pos() >= size {
            self.set_pos(2);
        }
        if self.glue() > size {
            self.set_glue(size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clause_db::ClauseArena;

    fn fill(arena: &mut ClauseArena, reference: ClauseRef, literals: &[i32]) {
        let mut clause = arena.get_mutable_clause(reference);
        for (index, &code) in literals.iter().enumerate() {
            clause.set_literal(index as u32, Literal::new(code));
        }
    }

    #[test]
    fn shrinking_clamps_glue_and_resets_the_watch_position() {
        let mut arena = ClauseArena::default();
        let reference = arena.allocate(3, true, true);
        fill(&mut arena, reference, &[1, -2, 3]);

        let mut clause = arena.get_mutable_clause(reference);
        clause.set_glue(7);
        clause.set_pos(2);
        clause.set_analyzed(100);

        clause.set_size(2);
        clause.update_after_shrinking();

        let clause = arena.get_clause(reference);
        assert_eq!(clause.size(), 2);
        assert_eq!(clause.glue(), 2);
        assert_eq!(clause.pos(), 2);
        assert_eq!(clause.analyzed(), 100);
    }

    #[test]
    fn shrinking_resets_an_out_of_range_watch_position() {
        let mut arena = ClauseArena::default();
        let reference = arena.allocate(5, true, true);
        fill(&mut arena, reference, &[1, -2, 3, -4, 5]);

        let mut clause = arena.get_mutable_clause(reference);
        clause.set_glue(2);
        clause.set_pos(4);

        clause.set_size(3);
        clause.update_after_shrinking();

        let clause = arena.get_clause(reference);
        assert_eq!(clause.pos(), 2);
        assert_eq!(clause.glue(), 2);
    }

    #[test]
    fn a_watch_position_below_the_new_size_survives_shrinking() {
        let mut arena = ClauseArena::default();
        let reference = arena.allocate(5, true, true);
        fill(&mut arena, reference, &[1, -2, 3, -4, 5]);

        let mut clause = arena.get_mutable_clause(reference);
        clause.set_glue(2);
        clause.set_pos(3);

        clause.set_size(4);
        clause.update_after_shrinking();

        assert_eq!(arena.get_clause(reference).pos(), 3);
    }

    #[test]
    fn the_blocking_literal_defaults_to_none() {
        let mut arena = ClauseArena::default();
        let reference = arena.allocate(2, false, false);
        fill(&mut arena, reference, &[1, 2]);

        assert_eq!(arena.get_clause(reference).blocked(), None);

        arena
            .get_mutable_clause(reference)
            .set_blocked(Literal::new(-5));
        assert_eq!(
            arena.get_clause(reference).blocked(),
            Some(Literal::new(-5))
        );

        arena.get_mutable_clause(reference).clear_blocked();
        assert_eq!(arena.get_clause(reference).blocked(), None);
    }

    #[test]
    fn a_moved_record_exposes_its_forwarding_handle() {
        let mut arena = ClauseArena::default();
        let reference = arena.allocate(2, true, true);
        fill(&mut arena, reference, &[1, 2]);

        let target = ClauseRef::new(77);
        arena.get_mutable_clause(reference).mark_moved(target);

        let clause = arena.get_clause(reference);
        assert!(clause.is_moved());
        assert_eq!(clause.forward(), target);
    }

    #[test]
    #[should_panic]
    fn reading_literals_of_a_moved_record_is_a_contract_violation() {
        let mut arena = ClauseArena::default();
        let reference = arena.allocate(2, true, true);
        fill(&mut arena, reference, &[1, 2]);

        arena
            .get_mutable_clause(reference)
            .mark_moved(ClauseRef::new(77));
        let _ = arena.get_clause(reference).literal(0);
    }

    #[test]
    #[should_panic]
    fn a_glue_above_the_cap_is_a_contract_violation() {
        let mut arena = ClauseArena::default();
        let reference = arena.allocate(2, true, true);
        arena.get_mutable_clause(reference).set_glue(MAX_GLUE + 1);
    }
}
