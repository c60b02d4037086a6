use crate::basic_types::ClauseRef;
use crate::basic_types::Literal;
use crate::basic_types::Variable;
use crate::medlar_check;
use crate::medlar_debug_check;

/// The truth value, decision level, and antecedent of a single variable.
#[derive(Default, Clone, Copy, Debug)]
struct VariableAssignment {
    /// The assigned polarity, `None` while unassigned.
    value: Option<bool>,
    /// The decision level of the assignment.
    level: u32,
    /// The clause which forced the assignment, `None` for decisions and
    /// units.
    reason: Option<ClauseRef>,
}

/// The assignment state the clause database consumes: the trail of assigned
/// literals and, per variable, its value, decision level, and reason clause.
///
/// The search loop owns the assignment decisions; the database walks the
/// trail to protect reason clauses and to rewrite reason handles after a
/// collection, and reads root-level values for the satisfied-clause sweep.
#[derive(Default, Debug)]
pub struct Assignments {
    /// One slot per variable index; slot 0 is unused.
    assignment: Vec<VariableAssignment>,
    /// The assigned literals in assignment order.
    trail: Vec<Literal>,
    /// The trail length at which each nonzero decision level started.
    control: Vec<usize>,
    num_fixed: u64,
}

impl Assignments {
    pub fn decision_level(&self) -> usize {
        self.control.len()
    }

    pub fn increase_decision_level(&mut self) {
        self.control.push(self.trail.len());
    }

    /// Assigns a root-level unit.
    pub fn assign_unit(&mut self, literal: Literal) {
        medlar_check!(self.decision_level() == 0);
        self.assign(literal, None);
    }

    /// Assigns a decision literal at the current (nonzero) decision level.
    pub fn assign_decision(&mut self, literal: Literal) {
        medlar_check!(self.decision_level() > 0);
        self.assign(literal, None);
    }

    /// Assigns a literal forced by `reason`.
    pub fn assign_propagated(&mut self, literal: Literal, reason: ClauseRef) {
        self.assign(literal, Some(reason));
    }

    fn assign(&mut self, literal: Literal, reason: Option<ClauseRef>) {
        let slot = literal.variable().index() as usize;
        if slot >= self.assignment.len() {
            self.assignment
                .resize(slot + 1, VariableAssignment::default());
        }
        medlar_check!(self.assignment[slot].value.is_none());

        let level = self.decision_level() as u32;
        self.assignment[slot] = VariableAssignment {
            value: Some(literal.is_positive()),
            level,
            reason,
        };
        self.trail.push(literal);
        if level == 0 {
            self.num_fixed += 1;
        }
    }

    /// Undoes all assignments beyond `level`.
    pub fn backtrack_to(&mut self, level: usize) {
        medlar_check!(level < self.decision_level());
        let new_trail_len = self.control[level];
        for literal in self.trail.drain(new_trail_len..) {
            self.assignment[literal.variable().index() as usize] = VariableAssignment::default();
        }
        self.control.truncate(level);
    }

    fn slot(&self, variable: Variable) -> Option<&VariableAssignment> {
        self.assignment.get(variable.index() as usize)
    }

    /// The truth value of `literal` under the current assignment, `None` if
    /// its variable is unassigned.
    pub fn value(&self, literal: Literal) -> Option<bool> {
        self.slot(literal.variable())
            .and_then(|assignment| assignment.value)
            .map(|value| value == literal.is_positive())
    }

    /// As [`Assignments::value`], but restricted to the root-level value of
    /// `literal`: `None` unless its variable was assigned at level zero.
    pub fn fixed(&self, literal: Literal) -> Option<bool> {
        let assignment = self.slot(literal.variable())?;
        if assignment.level != 0 {
            return None;
        }
        assignment
            .value
            .map(|value| value == literal.is_positive())
    }

    /// The decision level at which `variable` was assigned.
    pub fn level(&self, variable: Variable) -> u32 {
        medlar_debug_check!(self.assignment[variable.index() as usize].value.is_some());
        self.assignment[variable.index() as usize].level
    }

    /// The clause which forced the assignment of `variable`, if any.
    pub fn reason(&self, variable: Variable) -> Option<ClauseRef> {
        self.slot(variable).and_then(|assignment| assignment.reason)
    }

    pub(crate) fn set_reason(&mut self, variable: Variable, reason: Option<ClauseRef>) {
        self.assignment[variable.index() as usize].reason = reason;
    }

    /// The assigned literals in assignment order.
    pub fn trail(&self) -> &[Literal] {
        &self.trail
    }

    /// The number of root-level assignments made so far.
    pub fn num_fixed(&self) -> u64 {
        self.num_fixed
    }
}
