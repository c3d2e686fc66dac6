//! Linear Intermediate Representation (LIR)
//!
//! LIR is the flat sequence of labels, branches, jumps and instructions
//! produced by linearization from the resolved program tree. Operands and
//! instruction bodies are still program tree expressions (`ExprId`s into the
//! owning [`tn_ast::Program`]); by the time LIR is rendered every name in
//! them is bound and every non-register declaration has a register.

use derive_more::From;
use indexmap::IndexMap;
use std::slice;
use tn_ast::ExprId;
use tn_intern::Symbol;

/// One element of the linear IR
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum Line {
    /// Jump target
    Label(Label),
    /// Conditional transfer
    Branch(Branch),
    /// Unconditional transfer
    Jump(Jump),
    /// Straight-line operation
    Instruction(Instruction),
}

/// Why a label exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelOrigin {
    /// Start of a new logical unit such as a function entry
    Entry,
    /// Any other jump target inside a unit
    Block,
}

/// A named position in the line sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Label text
    pub name: Symbol,
    /// Externally linkable
    pub public: bool,
    /// Entry or internal target
    pub origin: LabelOrigin,
}

impl Label {
    /// Entry label of a logical unit
    pub fn entry(name: Symbol, public: bool) -> Self {
        Self {
            name,
            public,
            origin: LabelOrigin::Entry,
        }
    }

    /// Internal jump target
    pub fn block(name: Symbol) -> Self {
        Self {
            name,
            public: false,
            origin: LabelOrigin::Block,
        }
    }

    /// Whether this label starts a logical unit
    pub fn is_entry(&self) -> bool {
        self.origin == LabelOrigin::Entry
    }
}

/// Conditional branch to `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Taken when this evaluates to true
    pub condition: ExprId,
    /// Label to branch to
    pub target: Symbol,
}

/// Unconditional jump to `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jump {
    /// Label to jump to
    pub target: Symbol,
}

/// A non-control-flow line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `target := value`
    Assign {
        /// Destination operand
        target: ExprId,
        /// Source expression
        value: ExprId,
    },
    /// A call evaluated for its effect; the expression is expected to be a
    /// call expression
    Call(ExprId),
}

/// An ordered line sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lir {
    /// Lines in execution order
    pub lines: Vec<Line>,
}

impl Lir {
    /// An empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line
    pub fn push(&mut self, line: impl Into<Line>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether there are no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Position of every label, in order of first appearance
    pub fn label_positions(&self) -> IndexMap<Symbol, usize> {
        let mut positions = IndexMap::new();
        for (idx, line) in self.lines.iter().enumerate() {
            if let Line::Label(label) = line {
                positions.entry(label.name).or_insert(idx);
            }
        }
        positions
    }

    /// Branch and jump targets with no matching label, in order of use
    pub fn undefined_targets(&self) -> Vec<Symbol> {
        let labels = self.label_positions();
        let mut missing = Vec::new();
        for line in &self.lines {
            let target = match line {
                Line::Branch(branch) => branch.target,
                Line::Jump(jump) => jump.target,
                Line::Label(_) | Line::Instruction(_) => continue,
            };
            if !labels.contains_key(&target) && !missing.contains(&target) {
                missing.push(target);
            }
        }
        missing
    }
}

impl From<Vec<Line>> for Lir {
    fn from(lines: Vec<Line>) -> Self {
        Self { lines }
    }
}

impl<'a> IntoIterator for &'a Lir {
    type Item = &'a Line;
    type IntoIter = slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tn_intern::Interner;

    #[test]
    fn test_undefined_targets() {
        let interner = Interner::new();
        let main = interner.intern("main");
        let done = interner.intern("done");
        let missing = interner.intern("missing");

        let mut lir = Lir::new();
        lir.push(Label::entry(main, true))
            .push(Jump { target: done })
            .push(Jump { target: missing })
            .push(Jump { target: missing })
            .push(Label::block(done));

        assert_eq!(lir.len(), 5);
        assert_eq!(lir.label_positions().get(&done), Some(&4));
        assert_eq!(lir.undefined_targets(), vec![missing]);
    }
}
