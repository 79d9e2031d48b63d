use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use num_bigint::BigInt;

use crate::memory::block::Handle;

/// Safety violations originating from the tracked allocator and the memory
/// checker. Distinct from assertion violations: these come from the memory
/// model, not from program logic.
#[derive(Clone, PartialEq, Eq)]
pub enum Violation {
    /// The resource model cannot satisfy the request. Non-fatal and
    /// path-local; the host may abandon the path.
    OutOfMemory { size: u32, align: u32 },
    /// Free of a handle never returned by `allocate`.
    InvalidFree(Handle),
    /// Second free of an already-freed block.
    DoubleFree(Handle),
    /// Dereference of a freed block.
    UseAfterFree(Handle),
    /// Dereference of a handle never returned by `allocate`.
    InvalidPointer(Handle),
}

impl Debug for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::OutOfMemory { size, align } => {
                write!(f, "out of memory: alloc({size}, align {align})")
            }
            Violation::InvalidFree(h) => write!(f, "invalid-free: {h:?}"),
            Violation::DoubleFree(h) => write!(f, "double-free: {h:?}"),
            Violation::UseAfterFree(h) => write!(f, "use-after-free: {h:?}"),
            Violation::InvalidPointer(h) => write!(f, "invalid pointer: {h:?}"),
        }
    }
}

#[derive(Clone, PartialEq)]
pub enum ModelValue {
    Bool(bool),
    Int(BigInt),
    /// Solver term the host cannot decode further, rendered verbatim.
    Term(String),
}

impl Debug for ModelValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelValue::Bool(b) => write!(f, "{b}"),
            ModelValue::Int(i) => write!(f, "{i}"),
            ModelValue::Term(s) => write!(f, "{s}"),
        }
    }
}

/// One concrete assignment per symbolic variable involved in a violated
/// claim, in minting order.
pub type Counterexample = Vec<(String, ModelValue)>;

/// Exploration outcomes observed by the host. Nothing here ever reaches
/// instrumented-program control flow.
#[derive(Clone)]
pub enum Outcome {
    Memory(Violation),
    /// A claim that can be false under the current path condition, with a
    /// witness assignment.
    AssertFailed { claim: String, counterexample: Counterexample },
    /// The solver gave up on the claim; host policy decides.
    Unknown { claim: String },
    /// The path condition became unsatisfiable; the path is dead.
    Infeasible,
}

impl Outcome {
    pub fn is_violation(&self) -> bool {
        matches!(self, Outcome::Memory(..) | Outcome::AssertFailed { .. })
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, Outcome::Infeasible)
    }
}

impl Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Memory(v) => write!(f, "{v:?}"),
            Outcome::AssertFailed { claim, counterexample } => {
                write!(f, "assertion failed: {claim}")?;
                for (name, value) in counterexample {
                    write!(f, "\n    {name} = {value:?}")?;
                }
                Ok(())
            }
            Outcome::Unknown { claim } => write!(f, "unknown: {claim}"),
            Outcome::Infeasible => write!(f, "infeasible path"),
        }
    }
}

/// Collection point for everything the host must observe. The output of one
/// explored path.
#[derive(Default)]
pub struct Report {
    outcomes: Vec<Outcome>,
}

impl Report {
    pub fn report(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Outcome> {
        self.outcomes.iter()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn num_violations(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_violation()).count()
    }

    pub fn has_violation(&self) -> bool {
        self.num_violations() > 0
    }
}

impl Debug for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let outcomes = self
            .outcomes
            .iter()
            .enumerate()
            .map(|(i, o)| format!("#{i}  {o:?}\n"))
            .collect::<String>();
        write!(f, "Exploration Outcomes:\n{outcomes}")
    }
}

pub type ReportPtr = Rc<RefCell<Report>>;
