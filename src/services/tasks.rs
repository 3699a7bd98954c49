use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// The requests the supplier page can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Retrieve,
    Delete,
    Search,
    MakeAvailable,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Create,
        Operation::Update,
        Operation::Retrieve,
        Operation::Delete,
        Operation::Search,
        Operation::MakeAvailable,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Retrieve => "retrieve",
            Operation::Delete => "delete",
            Operation::Search => "search",
            Operation::MakeAvailable => "make-available",
        };
        f.write_str(name)
    }
}

/// Proof that a request was issued, checked again when it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub operation: Operation,
    pub generation: u64,
}

/// Tracks the newest request issued per operation. A completion whose ticket
/// is no longer the newest has been superseded and must not be applied.
#[derive(Debug, Default)]
pub struct OperationTracker {
    generations: [AtomicU64; Operation::ALL.len()],
}

impl OperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, operation: Operation) -> Ticket {
        let generation = self.generations[operation.index()].fetch_add(1, Ordering::SeqCst) + 1;
        Ticket { operation, generation }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.generations[ticket.operation.index()].load(Ordering::SeqCst) == ticket.generation
    }
}
