use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an agent. Allocated monotonically and never reused, so a
/// stale id from a destroyed fleet can never alias a new agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u64);

/// Identifier of a resource in the pool. Allocated monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource#{}", self.0)
    }
}

/// Hands out fresh ids in increasing order.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Create an allocator whose first id is 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the next raw id.
    pub fn next_raw(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Return the next id as an [`AgentId`].
    pub fn next_agent(&mut self) -> AgentId {
        AgentId(self.next_raw())
    }

    /// Return the next id as a [`ResourceId`].
    pub fn next_resource(&mut self) -> ResourceId {
        ResourceId(self.next_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_is_monotonic() {
        let mut ids = IdAllocator::new();
        let a = ids.next_agent();
        let b = ids.next_agent();
        let c = ids.next_agent();
        assert!(a < b && b < c);
        assert_eq!(a, AgentId(0));
    }

    #[test]
    fn display_is_prefixed() {
        assert_eq!(AgentId(3).to_string(), "agent#3");
        assert_eq!(ResourceId(12).to_string(), "resource#12");
    }
}
