//! Type-safe identifier for events in the causal universe.
//!
//! Events are numbered densely from zero in the order they are created. The
//! identifier doubles as the event's creation index, so comparing two ids
//! compares their position in causal (creation) order.

use serde::{Deserialize, Serialize};

/// Identifier of an event (a node of the causal graph).
///
/// The origin event is always [`EventId::ORIGIN`]. Every later event gets
/// the next integer, with no gaps and no reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl EventId {
    /// The primordial event created when a universe is initialized.
    pub const ORIGIN: Self = Self(0);

    /// Wrap a raw creation index.
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// Return the inner creation index.
    pub const fn into_inner(self) -> u64 {
        self.0
    }

    /// Convert to an arena index, if it fits in `usize`.
    pub fn as_index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }

    /// Build an id from an arena index.
    pub fn from_index(index: usize) -> Option<Self> {
        u64::try_from(index).ok().map(Self)
    }

    /// The id that will be assigned right after this one.
    ///
    /// Returns `None` on `u64` overflow.
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }
}

impl core::fmt::Display for EventId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl From<u64> for EventId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<EventId> for u64 {
    fn from(id: EventId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_order_by_creation_index() {
        assert!(EventId::new(3) < EventId::new(10));
        assert_eq!(EventId::ORIGIN, EventId::new(0));
    }

    #[test]
    fn next_advances_and_saturates_at_overflow() {
        assert_eq!(EventId::ORIGIN.next(), Some(EventId::new(1)));
        assert_eq!(EventId::new(u64::MAX).next(), None);
    }

    #[test]
    fn index_conversions_agree() {
        let id = EventId::new(17);
        assert_eq!(id.as_index(), Some(17));
        assert_eq!(EventId::from_index(17), Some(id));
    }

    #[test]
    fn display_uses_event_prefix() {
        assert_eq!(EventId::new(42).to_string(), "e42");
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&EventId::new(5)).ok();
        assert_eq!(json.as_deref(), Some("5"));
    }
}
