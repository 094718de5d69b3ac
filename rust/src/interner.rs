//! Event interning for the linear passes.
//!
//! Maps event identifiers to dense integer ids so per-event tables can be
//! plain vectors indexed by id.

use rustc_hash::FxHashMap;

use crate::models::EventId;

/// Interned event id (u32 for compact storage and fast hashing).
pub type EventIdx = u32;

/// Bidirectional mapping between events and dense integer ids.
#[derive(Debug, Clone)]
pub struct EventInterner<E> {
    to_int: FxHashMap<E, EventIdx>,
    from_int: Vec<E>,
}

impl<E: EventId> EventInterner<E> {
    /// Create a new interner with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_int: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_int: Vec::with_capacity(capacity),
        }
    }

    /// Intern an event, returning its id. Re-interning returns the existing id.
    pub fn intern(&mut self, event: &E) -> EventIdx {
        if let Some(&id) = self.to_int.get(event) {
            return id;
        }
        let id = self.from_int.len() as EventIdx;
        self.from_int.push(event.clone());
        self.to_int.insert(event.clone(), id);
        id
    }

    #[inline]
    pub fn get(&self, event: &E) -> Option<EventIdx> {
        self.to_int.get(event).copied()
    }

    #[inline]
    pub fn resolve(&self, id: EventIdx) -> Option<&E> {
        self.from_int.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.from_int.len()
    }
}

impl<E: EventId> Default for EventInterner<E> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_resolve() {
        let mut interner = EventInterner::with_capacity(4);

        let start = interner.intern(&"start".to_string());
        let end = interner.intern(&"end".to_string());
        let again = interner.intern(&"start".to_string());

        assert_eq!(start, again);
        assert_ne!(start, end);
        assert_eq!(interner.len(), 2);
        assert_eq!(interner.resolve(end).map(String::as_str), Some("end"));
        assert_eq!(interner.get(&"missing".to_string()), None);
        assert_eq!(interner.resolve(7), None);
    }
}
