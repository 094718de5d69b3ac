//! Types for critical path results.

use rustc_hash::FxHashMap;

use crate::models::{path_length, Activity, EventId, Path, Segment, TimeSpan};

/// The critical activities of a network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CriticalPath<E, D> {
    /// Every zero-free-float activity, sorted by `(trigger, completion)`.
    pub segments: Vec<Segment<E, D>>,
    /// Minimal project duration (longest initial-to-terminal path).
    pub length: D,
}

impl<E: EventId, D: TimeSpan> CriticalPath<E, D> {
    pub fn activities(&self) -> impl Iterator<Item = &Activity<E>> + '_ {
        self.segments.iter().map(|s| &s.activity)
    }

    pub fn contains(&self, activity: &Activity<E>) -> bool {
        self.segments.iter().any(|s| s.activity == *activity)
    }

    /// Sum of the durations of all critical activities.
    ///
    /// Equals `length` only when the critical set is a single chain.
    pub fn total_duration(&self) -> D {
        path_length(&self.segments)
    }

    /// The segments in walking order, if they form one contiguous chain.
    pub fn as_chain(&self) -> Option<Path<E, D>> {
        let mut by_trigger: FxHashMap<&E, &Segment<E, D>> = FxHashMap::default();
        for segment in &self.segments {
            if by_trigger.insert(&segment.activity.trigger, segment).is_some() {
                // Branches at this event
                return None;
            }
        }

        let mut current = self
            .segments
            .iter()
            .map(|s| &s.activity.trigger)
            .find(|e| !self.segments.iter().any(|s| s.activity.completion == **e))?;

        let mut chain = Vec::with_capacity(self.segments.len());
        while let Some(segment) = by_trigger.get(current) {
            chain.push((*segment).clone());
            if chain.len() > self.segments.len() {
                return None;
            }
            current = &segment.activity.completion;
        }

        (chain.len() == self.segments.len()).then_some(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(t: i32, c: i32, d: i32) -> Segment<i32, i32> {
        Segment::new(Activity::new(t, c), d)
    }

    #[test]
    fn test_chain_is_walked_in_order() {
        let critical = CriticalPath {
            segments: vec![segment(1, 3, 6), segment(0, 1, 2), segment(3, 4, 1)],
            length: 9,
        };
        let chain = critical.as_chain().unwrap();
        let order: Vec<_> = chain.iter().map(|s| s.activity.trigger).collect();
        assert_eq!(order, vec![0, 1, 3]);
        assert_eq!(critical.total_duration(), 9);
        assert!(critical.contains(&Activity::new(1, 3)));
    }

    #[test]
    fn test_parallel_chains_are_not_one_chain() {
        let critical = CriticalPath {
            segments: vec![
                segment(1, 2, 1),
                segment(1, 3, 1),
                segment(2, 4, 1),
                segment(3, 4, 1),
            ],
            length: 2,
        };
        assert_eq!(critical.as_chain(), None);
        assert_eq!(critical.total_duration(), 4);
    }

    #[test]
    fn test_empty_set() {
        let critical: CriticalPath<i32, i32> = CriticalPath {
            segments: vec![],
            length: 0,
        };
        assert_eq!(critical.as_chain(), None);
        assert_eq!(critical.activities().count(), 0);
    }
}
