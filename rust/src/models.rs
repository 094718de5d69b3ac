//! Core data types for activity-on-arc networks.

use chrono::TimeDelta;
use std::fmt;
use std::hash::Hash;
use std::ops::{Add, Sub};

/// Identifier of an event (a milestone node of the network).
///
/// Events carry no data of their own; they only exist as activity endpoints.
pub trait EventId: Ord + Hash + Clone + fmt::Debug {}

impl<T: Ord + Hash + Clone + fmt::Debug> EventId for T {}

/// Scalar used for durations and occurrence times.
///
/// Must behave like an ordered additive group: sums and differences of
/// spans are spans, and there is a zero. The checked forms return `None`
/// where the plain operators would overflow.
pub trait TimeSpan: Copy + Ord + Add<Output = Self> + Sub<Output = Self> + fmt::Debug {
    fn zero() -> Self;

    fn checked_add(self, rhs: Self) -> Option<Self>;

    fn checked_sub(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_time_span {
    ($($t:ty),*) => {
        $(
            impl TimeSpan for $t {
                #[inline]
                fn zero() -> Self {
                    0
                }

                #[inline]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_add(self, rhs)
                }

                #[inline]
                fn checked_sub(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_sub(self, rhs)
                }
            }
        )*
    };
}

impl_time_span!(i8, i16, i32, i64, i128, isize);

impl TimeSpan for TimeDelta {
    #[inline]
    fn zero() -> Self {
        TimeDelta::zero()
    }

    #[inline]
    fn checked_add(self, rhs: Self) -> Option<Self> {
        TimeDelta::checked_add(&self, &rhs)
    }

    #[inline]
    fn checked_sub(self, rhs: Self) -> Option<Self> {
        TimeDelta::checked_sub(&self, &rhs)
    }
}

/// A task running from its trigger event to its completion event.
///
/// Ordering is lexicographic on `(trigger, completion)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Activity<E> {
    pub trigger: E,
    pub completion: E,
}

impl<E: EventId> Activity<E> {
    pub fn new(trigger: E, completion: E) -> Self {
        Self {
            trigger,
            completion,
        }
    }

    /// The same pair of events, traversed the other way.
    pub fn reverse(&self) -> Self {
        Self {
            trigger: self.completion.clone(),
            completion: self.trigger.clone(),
        }
    }

    /// True if this activity ends at `event`.
    #[inline]
    pub fn precedes(&self, event: &E) -> bool {
        self.completion == *event
    }

    /// True if this activity starts at `event`.
    #[inline]
    pub fn follows(&self, event: &E) -> bool {
        self.trigger == *event
    }

    /// Short text form used in error messages.
    pub(crate) fn describe(&self) -> String {
        format!("{:?} ---> {:?}", self.trigger, self.completion)
    }
}

impl<E: fmt::Display> fmt::Display for Activity<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}--->{}", self.trigger, self.completion)
    }
}

impl<E: EventId> From<(E, E)> for Activity<E> {
    fn from((trigger, completion): (E, E)) -> Self {
        Self::new(trigger, completion)
    }
}

/// An activity together with its estimated duration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment<E, D> {
    pub activity: Activity<E>,
    pub duration: D,
}

impl<E: EventId, D: TimeSpan> Segment<E, D> {
    pub fn new(activity: Activity<E>, duration: D) -> Self {
        Self { activity, duration }
    }
}

/// A directed walk through the network, as consecutive segments.
pub type Path<E, D> = Vec<Segment<E, D>>;

/// Sum of the segment durations along a path.
pub fn path_length<E: EventId, D: TimeSpan>(path: &[Segment<E, D>]) -> D {
    path.iter().fold(D::zero(), |acc, s| acc + s.duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_ordering_is_lexicographic() {
        let mut activities = vec![
            Activity::new(2, 1),
            Activity::new(1, 3),
            Activity::new(1, 2),
            Activity::new(2, 0),
        ];
        activities.sort();
        assert_eq!(
            activities,
            vec![
                Activity::new(1, 2),
                Activity::new(1, 3),
                Activity::new(2, 0),
                Activity::new(2, 1),
            ]
        );
    }

    #[test]
    fn test_reverse_and_endpoints() {
        let a = Activity::new("a", "b");
        assert_eq!(a.reverse(), Activity::new("b", "a"));
        assert!(a.follows(&"a"));
        assert!(a.precedes(&"b"));
        assert!(!a.precedes(&"a"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Activity::new(3, 6).to_string(), "3--->6");
    }

    #[test]
    fn test_path_length() {
        let path = vec![
            Segment::new(Activity::new(1, 3), 6),
            Segment::new(Activity::new(3, 4), 1),
        ];
        assert_eq!(path_length(&path), 7);
        assert_eq!(path_length::<i32, i32>(&[]), 0);
    }

    #[test]
    fn test_time_delta_span() {
        assert_eq!(<TimeDelta as TimeSpan>::zero(), TimeDelta::zero());
        let d = TimeDelta::hours(3) + TimeDelta::hours(2);
        assert_eq!(d - TimeDelta::hours(5), <TimeDelta as TimeSpan>::zero());
        assert_eq!(TimeSpan::checked_add(TimeDelta::MAX, TimeDelta::hours(1)), None);
    }

    #[test]
    fn test_checked_span_arithmetic() {
        assert_eq!(TimeSpan::checked_add(2i32, 3), Some(5));
        assert_eq!(TimeSpan::checked_add(i32::MAX, 1), None);
        assert_eq!(TimeSpan::checked_sub(i64::MIN, 1), None);
        assert_eq!(TimeSpan::checked_sub(0i8, 5), Some(-5));
    }
}
