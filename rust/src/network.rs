//! Activity-on-arc network storage and graph primitives.

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::config::NetworkConfig;
use crate::log_changes;
use crate::models::{Activity, EventId, Segment, TimeSpan};

/// Errors reported by network mutation and analysis.
///
/// Events and activities are rendered into the message so the error type
/// does not depend on the network's event type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Activity {0} rejected: its reverse is already in the network")]
    ReverseActivityExists(String),
    #[error("Activity {0} is already in the network")]
    DuplicateActivity(String),
    #[error("Activity {0} starts and finishes at the same event")]
    SelfLoop(String),
    #[error("Activity not found: {0}")]
    MissingActivity(String),
    #[error("Event not found: {0}")]
    UnknownEvent(String),
    #[error("Network has not been scheduled")]
    NotScheduled,
    #[error("Expected exactly one initial event, found {0}")]
    InitialEventCount(usize),
    #[error("Expected exactly one terminal event, found {0}")]
    TerminalEventCount(usize),
    #[error("Circular dependency detected in activity network")]
    Cycle,
    #[error("Event {0} is not the initial event but has no incoming activity")]
    NoIncomingActivity(String),
    #[error("Event {0} is not the terminal event but has no outgoing activity")]
    NoOutgoingActivity(String),
    #[error("Path enumeration exceeded the limit of {0} paths")]
    PathLimitExceeded(usize),
    #[error("Time arithmetic overflowed at activity {0}")]
    TimeOverflow(String),
    #[error("Event {0} falls outside the representable calendar range")]
    CalendarOverflow(String),
}

/// A project network: activities keyed by their event pair, each with an
/// estimated duration, plus the schedule boundaries.
///
/// Query operations never mutate the network; derived networks (critical
/// path scratch copies, sub-networks) are independent copies.
#[derive(Clone, Debug, PartialEq)]
pub struct Network<E, D> {
    pub(crate) data: BTreeMap<Activity<E>, D>,
    pub(crate) initial_time: Option<D>,
    pub(crate) terminal_time: Option<D>,
    pub(crate) config: NetworkConfig,
}

impl<E: EventId, D: TimeSpan> Default for Network<E, D> {
    fn default() -> Self {
        Self::with_config(NetworkConfig::default())
    }
}

impl<E: EventId, D: TimeSpan> Network<E, D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: NetworkConfig) -> Self {
        Self {
            data: BTreeMap::new(),
            initial_time: None,
            terminal_time: None,
            config,
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: NetworkConfig) {
        self.config = config;
    }

    /// All activities, ordered by `(trigger, completion)`.
    pub fn activities(&self) -> impl Iterator<Item = &Activity<E>> + '_ {
        self.data.keys()
    }

    /// All activities with their durations, ordered by `(trigger, completion)`.
    pub fn segments(&self) -> impl Iterator<Item = Segment<E, D>> + '_ {
        self.data
            .iter()
            .map(|(a, &d)| Segment::new(a.clone(), d))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn contains_activity(&self, activity: &Activity<E>) -> bool {
        self.data.contains_key(activity)
    }

    /// True if some activity starts or ends at `event`.
    pub fn contains_event(&self, event: &E) -> bool {
        self.data
            .keys()
            .any(|a| a.follows(event) || a.precedes(event))
    }

    /// Every event referenced by an activity.
    pub fn events(&self) -> BTreeSet<E> {
        let mut events = self.trigger_events();
        events.extend(self.completion_events());
        events
    }

    pub(crate) fn trigger_events(&self) -> BTreeSet<E> {
        self.data.keys().map(|a| a.trigger.clone()).collect()
    }

    pub(crate) fn completion_events(&self) -> BTreeSet<E> {
        self.data.keys().map(|a| a.completion.clone()).collect()
    }

    /// Events that trigger activities but complete none.
    pub fn initial_events(&self) -> BTreeSet<E> {
        let completions = self.completion_events();
        self.trigger_events()
            .into_iter()
            .filter(|e| !completions.contains(e))
            .collect()
    }

    /// Events that complete activities but trigger none.
    pub fn terminal_events(&self) -> BTreeSet<E> {
        let triggers = self.trigger_events();
        self.completion_events()
            .into_iter()
            .filter(|e| !triggers.contains(e))
            .collect()
    }

    /// The single initial event, or `InitialEventCount` if there is not exactly one.
    pub fn initial_event(&self) -> Result<E, NetworkError> {
        let events = self.initial_events();
        if events.len() != 1 {
            return Err(NetworkError::InitialEventCount(events.len()));
        }
        events
            .into_iter()
            .next()
            .ok_or(NetworkError::InitialEventCount(0))
    }

    /// The single terminal event, or `TerminalEventCount` if there is not exactly one.
    pub fn terminal_event(&self) -> Result<E, NetworkError> {
        let events = self.terminal_events();
        if events.len() != 1 {
            return Err(NetworkError::TerminalEventCount(events.len()));
        }
        events
            .into_iter()
            .next()
            .ok_or(NetworkError::TerminalEventCount(0))
    }

    /// Activities completing at `event`.
    pub fn incoming_activities<'a>(
        &'a self,
        event: &'a E,
    ) -> impl Iterator<Item = &'a Activity<E>> + 'a {
        self.data.keys().filter(move |a| a.precedes(event))
    }

    /// Activities triggered by `event`.
    pub fn outgoing_activities<'a>(
        &'a self,
        event: &'a E,
    ) -> impl Iterator<Item = &'a Activity<E>> + 'a {
        self.data.keys().filter(move |a| a.follows(event))
    }

    /// Add the activity `trigger ---> completion`.
    ///
    /// Rejected (and reported at CHANGES verbosity) if the reverse activity
    /// exists, if the activity is already present, or if both endpoints are
    /// the same event. Returns `&mut Self` so calls can be chained with `?`.
    pub fn add_activity(
        &mut self,
        trigger: E,
        completion: E,
        duration: D,
    ) -> Result<&mut Self, NetworkError> {
        self.add(Activity::new(trigger, completion), duration)
    }

    /// Add an already constructed activity. See [`Network::add_activity`].
    pub fn add(&mut self, activity: Activity<E>, duration: D) -> Result<&mut Self, NetworkError> {
        self.check_insertable(&activity)?;
        if self.data.contains_key(&activity) {
            log_changes!(
                self.config.verbosity,
                "Activity {} already present, keeping existing duration",
                activity.describe()
            );
            return Err(NetworkError::DuplicateActivity(activity.describe()));
        }
        log_changes!(
            self.config.verbosity,
            "Added activity {} ({:?})",
            activity.describe(),
            duration
        );
        self.data.insert(activity, duration);
        Ok(self)
    }

    fn check_insertable(&self, activity: &Activity<E>) -> Result<(), NetworkError> {
        if activity.trigger == activity.completion {
            log_changes!(
                self.config.verbosity,
                "Rejected self-loop activity {}",
                activity.describe()
            );
            return Err(NetworkError::SelfLoop(activity.describe()));
        }
        if self.data.contains_key(&activity.reverse()) {
            log_changes!(
                self.config.verbosity,
                "Rejected activity {}: reverse activity already present",
                activity.describe()
            );
            return Err(NetworkError::ReverseActivityExists(activity.describe()));
        }
        Ok(())
    }

    /// Remove `trigger ---> completion`, returning its duration if it was present.
    pub fn delete_activity(&mut self, trigger: E, completion: E) -> Option<D> {
        self.delete(&Activity::new(trigger, completion))
    }

    /// Remove an activity, returning its duration if it was present.
    pub fn delete(&mut self, activity: &Activity<E>) -> Option<D> {
        let removed = self.data.remove(activity);
        if removed.is_some() {
            log_changes!(
                self.config.verbosity,
                "Deleted activity {}",
                activity.describe()
            );
        }
        removed
    }

    pub fn estimated_duration(&self, activity: &Activity<E>) -> Result<D, NetworkError> {
        self.data
            .get(activity)
            .copied()
            .ok_or_else(|| NetworkError::MissingActivity(activity.describe()))
    }

    /// Set the duration of an existing or new activity, returning the previous one.
    ///
    /// New activities are subject to the same checks as [`Network::add`].
    pub fn set_estimated_duration(
        &mut self,
        activity: Activity<E>,
        duration: D,
    ) -> Result<Option<D>, NetworkError> {
        if !self.data.contains_key(&activity) {
            self.check_insertable(&activity)?;
        }
        log_changes!(
            self.config.verbosity,
            "Duration of {} set to {:?}",
            activity.describe(),
            duration
        );
        Ok(self.data.insert(activity, duration))
    }

    /// Set the occurrence times of the initial and terminal events.
    pub fn schedule(&mut self, initial_time: D, terminal_time: D) -> &mut Self {
        log_changes!(
            self.config.verbosity,
            "Scheduled network over [{:?}, {:?}]",
            initial_time,
            terminal_time
        );
        self.initial_time = Some(initial_time);
        self.terminal_time = Some(terminal_time);
        self
    }

    pub fn initial_time(&self) -> Option<D> {
        self.initial_time
    }

    pub fn terminal_time(&self) -> Option<D> {
        self.terminal_time
    }

    pub fn is_scheduled(&self) -> bool {
        self.initial_time.is_some() && self.terminal_time.is_some()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 1->2:1, 1->3:6, 2->4:1, 3->4:1
    pub(crate) fn diamond() -> Network<i32, i32> {
        let mut network = Network::new();
        network
            .add_activity(1, 2, 1)
            .and_then(|n| n.add_activity(1, 3, 6))
            .and_then(|n| n.add_activity(2, 4, 1))
            .and_then(|n| n.add_activity(3, 4, 1))
            .unwrap();
        network
    }

    /// The nine-event sample network, scheduled over [0, 21].
    pub(crate) fn sample() -> Network<i32, i32> {
        let mut network = Network::new();
        for (t, c, d) in [
            (1, 2, 2),
            (1, 4, 2),
            (1, 7, 1),
            (2, 3, 4),
            (4, 5, 5),
            (3, 6, 1),
            (4, 8, 8),
            (5, 6, 4),
            (7, 8, 3),
            (6, 9, 3),
            (8, 9, 5),
        ] {
            network.add_activity(t, c, d).unwrap();
        }
        network.schedule(0, 21);
        network
    }

    #[test]
    fn test_initial_and_terminal_events() {
        let network = diamond();
        assert_eq!(network.initial_events(), BTreeSet::from([1]));
        assert_eq!(network.terminal_events(), BTreeSet::from([4]));
        assert_eq!(network.initial_event(), Ok(1));
        assert_eq!(network.terminal_event(), Ok(4));
        assert_eq!(network.events(), BTreeSet::from([1, 2, 3, 4]));
    }

    #[test]
    fn test_two_sources_reported() {
        let mut network = diamond();
        network.add_activity(5, 4, 2).unwrap();
        assert_eq!(network.initial_events(), BTreeSet::from([1, 5]));
        assert_eq!(network.initial_event(), Err(NetworkError::InitialEventCount(2)));
    }

    #[test]
    fn test_empty_network_has_no_boundary_events() {
        let network: Network<i32, i32> = Network::new();
        assert!(network.is_empty());
        assert_eq!(network.initial_event(), Err(NetworkError::InitialEventCount(0)));
        assert_eq!(network.terminal_event(), Err(NetworkError::TerminalEventCount(0)));
    }

    #[test]
    fn test_incoming_and_outgoing() {
        let network = diamond();
        let incoming: Vec<_> = network.incoming_activities(&4).cloned().collect();
        assert_eq!(incoming, vec![Activity::new(2, 4), Activity::new(3, 4)]);
        let outgoing: Vec<_> = network.outgoing_activities(&1).cloned().collect();
        assert_eq!(outgoing, vec![Activity::new(1, 2), Activity::new(1, 3)]);
        assert_eq!(network.outgoing_activities(&4).count(), 0);
    }

    #[test]
    fn test_reverse_activity_rejected() {
        let mut network: Network<i32, i32> = Network::new();
        network.add_activity(1, 2, 5).unwrap();
        let result = network.add_activity(2, 1, 3).map(|_| ());
        assert!(matches!(result, Err(NetworkError::ReverseActivityExists(_))));
        assert_eq!(network.len(), 1);
        assert_eq!(network.estimated_duration(&Activity::new(1, 2)), Ok(5));
    }

    #[test]
    fn test_duplicate_keeps_first_duration() {
        let mut network: Network<i32, i32> = Network::new();
        network.add_activity(1, 2, 5).unwrap();
        let result = network.add_activity(1, 2, 9).map(|_| ());
        assert!(matches!(result, Err(NetworkError::DuplicateActivity(_))));
        assert_eq!(network.estimated_duration(&Activity::new(1, 2)), Ok(5));
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut network: Network<i32, i32> = Network::new();
        let result = network.add_activity(3, 3, 1).map(|_| ());
        assert!(matches!(result, Err(NetworkError::SelfLoop(_))));
        assert!(network.is_empty());
    }

    #[test]
    fn test_delete_activity() {
        let mut network = diamond();
        assert_eq!(network.delete_activity(1, 3), Some(6));
        assert_eq!(network.delete_activity(1, 3), None);
        assert_eq!(network.len(), 3);
        assert!(!network.contains_activity(&Activity::new(1, 3)));
        assert!(network.contains_event(&3));
    }

    #[test]
    fn test_missing_duration_is_an_error() {
        let network = diamond();
        assert!(matches!(
            network.estimated_duration(&Activity::new(4, 1)),
            Err(NetworkError::MissingActivity(_))
        ));
    }

    #[test]
    fn test_set_estimated_duration_upserts() {
        let mut network = diamond();
        assert_eq!(
            network.set_estimated_duration(Activity::new(1, 2), 4),
            Ok(Some(1))
        );
        assert_eq!(network.set_estimated_duration(Activity::new(4, 5), 2), Ok(None));
        assert_eq!(network.estimated_duration(&Activity::new(4, 5)), Ok(2));
        assert!(network
            .set_estimated_duration(Activity::new(2, 1), 1)
            .is_err());
    }

    #[test]
    fn test_schedule() {
        let mut network = diamond();
        assert!(!network.is_scheduled());
        network.schedule(0, 7);
        assert_eq!(network.initial_time(), Some(0));
        assert_eq!(network.terminal_time(), Some(7));
        assert!(network.is_scheduled());
    }

    #[test]
    fn test_string_events() {
        let mut network: Network<String, i64> = Network::new();
        network
            .add_activity("design".into(), "build".into(), 3)
            .and_then(|n| n.add_activity("build".into(), "ship".into(), 2))
            .unwrap();
        assert_eq!(network.initial_event(), Ok("design".to_string()));
        assert_eq!(network.terminal_event(), Ok("ship".to_string()));
    }
}
