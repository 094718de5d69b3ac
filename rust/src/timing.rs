//! Forward and backward passes, and activity floats.
//!
//! Both passes run once over a topological order of the interned events:
//! the forward pass assigns each event the latest finish among its incoming
//! activities, the backward pass the earliest start among its outgoing ones.

use std::collections::BTreeMap;

use crate::interner::EventIdx;
use crate::log_debug;
use crate::models::{Activity, EventId, TimeSpan};
use crate::network::{Network, NetworkError};
use crate::topology::IndexedGraph;

/// Per-activity timing information.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivityTiming<D> {
    /// Earliest occurrence of the trigger event.
    pub earliest_start: D,
    pub earliest_finish: D,
    pub latest_start: D,
    /// Latest occurrence of the completion event.
    pub latest_finish: D,
    pub activity_float: D,
    pub free_float: D,
    pub interfering_float: D,
    pub independent_float: D,
}

impl<D: TimeSpan> ActivityTiming<D> {
    pub fn is_critical(&self) -> bool {
        self.free_float == D::zero()
    }
}

impl<E: EventId, D: TimeSpan> IndexedGraph<E, D> {
    /// Earliest occurrence of every event, indexed by event id.
    pub(crate) fn forward_pass(
        &self,
        order: &[EventIdx],
        initial: EventIdx,
        initial_time: D,
        verbosity: u8,
    ) -> Result<Vec<D>, NetworkError> {
        // Every slot is overwritten in topological order before it is read
        let mut earliest = vec![initial_time; self.len()];

        for &idx in order {
            if idx == initial {
                continue;
            }
            let time = self.incoming[idx as usize]
                .iter()
                .try_fold(None, |best: Option<D>, &(from, duration)| {
                    let finish = earliest[from as usize]
                        .checked_add(duration)
                        .ok_or_else(|| self.overflow(from, idx))?;
                    Ok::<_, NetworkError>(Some(best.map_or(finish, |b| b.max(finish))))
                })?
                .ok_or_else(|| NetworkError::NoIncomingActivity(self.describe(idx)))?;
            log_debug!(verbosity, "  earliest({}) = {:?}", self.describe(idx), time);
            earliest[idx as usize] = time;
        }

        Ok(earliest)
    }

    /// Latest occurrence of every event, indexed by event id.
    pub(crate) fn backward_pass(
        &self,
        order: &[EventIdx],
        terminal: EventIdx,
        terminal_time: D,
        verbosity: u8,
    ) -> Result<Vec<D>, NetworkError> {
        let mut latest = vec![terminal_time; self.len()];

        for &idx in order.iter().rev() {
            if idx == terminal {
                continue;
            }
            let time = self.outgoing[idx as usize]
                .iter()
                .try_fold(None, |best: Option<D>, &(to, duration)| {
                    let start = latest[to as usize]
                        .checked_sub(duration)
                        .ok_or_else(|| self.overflow(idx, to))?;
                    Ok::<_, NetworkError>(Some(best.map_or(start, |b| b.min(start))))
                })?
                .ok_or_else(|| NetworkError::NoOutgoingActivity(self.describe(idx)))?;
            log_debug!(verbosity, "  latest({}) = {:?}", self.describe(idx), time);
            latest[idx as usize] = time;
        }

        Ok(latest)
    }

    fn overflow(&self, from: EventIdx, to: EventIdx) -> NetworkError {
        NetworkError::TimeOverflow(format!("{} ---> {}", self.describe(from), self.describe(to)))
    }
}

fn checked<E: EventId, D>(activity: &Activity<E>, value: Option<D>) -> Result<D, NetworkError> {
    value.ok_or_else(|| NetworkError::TimeOverflow(activity.describe()))
}

/// Event occurrence times of a scheduled network, from one forward and one
/// backward pass.
///
/// All float formulas are evaluated against these tables, so a `Timings`
/// should be reused when querying many activities.
#[derive(Debug, Clone)]
pub struct Timings<'a, E, D> {
    network: &'a Network<E, D>,
    graph: IndexedGraph<E, D>,
    earliest: Vec<D>,
    latest: Vec<D>,
}

impl<'a, E: EventId, D: TimeSpan> Timings<'a, E, D> {
    pub(crate) fn compute(network: &'a Network<E, D>) -> Result<Self, NetworkError> {
        let initial_time = network.initial_time.ok_or(NetworkError::NotScheduled)?;
        let terminal_time = network.terminal_time.ok_or(NetworkError::NotScheduled)?;
        let initial = network.initial_event()?;
        let terminal = network.terminal_event()?;
        let verbosity = network.config.verbosity;

        let graph = IndexedGraph::build(network);
        let order = graph.topological_order()?;

        log_debug!(verbosity, "Forward pass from {:?} at {:?}", initial, initial_time);
        let earliest =
            graph.forward_pass(&order, graph.index_of(&initial)?, initial_time, verbosity)?;
        log_debug!(verbosity, "Backward pass from {:?} at {:?}", terminal, terminal_time);
        let latest =
            graph.backward_pass(&order, graph.index_of(&terminal)?, terminal_time, verbosity)?;

        Ok(Self {
            network,
            graph,
            earliest,
            latest,
        })
    }

    pub fn earliest_occurence(&self, event: &E) -> Result<D, NetworkError> {
        Ok(self.earliest[self.graph.index_of(event)? as usize])
    }

    pub fn latest_occurence(&self, event: &E) -> Result<D, NetworkError> {
        Ok(self.latest[self.graph.index_of(event)? as usize])
    }

    /// Earliest occurrence of the trigger plus the duration.
    pub fn earliest_finish(&self, activity: &Activity<E>) -> Result<D, NetworkError> {
        let duration = self.network.estimated_duration(activity)?;
        checked(activity, self.earliest_occurence(&activity.trigger)?.checked_add(duration))
    }

    /// Latest occurrence of the completion minus the duration.
    pub fn latest_start(&self, activity: &Activity<E>) -> Result<D, NetworkError> {
        let duration = self.network.estimated_duration(activity)?;
        checked(activity, self.latest_occurence(&activity.completion)?.checked_sub(duration))
    }

    /// `earliest_occurence(completion) - earliest_finish`.
    pub fn activity_float(&self, activity: &Activity<E>) -> Result<D, NetworkError> {
        let finish = self.earliest_finish(activity)?;
        checked(activity, self.earliest_occurence(&activity.completion)?.checked_sub(finish))
    }

    /// `latest_occurence(completion) - earliest_finish`.
    pub fn free_float(&self, activity: &Activity<E>) -> Result<D, NetworkError> {
        let finish = self.earliest_finish(activity)?;
        checked(activity, self.latest_occurence(&activity.completion)?.checked_sub(finish))
    }

    /// `max(0, earliest_occurence(completion) - latest_occurence(trigger) - duration)`.
    pub fn interfering_float(&self, activity: &Activity<E>) -> Result<D, NetworkError> {
        let duration = self.network.estimated_duration(activity)?;
        let span = self
            .earliest_occurence(&activity.completion)?
            .checked_sub(self.latest_occurence(&activity.trigger)?)
            .and_then(|span| span.checked_sub(duration));
        Ok(checked(activity, span)?.max(D::zero()))
    }

    /// `free_float - activity_float`.
    pub fn independent_float(&self, activity: &Activity<E>) -> Result<D, NetworkError> {
        let free = self.free_float(activity)?;
        checked(activity, free.checked_sub(self.activity_float(activity)?))
    }

    pub fn activity_timing(&self, activity: &Activity<E>) -> Result<ActivityTiming<D>, NetworkError> {
        Ok(ActivityTiming {
            earliest_start: self.earliest_occurence(&activity.trigger)?,
            earliest_finish: self.earliest_finish(activity)?,
            latest_start: self.latest_start(activity)?,
            latest_finish: self.latest_occurence(&activity.completion)?,
            activity_float: self.activity_float(activity)?,
            free_float: self.free_float(activity)?,
            interfering_float: self.interfering_float(activity)?,
            independent_float: self.independent_float(activity)?,
        })
    }

    /// Earliest and latest occurrence of every event, in event order.
    pub fn event_times(&self) -> BTreeMap<E, (D, D)> {
        (0..self.graph.len())
            .filter_map(|i| {
                let event = self.graph.interner.resolve(i as EventIdx)?;
                Some((event.clone(), (self.earliest[i], self.latest[i])))
            })
            .collect()
    }
}

impl<E: EventId, D: TimeSpan> Network<E, D> {
    /// Run both passes. Requires a schedule, a single initial and terminal
    /// event, and an acyclic activity graph.
    pub fn timings(&self) -> Result<Timings<'_, E, D>, NetworkError> {
        Timings::compute(self)
    }

    pub fn earliest_occurence(&self, event: &E) -> Result<D, NetworkError> {
        self.timings()?.earliest_occurence(event)
    }

    pub fn earliest_finish(&self, activity: &Activity<E>) -> Result<D, NetworkError> {
        self.timings()?.earliest_finish(activity)
    }

    pub fn latest_occurence(&self, event: &E) -> Result<D, NetworkError> {
        self.timings()?.latest_occurence(event)
    }

    pub fn latest_start(&self, activity: &Activity<E>) -> Result<D, NetworkError> {
        self.timings()?.latest_start(activity)
    }

    pub fn activity_float(&self, activity: &Activity<E>) -> Result<D, NetworkError> {
        self.timings()?.activity_float(activity)
    }

    pub fn free_float(&self, activity: &Activity<E>) -> Result<D, NetworkError> {
        self.timings()?.free_float(activity)
    }

    /// Clamped at zero. Classical CPM texts sometimes attach this formula to
    /// "independent float"; the name here follows the formula.
    pub fn interfering_float(&self, activity: &Activity<E>) -> Result<D, NetworkError> {
        self.timings()?.interfering_float(activity)
    }

    /// Equals `latest_occurence(completion) - earliest_occurence(completion)`.
    /// Classical CPM texts sometimes call this "interfering float".
    pub fn independent_float(&self, activity: &Activity<E>) -> Result<D, NetworkError> {
        self.timings()?.independent_float(activity)
    }

    /// Timing of every activity, computed from a single pair of passes.
    pub fn activity_timings(&self) -> Result<BTreeMap<Activity<E>, ActivityTiming<D>>, NetworkError> {
        let timings = self.timings()?;
        self.data
            .keys()
            .map(|a| Ok((a.clone(), timings.activity_timing(a)?)))
            .collect()
    }
}
