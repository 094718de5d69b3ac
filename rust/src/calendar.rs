//! Projection of event occurrence times onto calendar dates.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::collections::BTreeMap;

use crate::models::{EventId, TimeSpan};
use crate::network::{Network, NetworkError};

/// A span that can be laid out on a calendar.
///
/// Integer spans count whole days; `TimeDelta` spans are used as is.
/// Returns `None` when the span does not fit a `TimeDelta`.
pub trait CalendarSpan: TimeSpan {
    fn to_time_delta(&self) -> Option<TimeDelta>;
}

macro_rules! impl_calendar_span_days {
    ($($t:ty),*) => {
        $(
            impl CalendarSpan for $t {
                fn to_time_delta(&self) -> Option<TimeDelta> {
                    TimeDelta::try_days(i64::try_from(*self).ok()?)
                }
            }
        )*
    };
}

impl_calendar_span_days!(i8, i16, i32, i64, i128, isize);

impl CalendarSpan for TimeDelta {
    fn to_time_delta(&self) -> Option<TimeDelta> {
        Some(*self)
    }
}

fn offset<D: CalendarSpan>(start: NaiveDateTime, span: D) -> Option<NaiveDateTime> {
    start.checked_add_signed(span.to_time_delta()?)
}

/// Earliest and latest occurrence of an event as calendar timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventWindow {
    pub earliest: NaiveDateTime,
    pub latest: NaiveDateTime,
}

impl EventWindow {
    /// Spare time between the two occurrences.
    pub fn slack(&self) -> TimeDelta {
        self.latest - self.earliest
    }
}

/// Event windows of a scheduled network, anchored at a project start.
///
/// Times are measured from the network's own zero, so an initial time of 2
/// days places the initial event two days after `project_start`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventCalendar<E> {
    pub project_start: NaiveDateTime,
    pub windows: BTreeMap<E, EventWindow>,
}

impl<E: EventId> EventCalendar<E> {
    pub fn window(&self, event: &E) -> Option<&EventWindow> {
        self.windows.get(event)
    }

    /// Earliest possible completion of the whole project.
    pub fn earliest_completion(&self) -> Option<NaiveDateTime> {
        self.windows.values().map(|w| w.earliest).max()
    }
}

impl<E: EventId, D: CalendarSpan> Network<E, D> {
    /// Lay the event times of this network out from midnight of `start`.
    pub fn calendar(&self, start: NaiveDate) -> Result<EventCalendar<E>, NetworkError> {
        self.calendar_at(start.and_time(chrono::NaiveTime::MIN))
    }

    pub fn calendar_at(&self, project_start: NaiveDateTime) -> Result<EventCalendar<E>, NetworkError> {
        let timings = self.timings()?;
        let windows: BTreeMap<E, EventWindow> = timings
            .event_times()
            .into_iter()
            .map(|(event, (earliest, latest))| {
                match (offset(project_start, earliest), offset(project_start, latest)) {
                    (Some(earliest), Some(latest)) => Ok((event, EventWindow { earliest, latest })),
                    _ => Err(NetworkError::CalendarOverflow(format!("{:?}", event))),
                }
            })
            .collect::<Result<_, NetworkError>>()?;

        Ok(EventCalendar {
            project_start,
            windows,
        })
    }
}
