//! PERT/CPM analysis of activity-on-arc project networks.
//!
//! A [`Network`] stores activities keyed by their `(trigger, completion)`
//! event pair with an estimated duration, plus the occurrence times of the
//! initial and terminal events. On top of that it computes:
//! 1. Earliest and latest event occurrences (forward and backward pass)
//! 2. Activity floats (activity, free, interfering, independent)
//! 3. Well-formedness, loop paths and all simple paths between two events
//! 4. The critical activities and the sub-network between two events
//!
//! Every failure is reported through [`NetworkError`] or [`ParseError`];
//! nothing is signalled with sentinel values.

pub mod calendar;
mod config;
mod critical_path;
mod interner;
pub mod logging;
pub mod models;
mod network;
mod paths;
pub mod shell;
pub mod text;
mod timing;
mod topology;

#[cfg(feature = "python")]
mod bindings;

pub use calendar::{CalendarSpan, EventCalendar, EventWindow};
pub use config::NetworkConfig;
pub use critical_path::CriticalPath;
pub use models::{path_length, Activity, EventId, Path, Segment, TimeSpan};
pub use network::{Network, NetworkError};
pub use text::ParseError;
pub use timing::{ActivityTiming, Timings};
