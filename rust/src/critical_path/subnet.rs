//! Extraction of the part of a network lying between two events.

use crate::log_changes;
use crate::models::{EventId, TimeSpan};
use crate::network::{Network, NetworkError};

impl<E: EventId, D: TimeSpan> Network<E, D> {
    /// A new network holding exactly the activities on some path from
    /// `start` to `finish`, scheduled over
    /// `[earliest_occurence(start), latest_occurence(finish)]` of this network.
    pub fn subnet(&self, start: &E, finish: &E) -> Result<Network<E, D>, NetworkError> {
        let timings = self.timings()?;
        let initial_time = timings.earliest_occurence(start)?;
        let terminal_time = timings.latest_occurence(finish)?;

        let mut sub = Network::with_config(self.config.clone());
        for path in self.paths(start, finish)? {
            for segment in path {
                sub.data.entry(segment.activity).or_insert(segment.duration);
            }
        }
        log_changes!(
            self.config.verbosity,
            "Extracted sub-network {:?} ---> {:?} with {} activities",
            start,
            finish,
            sub.len()
        );
        sub.schedule(initial_time, terminal_time);
        Ok(sub)
    }
}
