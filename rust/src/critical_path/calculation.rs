//! Critical path calculation on a tightened scratch copy of the network.

use crate::log_checks;
use crate::models::{EventId, Path, Segment, TimeSpan};
use crate::network::{Network, NetworkError};
use crate::topology::IndexedGraph;

use super::types::CriticalPath;

impl<E: EventId, D: TimeSpan> Network<E, D> {
    /// Minimal project duration: the longest initial-to-terminal path.
    ///
    /// Independent of the schedule, so it also works on unscheduled networks.
    pub fn project_duration(&self) -> Result<D, NetworkError> {
        let initial = self.initial_event()?;
        let terminal = self.terminal_event()?;
        let graph = IndexedGraph::build(self);
        let order = graph.topological_order()?;
        let earliest = graph.forward_pass(
            &order,
            graph.index_of(&initial)?,
            D::zero(),
            self.config.verbosity,
        )?;
        Ok(earliest[graph.index_of(&terminal)? as usize])
    }

    /// All activities with zero free float once the network is scheduled
    /// over `[0, project_duration]`.
    ///
    /// The receiver is left untouched; the tightened schedule lives on a
    /// scratch copy. Segments are sorted by `(trigger, completion)`.
    pub fn find_critical_path(&self) -> Result<CriticalPath<E, D>, NetworkError> {
        let length = self.project_duration()?;

        let mut scratch = self.clone();
        scratch.schedule(D::zero(), length);
        let timings = scratch.timings()?;

        let mut segments = Vec::new();
        for (activity, &duration) in &scratch.data {
            if timings.free_float(activity)? == D::zero() {
                segments.push(Segment::new(activity.clone(), duration));
            }
        }
        log_checks!(
            self.config.verbosity,
            "Critical set: {} of {} activities, length {:?}",
            segments.len(),
            scratch.len(),
            length
        );

        Ok(CriticalPath { segments, length })
    }

    /// Every initial-to-terminal path made only of critical activities.
    ///
    /// Each chain has length `project_duration()`. A network with a single
    /// longest path yields exactly one chain.
    pub fn critical_chains(&self) -> Result<Vec<Path<E, D>>, NetworkError> {
        let initial = self.initial_event()?;
        let terminal = self.terminal_event()?;
        let critical = self.find_critical_path()?;

        let mut critical_net = Network::with_config(self.config.clone());
        for segment in critical.segments {
            critical_net.data.insert(segment.activity, segment.duration);
        }
        critical_net.paths(&initial, &terminal)
    }
}
