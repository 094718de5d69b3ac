//! Simple path enumeration between two events.
//!
//! Depth-first search over outgoing activities with an explicit stack, so
//! traversal depth is bounded by memory rather than the call stack.

use crate::config::NetworkConfig;
use crate::interner::EventIdx;
use crate::log_checks;
use crate::models::{Activity, EventId, Path, Segment, TimeSpan};
use crate::network::{Network, NetworkError};
use crate::topology::IndexedGraph;

/// What a walk collects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WalkMode {
    /// Loop-free paths ending at the finish event. Looping branches are pruned.
    Paths,
    /// Partial paths closed by an activity that returns to an event already
    /// on the path. Branches reaching the finish event are dropped.
    Loops,
}

/// One depth-first traversal from a start event.
pub(crate) struct Walk<'g, E, D> {
    graph: &'g IndexedGraph<E, D>,
    mode: WalkMode,
    verbosity: u8,
    /// Exceeding this many results is an error.
    limit: Option<usize>,
}

impl<'g, E: EventId, D: TimeSpan> Walk<'g, E, D> {
    pub fn new(graph: &'g IndexedGraph<E, D>, mode: WalkMode, config: &NetworkConfig) -> Self {
        Self {
            graph,
            mode,
            verbosity: config.verbosity,
            limit: config.path_limit,
        }
    }

    fn segment(&self, from: EventIdx, to: EventIdx, duration: D) -> Option<Segment<E, D>> {
        let trigger = self.graph.interner.resolve(from)?.clone();
        let completion = self.graph.interner.resolve(to)?.clone();
        Some(Segment::new(Activity::new(trigger, completion), duration))
    }

    fn emit(
        &self,
        results: &mut Vec<Path<E, D>>,
        trail: &[Segment<E, D>],
        last: Segment<E, D>,
    ) -> Result<(), NetworkError> {
        if let Some(limit) = self.limit {
            if results.len() >= limit {
                return Err(NetworkError::PathLimitExceeded(limit));
            }
        }
        let mut path = Vec::with_capacity(trail.len() + 1);
        path.extend_from_slice(trail);
        path.push(last);
        results.push(path);
        Ok(())
    }

    pub fn run(&self, start: EventIdx, finish: EventIdx) -> Result<Vec<Path<E, D>>, NetworkError> {
        let mut results: Vec<Path<E, D>> = Vec::new();

        if start == finish && self.mode == WalkMode::Paths {
            // The empty walk already connects an event to itself
            results.push(Vec::new());
            return Ok(results);
        }

        let mut on_path = vec![false; self.graph.len()];
        on_path[start as usize] = true;

        // (event, index of the next outgoing activity to try)
        let mut stack: Vec<(EventIdx, usize)> = vec![(start, 0)];
        // trail.len() == stack.len() - 1
        let mut trail: Vec<Segment<E, D>> = Vec::new();

        while let Some(top) = stack.last_mut() {
            let (node, cursor) = *top;
            let Some(&(next, duration)) = self.graph.outgoing[node as usize].get(cursor) else {
                stack.pop();
                on_path[node as usize] = false;
                trail.truncate(stack.len().saturating_sub(1));
                continue;
            };
            top.1 += 1;

            let Some(segment) = self.segment(node, next, duration) else {
                continue;
            };

            if on_path[next as usize] {
                match self.mode {
                    WalkMode::Loops => self.emit(&mut results, &trail, segment)?,
                    WalkMode::Paths => log_checks!(
                        self.verbosity,
                        "Pruned looping branch at {}",
                        segment.activity.describe()
                    ),
                }
            } else if next == finish {
                if self.mode == WalkMode::Paths {
                    self.emit(&mut results, &trail, segment)?;
                }
            } else {
                trail.push(segment);
                on_path[next as usize] = true;
                stack.push((next, 0));
            }
        }

        Ok(results)
    }
}

impl<E: EventId, D: TimeSpan> Network<E, D> {
    /// Every loop-free directed path from `start` to `finish`.
    ///
    /// Paths come out in depth-first order, following outgoing activities in
    /// ascending order of their completion event. A branch stops as soon as
    /// it reaches `finish`.
    pub fn paths(&self, start: &E, finish: &E) -> Result<Vec<Path<E, D>>, NetworkError> {
        let graph = IndexedGraph::build(self);
        Walk::new(&graph, WalkMode::Paths, &self.config)
            .run(graph.index_of(start)?, graph.index_of(finish)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::path_length;
    use crate::network::tests::{diamond, sample};

    fn activities(path: &Path<i32, i32>) -> Vec<(i32, i32)> {
        path.iter()
            .map(|s| (s.activity.trigger, s.activity.completion))
            .collect()
    }

    #[test]
    fn test_diamond_paths() {
        let paths = diamond().paths(&1, &4).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(activities(&paths[0]), vec![(1, 2), (2, 4)]);
        assert_eq!(activities(&paths[1]), vec![(1, 3), (3, 4)]);
        assert_eq!(path_length(&paths[0]), 2);
        assert_eq!(path_length(&paths[1]), 7);
    }

    #[test]
    fn test_sample_paths() {
        let paths = sample().paths(&1, &9).unwrap();
        let found: Vec<Vec<(i32, i32)>> = paths.iter().map(activities).collect();
        assert_eq!(
            found,
            vec![
                vec![(1, 2), (2, 3), (3, 6), (6, 9)],
                vec![(1, 4), (4, 5), (5, 6), (6, 9)],
                vec![(1, 4), (4, 8), (8, 9)],
                vec![(1, 7), (7, 8), (8, 9)],
            ]
        );
    }

    #[test]
    fn test_inner_paths() {
        let paths = sample().paths(&4, &6).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(activities(&paths[0]), vec![(4, 5), (5, 6)]);
        assert!(sample().paths(&2, &8).unwrap().is_empty());
    }

    #[test]
    fn test_paths_stop_at_finish() {
        // 1 -> 2 -> 3 and 1 -> 3: finish 2 must not be extended past
        let mut network: Network<i32, i32> = Network::new();
        for (t, c) in [(1, 2), (2, 3), (1, 3)] {
            network.add_activity(t, c, 1).unwrap();
        }
        let paths = network.paths(&1, &2).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(activities(&paths[0]), vec![(1, 2)]);
    }

    #[test]
    fn test_loops_are_pruned() {
        // 1 -> 2 -> 3 -> 1 cycles back; 2 -> 4 reaches the finish
        let mut network: Network<i32, i32> = Network::new();
        for (t, c) in [(1, 2), (2, 3), (3, 1), (2, 4)] {
            network.add_activity(t, c, 1).unwrap();
        }
        let paths = network.paths(&1, &4).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(activities(&paths[0]), vec![(1, 2), (2, 4)]);
    }

    #[test]
    fn test_same_start_and_finish() {
        let paths = diamond().paths(&2, &2).unwrap();
        assert_eq!(paths, vec![Vec::new()]);
    }

    #[test]
    fn test_unknown_event() {
        assert!(matches!(
            diamond().paths(&0, &4),
            Err(NetworkError::UnknownEvent(_))
        ));
    }

    #[test]
    fn test_path_limit() {
        let mut network = sample();
        network.set_config(NetworkConfig::default().with_path_limit(3));
        assert_eq!(
            network.paths(&1, &9),
            Err(NetworkError::PathLimitExceeded(3))
        );
        network.set_config(NetworkConfig::default().with_path_limit(4));
        assert_eq!(network.paths(&1, &9).unwrap().len(), 4);
    }
}
