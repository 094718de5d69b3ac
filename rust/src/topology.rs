//! Structural checks: topological ordering, loop detection and well-formedness.

use std::collections::VecDeque;

use crate::interner::{EventIdx, EventInterner};
use crate::log_checks;
use crate::models::{EventId, Path, TimeSpan};
use crate::network::{Network, NetworkError};
use crate::paths::{Walk, WalkMode};

/// Adjacency lists over interned events, built once per analysis.
///
/// Events are interned in ascending order, so id order matches event order
/// and every adjacency list is sorted by the neighbouring event.
#[derive(Debug, Clone)]
pub(crate) struct IndexedGraph<E, D> {
    pub interner: EventInterner<E>,
    /// Per event: (completion, duration) of each activity it triggers.
    pub outgoing: Vec<Vec<(EventIdx, D)>>,
    /// Per event: (trigger, duration) of each activity it completes.
    pub incoming: Vec<Vec<(EventIdx, D)>>,
}

impl<E: EventId, D: TimeSpan> IndexedGraph<E, D> {
    pub fn build(network: &Network<E, D>) -> Self {
        let events = network.events();
        let mut interner = EventInterner::with_capacity(events.len());
        for event in &events {
            interner.intern(event);
        }

        let n = interner.len();
        let mut outgoing: Vec<Vec<(EventIdx, D)>> = vec![Vec::new(); n];
        let mut incoming: Vec<Vec<(EventIdx, D)>> = vec![Vec::new(); n];
        for (activity, &duration) in &network.data {
            let from = interner.intern(&activity.trigger);
            let to = interner.intern(&activity.completion);
            outgoing[from as usize].push((to, duration));
            incoming[to as usize].push((from, duration));
        }

        Self {
            interner,
            outgoing,
            incoming,
        }
    }

    pub fn len(&self) -> usize {
        self.interner.len()
    }

    /// Id of `event`, or `UnknownEvent` if no activity references it.
    pub fn index_of(&self, event: &E) -> Result<EventIdx, NetworkError> {
        self.interner
            .get(event)
            .ok_or_else(|| NetworkError::UnknownEvent(format!("{:?}", event)))
    }

    /// Debug rendering of an interned event, for messages.
    pub fn describe(&self, idx: EventIdx) -> String {
        match self.interner.resolve(idx) {
            Some(event) => format!("{:?}", event),
            None => format!("#{}", idx),
        }
    }

    /// Order events so every activity's trigger precedes its completion (Kahn's algorithm).
    pub fn topological_order(&self) -> Result<Vec<EventIdx>, NetworkError> {
        let n = self.len();
        let mut in_degree: Vec<usize> = self.incoming.iter().map(Vec::len).collect();

        let mut queue: VecDeque<EventIdx> = (0..n as EventIdx)
            .filter(|&i| in_degree[i as usize] == 0)
            .collect();

        let mut order: Vec<EventIdx> = Vec::with_capacity(n);
        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            for &(next, _) in &self.outgoing[idx as usize] {
                let degree = &mut in_degree[next as usize];
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(next);
                }
            }
        }

        if order.len() != n {
            return Err(NetworkError::Cycle);
        }
        Ok(order)
    }

    /// First activity found that closes a loop reachable from `start`
    /// without passing through `finish`.
    ///
    /// Depth-first with three marks, so every event and activity is visited
    /// at most once.
    pub fn find_loop(&self, start: EventIdx, finish: EventIdx) -> Option<(EventIdx, EventIdx)> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Unseen,
            OnBranch,
            Done,
        }

        let mut marks = vec![Mark::Unseen; self.len()];
        marks[start as usize] = Mark::OnBranch;
        let mut stack: Vec<(EventIdx, usize)> = vec![(start, 0)];

        while let Some(top) = stack.last_mut() {
            let (node, cursor) = *top;
            let Some(&(next, _)) = self.outgoing[node as usize].get(cursor) else {
                marks[node as usize] = Mark::Done;
                stack.pop();
                continue;
            };
            top.1 += 1;

            match marks[next as usize] {
                Mark::OnBranch => return Some((node, next)),
                Mark::Done => {}
                Mark::Unseen if next == finish => marks[next as usize] = Mark::Done,
                Mark::Unseen => {
                    marks[next as usize] = Mark::OnBranch;
                    stack.push((next, 0));
                }
            }
        }
        None
    }
}

impl<E: EventId, D: TimeSpan> Network<E, D> {
    /// Paths from `start` that revisit an event before reaching `finish`.
    ///
    /// Each loop path ends with the activity that closes the loop. Branches
    /// stop at the first repeated event, so this terminates on cyclic graphs.
    pub fn loop_paths(&self, start: &E, finish: &E) -> Result<Vec<Path<E, D>>, NetworkError> {
        let graph = IndexedGraph::build(self);
        Walk::new(&graph, WalkMode::Loops, &self.config).run(
            graph.index_of(start)?,
            graph.index_of(finish)?,
        )
    }

    /// Check for exactly one initial event, exactly one terminal event, and
    /// no loop between them.
    pub fn validate(&self) -> Result<(), NetworkError> {
        let initial = self.initial_event()?;
        let terminal = self.terminal_event()?;
        log_checks!(
            self.config.verbosity,
            "Initial event {:?}, terminal event {:?}",
            initial,
            terminal
        );

        let graph = IndexedGraph::build(self);
        let start = graph.index_of(&initial)?;
        let finish = graph.index_of(&terminal)?;
        if let Some((from, to)) = graph.find_loop(start, finish) {
            log_checks!(
                self.config.verbosity,
                "Loop closed by {} ---> {}",
                graph.describe(from),
                graph.describe(to)
            );
            return Err(NetworkError::Cycle);
        }
        Ok(())
    }

    pub fn is_well_formed(&self) -> bool {
        self.validate().is_ok()
    }

    /// Events in an order where every activity's trigger precedes its completion.
    ///
    /// Fails with `Cycle` if any directed cycle exists, even one unreachable
    /// from the initial event.
    pub fn topological_events(&self) -> Result<Vec<E>, NetworkError> {
        let graph = IndexedGraph::build(self);
        let order = graph.topological_order()?;
        Ok(order
            .into_iter()
            .filter_map(|i| graph.interner.resolve(i).cloned())
            .collect())
    }
}
