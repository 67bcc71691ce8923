//! Aggregation model: a single-consumer reducer over probe events.
//!
//! The model exclusively owns the ordered probe history. Producers (dispatch
//! loop, probe tasks, input handling) only ever send events; all mutation
//! happens through [`Model::apply`] on the UI task, so the history needs no
//! locking.

use indexmap::IndexMap;

use crate::probe::ProbeReport;

/// Events consumed by the model. Everything flows through one channel so the
/// history stays consistent regardless of completion order.
#[derive(Debug)]
pub enum Event {
    /// A new id was dispatched; its probe is now in flight.
    Dispatched { id: u64 },
    /// A probe finished. Completions arrive in any order.
    Completed(ProbeReport),
    /// Terminal width changed.
    Resized { width: u16 },
    /// User asked to quit.
    Quit,
    /// Every dispatched probe has completed after the limit was reached.
    Drained,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Running,
    Exiting,
}

/// One entry in the history.
#[derive(Debug)]
pub enum ProbeState {
    Pending,
    Done(ProbeReport),
}

/// Ordered probe history plus display state.
///
/// Entries are keyed by probe id in dispatch order; a completion updates its
/// entry in place and never moves it.
#[derive(Debug)]
pub struct Model {
    history: IndexMap<u64, ProbeState>,
    pub width: u16,
    /// Number of entries shown in the live view.
    pub window: usize,
    state: RunState,
}

impl Model {
    pub fn new(window: usize) -> Self {
        Self {
            history: IndexMap::new(),
            width: 0,
            window,
            state: RunState::Running,
        }
    }

    pub fn apply(&mut self, event: Event) {
        match event {
            Event::Dispatched { id } => {
                // Ids are unique by construction; a duplicate dispatch must
                // not knock out an already recorded outcome.
                self.history.entry(id).or_insert(ProbeState::Pending);
            }
            Event::Completed(report) => {
                // Out-of-order completion: the record may be anywhere near
                // the tail, so look it up by id rather than by position.
                match self.history.get_mut(&report.id) {
                    Some(state) => *state = ProbeState::Done(report),
                    None => {
                        self.history.insert(report.id, ProbeState::Done(report));
                    }
                }
            }
            Event::Resized { width } => self.width = width,
            Event::Quit | Event::Drained => self.state = RunState::Exiting,
        }
    }

    pub fn exiting(&self) -> bool {
        self.state == RunState::Exiting
    }

    pub fn history(&self) -> &IndexMap<u64, ProbeState> {
        &self.history
    }
}
