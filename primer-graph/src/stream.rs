//! What [`CompiledGraph::stream`](crate::CompiledGraph::stream) yields.

use crate::state::{MESSAGES, State};
use primer_core::{Message, messages_from_value};

/// Which events a stream carries besides the final [`StreamEvent::Done`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamMode {
    /// The whole state: once before the first step, then after every step.
    #[default]
    Values,
    /// One event per executed node with exactly what that node returned.
    Updates,
    /// Node start and end timings plus step boundaries.
    Debug,
}

#[derive(Clone, Debug)]
pub enum StreamEvent {
    /// Full state after `step` super-steps.
    Values { step: usize, state: State },
    /// The writes `node` returned during `step`, before reducers ran.
    Updates { step: usize, node: String, updates: State },
    NodeStart { step: usize, node: String },
    NodeEnd { step: usize, node: String, duration_ms: u64 },
    StepComplete { step: usize, nodes: Vec<String> },
    /// Always last on a successful run.
    Done { state: State, total_steps: usize },
}

impl StreamEvent {
    /// Messages carried by a `Values`, `Updates` or `Done` event.
    ///
    /// For `Updates` these are only the node's new messages. Events without a
    /// parseable `messages` channel yield `None`.
    pub fn messages(&self) -> Option<Vec<Message>> {
        let channels = match self {
            Self::Values { state, .. } | Self::Done { state, .. } => state,
            Self::Updates { updates, .. } => updates,
            _ => return None,
        };
        messages_from_value(channels.get(MESSAGES)?).ok()
    }

    /// Last message of [`StreamEvent::messages`].
    pub fn last_message(&self) -> Option<Message> {
        self.messages()?.pop()
    }
}
