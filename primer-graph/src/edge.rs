//! Control flow between nodes.

use crate::error::{GraphError, Result};
use crate::state::State;
use std::collections::HashMap;
use std::sync::Arc;

/// Pseudo-node every run starts from.
pub const START: &str = "__start__";
/// Pseudo-node that finishes a path.
pub const END: &str = "__end__";

/// Picks a route key from the state after its source node ran.
pub(crate) type Router = Arc<dyn Fn(&State) -> String + Send + Sync>;

/// An outgoing edge, stored under its source node.
pub(crate) enum Edge {
    Direct(String),
    Conditional { router: Router, routes: HashMap<String, String> },
}

impl Edge {
    /// Every node this edge may lead to, END included.
    pub(crate) fn targets(&self) -> Vec<&str> {
        match self {
            Self::Direct(target) => vec![target.as_str()],
            Self::Conditional { routes, .. } => routes.values().map(String::as_str).collect(),
        }
    }

    /// The node to run after `source`, or `None` when the path reached END.
    ///
    /// A router may return END without mapping it.
    pub(crate) fn follow(&self, source: &str, state: &State) -> Result<Option<String>> {
        let target = match self {
            Self::Direct(target) => target.clone(),
            Self::Conditional { router, routes } => {
                let key = router(state);
                match routes.get(&key) {
                    Some(target) => target.clone(),
                    None if key == END => return Ok(None),
                    None => {
                        return Err(GraphError::UnknownRouteTarget {
                            source_node: source.to_string(),
                            route: key,
                        });
                    }
                }
            }
        };
        Ok((target != END).then_some(target))
    }
}
