//! Building and validating graphs.

use crate::edge::{END, Edge, START};
use crate::error::{GraphError, Result};
use crate::node::{FunctionNode, Node, NodeContext, NodeOutput};
use crate::state::{State, StateSchema};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Super-steps a run may take before it is aborted.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// Graph under construction. Nothing is checked until [`StateGraph::compile`].
pub struct StateGraph {
    schema: StateSchema,
    nodes: HashMap<String, Arc<dyn Node>>,
    entry: Vec<String>,
    edges: Vec<(String, Edge)>,
}

impl StateGraph {
    pub fn new(schema: StateSchema) -> Self {
        Self { schema, nodes: HashMap::new(), entry: Vec::new(), edges: Vec::new() }
    }

    /// A graph whose channels all overwrite.
    pub fn with_channels(channels: &[&str]) -> Self {
        Self::new(StateSchema::overwrite(channels))
    }

    /// Adds `node` under its own name, replacing any node of that name.
    pub fn add_node<N: Node + 'static>(mut self, node: N) -> Self {
        self.nodes.insert(node.name().to_string(), Arc::new(node));
        self
    }

    pub fn add_node_fn<F, Fut>(self, name: &str, run: F) -> Self
    where
        F: Fn(NodeContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<NodeOutput>> + Send + 'static,
    {
        self.add_node(FunctionNode::new(name, run))
    }

    /// `source` is always followed by `target`. Edges from START mark entry nodes.
    pub fn add_edge(mut self, source: &str, target: &str) -> Self {
        if source != START {
            self.edges.push((source.to_string(), Edge::Direct(target.to_string())));
        } else if target != END && !self.entry.iter().any(|n| n == target) {
            self.entry.push(target.to_string());
        }
        self
    }

    /// After `source` runs, `router` picks a key of `routes`; the mapped node runs next.
    pub fn add_conditional_edges<F, I>(mut self, source: &str, router: F, routes: I) -> Self
    where
        F: Fn(&State) -> String + Send + Sync + 'static,
        I: IntoIterator<Item = (&'static str, &'static str)>,
    {
        let routes =
            routes.into_iter().map(|(key, to)| (key.to_string(), to.to_string())).collect();
        let edge = Edge::Conditional { router: Arc::new(router), routes };
        self.edges.push((source.to_string(), edge));
        self
    }

    /// Checks the wiring and freezes the graph.
    pub fn compile(self) -> Result<CompiledGraph> {
        if let Some(name) = [START, END].into_iter().find(|n| self.nodes.contains_key(*n)) {
            return Err(GraphError::InvalidGraph(format!("'{name}' cannot be used as a node name")));
        }
        if self.entry.is_empty() {
            return Err(GraphError::NoEntryPoint);
        }

        let is_target = |name: &str| name == END || self.nodes.contains_key(name);
        if let Some(missing) = self.entry.iter().find(|n| !self.nodes.contains_key(*n)) {
            return Err(GraphError::EdgeTargetNotFound(missing.clone()));
        }
        for (source, edge) in &self.edges {
            if !self.nodes.contains_key(source) {
                return Err(GraphError::NodeNotFound(source.clone()));
            }
            if let Some(missing) = edge.targets().into_iter().find(|t| !is_target(t)) {
                return Err(GraphError::EdgeTargetNotFound(missing.to_string()));
            }
        }

        Ok(CompiledGraph {
            schema: self.schema,
            nodes: self.nodes,
            entry: self.entry,
            edges: self.edges,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        })
    }
}

/// A validated graph. Run it with [`invoke`](Self::invoke) or [`stream`](Self::stream).
pub struct CompiledGraph {
    pub(crate) schema: StateSchema,
    pub(crate) nodes: HashMap<String, Arc<dyn Node>>,
    pub(crate) entry: Vec<String>,
    edges: Vec<(String, Edge)>,
    pub(crate) recursion_limit: usize,
}

impl CompiledGraph {
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    /// Nodes reached from START, in the order their edges were added.
    pub fn entry_nodes(&self) -> &[String] {
        &self.entry
    }

    pub fn node_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nodes.keys().cloned().collect();
        names.sort();
        names
    }

    /// Nodes to run after `executed`, following edges in insertion order.
    /// Empty once every path has reached END.
    pub(crate) fn successors(&self, executed: &[String], state: &State) -> Result<Vec<String>> {
        let mut next: Vec<String> = Vec::new();
        for (source, edge) in &self.edges {
            if !executed.contains(source) {
                continue;
            }
            if let Some(target) = edge.follow(source, state)? {
                if !next.contains(&target) {
                    next.push(target);
                }
            }
        }
        Ok(next)
    }
}
