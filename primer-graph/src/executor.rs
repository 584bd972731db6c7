//! Running a compiled graph in super-steps.
//!
//! A super-step runs every pending node concurrently against one snapshot of
//! the state. Once all of them return, their writes are folded in through the
//! schema reducers, in the order the nodes were scheduled. The next pending
//! set is whatever the outgoing edges of the executed nodes lead to.

use crate::error::{GraphError, Result};
use crate::graph::CompiledGraph;
use crate::node::{ExecutionConfig, NodeContext};
use crate::state::State;
use crate::stream::{StreamEvent, StreamMode};
use futures::Stream;
use futures::future::join_all;
use std::time::Instant;
use tracing::debug;

/// What one super-step produced, per node and in scheduling order.
#[derive(Default)]
struct StepReport {
    writes: Vec<(String, State)>,
    timings: Vec<(String, u64)>,
}

/// State of a single run.
struct Run<'g> {
    graph: &'g CompiledGraph,
    config: ExecutionConfig,
    limit: usize,
    state: State,
    steps: usize,
}

impl<'g> Run<'g> {
    fn new(graph: &'g CompiledGraph, config: ExecutionConfig, input: State) -> Self {
        let limit = config.recursion_limit.unwrap_or(graph.recursion_limit);
        let mut state = graph.schema.initialize_state();
        graph.schema.apply_all(&mut state, &input);
        Self { graph, config, limit, state, steps: 0 }
    }

    async fn super_step(&mut self, pending: &[String]) -> Result<StepReport> {
        if self.steps >= self.limit {
            return Err(GraphError::RecursionLimitExceeded(self.limit));
        }

        let graph = self.graph;
        let snapshot = NodeContext::new(self.state.clone(), self.config.clone(), self.steps);
        let ctx = &snapshot;
        let running = pending.iter().filter_map(|name| {
            let node = graph.nodes.get(name)?;
            Some(async move {
                let started = Instant::now();
                let output = node.execute(ctx).await;
                (name.clone(), output, started.elapsed().as_millis() as u64)
            })
        });

        let mut report = StepReport::default();
        for (node, output, duration_ms) in join_all(running).await {
            let thread_id = &self.config.thread_id;
            debug!(%thread_id, node = %node, step = self.steps, duration_ms, "node finished");
            let output = output.map_err(|e| GraphError::NodeExecutionFailed {
                node: node.clone(),
                message: e.to_string(),
            })?;
            report.timings.push((node.clone(), duration_ms));
            report.writes.push((node, output.updates));
        }

        for (_, updates) in &report.writes {
            graph.schema.apply_all(&mut self.state, updates);
        }
        self.steps += 1;
        Ok(report)
    }
}

impl CompiledGraph {
    /// Runs to completion and returns the final state.
    pub async fn invoke(&self, input: State, config: ExecutionConfig) -> Result<State> {
        let mut run = Run::new(self, config, input);
        let mut pending = self.entry.clone();
        while !pending.is_empty() {
            run.super_step(&pending).await?;
            pending = self.successors(&pending, &run.state)?;
        }
        debug!(thread_id = %run.config.thread_id, steps = run.steps, "graph run finished");
        Ok(run.state)
    }

    /// Runs lazily, yielding events for `mode` and a final [`StreamEvent::Done`].
    ///
    /// The first error is yielded as the last item.
    pub fn stream(
        &self,
        input: State,
        config: ExecutionConfig,
        mode: StreamMode,
    ) -> impl Stream<Item = Result<StreamEvent>> + '_ {
        async_stream::try_stream! {
            let mut run = Run::new(self, config, input);
            let mut pending = self.entry.clone();

            if mode == StreamMode::Values {
                yield StreamEvent::Values { step: 0, state: run.state.clone() };
            }

            while !pending.is_empty() {
                let step = run.steps;
                if mode == StreamMode::Debug {
                    for node in &pending {
                        yield StreamEvent::NodeStart { step, node: node.clone() };
                    }
                }

                let report = run.super_step(&pending).await?;
                match mode {
                    StreamMode::Values => {
                        yield StreamEvent::Values { step: run.steps, state: run.state.clone() };
                    }
                    StreamMode::Updates => {
                        for (node, updates) in report.writes {
                            yield StreamEvent::Updates { step, node, updates };
                        }
                    }
                    StreamMode::Debug => {
                        let nodes = report.timings.iter().map(|(node, _)| node.clone()).collect();
                        for (node, duration_ms) in report.timings {
                            yield StreamEvent::NodeEnd { step, node, duration_ms };
                        }
                        yield StreamEvent::StepComplete { step, nodes };
                    }
                }

                pending = self.successors(&pending, &run.state)?;
            }

            yield StreamEvent::Done { total_steps: run.steps, state: run.state };
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::edge::{END, START};
    use crate::graph::StateGraph;
    use crate::node::{ExecutionConfig, NodeOutput};
    use crate::state::State;
    use crate::GraphError;
    use serde_json::json;

    fn counter_loop() -> crate::CompiledGraph {
        StateGraph::with_channels(&["count"])
            .add_node_fn("tick", |ctx| async move {
                let count = ctx.get("count").and_then(|v| v.as_i64()).unwrap_or(0);
                Ok(NodeOutput::new().with_update("count", count + 1))
            })
            .add_edge(START, "tick")
            .add_edge("tick", "tick")
            .compile()
            .unwrap()
    }

    #[tokio::test]
    async fn test_single_node_run() {
        let graph = StateGraph::with_channels(&["answer"])
            .add_node_fn("answer", |_ctx| async { Ok(NodeOutput::new().with_update("answer", 42)) })
            .add_edge(START, "answer")
            .add_edge("answer", END)
            .compile()
            .unwrap();

        let state = graph.invoke(State::new(), ExecutionConfig::new("t")).await.unwrap();
        assert_eq!(state["answer"], json!(42));
    }

    #[tokio::test]
    async fn test_graph_limit_applies() {
        let graph = counter_loop().with_recursion_limit(10);
        let err = graph.invoke(State::new(), ExecutionConfig::new("t")).await;
        assert!(matches!(err, Err(GraphError::RecursionLimitExceeded(10))));
    }

    #[tokio::test]
    async fn test_config_limit_wins() {
        let config = ExecutionConfig::new("t").with_recursion_limit(3);
        let err = counter_loop().invoke(State::new(), config).await;
        assert!(matches!(err, Err(GraphError::RecursionLimitExceeded(3))));
    }
}
