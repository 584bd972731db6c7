//! Graph construction and compilation tests

use primer_graph::{
    DEFAULT_RECURSION_LIMIT, END, GraphError, NodeOutput, START, StateGraph, StateSchema,
    tools_condition,
};

fn noop(graph: StateGraph, name: &str) -> StateGraph {
    graph.add_node_fn(name, |_ctx| async move { Ok(NodeOutput::new()) })
}

#[test]
fn test_react_shape_compiles() {
    let graph = noop(noop(StateGraph::new(StateSchema::messages()), "agent"), "tools")
        .add_edge(START, "agent")
        .add_conditional_edges("agent", tools_condition, [("tools", "tools"), (END, END)])
        .add_edge("tools", "agent")
        .compile()
        .unwrap();

    assert_eq!(graph.recursion_limit(), DEFAULT_RECURSION_LIMIT);
    assert_eq!(graph.entry_nodes(), ["agent".to_string()]);
    assert_eq!(graph.node_names(), vec!["agent".to_string(), "tools".to_string()]);
}

#[test]
fn test_graph_missing_entry() {
    let graph = noop(StateGraph::new(StateSchema::messages()), "process")
        .add_edge("process", END)
        .compile();

    assert!(matches!(graph, Err(GraphError::NoEntryPoint)));
}

#[test]
fn test_edge_to_unknown_node() {
    let graph = noop(StateGraph::new(StateSchema::messages()), "process")
        .add_edge(START, "process")
        .add_edge("process", "nonexistent")
        .compile();

    assert!(matches!(graph, Err(GraphError::EdgeTargetNotFound(ref n)) if n == "nonexistent"));
}

#[test]
fn test_edge_from_unknown_node() {
    let graph = noop(StateGraph::new(StateSchema::messages()), "process")
        .add_edge(START, "process")
        .add_edge("ghost", "process")
        .compile();

    assert!(matches!(graph, Err(GraphError::NodeNotFound(ref n)) if n == "ghost"));
}

#[test]
fn test_conditional_target_must_exist() {
    let graph = noop(StateGraph::new(StateSchema::messages()), "llm")
        .add_edge(START, "llm")
        .add_conditional_edges("llm", tools_condition, [("tools", "retriever_agent"), (END, END)])
        .compile();

    assert!(matches!(graph, Err(GraphError::EdgeTargetNotFound(ref n)) if n == "retriever_agent"));
}

#[test]
fn test_reserved_node_names_rejected() {
    let graph = noop(StateGraph::new(StateSchema::messages()), END).add_edge(START, END).compile();
    assert!(matches!(graph, Err(GraphError::InvalidGraph(_))));

    let graph = noop(StateGraph::new(StateSchema::messages()), START).compile();
    assert!(matches!(graph, Err(GraphError::InvalidGraph(_))));
}

#[test]
fn test_multiple_entry_edges_merge() {
    let graph = noop(noop(StateGraph::with_channels(&["a", "b"]), "left"), "right")
        .add_edge(START, "left")
        .add_edge(START, "right")
        .add_edge(START, "left")
        .add_edge("left", END)
        .add_edge("right", END)
        .compile()
        .unwrap();

    assert_eq!(graph.entry_nodes(), ["left".to_string(), "right".to_string()]);
}
