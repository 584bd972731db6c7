//! Graph state: named channels of JSON values, each merged by its own reducer.
//!
//! Every agent in this workspace keeps its conversation in the [`MESSAGES`]
//! channel. [`StateSchema::messages`] appends what a node returns to that
//! history, while [`StateSchema::overwrite`] lets a node replace it outright.

use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Channel values keyed by channel name.
pub type State = HashMap<String, Value>;

/// The conversation channel.
pub const MESSAGES: &str = "messages";

/// User-supplied merge of `(current, update)`.
pub type MergeFn = Arc<dyn Fn(Value, Value) -> Value + Send + Sync>;

/// How a channel folds a node's write into its current value.
#[derive(Clone, Default)]
pub enum Reducer {
    /// The write replaces the current value.
    #[default]
    Overwrite,
    /// Arrays are concatenated; a scalar write is pushed as one element.
    Append,
    /// Numbers are added. Integers stay integers unless the sum overflows.
    Sum,
    Custom(MergeFn),
}

impl Reducer {
    /// Merges `update` into `current` (absent when the channel is unset).
    pub fn merge(&self, current: Option<Value>, update: Value) -> Value {
        match self {
            Self::Overwrite => update,
            Self::Append => {
                let mut items = match current {
                    None | Some(Value::Null) => Vec::new(),
                    Some(Value::Array(items)) => items,
                    Some(single) => vec![single],
                };
                match update {
                    Value::Array(more) => items.extend(more),
                    single => items.push(single),
                }
                Value::Array(items)
            }
            Self::Sum => {
                let current = current.unwrap_or(json!(0));
                match (current.as_i64(), update.as_i64()) {
                    (Some(a), Some(b)) if a.checked_add(b).is_some() => json!(a + b),
                    _ => json!(current.as_f64().unwrap_or(0.0) + update.as_f64().unwrap_or(0.0)),
                }
            }
            Self::Custom(merge) => merge(current.unwrap_or(Value::Null), update),
        }
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Overwrite => "Overwrite",
            Self::Append => "Append",
            Self::Sum => "Sum",
            Self::Custom(_) => "Custom(..)",
        })
    }
}

/// A named slot in the state together with its reducer and starting value.
#[derive(Clone, Debug)]
pub struct Channel {
    pub name: String,
    pub reducer: Reducer,
    pub default: Option<Value>,
}

impl Channel {
    /// An overwrite channel with no starting value.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), reducer: Reducer::Overwrite, default: None }
    }

    /// An append channel starting as `[]`.
    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name).with_reducer(Reducer::Append).with_default(json!([]))
    }

    /// A sum channel starting at `0`.
    pub fn counter(name: impl Into<String>) -> Self {
        Self::new(name).with_reducer(Reducer::Sum).with_default(json!(0))
    }

    pub fn with_reducer(mut self, reducer: Reducer) -> Self {
        self.reducer = reducer;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// The channels a graph knows about.
///
/// Writes to a channel the schema does not declare overwrite.
#[derive(Clone, Debug, Default)]
pub struct StateSchema {
    channels: BTreeMap<String, Channel>,
}

impl StateSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> StateSchemaBuilder {
        StateSchemaBuilder::default()
    }

    /// Message state: node replies are appended to [`MESSAGES`].
    pub fn messages() -> Self {
        Self::builder().channel(Channel::list(MESSAGES)).build()
    }

    /// Plain overwrite channels, for graphs whose nodes own the whole value.
    pub fn overwrite(names: &[&str]) -> Self {
        names
            .iter()
            .fold(Self::builder(), |builder, name| builder.channel(Channel::new(*name)))
            .build()
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }

    /// Folds one write into `state` with the channel's reducer.
    pub fn apply_update(&self, state: &mut State, key: &str, value: Value) {
        let merged = match self.channels.get(key) {
            Some(channel) => channel.reducer.merge(state.remove(key), value),
            None => value,
        };
        state.insert(key.to_string(), merged);
    }

    /// Folds every write of one node into `state`.
    pub fn apply_all(&self, state: &mut State, updates: &State) {
        for (key, value) in updates {
            self.apply_update(state, key, value.clone());
        }
    }

    /// A fresh state holding each channel's starting value.
    pub fn initialize_state(&self) -> State {
        self.channels
            .values()
            .filter_map(|c| c.default.clone().map(|value| (c.name.clone(), value)))
            .collect()
    }
}

#[derive(Default)]
pub struct StateSchemaBuilder {
    schema: StateSchema,
}

impl StateSchemaBuilder {
    /// Declares `channel`, replacing an earlier one of the same name.
    pub fn channel(mut self, channel: Channel) -> Self {
        self.schema.channels.insert(channel.name.clone(), channel);
        self
    }

    pub fn build(self) -> StateSchema {
        self.schema
    }
}
