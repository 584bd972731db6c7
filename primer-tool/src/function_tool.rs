use async_trait::async_trait;
use primer_core::{PrimerError, Result, Tool, ToolContext};
use schemars::{JsonSchema, r#gen::SchemaSettings};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type AsyncHandler = Box<
    dyn Fn(Arc<dyn ToolContext>, Value) -> Pin<Box<dyn Future<Output = Result<Value>> + Send>>
        + Send
        + Sync,
>;

/// A tool backed by an async closure.
pub struct FunctionTool {
    name: String,
    description: String,
    handler: AsyncHandler,
    parameters_schema: Option<Value>,
}

impl FunctionTool {
    pub fn new<F, Fut>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Arc<dyn ToolContext>, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            handler: Box::new(move |ctx, args| Box::pin(handler(ctx, args))),
            parameters_schema: None,
        }
    }

    /// Derive the argument schema from `T`.
    pub fn with_parameters_schema<T: JsonSchema>(mut self) -> Self {
        self.parameters_schema = Some(schema_for::<T>());
        self
    }

    /// Use a hand-written argument schema.
    pub fn with_parameters(mut self, schema: Value) -> Self {
        self.parameters_schema = Some(schema);
        self
    }
}

/// Inline, metadata-free schema for `T`.
fn schema_for<T: JsonSchema>() -> Value {
    let settings = SchemaSettings::openapi3().with(|s| {
        s.inline_subschemas = true;
        s.meta_schema = None;
    });
    let generator = schemars::r#gen::SchemaGenerator::new(settings);
    let mut schema = generator.into_root_schema_for::<T>();
    schema.schema.metadata().title = None;
    serde_json::to_value(schema.schema).unwrap_or(Value::Null)
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> Option<Value> {
        self.parameters_schema.clone()
    }

    async fn execute(&self, ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        tracing::debug!(tool = %self.name, call_id = ctx.function_call_id(), "executing tool");
        (self.handler)(ctx, args).await
    }
}

/// Reads a required integer argument.
///
/// Whole-number floats are accepted, since models sometimes send `4.0` for
/// `4`. Numbers that do not fit in an `i64` are rejected rather than clamped.
pub fn required_i64(args: &Value, key: &str) -> Result<i64> {
    let number = match args.get(key) {
        None | Some(Value::Null) => {
            return Err(PrimerError::Tool(format!("missing argument '{key}'")));
        }
        Some(Value::Number(number)) => number,
        Some(_) => return Err(PrimerError::Tool(format!("argument '{key}' must be an integer"))),
    };
    if let Some(n) = number.as_i64() {
        return Ok(n);
    }

    let out_of_range = || PrimerError::Tool(format!("argument '{key}' is out of range"));
    if number.is_u64() {
        return Err(out_of_range());
    }
    match number.as_f64() {
        Some(f) if f.fract() != 0.0 => {
            Err(PrimerError::Tool(format!("argument '{key}' must be an integer")))
        }
        // i64::MAX as f64 rounds up to 2^63, which no longer fits.
        Some(f) if f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(out_of_range()),
    }
}

/// Reads a required string argument.
pub fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    match args.get(key) {
        None | Some(Value::Null) => Err(PrimerError::Tool(format!("missing argument '{key}'"))),
        Some(value) => value
            .as_str()
            .ok_or_else(|| PrimerError::Tool(format!("argument '{key}' must be a string"))),
    }
}
