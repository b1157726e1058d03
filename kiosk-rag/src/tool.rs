//! Registry and dispatcher for functions the model may call.
//!
//! Dispatch never fails: an unknown name or a failing function produces a
//! `{"status": "error", "message": ...}` payload that is handed back to the
//! model like any other result.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::error::Result;

/// A local operation the model can request with a function-call directive.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name used in `FUNCTION_CALL[name](...)`.
    fn name(&self) -> &str;

    /// One-line description shown to the model.
    fn description(&self) -> &str;

    /// Declared parameter names. Arguments with other names are dropped.
    fn parameters(&self) -> &[&str];

    /// Run the function with coerced arguments (a JSON object).
    async fn execute(&self, args: Value) -> Result<Value>;
}

/// An ordered set of [`Tool`]s addressed by name.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool, replacing any registered tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(position) => self.tools[position] = tool,
            None => self.tools.push(tool),
        }
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// One `- name: description (Parameters: a, b)` line per tool.
    pub fn describe(&self) -> String {
        self.tools
            .iter()
            .map(|tool| {
                format!(
                    "- {}: {} (Parameters: {})",
                    tool.name(),
                    tool.description(),
                    tool.parameters().join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Invoke `name` with raw string arguments.
    ///
    /// Only declared parameters are forwarded, each coerced with
    /// [`coerce_argument`].
    pub async fn dispatch(&self, name: &str, args: &BTreeMap<String, String>) -> Value {
        let Some(tool) = self.get(name) else {
            warn!(function = name, "model requested an unknown function");
            return error_result(format!("Function {name} not found"));
        };

        let forwarded: Map<String, Value> = tool
            .parameters()
            .iter()
            .filter_map(|param| {
                args.get(*param).map(|raw| (param.to_string(), coerce_argument(raw)))
            })
            .collect();

        info!(function = name, args = ?forwarded, "executing function");
        match tool.execute(Value::Object(forwarded)).await {
            Ok(result) => result,
            Err(e) => {
                warn!(function = name, error = %e, "function failed");
                error_result(format!("Error executing function: {e}"))
            }
        }
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry").field("tools", &self.names()).finish()
    }
}

/// Turn an all-digit argument into an integer; anything else stays a string.
pub fn coerce_argument(raw: &str) -> Value {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(number) = raw.parse::<u64>() {
            return Value::from(number);
        }
    }
    Value::String(raw.to_string())
}

/// The payload returned in place of a failed call.
pub fn error_result(message: impl Into<String>) -> Value {
    json!({ "status": "error", "message": message.into() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RagError;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the arguments back"
        }

        fn parameters(&self) -> &[&str] {
            &["text", "count"]
        }

        async fn execute(&self, args: Value) -> Result<Value> {
            if args.get("text").and_then(Value::as_str) == Some("boom") {
                return Err(RagError::ToolError("exploded".into()));
            }
            Ok(json!({ "status": "success", "args": args }))
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::new().with_tool(Arc::new(EchoTool))
    }

    fn args(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn coerces_digit_strings_only() {
        assert_eq!(coerce_argument("3"), json!(3));
        assert_eq!(coerce_argument("007"), json!(7));
        assert_eq!(coerce_argument("cats"), json!("cats"));
        assert_eq!(coerce_argument("-3"), json!("-3"));
        assert_eq!(coerce_argument("3.5"), json!("3.5"));
        assert_eq!(coerce_argument(""), json!(""));
        assert_eq!(coerce_argument("99999999999999999999999"), json!("99999999999999999999999"));
    }

    #[tokio::test]
    async fn forwards_declared_parameters_with_coercion() {
        let result = registry()
            .dispatch("echo", &args(&[("text", "hi"), ("count", "3"), ("extra", "dropped")]))
            .await;
        assert_eq!(result, json!({ "status": "success", "args": { "text": "hi", "count": 3 } }));
    }

    #[tokio::test]
    async fn unknown_function_is_an_error_payload() {
        let result = registry().dispatch("launch_rocket", &args(&[])).await;
        assert_eq!(result["status"], "error");
        assert_eq!(result["message"], "Function launch_rocket not found");
    }

    #[tokio::test]
    async fn execution_failure_is_an_error_payload() {
        let result = registry().dispatch("echo", &args(&[("text", "boom")])).await;
        assert_eq!(result["status"], "error");
        assert!(result["message"].as_str().unwrap().contains("exploded"));
    }

    #[test]
    fn describe_lists_tools_in_registration_order() {
        assert_eq!(registry().describe(), "- echo: Echo the arguments back (Parameters: text, count)");
    }

    #[test]
    fn register_replaces_same_name() {
        let mut registry = registry();
        registry.register(Arc::new(EchoTool));
        assert_eq!(registry.len(), 1);
    }
}
