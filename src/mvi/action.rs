//! Base trait for actions (events) flowing through the pipeline.

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

/// An event that drives state transitions.
///
/// Actions represent:
/// - User or system requests (fetch, refresh)
/// - Results produced by effects (data loaded, request failed)
///
/// Only the kind is inspected by this crate, and only to decide whether an
/// effect result is worth dispatching.
pub trait Action: fmt::Debug + Send + 'static {
    /// Routing discriminator. `None` means the value carries no usable kind.
    fn kind(&self) -> Option<Cow<'_, str>>;

    /// Whether an effect result should be forwarded to the dispatch sink.
    fn is_dispatchable(&self) -> bool {
        self.kind().is_some()
    }
}

/// Untyped actions: an object with a truthy `"type"` field.
///
/// `null`, `false`, `0` and `""` count as missing, matching the
/// `action && action.type` check used by JavaScript stores.
impl Action for Value {
    fn kind(&self) -> Option<Cow<'_, str>> {
        match self.get("type")? {
            Value::Null | Value::Bool(false) => None,
            Value::Bool(true) => Some(Cow::Borrowed("true")),
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}
