use thiserror::Error;

/// Errors raised while setting up a dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("No tokio runtime available to run effects; build inside a runtime or pass a handle")]
    NoRuntime(#[source] tokio::runtime::TryCurrentError),
}

/// An effect that did not complete normally.
///
/// These never reach the dispatch sink. They are logged according to the
/// dispatcher's failure policy and, when a report channel is installed,
/// forwarded there.
#[derive(Debug, Error)]
pub enum EffectError {
    #[error("Effect '{label}' failed: {source}")]
    Failed {
        label: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Effect '{label}' panicked: {message}")]
    Panicked { label: String, message: String },

    #[error("Effect '{label}' was cancelled before completing")]
    Cancelled { label: String },
}

impl EffectError {
    pub fn label(&self) -> &str {
        match self {
            EffectError::Failed { label, .. }
            | EffectError::Panicked { label, .. }
            | EffectError::Cancelled { label } => label,
        }
    }

    pub(crate) fn from_join(label: String, err: tokio::task::JoinError) -> Self {
        if !err.is_panic() {
            return EffectError::Cancelled { label };
        }
        let payload = err.into_panic();
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        EffectError::Panicked { label, message }
    }
}
