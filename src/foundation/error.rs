/// Convenience result type used across Keystage.
pub type KeystageResult<T> = Result<T, KeystageError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum KeystageError {
    /// Invalid user-provided or scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Track or keyframe invariants that cannot be recovered.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KeystageError {
    /// Build a [`KeystageError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KeystageError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`KeystageError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Non-fatal anomaly the engine recovered from.
///
/// Query and command paths never fail during playback; instead they repair the data and report
/// what they did so editors can surface it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A track had no keyframes and was replaced by a default keyframe at frame 0.
    EmptyTrack {
        /// Owner of the repaired track.
        owner: String,
    },
    /// Keyframes past the scene duration were removed.
    KeyframesDropped {
        /// Owner of the affected track.
        owner: String,
        /// Number of removed keyframes.
        count: usize,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTrack { owner } => {
                write!(f, "track of '{owner}' was empty; using a default keyframe")
            }
            Self::KeyframesDropped { owner, count } => {
                write!(f, "dropped {count} out-of-range keyframe(s) from '{owner}'")
            }
        }
    }
}

/// A value together with the warnings produced while building it.
#[derive(Clone, Debug)]
pub struct Recovered<T> {
    /// The (possibly repaired) value.
    pub value: T,
    /// Anomalies encountered along the way, in discovery order.
    pub warnings: Vec<Warning>,
}

impl<T> Recovered<T> {
    /// Wrap a value that needed no repair.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Transform the value while keeping the collected warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Recovered<U> {
        Recovered {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
