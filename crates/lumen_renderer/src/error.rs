//! Errors raised while configuring a render.
//!
//! Misses, absorption and the bounce limit are ordinary outcomes of tracing
//! and never show up here.

use thiserror::Error;

/// Errors that can occur while building a scene or render job.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Invalid argument `{name}`: {message}")]
    InvalidArgument {
        name: &'static str,
        message: String,
    },

    #[error("Sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
