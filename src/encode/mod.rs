//! Frame sinks.
//!
//! Sinks consume rendered frames in order and are driven by [`crate::render_animation`].

/// Looping GIF output via staged PNG frames.
pub(crate) mod gif;
/// Generic frame sink trait and the in-memory sink.
pub(crate) mod sink;
