use thiserror::Error;

/// Fatal generation errors.
///
/// Both variants indicate a malformed upstream graph rather than a
/// recoverable documentation gap, so they propagate to the top of the
/// generation run and abort it before any output file is written.
/// Recoverable conditions (unresolvable links, unknown tags or kinds) never
/// surface here; they degrade in place.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A node of a kind that mandates structure is missing it, or the graph
    /// document itself is inconsistent (dangling reference, duplicate id).
    #[error("malformed symbol graph: {0}")]
    Structural(String),

    /// A page-owning node carries no source location, so no stable file
    /// name can be derived for it.
    #[error("source location not found for page node \"{0}\"")]
    MissingSource(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
