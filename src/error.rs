pub type VisregResult<T> = Result<T, VisregError>;

#[derive(thiserror::Error, Debug)]
pub enum VisregError {
    /// An element resolved to a zero-width or zero-height rectangle.
    #[error("invisible element: {0}")]
    InvisibleElement(String),

    /// No baseline image exists and neither auto-save nor update was enabled.
    #[error("baseline missing: {0}")]
    BaselineMissing(String),

    /// The baseline image could not be written or copied.
    #[error("baseline write failed: {0}")]
    BaselineWrite(String),

    /// A stale diff artifact exists but could not be deleted.
    #[error("diff removal failed: {0}")]
    DiffRemoval(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VisregError {
    pub fn invisible_element(msg: impl Into<String>) -> Self {
        Self::InvisibleElement(msg.into())
    }

    pub fn baseline_missing(msg: impl Into<String>) -> Self {
        Self::BaselineMissing(msg.into())
    }

    pub fn baseline_write(msg: impl Into<String>) -> Self {
        Self::BaselineWrite(msg.into())
    }

    pub fn diff_removal(msg: impl Into<String>) -> Self {
        Self::DiffRemoval(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
