pub type TidelineResult<T> = Result<T, TidelineError>;

#[derive(thiserror::Error, Debug)]
pub enum TidelineError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("unresolved label '{0}'")]
    UnresolvedLabel(String),

    #[error("invalid activation window: {0}")]
    InvalidWindow(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TidelineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_window(msg: impl Into<String>) -> Self {
        Self::InvalidWindow(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            TidelineError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            TidelineError::UnresolvedLabel("intro".into())
                .to_string()
                .contains("unresolved label 'intro'")
        );
        assert!(
            TidelineError::invalid_window("x")
                .to_string()
                .contains("invalid activation window:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = TidelineError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
