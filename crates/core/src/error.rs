#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate connection: {connection_id}")]
    DuplicateConnection { connection_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_their_context() {
        let err = CoreError::Validation("missing businessId".into());
        assert_eq!(err.to_string(), "Validation failed: missing businessId");

        let err = CoreError::DuplicateConnection {
            connection_id: "c-1".into(),
        };
        assert_eq!(err.to_string(), "Duplicate connection: c-1");
    }
}
