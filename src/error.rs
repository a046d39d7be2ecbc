/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code with the server's error message.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// Request body could not be serialized to JSON.
    #[error("encode error: {0}")]
    Encode(String),
    /// Response body could not be parsed into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
    /// Caller-supplied input rejected before any request was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Background worker ended without delivering a result.
    #[error("dispatch error: {0}")]
    Dispatch(String),
}

impl ClientError {
    /// HTTP status of a rejected request, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_status(&self, code: u16) -> bool {
        self.status() == Some(code)
    }

    /// True when the server could not be reached (connect, read, timeout).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::ClientError;

    #[test]
    fn status_is_only_reported_for_http_errors() {
        let rejected = ClientError::Http {
            status: 409,
            message: "conflict".to_owned(),
        };
        assert_eq!(rejected.status(), Some(409));
        assert!(rejected.is_status(409));
        assert!(!rejected.is_transport());

        let decode = ClientError::Decode("bad json".to_owned());
        assert_eq!(decode.status(), None);
        assert!(!decode.is_status(409));
    }

    #[test]
    fn http_error_display_carries_status_and_message() {
        let err = ClientError::Http {
            status: 401,
            message: "bad credentials".to_owned(),
        };
        assert_eq!(err.to_string(), "HTTP 401: bad credentials");
    }
}
