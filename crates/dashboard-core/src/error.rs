use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {detail}")]
    Http { status: u16, detail: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Not logged in")]
    Unauthenticated,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// Text shown to the user in alerts and failure cards.
    ///
    /// Server-supplied details are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Http { detail, .. } => detail.clone(),
            DashboardError::Network(_) => "Network Error".to_string(),
            DashboardError::InvalidInput(msg)
            | DashboardError::InsufficientData(msg)
            | DashboardError::InvalidResponse(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DashboardError::Http { status: 404, .. })
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            DashboardError::InvalidResponse(e.to_string())
        } else if e.is_timeout() {
            DashboardError::Network(format!("request timed out: {}", e))
        } else {
            DashboardError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        DashboardError::InvalidResponse(e.to_string())
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_detail_is_verbatim() {
        let err = DashboardError::Http {
            status: 501,
            detail: "TensorFlow/Keras not installed".to_string(),
        };
        assert_eq!(err.user_message(), "TensorFlow/Keras not installed");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_network_message() {
        let err = DashboardError::Network("connection refused".to_string());
        assert_eq!(err.user_message(), "Network Error");
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn test_not_found() {
        let err = DashboardError::Http {
            status: 404,
            detail: "No data found for ZZZZ".to_string(),
        };
        assert!(err.is_not_found());
    }
}
