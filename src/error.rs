use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Push channel error: {0}")]
    Transport(String),

    #[error("Request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    #[error("Request to {endpoint} returned HTTP {status}")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn request(endpoint: &str, err: impl std::fmt::Display) -> Self {
        AppError::Request {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_faults_name_the_endpoint() {
        let err = AppError::request("/api/alerts", "connection refused");
        assert_eq!(
            err.to_string(),
            "Request to /api/alerts failed: connection refused"
        );

        let err = AppError::HttpStatus {
            endpoint: "/api/network/nodes".to_string(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "Request to /api/network/nodes returned HTTP 503"
        );
    }
}
