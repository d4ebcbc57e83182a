//! Errors raised by the connection, session multiplexer and host dispatch.

use acp_schema::{error_codes, JsonRpcError};
use thiserror::Error;

/// A specialized `Result` type for `acp-core` operations.
pub type AcpResult<T> = std::result::Result<T, AcpError>;

/// Errors raised above the wire/transport layer.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum AcpError {
    /// The requested method has no registered callback (spec §4.3).
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// `params` did not match the shape the method expects.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// A referenced resource (session, terminal, file) does not exist.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// The host refused the operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The operation is not valid in the connection's/session's current
    /// state (e.g. `session/new` before a required `authenticate`).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The peer requested something neither side negotiated support for.
    #[error("Capability not supported: {0}")]
    CapabilityNotSupported(String),

    /// A host callback returned an error that doesn't map to one of the
    /// above; carries the original message through as `-32603`.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A pending outbound request's deadline elapsed before a response
    /// arrived.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The connection closed while a request was still pending.
    #[error("Connection closed: {0:?}")]
    ConnectionClosed(Option<String>),
}

impl From<AcpError> for JsonRpcError {
    fn from(err: AcpError) -> Self {
        let code = match &err {
            AcpError::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            AcpError::InvalidParams(_) => error_codes::INVALID_PARAMS,
            AcpError::ResourceNotFound(_) => error_codes::RESOURCE_NOT_FOUND,
            AcpError::PermissionDenied(_) => error_codes::PERMISSION_DENIED,
            AcpError::InvalidState(_) => error_codes::INVALID_STATE,
            AcpError::CapabilityNotSupported(_) => error_codes::CAPABILITY_NOT_SUPPORTED,
            AcpError::Internal(_) | AcpError::Timeout(_) | AcpError::ConnectionClosed(_) => {
                error_codes::INTERNAL_ERROR
            }
        };
        JsonRpcError::new(code, err.to_string())
    }
}
