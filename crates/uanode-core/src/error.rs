// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for typed node access.
//!
//! Every failure raised by this workspace is a [`UaError`]. The top-level enum
//! separates failures by cause so callers can branch on what actually went
//! wrong:
//!
//! ```text
//! UaError
//! ├── Service       - Bad status returned by the server for read/write/browse
//! ├── NodeAbsent    - The requested member node does not exist or is unresolved
//! ├── Coercion      - A value's shape disagrees with the declared type
//! ├── Encoding      - Wire envelope could not be produced or unpacked
//! ├── Interrupted   - A blocking wait was interrupted before completion
//! ├── Unexpected    - Catch-all for unclassified execution failures
//! └── Configuration - Malformed identifiers, names or descriptors
//! ```
//!
//! Every variant maps to a [`StatusCode`]: service errors carry the status the
//! server returned, all others map to their canonical Bad code.
//!
//! # Examples
//!
//! ```
//! use uanode_core::{StatusCode, UaError};
//!
//! let error = UaError::write_failed("ns=2;i=1001", "Value", StatusCode::BAD_NOT_WRITABLE);
//! assert!(error.is_service());
//! assert_eq!(error.status_code(), StatusCode::BAD_NOT_WRITABLE);
//! assert_eq!(error.error_code().to_string(), "UA-0102");
//! ```

use std::fmt;

use thiserror::Error;
use tracing::Level;

use crate::status::StatusCode;

// =============================================================================
// UaError - Main Error Type
// =============================================================================

/// The main error type for typed node access.
#[derive(Debug, Error)]
pub enum UaError {
    /// The server rejected an operation with a bad status.
    #[error("{0}")]
    Service(#[from] ServiceError),

    /// The requested member node is not available.
    #[error("{0}")]
    NodeAbsent(#[from] NodeAbsentError),

    /// A value could not be coerced to the declared type.
    #[error("{0}")]
    Coercion(#[from] CoercionError),

    /// A structured value could not be encoded or decoded.
    #[error("{0}")]
    Encoding(#[from] EncodingError),

    /// A blocking wait was interrupted.
    #[error("{0}")]
    Interrupted(#[from] InterruptedError),

    /// An unclassified failure.
    #[error("{0}")]
    Unexpected(#[from] UnexpectedError),

    /// Malformed identifiers or descriptors.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),
}

impl UaError {
    // =========================================================================
    // Convenience Factory Methods
    // =========================================================================

    /// Creates a read failed error.
    pub fn read_failed(
        node_id: impl Into<String>,
        attribute: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self::Service(ServiceError::read_failed(node_id, attribute, status))
    }

    /// Creates a write failed error.
    pub fn write_failed(
        node_id: impl Into<String>,
        attribute: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self::Service(ServiceError::write_failed(node_id, attribute, status))
    }

    /// Creates a browse failed error.
    pub fn browse_failed(node_id: impl Into<String>, status: StatusCode) -> Self {
        Self::Service(ServiceError::browse_failed(node_id, status))
    }

    /// Creates a channel-level failure carrying a status.
    pub fn channel(message: impl Into<String>, status: StatusCode) -> Self {
        Self::Service(ServiceError::channel(message, status))
    }

    /// Creates a service error from a bare status code.
    pub fn from_status(status: StatusCode) -> Self {
        Self::Service(ServiceError::channel(status.name(), status))
    }

    /// Creates a member not found error.
    pub fn member_not_found(parent: impl Into<String>, browse_name: impl Into<String>) -> Self {
        Self::NodeAbsent(NodeAbsentError::member_not_found(parent, browse_name))
    }

    /// Creates a not resolved error.
    pub fn not_resolved(parent: impl Into<String>, browse_name: impl Into<String>) -> Self {
        Self::NodeAbsent(NodeAbsentError::not_resolved(parent, browse_name))
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::Coercion(CoercionError::type_mismatch(expected, actual))
    }

    /// Creates an interrupted error.
    pub fn interrupted(operation: impl Into<String>) -> Self {
        Self::Interrupted(InterruptedError::wait_interrupted(operation))
    }

    /// Creates an unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(UnexpectedError::internal(message))
    }

    /// Creates an invalid node id error.
    pub fn invalid_node_id(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration(ConfigurationError::invalid_node_id(input, reason))
    }

    // =========================================================================
    // Error Properties
    // =========================================================================

    /// Returns the status code describing this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Service(e) => e.status_code(),
            Self::NodeAbsent(_) => StatusCode::BAD_NOT_FOUND,
            Self::Coercion(_) => StatusCode::BAD_TYPE_MISMATCH,
            Self::Encoding(e) => e.status_code(),
            Self::Interrupted(_) | Self::Unexpected(_) => StatusCode::BAD_UNEXPECTED_ERROR,
            Self::Configuration(e) => e.status_code(),
        }
    }

    /// Returns `true` if the server rejected the operation.
    #[inline]
    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service(_))
    }

    /// Returns `true` if the requested member node is not available.
    #[inline]
    pub fn is_node_absent(&self) -> bool {
        matches!(self, Self::NodeAbsent(_))
    }

    /// Returns `true` if a blocking wait was interrupted.
    #[inline]
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted(_))
    }

    /// Returns `true` if a value had the wrong shape.
    #[inline]
    pub fn is_coercion(&self) -> bool {
        matches!(self, Self::Coercion(_))
    }

    /// Returns `true` if this error is retryable.
    ///
    /// This layer never retries on its own; the flag is advisory for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Service(e) => e.is_retryable(),
            Self::Interrupted(_) => true,
            _ => false,
        }
    }

    /// Returns the severity level of this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Service(_) => ErrorSeverity::Error,
            Self::NodeAbsent(_) => ErrorSeverity::Warning,
            Self::Coercion(_) | Self::Encoding(_) => ErrorSeverity::Error,
            Self::Interrupted(_) => ErrorSeverity::Info,
            Self::Unexpected(_) => ErrorSeverity::Critical,
            Self::Configuration(_) => ErrorSeverity::Critical,
        }
    }

    /// Returns the error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Service(_) => "service",
            Self::NodeAbsent(_) => "node_absent",
            Self::Coercion(_) => "coercion",
            Self::Encoding(_) => "encoding",
            Self::Interrupted(_) => "interrupted",
            Self::Unexpected(_) => "unexpected",
            Self::Configuration(_) => "configuration",
        }
    }

    /// Returns a unique error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Service(e) => e.error_code(),
            Self::NodeAbsent(e) => e.error_code(),
            Self::Coercion(e) => e.error_code(),
            Self::Encoding(e) => e.error_code(),
            Self::Interrupted(_) => ErrorCode::new(5, 1),
            Self::Unexpected(_) => ErrorCode::new(6, 1),
            Self::Configuration(e) => e.error_code(),
        }
    }

    /// Returns the tracing level for this error.
    pub fn tracing_level(&self) -> Level {
        self.severity().to_tracing_level()
    }

    /// Logs this error with appropriate level and context.
    pub fn log(&self, context: &str) {
        let code = self.error_code();
        let status = self.status_code();

        match self.tracing_level() {
            Level::ERROR => tracing::error!(
                error_code = %code,
                category = self.category(),
                status = %status,
                retryable = self.is_retryable(),
                context = context,
                "{self}"
            ),
            Level::WARN => tracing::warn!(
                error_code = %code,
                category = self.category(),
                status = %status,
                retryable = self.is_retryable(),
                context = context,
                "{self}"
            ),
            _ => tracing::debug!(
                error_code = %code,
                category = self.category(),
                status = %status,
                retryable = self.is_retryable(),
                context = context,
                "{self}"
            ),
        }
    }
}

// =============================================================================
// ServiceError
// =============================================================================

/// A protocol-level failure status returned by the remote server.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Attribute read failed.
    #[error("Read of {attribute} failed for node '{node_id}': {status}")]
    ReadFailed {
        /// Node ID.
        node_id: String,
        /// Attribute name.
        attribute: String,
        /// Status returned by the server.
        status: StatusCode,
    },

    /// Attribute write failed.
    #[error("Write of {attribute} failed for node '{node_id}': {status}")]
    WriteFailed {
        /// Node ID.
        node_id: String,
        /// Attribute name.
        attribute: String,
        /// Status returned by the server.
        status: StatusCode,
    },

    /// Browse failed.
    #[error("Browse failed for node '{node_id}': {status}")]
    BrowseFailed {
        /// Node ID.
        node_id: String,
        /// Status returned by the server.
        status: StatusCode,
    },

    /// The channel failed before a per-operation status was available.
    #[error("Channel failure: {message} ({status})")]
    Channel {
        /// Error message.
        message: String,
        /// Status describing the failure.
        status: StatusCode,
    },
}

impl ServiceError {
    /// Creates a read failed error.
    pub fn read_failed(
        node_id: impl Into<String>,
        attribute: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self::ReadFailed {
            node_id: node_id.into(),
            attribute: attribute.into(),
            status,
        }
    }

    /// Creates a write failed error.
    pub fn write_failed(
        node_id: impl Into<String>,
        attribute: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self::WriteFailed {
            node_id: node_id.into(),
            attribute: attribute.into(),
            status,
        }
    }

    /// Creates a browse failed error.
    pub fn browse_failed(node_id: impl Into<String>, status: StatusCode) -> Self {
        Self::BrowseFailed {
            node_id: node_id.into(),
            status,
        }
    }

    /// Creates a channel failure.
    pub fn channel(message: impl Into<String>, status: StatusCode) -> Self {
        Self::Channel {
            message: message.into(),
            status,
        }
    }

    /// Returns the status carried by this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ReadFailed { status, .. }
            | Self::WriteFailed { status, .. }
            | Self::BrowseFailed { status, .. }
            | Self::Channel { status, .. } => *status,
        }
    }

    /// Returns `true` if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.status_code().code(),
            StatusCode::BAD_TIMEOUT | StatusCode::BAD_COMMUNICATION_ERROR
        )
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        let code = match self {
            Self::ReadFailed { .. } => 1,
            Self::WriteFailed { .. } => 2,
            Self::BrowseFailed { .. } => 3,
            Self::Channel { .. } => 4,
        };
        ErrorCode::new(1, code)
    }
}

// =============================================================================
// NodeAbsentError
// =============================================================================

/// The requested member node is not available on the parent.
#[derive(Debug, Error)]
pub enum NodeAbsentError {
    /// The parent has no member with this browse name.
    #[error("Node '{parent}' has no member '{browse_name}'")]
    MemberNotFound {
        /// Parent node ID.
        parent: String,
        /// Browse name of the member.
        browse_name: String,
    },

    /// The member was never resolved, so no local value exists.
    #[error("Member '{browse_name}' of node '{parent}' has not been resolved")]
    NotResolved {
        /// Parent node ID.
        parent: String,
        /// Browse name of the member.
        browse_name: String,
    },
}

impl NodeAbsentError {
    /// Creates a member not found error.
    pub fn member_not_found(parent: impl Into<String>, browse_name: impl Into<String>) -> Self {
        Self::MemberNotFound {
            parent: parent.into(),
            browse_name: browse_name.into(),
        }
    }

    /// Creates a not resolved error.
    pub fn not_resolved(parent: impl Into<String>, browse_name: impl Into<String>) -> Self {
        Self::NotResolved {
            parent: parent.into(),
            browse_name: browse_name.into(),
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::MemberNotFound { .. } => ErrorCode::new(2, 1),
            Self::NotResolved { .. } => ErrorCode::new(2, 2),
        }
    }
}

// =============================================================================
// CoercionError
// =============================================================================

/// A value's runtime shape does not match the declared semantic type.
#[derive(Debug, Error)]
pub enum CoercionError {
    /// Type mismatch.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected type.
        expected: String,
        /// Actual type.
        actual: String,
    },

    /// Scalar where an array was declared, or the reverse.
    #[error("Value rank mismatch: declared {declared}, got {actual}")]
    ValueRankMismatch {
        /// Declared value rank.
        declared: i32,
        /// Actual shape.
        actual: String,
    },

    /// Numeric value does not fit the declared type.
    #[error("Value {value} out of range for {expected}")]
    OutOfRange {
        /// Expected type.
        expected: String,
        /// Offending value.
        value: String,
    },
}

impl CoercionError {
    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates a value rank mismatch error.
    pub fn value_rank_mismatch(declared: i32, actual: impl Into<String>) -> Self {
        Self::ValueRankMismatch {
            declared,
            actual: actual.into(),
        }
    }

    /// Creates an out of range error.
    pub fn out_of_range(expected: impl Into<String>, value: impl fmt::Display) -> Self {
        Self::OutOfRange {
            expected: expected.into(),
            value: value.to_string(),
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::TypeMismatch { .. } => ErrorCode::new(3, 1),
            Self::ValueRankMismatch { .. } => ErrorCode::new(3, 2),
            Self::OutOfRange { .. } => ErrorCode::new(3, 3),
        }
    }
}

// =============================================================================
// EncodingError
// =============================================================================

/// A structured value could not be moved into or out of its wire envelope.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// The envelope carries a different encoding than expected.
    #[error("Cannot decode {type_name}: expected encoding {expected}, got {actual}")]
    EncodingIdMismatch {
        /// Structure type name.
        type_name: String,
        /// Expected encoding node ID.
        expected: String,
        /// Actual encoding node ID.
        actual: String,
    },

    /// The envelope body uses an encoding this context cannot read.
    #[error("Cannot decode {type_name}: {encoding} bodies are not supported")]
    UnsupportedBody {
        /// Structure type name.
        type_name: String,
        /// Body encoding.
        encoding: String,
    },

    /// The envelope has no body.
    #[error("Cannot decode {type_name}: envelope has no body")]
    EmptyBody {
        /// Structure type name.
        type_name: String,
    },

    /// Serializing the structure failed.
    #[error("Failed to encode {type_name}: {message}")]
    Serialize {
        /// Structure type name.
        type_name: String,
        /// Error message.
        message: String,
    },

    /// Deserializing the structure failed.
    #[error("Failed to decode {type_name}: {message}")]
    Deserialize {
        /// Structure type name.
        type_name: String,
        /// Error message.
        message: String,
    },

    /// A configured encoding limit was exceeded.
    #[error("Encoding limit exceeded for {limit}: {actual} > {max}")]
    LimitExceeded {
        /// Limit name.
        limit: String,
        /// Maximum allowed.
        max: usize,
        /// Actual size.
        actual: usize,
    },
}

impl EncodingError {
    /// Creates an encoding id mismatch error.
    pub fn encoding_id_mismatch(
        type_name: impl Into<String>,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        Self::EncodingIdMismatch {
            type_name: type_name.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Creates an unsupported body error.
    pub fn unsupported_body(type_name: impl Into<String>, encoding: impl Into<String>) -> Self {
        Self::UnsupportedBody {
            type_name: type_name.into(),
            encoding: encoding.into(),
        }
    }

    /// Creates an empty body error.
    pub fn empty_body(type_name: impl Into<String>) -> Self {
        Self::EmptyBody {
            type_name: type_name.into(),
        }
    }

    /// Creates a serialize error.
    pub fn serialize(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialize {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Creates a deserialize error.
    pub fn deserialize(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Deserialize {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Creates a limit exceeded error.
    pub fn limit_exceeded(limit: impl Into<String>, max: usize, actual: usize) -> Self {
        Self::LimitExceeded {
            limit: limit.into(),
            max,
            actual,
        }
    }

    /// Returns the status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Serialize { .. } => StatusCode::BAD_ENCODING_ERROR,
            Self::LimitExceeded { .. } => StatusCode::BAD_ENCODING_LIMITS_EXCEEDED,
            _ => StatusCode::BAD_DECODING_ERROR,
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        let code = match self {
            Self::EncodingIdMismatch { .. } => 1,
            Self::UnsupportedBody { .. } => 2,
            Self::EmptyBody { .. } => 3,
            Self::Serialize { .. } => 4,
            Self::Deserialize { .. } => 5,
            Self::LimitExceeded { .. } => 6,
        };
        ErrorCode::new(4, code)
    }
}

// =============================================================================
// InterruptedError
// =============================================================================

/// A blocking wait ended before its operation completed.
#[derive(Debug, Error)]
pub enum InterruptedError {
    /// The wait was interrupted.
    #[error("Blocking {operation} was interrupted")]
    WaitInterrupted {
        /// Operation that was waiting.
        operation: String,
    },
}

impl InterruptedError {
    /// Creates a wait interrupted error.
    pub fn wait_interrupted(operation: impl Into<String>) -> Self {
        Self::WaitInterrupted {
            operation: operation.into(),
        }
    }
}

// =============================================================================
// UnexpectedError
// =============================================================================

/// A failure not otherwise classified.
#[derive(Debug, Error)]
pub enum UnexpectedError {
    /// Internal failure.
    #[error("Unexpected error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl UnexpectedError {
    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// =============================================================================
// ConfigurationError
// =============================================================================

/// Malformed identifiers, names or descriptors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Invalid node ID.
    #[error("Invalid node ID '{input}': {reason}")]
    InvalidNodeId {
        /// Input string.
        input: String,
        /// Reason.
        reason: String,
    },

    /// Invalid expanded node ID.
    #[error("Invalid expanded node ID '{input}': {reason}")]
    InvalidExpandedNodeId {
        /// Input string.
        input: String,
        /// Reason.
        reason: String,
    },

    /// Namespace URI is not registered.
    #[error("Namespace '{uri}' is not in the namespace table")]
    UnknownNamespace {
        /// Namespace URI.
        uri: String,
    },

    /// Node lives on another server.
    #[error("Node '{node_id}' is on server {server_index}, not local")]
    NotLocal {
        /// Node ID.
        node_id: String,
        /// Server index.
        server_index: u32,
    },

    /// Invalid qualified name.
    #[error("Invalid qualified name '{input}': {reason}")]
    InvalidQualifiedName {
        /// Input string.
        input: String,
        /// Reason.
        reason: String,
    },

    /// A required collaborator was not supplied.
    #[error("Missing required component: {component}")]
    MissingComponent {
        /// Component name.
        component: String,
    },

    /// No runtime is available to drive blocking calls.
    #[error("Runtime unavailable: {reason}")]
    RuntimeUnavailable {
        /// Reason.
        reason: String,
    },
}

impl ConfigurationError {
    /// Creates an invalid node ID error.
    pub fn invalid_node_id(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNodeId {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid expanded node ID error.
    pub fn invalid_expanded_node_id(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidExpandedNodeId {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown namespace error.
    pub fn unknown_namespace(uri: impl Into<String>) -> Self {
        Self::UnknownNamespace { uri: uri.into() }
    }

    /// Creates a not local error.
    pub fn not_local(node_id: impl Into<String>, server_index: u32) -> Self {
        Self::NotLocal {
            node_id: node_id.into(),
            server_index,
        }
    }

    /// Creates an invalid qualified name error.
    pub fn invalid_qualified_name(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidQualifiedName {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates a missing component error.
    pub fn missing_component(component: impl Into<String>) -> Self {
        Self::MissingComponent {
            component: component.into(),
        }
    }

    /// Creates a runtime unavailable error.
    pub fn runtime_unavailable(reason: impl Into<String>) -> Self {
        Self::RuntimeUnavailable {
            reason: reason.into(),
        }
    }

    /// Returns the status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingComponent { .. } | Self::RuntimeUnavailable { .. } => {
                StatusCode::BAD_INTERNAL_ERROR
            }
            Self::InvalidQualifiedName { .. } => StatusCode::BAD_NO_MATCH,
            Self::UnknownNamespace { .. } | Self::NotLocal { .. } => StatusCode::BAD_NODE_ID_UNKNOWN,
            _ => StatusCode::BAD_NODE_ID_INVALID,
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        let code = match self {
            Self::InvalidNodeId { .. } => 1,
            Self::InvalidExpandedNodeId { .. } => 2,
            Self::UnknownNamespace { .. } => 3,
            Self::NotLocal { .. } => 4,
            Self::InvalidQualifiedName { .. } => 5,
            Self::MissingComponent { .. } => 6,
            Self::RuntimeUnavailable { .. } => 7,
        };
        ErrorCode::new(7, code)
    }
}

// =============================================================================
// ErrorSeverity
// =============================================================================

/// Severity level for errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, the caller chose to stop.
    Info,
    /// Expected in normal operation.
    Warning,
    /// The operation failed.
    Error,
    /// A programming or configuration error.
    Critical,
}

impl ErrorSeverity {
    /// Converts to a tracing level.
    pub fn to_tracing_level(self) -> Level {
        match self {
            Self::Info => Level::DEBUG,
            Self::Warning => Level::WARN,
            Self::Error | Self::Critical => Level::ERROR,
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

// =============================================================================
// ErrorCode
// =============================================================================

/// Unique error code.
///
/// Categories:
/// - 1: Service
/// - 2: NodeAbsent
/// - 3: Coercion
/// - 4: Encoding
/// - 5: Interrupted
/// - 6: Unexpected
/// - 7: Configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    /// Category (1-7).
    pub category: u8,
    /// Specific error within category.
    pub code: u8,
}

impl ErrorCode {
    /// Creates a new error code.
    pub const fn new(category: u8, code: u8) -> Self {
        Self { category, code }
    }

    /// Returns the full error code as a u16.
    pub fn as_u16(&self) -> u16 {
        ((self.category as u16) << 8) | (self.code as u16)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UA-{:02X}{:02X}", self.category, self.code)
    }
}

// =============================================================================
// Result Type and Context Extension
// =============================================================================

/// Result type for typed node access.
pub type UaResult<T> = Result<T, UaError>;

/// Extension trait for adding context to errors.
pub trait UaErrorContext<T> {
    /// Adds node context to errors.
    fn with_node(self, node_id: &str) -> UaResult<T>;

    /// Adds property context to errors.
    fn with_property(self, node_id: &str, browse_name: &str) -> UaResult<T>;
}

impl<T> UaErrorContext<T> for UaResult<T> {
    fn with_node(self, node_id: &str) -> UaResult<T> {
        self.map_err(|e| {
            tracing::debug!(node_id = node_id, error = %e, "node access failed");
            e
        })
    }

    fn with_property(self, node_id: &str, browse_name: &str) -> UaResult<T> {
        self.map_err(|e| {
            tracing::debug!(
                node_id = node_id,
                property = browse_name,
                error = %e,
                "property access failed"
            );
            e
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_preserves_status() {
        let error = UaError::write_failed("ns=2;i=7", "Value", StatusCode::BAD_NOT_WRITABLE);
        assert!(error.is_service());
        assert_eq!(error.status_code(), StatusCode::BAD_NOT_WRITABLE);
        assert!(error.to_string().contains("ns=2;i=7"));
        assert!(error.to_string().contains("BadNotWritable"));
    }

    #[test]
    fn test_interrupted_is_distinct_from_service() {
        let error = UaError::interrupted("read");
        assert!(error.is_interrupted());
        assert!(!error.is_service());
        assert_eq!(error.status_code(), StatusCode::BAD_UNEXPECTED_ERROR);
    }

    #[test]
    fn test_node_absent() {
        let error = UaError::not_resolved("ns=2;i=1", "Enabled");
        assert!(error.is_node_absent());
        assert_eq!(error.status_code(), StatusCode::BAD_NOT_FOUND);
        assert_eq!(error.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(UaError::channel("lost", StatusCode::BAD_TIMEOUT).is_retryable());
        assert!(UaError::channel("lost", StatusCode::BAD_COMMUNICATION_ERROR).is_retryable());
        assert!(!UaError::read_failed("i=1", "Value", StatusCode::BAD_NOT_READABLE).is_retryable());
        assert!(!UaError::type_mismatch("Boolean", "String").is_retryable());
    }

    #[test]
    fn test_encoding_status_codes() {
        let limit = EncodingError::limit_exceeded("array length", 4, 5);
        assert_eq!(limit.status_code(), StatusCode::BAD_ENCODING_LIMITS_EXCEEDED);

        let mismatch = EncodingError::encoding_id_mismatch("Argument", "i=1", "i=2");
        assert_eq!(mismatch.status_code(), StatusCode::BAD_DECODING_ERROR);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::new(1, 2).to_string(), "UA-0102");
        assert_eq!(
            UaError::write_failed("i=1", "Value", StatusCode::BAD).error_code(),
            ErrorCode::new(1, 2)
        );
    }

    #[test]
    fn test_category_and_level() {
        let error = UaError::member_not_found("ns=2;i=1", "Missing");
        assert_eq!(error.category(), "node_absent");
        assert_eq!(error.tracing_level(), Level::WARN);
        assert_eq!(UaError::interrupted("read").tracing_level(), Level::DEBUG);
    }
}
