// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA status codes.
//!
//! A status code is a 32-bit value whose two most significant bits carry the
//! severity:
//!
//! ```text
//! 00xx xxxx ...  Good
//! 01xx xxxx ...  Uncertain
//! 1xxx xxxx ...  Bad
//! ```
//!
//! The lower 16 bits hold info bits and are ignored when naming a code.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// StatusCode
// =============================================================================

/// An OPC UA status code.
///
/// # Examples
///
/// ```
/// use uanode_core::StatusCode;
///
/// let status = StatusCode::BAD_NOT_FOUND;
/// assert!(status.is_bad());
/// assert_eq!(status.name(), "BadNotFound");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(u32);

impl StatusCode {
    const SEVERITY_MASK: u32 = 0xC000_0000;
    const UNCERTAIN_BIT: u32 = 0x4000_0000;
    const BAD_BIT: u32 = 0x8000_0000;
    const CODE_MASK: u32 = 0xFFFF_0000;

    /// Good.
    pub const GOOD: Self = Self(0x0000_0000);
    /// Uncertain.
    pub const UNCERTAIN: Self = Self(0x4000_0000);
    /// Bad.
    pub const BAD: Self = Self(0x8000_0000);
    /// An unexpected error occurred.
    pub const BAD_UNEXPECTED_ERROR: Self = Self(0x8001_0000);
    /// An internal error occurred as a result of a programming or configuration error.
    pub const BAD_INTERNAL_ERROR: Self = Self(0x8002_0000);
    /// A low level communication error occurred.
    pub const BAD_COMMUNICATION_ERROR: Self = Self(0x8005_0000);
    /// Encoding halted because of invalid data in the objects being serialized.
    pub const BAD_ENCODING_ERROR: Self = Self(0x8006_0000);
    /// Decoding halted because of invalid data in the stream.
    pub const BAD_DECODING_ERROR: Self = Self(0x8007_0000);
    /// The message encoding/decoding limits imposed by the stack have been exceeded.
    pub const BAD_ENCODING_LIMITS_EXCEEDED: Self = Self(0x8008_0000);
    /// The operation timed out.
    pub const BAD_TIMEOUT: Self = Self(0x800A_0000);
    /// The server does not support the requested service.
    pub const BAD_SERVICE_UNSUPPORTED: Self = Self(0x800B_0000);
    /// User does not have permission to perform the requested operation.
    pub const BAD_USER_ACCESS_DENIED: Self = Self(0x801F_0000);
    /// The request was cancelled by the client.
    pub const BAD_REQUEST_CANCELLED_BY_CLIENT: Self = Self(0x802C_0000);
    /// The syntax of the node id is not valid.
    pub const BAD_NODE_ID_INVALID: Self = Self(0x8033_0000);
    /// The node id refers to a node that does not exist in the server address space.
    pub const BAD_NODE_ID_UNKNOWN: Self = Self(0x8034_0000);
    /// The attribute is not supported for the specified node.
    pub const BAD_ATTRIBUTE_ID_INVALID: Self = Self(0x8035_0000);
    /// The access level does not allow reading or subscribing to the node.
    pub const BAD_NOT_READABLE: Self = Self(0x803A_0000);
    /// The access level does not allow writing to the node.
    pub const BAD_NOT_WRITABLE: Self = Self(0x803B_0000);
    /// The value was out of range.
    pub const BAD_OUT_OF_RANGE: Self = Self(0x803C_0000);
    /// The requested operation is not supported.
    pub const BAD_NOT_SUPPORTED: Self = Self(0x803D_0000);
    /// A requested item was not found or a search operation ended without success.
    pub const BAD_NOT_FOUND: Self = Self(0x803E_0000);
    /// The requested browse name could not be matched.
    pub const BAD_NO_MATCH: Self = Self(0x806F_0000);
    /// The server does not support writing the combination of value, status and timestamps.
    pub const BAD_WRITE_NOT_SUPPORTED: Self = Self(0x8073_0000);
    /// The value supplied for the attribute is not of the same type as the attribute's value.
    pub const BAD_TYPE_MISMATCH: Self = Self(0x8074_0000);

    /// Creates a status code from its raw bits.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the severity is Good.
    #[inline]
    pub const fn is_good(&self) -> bool {
        self.0 & Self::SEVERITY_MASK == 0
    }

    /// Returns `true` if the severity is Uncertain.
    #[inline]
    pub const fn is_uncertain(&self) -> bool {
        self.0 & Self::SEVERITY_MASK == Self::UNCERTAIN_BIT
    }

    /// Returns `true` if the severity is Bad.
    #[inline]
    pub const fn is_bad(&self) -> bool {
        self.0 & Self::BAD_BIT != 0
    }

    /// Returns the code with info bits stripped.
    #[inline]
    pub const fn code(&self) -> Self {
        Self(self.0 & Self::CODE_MASK)
    }

    /// Returns the symbolic name of this status code.
    ///
    /// Unknown codes are named after their severity.
    pub fn name(&self) -> &'static str {
        match self.code().0 {
            0x0000_0000 => "Good",
            0x4000_0000 => "Uncertain",
            0x8000_0000 => "Bad",
            0x8001_0000 => "BadUnexpectedError",
            0x8002_0000 => "BadInternalError",
            0x8005_0000 => "BadCommunicationError",
            0x8006_0000 => "BadEncodingError",
            0x8007_0000 => "BadDecodingError",
            0x8008_0000 => "BadEncodingLimitsExceeded",
            0x800A_0000 => "BadTimeout",
            0x800B_0000 => "BadServiceUnsupported",
            0x801F_0000 => "BadUserAccessDenied",
            0x802C_0000 => "BadRequestCancelledByClient",
            0x8033_0000 => "BadNodeIdInvalid",
            0x8034_0000 => "BadNodeIdUnknown",
            0x8035_0000 => "BadAttributeIdInvalid",
            0x803A_0000 => "BadNotReadable",
            0x803B_0000 => "BadNotWritable",
            0x803C_0000 => "BadOutOfRange",
            0x803D_0000 => "BadNotSupported",
            0x803E_0000 => "BadNotFound",
            0x806F_0000 => "BadNoMatch",
            0x8073_0000 => "BadWriteNotSupported",
            0x8074_0000 => "BadTypeMismatch",
            _ if self.is_bad() => "Bad",
            _ if self.is_uncertain() => "Uncertain",
            _ => "Good",
        }
    }
}

impl From<u32> for StatusCode {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl From<StatusCode> for u32 {
    fn from(status: StatusCode) -> Self {
        status.0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#010X})", self.name(), self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity() {
        assert!(StatusCode::GOOD.is_good());
        assert!(!StatusCode::GOOD.is_bad());
        assert!(StatusCode::UNCERTAIN.is_uncertain());
        assert!(!StatusCode::UNCERTAIN.is_good());
        assert!(StatusCode::BAD_NOT_WRITABLE.is_bad());
        assert!(!StatusCode::BAD_NOT_WRITABLE.is_uncertain());
    }

    #[test]
    fn test_name_ignores_info_bits() {
        let status = StatusCode::from_bits(0x803E_0400);
        assert_eq!(status.name(), "BadNotFound");
        assert_eq!(status.code(), StatusCode::BAD_NOT_FOUND);
    }

    #[test]
    fn test_unknown_codes_fall_back_to_severity() {
        assert_eq!(StatusCode::from_bits(0x80FF_0000).name(), "Bad");
        assert_eq!(StatusCode::from_bits(0x40FF_0000).name(), "Uncertain");
        assert_eq!(StatusCode::from_bits(0x00A0_0000).name(), "Good");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            StatusCode::BAD_UNEXPECTED_ERROR.to_string(),
            "BadUnexpectedError (0x80010000)"
        );
    }
}
