//! GATT client stack trait for abstraction and testability
//!
//! This trait defines the request side of the radio stack. Every call
//! returns immediately: `Ok` means the stack took the request for
//! transmission, `Err` means it refused it right now.

use crate::config::queue::WRITE_MESSAGE_LENGTH;
use core::fmt;
use heapless::Vec;

/// Immediate status codes returned by the radio stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackError {
    /// Another request is already being processed
    Busy,
    /// Transmit buffers are exhausted
    NoResources,
    /// Request not allowed in the current link state
    InvalidState,
    /// Malformed request parameters
    InvalidParam,
    /// Operation not supported by this stack
    NotSupported,
    /// Vendor-specific error code
    Internal(u32),
}

impl StackError {
    /// Whether the stack may accept the same request later on
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Busy | Self::NoResources)
    }
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "stack busy"),
            Self::NoResources => write!(f, "stack out of resources"),
            Self::InvalidState => write!(f, "invalid link state"),
            Self::InvalidParam => write!(f, "invalid parameter"),
            Self::NotSupported => write!(f, "not supported"),
            Self::Internal(code) => write!(f, "stack error 0x{:08X}", code),
        }
    }
}

/// A 16-bit UUID paired with the type tag of its base UUID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BleUuid {
    pub uuid: u16,
    pub uuid_type: u8,
}

impl BleUuid {
    pub const fn new(uuid: u16, uuid_type: u8) -> Self {
        Self { uuid, uuid_type }
    }
}

/// ATT write operation
///
/// Only acknowledged writes are queued: the Write Response is what frees
/// the in-flight slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    /// Write Request, acknowledged by a Write Response
    WriteRequest,
}

/// Parameters of a single GATT write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteParams {
    /// Attribute handle being written
    pub handle: u16,
    /// Write operation
    pub op: WriteOp,
    /// Offset into the attribute value
    pub offset: u16,
    /// Value to write
    pub value: Vec<u8, WRITE_MESSAGE_LENGTH>,
}

/// A request as handed to the radio stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GattcRequest {
    Read {
        conn_handle: u16,
        handle: u16,
        offset: u16,
    },
    Write {
        conn_handle: u16,
        params: WriteParams,
    },
}

impl GattcRequest {
    /// Connection the request is addressed to
    pub fn conn_handle(&self) -> u16 {
        match self {
            Self::Read { conn_handle, .. } | Self::Write { conn_handle, .. } => *conn_handle,
        }
    }
}

/// Abstract GATT client stack for testability
///
/// This trait allows the NUS client to work with either the real radio
/// stack or a mock implementation for testing.
pub trait GattcStack {
    /// Register a vendor-specific 128-bit base UUID
    ///
    /// Returns the type tag the stack will use for UUIDs on this base.
    fn uuid_vs_add(&mut self, base: &[u8; 16]) -> Result<u8, StackError>;

    /// Start a read of `handle` on `conn_handle`
    fn read(&mut self, conn_handle: u16, handle: u16, offset: u16) -> Result<(), StackError>;

    /// Start a write on `conn_handle`
    fn write(&mut self, conn_handle: u16, params: &WriteParams) -> Result<(), StackError>;
}

impl<S: GattcStack + ?Sized> GattcStack for &mut S {
    fn uuid_vs_add(&mut self, base: &[u8; 16]) -> Result<u8, StackError> {
        (**self).uuid_vs_add(base)
    }

    fn read(&mut self, conn_handle: u16, handle: u16, offset: u16) -> Result<(), StackError> {
        (**self).read(conn_handle, handle, offset)
    }

    fn write(&mut self, conn_handle: u16, params: &WriteParams) -> Result<(), StackError> {
        (**self).write(conn_handle, params)
    }
}
