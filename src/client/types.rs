//! Event, error and state types for the NUS client

use crate::config::gatt::{CONN_HANDLE_INVALID, HANDLE_INVALID};
use crate::config::nus::MAX_DATA_LEN;
use crate::gattc::traits::StackError;
use crate::queue::QueueError;
use core::fmt;
use heapless::Vec;

/// Errors returned by [`crate::client::NusClient`] operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NusClientError {
    /// A required attribute handle has not been discovered yet
    NullArgument,
    /// No active connection
    InvalidState,
    /// Request could not be queued
    Queue(QueueError),
    /// Radio stack refused a setup call
    Stack(StackError),
}

impl fmt::Display for NusClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullArgument => write!(f, "attribute handle not discovered"),
            Self::InvalidState => write!(f, "not connected"),
            Self::Queue(e) => write!(f, "queue: {}", e),
            Self::Stack(e) => write!(f, "stack: {}", e),
        }
    }
}

impl From<QueueError> for NusClientError {
    fn from(e: QueueError) -> Self {
        Self::Queue(e)
    }
}

impl From<StackError> for NusClientError {
    fn from(e: StackError) -> Self {
        Self::Stack(e)
    }
}

/// Connection and attribute handles for the peer's UART service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionContext {
    /// Link the service lives on
    pub conn_handle: u16,
    /// CCCD of the RX characteristic
    pub rx_cccd_handle: u16,
    /// RX characteristic value (peer notifies us here)
    pub rx_handle: u16,
    /// TX characteristic value (we write here)
    pub tx_handle: u16,
}

impl ConnectionContext {
    pub const fn new() -> Self {
        Self {
            conn_handle: CONN_HANDLE_INVALID,
            rx_cccd_handle: HANDLE_INVALID,
            rx_handle: HANDLE_INVALID,
            tx_handle: HANDLE_INVALID,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.conn_handle != CONN_HANDLE_INVALID
    }
}

impl Default for ConnectionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Events from the radio stack that the client reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BleEvent<'a> {
    /// Link established
    Connected { conn_handle: u16 },
    /// Link lost
    Disconnected { conn_handle: u16, reason: u8 },
    /// Handle Value Notification or Indication from the peer
    Hvx {
        conn_handle: u16,
        handle: u16,
        data: &'a [u8],
    },
    /// Write Response for the in-flight write
    WriteResponse {
        conn_handle: u16,
        handle: u16,
        gatt_status: u16,
    },
    /// Read Response for the in-flight read
    ReadResponse {
        conn_handle: u16,
        handle: u16,
        data: &'a [u8],
    },
    /// Anything else the stack emits
    Other,
}

/// Events delivered to the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NusClientEvent {
    /// The peer's UART service was found and its handles stored
    DiscoveryComplete(ConnectionContext),
    /// Data notified on the RX characteristic
    RxData { data: Vec<u8, MAX_DATA_LEN> },
    /// Value returned by a queued read
    ReadResponse {
        handle: u16,
        data: Vec<u8, MAX_DATA_LEN>,
    },
}

/// Receiver for [`NusClientEvent`]s
///
/// Called synchronously from inside the client's event entry points.
pub trait NusClientHandler {
    fn on_event(&mut self, event: NusClientEvent);
}

impl<F: FnMut(NusClientEvent)> NusClientHandler for F {
    fn on_event(&mut self, event: NusClientEvent) {
        self(event)
    }
}

/// Copy at most `MAX_DATA_LEN` bytes of a received value
pub(crate) fn truncate_data(data: &[u8]) -> Vec<u8, MAX_DATA_LEN> {
    let len = data.len().min(MAX_DATA_LEN);
    if len < data.len() {
        log::warn!(
            "nus_c: received {} bytes, delivering first {}",
            data.len(),
            MAX_DATA_LEN
        );
    }
    let mut out = Vec::new();
    let _ = out.extend_from_slice(&data[..len]);
    out
}
