//! Outbound request queue and submission engine
//!
//! Requests destined for the radio stack are parked in a fixed-size ring
//! buffer and handed over one at a time. A request leaves the buffer as
//! soon as the stack accepts it; the response for it only re-arms the
//! engine so that the next entry can go out.
//!
//! ```text
//!            process() / accept            on_response()
//!   Idle ───────────────────────▶ Submitted ─────────────▶ Idle
//!    │ ▲
//!    └─┘ process() / empty or rejected (entry kept for retry)
//! ```

use crate::config::queue::{TX_BUFFER_SIZE, WRITE_MESSAGE_LENGTH};
use crate::gattc::traits::{GattcStack, StackError, WriteOp, WriteParams};
use core::fmt;
use heapless::Vec;

/// Errors raised when queueing a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// Every slot holds a request that has not been accepted yet
    Full,
    /// Payload does not fit in a single write message
    PayloadTooLong { len: usize, max: usize },
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "request queue full"),
            Self::PayloadTooLong { len, max } => {
                write!(f, "payload of {} bytes exceeds {} byte limit", len, max)
            }
        }
    }
}

/// Request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxRequest {
    /// Read the remote attribute at `handle`
    Read { handle: u16 },
    /// Write to a remote attribute
    Write(WriteParams),
}

/// A queued request together with the connection it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxMessage {
    pub conn_handle: u16,
    pub request: TxRequest,
}

/// Whether a request is outstanding at the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    /// No request awaiting a response; the next process() may submit
    Idle,
    /// A request was accepted and its response has not arrived yet
    Submitted,
}

/// Result of a submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing queued
    Empty,
    /// A request is already in flight; the stack was not called
    InFlight,
    /// The oldest entry was accepted by the stack
    Submitted,
    /// The stack refused the oldest entry; it stays queued
    Rejected(StackError),
}

/// Fixed-capacity ring buffer of pending stack requests
///
/// `N` must be a power of two so the cursors wrap with a mask.
pub struct TxBuffer<const N: usize = TX_BUFFER_SIZE> {
    slots: [Option<TxMessage>; N],
    /// Next free slot
    insert_index: usize,
    /// Oldest pending slot, next to submit
    tx_index: usize,
    len: usize,
    state: TxState,
}

impl<const N: usize> TxBuffer<N> {
    const MASK: usize = {
        assert!(N.is_power_of_two(), "TxBuffer capacity must be a power of two");
        N - 1
    };

    /// Create an empty buffer
    pub fn new() -> Self {
        let _ = Self::MASK;
        Self {
            slots: core::array::from_fn(|_| None),
            insert_index: 0,
            tx_index: 0,
            len: 0,
            state: TxState::Idle,
        }
    }

    /// Queue a write request to `handle`
    ///
    /// The write is always a Write Request at offset 0.
    pub fn enqueue_write(
        &mut self,
        conn_handle: u16,
        handle: u16,
        payload: &[u8],
    ) -> Result<(), QueueError> {
        let value = Vec::from_slice(payload).map_err(|_| QueueError::PayloadTooLong {
            len: payload.len(),
            max: WRITE_MESSAGE_LENGTH,
        })?;

        self.push(TxMessage {
            conn_handle,
            request: TxRequest::Write(WriteParams {
                handle,
                op: WriteOp::WriteRequest,
                offset: 0,
                value,
            }),
        })
    }

    /// Queue a read request for `handle`
    pub fn enqueue_read(&mut self, conn_handle: u16, handle: u16) -> Result<(), QueueError> {
        self.push(TxMessage {
            conn_handle,
            request: TxRequest::Read { handle },
        })
    }

    fn push(&mut self, message: TxMessage) -> Result<(), QueueError> {
        if self.is_full() {
            log::warn!("nus_c: request queue full, refusing request");
            return Err(QueueError::Full);
        }

        self.slots[self.insert_index] = Some(message);
        self.insert_index = (self.insert_index + 1) & Self::MASK;
        self.len += 1;
        Ok(())
    }

    /// Hand the oldest pending request to the stack
    ///
    /// Does nothing while a request is in flight. A rejected request is
    /// kept at the head and retried verbatim on the next call.
    pub fn process<S: GattcStack>(&mut self, stack: &mut S) -> SubmitOutcome {
        if self.state == TxState::Submitted {
            return SubmitOutcome::InFlight;
        }

        let Some(message) = self.slots[self.tx_index].as_ref() else {
            return SubmitOutcome::Empty;
        };

        let result = match &message.request {
            TxRequest::Read { handle } => stack.read(message.conn_handle, *handle, 0),
            TxRequest::Write(params) => stack.write(message.conn_handle, params),
        };

        match result {
            Ok(()) => {
                log::debug!("nus_c: stack accepted request in slot {}", self.tx_index);
                self.slots[self.tx_index] = None;
                self.tx_index = (self.tx_index + 1) & Self::MASK;
                self.len -= 1;
                self.state = TxState::Submitted;
                SubmitOutcome::Submitted
            }
            Err(e) if e.is_transient() => {
                log::warn!("nus_c: stack rejected request ({}), will retry", e);
                SubmitOutcome::Rejected(e)
            }
            Err(e) => {
                log::error!("nus_c: stack refused request ({}), kept at queue head", e);
                SubmitOutcome::Rejected(e)
            }
        }
    }

    /// Mark the in-flight request as answered
    pub fn on_response(&mut self) {
        self.state = TxState::Idle;
    }

    /// Drop every pending request and forget the in-flight one
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.insert_index = 0;
        self.tx_index = 0;
        self.len = 0;
        self.state = TxState::Idle;
    }

    /// Oldest pending request, the one process() would submit next
    pub fn peek(&self) -> Option<&TxMessage> {
        self.slots[self.tx_index].as_ref()
    }

    pub fn state(&self) -> TxState {
        self.state
    }

    /// Number of requests not yet accepted by the stack
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == N
    }

    pub fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for TxBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
