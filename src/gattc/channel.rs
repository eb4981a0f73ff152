//! Channel-backed GATT client stack
//!
//! Bridges the synchronous NUS client to an async radio task. The client
//! side pushes requests with `try_send`, so a full channel is reported as
//! [`StackError::Busy`] and the request stays in the client's queue. The
//! radio task drains the channel, performs the ATT exchange and feeds the
//! completion back as a [`crate::client::BleEvent`].

use crate::config::channel::MAX_VENDOR_UUIDS;
use crate::config::gatt::UUID_TYPE_VENDOR_BEGIN;
use crate::gattc::traits::{GattcRequest, GattcStack, StackError, WriteParams};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, Sender};
use heapless::Vec;

/// Channel carrying requests from the client to the radio task
pub type RequestChannel<M, const N: usize> = Channel<M, GattcRequest, N>;

/// [`GattcStack`] implementation that hands requests to a radio task
pub struct ChannelStack<'a, M: RawMutex, const N: usize> {
    requests: Sender<'a, M, GattcRequest, N>,
    vendor_uuids: Vec<[u8; 16], MAX_VENDOR_UUIDS>,
}

impl<'a, M: RawMutex, const N: usize> ChannelStack<'a, M, N> {
    /// Create a stack that sends into `channel`
    pub fn new(channel: &'a RequestChannel<M, N>) -> Self {
        Self {
            requests: channel.sender(),
            vendor_uuids: Vec::new(),
        }
    }

    fn send(&mut self, request: GattcRequest) -> Result<(), StackError> {
        self.requests.try_send(request).map_err(|_| StackError::Busy)
    }
}

impl<M: RawMutex, const N: usize> GattcStack for ChannelStack<'_, M, N> {
    fn uuid_vs_add(&mut self, base: &[u8; 16]) -> Result<u8, StackError> {
        if let Some(index) = self.vendor_uuids.iter().position(|b| b == base) {
            return Ok(UUID_TYPE_VENDOR_BEGIN + index as u8);
        }

        self.vendor_uuids
            .push(*base)
            .map_err(|_| StackError::NoResources)?;
        Ok(UUID_TYPE_VENDOR_BEGIN + (self.vendor_uuids.len() - 1) as u8)
    }

    fn read(&mut self, conn_handle: u16, handle: u16, offset: u16) -> Result<(), StackError> {
        self.send(GattcRequest::Read {
            conn_handle,
            handle,
            offset,
        })
    }

    fn write(&mut self, conn_handle: u16, params: &WriteParams) -> Result<(), StackError> {
        self.send(GattcRequest::Write {
            conn_handle,
            params: params.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gattc::traits::WriteOp;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    fn params(value: &[u8]) -> WriteParams {
        WriteParams {
            handle: 0x0D,
            op: WriteOp::WriteRequest,
            offset: 0,
            value: Vec::from_slice(value).unwrap(),
        }
    }

    #[test]
    fn test_full_channel_reports_busy() {
        let channel: RequestChannel<NoopRawMutex, 1> = Channel::new();
        let mut stack = ChannelStack::new(&channel);

        stack.write(0, &params(b"hi")).unwrap();
        assert_eq!(stack.read(0, 0x0F, 0), Err(StackError::Busy));

        // Radio task picks up the first request, freeing the slot
        let request = channel.try_receive().unwrap();
        assert_eq!(request, GattcRequest::Write {
            conn_handle: 0,
            params: params(b"hi"),
        });

        stack.read(0, 0x0F, 0).unwrap();
    }

    #[test]
    fn test_radio_task_receives_in_order() {
        let channel: RequestChannel<NoopRawMutex, 4> = Channel::new();
        let mut stack = ChannelStack::new(&channel);

        stack.write(3, &params(b"a")).unwrap();
        stack.read(3, 0x10, 0).unwrap();

        futures::executor::block_on(async {
            let first = channel.receive().await;
            let second = channel.receive().await;

            assert!(matches!(first, GattcRequest::Write { conn_handle: 3, .. }));
            assert_eq!(second, GattcRequest::Read {
                conn_handle: 3,
                handle: 0x10,
                offset: 0,
            });
        });
    }

    #[test]
    fn test_vendor_uuid_registration() {
        let channel: RequestChannel<NoopRawMutex, 1> = Channel::new();
        let mut stack = ChannelStack::new(&channel);

        let nus = stack.uuid_vs_add(&crate::config::nus::BASE_UUID).unwrap();
        assert_eq!(nus, UUID_TYPE_VENDOR_BEGIN);
        assert_eq!(stack.uuid_vs_add(&crate::config::nus::BASE_UUID), Ok(nus));

        for i in 1..MAX_VENDOR_UUIDS {
            stack.uuid_vs_add(&[i as u8; 16]).unwrap();
        }
        assert_eq!(stack.uuid_vs_add(&[0xEE; 16]), Err(StackError::NoResources));
    }
}
