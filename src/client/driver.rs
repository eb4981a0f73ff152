//! Nordic UART Service client
//!
//! Owns the outbound request queue and the handles of the peer's UART
//! service. Every entry point runs to completion: radio stack events and
//! discovery results are pushed in by the caller, application events are
//! pushed out through the [`NusClientHandler`].

use crate::client::types::{
    truncate_data, BleEvent, ConnectionContext, NusClientError, NusClientEvent, NusClientHandler,
};
use crate::config::gatt::{CCCD_NOTIFICATION, HANDLE_INVALID};
use crate::config::nus::{
    BASE_UUID, RX_CHARACTERISTIC_UUID, SERVICE_UUID, TX_CHARACTERISTIC_UUID,
};
use crate::discovery::{DbDiscovery, DbDiscoveryEvent, DbDiscoveryEventKind};
use crate::gattc::traits::{BleUuid, GattcStack};
use crate::queue::{SubmitOutcome, TxBuffer};

/// Client session for one peer's Nordic UART Service
pub struct NusClient<S: GattcStack, H: NusClientHandler> {
    stack: S,
    handler: H,
    tx_buffer: TxBuffer,
    context: ConnectionContext,
    /// Type tag of the NUS vendor base UUID
    uuid_type: u8,
}

impl<S: GattcStack, H: NusClientHandler> NusClient<S, H> {
    /// Create a client
    ///
    /// Registers the NUS base UUID with the stack and the service UUID with
    /// discovery. The client starts with no connection.
    pub fn new<D: DbDiscovery>(
        mut stack: S,
        discovery: &mut D,
        handler: H,
    ) -> Result<Self, NusClientError> {
        let uuid_type = stack.uuid_vs_add(&BASE_UUID)?;
        discovery.register(BleUuid::new(SERVICE_UUID, uuid_type))?;

        Ok(Self {
            stack,
            handler,
            tx_buffer: TxBuffer::new(),
            context: ConnectionContext::new(),
            uuid_type,
        })
    }

    /// Handle an event from the radio stack
    pub fn on_ble_evt(&mut self, event: &BleEvent<'_>) {
        match *event {
            BleEvent::Connected { conn_handle } => {
                self.context.conn_handle = conn_handle;
            }
            BleEvent::Disconnected {
                conn_handle,
                reason,
            } => self.on_disconnected(conn_handle, reason),
            BleEvent::Hvx { handle, data, .. } => self.on_hvx(handle, data),
            BleEvent::WriteResponse { .. } => self.on_response(),
            BleEvent::ReadResponse { handle, data, .. } => {
                self.on_response();
                self.handler.on_event(NusClientEvent::ReadResponse {
                    handle,
                    data: truncate_data(data),
                });
            }
            BleEvent::Other => {}
        }
    }

    /// Handle a result from the database discovery walker
    pub fn on_db_disc_evt(&mut self, event: &DbDiscoveryEvent) {
        let DbDiscoveryEventKind::Complete(db) = &event.kind else {
            return;
        };
        if db.srv_uuid != BleUuid::new(SERVICE_UUID, self.uuid_type) {
            return;
        }

        self.context.conn_handle = event.conn_handle;

        let rx_uuid = BleUuid::new(RX_CHARACTERISTIC_UUID, self.uuid_type);
        let tx_uuid = BleUuid::new(TX_CHARACTERISTIC_UUID, self.uuid_type);
        for characteristic in &db.characteristics {
            if characteristic.uuid == rx_uuid {
                self.context.rx_cccd_handle = characteristic.cccd_handle;
                self.context.rx_handle = characteristic.handle_value;
            }
            if characteristic.uuid == tx_uuid {
                self.context.tx_handle = characteristic.handle_value;
            }
        }

        log::info!(
            "nus_c: UART service discovered on conn {} (rx 0x{:04X}, tx 0x{:04X})",
            self.context.conn_handle,
            self.context.rx_handle,
            self.context.tx_handle
        );
        self.handler
            .on_event(NusClientEvent::DiscoveryComplete(self.context));
    }

    /// Send `data` to the peer's TX characteristic
    pub fn write_string(&mut self, data: &[u8]) -> Result<(), NusClientError> {
        if !self.context.is_connected() {
            return Err(NusClientError::InvalidState);
        }
        if self.context.tx_handle == HANDLE_INVALID {
            return Err(NusClientError::NullArgument);
        }

        log::debug!(
            "nus_c: writing {} bytes to handle 0x{:04X} on conn {}",
            data.len(),
            self.context.tx_handle,
            self.context.conn_handle
        );
        self.tx_buffer
            .enqueue_write(self.context.conn_handle, self.context.tx_handle, data)?;
        self.tx_buffer.process(&mut self.stack);
        Ok(())
    }

    /// Queue a read of `handle` on the current connection
    pub fn read(&mut self, handle: u16) -> Result<(), NusClientError> {
        if !self.context.is_connected() {
            return Err(NusClientError::InvalidState);
        }
        if handle == HANDLE_INVALID {
            return Err(NusClientError::NullArgument);
        }

        self.tx_buffer.enqueue_read(self.context.conn_handle, handle)?;
        self.tx_buffer.process(&mut self.stack);
        Ok(())
    }

    /// Ask the peer to notify data on the RX characteristic
    pub fn enable_rx_notifications(&mut self) -> Result<(), NusClientError> {
        self.configure_rx_cccd(true)
    }

    /// Stop RX notifications from the peer
    pub fn disable_rx_notifications(&mut self) -> Result<(), NusClientError> {
        self.configure_rx_cccd(false)
    }

    fn configure_rx_cccd(&mut self, enable: bool) -> Result<(), NusClientError> {
        if !self.context.is_connected() {
            return Err(NusClientError::InvalidState);
        }
        if self.context.rx_cccd_handle == HANDLE_INVALID {
            return Err(NusClientError::NullArgument);
        }

        log::debug!(
            "nus_c: configuring CCCD 0x{:04X} on conn {}",
            self.context.rx_cccd_handle,
            self.context.conn_handle
        );
        let cccd_val: u16 = if enable { CCCD_NOTIFICATION } else { 0 };
        self.tx_buffer.enqueue_write(
            self.context.conn_handle,
            self.context.rx_cccd_handle,
            &cccd_val.to_le_bytes(),
        )?;
        self.tx_buffer.process(&mut self.stack);
        Ok(())
    }

    /// Retry the head of the queue
    ///
    /// Useful when the stack signals freed transmit buffers through an
    /// event this client does not handle.
    pub fn process_pending(&mut self) -> SubmitOutcome {
        self.tx_buffer.process(&mut self.stack)
    }

    fn on_response(&mut self) {
        self.tx_buffer.on_response();
        self.tx_buffer.process(&mut self.stack);
    }

    fn on_hvx(&mut self, handle: u16, data: &[u8]) {
        if handle == HANDLE_INVALID || handle != self.context.rx_handle {
            log::trace!("nus_c: ignoring notification on handle 0x{:04X}", handle);
            return;
        }

        self.handler.on_event(NusClientEvent::RxData {
            data: truncate_data(data),
        });
    }

    fn on_disconnected(&mut self, conn_handle: u16, reason: u8) {
        if conn_handle != self.context.conn_handle {
            return;
        }

        log::info!(
            "nus_c: conn {} closed (reason 0x{:02X}), dropping {} queued requests",
            conn_handle,
            reason,
            self.tx_buffer.len()
        );
        self.context = ConnectionContext::new();
        self.tx_buffer.reset();
    }

    pub fn context(&self) -> &ConnectionContext {
        &self.context
    }

    pub fn uuid_type(&self) -> u8 {
        self.uuid_type
    }

    pub fn tx_buffer(&self) -> &TxBuffer {
        &self.tx_buffer
    }

    pub fn stack(&self) -> &S {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut S {
        &mut self.stack
    }
}
