//! End-to-end session against a simulated radio task.
//!
//! The client writes into a request channel; the "radio" drains it
//! asynchronously and answers with write responses and notifications.

use std::cell::RefCell;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;
use nus_client::config::nus::{
    RX_CHARACTERISTIC_UUID, SERVICE_UUID, TX_CHARACTERISTIC_UUID,
};
use nus_client::discovery::{
    DbDiscovery, DbDiscoveryEvent, DbDiscoveryEventKind, DiscoveredCharacteristic, DiscoveredDb,
};
use nus_client::gattc::{BleUuid, ChannelStack, GattcRequest, RequestChannel, StackError};
use nus_client::{BleEvent, NusClient, NusClientError, NusClientEvent};

const CONN: u16 = 1;
const TX_VALUE: u16 = 0x0B;
const RX_VALUE: u16 = 0x0D;
const RX_CCCD: u16 = 0x0E;

#[derive(Default)]
struct Discovery {
    registered: Option<BleUuid>,
}

impl DbDiscovery for Discovery {
    fn register(&mut self, uuid: BleUuid) -> Result<(), StackError> {
        self.registered = Some(uuid);
        Ok(())
    }
}

fn nus_discovered(uuid_type: u8) -> DbDiscoveryEvent {
    let mut characteristics = Vec::new();
    characteristics
        .push(DiscoveredCharacteristic {
            uuid: BleUuid::new(RX_CHARACTERISTIC_UUID, uuid_type),
            handle_value: RX_VALUE,
            cccd_handle: RX_CCCD,
        })
        .unwrap();
    characteristics
        .push(DiscoveredCharacteristic {
            uuid: BleUuid::new(TX_CHARACTERISTIC_UUID, uuid_type),
            handle_value: TX_VALUE,
            cccd_handle: 0,
        })
        .unwrap();

    DbDiscoveryEvent {
        conn_handle: CONN,
        kind: DbDiscoveryEventKind::Complete(DiscoveredDb {
            srv_uuid: BleUuid::new(SERVICE_UUID, uuid_type),
            characteristics,
        }),
    }
}

fn write_target(request: &GattcRequest) -> (u16, std::vec::Vec<u8>) {
    match request {
        GattcRequest::Write { params, .. } => (params.handle, params.value.to_vec()),
        GattcRequest::Read { .. } => panic!("unexpected read"),
    }
}

#[test]
fn session_over_request_channel() {
    let channel: RequestChannel<NoopRawMutex, 1> = Channel::new();
    let events = RefCell::new(std::vec::Vec::new());
    let mut discovery = Discovery::default();

    let mut client = NusClient::new(
        ChannelStack::new(&channel),
        &mut discovery,
        |e: NusClientEvent| events.borrow_mut().push(e),
    )
    .unwrap();
    assert_eq!(
        discovery.registered,
        Some(BleUuid::new(SERVICE_UUID, client.uuid_type()))
    );

    assert_eq!(client.write_string(b"early"), Err(NusClientError::InvalidState));

    client.on_ble_evt(&BleEvent::Connected { conn_handle: CONN });
    client.on_db_disc_evt(&nus_discovered(client.uuid_type()));
    assert!(matches!(
        events.borrow()[0],
        NusClientEvent::DiscoveryComplete(_)
    ));

    client.enable_rx_notifications().unwrap();
    client.write_string(b"ping").unwrap();
    client.write_string(b"pong").unwrap();

    futures::executor::block_on(async {
        let mut seen = std::vec::Vec::new();
        for _ in 0..3 {
            let request = channel.receive().await;
            assert_eq!(request.conn_handle(), CONN);
            seen.push(write_target(&request));

            // Nothing else reaches the radio until the response is in
            assert!(channel.try_receive().is_err());
            client.on_ble_evt(&BleEvent::WriteResponse {
                conn_handle: CONN,
                handle: seen.last().unwrap().0,
                gatt_status: 0,
            });
        }

        assert_eq!(seen, vec![
            (RX_CCCD, vec![0x01, 0x00]),
            (TX_VALUE, b"ping".to_vec()),
            (TX_VALUE, b"pong".to_vec()),
        ]);
    });

    client.on_ble_evt(&BleEvent::Hvx {
        conn_handle: CONN,
        handle: RX_VALUE,
        data: b"hello back",
    });
    assert_eq!(
        events.borrow().last(),
        Some(&NusClientEvent::RxData {
            data: Vec::from_slice(b"hello back").unwrap(),
        })
    );
    assert!(client.tx_buffer().is_empty());
}
