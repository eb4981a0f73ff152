//! Compile-time configuration for the Nordic UART Service client

/// Outbound request queue sizing
pub mod queue {
    /// Ring buffer mask. Must be a run of ones (000...111).
    pub const TX_BUFFER_MASK: usize = 0x07;

    /// Number of request slots, one higher than the mask
    pub const TX_BUFFER_SIZE: usize = TX_BUFFER_MASK + 1;

    /// Maximum payload of a single queued write
    pub const WRITE_MESSAGE_LENGTH: usize = 20;
}

/// Nordic UART Service identifiers
///
/// - Service UUID: 6E400001-B5A3-F393-E0A9-E50E24DCCA9E
/// - TX Characteristic: 6E400002-... (client writes here)
/// - RX Characteristic: 6E400003-... (server notifies here)
pub mod nus {
    /// 128-bit vendor base UUID, little-endian byte order.
    /// Bytes 12 and 13 are overwritten by the 16-bit short UUIDs below.
    pub const BASE_UUID: [u8; 16] = [
        0x9E, 0xCA, 0xDC, 0x24, 0x0E, 0xE5, 0xA9, 0xE0, 0x93, 0xF3, 0xA3, 0xB5, 0x00, 0x00, 0x40,
        0x6E,
    ];

    pub const SERVICE_UUID: u16 = 0x0001;
    pub const TX_CHARACTERISTIC_UUID: u16 = 0x0002;
    pub const RX_CHARACTERISTIC_UUID: u16 = 0x0003;

    /// Largest notification payload delivered to the application
    pub const MAX_DATA_LEN: usize = 20;
}

/// GATT protocol constants
pub mod gatt {
    /// Connection handle meaning "not connected"
    pub const CONN_HANDLE_INVALID: u16 = 0xFFFF;

    /// Attribute handle meaning "not discovered"
    pub const HANDLE_INVALID: u16 = 0x0000;

    /// CCCD value enabling notifications
    pub const CCCD_NOTIFICATION: u16 = 0x0001;

    /// UUID type tag of the Bluetooth SIG base UUID
    pub const UUID_TYPE_BLE: u8 = 0x01;

    /// First UUID type tag handed out for vendor-specific bases
    pub const UUID_TYPE_VENDOR_BEGIN: u8 = 0x02;
}

/// Database discovery limits
pub mod discovery {
    /// Characteristics carried in a single discovery record
    pub const MAX_CHARACTERISTICS: usize = 6;
}

/// Channel-backed radio stack limits
pub mod channel {
    /// Vendor-specific base UUIDs the channel stack can register
    pub const MAX_VENDOR_UUIDS: usize = 4;
}
