//! Nordic UART Service (NUS) GATT client
//!
//! Talks to a peer's UART service over BLE: discovers its RX/TX
//! characteristics, enables RX notifications and queues writes towards
//! the radio stack so that only one request is ever in flight.

#![cfg_attr(not(test), no_std)]

pub mod client;
pub mod config;
pub mod discovery;
pub mod gattc;
pub mod queue;

pub use client::{BleEvent, NusClient, NusClientError, NusClientEvent, NusClientHandler};
