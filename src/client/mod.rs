pub mod driver;
pub mod types;

pub use driver::NusClient;
pub use types::{BleEvent, ConnectionContext, NusClientError, NusClientEvent, NusClientHandler};
