pub mod types;

pub use types::{
    DbDiscovery, DbDiscoveryEvent, DbDiscoveryEventKind, DiscoveredCharacteristic, DiscoveredDb,
};
