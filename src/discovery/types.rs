//! Database discovery records and registration interface
//!
//! The discovery walker itself lives outside this crate. It is told which
//! service UUIDs to look for and reports back one [`DbDiscoveryEvent`] per
//! service once the remote database has been walked.

use crate::config::discovery::MAX_CHARACTERISTICS;
use crate::gattc::traits::{BleUuid, StackError};
use heapless::Vec;

/// A characteristic found on the peer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveredCharacteristic {
    /// Characteristic UUID
    pub uuid: BleUuid,
    /// Handle of the characteristic value
    pub handle_value: u16,
    /// Handle of the Client Characteristic Configuration Descriptor, if any
    pub cccd_handle: u16,
}

/// A discovered service and its characteristics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDb {
    pub srv_uuid: BleUuid,
    pub characteristics: Vec<DiscoveredCharacteristic, MAX_CHARACTERISTICS>,
}

/// Outcome of a discovery run for one registered service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbDiscoveryEventKind {
    /// The service was found; the record lists its characteristics
    Complete(DiscoveredDb),
    /// The peer does not expose the service
    ServiceNotFound,
    /// Discovery aborted
    Error(StackError),
}

/// Discovery event delivered to interested clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbDiscoveryEvent {
    pub conn_handle: u16,
    pub kind: DbDiscoveryEventKind,
}

/// Database discovery collaborator
pub trait DbDiscovery {
    /// Ask discovery to report on the service identified by `uuid`
    fn register(&mut self, uuid: BleUuid) -> Result<(), StackError>;
}

impl<D: DbDiscovery + ?Sized> DbDiscovery for &mut D {
    fn register(&mut self, uuid: BleUuid) -> Result<(), StackError> {
        (**self).register(uuid)
    }
}

#[cfg(test)]
pub mod mock {
    //! Mock discovery collaborator for testing

    use super::*;

    /// Records every service registration
    pub struct MockDbDiscovery {
        registered: Vec<BleUuid, 4>,
        next_error: Option<StackError>,
    }

    impl MockDbDiscovery {
        pub fn new() -> Self {
            Self {
                registered: Vec::new(),
                next_error: None,
            }
        }

        /// Fail the next register() call
        pub fn set_next_error(&mut self, error: StackError) {
            self.next_error = Some(error);
        }

        /// Services registered so far
        pub fn registered(&self) -> &[BleUuid] {
            &self.registered
        }
    }

    impl Default for MockDbDiscovery {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DbDiscovery for MockDbDiscovery {
        fn register(&mut self, uuid: BleUuid) -> Result<(), StackError> {
            if let Some(error) = self.next_error.take() {
                return Err(error);
            }
            self.registered
                .push(uuid)
                .map_err(|_| StackError::NoResources)
        }
    }
}
