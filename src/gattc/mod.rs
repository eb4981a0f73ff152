pub mod channel;
pub mod traits;

pub use channel::{ChannelStack, RequestChannel};
pub use traits::{BleUuid, GattcRequest, GattcStack, StackError, WriteOp, WriteParams};
