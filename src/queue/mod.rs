pub mod tx_buffer;

pub use tx_buffer::{QueueError, SubmitOutcome, TxBuffer, TxMessage, TxRequest, TxState};
