pub mod abi;
pub mod engine;
pub mod event;
pub mod payload;
pub mod provider;

pub use abi::{DEPOSIT_SIG, EventEmitter, EventWatcher, WITHDRAW_SIG, signature_name};
pub use engine::{Counters, UpkeepDecision, UpkeepEngine, UpkeepRecord};
pub use event::{EventKind, EventRecord, classify_log};
pub use payload::{DecodeError, PERFORM_DATA_LEN, UpkeepPayload};
pub use provider::create_provider;
