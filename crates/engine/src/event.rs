use alloy::primitives::Address;
use alloy::rpc::types::Log;

use crate::abi::{DEPOSIT_SIG, WITHDRAW_SIG};

/// Kind of an observed emitter event, selected by topic 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Deposit,
    Withdraw,
    Unknown,
}

/// A single observed event: its kind plus the address that raised it.
///
/// The source address is the indexed parameter at topic 1, stored
/// 32-byte-padded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecord {
    pub kind: EventKind,
    pub source: Address,
}

impl EventRecord {
    /// Record for a log the engine does not recognise.
    pub const UNKNOWN: Self = Self {
        kind: EventKind::Unknown,
        source: Address::ZERO,
    };
}

/// Classify a raw log into an [`EventRecord`].
///
/// Logs whose topic 0 matches neither known signature, and logs missing
/// the address topic, fold to [`EventRecord::UNKNOWN`]. Classification
/// never fails.
pub fn classify_log(log: &Log) -> EventRecord {
    let topics = log.inner.data.topics();

    let kind = match topics.first() {
        Some(sig) if *sig == DEPOSIT_SIG => EventKind::Deposit,
        Some(sig) if *sig == WITHDRAW_SIG => EventKind::Withdraw,
        _ => return EventRecord::UNKNOWN,
    };

    match topics.get(1) {
        Some(word) => EventRecord {
            kind,
            source: Address::from_word(*word),
        },
        None => EventRecord::UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Bytes, B256, LogData, address, b256};

    fn log_with_topics(topics: Vec<B256>) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: address!("038f007027cbadf831895fe866f4bea2316e73e9"),
                data: LogData::new_unchecked(topics, Bytes::new()),
            },
            ..Default::default()
        }
    }

    #[test]
    fn classifies_deposit_log() {
        let by = address!("ac4a7733e0a663d1fdda3a1c817119ba60d7dfd7");
        let log = log_with_topics(vec![DEPOSIT_SIG, by.into_word()]);
        let record = classify_log(&log);
        assert_eq!(record.kind, EventKind::Deposit);
        assert_eq!(record.source, by);
    }

    #[test]
    fn classifies_withdraw_log() {
        let by = address!("ac4a7733e0a663d1fdda3a1c817119ba60d7dfd7");
        let log = log_with_topics(vec![WITHDRAW_SIG, by.into_word()]);
        let record = classify_log(&log);
        assert_eq!(record.kind, EventKind::Withdraw);
        assert_eq!(record.source, by);
    }

    #[test]
    fn unrecognised_signature_folds_to_unknown() {
        let sig = b256!("deadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef");
        let by = address!("ac4a7733e0a663d1fdda3a1c817119ba60d7dfd7");
        let log = log_with_topics(vec![sig, by.into_word()]);
        assert_eq!(classify_log(&log), EventRecord::UNKNOWN);
    }

    #[test]
    fn missing_topics_fold_to_unknown() {
        assert_eq!(classify_log(&log_with_topics(vec![])), EventRecord::UNKNOWN);
        assert_eq!(
            classify_log(&log_with_topics(vec![DEPOSIT_SIG])),
            EventRecord::UNKNOWN
        );
    }
}
