use alloy::primitives::{Address, B256, U256};

use crate::abi::{DEPOSIT_SIG, WITHDRAW_SIG, signature_name};
use crate::event::{EventKind, EventRecord};
use crate::payload::{DecodeError, UpkeepPayload};

/// Snapshot of the four engine counters.
///
/// All counters wrap on overflow; wraparound is intentional, matching the
/// watcher contract's unchecked arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub deposit_count: U256,
    pub withdraw_count: U256,
    pub off_chain_checks: U256,
    pub on_chain_actions: U256,
}

/// Outcome of a single check step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpkeepDecision {
    pub needed: bool,
    pub payload: Option<UpkeepPayload>,
}

impl UpkeepDecision {
    fn perform(payload: UpkeepPayload) -> Self {
        Self {
            needed: true,
            payload: Some(payload),
        }
    }

    fn skip() -> Self {
        Self {
            needed: false,
            payload: None,
        }
    }

    /// Encoded bytes to hand to the relay, when the upkeep is needed.
    pub fn perform_data(&self) -> Option<Vec<u8>> {
        self.payload.as_ref().map(UpkeepPayload::encode)
    }
}

/// Record emitted by a successful perform step — the engine's only
/// externally visible output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpkeepRecord {
    pub actor: Address,
    pub signature: B256,
    pub sequence_number: U256,
}

/// The log-triggered upkeep decision engine.
///
/// Single-writer: callers in concurrent environments must serialise
/// access to an instance. Check and perform are not paired — `act` may
/// run zero or several times per `evaluate`, with any bytes the relay
/// chooses to submit.
#[derive(Debug, Default)]
pub struct UpkeepEngine {
    deposit_count: U256,
    withdraw_count: U256,
    off_chain_checks: U256,
    on_chain_actions: U256,
}

impl UpkeepEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counters(&self) -> Counters {
        Counters {
            deposit_count: self.deposit_count,
            withdraw_count: self.withdraw_count,
            off_chain_checks: self.off_chain_checks,
            on_chain_actions: self.on_chain_actions,
        }
    }

    /// Check step: count the event and decide whether an upkeep is due.
    ///
    /// Every call bumps `off_chain_checks`, outcome or not. Deposits
    /// trigger on odd occurrences, withdrawals on even ones; unknown
    /// events touch no domain counter and never trigger.
    pub fn evaluate(&mut self, record: &EventRecord) -> UpkeepDecision {
        self.off_chain_checks = self.off_chain_checks.wrapping_add(U256::ONE);

        let decision = match record.kind {
            EventKind::Deposit => {
                self.deposit_count = self.deposit_count.wrapping_add(U256::ONE);
                if self.deposit_count.bit(0) {
                    UpkeepDecision::perform(UpkeepPayload::new(DEPOSIT_SIG, record.source))
                } else {
                    UpkeepDecision::skip()
                }
            }
            EventKind::Withdraw => {
                self.withdraw_count = self.withdraw_count.wrapping_add(U256::ONE);
                if !self.withdraw_count.bit(0) {
                    UpkeepDecision::perform(UpkeepPayload::new(WITHDRAW_SIG, record.source))
                } else {
                    UpkeepDecision::skip()
                }
            }
            EventKind::Unknown => UpkeepDecision::skip(),
        };

        tracing::debug!(
            kind = ?record.kind,
            source = %record.source,
            needed = decision.needed,
            checks = %self.off_chain_checks,
            "Check evaluated"
        );

        decision
    }

    /// Perform step: decode the relay's bytes and emit the upkeep record.
    ///
    /// `on_chain_actions` is bumped before decoding and is not rolled
    /// back when decoding fails — the counter and the decode are not
    /// atomic in the watcher contract's ordering, and that quirk is
    /// preserved here. Calls are one-shot: no retries, no deduplication.
    pub fn act(&mut self, perform_data: &[u8]) -> Result<UpkeepRecord, DecodeError> {
        self.on_chain_actions = self.on_chain_actions.wrapping_add(U256::ONE);

        let payload = UpkeepPayload::decode(perform_data)?;

        let record = UpkeepRecord {
            actor: payload.source,
            signature: payload.signature,
            sequence_number: self.on_chain_actions,
        };

        tracing::debug!(
            actor = %record.actor,
            signature = signature_name(&record.signature),
            upkeep = %record.sequence_number,
            "Upkeep performed"
        );

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn deposit(source: Address) -> EventRecord {
        EventRecord {
            kind: EventKind::Deposit,
            source,
        }
    }

    fn withdraw(source: Address) -> EventRecord {
        EventRecord {
            kind: EventKind::Withdraw,
            source,
        }
    }

    const A: Address = address!("00000000000000000000000000000000000000aa");
    const B: Address = address!("00000000000000000000000000000000000000bb");

    #[test]
    fn odd_deposits_trigger() {
        let mut engine = UpkeepEngine::new();
        for i in 1u64..=10 {
            let decision = engine.evaluate(&deposit(A));
            assert_eq!(decision.needed, i % 2 == 1, "deposit #{i}");
        }
        assert_eq!(engine.counters().deposit_count, U256::from(10));
    }

    #[test]
    fn even_withdrawals_trigger() {
        let mut engine = UpkeepEngine::new();
        for i in 1u64..=10 {
            let decision = engine.evaluate(&withdraw(A));
            assert_eq!(decision.needed, i % 2 == 0, "withdrawal #{i}");
        }
        assert_eq!(engine.counters().withdraw_count, U256::from(10));
    }

    #[test]
    fn unknown_events_count_checks_only() {
        let mut engine = UpkeepEngine::new();
        let decision = engine.evaluate(&EventRecord::UNKNOWN);
        assert!(!decision.needed);
        assert!(decision.payload.is_none());

        let counters = engine.counters();
        assert_eq!(counters.off_chain_checks, U256::from(1));
        assert_eq!(counters.deposit_count, U256::ZERO);
        assert_eq!(counters.withdraw_count, U256::ZERO);
    }

    #[test]
    fn triggered_decisions_carry_the_source() {
        let mut engine = UpkeepEngine::new();
        let decision = engine.evaluate(&deposit(B));
        assert_eq!(decision.payload, Some(UpkeepPayload::new(DEPOSIT_SIG, B)));

        engine.evaluate(&withdraw(A));
        let decision = engine.evaluate(&withdraw(B));
        assert_eq!(decision.payload, Some(UpkeepPayload::new(WITHDRAW_SIG, B)));
    }

    #[test]
    fn mixed_sequence_scenario() {
        let mut engine = UpkeepEngine::new();
        let c = address!("00000000000000000000000000000000000000cc");
        let d = address!("00000000000000000000000000000000000000dd");
        let e = address!("00000000000000000000000000000000000000ee");

        let events = [deposit(A), deposit(B), withdraw(c), withdraw(d), withdraw(e)];
        let decisions: Vec<bool> = events
            .iter()
            .map(|event| engine.evaluate(event).needed)
            .collect();
        assert_eq!(decisions, [true, false, false, true, false]);

        let counters = engine.counters();
        assert_eq!(counters.deposit_count, U256::from(2));
        assert_eq!(counters.withdraw_count, U256::from(3));
        assert_eq!(counters.off_chain_checks, U256::from(5));
    }

    #[test]
    fn counters_wrap_at_max() {
        let mut engine = UpkeepEngine::new();
        engine.deposit_count = U256::MAX;

        // MAX is odd, so the wrapped count of zero is even: no trigger.
        let decision = engine.evaluate(&deposit(A));
        assert!(!decision.needed);
        assert_eq!(engine.counters().deposit_count, U256::ZERO);
    }
}
