use alloy::primitives::B256;
use alloy::sol;
use alloy::sol_types::SolEvent;

// ─── Event Emitter ──────────────────────────────────────────────────────────
sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract EventEmitter {
        event DepositEvent(address indexed by);
        event WithdrawEvent(address indexed by);

        function deposit() external;
        function withdraw() external;
    }
}

// ─── Event Watcher ──────────────────────────────────────────────────────────
sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract EventWatcher {
        event UpkeepPerformed(address indexed by, bytes32 eventSig, uint256 upkeepNumber);

        function counterOffchain() external view returns (uint256);
        function counterOnchain() external view returns (uint256);
    }
}

/// keccak-256 of `"DepositEvent(address)"`.
pub const DEPOSIT_SIG: B256 = EventEmitter::DepositEvent::SIGNATURE_HASH;

/// keccak-256 of `"WithdrawEvent(address)"`.
pub const WITHDRAW_SIG: B256 = EventEmitter::WithdrawEvent::SIGNATURE_HASH;

/// Human-readable name for a known event signature hash.
pub fn signature_name(sig: &B256) -> &'static str {
    if *sig == DEPOSIT_SIG {
        "DepositEvent"
    } else if *sig == WITHDRAW_SIG {
        "WithdrawEvent"
    } else {
        "UnknownEvent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::keccak256;

    #[test]
    fn signature_constants_match_canonical_names() {
        assert_eq!(DEPOSIT_SIG, keccak256("DepositEvent(address)"));
        assert_eq!(WITHDRAW_SIG, keccak256("WithdrawEvent(address)"));
    }

    #[test]
    fn signature_names() {
        assert_eq!(signature_name(&DEPOSIT_SIG), "DepositEvent");
        assert_eq!(signature_name(&WITHDRAW_SIG), "WithdrawEvent");
        assert_eq!(signature_name(&B256::ZERO), "UnknownEvent");
    }
}
