use alloy::primitives::{Address, B256};
use alloy::sol_types::SolValue;
use thiserror::Error;

/// Byte length of encoded perform data: one `bytes32` word plus one
/// 32-byte-padded `address` word.
pub const PERFORM_DATA_LEN: usize = 64;

/// Perform-data decode failure. Fatal to the single `act` call that
/// received the bytes; engine counters are not rolled back.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("perform data must be {PERFORM_DATA_LEN} bytes, got {0}")]
    Length(usize),

    #[error("perform data has non-zero address padding")]
    Padding,
}

impl From<DecodeError> for upkeep_core::AppError {
    fn from(err: DecodeError) -> Self {
        upkeep_core::AppError::Decode(err.to_string())
    }
}

/// Decision context handed from the check step to the perform step.
///
/// Typed on the API side; crosses the relay boundary as the ABI tuple
/// `(bytes32, address)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpkeepPayload {
    pub signature: B256,
    pub source: Address,
}

impl UpkeepPayload {
    pub fn new(signature: B256, source: Address) -> Self {
        Self { signature, source }
    }

    /// ABI-encode as `(bytes32, address)`.
    pub fn encode(&self) -> Vec<u8> {
        (self.signature, self.source).abi_encode()
    }

    /// Decode the `(bytes32, address)` tuple, validating the byte-level
    /// contract: exact length and zeroed address padding.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() != PERFORM_DATA_LEN {
            return Err(DecodeError::Length(data.len()));
        }

        let signature = B256::from_slice(&data[..32]);
        let word = B256::from_slice(&data[32..]);
        if word[..12].iter().any(|b| *b != 0) {
            return Err(DecodeError::Padding);
        }

        Ok(Self {
            signature,
            source: Address::from_word(word),
        })
    }
}
