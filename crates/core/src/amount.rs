//! Mint amount math
//!
//! The total amount minted is `supply x 10^decimals` base units. Supply is an
//! unbounded digit string, so the product is computed with arbitrary precision
//! and only narrowed to the on-chain `u64` when an instruction is built.

use crate::constants::MAX_DECIMALS;
use crate::error::ValidationError;
use bigdecimal::BigDecimal;
use num_traits::ToPrimitive;
use std::fmt;
use std::str::FromStr;

/// Total base units to mint for a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintAmount(BigDecimal);

impl MintAmount {
    /// Compute `supply x 10^decimals`.
    ///
    /// `supply` must match `^\d+$`; leading zeros are accepted.
    pub fn new(supply: &str, decimals: u8) -> Result<Self, ValidationError> {
        if !is_digit_string(supply) {
            return Err(ValidationError::InvalidSupply);
        }
        if decimals > MAX_DECIMALS {
            return Err(ValidationError::InvalidDecimals);
        }

        let supply = BigDecimal::from_str(supply).map_err(|_| ValidationError::InvalidSupply)?;
        let multiplier = BigDecimal::from(10u64.pow(u32::from(decimals)));

        Ok(Self((supply * multiplier).with_scale(0)))
    }

    /// Narrow to the `u64` an SPL `mint_to` instruction carries
    pub fn to_base_units(&self) -> Result<u64, ValidationError> {
        self.0.to_u64().ok_or_else(|| ValidationError::AmountOverflow {
            amount: self.to_string(),
        })
    }

    pub fn is_zero(&self) -> bool {
        self.0 == BigDecimal::from(0u64)
    }
}

impl fmt::Display for MintAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (digits, _scale) = self.0.as_bigint_and_exponent();
        write!(f, "{}", digits)
    }
}

/// `^\d+$` over ASCII digits
pub fn is_digit_string(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supply_times_decimals() {
        let amount = MintAmount::new("100", 2).unwrap();
        assert_eq!(amount.to_string(), "10000");
        assert_eq!(amount.to_base_units().unwrap(), 10_000);
    }

    #[test]
    fn test_leading_zeros_and_zero_supply() {
        assert_eq!(MintAmount::new("007", 0).unwrap().to_base_units().unwrap(), 7);
        assert!(MintAmount::new("0", 9).unwrap().is_zero());
    }

    #[test]
    fn test_beyond_u64_keeps_precision() {
        // 10^12 tokens at 9 decimals = 10^21 base units
        let amount = MintAmount::new("1000000000000", 9).unwrap();
        assert_eq!(amount.to_string(), "1000000000000000000000");
        assert!(matches!(
            amount.to_base_units(),
            Err(ValidationError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn test_u64_boundary() {
        let max = u64::MAX.to_string();
        assert_eq!(MintAmount::new(&max, 0).unwrap().to_base_units().unwrap(), u64::MAX);
    }

    #[test]
    fn test_rejects_non_digit_supply() {
        for supply in ["12.5", "-5", "", "1e3", " 12"] {
            assert_eq!(
                MintAmount::new(supply, 0),
                Err(ValidationError::InvalidSupply),
                "supply {:?}",
                supply
            );
        }
    }
}
