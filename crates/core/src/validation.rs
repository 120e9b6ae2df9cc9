//! Token form validation
//!
//! Both entry points fail fast with a user-facing [`ValidationError`] and never
//! touch the network. The browser-style path requires an image and reports a
//! missing wallet with its own message; the server path names the first
//! missing field and treats the image as optional.

use crate::amount::{is_digit_string, MintAmount};
use crate::constants::MAX_DECIMALS;
use crate::error::ValidationError;
use crate::types::{non_blank, Socials, TokenForm, ValidatedToken};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// Validate a submission from the wallet-driven launch flow
pub fn validate_submission(form: &TokenForm) -> Result<ValidatedToken, ValidationError> {
    let wallet = non_blank(&form.wallet_address).ok_or(ValidationError::WalletNotConnected)?;

    let name = non_blank(&form.token_name);
    let symbol = non_blank(&form.token_symbol);
    let decimals = non_blank(&form.decimals);
    let supply_present = non_blank(&form.supply).is_some();
    let image_present = form.image.as_ref().is_some_and(|image| !image.is_empty());

    let (Some(name), Some(symbol), Some(decimals), true, true) =
        (name, symbol, decimals, supply_present, image_present)
    else {
        return Err(ValidationError::MissingFields);
    };

    let decimals = parse_decimals(&decimals)?;
    let supply = form.supply.clone().unwrap_or_default();
    let amount = MintAmount::new(&supply, decimals)?;
    let wallet = parse_wallet(&wallet)?;

    Ok(finish(form, name, symbol, decimals, supply, amount, wallet))
}

/// Validate a submission received by the mint endpoint
pub fn validate_server_submission(form: &TokenForm) -> Result<ValidatedToken, ValidationError> {
    let name = require(&form.token_name, "tokenName")?;
    let symbol = require(&form.token_symbol, "tokenSymbol")?;
    let decimals = require(&form.decimals, "decimals")?;
    require(&form.supply, "supply")?;
    let wallet = require(&form.wallet_address, "walletAddress")?;

    let wallet = parse_wallet(&wallet)?;
    let decimals = parse_decimals(&decimals)?;
    let supply = form.supply.clone().unwrap_or_default();
    let amount = MintAmount::new(&supply, decimals)?;

    Ok(finish(form, name, symbol, decimals, supply, amount, wallet))
}

/// Decimals must be an integer in [0, 9]
pub fn parse_decimals(value: &str) -> Result<u8, ValidationError> {
    value
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|d| *d <= MAX_DECIMALS)
        .ok_or(ValidationError::InvalidDecimals)
}

/// Supply must match `^\d+$`
pub fn check_supply(value: &str) -> Result<(), ValidationError> {
    if is_digit_string(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidSupply)
    }
}

fn parse_wallet(value: &str) -> Result<Pubkey, ValidationError> {
    Pubkey::from_str(value).map_err(|_| ValidationError::InvalidWalletAddress)
}

fn require(value: &Option<String>, field: &'static str) -> Result<String, ValidationError> {
    non_blank(value).ok_or(ValidationError::MissingField(field))
}

fn finish(
    form: &TokenForm,
    name: String,
    symbol: String,
    decimals: u8,
    supply: String,
    amount: MintAmount,
    wallet: Pubkey,
) -> ValidatedToken {
    ValidatedToken {
        name,
        symbol,
        decimals,
        supply,
        amount,
        description: non_blank(&form.description),
        wallet: Some(wallet),
        socials: Socials {
            website: non_blank(&form.website),
            x: non_blank(&form.x),
            telegram: non_blank(&form.telegram),
            youtube: non_blank(&form.youtube),
        },
        revoke_mint_authority: form.revoke_mint_authority,
        revoke_freeze_authority: form.revoke_freeze_authority,
    }
}
