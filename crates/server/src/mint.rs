//! Server-authoritative token minting
//!
//! Every step is its own confirmed transaction and the chain stops at the
//! first failure. Nothing is rolled back: a mint created before a later step
//! fails stays on chain. Requests are not deduplicated, so two submissions for
//! the same wallet produce two mints.

use coinforge_core::rpc::send_and_confirm_transaction;
use coinforge_core::{
    ConfirmOptions, ImageUpload, LaunchError, LaunchResult, MetadataPinner, PinRequest,
    PinnedMetadata, SolanaRpc, ValidationError, ValidatedToken,
};
use mpl_token_metadata::{
    accounts::Metadata,
    instructions::CreateMetadataAccountV3Builder,
    types::{Creator, DataV2},
};
use solana_program::program_pack::Pack;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    system_instruction,
    transaction::Transaction,
};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};
use spl_token::{instruction::AuthorityType, state::Mint};
use std::sync::Arc;
use tracing::info;

/// Result of a completed server-side mint
#[derive(Debug, Clone)]
pub struct MintOutcome {
    pub mint: Pubkey,
    pub token_account: Pubkey,
    pub base_units: u64,
    pub metadata: PinnedMetadata,
    pub signatures: Vec<Signature>,
}

/// Creates, funds and describes SPL mints with the server's payer key
pub struct MintService {
    rpc: Arc<dyn SolanaRpc>,
    pinner: Arc<dyn MetadataPinner>,
    payer: Arc<Keypair>,
    confirm: ConfirmOptions,
}

impl MintService {
    pub fn new(
        rpc: Arc<dyn SolanaRpc>,
        pinner: Arc<dyn MetadataPinner>,
        payer: Arc<Keypair>,
        confirm: ConfirmOptions,
    ) -> Self {
        Self {
            rpc,
            pinner,
            payer,
            confirm,
        }
    }

    pub fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    pub fn rpc(&self) -> &Arc<dyn SolanaRpc> {
        &self.rpc
    }

    /// Run the full mint sequence for a validated request
    pub async fn create_token(
        &self,
        token: &ValidatedToken,
        image: Option<ImageUpload>,
    ) -> LaunchResult<MintOutcome> {
        let owner = token.wallet.ok_or(ValidationError::MissingField("walletAddress"))?;
        let base_units = token.amount.to_base_units()?;
        let payer = self.payer.pubkey();
        let mut signatures = Vec::new();

        // 1. Mint account, payer holds both authorities for now
        let mint = Keypair::new();
        let rent = self
            .rpc
            .get_minimum_balance_for_rent_exemption(Mint::LEN)
            .await?;
        let create_mint = vec![
            system_instruction::create_account(
                &payer,
                &mint.pubkey(),
                rent,
                Mint::LEN as u64,
                &spl_token::id(),
            ),
            spl_token::instruction::initialize_mint2(
                &spl_token::id(),
                &mint.pubkey(),
                &payer,
                Some(&payer),
                token.decimals,
            )
            .map_err(instruction_error)?,
        ];
        signatures.push(self.submit(&create_mint, &[&mint]).await?);
        info!("Created mint {} with {} decimals", mint.pubkey(), token.decimals);

        // 2. Destination account and full supply
        let token_account = get_associated_token_address(&owner, &mint.pubkey());
        let mut fund = Vec::with_capacity(2);
        if !self.rpc.account_exists(&token_account).await? {
            fund.push(create_associated_token_account_idempotent(
                &payer,
                &owner,
                &mint.pubkey(),
                &spl_token::id(),
            ));
        }
        fund.push(
            spl_token::instruction::mint_to(
                &spl_token::id(),
                &mint.pubkey(),
                &token_account,
                &payer,
                &[],
                base_units,
            )
            .map_err(instruction_error)?,
        );
        signatures.push(self.submit(&fund, &[]).await?);
        info!("Minted {} base units to {}", token.amount, token_account);

        // 3. Off-chain metadata
        let metadata = self.pinner.pin(&PinRequest::from_token(token, image)).await?;

        // 4. On-chain metadata; needs the mint authority, so it precedes revocation
        let register = create_metadata_instruction(&mint.pubkey(), &payer, &metadata);
        signatures.push(self.submit(&[register], &[]).await?);
        info!("Registered metadata {} for {}", metadata.uri, mint.pubkey());

        // 5. Optional authority revocation
        let revoke = revoke_instructions(
            &mint.pubkey(),
            &payer,
            token.revoke_mint_authority,
            token.revoke_freeze_authority,
        )?;
        if !revoke.is_empty() {
            signatures.push(self.submit(&revoke, &[]).await?);
            info!(
                "Revoked authorities on {} (mint: {}, freeze: {})",
                mint.pubkey(),
                token.revoke_mint_authority,
                token.revoke_freeze_authority
            );
        }

        Ok(MintOutcome {
            mint: mint.pubkey(),
            token_account,
            base_units,
            metadata,
            signatures,
        })
    }

    /// Sign with the payer plus `extra_signers`, send and confirm
    async fn submit(&self, instructions: &[Instruction], extra_signers: &[&Keypair]) -> LaunchResult<Signature> {
        let recent_blockhash = self.rpc.get_latest_blockhash().await?;

        let mut signers: Vec<&Keypair> = vec![self.payer.as_ref()];
        signers.extend_from_slice(extra_signers);

        let transaction = Transaction::new_signed_with_payer(
            instructions,
            Some(&self.payer.pubkey()),
            signers.as_slice(),
            recent_blockhash,
        );

        send_and_confirm_transaction(self.rpc.as_ref(), &transaction, &self.confirm).await
    }
}

/// Metaplex metadata account for a fungible mint: no royalties, the payer as
/// sole verified creator, immutable
pub fn create_metadata_instruction(mint: &Pubkey, payer: &Pubkey, metadata: &PinnedMetadata) -> Instruction {
    let (metadata_account, _) = Metadata::find_pda(mint);

    CreateMetadataAccountV3Builder::new()
        .metadata(metadata_account)
        .mint(*mint)
        .mint_authority(*payer)
        .payer(*payer)
        .update_authority(*payer, true)
        .data(DataV2 {
            name: metadata.name.clone(),
            symbol: metadata.symbol.clone(),
            uri: metadata.uri.clone(),
            seller_fee_basis_points: 0,
            creators: Some(vec![Creator {
                address: *payer,
                verified: true,
                share: 100,
            }]),
            collection: None,
            uses: None,
        })
        .is_mutable(false)
        .instruction()
}

/// `SetAuthority` to `None` for each requested authority
pub fn revoke_instructions(
    mint: &Pubkey,
    authority: &Pubkey,
    revoke_mint: bool,
    revoke_freeze: bool,
) -> LaunchResult<Vec<Instruction>> {
    let mut instructions = Vec::new();
    for (requested, authority_type) in [
        (revoke_mint, AuthorityType::MintTokens),
        (revoke_freeze, AuthorityType::FreezeAccount),
    ] {
        if requested {
            instructions.push(
                spl_token::instruction::set_authority(
                    &spl_token::id(),
                    mint,
                    None,
                    authority_type,
                    authority,
                    &[],
                )
                .map_err(instruction_error)?,
            );
        }
    }
    Ok(instructions)
}

fn instruction_error(err: impl std::fmt::Display) -> LaunchError {
    LaunchError::Instruction(err.to_string())
}
