//! Lightweight Solana RPC client
//!
//! Implements only the JSON-RPC methods the launch paths need, over `ureq`,
//! instead of pulling in the full solana-client networking stack. Callers depend
//! on the [`SolanaRpc`] port so that tests can substitute an in-memory chain.

use crate::error::{LaunchError, LaunchResult};
use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};
use std::str::FromStr;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Commitment levels, ordered from weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

impl FromStr for Commitment {
    type Err = LaunchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            other => Err(LaunchError::Configuration(format!(
                "Unknown commitment level: {}",
                other
            ))),
        }
    }
}

/// Status of a submitted transaction as reported by `getSignatureStatuses`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    pub slot: u64,
    pub confirmations: Option<u64>,
    pub err: Option<Value>,
    pub confirmation_status: Option<Commitment>,
}

impl SignatureStatus {
    /// A missing confirmation status means the slot is already rooted
    pub fn satisfies(&self, required: Commitment) -> bool {
        self.confirmation_status.unwrap_or(Commitment::Finalized) >= required
    }
}

/// Port for the chain operations both launch paths perform
#[async_trait]
pub trait SolanaRpc: Send + Sync {
    /// Endpoint this client talks to
    fn url(&self) -> String;

    /// Get the latest blockhash
    async fn get_latest_blockhash(&self) -> LaunchResult<Hash>;

    /// Submit a fully signed transaction
    async fn send_transaction(&self, transaction: &Transaction) -> LaunchResult<Signature>;

    /// Look up the status of a signature; `None` while the cluster has not seen it
    async fn get_signature_status(&self, signature: &Signature) -> LaunchResult<Option<SignatureStatus>>;

    /// Lamports needed to keep an account of `data_len` bytes rent exempt
    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> LaunchResult<u64>;

    /// Lamport balance of an account
    async fn get_balance(&self, pubkey: &Pubkey) -> LaunchResult<u64>;

    /// Whether an account exists
    async fn account_exists(&self, pubkey: &Pubkey) -> LaunchResult<bool>;
}

/// Confirmation polling settings
#[derive(Debug, Clone, Copy)]
pub struct ConfirmOptions {
    pub commitment: Commitment,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ConfirmOptions {
    fn default() -> Self {
        Self {
            commitment: Commitment::Confirmed,
            timeout: Duration::from_secs(crate::constants::DEFAULT_CONFIRM_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(crate::constants::DEFAULT_CONFIRM_POLL_MS),
        }
    }
}

/// Poll until `signature` reaches the requested commitment.
///
/// Fails fast if the transaction landed with an error, and with
/// [`LaunchError::ConfirmationTimeout`] once `options.timeout` has elapsed.
pub async fn confirm_transaction<R: SolanaRpc + ?Sized>(
    rpc: &R,
    signature: &Signature,
    options: &ConfirmOptions,
) -> LaunchResult<SignatureStatus> {
    let deadline = Instant::now() + options.timeout;

    loop {
        if let Some(status) = rpc.get_signature_status(signature).await? {
            if let Some(err) = &status.err {
                return Err(LaunchError::TransactionFailed(format!("{}: {}", signature, err)));
            }
            if status.satisfies(options.commitment) {
                debug!("Signature {} reached {} at slot {}", signature, options.commitment.as_str(), status.slot);
                return Ok(status);
            }
        }

        if Instant::now() >= deadline {
            warn!("Gave up waiting for {} after {:?}", signature, options.timeout);
            return Err(LaunchError::ConfirmationTimeout {
                signature: signature.to_string(),
                timeout: options.timeout,
            });
        }

        tokio::time::sleep(options.poll_interval).await;
    }
}

/// Submit a signed transaction and wait for confirmation
pub async fn send_and_confirm_transaction<R: SolanaRpc + ?Sized>(
    rpc: &R,
    transaction: &Transaction,
    options: &ConfirmOptions,
) -> LaunchResult<Signature> {
    let signature = rpc.send_transaction(transaction).await?;
    info!("Submitted transaction {}", signature);
    confirm_transaction(rpc, &signature, options).await?;
    Ok(signature)
}

/// Lightweight RPC client for Solana
pub struct LightRpcClient {
    url: String,
    agent: ureq::Agent,
    commitment: Commitment,
}

/// RPC response wrapper
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

/// RPC error structure
#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// `{ context, value }` envelope used by most RPC methods
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct BlockhashValue {
    blockhash: String,
}

impl LightRpcClient {
    /// Create a new lightweight RPC client
    pub fn new(url: impl Into<String>, commitment: Commitment) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(30))
            .build();

        Self {
            url: url.into(),
            agent,
            commitment,
        }
    }

    /// Make a JSON-RPC call
    async fn call<T>(&self, method: &str, params: Value) -> LaunchResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        debug!("RPC call: {} with params: {}", method, params);

        // ureq is blocking; keep it off the async workers
        let response_body = tokio::task::spawn_blocking({
            let agent = self.agent.clone();
            let url = self.url.clone();
            let body = request_body.to_string();

            move || {
                let response = agent
                    .post(&url)
                    .set("Content-Type", "application/json")
                    .send_string(&body)?;

                let text = response.into_string()?;
                Ok::<String, ureq::Error>(text)
            }
        })
        .await
        .map_err(|e| LaunchError::Rpc(format!("RPC task failed: {}", e)))??;

        let rpc_response: RpcResponse<T> = serde_json::from_str(&response_body)?;

        if let Some(error) = rpc_response.error {
            return Err(LaunchError::Rpc(format!("{} ({})", error.message, error.code)));
        }

        rpc_response
            .result
            .ok_or_else(|| LaunchError::Rpc(format!("No result in {} response", method)))
    }
}

#[async_trait]
impl SolanaRpc for LightRpcClient {
    fn url(&self) -> String {
        self.url.clone()
    }

    async fn get_latest_blockhash(&self) -> LaunchResult<Hash> {
        let response: WithContext<BlockhashValue> = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": self.commitment.as_str() }]),
            )
            .await?;

        Hash::from_str(&response.value.blockhash)
            .map_err(|e| LaunchError::Rpc(format!("Failed to parse blockhash: {}", e)))
    }

    async fn send_transaction(&self, transaction: &Transaction) -> LaunchResult<Signature> {
        let serialized = bincode::serialize(transaction)?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(serialized);

        let params = json!([
            encoded,
            {
                "encoding": "base64",
                "preflightCommitment": self.commitment.as_str()
            }
        ]);

        let signature: String = self.call("sendTransaction", params).await?;
        Signature::from_str(&signature)
            .map_err(|e| LaunchError::Rpc(format!("Failed to parse signature: {}", e)))
    }

    async fn get_signature_status(&self, signature: &Signature) -> LaunchResult<Option<SignatureStatus>> {
        let params = json!([
            [signature.to_string()],
            { "searchTransactionHistory": true }
        ]);

        let response: WithContext<Vec<Option<SignatureStatus>>> =
            self.call("getSignatureStatuses", params).await?;

        Ok(response.value.into_iter().next().flatten())
    }

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> LaunchResult<u64> {
        self.call("getMinimumBalanceForRentExemption", json!([data_len]))
            .await
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> LaunchResult<u64> {
        let response: WithContext<u64> = self
            .call(
                "getBalance",
                json!([pubkey.to_string(), { "commitment": self.commitment.as_str() }]),
            )
            .await?;
        Ok(response.value)
    }

    async fn account_exists(&self, pubkey: &Pubkey) -> LaunchResult<bool> {
        let params = json!([
            pubkey.to_string(),
            {
                "encoding": "base64",
                "commitment": self.commitment.as_str()
            }
        ]);

        let response: WithContext<Option<Value>> = self.call("getAccountInfo", params).await?;
        Ok(response.value.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockRpc, StatusBehavior};
    use solana_sdk::signature::{Keypair, Signer};
    use solana_sdk::system_instruction;

    fn transfer(payer: &Keypair) -> Transaction {
        let ix = system_instruction::transfer(&payer.pubkey(), &Pubkey::new_unique(), 1);
        Transaction::new_signed_with_payer(&[ix], Some(&payer.pubkey()), &[payer], Hash::new_unique())
    }

    fn fast() -> ConfirmOptions {
        ConfirmOptions {
            commitment: Commitment::Confirmed,
            timeout: Duration::from_millis(50),
            poll_interval: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_commitment_ordering() {
        assert!(Commitment::Finalized > Commitment::Confirmed);
        assert!(Commitment::Confirmed > Commitment::Processed);
        assert_eq!("confirmed".parse::<Commitment>().unwrap(), Commitment::Confirmed);
        assert!("max".parse::<Commitment>().is_err());
    }

    #[test]
    fn test_status_parsing() {
        let status: SignatureStatus = serde_json::from_value(json!({
            "slot": 72,
            "confirmations": 10,
            "err": null,
            "confirmationStatus": "confirmed"
        }))
        .unwrap();
        assert!(status.satisfies(Commitment::Confirmed));
        assert!(!status.satisfies(Commitment::Finalized));
    }

    #[test]
    fn test_rooted_status_satisfies_everything() {
        let status: SignatureStatus = serde_json::from_value(json!({
            "slot": 1,
            "confirmations": null,
            "err": null,
            "confirmationStatus": null
        }))
        .unwrap();
        assert!(status.satisfies(Commitment::Finalized));
    }

    #[tokio::test]
    async fn test_confirm_after_processed() {
        let rpc = MockRpc::new().with_status(StatusBehavior::ProcessedThenConfirmed);
        let signature = rpc.send_transaction(&transfer(&Keypair::new())).await.unwrap();

        let status = confirm_transaction(&rpc, &signature, &fast()).await.unwrap();
        assert_eq!(status.confirmation_status, Some(Commitment::Confirmed));
        assert!(rpc.status_polls() >= 2);
    }

    #[tokio::test]
    async fn test_confirm_times_out() {
        let rpc = MockRpc::new().with_status(StatusBehavior::NeverSeen);
        let signature = rpc.send_transaction(&transfer(&Keypair::new())).await.unwrap();

        let err = confirm_transaction(&rpc, &signature, &fast()).await.unwrap_err();
        assert!(matches!(err, LaunchError::ConfirmationTimeout { .. }));
    }

    #[tokio::test]
    async fn test_confirm_reports_on_chain_failure() {
        let rpc = MockRpc::new().with_status(StatusBehavior::Failed);
        let signature = rpc.send_transaction(&transfer(&Keypair::new())).await.unwrap();

        let err = confirm_transaction(&rpc, &signature, &fast()).await.unwrap_err();
        assert!(matches!(err, LaunchError::TransactionFailed(_)));
    }

    #[test]
    fn test_rpc_client_creation() {
        let client = LightRpcClient::new("http://localhost:8899", Commitment::Confirmed);
        assert_eq!(client.url(), "http://localhost:8899");
    }
}
