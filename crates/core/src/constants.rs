/// Constants shared by the client and server launch paths

// ============================================================================
// Token Parameters
// ============================================================================

/// Largest decimal precision an SPL mint accepts here
pub const MAX_DECIMALS: u8 = 9;

// ============================================================================
// Upload Limits
// ============================================================================

/// Maximum accepted image size (2 MiB)
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Maximum image width in pixels
pub const MAX_IMAGE_WIDTH: u32 = 500;

/// Maximum image height in pixels
pub const MAX_IMAGE_HEIGHT: u32 = 500;

// ============================================================================
// Fees & Network Defaults
// ============================================================================

/// Default creation fee: 0.007 SOL
pub const DEFAULT_FEE_LAMPORTS: u64 = 7_000_000;

/// Default public mainnet RPC endpoint
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Default metadata pinning endpoint
pub const DEFAULT_PIN_ENDPOINT: &str = "https://pump.fun/api/ipfs";

/// Default trading API endpoint
pub const DEFAULT_TRADE_ENDPOINT: &str = "https://pumpportal.fun/api/trade";

/// Default transaction explorer prefix
pub const DEFAULT_EXPLORER_TX_BASE: &str = "https://solscan.io/tx/";

/// Default confirmation timeout in seconds
pub const DEFAULT_CONFIRM_TIMEOUT_SECS: u64 = 60;

/// Default signature status poll interval in milliseconds
pub const DEFAULT_CONFIRM_POLL_MS: u64 = 500;

/// Default outbound HTTP request timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
