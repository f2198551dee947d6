/// Environment variable names
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const ENV_SHOPEE_AFFILIATE_ID: &str = "SHOPEE_AFFILIATE_ID";
pub const ENV_LAZADA_AFFILIATE_ID: &str = "LAZADA_AFFILIATE_ID";
pub const ENV_TIKTOK_AFFILIATE_ID: &str = "TIKTOK_AFFILIATE_ID";
pub const ENV_INVOLVE_ASIA_ID: &str = "INVOLVE_ASIA_ID";

/// Gemini REST API
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro-latest";
pub const GEMINI_API_VERSION: &str = "v1beta";
pub const GEMINI_GENERATE_ACTION: &str = "generateContent";
pub const HEADER_GEMINI_API_KEY: &str = "x-goog-api-key";

/// Canonical task identifiers
pub const TASK_PING: &str = "ping";
pub const TASK_DEAL_ASSASSIN: &str = "deal-assassin";
pub const TASK_FUTURE_INTEL: &str = "getFutureIntel";
pub const TASK_GENERIC: &str = "generic";

/// Response headers
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

/// Error messages
pub const ERROR_METHOD_NOT_ALLOWED: &str = "Method Not Allowed";
pub const ERROR_MISSING_API_KEY: &str = "GEMINI_API_KEY missing";
pub const ERROR_SERVER: &str = "server_error";
pub const ERROR_TIMEOUT: &str = "Gemini request timed out";
pub const ERROR_GEMINI_UNAVAILABLE: &str = "Gemini API not reachable";

/// Logging prefixes
pub const LOG_PREFIX_SUCCESS: &str = "✅";
pub const LOG_PREFIX_ERROR: &str = "❌";

/// Maximum accepted request body size (bytes)
pub const MAX_BODY_SIZE_BYTES: u64 = 16 * 1024 * 1024;
