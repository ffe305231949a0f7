//! Shared constants for inventory-chat.
//!
//! User-facing replies are kept here so every layer degrades to the same
//! neutral wording.

/// Greeting shown as the first assistant message of every session.
pub const GREETING: &str = "Halo! Saya Chatbot Inventory. Ada yang bisa dibantu?";

/// Explanation used when the model output is not valid JSON.
pub const FALLBACK_EXPLAIN: &str = "Response bukan JSON valid";

/// Prefix marking an assistant message as an error report.
pub const ERROR_PREFIX: &str = "Terjadi kesalahan: ";

/// Reply when the completion service cannot be reached.
pub const SERVICE_UNAVAILABLE_REPLY: &str =
    "Terjadi kesalahan: layanan asisten sedang tidak tersedia. Silakan coba lagi.";

/// Reply when the completion service does not answer in time.
pub const TIMEOUT_REPLY: &str =
    "Terjadi kesalahan: asisten tidak merespons tepat waktu. Silakan coba lagi.";

/// Reply when a non-admin receives a mutating statement.
pub const AUTHORIZATION_DENIED_REPLY: &str =
    "Maaf, Anda tidak memiliki izin sebagai admin untuk mengubah data.";

/// Reply when a generated statement breaks the statement policy.
pub const POLICY_VIOLATION_REPLY: &str =
    "Maaf, permintaan ini tidak dapat diproses karena melanggar aturan keamanan data.";

/// Reply when a confirmed action fails to execute.
pub const EXECUTION_FAILED_REPLY: &str =
    "Terjadi kesalahan: perintah gagal dijalankan dan tidak ada perubahan yang disimpan.";

/// Reply after a confirmed action executed successfully.
pub const EXECUTION_DONE_REPLY: &str = "Perintah berhasil dijalankan.";

/// Reply after the user cancels a pending action.
pub const CANCELLED_REPLY: &str = "Eksekusi dibatalkan.";

/// Default maximum number of value tuples per INSERT/UPDATE statement.
pub const DEFAULT_MAX_VALUES_PER_STATEMENT: usize = 3;

/// Default maximum number of statements one reply may expand into.
pub const DEFAULT_MAX_STATEMENTS_PER_BATCH: usize = 20;

/// Tables generated statements may never reference.
pub const DEFAULT_PROTECTED_TABLES: [&str; 3] = ["account", "account_session", "history_chat"];

/// Functions generated statements may call: side-effect-free aggregates and
/// scalar helpers. Any other function call is refused.
pub const DEFAULT_ALLOWED_FUNCTIONS: [&str; 40] = [
    "count", "sum", "avg", "min", "max", "string_agg", "array_agg", "bool_and", "bool_or",
    "coalesce", "nullif", "greatest", "least", "lower", "upper", "initcap", "length",
    "char_length", "trim", "ltrim", "rtrim", "substr", "substring", "replace", "concat",
    "concat_ws", "split_part", "left", "right", "round", "floor", "ceil", "abs", "now",
    "current_date", "current_timestamp", "date_trunc", "date_part", "age", "to_char",
];

/// Database role generated statements run as. It can read and write the
/// inventory but holds no privileges on the protected tables.
pub const GENERATED_STATEMENT_ROLE: &str = "inventory_chat_generated";

/// Default schema snapshot lifetime before it is fetched again.
pub const DEFAULT_SCHEMA_TTL_SECS: u64 = 300;

/// Default idle lifetime of a chat session.
pub const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 1800;

/// Default timeout for one completion request.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 10;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Maximum number of history rows replayed into a new session.
pub const MAX_HISTORY_ROWS: i64 = 200;

/// Maximum number of rows returned to the chat for one read statement.
pub const MAX_RESULT_ROWS: usize = 500;
