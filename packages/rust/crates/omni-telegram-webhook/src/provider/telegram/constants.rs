pub const TELEGRAM_DEFAULT_API_BASE: &str = "https://api.telegram.org";
pub(super) const TELEGRAM_HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
pub(super) const TELEGRAM_HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;
