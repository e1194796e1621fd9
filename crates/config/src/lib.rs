//! Configuration loading.
//!
//! Settings live in `adsmith/settings.json` under the platform config
//! directory. Credentials never do: the Gemini API key and the Sheets
//! access token are resolved from the environment so they cannot end up
//! in a dotfile that gets committed somewhere.

pub mod settings;

pub use settings::Settings;

/// Environment variable holding the Gemini API key.
pub const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";

/// Environment variable holding the short-lived Sheets OAuth token.
pub const SHEETS_TOKEN_VAR: &str = "SHEETS_ACCESS_TOKEN";

/// Look up the Gemini API key. Empty values count as unset.
pub fn gemini_api_key() -> Option<String> {
    non_empty_env(GEMINI_KEY_VAR)
}

/// Look up the Sheets access token. Empty values count as unset.
pub fn sheets_access_token() -> Option<String> {
    non_empty_env(SHEETS_TOKEN_VAR)
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
