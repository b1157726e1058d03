//! API key resolution.

use kiosk_rag::{api_key_from_env, api_key_from_lookup};
use rustyline::DefaultEditor;

/// Shown when no key can be found.
pub const MISSING_KEY_HELP: &str = "No Gemini API key found. Pass --api-key or set GOOGLE_API_KEY \
     (or GEMINI_API_KEY) in the environment or a .env file. \
     Get a key at https://aistudio.google.com/apikey";

/// Resolve a key from an explicit flag, then the process environment.
pub fn resolve_api_key(flag: Option<String>) -> Option<String> {
    non_blank(flag).or_else(api_key_from_env)
}

/// [`resolve_api_key`] with an injectable environment lookup.
///
/// Blank values are treated as absent.
pub fn resolve_api_key_with(
    flag: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    non_blank(flag).or_else(|| api_key_from_lookup(lookup))
}

fn non_blank(key: Option<String>) -> Option<String> {
    key.map(|key| key.trim().to_string()).filter(|key| !key.is_empty())
}

/// Ask for the key on the terminal. Returns `None` on an empty answer,
/// Ctrl-C or Ctrl-D.
pub fn prompt_api_key() -> Option<String> {
    let mut editor = DefaultEditor::new().ok()?;
    let line = editor.readline("Enter your Gemini API key: ").ok()?;
    let key = line.trim();
    (!key.is_empty()).then(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name: &str| pairs.iter().find(|(k, _)| *k == name).map(|(_, v)| v.to_string())
    }

    #[test]
    fn flag_wins() {
        let key = resolve_api_key_with(Some("flag-key".into()), env(&[("GOOGLE_API_KEY", "env")]));
        assert_eq!(key.as_deref(), Some("flag-key"));
    }

    #[test]
    fn google_before_gemini() {
        let lookup = env(&[("GEMINI_API_KEY", "gemini"), ("GOOGLE_API_KEY", "google")]);
        assert_eq!(resolve_api_key_with(None, lookup).as_deref(), Some("google"));
        assert_eq!(
            resolve_api_key_with(None, env(&[("GEMINI_API_KEY", "gemini")])).as_deref(),
            Some("gemini")
        );
    }

    #[test]
    fn blank_values_are_skipped() {
        let key = resolve_api_key_with(Some("  ".into()), env(&[("GOOGLE_API_KEY", " k ")]));
        assert_eq!(key.as_deref(), Some("k"));
        assert_eq!(resolve_api_key_with(None, env(&[])), None);
    }
}
