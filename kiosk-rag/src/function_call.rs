//! Parser for the textual function-call directive.
//!
//! A model may ask for a local function by writing
//! `FUNCTION_CALL[name](key1:value1, key2:value2)` anywhere in its reply.
//! Only the first directive in a reply is honoured. Arguments end at the first
//! `)`, so values cannot contain a closing parenthesis, and values cannot
//! contain commas.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"FUNCTION_CALL\[(.*?)\]\((.*?)\)")
        .expect("unreachable error: function call pattern is valid")
});

/// Key given to an argument that has no `key:` prefix.
pub const FALLBACK_ARGUMENT_KEY: &str = "value";

/// The outcome of scanning a model reply for a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionCall {
    /// The reply contains no directive.
    NoCall,
    /// The first directive found in the reply.
    Call {
        name: String,
        /// Raw argument strings keyed by parameter name.
        args: BTreeMap<String, String>,
    },
}

impl FunctionCall {
    pub fn is_call(&self) -> bool {
        matches!(self, Self::Call { .. })
    }
}

/// Find the first `FUNCTION_CALL[name](args)` directive in `text`.
pub fn parse_function_call(text: &str) -> FunctionCall {
    let Some(captures) = DIRECTIVE.captures(text) else {
        return FunctionCall::NoCall;
    };

    let name = captures.get(1).map_or("", |m| m.as_str()).trim().to_string();
    let args = parse_arguments(captures.get(2).map_or("", |m| m.as_str()));
    FunctionCall::Call { name, args }
}

/// Split `key:value, key:value` into a map.
///
/// Pairs split at their first colon and both sides are trimmed. A pair with
/// no colon is stored under [`FALLBACK_ARGUMENT_KEY`]; later duplicates win.
pub fn parse_arguments(raw: &str) -> BTreeMap<String, String> {
    let mut args = BTreeMap::new();
    if raw.is_empty() {
        return args;
    }

    for pair in raw.split(',') {
        match pair.split_once(':') {
            Some((key, value)) => {
                args.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => {
                args.insert(FALLBACK_ARGUMENT_KEY.to_string(), pair.trim().to_string());
            }
        }
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[(&str, &str)]) -> FunctionCall {
        FunctionCall::Call {
            name: name.to_string(),
            args: args.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    #[test]
    fn parses_named_arguments() {
        let text = "Let me check. FUNCTION_CALL[search_documents](query:cats, top_k:3) thanks";
        assert_eq!(
            parse_function_call(text),
            call("search_documents", &[("query", "cats"), ("top_k", "3")])
        );
    }

    #[test]
    fn no_directive_is_no_call() {
        let parsed = parse_function_call("The rector is Professor Budi.");
        assert_eq!(parsed, FunctionCall::NoCall);
        assert!(!parsed.is_call());
    }

    #[test]
    fn empty_argument_list() {
        assert_eq!(parse_function_call("FUNCTION_CALL[get_current_time]()"), call("get_current_time", &[]));
    }

    #[test]
    fn only_first_directive_is_used() {
        let text = "FUNCTION_CALL[get_current_time]() and FUNCTION_CALL[open_browser](url:a.com)";
        assert_eq!(parse_function_call(text), call("get_current_time", &[]));
    }

    #[test]
    fn argument_without_colon_uses_fallback_key() {
        assert_eq!(
            parse_function_call("FUNCTION_CALL[summarize_document](guide.pdf)"),
            call("summarize_document", &[("value", "guide.pdf")])
        );
    }

    #[test]
    fn value_keeps_text_after_first_colon() {
        assert_eq!(
            parse_function_call("FUNCTION_CALL[open_browser](url: https://example.com/a)"),
            call("open_browser", &[("url", "https://example.com/a")])
        );
    }

    #[test]
    fn trims_function_name() {
        assert_eq!(
            parse_function_call("FUNCTION_CALL[ list_available_documents ]()"),
            call("list_available_documents", &[])
        );
    }

    #[test]
    fn directive_does_not_span_lines() {
        assert_eq!(parse_function_call("FUNCTION_CALL[search_documents]\n(query:x)"), FunctionCall::NoCall);
    }
}
