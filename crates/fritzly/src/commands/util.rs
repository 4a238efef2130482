//! Shared helpers for command handlers.

use tokio_util::sync::CancellationToken;

/// A token that fires on the first Ctrl-C.
pub fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupted");
            trigger.cancel();
        }
    });
    token
}

/// `[x]` / `[ ]` marks for boolean table columns.
pub fn check_mark(on: bool) -> String {
    if on { "[x]" } else { "[ ]" }.to_owned()
}

/// `-` for missing values.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_and_dashes() {
        assert_eq!(check_mark(true), "[x]");
        assert_eq!(check_mark(false), "[ ]");
        assert_eq!(or_dash(Some(54)), "54");
        assert_eq!(or_dash::<u32>(None), "-");
    }
}
