// ── Wi-Fi name normalization ──
//
// Users name networks loosely: `1`, `2.4`, `5GHz`, `guest`, `all`, or a
// comma-separated mix. This module turns those tokens into radio ids.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use strum::IntoEnumIterator;

use crate::error::CoreError;
use crate::model::RadioId;

/// Radios `wlan on` touches when no names are given.
pub const DEFAULT_WLAN_ON: &[RadioId] = &[RadioId::Radio1, RadioId::Radio2];

/// Radios `wlan off` touches when no names are given.
pub const DEFAULT_WLAN_OFF: &[RadioId] = &[RadioId::Radio1, RadioId::Radio2, RadioId::Radio3];

const ALL: &[RadioId] = DEFAULT_WLAN_OFF;

const STANDARD_ALIASES: &[(&str, &[RadioId])] = &[
    ("1", &[RadioId::Radio1]),
    ("2", &[RadioId::Radio2]),
    ("3", &[RadioId::Radio3]),
    ("2.4", &[RadioId::Radio1]),
    ("2.4GHz", &[RadioId::Radio1]),
    ("5", &[RadioId::Radio2]),
    ("5GHz", &[RadioId::Radio2]),
    ("guests", &[RadioId::Radio3]),
    ("guest", &[RadioId::Radio3]),
    ("first", &[RadioId::Radio1]),
    ("second", &[RadioId::Radio2]),
    ("third", &[RadioId::Radio3]),
    ("all", ALL),
];

static STANDARD: LazyLock<AliasTable> = LazyLock::new(|| {
    AliasTable::new(STANDARD_ALIASES.iter().copied())
        .expect("built-in alias table has unique, non-empty entries")
});

/// Alias → radio set lookup. Matching is exact and case-sensitive.
#[derive(Debug, Clone)]
pub struct AliasTable {
    aliases: HashMap<String, BTreeSet<RadioId>>,
}

impl AliasTable {
    /// The aliases the CLI accepts.
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Build a table, rejecting empty or duplicate aliases and empty sets.
    pub fn new<'a, I>(entries: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (&'a str, &'a [RadioId])>,
    {
        let mut aliases = HashMap::new();
        for (alias, radios) in entries {
            if alias.is_empty() {
                return Err(CoreError::ValidationFailed {
                    message: "empty Wi-Fi alias".into(),
                });
            }
            if radios.is_empty() {
                return Err(CoreError::ValidationFailed {
                    message: format!("Wi-Fi alias '{alias}' maps to no network"),
                });
            }
            let set: BTreeSet<RadioId> = radios.iter().copied().collect();
            if aliases.insert(alias.to_owned(), set).is_some() {
                return Err(CoreError::ValidationFailed {
                    message: format!("duplicate Wi-Fi alias '{alias}'"),
                });
            }
        }
        Ok(Self { aliases })
    }

    pub fn lookup(&self, token: &str) -> Option<&BTreeSet<RadioId>> {
        self.aliases.get(token)
    }

    /// Resolve a name to one network, e.g. for `wlan qr`.
    ///
    /// Names that cover several networks (`all`) yield the lowest radio.
    pub fn resolve_one(&self, token: &str) -> Option<RadioId> {
        self.lookup(token)?.first().copied()
    }

    /// Normalize user tokens into a radio set plus the tokens that did not match.
    ///
    /// Tokens are split on commas first. Empty fragments are dropped
    /// silently; unknown ones are reported in input order. An empty token
    /// list yields `default`.
    pub fn select<S: AsRef<str>>(&self, tokens: &[S], default: &[RadioId]) -> WifiSelection {
        if tokens.is_empty() {
            return WifiSelection {
                radios: default.iter().copied().collect(),
                unknown: Vec::new(),
            };
        }

        let mut selection = WifiSelection::default();
        for token in split_tokens(tokens) {
            match self.lookup(&token) {
                Some(set) => selection.radios.extend(set.iter().copied()),
                None => selection.unknown.push(token),
            }
        }
        selection
    }

    /// Accepted names, sorted; for help and error messages.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.aliases.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Split every token on `,`; drop empty fragments.
pub fn split_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    tokens
        .iter()
        .flat_map(|t| t.as_ref().split(','))
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Outcome of normalizing user-supplied Wi-Fi names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WifiSelection {
    pub radios: BTreeSet<RadioId>,
    pub unknown: Vec<String>,
}

impl WifiSelection {
    pub fn is_all(&self) -> bool {
        RadioId::iter().all(|id| self.radios.contains(&id))
    }
}
