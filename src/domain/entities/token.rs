//! Token entities module
//!
//! Tokens are named concurrency permits with a positive capacity (spec §3,
//! §4.5). `TokenHolder` is one row of the persisted token document.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenHolder {
    pub token_name: String,
    pub family_name: String,
    pub job_name: String,
}

impl TokenHolder {
    pub fn new(
        token_name: impl Into<String>,
        family_name: impl Into<String>,
        job_name: impl Into<String>,
    ) -> Self {
        Self {
            token_name: token_name.into(),
            family_name: family_name.into(),
            job_name: job_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_toml() {
        let holder = TokenHolder::new("db", "F1", "J1");
        let s = toml::to_string(&holder).unwrap();
        let back: TokenHolder = toml::from_str(&s).unwrap();
        assert_eq!(back, holder);
    }
}
