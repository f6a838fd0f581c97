//! Token document repository trait
//!
//! The single `log_dir/token_usage.toml` file holding current token
//! holders (spec §3, §4.5).

use anyhow::Result;

use crate::domain::entities::TokenHolder;

pub trait TokenDocumentRepository: Send + Sync {
    fn load(&self) -> Result<Vec<TokenHolder>>;

    /// Atomically rewrites the document. `None` deletes the file (an empty
    /// document is represented on disk as an absent file).
    fn save(&self, holders: Option<&[TokenHolder]>) -> Result<()>;
}
