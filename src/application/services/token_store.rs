//! Token store
//!
//! The persisted current-holdings document and its consume/reconcile
//! algorithms (spec §4.5). The document itself lives behind
//! `TokenDocumentRepository`; this module is the pure logic that decides how
//! it changes.

use std::collections::HashMap;

use tracing::error;

use crate::domain::entities::TokenHolder;
use crate::domain::world::World;
use crate::infrastructure::config::Config;

/// Attempts to acquire every token in `token_names` against `doc`, returning
/// the augmented document on full success or `None` if any token is at
/// capacity or unrecognized (spec §4.5 `consume_tokens_from_doc`). Never
/// partially commits: a request that fails for one token leaves `doc`
/// untouched from the caller's point of view.
pub fn consume_tokens_from_doc(
    config: &Config,
    token_names: &[String],
    doc: &[TokenHolder],
    family_name: &str,
    job_name: &str,
) -> Option<Vec<TokenHolder>> {
    let mut usage: HashMap<&str, u32> = HashMap::new();
    for holder in doc {
        *usage.entry(holder.token_name.as_str()).or_insert(0) += 1;
    }

    let mut new_doc = doc.to_vec();
    for name in token_names {
        let Some(capacity) = config.tokens.get(name) else {
            error!(token = %name, "consume_tokens_from_doc: unknown token");
            return None;
        };
        let count = usage.entry(name.as_str()).or_insert(0);
        if *count >= *capacity {
            return None;
        }
        *count += 1;
        new_doc.push(TokenHolder::new(name.clone(), family_name, job_name));
    }
    Some(new_doc)
}

/// Drops entries whose referenced info file is missing or already terminal
/// (spec §4.5 `update_token_usage`; the "missing info file" half is
/// confirmed against `pytftoken.py`, SPEC_FULL.md B). Run once at startup
/// before the first tick.
pub fn reconcile(doc: Vec<TokenHolder>, world: &World) -> Vec<TokenHolder> {
    doc.into_iter()
        .filter(|holder| {
            world
                .get(&holder.family_name, &holder.job_name)
                .is_some_and(|result| result.error_code.is_none())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{JobResult, JobStatus};
    use std::collections::HashMap as Map;

    fn config_with_capacity(token: &str, capacity: u32) -> Config {
        Config {
            log_dir: "/tmp/log".into(),
            family_dir: "/tmp/fam".into(),
            job_dir: "/tmp/job".into(),
            instructions_dir: "/tmp/inst".into(),
            primary_tz: "UTC".into(),
            end_time_hr: 23,
            end_time_min: 55,
            once_only: true,
            run_local: true,
            num_retries: 0,
            retry_sleep: 1,
            ignore_regex: vec![],
            calendars: Default::default(),
            tokens: Map::from([(token.to_string(), capacity)]),
        }
    }

    #[test]
    fn consumes_token_below_capacity() {
        let config = config_with_capacity("T1", 1);
        let doc = consume_tokens_from_doc(&config, &["T1".to_string()], &[], "F1", "J1").unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc[0].token_name, "T1");
    }

    #[test]
    fn refuses_token_at_capacity() {
        let config = config_with_capacity("T1", 1);
        let held = vec![TokenHolder::new("T1", "F0", "J0")];
        assert!(consume_tokens_from_doc(&config, &["T1".to_string()], &held, "F1", "J1").is_none());
    }

    #[test]
    fn refuses_unknown_token() {
        let config = config_with_capacity("T1", 1);
        assert!(consume_tokens_from_doc(&config, &["T2".to_string()], &[], "F1", "J1").is_none());
    }

    #[test]
    fn reconcile_drops_entries_with_error_code_or_missing_info_file() {
        let mut world = World::new();
        let mut done = JobResult::projected("F1", "J1", JobStatus::Success, "default", "UTC", vec![]);
        done.error_code = Some(0);
        world.insert(done);
        let mut running = JobResult::projected("F1", "J2", JobStatus::Running, "default", "UTC", vec![]);
        running.error_code = None;
        world.insert(running);

        let doc = vec![
            TokenHolder::new("T1", "F1", "J1"), // terminal, dropped
            TokenHolder::new("T1", "F1", "J2"), // still running, kept
            TokenHolder::new("T1", "F1", "J3"), // no info file at all, dropped
        ];
        let reconciled = reconcile(doc, &world);
        assert_eq!(reconciled.len(), 1);
        assert_eq!(reconciled[0].job_name, "J2");
    }
}
