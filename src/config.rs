use crate::ledger::InsertPolicy;
use anyhow::{Context, bail};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub store_name: String,
    pub recommendation_count: usize,
    pub ledger_policy: InsertPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_name: "MOCHI STORE".to_string(),
            recommendation_count: 3,
            ledger_policy: InsertPolicy::DuplicateRight,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let store_name = lookup("STORE_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.store_name);

        let recommendation_count = match lookup("RECOMMENDATION_COUNT") {
            Some(raw) => {
                let count = raw
                    .trim()
                    .parse::<usize>()
                    .with_context(|| format!("RECOMMENDATION_COUNT must be a number, got {raw:?}"))?;
                if count == 0 {
                    bail!("RECOMMENDATION_COUNT must be at least 1");
                }
                count
            }
            None => defaults.recommendation_count,
        };

        let ledger_policy = match lookup("LEDGER_POLICY") {
            Some(raw) => raw
                .parse::<InsertPolicy>()
                .with_context(|| format!("invalid LEDGER_POLICY {raw:?}"))?,
            None => defaults.ledger_policy,
        };

        Ok(Self {
            store_name,
            recommendation_count,
            ledger_policy,
        })
    }
}
