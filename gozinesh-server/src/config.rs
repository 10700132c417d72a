use anyhow::{Context, Result};
use std::env;

use gozinesh_core::UserId;

use crate::handoff::DEFAULT_HANDOFF_CAPACITY;

#[derive(Clone)]
pub struct Config {
    /// The single administrator identity; guards the design wizard and
    /// receives handoffs and quiz reports.
    pub admin: UserId,
    /// Secret gating the archive browser. Compared with plain equality;
    /// there is deliberately no lockout (see DESIGN.md).
    pub archive_password: String,
    /// Bound on unclaimed pending handoffs.
    pub handoff_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let admin = env::var("GOZINESH_ADMIN_ID")
            .context("GOZINESH_ADMIN_ID environment variable is required")?
            .parse::<u64>()
            .context("GOZINESH_ADMIN_ID must be a valid number")?;

        let archive_password = env::var("GOZINESH_ARCHIVE_PASSWORD")
            .context("GOZINESH_ARCHIVE_PASSWORD environment variable is required")?;

        let handoff_capacity = parse_handoff_capacity(env::var("GOZINESH_HANDOFF_CAPACITY").ok())
            .unwrap_or(DEFAULT_HANDOFF_CAPACITY);

        Ok(Config {
            admin: UserId(admin),
            archive_password,
            handoff_capacity,
        })
    }

    pub fn is_admin(&self, user: UserId) -> bool {
        user == self.admin
    }
}

/// Parse GOZINESH_HANDOFF_CAPACITY from an optional string value.
///
/// Returns None if the value is missing, empty, non-numeric, or zero, so
/// the caller falls back to the default instead of an unusable registry.
pub fn parse_handoff_capacity(value: Option<String>) -> Option<usize> {
    value
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
}
