//! Username to display-name lookup.
//!
//! The directory is queried with `finger`, one process per user. Lookups are
//! best effort: any failure yields no name.

use clusterkit_parsers::{non_empty_string, run_command_with_timeout};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::time::Duration;
use tokio::process::Command;
use tokio::runtime::{Builder, Runtime};

/// Shown when a user's name cannot be resolved.
pub const UNKNOWN_NAME: &str = "unknown";

static FINGER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Name: (.*) of group").expect("valid regex"));

/// Resolves a username to a human-readable name.
pub trait DirectoryLookup {
    fn display_name(&self, user: &str) -> Option<String>;
}

impl<F> DirectoryLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn display_name(&self, user: &str) -> Option<String> {
        self(user)
    }
}

/// Extract the full name from `finger` output.
pub fn parse_finger_name(output: &str) -> Option<String> {
    FINGER_NAME
        .captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|m| non_empty_string(m.as_str()))
}

/// Lookup backed by the `finger` command.
pub struct FingerLookup {
    runtime: Runtime,
    timeout: Duration,
}

impl FingerLookup {
    pub fn new(timeout: Duration) -> io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { runtime, timeout })
    }
}

impl DirectoryLookup for FingerLookup {
    fn display_name(&self, user: &str) -> Option<String> {
        let mut cmd = Command::new("finger");
        cmd.arg(user);
        match self
            .runtime
            .block_on(run_command_with_timeout(&mut cmd, "finger", self.timeout))
        {
            Ok(stdout) => parse_finger_name(&stdout),
            Err(e) => {
                tracing::debug!("Name lookup for {} failed: {}", user, e);
                None
            }
        }
    }
}

/// Memoizes another lookup per username.
pub struct CachedLookup<L> {
    inner: L,
    cache: RefCell<HashMap<String, Option<String>>>,
}

impl<L: DirectoryLookup> CachedLookup<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }
}

impl<L: DirectoryLookup> DirectoryLookup for CachedLookup<L> {
    fn display_name(&self, user: &str) -> Option<String> {
        if let Some(name) = self.cache.borrow().get(user) {
            return name.clone();
        }
        let name = self.inner.display_name(user);
        self.cache
            .borrow_mut()
            .insert(user.to_string(), name.clone());
        name
    }
}
