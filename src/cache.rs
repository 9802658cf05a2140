use std::collections::HashMap;

use eyre::Result;

use crate::api::Message;

/// Name substituted when a user lookup fails or the message has no author.
pub const UNKNOWN_USER: &str = "Unknown User";

/// Per-run memoization for the two lookups the exporter repeats a lot:
/// user-id → display name and thread-ts → replies.
///
/// Each key is resolved remotely at most once per run; a failed lookup is
/// stored as its sentinel ("Unknown User" / no replies) so it is not retried.
/// Values are assumed immutable for the duration of the run — there is no
/// invalidation. One instance per workspace scan, owned by the export loop.
#[derive(Default)]
pub struct RunCache {
    users: HashMap<String, String>,
    replies: HashMap<String, Vec<Message>>,
}

impl RunCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a user id through the cache. `fetch` runs only on the first
    /// call for a given id; an empty id short-circuits to the sentinel.
    pub fn display_name(
        &mut self,
        user_id: &str,
        fetch: impl FnOnce() -> Result<String>,
    ) -> &str {
        if user_id.is_empty() {
            return UNKNOWN_USER;
        }
        self.users
            .entry(user_id.to_string())
            .or_insert_with(|| fetch().unwrap_or_else(|_| UNKNOWN_USER.to_string()))
    }

    /// Resolve a thread's replies through the cache. A failed fetch is cached
    /// as "no replies".
    pub fn replies(
        &mut self,
        thread_ts: &str,
        fetch: impl FnOnce() -> Result<Vec<Message>>,
    ) -> &[Message] {
        self.replies
            .entry(thread_ts.to_string())
            .or_insert_with(|| fetch().unwrap_or_default())
    }
}
