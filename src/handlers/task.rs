use std::fmt;

use crate::constants::{TASK_DEAL_ASSASSIN, TASK_FUTURE_INTEL, TASK_GENERIC, TASK_PING};

/// Logical task selecting the system prompt and the response shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Ping,
    DealAssassin,
    FutureIntel,
    Generic,
    /// Caller-supplied name with no template; kept verbatim for the error reply.
    Unknown(String),
}

impl Task {
    /// Maps a canonical task name; anything else becomes `Unknown`.
    pub fn from_key(key: &str) -> Self {
        match key {
            TASK_PING => Task::Ping,
            TASK_DEAL_ASSASSIN => Task::DealAssassin,
            TASK_FUTURE_INTEL => Task::FutureIntel,
            TASK_GENERIC => Task::Generic,
            other => Task::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Task::Ping => TASK_PING,
            Task::DealAssassin => TASK_DEAL_ASSASSIN,
            Task::FutureIntel => TASK_FUTURE_INTEL,
            Task::Generic => TASK_GENERIC,
            Task::Unknown(name) => name,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const TASK_ALIASES: &[(&str, &str)] = &[
    ("getmarketintel", TASK_DEAL_ASSASSIN),
    ("getfutureintel", TASK_FUTURE_INTEL),
    ("default", TASK_GENERIC),
];

const PATH_SUFFIXES: &[(&str, &str)] = &[
    ("/getmarketintel", TASK_DEAL_ASSASSIN),
    ("/getfutureintel", TASK_FUTURE_INTEL),
    ("/callgemini", TASK_GENERIC),
];

/// Resolves the task from the explicit `task` field, falling back to the
/// request path only when the field is absent or empty.
///
/// Alias lookup is case-insensitive. A non-alias task string is passed through
/// with its original casing, so `"fooBar"` stays `Unknown("fooBar")` instead of
/// collapsing to `generic`.
pub fn resolve_task(path: &str, raw_task: Option<&str>) -> Task {
    let raw = raw_task.unwrap_or_default();
    let lowered = raw.to_lowercase();

    if let Some((_, canonical)) = TASK_ALIASES.iter().find(|(alias, _)| *alias == lowered) {
        return Task::from_key(canonical);
    }

    if !raw.is_empty() {
        return Task::from_key(raw);
    }

    let path = path.to_lowercase();
    PATH_SUFFIXES
        .iter()
        .find(|(suffix, _)| path.ends_with(suffix))
        .map(|(_, canonical)| Task::from_key(canonical))
        .unwrap_or(Task::Generic)
}
