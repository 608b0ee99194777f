use serde::Serialize;

use crate::core::domain::{RunResult, RunScope, RunSummary};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// Point-in-time notifications emitted while a run progresses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RunEvent {
    #[serde(rename_all = "camelCase")]
    Progress {
        scope: RunScope,
        running: bool,
        current_index: Option<u32>,
    },
    Result {
        scope: RunScope,
        result: RunResult,
    },
    Complete {
        scope: RunScope,
        summary: RunSummary,
    },
    Notice {
        level: NoticeLevel,
        message: String,
    },
}

pub trait EventSink: std::fmt::Debug + Send + Sync {
    fn emit(&self, event: RunEvent);
}
