// File: ./src/model/result.rs
use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;
use strum::{AsRefStr, Display};

/// Structured output of one capture parse, used to prefill a new task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub cleaned_title: String,
    pub due_date: Option<NaiveDateTime>,
    pub priority: Option<u8>,
    pub labels: Vec<String>,
    pub project_ref: Option<String>,
}

impl ParseResult {
    pub fn is_empty(&self) -> bool {
        self.due_date.is_none()
            && self.priority.is_none()
            && self.labels.is_empty()
            && self.project_ref.is_none()
    }

    // Convert back to capture syntax for editing (e.g. "Buy milk #home @errands !1 2025-01-01")
    pub fn to_capture_string(&self) -> String {
        let mut s = self.cleaned_title.clone();
        for label in &self.labels {
            s.push_str(&format!(" #{}", label));
        }
        if let Some(project) = &self.project_ref {
            s.push_str(&format!(" @{}", project));
        }
        if let Some(p) = self.priority {
            s.push_str(&format!(" !{}", p));
        }
        if let Some(d) = self.due_date {
            if d.time() == NaiveTime::MIN {
                s.push_str(&format!(" {}", d.format("%Y-%m-%d")));
            } else {
                s.push_str(&format!(" {}", d.format("%Y-%m-%d %H:%M")));
            }
        }
        s.trim().to_string()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Display, AsRefStr)]
pub enum SyntaxType {
    Text,
    DueDate,
    Priority,
    Label,
    Project,
}

/// A highlighted span of capture input; byte offsets into the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxToken {
    pub kind: SyntaxType,
    pub start: usize,
    pub end: usize,
}
