//! Shared formatting for text views: chip colors, dates and tables

use chrono::{DateTime, Utc};
use std::fmt;
use tasksphere_shared::models::project::ProjectStatus;
use tasksphere_shared::models::task::{TaskPriority, TaskStatus};

/// Placeholder for absent values
pub const EMPTY_CELL: &str = "-";

/// Semantic color of a status or priority chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipColor {
    Default,
    Success,
    Info,
    Warning,
    Error,
}

impl ChipColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChipColor::Default => "default",
            ChipColor::Success => "success",
            ChipColor::Info => "info",
            ChipColor::Warning => "warning",
            ChipColor::Error => "error",
        }
    }
}

impl fmt::Display for ChipColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn project_status_color(status: ProjectStatus) -> ChipColor {
    match status {
        ProjectStatus::Active => ChipColor::Success,
        ProjectStatus::Completed => ChipColor::Info,
        ProjectStatus::OnHold => ChipColor::Warning,
        ProjectStatus::Cancelled => ChipColor::Error,
    }
}

pub fn task_status_color(status: TaskStatus) -> ChipColor {
    match status {
        TaskStatus::Completed => ChipColor::Success,
        TaskStatus::InProgress => ChipColor::Info,
        TaskStatus::InReview => ChipColor::Warning,
        TaskStatus::Cancelled => ChipColor::Error,
        TaskStatus::Todo => ChipColor::Default,
    }
}

pub fn priority_color(priority: TaskPriority) -> ChipColor {
    match priority {
        TaskPriority::Urgent => ChipColor::Error,
        TaskPriority::High => ChipColor::Warning,
        TaskPriority::Medium => ChipColor::Info,
        TaskPriority::Low => ChipColor::Default,
    }
}

/// `[LABEL]`, with the color appended unless it is the default
pub fn chip(label: &str, color: ChipColor) -> String {
    match color {
        ChipColor::Default => format!("[{}]", label),
        other => format!("[{}|{}]", label, other),
    }
}

/// "Mar 01, 2024", or `-` when absent
pub fn format_date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|dt| dt.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

/// Cell text, `-` for missing or blank values
pub fn cell(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => EMPTY_CELL.to_string(),
    }
}

/// Fixed-width text table
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let columns = self.headers.len();
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();

        for row in &self.rows {
            for (i, value) in row.iter().take(columns).enumerate() {
                widths[i] = widths[i].max(value.chars().count());
            }
        }

        let line = |values: &[String]| -> String {
            let cells: Vec<String> = (0..columns)
                .map(|i| {
                    let value = values.get(i).map(String::as_str).unwrap_or("");
                    let padding = widths[i].saturating_sub(value.chars().count());
                    format!("{}{}", value, " ".repeat(padding))
                })
                .collect();
            cells.join("  ").trim_end().to_string()
        };

        let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

        let mut out = vec![line(self.headers.as_slice()), separator.join("  ")];
        out.extend(self.rows.iter().map(|row| line(row.as_slice())));
        out.join("\n")
    }
}
