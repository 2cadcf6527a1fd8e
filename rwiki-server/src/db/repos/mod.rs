//! Repository implementations for database access
//!
//! Both repositories follow the same patterns:
//! - Guarded single-statement UPDATE/DELETE keyed by id; zero affected
//!   rows is a negative outcome, not an error
//! - Reorder is a pairwise display_order swap inside one transaction
//! - Admin lists are filtered/sorted in SQL and capped at 200 rows

pub mod sites;
pub mod talents;

use thiserror::Error;

pub use sites::{SiteRecord, SiteRepo};
pub use talents::{SortOrder, TalentRecord, TalentRepo, TalentSort};

/// Database error type
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Result of a moderation action (approve/reject/delete/update).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    NotFound,
}

impl ActionOutcome {
    pub(crate) fn from_rows(rows_affected: u64) -> Self {
        if rows_affected > 0 {
            Self::Applied
        } else {
            Self::NotFound
        }
    }
}

/// Result of a move up/down request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// No neighbor in the requested direction: already first or last.
    AtBoundary,
    NotFound,
}

/// Direction for display-order moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }
}

/// Per-status row counts for the admin dashboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: i64,
    pub valid: i64,
    pub refused: i64,
}

impl StatusCounts {
    pub fn total(&self) -> i64 {
        self.pending + self.valid + self.refused
    }

    pub(crate) fn from_rows(rows: &[(String, i64)]) -> Self {
        let mut counts = StatusCounts::default();
        for (status, total) in rows {
            match status.as_str() {
                "pending" => counts.pending = *total,
                "valid" => counts.valid = *total,
                "refused" => counts.refused = *total,
                other => tracing::warn!(status = other, "unexpected status in counts"),
            }
        }
        counts
    }
}
