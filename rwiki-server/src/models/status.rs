//! Moderation status of a listing or talent.

use std::fmt;

/// The three moderation states. Every write path goes through this
/// enum, which is what keeps the stored column inside the enumerated
/// set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Submitted, awaiting moderation; never shown publicly
    Pending,
    /// Approved and visible on public pages
    Valid,
    /// Rejected; kept in the table but hidden
    Refused,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::Valid, Status::Refused];

    /// Stored column value.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Valid => "valid",
            Status::Refused => "refused",
        }
    }

    pub fn parse(s: &str) -> Option<Status> {
        match s {
            "pending" => Some(Status::Pending),
            "valid" => Some(Status::Valid),
            "refused" => Some(Status::Refused),
            _ => None,
        }
    }

    /// Label shown in the admin panel.
    pub fn label(self) -> &'static str {
        match self {
            Status::Pending => "En attente",
            Status::Valid => "Publié",
            Status::Refused => "Refusé",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin list filter: a single status or everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Only(Status),
    All,
}

impl StatusFilter {
    /// Parse a query-string value; anything unrecognized falls back to
    /// pending, the default moderation view.
    pub fn from_query(raw: Option<&str>) -> StatusFilter {
        match raw {
            Some("all") => StatusFilter::All,
            Some(s) => Status::parse(s)
                .map(StatusFilter::Only)
                .unwrap_or(StatusFilter::Only(Status::Pending)),
            None => StatusFilter::Only(Status::Pending),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::Only(status) => status.as_str(),
            StatusFilter::All => "all",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::Only(status) => status.label(),
            StatusFilter::All => "Tout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        for status in Status::ALL {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn rejects_unknown() {
        assert_eq!(Status::parse("published"), None);
        assert_eq!(Status::parse(""), None);
    }

    #[test]
    fn filter_defaults_to_pending() {
        assert_eq!(
            StatusFilter::from_query(None),
            StatusFilter::Only(Status::Pending)
        );
        assert_eq!(
            StatusFilter::from_query(Some("bogus")),
            StatusFilter::Only(Status::Pending)
        );
        assert_eq!(StatusFilter::from_query(Some("all")), StatusFilter::All);
        assert_eq!(
            StatusFilter::from_query(Some("refused")),
            StatusFilter::Only(Status::Refused)
        );
    }
}
