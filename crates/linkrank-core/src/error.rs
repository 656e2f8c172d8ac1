use std::fmt;

/// Machine-readable error codes for scripts and JSON consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidConfig,
    DataFileUnreadable,
    MalformedRecord,
    DuplicateIdentity,
    UnknownReference,
    GraphTooLarge,
    PageNotFound,
    PathNotFound,
    RankNonConvergence,
    RankCancelled,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InvalidConfig => "E1002",
            Self::DataFileUnreadable => "E2001",
            Self::MalformedRecord => "E2002",
            Self::DuplicateIdentity => "E3001",
            Self::UnknownReference => "E3002",
            Self::GraphTooLarge => "E3003",
            Self::PageNotFound => "E4001",
            Self::PathNotFound => "E4002",
            Self::RankNonConvergence => "E5001",
            Self::RankCancelled => "E5002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidConfig => "Invalid configuration value",
            Self::DataFileUnreadable => "Data file unreadable",
            Self::MalformedRecord => "Malformed page or link record",
            Self::DuplicateIdentity => "Duplicate page id or title",
            Self::UnknownReference => "Link references unknown page",
            Self::GraphTooLarge => "Too many pages",
            Self::PageNotFound => "Page not found",
            Self::PathNotFound => "No path between pages",
            Self::RankNonConvergence => "Ranks did not converge",
            Self::RankCancelled => "Rank computation cancelled",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in linkrank.toml and retry."),
            Self::InvalidConfig => {
                Some("Use damping in [0, 1], a positive tolerance and max_iterations > 0.")
            }
            Self::DataFileUnreadable => {
                Some("Check --dataset/--data-dir or --pages/--links point at readable files.")
            }
            Self::MalformedRecord => {
                Some("Each line must be two space-separated fields: `<id> <title>` or `<src> <dst>`.")
            }
            Self::DuplicateIdentity => Some("Page ids and titles must be unique in the pages file."),
            Self::UnknownReference => Some("Every link endpoint must appear in the pages file."),
            Self::GraphTooLarge => Some("Split the corpus; a graph holds at most 4294967295 pages."),
            Self::PageNotFound => Some("Titles are case-sensitive and use `_` between words."),
            Self::PathNotFound => None,
            Self::RankNonConvergence => {
                Some("Raise --max-iterations or loosen --tolerance; best scores are still shown.")
            }
            Self::RankCancelled => Some("Raise --timeout-secs or drop it to run to completion."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
