use std::fmt;

/// Machine-readable error codes for scripted consumers of the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InputDirMissing,
    ConfigParseError,
    MalformedInput,
    NodeNotFound,
    OutputWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::InputDirMissing,
        Self::ConfigParseError,
        Self::MalformedInput,
        Self::NodeNotFound,
        Self::OutputWriteFailed,
        Self::InternalUnexpected,
    ];

    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InputDirMissing => "E1001",
            Self::ConfigParseError => "E1002",
            Self::MalformedInput => "E1003",
            Self::NodeNotFound => "E2001",
            Self::OutputWriteFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InputDirMissing => "Input directory not found",
            Self::ConfigParseError => "Config file parse error",
            Self::MalformedInput => "Malformed input row",
            Self::NodeNotFound => "Node not found in dependency graph",
            Self::OutputWriteFailed => "Output write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InputDirMissing => {
                Some("Pass --input <DIR> or set [input] dir in stratum.toml.")
            }
            Self::ConfigParseError => Some("Fix syntax in stratum.toml and retry."),
            Self::MalformedInput => {
                Some("Fix the reported row, or drop --strict to skip malformed rows.")
            }
            Self::NodeNotFound => {
                Some("Use the fully qualified name; `stratum leaves` lists known nodes.")
            }
            Self::OutputWriteFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
