use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E2xxx: Type shape errors (structural product recognition)
/// - E3xxx: Pattern errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Shape Errors (E21xx)
    /// Component declared mutable
    E2101,
    /// Missing or ambiguous canonical constructor
    E2102,
    /// Canonical constructor parameters do not follow the components
    E2103,
    /// Component without a matching zero-argument accessor
    E2104,
    /// Duplicate component label
    E2105,

    // Pattern Errors (E3xxx)
    /// Unknown type in deconstruction pattern
    E3001,
    /// Type offers no destructuring contract
    E3002,
    /// Pattern does not fit the scrutinee type
    E3003,
    /// Deconstruction pattern arity mismatch
    E3004,
    /// Name bound twice in one pattern
    E3005,
    /// Pattern nesting limit exceeded
    E3006,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
    /// Too many errors
    E9002,
}

impl ErrorCode {
    /// All codes, in numeric order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E2101,
        ErrorCode::E2102,
        ErrorCode::E2103,
        ErrorCode::E2104,
        ErrorCode::E2105,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E3004,
        ErrorCode::E3005,
        ErrorCode::E3006,
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E2101 => "E2101",
            ErrorCode::E2102 => "E2102",
            ErrorCode::E2103 => "E2103",
            ErrorCode::E2104 => "E2104",
            ErrorCode::E2105 => "E2105",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Shape errors come from type recognition, not from a pattern site.
    pub fn is_shape_error(&self) -> bool {
        self.as_str().starts_with("E21")
    }

    pub fn is_pattern_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique_and_sorted() {
        let strs: Vec<&str> = ErrorCode::ALL.iter().map(ErrorCode::as_str).collect();
        let mut sorted = strs.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(strs, sorted);
    }

    #[test]
    fn categories() {
        assert!(ErrorCode::E2104.is_shape_error());
        assert!(!ErrorCode::E2104.is_pattern_error());
        assert!(ErrorCode::E3004.is_pattern_error());
        assert!(!ErrorCode::E9001.is_pattern_error());
        assert_eq!(ErrorCode::E3004.to_string(), "E3004");
    }
}
