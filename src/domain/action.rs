use serde::{Deserialize, Serialize};

/// The closed set of transaction kinds.
/// Actions are parsed case-insensitively and always stored upper-cased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// Money earned from the outside world (salary, gift, ...)
    Earn,
    /// Money spent to the outside world (food, bills, ...)
    Spend,
    /// Money borrowed from a bank or lender
    Borrow,
    /// Money moved between two household members
    Transfer,
}

impl Action {
    /// The canonical stored form: always upper-case.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Earn => "EARN",
            Action::Spend => "SPEND",
            Action::Borrow => "BORROW",
            Action::Transfer => "TRANSFER",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "EARN" => Some(Action::Earn),
            "SPEND" => Some(Action::Spend),
            "BORROW" => Some(Action::Borrow),
            "TRANSFER" => Some(Action::Transfer),
            _ => None,
        }
    }

    pub const ALL: [Action; 4] = [
        Action::Earn,
        Action::Spend,
        Action::Borrow,
        Action::Transfer,
    ];
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::from_str(s).ok_or_else(|| ParseActionError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseActionError(pub String);

impl std::fmt::Display for ParseActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown action '{}' (expected earn, spend, borrow or transfer)",
            self.0
        )
    }
}

impl std::error::Error for ParseActionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_roundtrip() {
        for action in Action::ALL {
            let s = action.as_str();
            let parsed = Action::from_str(s).unwrap();
            assert_eq!(action, parsed);
        }
    }

    #[test]
    fn test_action_parse_is_case_insensitive() {
        assert_eq!(Action::from_str("earn"), Some(Action::Earn));
        assert_eq!(Action::from_str("Earn"), Some(Action::Earn));
        assert_eq!(Action::from_str("EARN"), Some(Action::Earn));
        assert_eq!(Action::from_str("  transfer "), Some(Action::Transfer));
    }

    #[test]
    fn test_action_parse_rejects_unknown() {
        assert_eq!(Action::from_str("lend"), None);
        assert_eq!(Action::from_str(""), None);
        let err = "refund".parse::<Action>().unwrap_err();
        assert!(err.to_string().contains("refund"));
    }
}
