use plainplates_errors::AppError;
use serde::{Deserialize, Serialize};

pub const AUTHENTICATED_WEIGHT: i32 = 5;
pub const ANONYMOUS_WEIGHT: i32 = 1;

/// Value of the upvote that accompanies a favorite.
pub const FAVORITE_VOTE_VALUE: i32 = AUTHENTICATED_WEIGHT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteChoice {
    Up,
    Down,
}

impl VoteChoice {
    pub fn raw(self) -> i32 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    /// Raw choice multiplied by the trust weight of the caller.
    pub fn effective_value(self, authenticated: bool) -> i32 {
        let weight = if authenticated {
            AUTHENTICATED_WEIGHT
        } else {
            ANONYMOUS_WEIGHT
        };
        self.raw() * weight
    }
}

impl TryFrom<i32> for VoteChoice {
    type Error = AppError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Up),
            -1 => Ok(Self::Down),
            other => Err(AppError::Validation(format!(
                "Vote value must be 1 or -1, got {}",
                other
            ))),
        }
    }
}

/// Key under which the vote ledger records a caller's vote.
///
/// Anonymous callers are keyed by client address, so everyone behind the same
/// NAT or proxy shares one anonymous vote per recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoterIdentity {
    Authenticated { email: String },
    Anonymous { fingerprint: String },
}

impl VoterIdentity {
    pub fn authenticated(email: impl Into<String>) -> Self {
        Self::Authenticated {
            email: email.into(),
        }
    }

    pub fn anonymous(client_addr: impl std::fmt::Display) -> Self {
        Self::Anonymous {
            fingerprint: format!("anon:{}", client_addr),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Authenticated { email } => email,
            Self::Anonymous { fingerprint } => fingerprint,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// What a vote cast did to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteOutcome {
    Cast { value: i32 },
    Changed { from: i32, to: i32 },
    Withdrawn { value: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_value_weights() {
        assert_eq!(VoteChoice::Up.effective_value(true), 5);
        assert_eq!(VoteChoice::Down.effective_value(true), -5);
        assert_eq!(VoteChoice::Up.effective_value(false), 1);
        assert_eq!(VoteChoice::Down.effective_value(false), -1);
    }

    #[test]
    fn test_choice_from_form_value() {
        assert_eq!(VoteChoice::try_from(1).unwrap(), VoteChoice::Up);
        assert_eq!(VoteChoice::try_from(-1).unwrap(), VoteChoice::Down);
        assert!(VoteChoice::try_from(0).is_err());
        assert!(VoteChoice::try_from(5).is_err());
    }

    #[test]
    fn test_identity_keys() {
        let user = VoterIdentity::authenticated("cook@example.com");
        assert_eq!(user.key(), "cook@example.com");
        assert!(user.is_authenticated());

        let anon = VoterIdentity::anonymous("203.0.113.7");
        assert_eq!(anon.key(), "anon:203.0.113.7");
        assert!(!anon.is_authenticated());
    }
}
