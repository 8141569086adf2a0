use super::{SessionUser, VoterIdentity};

/// The party behind a request.
///
/// `user` is the logged-in account, if any. `voter` is always present and is
/// what the vote ledger keys on; for a logged-in user it is their email.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user: Option<SessionUser>,
    pub voter: VoterIdentity,
}

impl Caller {
    pub fn authenticated(user: SessionUser) -> Self {
        let voter = VoterIdentity::authenticated(user.email.clone());
        Self {
            user: Some(user),
            voter,
        }
    }

    pub fn anonymous(client_addr: impl std::fmt::Display) -> Self {
        Self {
            user: None,
            voter: VoterIdentity::anonymous(client_addr),
        }
    }

    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.user.as_ref().map(|u| u.id)
    }
}
