use crate::errors::AppError;

/// Handle for an authenticated actor.
///
/// Session issuance lives outside this crate; callers construct a `Session`
/// from whatever identity their transport established and pass it into
/// mutations.
/// Operations that require authentication take `Option<&Session>` and fail
/// with `AppError::Unauthenticated` when given `None`.
#[derive(Debug, Clone)]
pub struct Session {
    user_id: String,
}

impl Session {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Resolves the acting user id or fails with Unauthenticated.
pub fn require_session(session: Option<&Session>) -> Result<&str, AppError> {
    session.map(Session::user_id).ok_or(AppError::Unauthenticated)
}
