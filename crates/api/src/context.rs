use globaltrade_core::UserId;

/// Session context for a request.
///
/// Inserted by the auth middleware and passed into handlers explicitly — the
/// authenticated user is never ambient state. Gated routes can rely on its
/// presence.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionContext {
    user_id: UserId,
}

impl SessionContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
