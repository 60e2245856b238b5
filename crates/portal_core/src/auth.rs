use crate::{CurrentUser, GateState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthStatus {
    pub loading: bool,
    pub is_authenticated: bool,
    pub is_admin: bool,
}

impl AuthStatus {
    pub const LOADING: AuthStatus = AuthStatus {
        loading: true,
        is_authenticated: false,
        is_admin: false,
    };

    pub const ANONYMOUS: AuthStatus = AuthStatus {
        loading: false,
        is_authenticated: false,
        is_admin: false,
    };

    pub fn for_user(user: &CurrentUser) -> Self {
        Self {
            loading: false,
            is_authenticated: true,
            is_admin: user.is_admin(),
        }
    }
}

/// Authentication state owned by the application for one session.
///
/// Created in the loading state at start-up, resolved once the current user
/// is known, and consumed by [`AuthContext::logout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    status: AuthStatus,
    user: Option<CurrentUser>,
}

impl AuthContext {
    pub fn start() -> Self {
        Self {
            status: AuthStatus::LOADING,
            user: None,
        }
    }

    /// Settles a loading session. Only the first result counts: once resolved
    /// or logged out, later results are dropped and `false` is returned.
    pub fn resolve(&mut self, user: Option<CurrentUser>) -> bool {
        if !self.status.loading {
            return false;
        }
        self.status = user
            .as_ref()
            .map(AuthStatus::for_user)
            .unwrap_or(AuthStatus::ANONYMOUS);
        self.user = user;
        true
    }

    pub fn logout(self) -> Self {
        Self {
            status: AuthStatus::ANONYMOUS,
            user: None,
        }
    }

    pub fn status(&self) -> AuthStatus {
        self.status
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn gate(&self) -> GateState {
        GateState::from_status(&self.status)
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::start()
    }
}
