use crate::AuthStatus;

/// Where a denied visitor is sent.
pub const PUBLIC_ENTRY: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Resolving,
    Denied,
    Granted,
}

impl GateState {
    pub fn from_status(status: &AuthStatus) -> Self {
        if status.loading {
            GateState::Resolving
        } else if status.is_authenticated && status.is_admin {
            GateState::Granted
        } else {
            GateState::Denied
        }
    }
}

/// Rendering decision for a protected subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView<T> {
    Pending,
    Redirect(&'static str),
    Granted(T),
}

impl<T> GateView<T> {
    pub fn granted(&self) -> Option<&T> {
        match self {
            GateView::Granted(content) => Some(content),
            _ => None,
        }
    }
}

/// Builds the protected content only when the gate is granted.
pub fn guard<T>(status: &AuthStatus, protected: impl FnOnce() -> T) -> GateView<T> {
    match GateState::from_status(status) {
        GateState::Resolving => GateView::Pending,
        GateState::Denied => GateView::Redirect(PUBLIC_ENTRY),
        GateState::Granted => GateView::Granted(protected()),
    }
}
