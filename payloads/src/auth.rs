use crate::responses::UserProfile;
use crate::session::SessionStore;

/// Whether auth checks run at all. With auth disabled every gated view
/// behaves as if an admin were signed in; this is for environments without
/// an auth backend, not an access control mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthConfig {
    pub enabled: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AuthConfig {
    /// Interpret an `AUTH_DISABLED`-style flag. Unset, empty, `0` and `false`
    /// leave auth on.
    pub fn from_disabled_flag(flag: Option<&str>) -> Self {
        let disabled = match flag.map(str::trim) {
            None | Some("") => false,
            Some(value) => {
                !(value == "0" || value.eq_ignore_ascii_case("false"))
            }
        };
        Self { enabled: !disabled }
    }

    /// The user presented when auth is disabled.
    pub fn bypass_user(username: &str) -> UserProfile {
        UserProfile {
            username: if username.is_empty() {
                "guest".to_string()
            } else {
                username.to_string()
            },
            is_admin: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(UserProfile),
}

impl AuthState {
    /// Derive the state from what is persisted.
    pub fn from_session(session: &SessionStore, config: &AuthConfig) -> Self {
        if !config.enabled {
            return Self::Authenticated(AuthConfig::bypass_user(""));
        }
        match (session.token(), session.user()) {
            (Some(_), Some(user)) => Self::Authenticated(user),
            _ => Self::Anonymous,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|user| user.is_admin)
    }
}

/// Outcome of checking an admin-gated route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    RedirectToLogin,
    RedirectHome,
}

pub fn admin_access(state: &AuthState, config: &AuthConfig) -> Access {
    if !config.enabled {
        return Access::Granted;
    }
    match state {
        AuthState::Anonymous => Access::RedirectToLogin,
        AuthState::Authenticated(user) if user.is_admin => Access::Granted,
        AuthState::Authenticated(_) => Access::RedirectHome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responses::LoginResponse;

    fn bob() -> LoginResponse {
        LoginResponse {
            token: "t".into(),
            username: "bob".into(),
            is_admin: false,
        }
    }

    #[test]
    fn disabled_flag_parsing() {
        assert!(AuthConfig::from_disabled_flag(None).enabled);
        assert!(AuthConfig::from_disabled_flag(Some("")).enabled);
        assert!(AuthConfig::from_disabled_flag(Some("false")).enabled);
        assert!(AuthConfig::from_disabled_flag(Some("0")).enabled);
        assert!(!AuthConfig::from_disabled_flag(Some("1")).enabled);
        assert!(!AuthConfig::from_disabled_flag(Some("true")).enabled);
    }

    #[test]
    fn state_follows_the_session() {
        let session = SessionStore::in_memory();
        let config = AuthConfig::default();
        assert_eq!(
            AuthState::from_session(&session, &config),
            AuthState::Anonymous
        );

        session.save(&bob());
        let state = AuthState::from_session(&session, &config);
        assert!(state.is_authenticated());
        assert!(!state.is_admin());
    }

    #[test]
    fn disabled_auth_acts_as_admin() {
        let config = AuthConfig { enabled: false };
        let state = AuthState::from_session(&SessionStore::in_memory(), &config);
        assert!(state.is_admin());
        assert_eq!(admin_access(&AuthState::Anonymous, &config), Access::Granted);
    }

    #[test]
    fn admin_routes() {
        let config = AuthConfig::default();
        assert_eq!(
            admin_access(&AuthState::Anonymous, &config),
            Access::RedirectToLogin
        );
        let state = AuthState::Authenticated(bob().profile());
        assert_eq!(admin_access(&state, &config), Access::RedirectHome);
        let state = AuthState::Authenticated(UserProfile {
            username: "alice".into(),
            is_admin: true,
        });
        assert_eq!(admin_access(&state, &config), Access::Granted);
    }
}
