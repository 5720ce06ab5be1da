use payloads::auth::AuthState;
use payloads::cache::PropertyCache;
use payloads::responses::UserProfile;
use yewdux::prelude::*;

use crate::{auth_config, get_api_client};

#[derive(Clone, PartialEq, Store)]
pub struct State {
    // === Authentication (managed by use_authentication) ===
    pub auth_state: AuthState,

    // === Properties (managed by use_properties + use_property) ===
    pub cache: PropertyCache,
}

impl Default for State {
    /// Starts from whatever session is persisted so a reload does not flash
    /// the anonymous view before the session is validated.
    fn default() -> Self {
        let api_client = get_api_client();
        Self {
            auth_state: AuthState::from_session(
                api_client.session(),
                &auth_config(),
            ),
            cache: PropertyCache::default(),
        }
    }
}

impl State {
    pub fn is_authenticated(&self) -> bool {
        self.auth_state.is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.auth_state.is_admin()
    }

    pub fn login(&mut self, profile: UserProfile) {
        self.auth_state = AuthState::Authenticated(profile);
    }

    /// Call after the stored session has been cleared.
    pub fn logout(&mut self) {
        self.auth_state =
            AuthState::from_session(get_api_client().session(), &auth_config());
        self.cache.clear();
    }
}
