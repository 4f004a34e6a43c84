//! Session state: who is logged in.
//!
//! The session is a plain value handed to commands and screens. It mirrors the
//! identity to the store (`user` and `loggedInEmployeeId`) so a later run can
//! restore it.

use tracing::{debug, info, warn};

use crate::auth::{Directory, Identity};
use crate::error::{Error, Result};
use crate::store::{Store, LOGGED_IN_ID_KEY, USER_KEY};

/// The current authenticated identity, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    /// Restore the session from the store.
    ///
    /// A `user` value that does not parse as an identity is removed together
    /// with `loggedInEmployeeId` and the session starts unauthenticated.
    pub fn restore(store: &mut Store) -> Result<Self> {
        let Some(raw) = store.get_item(USER_KEY) else {
            return Ok(Session::default());
        };

        match serde_json::from_str::<Identity>(raw) {
            Ok(identity) => {
                debug!(id = %identity.id, "restored session");
                if store.get_item(LOGGED_IN_ID_KEY).is_none() {
                    store.set_item(LOGGED_IN_ID_KEY, identity.id.clone())?;
                }
                Ok(Session { identity: Some(identity) })
            }
            Err(e) => {
                warn!(error = %e, "stored session is corrupt, clearing it");
                store.remove_item(USER_KEY)?;
                store.remove_item(LOGGED_IN_ID_KEY)?;
                Ok(Session::default())
            }
        }
    }

    /// Authenticate and persist the new identity.
    pub fn login(&mut self, store: &mut Store, email: &str, password: &str) -> Result<&Identity> {
        let identity = Directory::load(store)?.authenticate(email, password)?;
        store.set_json(USER_KEY, &identity)?;
        store.set_item(LOGGED_IN_ID_KEY, identity.id.clone())?;
        Ok(self.identity.insert(identity))
    }

    /// Forget the identity and remove both session keys.
    pub fn logout(&mut self, store: &mut Store) -> Result<()> {
        if let Some(identity) = self.identity.take() {
            info!(id = %identity.id, "logged out");
        }
        store.remove_item(USER_KEY)?;
        store.remove_item(LOGGED_IN_ID_KEY)?;
        Ok(())
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// The identity, or `NotLoggedIn` for gated surfaces.
    pub fn require(&self) -> Result<&Identity> {
        self.identity.as_ref().ok_or(Error::NotLoggedIn)
    }

    /// The identity if it is an admin.
    pub fn require_admin(&self) -> Result<&Identity> {
        let identity = self.require()?;
        if identity.is_admin() {
            Ok(identity)
        } else {
            Err(Error::Forbidden(format!("{} is not an admin", identity.email)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Role;

    #[test]
    fn test_login_persists_and_restores() {
        let mut store = Store::seeded().unwrap();
        let mut session = Session::default();
        session.login(&mut store, "employee2@example.com", "123").unwrap();

        assert_eq!(store.get_item(LOGGED_IN_ID_KEY), Some("emp002"));
        let restored = Session::restore(&mut store).unwrap();
        assert_eq!(restored, session);
        assert_eq!(restored.require().unwrap().role, Role::Employee);
    }

    #[test]
    fn test_failed_login_leaves_store_untouched() {
        let mut store = Store::seeded().unwrap();
        let mut session = Session::default();
        assert!(session.login(&mut store, "admin@me.com", "wrong").is_err());
        assert!(!session.is_authenticated());
        assert!(store.get_item(USER_KEY).is_none());
        assert!(store.get_item(LOGGED_IN_ID_KEY).is_none());
    }

    #[test]
    fn test_logout_clears_keys() {
        let mut store = Store::seeded().unwrap();
        let mut session = Session::default();
        session.login(&mut store, "admin@me.com", "123").unwrap();
        session.logout(&mut store).unwrap();

        assert!(session.identity().is_none());
        assert!(store.get_item(USER_KEY).is_none());
        assert!(store.get_item(LOGGED_IN_ID_KEY).is_none());
        assert!(matches!(session.require(), Err(Error::NotLoggedIn)));
    }

    #[test]
    fn test_corrupt_session_falls_back_to_unauthenticated() {
        let mut store = Store::seeded().unwrap();
        store.set_item(USER_KEY, "{\"email\": 42}").unwrap();
        store.set_item(LOGGED_IN_ID_KEY, "emp001").unwrap();

        let session = Session::restore(&mut store).unwrap();
        assert!(!session.is_authenticated());
        assert!(store.get_item(USER_KEY).is_none());
        assert!(store.get_item(LOGGED_IN_ID_KEY).is_none());
    }

    #[test]
    fn test_restore_fills_missing_logged_in_id() {
        let mut store = Store::seeded().unwrap();
        store
            .set_item(USER_KEY, r#"{"id":"user001","email":"user@me.com","role":"user"}"#)
            .unwrap();
        Session::restore(&mut store).unwrap();
        assert_eq!(store.get_item(LOGGED_IN_ID_KEY), Some("user001"));
    }

    #[test]
    fn test_require_admin_rejects_employees() {
        let mut store = Store::seeded().unwrap();
        let mut session = Session::default();
        session.login(&mut store, "employee1@example.com", "123").unwrap();
        assert!(matches!(session.require_admin(), Err(Error::Forbidden(_))));
    }
}
