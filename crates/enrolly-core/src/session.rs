// ── Login / logout ──
//
// `Session` is the single writer of the persisted token. The request
// pipeline and the navigation guard hold the same store but only read it.

use std::sync::Arc;

use enrolly_api::{Error, SessionStore};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Shared read handle for the pipeline and guard.
    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.store)
    }

    /// Persist the token issued by a successful login.
    pub fn login(&self, token: SecretString) -> Result<(), Error> {
        if token.expose_secret().trim().is_empty() {
            return Err(Error::InvalidToken {
                message: "token is empty".into(),
            });
        }
        self.store.set_token(token)?;
        info!("logged in");
        Ok(())
    }

    /// Forget the token. Logging out twice is not an error.
    pub fn logout(&self) -> Result<(), Error> {
        self.store.clear_token()?;
        info!("logged out");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use enrolly_api::MemorySessionStore;

    use super::*;

    #[test]
    fn login_then_logout() {
        let session = Session::new(Arc::new(MemorySessionStore::new()));
        assert!(!session.is_authenticated());

        session.login("abc".to_owned().into()).unwrap();
        assert!(session.is_authenticated());
        assert!(session.store().token().is_some());

        session.logout().unwrap();
        session.logout().unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn empty_token_is_rejected() {
        let session = Session::new(Arc::new(MemorySessionStore::new()));
        let result = session.login(String::new().into());
        assert!(matches!(result, Err(Error::InvalidToken { .. })));
        assert!(!session.is_authenticated());
    }
}
