//! Server-side session store.
//!
//! A session is created at login and referenced by the `sid` claim of the
//! bearer token. It carries the caller's identity and their cart; dropping the
//! session (logout or expiry) drops the cart with it.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    cart::{Cart, CartError},
    error::{AppError, AppResult},
    models::Role,
};

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
    pub cart: Cart,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Open a session with an empty cart. Expired sessions are swept here.
    pub async fn create(&self, user_id: Uuid, username: &str, role: Role) -> Session {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            username: username.to_string(),
            role,
            cart: Cart::new(),
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, existing| !existing.is_expired(now));
        sessions.insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .filter(|session| !session.is_expired(Utc::now()))
            .cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Snapshot of the session's cart.
    pub async fn cart(&self, id: Uuid) -> AppResult<Cart> {
        self.get(id)
            .await
            .map(|session| session.cart)
            .ok_or_else(session_expired)
    }

    /// Run `f` against the session's cart under the write lock.
    pub async fn with_cart<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Cart) -> Result<T, CartError>,
    ) -> AppResult<T> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .filter(|session| !session.is_expired(Utc::now()))
            .ok_or_else(session_expired)?;
        Ok(f(&mut session.cart)?)
    }

    /// Move the cart out of the session, leaving an empty one behind. A second
    /// caller racing on the same session gets the empty cart.
    pub async fn take_cart(&self, id: Uuid) -> AppResult<Cart> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .filter(|session| !session.is_expired(Utc::now()))
            .ok_or_else(session_expired)?;
        Ok(std::mem::take(&mut session.cart))
    }

    /// Hand back a cart obtained from [`SessionStore::take_cart`], merged with
    /// anything added since. A session that is gone by now is left alone.
    pub async fn restore_cart(&self, id: Uuid, taken: Cart) {
        if let Some(session) = self.sessions.write().await.get_mut(&id) {
            session.cart.absorb(taken);
        }
    }
}

fn session_expired() -> AppError {
    AppError::Unauthorized("session has expired, please log in again".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn created_session_is_retrievable_until_removed() {
        let store = SessionStore::new(Duration::minutes(30));
        let user_id = Uuid::new_v4();

        let session = store.create(user_id, "budi", Role::Customer).await;
        let loaded = store.get(session.id).await.expect("session");
        assert_eq!(loaded.user_id, user_id);
        assert_eq!(loaded.username, "budi");
        assert!(loaded.cart.is_empty());

        assert!(store.remove(session.id).await);
        assert!(store.get(session.id).await.is_none());
        assert!(!store.remove(session.id).await);
    }

    #[tokio::test]
    async fn expired_sessions_are_invisible_and_swept() {
        let store = SessionStore::new(Duration::seconds(-1));
        let stale = store.create(Uuid::new_v4(), "lama", Role::Customer).await;
        assert!(store.get(stale.id).await.is_none());
        assert!(matches!(
            store.cart(stale.id).await,
            Err(AppError::Unauthorized(_))
        ));

        store.create(Uuid::new_v4(), "baru", Role::Customer).await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn cart_mutations_persist_in_the_session() {
        use crate::entity::menus;

        let store = SessionStore::new(Duration::minutes(30));
        let session = store.create(Uuid::new_v4(), "sari", Role::Customer).await;
        let menu = menus::Model {
            id: Uuid::new_v4(),
            kantin_id: Uuid::new_v4(),
            name: "Es Jeruk".into(),
            description: None,
            price: 8_000,
            stock: 30,
            image_url: "images/es_jeruk.jpg".into(),
            created_at: Utc::now().into(),
        };

        store
            .with_cart(session.id, |cart| cart.add(&menu, 3).map(|_| ()))
            .await
            .unwrap();
        let rejected = store
            .with_cart(session.id, |cart| cart.add(&menu, 31).map(|_| ()))
            .await;
        assert!(matches!(rejected, Err(AppError::BadRequest(_))));

        let cart = store.cart(session.id).await.unwrap();
        assert_eq!(cart.get(menu.id).unwrap().quantity, 3);

        let taken = store.take_cart(session.id).await.unwrap();
        assert_eq!(taken.get(menu.id).unwrap().quantity, 3);
        assert!(store.cart(session.id).await.unwrap().is_empty());
        assert!(store.take_cart(session.id).await.unwrap().is_empty());

        store
            .with_cart(session.id, |cart| cart.add(&menu, 1).map(|_| ()))
            .await
            .unwrap();
        store.restore_cart(session.id, taken).await;
        assert_eq!(
            store.cart(session.id).await.unwrap().get(menu.id).unwrap().quantity,
            4
        );
    }
}
