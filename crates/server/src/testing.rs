//! In-memory stand-ins for the order store and identity provider.

#![allow(clippy::unwrap_used, clippy::new_without_default)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use jewelry_orders_core::{NewOrder, Order, OrderId, OrderPatch, UserId};

use crate::db::{OrderStore, RepositoryError};
use crate::identity::{AuthSession, Identity, IdentityError, IdentityProvider, Registration};
use crate::models::SessionTokens;

fn injected(what: &str) -> RepositoryError {
    RepositoryError::DataCorruption(format!("injected {what} failure"))
}

// =============================================================================
// Order Store
// =============================================================================

/// Order store backed by a `Vec`. Each insert is stamped one second after
/// the previous one so newest-first ordering is deterministic.
pub struct MemoryOrderStore {
    orders: Mutex<Vec<Order>>,
    epoch: DateTime<Utc>,
    ticks: AtomicU32,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    list_calls: AtomicU32,
    insert_many_calls: AtomicU32,
    update_calls: AtomicU32,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self {
            orders: Mutex::new(Vec::new()),
            epoch: Utc::now(),
            ticks: AtomicU32::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            list_calls: AtomicU32::new(0),
            insert_many_calls: AtomicU32::new(0),
            update_calls: AtomicU32::new(0),
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Listing queries made, per-user and global together.
    pub fn list_calls(&self) -> u32 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn insert_many_calls(&self) -> u32 {
        self.insert_many_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> u32 {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of every stored order, in insertion order.
    pub fn all(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }

    fn stamp(&self, new: &NewOrder) -> Order {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        Order {
            id: OrderId::new(Uuid::new_v4()),
            user_id: new.user_id,
            title: new.title.clone(),
            description: new.description.clone(),
            status: new.status.clone(),
            jewelry_type: new.jewelry_type.clone(),
            material: new.material.clone(),
            carat: new.carat.clone(),
            created_at: self.epoch + Duration::seconds(i64::from(tick)),
        }
    }

    fn newest_first(&self, filter: impl Fn(&Order) -> bool) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| filter(o))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected("read"));
        }
        Ok(self.newest_first(|o| o.user_id == user_id))
    }

    async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected("read"));
        }
        Ok(self.newest_first(|_| true))
    }

    async fn insert(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected("write"));
        }
        let order = self.stamp(order);
        self.orders.lock().unwrap().push(order.clone());
        Ok(order)
    }

    async fn insert_many(&self, orders: &[NewOrder]) -> Result<Vec<Order>, RepositoryError> {
        self.insert_many_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected("write"));
        }
        let stored: Vec<Order> = orders.iter().map(|o| self.stamp(o)).collect();
        self.orders.lock().unwrap().extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn update(
        &self,
        id: OrderId,
        patch: &OrderPatch,
    ) -> Result<Option<Order>, RepositoryError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected("write"));
        }

        let mut orders = self.orders.lock().unwrap();
        let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };

        if let Some(status) = &patch.status {
            order.status = status.clone();
        }
        if let Some(title) = &patch.title {
            order.title = title.clone();
        }
        if let Some(description) = &patch.description {
            order.description = description.clone();
        }
        if let Some(jewelry_type) = &patch.jewelry_type {
            order.jewelry_type = jewelry_type.clone();
        }
        if let Some(material) = &patch.material {
            order.material = material.clone();
        }
        if let Some(carat) = &patch.carat {
            order.carat = carat.clone();
        }

        Ok(Some(order.clone()))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected("read"));
        }
        Ok(())
    }
}

// =============================================================================
// Identity Provider
// =============================================================================

struct FakeUser {
    identity: Identity,
    password: String,
}

/// Identity provider with users, tokens, and injectable failures.
pub struct FakeIdentity {
    users: Mutex<Vec<FakeUser>>,
    access_tokens: Mutex<HashMap<String, UserId>>,
    refresh_tokens: Mutex<HashMap<String, UserId>>,
    failing_lookups: Mutex<HashSet<UserId>>,
    fail_list: AtomicBool,
    fail_create: AtomicBool,
    endless_pages: AtomicBool,
    list_calls: AtomicU32,
    get_calls: AtomicU32,
    token_calls: AtomicU32,
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            access_tokens: Mutex::new(HashMap::new()),
            refresh_tokens: Mutex::new(HashMap::new()),
            failing_lookups: Mutex::new(HashSet::new()),
            fail_list: AtomicBool::new(false),
            fail_create: AtomicBool::new(false),
            endless_pages: AtomicBool::new(false),
            list_calls: AtomicU32::new(0),
            get_calls: AtomicU32::new(0),
            token_calls: AtomicU32::new(0),
        }
    }

    pub fn add_user(&self, email: &str, password: &str) -> Identity {
        let identity = Identity {
            id: UserId::new(Uuid::new_v4()),
            email: Some(email.to_string()),
        };
        self.users.lock().unwrap().push(FakeUser {
            identity: identity.clone(),
            password: password.to_string(),
        });
        identity
    }

    /// Add `count` filler users with unique emails.
    pub fn fill_users(&self, count: usize) {
        for i in 0..count {
            self.add_user(&format!("filler{i}@example.com"), "pw");
        }
    }

    /// Log `user` in and return their tokens.
    pub fn issue_tokens(&self, user: &Identity) -> SessionTokens {
        let tokens = SessionTokens {
            access_token: format!("access-{}", Uuid::new_v4()),
            refresh_token: format!("refresh-{}", Uuid::new_v4()),
        };
        self.access_tokens
            .lock()
            .unwrap()
            .insert(tokens.access_token.clone(), user.id);
        self.refresh_tokens
            .lock()
            .unwrap()
            .insert(tokens.refresh_token.clone(), user.id);
        tokens
    }

    /// Invalidate every access token, as if they had all expired.
    pub fn expire_access_tokens(&self) {
        self.access_tokens.lock().unwrap().clear();
    }

    pub fn fail_lookup_for(&self, id: UserId) {
        self.failing_lookups.lock().unwrap().insert(id);
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    /// Make every user page full and never matching.
    pub fn set_endless_pages(&self, endless: bool) {
        self.endless_pages.store(endless, Ordering::SeqCst);
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn list_calls(&self) -> u32 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> u32 {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Calls to `user_for_token`.
    pub fn token_calls(&self) -> u32 {
        self.token_calls.load(Ordering::SeqCst)
    }

    fn identity(&self, id: UserId) -> Option<Identity> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.identity.id == id)
            .map(|u| u.identity.clone())
    }

    fn session_for(&self, user: Identity) -> AuthSession {
        AuthSession {
            tokens: self.issue_tokens(&user),
            user,
        }
    }

    fn not_found() -> IdentityError {
        IdentityError::Api {
            status: 404,
            message: "User not found".to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn user_for_token(&self, access_token: &str) -> Result<Identity, IdentityError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        let id = self
            .access_tokens
            .lock()
            .unwrap()
            .get(access_token)
            .copied()
            .ok_or(IdentityError::Rejected)?;
        self.identity(id).ok_or(IdentityError::Rejected)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, IdentityError> {
        let id = self
            .refresh_tokens
            .lock()
            .unwrap()
            .remove(refresh_token)
            .ok_or(IdentityError::Rejected)?;
        let user = self.identity(id).ok_or(IdentityError::Rejected)?;
        Ok(self.session_for(user))
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthSession, IdentityError> {
        let user = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| {
                u.identity
                    .email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(email))
                    && u.password == password.expose_secret()
            })
            .map(|u| u.identity.clone())
            .ok_or(IdentityError::Rejected)?;
        Ok(self.session_for(user))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Registration, IdentityError> {
        let user = self.add_user(email, password.expose_secret());
        Ok(Registration {
            session: Some(self.session_for(user.clone())),
            user,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        self.access_tokens.lock().unwrap().remove(access_token);
        Ok(())
    }

    async fn list_users(&self, page: u32, per_page: u32) -> Result<Vec<Identity>, IdentityError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(IdentityError::Api {
                status: 500,
                message: "injected list failure".to_string(),
            });
        }

        if self.endless_pages.load(Ordering::SeqCst) {
            return Ok((0..per_page)
                .map(|_| Identity {
                    id: UserId::new(Uuid::new_v4()),
                    email: None,
                })
                .collect());
        }

        let skip = (page.saturating_sub(1) * per_page) as usize;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .skip(skip)
            .take(per_page as usize)
            .map(|u| u.identity.clone())
            .collect())
    }

    async fn get_user(&self, id: UserId) -> Result<Identity, IdentityError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_lookups.lock().unwrap().contains(&id) {
            return Err(IdentityError::Api {
                status: 500,
                message: "injected lookup failure".to_string(),
            });
        }
        self.identity(id).ok_or_else(Self::not_found)
    }

    async fn create_user(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, IdentityError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(IdentityError::Api {
                status: 422,
                message: "injected create failure".to_string(),
            });
        }
        Ok(self.add_user(email, password.expose_secret()))
    }
}
