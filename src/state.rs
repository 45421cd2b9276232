use std::{ops::Deref, sync::Arc};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::{
    chat::ChatClient,
    config::Config,
    mail::Mailer,
    session::signing_key,
    users::{InMemoryUsers, UserStore},
};

pub struct AppState {
    pub config: Config,
    pub key: Key,
    pub users: Arc<dyn UserStore>,
    pub mailer: Mailer,
    pub chat: ChatClient,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        let key = signing_key(&config.secret_key);
        let users =
            InMemoryUsers::with_admin(&config.admin_password).expect("Admin seed misconfigured!");
        let mailer = Mailer::new(&config).expect("SMTP relay misconfigured!");
        let chat = ChatClient::new(&config);

        Arc::new(Self {
            config,
            key,
            users: Arc::new(users),
            mailer,
            chat,
        })
    }
}

/// Cloneable router state. The newtype is what implements `FromRef` for
/// the cookie signing key; handlers reach the inner fields through
/// `Deref`.
#[derive(Clone)]
pub struct SharedState(pub Arc<AppState>);

impl Deref for SharedState {
    type Target = AppState;

    fn deref(&self) -> &AppState {
        &self.0
    }
}

impl FromRef<SharedState> for Key {
    fn from_ref(state: &SharedState) -> Key {
        state.key.clone()
    }
}
