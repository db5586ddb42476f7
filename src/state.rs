use actix_web::web;
use std::sync::Arc;

use crate::auth::{AuthService, TokenIssuer};
use crate::store::{TaskStore, UserStore};
use crate::tasks::TaskService;

/// Services shared by every worker, wired to one store backend.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tasks: TaskService,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, tokens: TokenIssuer, hash_cost: u32) -> Self
    where
        S: UserStore + TaskStore + 'static,
    {
        let auth = AuthService::new(store.clone()).with_hash_cost(hash_cost);
        let tasks = TaskService::new(store, auth.clone());
        Self {
            auth,
            tasks,
            tokens,
        }
    }

    /// Registers the services as `web::Data` for the handlers in `routes`.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.auth.clone()))
            .app_data(web::Data::new(self.tasks.clone()))
            .app_data(web::Data::new(self.tokens.clone()));
    }
}
