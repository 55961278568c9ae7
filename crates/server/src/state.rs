use auth::PrincipalResolver;
use axum::extract::FromRef;
use storage::Db;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub resolver: PrincipalResolver,
}

impl FromRef<AppState> for Db {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for PrincipalResolver {
    fn from_ref(state: &AppState) -> Self {
        state.resolver.clone()
    }
}
