/// Request-scoped storage connection
///
/// Handlers that touch the store take a [`DbConn`]. The connection is
/// acquired before the handler body runs and released when the handler
/// returns, on success and error paths alike. Reborrow it with `&mut *conn`
/// to hand a `&mut dyn StoreConn` to a controller.
///
/// ```no_run
/// use axum::Json;
/// use taskboard_api::{error::ApiResult, extract::DbConn};
/// use taskboard_shared::db::store::StoreConn;
///
/// async fn count_tasks(mut conn: DbConn) -> ApiResult<Json<usize>> {
///     Ok(Json(conn.list_tasks(1).await?.len()))
/// }
/// ```

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::ops::{Deref, DerefMut};
use taskboard_shared::db::store::StoreConn;

use crate::{app::AppState, error::ApiError};

pub struct DbConn(pub Box<dyn StoreConn>);

#[async_trait]
impl FromRequestParts<AppState> for DbConn {
    type Rejection = ApiError;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let conn = state.store.acquire().await?;
        Ok(DbConn(conn))
    }
}

impl Deref for DbConn {
    type Target = dyn StoreConn;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl DerefMut for DbConn {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}
