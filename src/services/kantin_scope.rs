use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::{
    entity::{
        kantins::{self, Entity as Kantins},
        menus,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Role,
};

/// Which stalls a staff member may act on.
#[derive(Debug, Clone)]
pub enum StallScope {
    All,
    Own(kantins::Model),
}

impl StallScope {
    pub fn kantin(&self) -> Option<&kantins::Model> {
        match self {
            StallScope::All => None,
            StallScope::Own(kantin) => Some(kantin),
        }
    }

    pub fn ensure_owns(&self, menu: &menus::Model) -> AppResult<()> {
        match self {
            StallScope::All => Ok(()),
            StallScope::Own(kantin) if kantin.id == menu.kantin_id => Ok(()),
            StallScope::Own(_) => Err(AppError::Forbidden(
                "this menu belongs to another stall".into(),
            )),
        }
    }
}

/// Resolve the scope of an already capability-checked staff member. Admins see
/// every stall; kantin accounts only the stall they manage.
pub async fn resolve_scope<C>(conn: &C, user: &AuthUser) -> AppResult<StallScope>
where
    C: ConnectionTrait,
{
    match user.role {
        Role::Admin => Ok(StallScope::All),
        Role::Kantin => find_owned_kantin(conn, user)
            .await?
            .map(StallScope::Own)
            .ok_or(AppError::NoStall),
        Role::Customer => Err(AppError::Forbidden(
            "customer accounts do not manage a stall".into(),
        )),
    }
}

pub async fn find_owned_kantin<C>(conn: &C, user: &AuthUser) -> AppResult<Option<kantins::Model>>
where
    C: ConnectionTrait,
{
    let kantin = Kantins::find()
        .filter(kantins::Column::UserId.eq(user.user_id))
        .one(conn)
        .await?;
    Ok(kantin)
}
