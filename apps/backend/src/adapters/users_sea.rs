//! SeaORM adapter for the user store.

use std::str::FromStr;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, Set};
use time::OffsetDateTime;

use crate::auth::claims::Role;
use crate::entities::users;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::infra::db_errors::map_db_err;
use crate::repos::users::{NewUser, User, UserStore};

#[derive(Debug, Clone)]
pub struct SeaUserStore {
    conn: DatabaseConnection,
}

impl SeaUserStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

impl TryFrom<users::Model> for User {
    type Error = DomainError;

    fn try_from(model: users::Model) -> Result<Self, Self::Error> {
        let role = Role::from_str(&model.role).map_err(|e| {
            DomainError::infra(
                InfraErrorKind::Other("Data".into()),
                format!("user {}: {e}", model.id),
            )
        })?;

        Ok(User {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            first_name: model.first_name,
            last_name: model.last_name,
            role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[async_trait]
impl UserStore for SeaUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let stored = Expr::expr(Func::lower(Expr::col(users::Column::Email)));
        users::Entity::find()
            .filter(stored.eq(email.to_lowercase()))
            .one(&self.conn)
            .await
            .map_err(map_db_err)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(map_db_err)?
            .map(User::try_from)
            .transpose()
    }

    async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        let now = OffsetDateTime::now_utc();
        let user_active = users::ActiveModel {
            id: NotSet,
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            role: Set(new_user.role.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = user_active.insert(&self.conn).await.map_err(map_db_err)?;
        User::try_from(model)
    }
}
