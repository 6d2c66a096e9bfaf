//! Targeted updates of the per-user moderation flags.

use sea_orm::{ActiveValue, prelude::*};

use crate::{Engine, EngineError, ResultEngine, users};

impl Engine {
    pub async fn set_user_admin(&self, user_id: i64, is_admin: bool) -> ResultEngine<()> {
        self.update_user_flag(user_id, |user| {
            user.is_admin = ActiveValue::Set(is_admin);
        })
        .await
    }

    pub async fn set_user_muted(&self, user_id: i64, is_muted: bool) -> ResultEngine<()> {
        self.update_user_flag(user_id, |user| {
            user.is_muted = ActiveValue::Set(is_muted);
        })
        .await
    }

    async fn update_user_flag(
        &self,
        user_id: i64,
        set: impl FnOnce(&mut users::ActiveModel),
    ) -> ResultEngine<()> {
        if users::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
            .is_none()
        {
            return Err(EngineError::KeyNotFound(user_id.to_string()));
        }

        let mut user = users::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            ..Default::default()
        };
        set(&mut user);
        user.update(&self.database).await?;
        Ok(())
    }
}
