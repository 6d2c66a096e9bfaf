use sea_orm_migration::prelude::*;

use crate::m20260712_090000_users_chats_members::{Chats, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Messages::ChatId).big_integer().not_null())
                    .col(ColumnDef::new(Messages::MessageId).big_integer().not_null())
                    .col(ColumnDef::new(Messages::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Messages::SentAt).timestamp().not_null())
                    .col(ColumnDef::new(Messages::Content).string())
                    .col(ColumnDef::new(Messages::ForwardUserId).big_integer())
                    .col(ColumnDef::new(Messages::ReplyMessageId).big_integer())
                    // Message ids are only unique per chat on the platform.
                    .primary_key(
                        Index::create()
                            .col(Messages::ChatId)
                            .col(Messages::MessageId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-messages-user_id")
                            .from(Messages::Table, Messages::UserId)
                            .to(Users::Table, Users::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-messages-chat_id")
                            .from(Messages::Table, Messages::ChatId)
                            .to(Chats::Table, Chats::ChatId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-messages-user_id")
                    .table(Messages::Table)
                    .col(Messages::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Messages {
    Table,
    ChatId,
    MessageId,
    UserId,
    SentAt,
    Content,
    ForwardUserId,
    ReplyMessageId,
}
