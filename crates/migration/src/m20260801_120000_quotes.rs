use sea_orm_migration::prelude::*;

use crate::m20260712_090000_users_chats_members::Chats;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Quotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Quotes::QuoteId)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Quotes::Content).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChatQuotes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ChatQuotes::QuoteId).big_integer().not_null())
                    .col(ColumnDef::new(ChatQuotes::ChatId).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(ChatQuotes::QuoteId)
                            .col(ChatQuotes::ChatId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-chat_quotes-quote_id")
                            .from(ChatQuotes::Table, ChatQuotes::QuoteId)
                            .to(Quotes::Table, Quotes::QuoteId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-chat_quotes-chat_id")
                            .from(ChatQuotes::Table, ChatQuotes::ChatId)
                            .to(Chats::Table, Chats::ChatId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-chat_quotes-chat_id")
                    .table(ChatQuotes::Table)
                    .col(ChatQuotes::ChatId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChatQuotes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Quotes::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Quotes {
    Table,
    QuoteId,
    Content,
}

#[derive(Iden)]
enum ChatQuotes {
    Table,
    QuoteId,
    ChatId,
}
