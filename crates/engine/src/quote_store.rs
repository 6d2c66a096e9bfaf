//! Quote ingestion and selection.

use rand::Rng;
use sea_orm::{
    ActiveValue, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};

use crate::{Engine, EngineError, ResultEngine, chat_quotes, quotes, with_tx};

impl Engine {
    /// Store one quote and associate it to every chat in `chat_ids`.
    ///
    /// The quote row and all its associations are written in a single
    /// transaction: a failure on any association rolls back the quote too,
    /// so no orphaned quote can survive a crash.
    pub async fn add_quote(&self, content: &str, chat_ids: &[i64]) -> ResultEngine<i64> {
        let content = content.trim();
        if content.is_empty() {
            return Err(EngineError::InvalidQuote("empty content".to_string()));
        }
        if chat_ids.is_empty() {
            return Err(EngineError::InvalidQuote(
                "a quote needs at least one chat".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            async {
                let quote = quotes::ActiveModel {
                    content: ActiveValue::Set(content.to_string()),
                    ..Default::default()
                }
                .insert(&db_tx)
                .await?;

                for &chat_id in chat_ids {
                    chat_quotes::ActiveModel {
                        quote_id: ActiveValue::Set(quote.quote_id),
                        chat_id: ActiveValue::Set(chat_id),
                    }
                    .insert(&db_tx)
                    .await?;
                }

                Ok(quote.quote_id)
            }
            .await
        })
    }

    /// One uniformly chosen quote among those associated to the chat, or
    /// `None` when the chat has no quotes. Pure read.
    pub async fn random_quote(&self, chat_id: i64) -> ResultEngine<Option<String>> {
        let total = self.quote_count(chat_id).await?;
        if total == 0 {
            return Ok(None);
        }

        let index = rand::thread_rng().gen_range(0..total);
        let quote = quotes::Entity::find()
            .join(JoinType::InnerJoin, quotes::Relation::ChatQuotes.def())
            .filter(chat_quotes::Column::ChatId.eq(chat_id))
            .order_by_asc(quotes::Column::QuoteId)
            .offset(index)
            .limit(1)
            .one(&self.database)
            .await?;

        Ok(quote.map(|q| q.content))
    }

    /// Number of quotes associated to a chat.
    pub async fn quote_count(&self, chat_id: i64) -> ResultEngine<u64> {
        let count = chat_quotes::Entity::find()
            .filter(chat_quotes::Column::ChatId.eq(chat_id))
            .count(&self.database)
            .await?;
        Ok(count)
    }
}
