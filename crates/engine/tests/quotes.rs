use chrono::Utc;
use sea_orm::{Database, DatabaseConnection, EntityTrait};

use engine::{ChatEvent, ChatProfile, Engine, EngineError, NewMessage, UserProfile};
use migration::MigratorTrait;

const BOT_ID: i64 = 999;
const CLUB_A: i64 = -100_001;
const CLUB_B: i64 = -100_002;
const CLUB_C: i64 = -100_003;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .bot_user_id(BOT_ID)
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn register_chat(engine: &Engine, chat_id: i64) {
    engine
        .reconcile(&ChatEvent::Message {
            chat: ChatProfile {
                chat_id,
                title: Some("club".to_string()),
            },
            from: UserProfile {
                user_id: 1,
                first_name: "ada".to_string(),
                last_name: None,
                username: None,
            },
            message: NewMessage {
                message_id: chat_id.abs(),
                sent_at: Utc::now(),
                content: Some("hi".to_string()),
                forward_user_id: None,
                reply_message_id: None,
            },
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn random_quote_is_none_for_chat_without_quotes() {
    let (engine, _db) = engine_with_db().await;
    register_chat(&engine, CLUB_A).await;

    assert_eq!(engine.random_quote(CLUB_A).await.unwrap(), None);
    assert_eq!(engine.quote_count(CLUB_A).await.unwrap(), 0);
}

#[tokio::test]
async fn quote_is_served_only_to_its_associated_chats() {
    let (engine, _db) = engine_with_db().await;
    register_chat(&engine, CLUB_A).await;
    register_chat(&engine, CLUB_B).await;
    register_chat(&engine, CLUB_C).await;

    engine
        .add_quote("never gonna give you up", &[CLUB_A, CLUB_B])
        .await
        .unwrap();

    assert_eq!(
        engine.random_quote(CLUB_A).await.unwrap().as_deref(),
        Some("never gonna give you up")
    );
    assert_eq!(
        engine.random_quote(CLUB_B).await.unwrap().as_deref(),
        Some("never gonna give you up")
    );
    assert_eq!(engine.random_quote(CLUB_C).await.unwrap(), None);
}

#[tokio::test]
async fn random_quote_samples_within_the_chat_set() {
    let (engine, _db) = engine_with_db().await;
    register_chat(&engine, CLUB_A).await;
    register_chat(&engine, CLUB_B).await;

    engine.add_quote("alpha", &[CLUB_A]).await.unwrap();
    engine.add_quote("beta", &[CLUB_B]).await.unwrap();

    for _ in 0..20 {
        assert_eq!(
            engine.random_quote(CLUB_A).await.unwrap().as_deref(),
            Some("alpha")
        );
    }
}

#[tokio::test]
async fn add_quote_trims_and_counts_per_chat() {
    let (engine, _db) = engine_with_db().await;
    register_chat(&engine, CLUB_A).await;

    engine.add_quote("  spaced out  ", &[CLUB_A]).await.unwrap();
    engine.add_quote("second", &[CLUB_A]).await.unwrap();

    assert_eq!(engine.quote_count(CLUB_A).await.unwrap(), 2);

    let sampled = engine.random_quote(CLUB_A).await.unwrap().unwrap();
    assert!(sampled == "spaced out" || sampled == "second");
}

#[tokio::test]
async fn add_quote_rejects_blank_content_and_empty_chat_set() {
    let (engine, db) = engine_with_db().await;
    register_chat(&engine, CLUB_A).await;

    assert_eq!(
        engine.add_quote("   ", &[CLUB_A]).await,
        Err(EngineError::InvalidQuote("empty content".to_string()))
    );
    assert_eq!(
        engine.add_quote("lonely", &[]).await,
        Err(EngineError::InvalidQuote(
            "a quote needs at least one chat".to_string()
        ))
    );

    assert!(engine::quotes::Entity::find().all(&db).await.unwrap().is_empty());
    assert!(
        engine::chat_quotes::Entity::find()
            .all(&db)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn failed_association_rolls_back_the_quote() {
    let (engine, db) = engine_with_db().await;
    register_chat(&engine, CLUB_A).await;

    // CLUB_B was never seen, so its association violates the foreign key
    // and the whole insert must roll back.
    let result = engine.add_quote("half done", &[CLUB_A, CLUB_B]).await;
    assert!(result.is_err());

    assert!(engine::quotes::Entity::find().all(&db).await.unwrap().is_empty());
    assert!(
        engine::chat_quotes::Entity::find()
            .all(&db)
            .await
            .unwrap()
            .is_empty()
    );
}
