use chrono::Utc;
use sea_orm::{ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter};

use engine::{ChatEvent, ChatProfile, Engine, EngineError, NewMessage, UserProfile};
use migration::MigratorTrait;

const BOT_ID: i64 = 999;
const CLUB: i64 = -100_500;

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

fn user(id: i64, name: &str) -> UserProfile {
    UserProfile {
        user_id: id,
        first_name: name.to_string(),
        last_name: None,
        username: Some(format!("{name}_tg")),
    }
}

fn bot() -> UserProfile {
    user(BOT_ID, "quotelog")
}

fn group(chat_id: i64) -> ChatProfile {
    ChatProfile {
        chat_id,
        title: Some("club".to_string()),
    }
}

fn message(chat_id: i64, from: UserProfile, message_id: i64, text: &str) -> ChatEvent {
    ChatEvent::Message {
        chat: group(chat_id),
        from,
        message: NewMessage {
            message_id,
            sent_at: Utc::now(),
            content: Some(text.to_string()),
            forward_user_id: None,
            reply_message_id: None,
        },
    }
}

async fn member_row(db: &DatabaseConnection, user_id: i64, chat_id: i64) -> Option<engine::chat_members::Model> {
    engine::chat_members::Entity::find()
        .filter(engine::chat_members::Column::UserId.eq(user_id))
        .filter(engine::chat_members::Column::ChatId.eq(chat_id))
        .one(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn first_message_registers_user_chat_and_membership() {
    let (engine, db) = engine_with_db().await;

    engine
        .reconcile(&message(CLUB, user(1, "ada"), 10, "hello"))
        .await
        .unwrap();

    let stored = engine::users::Entity::find_by_id(1)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.first_name, "ada");
    assert!(!stored.is_admin);

    let chat = engine::chats::Entity::find_by_id(CLUB)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(chat.title.as_deref(), Some("club"));
    assert!(chat.is_active);

    let member = member_row(&db, 1, CLUB).await.unwrap();
    assert!(member.is_active);

    let messages = engine::messages::Entity::find().all(&db).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content.as_deref(), Some("hello"));
}

#[tokio::test]
async fn redelivered_message_appends_exactly_one_row() {
    let (engine, db) = engine_with_db().await;

    let event = message(CLUB, user(1, "ada"), 10, "hello");
    engine.reconcile(&event).await.unwrap();
    engine.reconcile(&event).await.unwrap();

    let messages = engine::messages::Entity::find().all(&db).await.unwrap();
    assert_eq!(messages.len(), 1);
}

#[tokio::test]
async fn direct_chat_events_write_no_rows() {
    let (engine, db) = engine_with_db().await;

    let direct = ChatProfile {
        chat_id: 42,
        title: None,
    };
    engine
        .reconcile(&ChatEvent::Message {
            chat: direct.clone(),
            from: user(1, "ada"),
            message: NewMessage {
                message_id: 1,
                sent_at: Utc::now(),
                content: Some("psst".to_string()),
                forward_user_id: None,
                reply_message_id: None,
            },
        })
        .await
        .unwrap();
    engine
        .reconcile(&ChatEvent::MemberJoined {
            chat: direct.clone(),
            actor: user(1, "ada"),
            joined: vec![user(2, "bob")],
        })
        .await
        .unwrap();
    engine
        .reconcile(&ChatEvent::MemberLeft {
            chat: direct,
            actor: user(1, "ada"),
            left: user(2, "bob"),
        })
        .await
        .unwrap();

    assert!(engine::users::Entity::find().all(&db).await.unwrap().is_empty());
    assert!(engine::chats::Entity::find().all(&db).await.unwrap().is_empty());
    assert!(
        engine::chat_members::Entity::find()
            .all(&db)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        engine::messages::Entity::find()
            .all(&db)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn join_leave_rejoin_cycles_membership_flag() {
    let (engine, db) = engine_with_db().await;

    engine
        .reconcile(&ChatEvent::MemberJoined {
            chat: group(CLUB),
            actor: user(1, "ada"),
            joined: vec![user(2, "bob")],
        })
        .await
        .unwrap();
    assert!(member_row(&db, 2, CLUB).await.unwrap().is_active);

    engine
        .reconcile(&ChatEvent::MemberLeft {
            chat: group(CLUB),
            actor: user(2, "bob"),
            left: user(2, "bob"),
        })
        .await
        .unwrap();
    let member = member_row(&db, 2, CLUB).await.unwrap();
    assert!(!member.is_active);
    // The user stays on record after leaving.
    assert!(
        engine::users::Entity::find_by_id(2)
            .one(&db)
            .await
            .unwrap()
            .is_some()
    );

    engine
        .reconcile(&ChatEvent::MemberJoined {
            chat: group(CLUB),
            actor: user(2, "bob"),
            joined: vec![user(2, "bob")],
        })
        .await
        .unwrap();
    assert!(member_row(&db, 2, CLUB).await.unwrap().is_active);
}

#[tokio::test]
async fn leave_for_unseen_user_creates_inactive_membership() {
    let (engine, db) = engine_with_db().await;

    engine
        .reconcile(&ChatEvent::MemberLeft {
            chat: group(CLUB),
            actor: user(1, "ada"),
            left: user(7, "ghost"),
        })
        .await
        .unwrap();

    let member = member_row(&db, 7, CLUB).await.unwrap();
    assert!(!member.is_active);
}

#[tokio::test]
async fn bot_join_and_leave_toggle_chat_active() {
    let (engine, db) = engine_with_db().await;

    engine
        .reconcile(&ChatEvent::MemberJoined {
            chat: group(CLUB),
            actor: user(1, "ada"),
            joined: vec![bot()],
        })
        .await
        .unwrap();

    let chat = engine::chats::Entity::find_by_id(CLUB)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(chat.is_active);
    // The bot itself never becomes a chat member.
    assert!(member_row(&db, BOT_ID, CLUB).await.is_none());

    engine
        .reconcile(&ChatEvent::MemberLeft {
            chat: group(CLUB),
            actor: user(1, "ada"),
            left: bot(),
        })
        .await
        .unwrap();

    let chat = engine::chats::Entity::find_by_id(CLUB)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(!chat.is_active);
}

#[tokio::test]
async fn bot_removal_from_unseen_chat_records_it_inactive() {
    let (engine, db) = engine_with_db().await;

    engine
        .reconcile(&ChatEvent::MemberLeft {
            chat: group(CLUB),
            actor: user(1, "ada"),
            left: bot(),
        })
        .await
        .unwrap();

    let chat = engine::chats::Entity::find_by_id(CLUB)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(!chat.is_active);
}

#[tokio::test]
async fn moderation_flags_update_existing_users_only() {
    let (engine, db) = engine_with_db().await;

    engine
        .reconcile(&message(CLUB, user(1, "ada"), 10, "hello"))
        .await
        .unwrap();

    engine.set_user_admin(1, true).await.unwrap();
    engine.set_user_muted(1, true).await.unwrap();

    let stored = engine::users::Entity::find_by_id(1)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.is_admin);
    assert!(stored.is_muted);

    let missing = engine.set_user_admin(404, true).await;
    assert_eq!(missing, Err(EngineError::KeyNotFound("404".to_string())));
}
