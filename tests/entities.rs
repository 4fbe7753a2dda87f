//! Integration tests for entity management and record insertion

mod common;

use common::MockConnection;
use deltastream_sdk::models::{EntityCreateParams, EntityUpdateParams};
use deltastream_sdk::resources::EntityManager;
use deltastream_sdk::{SdkError, WithClause};
use serde_json::json;

#[tokio::test]
async fn test_create_entity_in_store_with_params() {
    let conn = MockConnection::new();
    conn.push_describe(&[("Name", "topic1"), ("Is Leaf", "true"), ("Partitions", "3")]);
    let entities = EntityManager::new(conn.clone());

    let params = EntityCreateParams::new("topic1")
        .in_store("kafka_store")
        .param("topic.partitions", 3)
        .param("topic.replicas", 1);
    let entity = entities.create(params).await.unwrap();

    assert_eq!(
        conn.statements(),
        vec![
            "CREATE ENTITY \"topic1\" IN STORE \"kafka_store\" WITH ('topic.partitions' = '3', 'topic.replicas' = '1');",
            "DESCRIBE ENTITY \"topic1\" IN STORE \"kafka_store\";",
        ]
    );
    assert_eq!(entity.name, "topic1");
    assert_eq!(entity.is_leaf, Some(true));
    assert_eq!(entity.parameters.get("Partitions"), Some(&json!("3")));
}

/// Dotted names address nested entities and are quoted as one identifier
#[tokio::test]
async fn test_create_entity_with_dotted_name() {
    let conn = MockConnection::new();
    conn.push_describe(&[("Name", "DELTA_STREAMING.MY_SCHEMA")]);
    let entities = EntityManager::new(conn.clone());

    entities
        .create(EntityCreateParams::new("DELTA_STREAMING.MY_SCHEMA"))
        .await
        .unwrap();

    assert_eq!(
        conn.statements(),
        vec![
            "CREATE ENTITY \"DELTA_STREAMING.MY_SCHEMA\";",
            "DESCRIBE ENTITY \"DELTA_STREAMING.MY_SCHEMA\";",
        ]
    );
}

#[tokio::test]
async fn test_create_entity_escapes_quotes() {
    let conn = MockConnection::new();
    conn.push_describe(&[("Name", "odd\"name")]);
    let entities = EntityManager::new(conn.clone());

    let params = EntityCreateParams::new("odd\"name")
        .in_store("my\"store")
        .param("note", "it's");
    entities.create(params).await.unwrap();

    assert_eq!(
        conn.statements()[0],
        "CREATE ENTITY \"odd\"\"name\" IN STORE \"my\"\"store\" WITH ('note' = 'it''s');"
    );
}

#[tokio::test]
async fn test_create_entity_with_comment() {
    let conn = MockConnection::new();
    conn.push_describe(&[("Name", "topic1"), ("Comment", "click stream's raw topic")]);
    let entities = EntityManager::new(conn.clone());

    let params = EntityCreateParams::new("topic1")
        .in_store("kafka_store")
        .param("topic.partitions", 1)
        .comment("click stream's raw topic");
    let entity = entities.create(params).await.unwrap();

    assert_eq!(
        conn.statements()[0],
        "CREATE ENTITY \"topic1\" IN STORE \"kafka_store\" WITH ('topic.partitions' = '1') COMMENT 'click stream''s raw topic';"
    );
    assert_eq!(entity.comment.as_deref(), Some("click stream's raw topic"));
}

#[tokio::test]
async fn test_list_entities_in_store() {
    let conn = MockConnection::new();
    conn.push_rows(
        &["Name", "Is Leaf"],
        vec![
            vec![json!("topic1"), json!(true)],
            vec![json!("DB"), json!(false)],
        ],
    );
    conn.push_names(&["session_topic"]);
    let entities = EntityManager::new(conn.clone());

    let listed = entities.list_in_store(Some("kafka_store")).await.unwrap();
    let session = entities.list_in_store(None).await.unwrap();

    assert_eq!(
        conn.statements(),
        vec!["LIST ENTITIES IN STORE \"kafka_store\";", "LIST ENTITIES;"]
    );
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[1].is_leaf, Some(false));
    assert_eq!(session[0].name, "session_topic");
}

#[tokio::test]
async fn test_get_missing_entity_is_not_found() {
    let conn = MockConnection::new();
    let entities = EntityManager::new(conn.clone());

    let err = entities
        .get_in_store("ghost", Some("kafka_store"))
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::ResourceNotFound { .. }));
    assert!(err.to_string().contains("ghost"));
}

#[tokio::test]
async fn test_update_entity() {
    let conn = MockConnection::new();
    conn.push_describe(&[("Name", "topic1")]);
    let entities = EntityManager::new(conn.clone());

    let params = EntityUpdateParams::new()
        .in_store("kafka_store")
        .param("kafka.topic.retention.ms", 86_400_000);
    entities.update("topic1", params).await.unwrap();

    assert_eq!(
        conn.statements()[0],
        "UPDATE ENTITY \"topic1\" IN STORE \"kafka_store\" WITH ('kafka.topic.retention.ms' = '86400000');"
    );
}

#[tokio::test]
async fn test_update_entity_without_params_sends_nothing() {
    let conn = MockConnection::new();
    let entities = EntityManager::new(conn.clone());

    let err = entities
        .update("topic1", EntityUpdateParams::new().in_store("kafka_store"))
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::InvalidConfiguration(_)));
    assert!(conn.statements().is_empty());
}

#[tokio::test]
async fn test_delete_entity_in_store() {
    let conn = MockConnection::new();
    let entities = EntityManager::new(conn.clone());

    entities
        .delete_in_store("topic1", Some("kafka_store"))
        .await
        .unwrap();

    assert_eq!(
        conn.statements(),
        vec!["DROP ENTITY \"topic1\" IN STORE \"kafka_store\";"]
    );
}

/// One statement per value, in input order
#[tokio::test]
async fn test_insert_values() {
    let conn = MockConnection::new();
    let entities = EntityManager::new(conn.clone());

    let values = [
        json!({"pageId": 10, "pageviews": 123}),
        json!({"pageId": 11, "pageviews": 7}),
    ];
    entities
        .insert_values("pageviews", &values, "kafka_store", &WithClause::new())
        .await
        .unwrap();

    assert_eq!(
        conn.statements(),
        vec![
            r#"INSERT INTO ENTITY "pageviews" IN STORE "kafka_store" VALUE('{"pageId": 10, "pageviews": 123}');"#,
            r#"INSERT INTO ENTITY "pageviews" IN STORE "kafka_store" VALUE('{"pageId": 11, "pageviews": 7}');"#,
        ]
    );
}

#[tokio::test]
async fn test_insert_values_with_clause_and_raw_json() {
    let conn = MockConnection::new();
    let entities = EntityManager::new(conn.clone());

    let values = [json!(r#"{"user": "O'Brien"}"#)];
    let clause = WithClause::new().with("key.format", "JSON");
    entities
        .insert_values("users", &values, "kafka_store", &clause)
        .await
        .unwrap();

    assert_eq!(
        conn.last_statement().unwrap(),
        r#"INSERT INTO ENTITY "users" IN STORE "kafka_store" VALUE('{"user": "O''Brien"}') WITH ('key.format' = 'JSON');"#
    );
}

#[tokio::test]
async fn test_insert_values_stops_at_first_failure() {
    let conn = MockConnection::new();
    conn.fail_exec_at(1, "serialization failed");
    let entities = EntityManager::new(conn.clone());

    let values = [json!({"n": 1}), json!({"n": 2}), json!({"n": 3})];
    let err = entities
        .insert_values("numbers", &values, "kafka_store", &WithClause::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::Sql { .. }));
    assert_eq!(conn.statements().len(), 2);
    assert!(conn.statements()[1].contains(r#"{"n": 2}"#));
}
