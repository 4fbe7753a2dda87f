//! Integration tests for store management

mod common;

use common::MockConnection;
use deltastream_sdk::models::{KafkaAuth, StoreCreateParams, StoreType, StoreUpdateParams};
use deltastream_sdk::resources::StoreManager;
use deltastream_sdk::SdkError;
use serde_json::json;

fn describe_store(conn: &MockConnection, name: &str, store_type: &str) {
    conn.push_describe(&[
        ("Name", name),
        ("Type", store_type),
        ("Status", "ready"),
        ("Uris", "localhost:9092"),
    ]);
}

mod create_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_kafka_store_with_sasl() {
        let conn = MockConnection::new();
        describe_store(&conn, "kafka_store", "KAFKA");
        let stores = StoreManager::new(conn.clone());

        let auth = KafkaAuth::Plain {
            username: "user".into(),
            password: "pass".into(),
        };
        let store = stores
            .create_kafka_store("kafka_store", "localhost:9092", auth, Some("registry"))
            .await
            .unwrap();

        assert_eq!(
            conn.statements(),
            vec![
                "CREATE STORE \"kafka_store\" WITH ('type' = KAFKA, 'uris' = 'localhost:9092', \
                 'kafka.sasl.hash_function' = PLAIN, 'kafka.sasl.username' = 'user', \
                 'kafka.sasl.password' = 'pass', 'schema_registry.name' = 'registry');",
                "DESCRIBE STORE \"kafka_store\";",
            ]
        );
        assert_eq!(store.store_type.as_deref(), Some("KAFKA"));
        assert_eq!(store.status.as_deref(), Some("ready"));
        assert_eq!(store.get("uris"), Some(&json!("localhost:9092")));
    }

    #[tokio::test]
    async fn test_create_kinesis_store_with_access_keys() {
        let conn = MockConnection::new();
        describe_store(&conn, "kinesis_store", "KINESIS");
        let stores = StoreManager::new(conn.clone());

        stores
            .create_kinesis_store(
                "kinesis_store",
                "https://kinesis.us-east-1.amazonaws.com",
                Some(("AKIA123", "secret")),
                None,
            )
            .await
            .unwrap();

        assert_eq!(
            conn.statements()[0],
            "CREATE STORE \"kinesis_store\" WITH ('type' = KINESIS, \
             'uris' = 'https://kinesis.us-east-1.amazonaws.com', \
             'kinesis.access_key_id' = 'AKIA123', 'kinesis.secret_access_key' = 'secret');"
        );
    }

    #[tokio::test]
    async fn test_create_s3_store_with_iam_role() {
        let conn = MockConnection::new();
        describe_store(&conn, "s3_store", "S3");
        let stores = StoreManager::new(conn.clone());

        stores
            .create_s3_store(
                "s3_store",
                "https://my-bucket.s3.amazonaws.com/",
                None,
                Some(("arn:aws:iam::123456789012:role/reader", "ext-id")),
            )
            .await
            .unwrap();

        assert_eq!(
            conn.statements()[0],
            "CREATE STORE \"s3_store\" WITH ('type' = S3, 'uris' = 'https://my-bucket.s3.amazonaws.com/', \
             'aws.iam_role_arn' = 'arn:aws:iam::123456789012:role/reader', 'aws.iam_external_id' = 'ext-id');"
        );
    }

    /// TLS flags are keywords and render uppercase without quotes
    #[tokio::test]
    async fn test_create_store_with_tls_flags() {
        let conn = MockConnection::new();
        describe_store(&conn, "secure", "KAFKA");
        let stores = StoreManager::new(conn.clone());

        let params = StoreCreateParams::kafka("secure", "broker:9093")
            .tls_disabled(false)
            .tls_verify_server_hostname(true)
            .tls_ca_cert_file("/certs/ca.pem")
            .comment("prod cluster");
        stores.create(params).await.unwrap();

        assert_eq!(
            conn.statements()[0],
            "CREATE STORE \"secure\" WITH ('type' = KAFKA, 'uris' = 'broker:9093', \
             'tls.disabled' = FALSE, 'tls.verify_server_hostname' = TRUE, \
             'tls.ca_cert_file' = '/certs/ca.pem') COMMENT 'prod cluster';"
        );
    }

    #[tokio::test]
    async fn test_create_store_missing_required_parameters() {
        let conn = MockConnection::new();
        let stores = StoreManager::new(conn.clone());

        let params = StoreCreateParams::kafka("kafka_store", "localhost:9092")
            .param("kafka.sasl.hash_function", "SHA512");
        let err = stores.create(params).await.unwrap_err();

        match &err {
            SdkError::InvalidConfiguration(message) => {
                assert!(message.contains("kafka.sasl.username"));
                assert!(message.contains("kafka.sasl.password"));
            }
            other => panic!("expected invalid configuration, got {:?}", other),
        }
        assert!(conn.statements().is_empty());
    }

    #[tokio::test]
    async fn test_properties_file_skips_validation() {
        let conn = MockConnection::new();
        describe_store(&conn, "sf", "SNOWFLAKE");
        let stores = StoreManager::new(conn.clone());

        let params = StoreCreateParams::new("sf", "snowflake").properties_file("@/stores/sf.properties");
        stores.create(params).await.unwrap();

        assert_eq!(
            conn.statements()[0],
            "CREATE STORE \"sf\" WITH ('type' = SNOWFLAKE, 'properties.file' = '@/stores/sf.properties');"
        );
    }

    #[tokio::test]
    async fn test_create_existing_store_fails_without_read_back() {
        let conn = MockConnection::new();
        conn.fail_exec_at(0, "store kafka_store already exists");
        let stores = StoreManager::new(conn.clone());

        let err = stores
            .create(StoreCreateParams::kafka("kafka_store", "localhost:9092"))
            .await
            .unwrap_err();

        assert!(matches!(err, SdkError::ResourceAlreadyExists { .. }));
        assert_eq!(conn.statements().len(), 1);
    }
}

mod query_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_by_type() {
        let conn = MockConnection::new();
        conn.push_rows(
            &["Name", "Type", "Is Default"],
            vec![vec![json!("kafka_store"), json!("KAFKA"), json!(true)]],
        );
        let stores = StoreManager::new(conn.clone());

        let listed = stores.list_by_type(&StoreType::Kafka).await.unwrap();

        assert_eq!(conn.statements(), vec!["LIST STORES WHERE type = 'KAFKA';"]);
        assert_eq!(listed[0].name, "kafka_store");
        assert_eq!(listed[0].is_default, Some(true));
    }

    #[tokio::test]
    async fn test_test_connection_returns_first_row() {
        let conn = MockConnection::new();
        conn.push_rows(
            &["status", "message"],
            vec![vec![json!("success"), json!("Connection successful")]],
        );
        let stores = StoreManager::new(conn.clone());

        let result = stores.test_connection("test_store").await.unwrap();

        assert_eq!(conn.statements(), vec!["TEST STORE \"test_store\";"]);
        assert_eq!(result["status"], "success");
        assert_eq!(result["message"], "Connection successful");
    }

    #[tokio::test]
    async fn test_test_connection_without_rows_is_unknown() {
        let conn = MockConnection::new();
        let stores = StoreManager::new(conn.clone());

        let result = stores.test_connection("test_store").await.unwrap();

        assert_eq!(result["status"], "unknown");
    }

    #[tokio::test]
    async fn test_get_topics() {
        let conn = MockConnection::new();
        conn.push_rows(
            &["Topic Name", "Partitions"],
            vec![
                vec![json!("topic1"), json!(3)],
                vec![json!("topic2"), json!(1)],
            ],
        );
        conn.push_names(&["topic3"]);
        let stores = StoreManager::new(conn.clone());

        assert_eq!(
            stores.get_topics("kafka_store").await.unwrap(),
            vec!["topic1", "topic2"]
        );
        assert_eq!(stores.get_topics("kafka_store").await.unwrap(), vec!["topic3"]);
        assert_eq!(
            conn.statements()[0],
            "LIST TOPICS FROM STORE \"kafka_store\";"
        );
    }

    #[tokio::test]
    async fn test_update_store_then_comment() {
        let conn = MockConnection::new();
        describe_store(&conn, "kafka_store", "KAFKA");
        let stores = StoreManager::new(conn.clone());

        let params = StoreUpdateParams::new()
            .param("uris", "broker2:9092")
            .comment("moved");
        stores.update("kafka_store", params).await.unwrap();

        assert_eq!(
            conn.statements(),
            vec![
                "UPDATE STORE \"kafka_store\" WITH ('uris' = 'broker2:9092');",
                "ALTER STORE \"kafka_store\" SET COMMENT 'moved';",
                "DESCRIBE STORE \"kafka_store\";",
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_store() {
        let conn = MockConnection::new();
        let stores = StoreManager::new(conn.clone());

        stores.delete("kafka_store").await.unwrap();

        assert_eq!(conn.statements(), vec!["DROP STORE \"kafka_store\";"]);
    }
}
