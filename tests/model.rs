//! Integration tests against a live MongoDB instance.
//!
//! The suite is driven by two environment variables, `MONGODB_URI` and
//! `DATABASE_NAME`. When either is unset the tests return early instead of
//! failing, so the suite is safe to run without a database available.
//!
//! Each test works in its own collection and drops it up front, so tests do
//! not interfere with each other or with leftovers from earlier runs.

use bson::{Document, doc};
use docmodel::{Connection, Connector, Model};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct User {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    email: String,
    age: i32,
    position: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Employee {
    first_name: String,
    position: String,
}

fn user(id: &str, name: &str, age: i32, position: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@test.com", name.to_lowercase()),
        age,
        position: position.to_string(),
    }
}

/// Connects using the env-provided target, or returns `None` to skip.
async fn connect() -> Option<Connection> {
    let uri = std::env::var("MONGODB_URI").ok()?;
    let database = std::env::var("DATABASE_NAME").ok()?;

    let conn = Connector::new(uri, database)
        .connect()
        .await
        .expect("failed to connect");
    Some(conn)
}

/// Fresh model bound to a dropped collection.
async fn fresh_model(conn: &Connection, collection: &str) -> Model<User, Employee> {
    conn.database()
        .collection::<Document>(collection)
        .drop()
        .await
        .expect("failed to drop collection");
    Model::new(conn.database(), collection)
}

#[tokio::test]
async fn crud_and_aggregation_round_trip() {
    let Some(conn) = connect().await else {
        eprintln!("skipping: MONGODB_URI and DATABASE_NAME not set");
        return;
    };
    let model = fresh_model(&conn, "docmodel_users").await;

    model
        .create(&user("1", "Alice", 30, "Dev"))
        .await
        .expect("create Alice");
    model
        .create(&user("2", "Bob", 35, "QA"))
        .await
        .expect("create Bob");

    let users = model.find_many(doc! {}, None).await.expect("find_many");
    assert_eq!(users.len(), 2);

    let alice = model
        .find_one(doc! { "name": "Alice" }, None)
        .await
        .expect("find_one Alice");
    assert_eq!(alice, user("1", "Alice", 30, "Dev"));

    model
        .update_one(
            doc! { "name": "Alice" },
            doc! { "$set": { "age": 31 } },
            None,
        )
        .await
        .expect("update_one");
    let alice = model
        .find_one(doc! { "name": "Alice" }, None)
        .await
        .expect("find_one after update");
    assert_eq!(alice.age, 31);

    let employees = model
        .aggregate(vec![doc! { "$project": {
            "first_name": "$name",
            "position": 1,
        } }])
        .await
        .expect("aggregate");
    assert_eq!(employees.len(), 2);
    assert!(employees.iter().any(|e| e.first_name == "Alice"));
    assert!(employees.iter().any(|e| e.position == "QA"));

    model
        .delete_one(doc! { "name": "Alice" })
        .await
        .expect("delete_one");
    let users = model.find_many(doc! {}, None).await.expect("find_many");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Bob");

    conn.shutdown().await;
}

#[tokio::test]
async fn find_many_on_empty_collection_is_an_empty_success() {
    let Some(conn) = connect().await else {
        eprintln!("skipping: MONGODB_URI and DATABASE_NAME not set");
        return;
    };
    let model = fresh_model(&conn, "docmodel_empty_find").await;

    let users = model.find_many(doc! {}, None).await.expect("find_many");
    assert!(users.is_empty());

    conn.shutdown().await;
}

#[tokio::test]
async fn find_one_on_empty_collection_is_not_found() {
    let Some(conn) = connect().await else {
        eprintln!("skipping: MONGODB_URI and DATABASE_NAME not set");
        return;
    };
    let model = fresh_model(&conn, "docmodel_empty_find_one").await;

    let err = model
        .find_one(doc! { "name": "Nobody" }, None)
        .await
        .expect_err("expected not found");
    assert!(err.is_not_found(), "unexpected error: {err}");

    conn.shutdown().await;
}

#[tokio::test]
async fn aggregate_with_zero_rows_is_empty_result() {
    let Some(conn) = connect().await else {
        eprintln!("skipping: MONGODB_URI and DATABASE_NAME not set");
        return;
    };
    let model = fresh_model(&conn, "docmodel_empty_aggregate").await;

    model
        .create(&user("1", "Alice", 30, "Dev"))
        .await
        .expect("create");

    let err = model
        .aggregate(vec![doc! { "$match": { "name": "Nobody" } }])
        .await
        .expect_err("expected empty result");
    assert!(err.is_empty_result(), "unexpected error: {err}");

    conn.shutdown().await;
}

#[tokio::test]
async fn duplicate_key_insert_is_a_conflict() {
    let Some(conn) = connect().await else {
        eprintln!("skipping: MONGODB_URI and DATABASE_NAME not set");
        return;
    };
    let model = fresh_model(&conn, "docmodel_conflict").await;

    model
        .create(&user("1", "Alice", 30, "Dev"))
        .await
        .expect("first create");
    let err = model
        .create(&user("1", "Alice", 30, "Dev"))
        .await
        .expect_err("expected conflict");
    assert!(err.is_conflict(), "unexpected error: {err}");

    conn.shutdown().await;
}

#[tokio::test]
async fn update_many_touches_exactly_the_matching_set() {
    let Some(conn) = connect().await else {
        eprintln!("skipping: MONGODB_URI and DATABASE_NAME not set");
        return;
    };
    let model = fresh_model(&conn, "docmodel_update_many").await;

    model
        .create(&user("1", "Alice", 30, "QA"))
        .await
        .expect("create Alice");
    model
        .create(&user("2", "Bob", 35, "QA"))
        .await
        .expect("create Bob");
    model
        .create(&user("3", "Carol", 40, "Dev"))
        .await
        .expect("create Carol");

    model
        .update_many(
            doc! { "position": "QA" },
            doc! { "$set": { "position": "Tester" } },
            None,
        )
        .await
        .expect("update_many");

    let testers = model
        .find_many(doc! { "position": "Tester" }, None)
        .await
        .expect("find testers");
    assert_eq!(testers.len(), 2);

    let carol = model
        .find_one(doc! { "name": "Carol" }, None)
        .await
        .expect("find Carol");
    assert_eq!(carol.position, "Dev");

    conn.shutdown().await;
}

#[tokio::test]
async fn update_with_zero_matches_still_succeeds() {
    let Some(conn) = connect().await else {
        eprintln!("skipping: MONGODB_URI and DATABASE_NAME not set");
        return;
    };
    let model = fresh_model(&conn, "docmodel_update_miss").await;

    model
        .update_one(
            doc! { "name": "Nobody" },
            doc! { "$set": { "age": 1 } },
            None,
        )
        .await
        .expect("update_one on zero matches");
    model
        .delete_many(doc! { "name": "Nobody" })
        .await
        .expect("delete_many on zero matches");

    conn.shutdown().await;
}

#[tokio::test]
async fn delete_many_with_match_all_filter_empties_the_collection() {
    let Some(conn) = connect().await else {
        eprintln!("skipping: MONGODB_URI and DATABASE_NAME not set");
        return;
    };
    let model = fresh_model(&conn, "docmodel_delete_many").await;

    model
        .create(&user("1", "Alice", 30, "Dev"))
        .await
        .expect("create Alice");
    model
        .create(&user("2", "Bob", 35, "QA"))
        .await
        .expect("create Bob");

    model.delete_many(doc! {}).await.expect("delete_many");

    let users = model.find_many(doc! {}, None).await.expect("find_many");
    assert!(users.is_empty());

    conn.shutdown().await;
}

#[tokio::test]
async fn find_many_honors_per_call_options() {
    let Some(conn) = connect().await else {
        eprintln!("skipping: MONGODB_URI and DATABASE_NAME not set");
        return;
    };
    let model = fresh_model(&conn, "docmodel_find_options").await;

    model
        .create(&user("1", "Alice", 30, "Dev"))
        .await
        .expect("create Alice");
    model
        .create(&user("2", "Bob", 35, "QA"))
        .await
        .expect("create Bob");
    model
        .create(&user("3", "Carol", 40, "Dev"))
        .await
        .expect("create Carol");

    let options = docmodel::FindOptions::default()
        .sort(doc! { "age": -1 })
        .limit(2);
    let users = model
        .find_many(doc! {}, Some(options))
        .await
        .expect("find_many with options");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].name, "Carol");
    assert_eq!(users[1].name, "Bob");

    conn.shutdown().await;
}

#[tokio::test]
async fn ping_reports_a_reachable_server() {
    let Some(conn) = connect().await else {
        eprintln!("skipping: MONGODB_URI and DATABASE_NAME not set");
        return;
    };

    conn.ping().await.expect("ping");
    conn.shutdown().await;
}
