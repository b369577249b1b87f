//! End-to-end turn pipeline tests: scripted model output flows through
//! retrieval, interpretation, and dispatch against a real store.

use std::sync::Arc;
use stockchat_agent::test_helpers::ScriptedProvider;
use stockchat_agent::ChatTurn;
use stockchat_core::item::InventoryStore;
use stockchat_retrieval::{default_schema_docs, SchemaIndex};
use stockchat_store::{seed_sample_items, InMemoryStore, SqliteStore};

fn pipeline(responses: Vec<&str>, store: Arc<dyn InventoryStore>) -> ChatTurn {
    let provider = Arc::new(ScriptedProvider::new(
        responses.into_iter().map(String::from).collect(),
    ));
    let retriever = Arc::new(SchemaIndex::new(default_schema_docs()));
    ChatTurn::new(provider, retriever, store, "scripted-model")
}

#[tokio::test]
async fn add_item_flows_to_store() {
    let store = Arc::new(InMemoryStore::new());
    let turn = pipeline(
        vec![r#"ACTION: add_item {"name": "Keyboard", "description": "Mechanical", "quantity": 3, "category": "Electronics"}"#],
        store.clone(),
    );

    let reply = turn.run("add 3 mechanical keyboards").await.unwrap();
    assert_eq!(reply, "Added item: Keyboard");

    let items = store.list_items(None).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Keyboard");
    assert_eq!(items[0].quantity, 3);
}

#[tokio::test]
async fn list_items_shows_seeded_inventory() {
    let store = Arc::new(InMemoryStore::new());
    seed_sample_items(store.as_ref()).await.unwrap();

    let turn = pipeline(vec!["ACTION: list_items {}"], store);
    let reply = turn.run("what do we have in stock?").await.unwrap();

    let lines: Vec<&str> = reply.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "1: Laptop (5) - Gaming laptop");
    assert_eq!(lines[3], "4: Notebook (20) - Spiral notebook");
}

#[tokio::test]
async fn list_items_filters_by_category() {
    let store = Arc::new(InMemoryStore::new());
    seed_sample_items(store.as_ref()).await.unwrap();

    let turn = pipeline(
        vec![r#"ACTION: list_items {"category": "Electronics"}"#],
        store,
    );
    let reply = turn.run("show electronics").await.unwrap();

    assert!(reply.contains("Laptop"));
    assert!(reply.contains("Mouse"));
    assert!(!reply.contains("Book"));
}

#[tokio::test]
async fn update_quantity_hit_and_miss() {
    let store = Arc::new(InMemoryStore::new());
    seed_sample_items(store.as_ref()).await.unwrap();

    let hit = pipeline(
        vec![r#"ACTION: update_quantity {"item_id": 2, "new_quantity": 7}"#],
        store.clone(),
    );
    let reply = hit.run("set books to 7").await.unwrap();
    assert_eq!(reply, "Updated Book quantity to 7");
    assert_eq!(
        store.find_item_by_id(2).await.unwrap().unwrap().quantity,
        7
    );

    let miss = pipeline(
        vec![r#"ACTION: update_quantity {"item_id": 999, "new_quantity": 1}"#],
        store,
    );
    assert_eq!(miss.run("set item 999 to 1").await.unwrap(), "Item not found");
}

#[tokio::test]
async fn direct_answer_leaves_store_untouched() {
    let store = Arc::new(InMemoryStore::new());
    let turn = pipeline(
        vec!["ANSWER: The items table has id, name, description, quantity, and category columns."],
        store.clone(),
    );

    let reply = turn.run("what columns are there?").await.unwrap();
    assert!(reply.starts_with("The items table"));
    assert!(store.list_items(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_params_report_invalid_without_mutation() {
    let store = Arc::new(InMemoryStore::new());
    let turn = pipeline(
        vec![r#"ACTION: add_item {"name": "Laptop", "quantity":"#],
        store.clone(),
    );

    let reply = turn.run("add a laptop").await.unwrap();
    assert_eq!(reply, "add_item: invalid parameters");
    assert!(store.list_items(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn action_token_in_prose_without_params_reports_missing() {
    let store = Arc::new(InMemoryStore::new());
    let turn = pipeline(
        vec!["Sure! I would use add_item to do that for you."],
        store.clone(),
    );

    let reply = turn.run("add something").await.unwrap();
    assert_eq!(reply, "add_item: missing parameters: name");
    assert!(store.list_items(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn chatty_output_passes_through_verbatim() {
    let store = Arc::new(InMemoryStore::new());
    let turn = pipeline(
        vec!["I'm not sure what you mean, could you rephrase?"],
        store,
    );

    let reply = turn.run("mumble").await.unwrap();
    assert_eq!(reply, "I'm not sure what you mean, could you rephrase?");
}

#[tokio::test]
async fn multi_turn_session_against_sqlite() {
    let store = Arc::new(SqliteStore::new("sqlite::memory:").await.unwrap());
    seed_sample_items(store.as_ref()).await.unwrap();

    let provider = Arc::new(ScriptedProvider::new(vec![
        r#"ACTION: add_item {"name": "Cable", "quantity": 30, "category": "Electronics"}"#.into(),
        r#"ACTION: update_quantity {"item_id": 5, "new_quantity": 25}"#.into(),
        "ACTION: list_items {}".into(),
    ]));
    let retriever = Arc::new(SchemaIndex::new(default_schema_docs()));
    let turn = ChatTurn::new(provider, retriever, store.clone(), "scripted-model");

    assert_eq!(turn.run("add 30 cables").await.unwrap(), "Added item: Cable");
    assert_eq!(
        turn.run("actually 25 cables").await.unwrap(),
        "Updated Cable quantity to 25"
    );

    let listing = turn.run("list everything").await.unwrap();
    assert_eq!(listing.lines().count(), 5);
    assert!(listing.contains("5: Cable (25)"));
}
