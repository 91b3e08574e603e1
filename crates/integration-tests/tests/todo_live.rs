//! To-do API tests against a running server.
//!
//! Run with: cargo test -p tutorial-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use tutorial_integration_tests::{todo_base_url, unique_username};

async fn signup(client: &Client, username: &str) -> String {
    let resp = client
        .post(format!("{}/signup/", todo_base_url()))
        .json(&json!({"username": username, "password": "correct-horse"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.unwrap();
    body["token"].as_str().unwrap().to_owned()
}

#[tokio::test]
#[ignore = "Requires running to-do API server"]
async fn test_signup_login_and_todo_lifecycle() {
    let client = Client::new();
    let base_url = todo_base_url();
    let username = unique_username("live");
    let token = signup(&client, &username).await;

    let resp = client
        .post(format!("{base_url}/login/"))
        .json(&json!({"username": username, "password": "correct-horse"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let login: Value = resp.json().await.unwrap();
    assert_eq!(login["token"], token);

    let auth = format!("Token {token}");
    let created: Value = client
        .post(format!("{base_url}/todos/"))
        .header("Authorization", &auth)
        .json(&json!({"title": "water the plants", "important": true}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_i64().unwrap();

    let toggled: Value = client
        .put(format!("{base_url}/todos/{id}/complete"))
        .header("Authorization", &auth)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(toggled["completed"], true);

    let resp = client
        .delete(format!("{base_url}/todos/{id}"))
        .header("Authorization", &auth)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "Requires running to-do API server"]
async fn test_todos_are_private() {
    let client = Client::new();
    let base_url = todo_base_url();
    let alice = signup(&client, &unique_username("alice")).await;
    let bob = signup(&client, &unique_username("bob")).await;

    let created: Value = client
        .post(format!("{base_url}/todos/"))
        .header("Authorization", format!("Token {alice}"))
        .json(&json!({"title": "secret"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_i64().unwrap();

    let resp = client
        .get(format!("{base_url}/todos/{id}"))
        .header("Authorization", format!("Token {bob}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running to-do API server"]
async fn test_missing_token_is_unauthorized() {
    let resp = Client::new()
        .get(format!("{}/todos/", todo_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
