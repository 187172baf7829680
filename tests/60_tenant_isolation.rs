mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::id_of;

#[tokio::test]
async fn rows_of_another_agent_are_invisible() -> Result<()> {
    let server = common::TestServer::start().await?;
    let owner = server.agent("Owner");
    let intruder = server.agent("Intruder");

    let client = owner.create_client("Jane Doe").await?;
    let request = owner.create_request(&id_of(&client)).await?;
    let testimonial = owner.create_testimonial(&id_of(&client), 5).await?;

    for path in ["/api/clients", "/api/review-requests", "/api/testimonials"] {
        let list: Vec<Value> = intruder.get(path).send().await?.json().await?;
        assert!(list.is_empty(), "{} leaked rows", path);
    }

    let single = [
        format!("/api/clients/{}", id_of(&client)),
        format!("/api/review-requests/{}", id_of(&request)),
        format!("/api/testimonials/{}", id_of(&testimonial)),
    ];
    for path in &single {
        let res = intruder.get(path).send().await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{}", path);
    }
    Ok(())
}

#[tokio::test]
async fn mutations_on_foreign_rows_are_not_found() -> Result<()> {
    let server = common::TestServer::start().await?;
    let owner = server.agent("Owner");
    let intruder = server.agent("Intruder");

    let client = owner.create_client("Jane Doe").await?;
    let request = owner.create_request(&id_of(&client)).await?;
    let client_path = format!("/api/clients/{}", id_of(&client));
    let status_path = format!("/api/review-requests/{}/status", id_of(&request));

    let res = intruder.put(&client_path, &json!({"name": "Hijacked"})).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = intruder.put(&status_path, &json!({"status": "completed"})).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = intruder.delete(&client_path).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let untouched: Value = owner.get(&client_path).send().await?.json().await?;
    assert_eq!(untouched["name"], json!("Jane Doe"));
    let untouched: Value = owner
        .get(&format!("/api/review-requests/{}", id_of(&request)))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(untouched["status"], json!("pending"));
    Ok(())
}

#[tokio::test]
async fn foreign_references_are_rejected() -> Result<()> {
    let server = common::TestServer::start().await?;
    let owner = server.agent("Owner");
    let intruder = server.agent("Intruder");

    let client = owner.create_client("Jane Doe").await?;
    let request = owner.create_request(&id_of(&client)).await?;

    let res = intruder
        .post("/api/review-requests", &json!({"clientId": id_of(&client), "message": "Hi"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["errors"][0]["path"], json!(["clientId"]));

    let res = intruder
        .post(
            "/api/testimonials",
            &json!({"clientId": id_of(&client), "content": "Fake praise", "rating": 5}),
        )
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let own_client = intruder.create_client("John Roe").await?;
    let res = intruder
        .post(
            "/api/testimonials",
            &json!({
                "clientId": id_of(&own_client),
                "requestId": id_of(&request),
                "content": "Borrowed request",
                "rating": 5
            }),
        )
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["errors"][0]["path"], json!(["requestId"]));

    let stats: Value = owner.get("/api/dashboard/stats").send().await?.json().await?;
    assert_eq!(stats["reviewsReceived"], json!(0));
    assert_eq!(stats["pendingRequests"], json!(1));
    Ok(())
}
