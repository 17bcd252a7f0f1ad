mod common;

use std::net::TcpListener;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{rt, test, App, HttpServer};
use chrono::{Duration, Utc};
use common::{bearer, login, seeded_state, send, ADMIN, USER};
use pretty_assertions::assert_eq;
use serde_json::json;
use task_manager::routes;

#[test_log::test(actix_rt::test)]
async fn test_task_lifecycle() {
    let state = seeded_state().await;
    let admin = login(&state, ADMIN).await;
    let app = test::init_service(App::new().configure(routes::config(state))).await;

    let req = test::TestRequest::post()
        .uri("/tasks")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "title": "Pay bills",
            "duedate": Utc::now() + Duration::days(1),
            "status": "Pending"
        }))
        .to_request();
    let (status, created) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED, "Create failed. Body: {}", created);
    assert_eq!(created["title"], "Pay bills");
    assert_eq!(created["description"], "");
    let id = created["id"].as_str().unwrap().to_string();
    let task_url = format!("/tasks/{}", id);

    let req = test::TestRequest::put()
        .uri(&task_url)
        .insert_header(bearer(&admin))
        .set_json(json!({ "status": "Done" }))
        .to_request();
    let (status, updated) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Done");
    assert_eq!(updated["title"], "Pay bills");

    // Done is terminal
    let req = test::TestRequest::put()
        .uri(&task_url)
        .insert_header(bearer(&admin))
        .set_json(json!({ "status": "Pending" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "validation failed: cannot change status of a completed task"
    );

    let req = test::TestRequest::delete()
        .uri(&task_url)
        .insert_header(bearer(&admin))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let req = test::TestRequest::get()
        .uri(&task_url)
        .insert_header(bearer(&admin))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "task not found");
}

#[actix_rt::test]
async fn test_create_task_validation() {
    let state = seeded_state().await;
    let admin = login(&state, ADMIN).await;
    let app = test::init_service(App::new().configure(routes::config(state))).await;

    let yesterday = Utc::now() - Duration::days(1);
    let cases = [
        (
            json!({ "title": "", "duedate": Utc::now() + Duration::days(1), "status": "Pending" }),
            "validation failed: task title cannot be empty",
        ),
        (
            json!({ "title": "No date", "status": "Pending" }),
            "validation failed: task due date cannot be empty",
        ),
        (
            json!({ "title": "Late", "duedate": yesterday, "status": "Pending" }),
            "validation failed: task due date cannot be in the past",
        ),
    ];
    for (payload, message) in cases {
        let req = test::TestRequest::post()
            .uri("/tasks")
            .insert_header(bearer(&admin))
            .set_json(&payload)
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], message);
    }

    // Unknown status never reaches the domain
    let req = test::TestRequest::post()
        .uri("/tasks")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "title": "Pay bills",
            "duedate": Utc::now() + Duration::days(1),
            "status": "Archived"
        }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header(bearer(&admin))
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body, json!([]));
}

#[actix_rt::test]
async fn test_malformed_and_unknown_ids() {
    let state = seeded_state().await;
    let admin = login(&state, ADMIN).await;
    let user = login(&state, USER).await;
    let app = test::init_service(App::new().configure(routes::config(state))).await;

    let req = test::TestRequest::get()
        .uri("/tasks/not-a-valid-id")
        .insert_header(bearer(&user))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation failed: invalid task ID format");

    let missing = format!("/tasks/{}", uuid::Uuid::new_v4());
    let requests = [
        test::TestRequest::get().uri(&missing),
        test::TestRequest::put()
            .uri(&missing)
            .set_json(json!({ "title": "Renamed" })),
        test::TestRequest::delete().uri(&missing),
    ];
    for req in requests {
        let (status, _) = send(&app, req.insert_header(bearer(&admin)).to_request()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[actix_rt::test]
async fn test_partial_update_keeps_other_fields() {
    let state = seeded_state().await;
    let admin = login(&state, ADMIN).await;
    let app = test::init_service(App::new().configure(routes::config(state))).await;

    let due = Utc::now() + Duration::days(3);
    let req = test::TestRequest::post()
        .uri("/tasks")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "title": "Write report",
            "description": "quarterly numbers",
            "duedate": due,
            "status": "Pending"
        }))
        .to_request();
    let (_, created) = send(&app, req).await;
    let task_url = format!("/tasks/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::put()
        .uri(&task_url)
        .insert_header(bearer(&admin))
        .set_json(json!({ "status": "In progress" }))
        .to_request();
    let (status, updated) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "In progress");
    assert_eq!(updated["description"], "quarterly numbers");
    assert_eq!(updated["duedate"], created["duedate"]);

    let req = test::TestRequest::put()
        .uri(&task_url)
        .insert_header(bearer(&admin))
        .set_json(json!({ "duedate": Utc::now() - Duration::days(2) }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&task_url)
        .insert_header(bearer(&admin))
        .to_request();
    let (_, stored) = send(&app, req).await;
    assert_eq!(stored, updated);
}

#[actix_rt::test]
async fn test_list_is_ordered_by_due_date() {
    let state = seeded_state().await;
    let admin = login(&state, ADMIN).await;
    let user = login(&state, USER).await;
    let app = test::init_service(App::new().configure(routes::config(state))).await;

    for (title, days) in [("later", 5), ("sooner", 1), ("middle", 3)] {
        let req = test::TestRequest::post()
            .uri("/tasks")
            .insert_header(bearer(&admin))
            .set_json(json!({
                "title": title,
                "duedate": Utc::now() + Duration::days(days),
                "status": "Pending"
            }))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header(bearer(&user))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["sooner", "middle", "later"]);
}

#[actix_rt::test]
async fn test_create_task_unauthorized() {
    let state = seeded_state().await;

    // Find an available port
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let server = HttpServer::new(move || App::new().configure(routes::config(state.clone())))
        .workers(1)
        .bind(("127.0.0.1", port))
        .unwrap_or_else(|_| panic!("Failed to bind to port {}", port))
        .run();
    let handle = server.handle();
    rt::spawn(server);

    let client = reqwest::Client::new();
    let base = format!("http://127.0.0.1:{}", port);

    let resp = client
        .post(format!("{}/tasks", base))
        .json(&json!({ "title": "Unauthorized Task", "status": "Pending" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Authorization token required");

    let resp = client
        .get(format!("{}/health", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    handle.stop(false).await;
}

/// Runs the lifecycle against PostgreSQL. Needs `DATABASE_URL`.
#[ignore]
#[actix_rt::test]
async fn test_postgres_task_repository() {
    use task_manager::domain::{NewTask, TaskChanges, TaskStatus};
    use task_manager::repositories::{postgres, PgTaskRepository};
    use task_manager::usecases::TaskUseCase;

    dotenv::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = postgres::connect(&database_url, std::time::Duration::from_secs(5))
        .await
        .expect("Failed to connect to test DB");
    postgres::migrate(&pool).await.expect("Failed to migrate test DB");

    let tasks = TaskUseCase::new(Arc::new(PgTaskRepository::new(pool)));
    let created = tasks
        .create_task(NewTask {
            title: "Pay bills".into(),
            description: None,
            due_date: Some(Utc::now() + Duration::days(1)),
            status: TaskStatus::Pending,
        })
        .await
        .unwrap();
    let id = created.id.unwrap().to_string();

    let done = tasks
        .update_task(
            &id,
            TaskChanges {
                status: Some(TaskStatus::Done),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(done.status, TaskStatus::Done);

    tasks.delete_task(&id).await.unwrap();
    assert!(tasks.get_task_by_id(&id).await.is_err());
}
