//! Integration tests for the GroupSession client.
//!
//! These tests use wiremock to stand in for the GroupSession server and
//! check both the requests the client sends and how it reports responses.

use std::time::Duration;

use groupsession_client::{
    ClientConfig, CreateScheduleRequest, GroupSessionClient, LoginCredentials, SearchParams,
    SendMessageRequest, SortOrder, UNKNOWN_ERROR, UpdateScheduleRequest,
};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client_for(server: &MockServer) -> GroupSessionClient {
    GroupSessionClient::new(ClientConfig::new(server.uri())).unwrap()
}

async fn mount_login(server: &MockServer, session_id: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "success": true, "sessionId": session_id }
        })))
        .mount(server)
        .await;
}

async fn received(server: &MockServer) -> Vec<Request> {
    server.received_requests().await.unwrap_or_default()
}

fn user_json(id: &str) -> Value {
    json!({ "userId": id, "userName": format!("User {id}"), "active": true })
}

#[tokio::test]
async fn test_login_stores_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "userId": "admin", "password": "admin" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "success": true, "sessionId": "abc123" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(!client.is_authenticated());

    let auth = client.login(&LoginCredentials::new("admin", "admin")).await;

    assert!(auth.success);
    assert_eq!(auth.session_id.as_deref(), Some("abc123"));
    assert!(auth.message.is_none());
    assert_eq!(client.session_id().as_deref(), Some("abc123"));
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_login_failure_without_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "error": "Invalid credentials"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let auth = client.login(&LoginCredentials::new("invalid_user", "wrong")).await;

    assert!(!auth.success);
    assert!(auth.session_id.is_none());
    assert!(auth.message.is_none());
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_login_without_session_id_does_not_authenticate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "success": false, "message": "Password expired" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let auth = client.login(&LoginCredentials::new("admin", "admin")).await;

    assert!(!auth.success);
    assert_eq!(auth.message.as_deref(), Some("Password expired"));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_session_header_sent_after_login() {
    let server = MockServer::start().await;
    mount_login(&server, "abc123").await;

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("X-Session-ID", "abc123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": user_json("admin") })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.login(&LoginCredentials::new("admin", "admin")).await;

    let me = client.get_current_user().await;
    assert!(me.success);
    assert_eq!(me.data.unwrap().user_id, "admin");
}

#[tokio::test]
async fn test_default_and_custom_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("Accept", "application/json"))
        .and(header("User-Agent", "GroupSession-Example/1.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": user_json("admin") })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config =
        ClientConfig::new(server.uri()).with_header("User-Agent", "GroupSession-Example/1.0");
    let client = GroupSessionClient::new(config).unwrap();

    assert!(client.get_current_user().await.success);
}

#[tokio::test]
async fn test_clear_session_omits_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": user_json("admin") })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.set_session_id("restored");
    assert_eq!(client.session_id().as_deref(), Some("restored"));
    client.get_current_user().await;

    client.clear_session();
    assert!(!client.is_authenticated());
    client.get_current_user().await;

    let requests = received(&server).await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].headers["x-session-id"], "restored");
    assert!(requests[1].headers.get("x-session-id").is_none());
}

#[tokio::test]
async fn test_unsendable_session_token_is_unknown_error() {
    let server = MockServer::start().await;

    let client = client_for(&server);
    client.set_session_id("bad\ntoken");
    let users = client.get_users(None).await;

    assert!(!users.success);
    assert_eq!(users.error.as_deref(), Some(UNKNOWN_ERROR));
    assert!(received(&server).await.is_empty());
}

#[tokio::test]
async fn test_empty_session_token_is_not_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": user_json("admin") })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.set_session_id("");
    assert!(!client.is_authenticated());
    client.get_current_user().await;

    let requests = received(&server).await;
    assert!(requests[0].headers.get("x-session-id").is_none());
}

#[tokio::test]
async fn test_null_member_list_is_accepted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/groups/G1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "groupId": "G1", "groupName": "Sales", "members": null, "active": true }
        })))
        .mount(&server)
        .await;

    let group = client_for(&server).get_group("G1").await;
    assert!(group.success);
    assert!(group.data.unwrap().members.is_empty());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(header("X-Session-ID", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.set_session_id("abc123");

    let response = client.logout().await;
    assert!(response.success);
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_failed_logout_keeps_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "Logout failed"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.set_session_id("abc123");

    let response = client.logout().await;
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("Logout failed"));
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_unauthorized_clears_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/schedules"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "error": "Session expired"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.set_session_id("stale");

    let schedules = client.get_schedules(None).await;
    assert!(!schedules.success);
    assert_eq!(schedules.error.as_deref(), Some("Session expired"));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_unauthorized_without_body_clears_session() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/messages/M1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.set_session_id("stale");

    let response = client.delete_message("M1").await;
    assert!(!response.success);
    assert_eq!(
        response.error.as_deref(),
        Some("Request failed with status code 401")
    );
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_not_found_envelope_returned_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/nonexistent"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "User not found"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let user = client.get_user("nonexistent").await;

    assert!(!user.success);
    assert!(user.data.is_none());
    assert!(user.message.is_none());
    assert_eq!(user.error.as_deref(), Some("User not found"));
}

#[tokio::test]
async fn test_error_body_message_used() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/groups/G1"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({ "message": "Under maintenance" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let group = client.get_group("G1").await;

    assert!(!group.success);
    assert_eq!(group.error.as_deref(), Some("Under maintenance"));
}

#[tokio::test]
async fn test_success_status_with_garbage_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/messages/M1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let message = client.get_message("M1").await;

    assert!(!message.success);
    let error = message.error.unwrap();
    assert!(error.starts_with("Invalid response"), "got {error}");
    assert_ne!(error, UNKNOWN_ERROR);
}

#[tokio::test]
async fn test_unreachable_server() {
    let client = GroupSessionClient::new(
        ClientConfig::new("http://127.0.0.1:1/gsession").with_timeout_ms(2_000),
    )
    .unwrap();

    let auth = client.login(&LoginCredentials::new("admin", "admin")).await;
    assert!(!auth.success);

    let users = client.get_users(None).await;
    assert!(!users.success);
    assert!(!users.error.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_timeout_settles_as_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": [] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client =
        GroupSessionClient::new(ClientConfig::new(server.uri()).with_timeout_ms(100)).unwrap();

    let users = client.get_users(None).await;
    assert!(!users.success);
    assert_eq!(users.error.as_deref(), Some("Request timed out"));
}

#[tokio::test]
async fn test_paginated_users_pass_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "5"))
        .and(query_param("sortBy", "userName"))
        .and(query_param("sortOrder", "asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [user_json("u6"), user_json("u7")],
            "totalCount": 7,
            "page": 2,
            "pageSize": 5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let params = SearchParams::new()
        .page(2)
        .page_size(5)
        .sort_by("userName")
        .sort_order(SortOrder::Asc);
    let users = client.get_users(Some(&params)).await;

    assert!(users.success);
    assert_eq!(users.total_count, Some(7));
    assert_eq!(users.page, Some(2));
    let ids: Vec<_> = users.items().iter().map(|u| u.user_id.as_str()).collect();
    assert_eq!(ids, ["u6", "u7"]);
}

#[tokio::test]
async fn test_unset_params_are_not_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [],
            "totalCount": 0,
            "page": 1,
            "pageSize": 100
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.get_groups(Some(&SearchParams::new().page_size(100))).await;
    client.get_groups(None).await;

    let requests = received(&server).await;
    assert_eq!(requests[0].url.query(), Some("pageSize=100"));
    assert_eq!(requests[1].url.query(), None);
}

#[tokio::test]
async fn test_group_members() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/groups/G1/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [user_json("u1"), user_json("u2")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let members = client.get_group_members("G1").await;

    assert!(members.success);
    assert_eq!(members.data.unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_schedule_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/schedules"))
        .and(body_json(json!({
            "title": "Review",
            "startDate": "2024-01-02T10:00:00Z",
            "endDate": "2024-01-02T11:30:00Z",
            "location": "Room A",
            "attendees": ["admin", "user1"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {
                "scheduleId": "S1",
                "title": "Review",
                "startDate": "2024-01-02T10:00:00Z",
                "endDate": "2024-01-02T11:30:00Z",
                "location": "Room A",
                "attendees": ["admin", "user1"],
                "createdBy": "admin",
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = CreateScheduleRequest {
        title: "Review".into(),
        start_date: "2024-01-02T10:00:00Z".into(),
        end_date: "2024-01-02T11:30:00Z".into(),
        location: Some("Room A".into()),
        attendees: Some(vec!["admin".into(), "user1".into()]),
        ..Default::default()
    };
    let created = client.create_schedule(&request).await;

    assert!(created.success);
    let schedule = created.data.unwrap();
    assert_eq!(schedule.schedule_id, "S1");
    assert_eq!(schedule.created_by, "admin");
}

#[tokio::test]
async fn test_update_schedule_uses_id_as_path() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/schedules/S1"))
        .respond_with(|request: &Request| {
            let mut schedule = json!({
                "title": "Old",
                "startDate": "2024-01-02T10:00:00Z",
                "endDate": "2024-01-02T11:30:00Z",
                "attendees": [],
                "createdBy": "admin",
                "createdAt": "2023-12-31T00:00:00Z"
            });
            let changes: Value = serde_json::from_slice(&request.body).unwrap();
            for (key, value) in changes.as_object().unwrap() {
                schedule[key] = value.clone();
            }
            schedule["scheduleId"] = json!("S1");
            schedule["updatedAt"] = json!("2024-01-01T00:00:00Z");
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": schedule }))
        })
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = UpdateScheduleRequest {
        title: Some("New".into()),
        ..UpdateScheduleRequest::new("S1")
    };
    let updated = client.update_schedule(&request).await;

    assert!(updated.success);
    let schedule = updated.data.unwrap();
    assert_eq!(schedule.schedule_id, "S1");
    assert_eq!(schedule.title, "New");
    assert_eq!(schedule.updated_at, "2024-01-01T00:00:00Z");

    let requests = received(&server).await;
    assert_eq!(requests[0].url.path(), "/api/schedules/S1");
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent, json!({ "title": "New" }));
}

#[tokio::test]
async fn test_delete_schedule() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/schedules/S1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.delete_schedule("S1").await;

    assert!(response.success);
    assert_eq!(response.message.as_deref(), Some("Deleted"));
}

#[tokio::test]
async fn test_message_flow() {
    let server = MockServer::start().await;
    let message = json!({
        "messageId": "M1",
        "subject": "Hello",
        "body": "Body",
        "from": "admin",
        "to": ["user1"],
        "sentAt": "2024-01-01T00:00:00Z",
        "read": false
    });

    Mock::given(method("POST"))
        .and(path("/api/messages"))
        .and(body_json(json!({ "subject": "Hello", "body": "Body", "to": ["user1"] })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": message })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/messages/M1/read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/messages"))
        .and(query_param("sortBy", "sentAt"))
        .and(query_param("sortOrder", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [message],
            "totalCount": 1,
            "page": 1,
            "pageSize": 5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);

    let sent = client
        .send_message(&SendMessageRequest {
            subject: "Hello".into(),
            body: "Body".into(),
            to: vec!["user1".into()],
            ..Default::default()
        })
        .await;
    assert!(sent.success);
    let message_id = sent.data.unwrap().message_id;

    assert!(client.mark_message_as_read(&message_id).await.success);

    let latest = client
        .get_messages(Some(
            &SearchParams::new()
                .sort_by("sentAt")
                .sort_order(SortOrder::Desc),
        ))
        .await;
    assert_eq!(latest.items()[0].message_id, "M1");
}

#[tokio::test]
async fn test_concurrent_requests_share_session() {
    let server = MockServer::start().await;

    for id in ["u1", "u2", "u3"] {
        Mock::given(method("GET"))
            .and(path(format!("/api/users/{id}")))
            .and(header("X-Session-ID", "abc123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "data": user_json(id) })),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    client.set_session_id("abc123");

    let results =
        futures::future::join_all(["u1", "u2", "u3"].map(|id| client.get_user(id))).await;

    let ids: Vec<_> = results
        .into_iter()
        .map(|r| r.data.unwrap().user_id)
        .collect();
    assert_eq!(ids, ["u1", "u2", "u3"]);
}

#[tokio::test]
async fn test_base_path_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/gsession/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "success": true, "sessionId": "prefixed" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        GroupSessionClient::new(ClientConfig::new(format!("{}/gsession", server.uri()))).unwrap();
    let auth = client.login(&LoginCredentials::new("admin", "admin")).await;

    assert_eq!(auth.session_id.as_deref(), Some("prefixed"));
}
