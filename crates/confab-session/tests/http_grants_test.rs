use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use confab_session::{GrantProvider, HttpGrantProvider, SessionError};
use confab_types::ConnectionDetails;
use std::collections::HashMap;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let addr = listener.local_addr().expect("no local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server error");
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn fetches_connection_details_with_query_parameters() {
    let router = Router::new().route(
        "/api/connection-details",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            Json(ConnectionDetails {
                server_url: "ws://rtc.test".to_string(),
                room_name: params
                    .get("roomName")
                    .cloned()
                    .unwrap_or_else(|| "ace-room".to_string()),
                participant_token: "signed-token".to_string(),
                participant_name: params
                    .get("participantName")
                    .cloned()
                    .unwrap_or_else(|| "guest".to_string()),
            })
        }),
    );
    let base = serve(router).await;

    let provider = HttpGrantProvider::new(&base);
    let details = provider
        .connection_details(Some("lobby"), Some("alice"))
        .await
        .expect("fetch failed");

    assert_eq!(details.server_url, "ws://rtc.test");
    assert_eq!(details.room_name, "lobby");
    assert_eq!(details.participant_name, "alice");
    assert_eq!(details.participant_token, "signed-token");
}

#[tokio::test]
async fn server_error_surfaces_as_a_grant_failure() {
    let router = Router::new().route(
        "/api/connection-details",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "failed to generate connection details" })),
            )
        }),
    );
    let base = serve(router).await;

    let provider = HttpGrantProvider::new(format!("{}/", base));
    match provider.connection_details(None, None).await {
        Err(SessionError::Grant(message)) => {
            assert!(message.contains("500"), "unexpected message: {}", message);
        }
        other => panic!("expected grant error, got {:?}", other.map(|_| ())),
    }
}
