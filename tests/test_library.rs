use crate::utils::{client, client_with_token};
use hummingbird_rs::error::Error;
use hummingbird_rs::library::{LibraryEntryUpdate, LibraryStatus, RatingType, SimpleRating};
use hummingbird_rs::LibraryEntry;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod utils;

#[tokio::test]
async fn update_with_explicit_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/libraries/log-horizon"))
        .and(header("content-type", "application/json"))
        .and(body_string(
            "{\"id\":\"log-horizon\",\"auth_token\":\"T\",\"episodes_watched\":3,\"increment_episodes\":true}\n",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7622, "episodes_watched": 4})))
        .expect(1)
        .mount(&server)
        .await;

    // the explicit token wins over the cached one
    let hb = client_with_token(&server, "cached");
    let entry = hb
        .update_library_entry(
            "log-horizon",
            LibraryEntryUpdate::default()
                .episodes_watched(3u32)
                .increment_episodes(true),
            Some("T"),
        )
        .await
        .unwrap();

    assert_eq!(entry.id, 7622);
    assert_eq!(entry.episodes_watched, 4);
    assert!(entry.anime.is_none());
}

#[tokio::test]
async fn update_falls_back_to_cached_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/libraries/log-horizon"))
        .and(body_string(
            "{\"id\":\"log-horizon\",\"auth_token\":\"cached\",\"notes\":\"great\"}\n",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "notes": "great", "notes_present": true})))
        .expect(1)
        .mount(&server)
        .await;

    let entry = client_with_token(&server, "cached")
        .update_library_entry(
            "log-horizon",
            LibraryEntryUpdate::default().notes("great"),
            None,
        )
        .await
        .unwrap();
    assert!(entry.notes_present);
}

#[tokio::test]
async fn update_without_any_token_is_rejected_by_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/libraries/log-horizon"))
        .and(body_string("{\"id\":\"log-horizon\",\"auth_token\":\"\"}\n"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid token"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .update_library_entry("log-horizon", LibraryEntryUpdate::default(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Status(_)));
    assert_eq!(
        err.to_string(),
        format!(
            "POST {}/api/v1/libraries/log-horizon: 401 invalid token",
            server.uri()
        )
    );
}

#[tokio::test]
async fn remove_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/libraries/log-horizon/remove"))
        .and(body_string("{\"id\":\"log-horizon\",\"auth_token\":\"T\"}\n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let removed = client(&server)
        .remove_library_entry("log-horizon", Some("T"))
        .await
        .unwrap();
    assert!(removed)
}

#[tokio::test]
async fn entry_updates_and_removes_itself() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/erengy/library"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 5593549,
            "episodes_watched": 20,
            "last_watched": "2014-06-20T05:31:27.074Z",
            "updated_at": "2014-08-18T16:04:05.383Z",
            "status": "currently-watching",
            "anime": {"id": 7622, "slug": "log-horizon", "title": "Log Horizon"},
            "rating": {"type": "advanced", "value": "3.5"}
        }])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/libraries/log-horizon"))
        .and(body_string(
            "{\"id\":\"log-horizon\",\"auth_token\":\"cached\",\"status\":\"completed\",\"rating\":4.5}\n",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5593549,
            "status": "completed",
            "rating": {"type": "advanced", "value": "4.5"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/libraries/log-horizon/remove"))
        .and(body_string("{\"id\":\"log-horizon\",\"auth_token\":\"cached\"}\n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let hb = client_with_token(&server, "cached");
    let entry = hb
        .user_library("erengy", None)
        .await
        .unwrap()
        .pop()
        .unwrap();

    let rating = entry.rating.clone().unwrap();
    assert_eq!(rating.rating_type, RatingType::Advanced);
    assert_eq!(rating.simple(), Some(SimpleRating::Neutral));

    let updated = entry
        .update(
            LibraryEntryUpdate::default()
                .status(LibraryStatus::Completed)
                .rating(4.5f32),
            None,
        )
        .await
        .unwrap();
    assert_eq!(updated.status, LibraryStatus::Completed);
    assert_eq!(updated.rating.unwrap().simple(), Some(SimpleRating::Positive));

    assert!(entry.remove(None).await.unwrap())
}

#[tokio::test]
async fn entry_without_anime_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/erengy/library"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "anime": null}])))
        .expect(1)
        .mount(&server)
        .await;

    let mut library = client_with_token(&server, "cached")
        .user_library("erengy", None)
        .await
        .unwrap();
    let entry: LibraryEntry = library.pop().unwrap();

    let err = entry
        .update(LibraryEntryUpdate::default().increment_episodes(true), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Input(_)));
    assert!(matches!(entry.remove(None).await, Err(Error::Input(_))));

    assert_eq!(server.received_requests().await.unwrap().len(), 1)
}
