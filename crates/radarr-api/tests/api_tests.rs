use std::time::Duration;

use chrono::NaiveDate;
use radarr_api::{
    ApiError, CalendarRange, Command, Endpoint, HealthCheck, HttpClient, Paging, RadarrApi,
    RadarrClient, RadarrConfig, TransportError,
};
use reqwest::Method;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> RadarrConfig {
    let addr = server.address();
    RadarrConfig::new(addr.ip().to_string(), addr.port(), "test-key")
}

fn client_for(server: &MockServer) -> RadarrClient {
    RadarrClient::new(config_for(server)).unwrap()
}

fn movie_json(id: i64, title: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "year": 1999,
        "monitored": true,
        "hasFile": true,
        "tmdbId": 603
    })
}

// ---------------------------------------------------------------------------
// HttpClient tests
// ---------------------------------------------------------------------------

mod http_client {
    use super::*;

    #[test]
    fn url_for_builds_plain_http_url() {
        let config = RadarrConfig::from_settings([
            ("host", "localhost"),
            ("port", "7878"),
            ("api_key", "k"),
            ("use_https", "false"),
            ("timeout", "30"),
            ("url_base", ""),
        ])
        .unwrap();
        let client = HttpClient::new(&config).unwrap();
        let url = client.url_for("/api/v3/movie/5", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:7878/api/v3/movie/5");
    }

    #[test]
    fn url_for_includes_url_base_and_query() {
        let config = RadarrConfig::new("example.com", 7878, "k")
            .with_https(true)
            .with_url_base("/radarr");
        let client = HttpClient::new(&config).unwrap();
        let url = client
            .url_for("/api/v3/queue", &[("page", "2".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com:7878/radarr/api/v3/queue?page=2"
        );
    }

    #[test]
    fn url_for_adds_missing_leading_slash() {
        let config = RadarrConfig::new("localhost", 7878, "k").with_url_base("radarr");
        let client = HttpClient::new(&config).unwrap();
        let url = client.url_for("api/v3/movie", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:7878/radarr/api/v3/movie");
    }

    #[test]
    fn new_with_ipv6_host() {
        let config = RadarrConfig::new("::1", 7878, "k");
        let client = HttpClient::new(&config).unwrap();
        let url = client.url_for("/api/v3/movie", &[]).unwrap();
        assert_eq!(url.as_str(), "http://[::1]:7878/api/v3/movie");
    }

    #[test]
    fn new_with_non_ascii_api_key() {
        let config = RadarrConfig::new("localhost", 7878, "key\x01bad");
        let err = HttpClient::new(&config).unwrap_err();
        assert!(
            matches!(err, TransportError::InvalidApiKey),
            "expected InvalidApiKey, got: {err}"
        );
    }

    #[test]
    fn new_with_invalid_host() {
        let config = RadarrConfig::new("not a host", 7878, "k");
        let err = HttpClient::new(&config).unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)), "got: {err}");
    }

    #[test]
    fn debug_impl_shows_base_url_only() {
        let config = RadarrConfig::new("example.com", 9090, "hidden-key");
        let client = HttpClient::new(&config).unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("http://example.com:9090"), "got: {debug}");
        assert!(!debug.contains("hidden-key"), "got: {debug}");
    }

    #[tokio::test]
    async fn send_attaches_api_key_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/system/status"))
            .and(header("X-Api-Key", "test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"version": "5.0"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&config_for(&server)).unwrap();
        let resp = client
            .send(Method::GET, "/api/v3/system/status", &[], None)
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
        let body: serde_json::Value = resp.json().unwrap();
        assert_eq!(body["version"], "5.0");
    }

    #[tokio::test]
    async fn send_returns_http_status_error_on_500() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/movie"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let client = HttpClient::new(&config_for(&server)).unwrap();
        let err = client
            .send(Method::GET, "/api/v3/movie", &[], None)
            .await
            .unwrap_err();
        match err {
            TransportError::HttpStatus { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal error");
            }
            other => panic!("expected HttpStatus, got: {other}"),
        }
    }

    #[tokio::test]
    async fn send_posts_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/command"))
            .and(body_json(serde_json::json!({"name": "RssSync"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 7})))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&config_for(&server)).unwrap();
        let body = serde_json::json!({"name": "RssSync"});
        let resp = client
            .send(Method::POST, "/api/v3/command", &[], Some(&body))
            .await
            .unwrap();
        assert_eq!(resp.status, 201);
    }

    #[tokio::test]
    async fn send_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/movie"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new(&config_for(&server).with_timeout(1)).unwrap();
        let err = client
            .send(Method::GET, "/api/v3/movie", &[], None)
            .await
            .unwrap_err();
        assert!(
            matches!(err, TransportError::Timeout { seconds: 1 }),
            "expected Timeout, got: {err}"
        );
    }

    #[tokio::test]
    async fn send_reports_network_error_when_nothing_listens() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = HttpClient::new(&RadarrConfig::new("127.0.0.1", port, "k")).unwrap();
        let err = client
            .send(Method::GET, "/api/v3/movie", &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Network(_)), "got: {err}");
    }
}

// ---------------------------------------------------------------------------
// RadarrClient tests
// ---------------------------------------------------------------------------

mod radarr_client {
    use super::*;

    #[tokio::test]
    async fn movies_returns_all_movies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/movie"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                movie_json(1, "The Matrix"),
                movie_json(2, "Inception"),
            ])))
            .mount(&server)
            .await;

        let movies = client_for(&server).movies().await.unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title, "The Matrix");
        assert_eq!(movies[1].id, 2);
        assert!(movies[0].has_file);
    }

    #[tokio::test]
    async fn movie_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/movie/5"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(movie_json(5, "Interstellar")),
            )
            .mount(&server)
            .await;

        let movie = client_for(&server).movie(5).await.unwrap();
        assert_eq!(movie.id, 5);
        assert_eq!(movie.title, "Interstellar");
        assert_eq!(movie.tmdb_id, 603);
    }

    #[tokio::test]
    async fn movie_rejects_non_positive_id_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        for id in [0, -3] {
            let err = client.movie(id).await.unwrap_err();
            assert!(
                matches!(err, ApiError::Validation(ref v) if v.field == "id"),
                "got: {err}"
            );
        }
    }

    #[tokio::test]
    async fn movie_decode_error_on_wrong_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/movie/1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "x"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).movie(1).await.unwrap_err();
        assert!(
            matches!(
                err,
                ApiError::Decode {
                    endpoint: Endpoint::Movie,
                    ..
                }
            ),
            "got: {err}"
        );
    }

    #[tokio::test]
    async fn movie_not_found_is_wrapped_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/movie/404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let err = client_for(&server).movie(404).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(matches!(
            err,
            ApiError::Transport(TransportError::HttpStatus { .. })
        ));
    }

    #[tokio::test]
    async fn downloads_reads_first_queue_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/queue"))
            .and(query_param("page", "1"))
            .and(query_param("pageSize", "100"))
            .and(query_param("includeMovie", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "page": 1,
                "pageSize": 100,
                "totalRecords": 3,
                "records": [
                    {"id": 1, "title": "a", "status": "downloading", "size": 100.0, "sizeleft": 50.0},
                    {"id": 2, "title": "b", "status": "completed", "size": 100.0, "sizeleft": 0.0},
                    {"id": 3, "title": "c", "status": "warning", "trackedDownloadStatus": "error",
                     "size": 100.0, "sizeleft": 90.0}
                ]
            })))
            .mount(&server)
            .await;

        let downloads = client_for(&server).downloads().await.unwrap();
        assert_eq!(downloads.count(), 3);
        assert_eq!(downloads.active().count(), 1);
        assert_eq!(downloads.completed().count(), 1);
        assert_eq!(downloads.failed().count(), 1);

        let ordered: Vec<i64> = downloads.sort_by_priority().iter().map(|d| d.id).collect();
        assert_eq!(ordered, vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn system_summary_returns_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/system/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "appName": "Radarr",
                "version": "5.2.6.8376",
                "branch": "master",
                "isDocker": true
            })))
            .mount(&server)
            .await;

        let summary = client_for(&server).system_summary().await.unwrap();
        assert_eq!(summary.version, "5.2.6.8376");
        assert_eq!(summary.branch, "master");
        assert!(summary.is_docker);
    }

    #[tokio::test]
    async fn calendar_sends_date_window() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/calendar"))
            .and(query_param("start", "2024-03-01"))
            .and(query_param("end", "2024-03-31"))
            .and(query_param("unmonitored", "true"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([movie_json(9, "Dune: Part Two")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let range = CalendarRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
        .with_unmonitored(true);
        let movies = client_for(&server).calendar(range).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Dune: Part Two");
    }

    #[tokio::test]
    async fn calendar_rejects_inverted_range() {
        let server = MockServer::start().await;
        let range = CalendarRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        let err = client_for(&server).calendar(range).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)), "got: {err}");
    }

    #[tokio::test]
    async fn history_is_paged_newest_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/history"))
            .and(query_param("page", "2"))
            .and(query_param("pageSize", "10"))
            .and(query_param("sortKey", "date"))
            .and(query_param("sortDirection", "descending"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "page": 2,
                "pageSize": 10,
                "totalRecords": 11,
                "records": [
                    {"id": 11, "movieId": 4, "eventType": "grabbed", "sourceTitle": "x"}
                ]
            })))
            .mount(&server)
            .await;

        let page = client_for(&server)
            .history(Paging::new(2, 10))
            .await
            .unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_records, 11);
        assert_eq!(page.records[0].event_type, "grabbed");
    }

    #[tokio::test]
    async fn history_rejects_zero_page() {
        let server = MockServer::start().await;
        let err = client_for(&server)
            .history(Paging::new(0, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref v) if v.field == "page"));
    }

    #[tokio::test]
    async fn wanted_lists_missing_movies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/wanted/missing"))
            .and(query_param("monitored", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "page": 1,
                "pageSize": 20,
                "totalRecords": 1,
                "records": [{"id": 3, "title": "Arrival", "hasFile": false}]
            })))
            .mount(&server)
            .await;

        let page = client_for(&server)
            .wanted(Paging::default())
            .await
            .unwrap();
        assert_eq!(page.records.len(), 1);
        assert!(!page.records[0].has_file);
    }

    #[tokio::test]
    async fn command_posts_name_and_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3/command"))
            .and(body_json(serde_json::json!({
                "name": "RefreshMovie",
                "movieIds": [1, 2]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 42,
                "name": "RefreshMovie",
                "status": "queued"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let status = client_for(&server)
            .command(Command::refresh_movie([1, 2]))
            .await
            .unwrap();
        assert_eq!(status.id, 42);
        assert_eq!(status.status, "queued");
    }

    #[tokio::test]
    async fn command_rejects_blank_name() {
        let server = MockServer::start().await;
        let err = client_for(&server)
            .command(Command::new(" "))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref v) if v.field == "name"));
    }

    #[tokio::test]
    async fn health_check_healthy_without_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/system/status"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"version": "5.0"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v3/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"source": "UpdateCheck", "type": "warning", "message": "update available"}
            ])))
            .mount(&server)
            .await;

        assert!(client_for(&server).is_healthy().await.unwrap());
    }

    #[tokio::test]
    async fn health_check_unhealthy_on_error_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/system/status"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"version": "5.0"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v3/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"source": "RootFolderCheck", "type": "error", "message": "missing root folder"}
            ])))
            .mount(&server)
            .await;

        assert!(!client_for(&server).is_healthy().await.unwrap());
    }

    #[tokio::test]
    async fn url_base_prefixes_every_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/radarr/api/v3/movie"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = RadarrClient::new(config_for(&server).with_url_base("radarr")).unwrap();
        assert!(client.movies().await.unwrap().is_empty());
    }
}
