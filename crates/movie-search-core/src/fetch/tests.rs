use super::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

type Reply = Result<Vec<SearchResult>, SearchError>;

/// Movie API whose responses are released by the test, one per query.
#[derive(Default)]
struct GatedApi {
    gates: Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
    calls: AtomicUsize,
}

impl GatedApi {
    fn gate(&self, query: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(query.to_string(), rx);
        tx
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieApi for GatedApi {
    fn source_name(&self) -> &str {
        "gated"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().remove(query);
        match gate {
            Some(rx) => rx.await.unwrap_or(Err(SearchError::Status(599))),
            None => Err(SearchError::Status(500)),
        }
    }

    async fn details(&self, id: &str) -> Result<MovieDetails, SearchError> {
        Err(SearchError::NotFound(id.to_string()))
    }
}

fn movie(id: &str, title: &str) -> SearchResult {
    SearchResult {
        id: id.to_string(),
        title: title.to_string(),
        year: "2000".to_string(),
        poster: String::new(),
    }
}

fn controller(api: &Arc<GatedApi>) -> FetchController {
    FetchController::new(api.clone(), FetchSettings::default())
}

/// Wait until the state leaves `Loading`.
async fn settled(rx: &mut watch::Receiver<FetchState>) -> FetchState {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let state = rx.borrow_and_update().clone();
            if !state.is_loading() {
                return state;
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("fetch state never settled")
}

/// Let spawned tasks run to completion on the test runtime.
async fn drain() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[tokio::test]
async fn test_empty_query_is_idle_without_network() {
    let api = Arc::new(GatedApi::default());
    let fetch = controller(&api);

    fetch.search("");
    drain().await;

    assert_eq!(fetch.state(), FetchState::Idle);
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn test_search_success() {
    let api = Arc::new(GatedApi::default());
    let fetch = controller(&api);
    let mut rx = fetch.subscribe();

    let tx = api.gate("batman");
    fetch.search("batman");
    assert_eq!(fetch.state(), FetchState::Loading);

    tx.send(Ok(vec![movie("tt1", "Batman")])).unwrap();
    let state = settled(&mut rx).await;

    assert_eq!(state.results().len(), 1);
    assert_eq!(state.results()[0].title, "Batman");
    assert_eq!(state.error(), None);
    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn test_not_found_message() {
    let api = Arc::new(GatedApi::default());
    let fetch = controller(&api);
    let mut rx = fetch.subscribe();

    let tx = api.gate("zzzznotfound");
    fetch.search("zzzznotfound");
    tx.send(Err(SearchError::NotFound("Movie not found!".to_string()))).unwrap();

    assert_eq!(settled(&mut rx).await, FetchState::Failure(NOT_FOUND_MESSAGE.to_string()));
}

#[tokio::test]
async fn test_transport_failure_then_recovery() {
    let api = Arc::new(GatedApi::default());
    let fetch = controller(&api);
    let mut rx = fetch.subscribe();

    let tx = api.gate("alien");
    fetch.search("alien");
    tx.send(Err(SearchError::Status(503))).unwrap();
    assert_eq!(settled(&mut rx).await, FetchState::Failure(FETCH_ERROR_MESSAGE.to_string()));

    let tx = api.gate("aliens");
    fetch.search("aliens");
    tx.send(Ok(vec![movie("tt2", "Aliens")])).unwrap();
    let state = settled(&mut rx).await;
    assert_eq!(state.results()[0].id, "tt2");
    assert_eq!(state.error(), None);
}

#[tokio::test]
async fn test_stale_response_never_overwrites_newer_query() {
    let api = Arc::new(GatedApi::default());
    let fetch = controller(&api);
    let mut rx = fetch.subscribe();

    let slow = api.gate("q1");
    let fast = api.gate("q2");
    fetch.search("q1");
    tokio::task::yield_now().await;
    fetch.search("q2");

    fast.send(Ok(vec![movie("tt2", "Second")])).unwrap();
    let state = settled(&mut rx).await;
    assert_eq!(state.results()[0].id, "tt2");

    // The superseded request may already be gone; either way it must not land.
    let _ = slow.send(Ok(vec![movie("tt1", "First")]));
    drain().await;

    assert_eq!(fetch.state().results()[0].id, "tt2");
}

#[tokio::test]
async fn test_superseded_failure_is_not_surfaced() {
    let api = Arc::new(GatedApi::default());
    let fetch = controller(&api);
    let mut rx = fetch.subscribe();

    let slow = api.gate("q1");
    let fast = api.gate("q2");
    fetch.search("q1");
    fetch.search("q2");

    let _ = slow.send(Err(SearchError::Status(500)));
    drain().await;
    assert_eq!(fetch.state(), FetchState::Loading);

    fast.send(Ok(vec![movie("tt2", "Second")])).unwrap();
    assert_eq!(settled(&mut rx).await.results().len(), 1);
}

#[tokio::test]
async fn test_clearing_query_cancels_in_flight_request() {
    let api = Arc::new(GatedApi::default());
    let fetch = controller(&api);

    let tx = api.gate("matrix");
    fetch.search("matrix");
    fetch.search("");
    assert_eq!(fetch.state(), FetchState::Idle);

    let _ = tx.send(Ok(vec![movie("tt3", "The Matrix")]));
    drain().await;
    assert_eq!(fetch.state(), FetchState::Idle);
}

#[tokio::test]
async fn test_request_timeout_is_transport_failure() {
    let api = Arc::new(GatedApi::default());
    let fetch = FetchController::new(
        api.clone(),
        FetchSettings {
            request_timeout: Duration::from_millis(30),
        },
    );
    let mut rx = fetch.subscribe();

    let _held_open = api.gate("slow");
    fetch.search("slow");

    assert_eq!(settled(&mut rx).await, FetchState::Failure(FETCH_ERROR_MESSAGE.to_string()));
}

#[tokio::test]
async fn test_shutdown_suppresses_completion() {
    let api = Arc::new(GatedApi::default());
    let fetch = controller(&api);

    let tx = api.gate("heat");
    fetch.search("heat");
    fetch.shutdown();

    let _ = tx.send(Ok(vec![movie("tt4", "Heat")]));
    drain().await;
    assert_eq!(fetch.state(), FetchState::Loading);
}

#[tokio::test]
async fn test_details_maps_not_found() {
    let api = Arc::new(GatedApi::default());
    let fetch = controller(&api);

    let err = fetch.details("tt404").await.unwrap_err();
    assert!(err.is_not_found());
}

/// Serve one canned OMDb response over HTTP and return the base URL.
async fn serve_once(body: &'static str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let _ = socket.read(&mut buf).await.unwrap();
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });
    base_url
}

fn omdb_controller(base_url: String) -> FetchController {
    let timeout = Duration::from_secs(5);
    let client = movie_search_sources::OmdbClient::new(base_url, Some("test-key".to_string()), timeout);
    FetchController::new(Arc::new(client), FetchSettings { request_timeout: timeout })
}

#[tokio::test]
async fn test_omdb_search_payload_becomes_success() {
    let base_url = serve_once(
        r#"{"Response":"True","totalResults":"1","Search":[{"Title":"Batman","Year":"1989","imdbID":"tt0096895","Type":"movie","Poster":"N/A"}]}"#,
    )
    .await;
    let fetch = omdb_controller(base_url);
    let mut rx = fetch.subscribe();

    fetch.search("batman");
    let state = settled(&mut rx).await;

    assert_eq!(state.results().len(), 1);
    assert_eq!(state.results()[0].title, "Batman");
    assert_eq!(state.results()[0].id, "tt0096895");
}

#[tokio::test]
async fn test_omdb_not_found_payload_becomes_failure() {
    let base_url = serve_once(r#"{"Response":"False","Error":"Movie not found!"}"#).await;
    let fetch = omdb_controller(base_url);
    let mut rx = fetch.subscribe();

    fetch.search("zzzznotfound");

    assert_eq!(settled(&mut rx).await, FetchState::Failure(NOT_FOUND_MESSAGE.to_string()));
}
