//! Test server harness.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use visage::cache::CacheStore;
use visage::config::DEFAULT_MAX_UPLOAD_BYTES;
use visage::embedding::{BoundingBox, DetectedFace, EmbeddingVector, MockFaceExtractor};
use visage::gateway::{HandlerState, create_router_with_state};
use visage::store::{MockEnrollmentStore, UserDocument};
use visage::sync::{MockAvatarFetcher, SyncConfig, SyncOrchestrator, SyncReport};

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub sync_concurrency: usize,
    pub max_upload_bytes: usize,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            sync_concurrency: 4,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// A running server wired to in-memory store, fetcher and extractor mocks.
pub struct TestServer {
    pub addr: SocketAddr,
    pub cache: Arc<CacheStore>,
    pub orchestrator: Arc<SyncOrchestrator>,
    pub store: Arc<MockEnrollmentStore>,
    pub fetcher: Arc<MockAvatarFetcher>,
    pub extractor: Arc<MockFaceExtractor>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Adds a store user whose avatar yields exactly `embedding`.
    pub fn add_user(&self, id: &str, name: &str, embedding: EmbeddingVector) {
        self.add_user_with_faces(id, name, vec![embedding]);
    }

    pub fn add_user_with_faces(&self, id: &str, name: &str, faces: Vec<EmbeddingVector>) {
        let url = format!("https://avatars.test/{id}.jpg");
        let image = format!("avatar-{id}").into_bytes();
        self.store
            .insert(UserDocument::new(id).with_name(name).with_avatar_url(&url));
        self.fetcher.insert(&url, image.clone());
        self.extractor
            .insert(image, faces.into_iter().map(face).collect());
    }

    /// Makes `image` decode to `faces` when uploaded to `/detect`.
    pub fn register_probe(&self, image: &[u8], faces: Vec<EmbeddingVector>) {
        self.extractor
            .insert(image.to_vec(), faces.into_iter().map(face).collect());
    }

    /// Runs the startup sync the binary performs before serving.
    pub async fn initial_sync(&self) -> SyncReport {
        self.orchestrator
            .sync()
            .await
            .expect("initial sync should succeed")
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub fn face(embedding: EmbeddingVector) -> DetectedFace {
    DetectedFace::new(BoundingBox::new(12, 80, 90, 4), embedding)
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
}

/// Spawns a server on an ephemeral port with every external dependency mocked.
///
/// The cache starts empty; call [`TestServer::initial_sync`] or `POST /reload` to load it.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let local_addr = listener.local_addr()?;

    let cache = Arc::new(CacheStore::new());
    let store = Arc::new(MockEnrollmentStore::new());
    let fetcher = Arc::new(MockAvatarFetcher::new());
    let extractor = Arc::new(MockFaceExtractor::new());

    let orchestrator = Arc::new(SyncOrchestrator::new(
        Arc::clone(&cache),
        store.clone(),
        fetcher.clone(),
        extractor.clone(),
        SyncConfig::default().concurrency(config.sync_concurrency),
    ));

    let state = HandlerState::new(Arc::clone(&orchestrator), extractor.clone())
        .with_max_upload_bytes(config.max_upload_bytes);
    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        cache,
        orchestrator,
        store,
        fetcher,
        extractor,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
