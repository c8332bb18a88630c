use hearth_node::{
    test_utils::{FakePow, MemPool, MemQueue, MockClient, MockHost, MockNode},
    Client, ClientConfig,
};
use std::sync::Arc;
use tempfile::TempDir;

/// A client wired to fresh mocks over a temporary data directory.
pub struct TestNode {
    pub client: MockClient,
    pub pool: MemPool,
    pub queue: MemQueue,
    pub host: Arc<MockHost>,
    pub dir: TempDir,
}

impl TestNode {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Builds a node after letting the caller adjust the config (and seed
    /// the data directory, which already exists at `config.db_path`).
    pub fn with_config(adjust: impl FnOnce(&mut ClientConfig)) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = ClientConfig {
            db_path: dir.path().to_path_buf(),
            // one worker keeps tests light; individual tests resize
            miners: 1,
            ..Default::default()
        };
        adjust(&mut config);
        let pool = MemPool::new();
        let queue = MemQueue::new();
        let host = Arc::new(MockHost::new());
        let client = Client::<MockNode>::new(
            config,
            pool.clone(),
            queue.clone(),
            FakePow,
            Arc::downgrade(&host),
        )
        .expect("client construction");
        Self { client, pool, queue, host, dir }
    }
}
