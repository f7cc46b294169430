use std::{sync::Arc, time::Duration};

use crate::{
    api::AppState,
    auth::{AuthService, TokenIssuer},
    config::AllowedOrigins,
    db::memory::MemoryUserStore,
    reading_cache::ReadingCache,
    realtime::SnapshotPublisher,
    sensors::SensorService,
};

pub const TEST_SECRET: &[u8] = b"test-secret";

/// Lowest bcrypt cost, keeps hashing fast in tests.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Application state over in-memory storage, plus handles tests poke at directly.
pub struct TestContext {
    pub state: AppState,
    pub store: MemoryUserStore,
    pub tokens: TokenIssuer,
    pub sensors: SensorService,
}

pub async fn context() -> TestContext {
    context_with_realtime_origins(AllowedOrigins::Any).await
}

pub async fn context_with_realtime_origins(
    realtime_origins: AllowedOrigins,
) -> TestContext {
    let store = MemoryUserStore::new();
    let tokens = TokenIssuer::new(TEST_SECRET, Duration::from_secs(3600));
    let auth = AuthService::new(Arc::new(store.clone()), tokens.clone(), TEST_BCRYPT_COST)
        .await
        .unwrap();
    let cache = ReadingCache::new();
    let publisher = SnapshotPublisher::default();

    TestContext {
        state: AppState {
            auth,
            cache: cache.clone(),
            publisher: publisher.clone(),
            realtime_origins,
        },
        store,
        tokens,
        sensors: SensorService::new(cache, publisher),
    }
}
