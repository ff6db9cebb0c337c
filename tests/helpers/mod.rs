//! Reusable test helpers for integration tests.
//!
//! Every suite runs against the in-memory document store (the weakest
//! backend the store contract allows) with a store-backed user directory
//! seeded through the same profile path production would use.

use std::collections::BTreeSet;
use std::sync::Arc;

use bandmate_core::directory::{FullName, Profile, StoreDirectory};
use bandmate_core::geo::Coordinates;
use bandmate_core::store::MemoryStore;

/// Shared backend for one test: a memory store and a directory over it.
pub struct TestBackend {
    pub store: Arc<MemoryStore>,
    pub directory: Arc<StoreDirectory>,
}

/// Creates a fresh, empty backend.
pub fn backend() -> TestBackend {
    let store = Arc::new(MemoryStore::new());
    let directory = Arc::new(StoreDirectory::new(store.clone()));
    TestBackend { store, directory }
}

/// Seeds a profile with the given position and tags.
pub async fn seed_profile(
    backend: &TestBackend,
    id: &str,
    latitude: f64,
    longitude: f64,
    instruments: &[&str],
    genres: &[&str],
) -> Profile {
    let profile = Profile {
        id: id.to_string(),
        name: FullName {
            first: id.to_string(),
            last: "Test".to_string(),
        },
        coordinates: Coordinates::new(latitude, longitude),
        about: None,
        instruments: to_set(instruments),
        genres: to_set(genres),
    };
    backend
        .directory
        .create(&profile)
        .await
        .expect("should create profile");
    profile
}

fn to_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
