//! Data sources: the remote document store and the offline sample generator.

pub mod firestore;
pub mod sample;

pub use firestore::FirestoreClient;
pub use sample::{generate_events, generate_rewards};
