//! External-service clients and record normalization

pub mod apify_client;
pub mod normalizer;
pub mod spotify_client;

pub use apify_client::{ApifyClient, ApifyError};
pub use normalizer::normalize;
pub use spotify_client::{SpotifyClient, SpotifyError};
