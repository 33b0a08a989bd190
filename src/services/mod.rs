// Service exports
pub mod auth;
pub mod cache;
pub mod postgres;
pub mod speech;
pub mod translate;

pub use auth::{AdminAuth, AdminClaims, AuthError, IssuedToken};
pub use cache::{CacheError, CacheKey, CacheManager};
pub use postgres::{RestaurantStore, StoreError, Visibility};
pub use speech::{split_chunks, SpeechClient, SpeechError};
pub use translate::{is_supported_language, provider_language, TranslateError, TranslationClient, SUPPORTED_LANGUAGES};
