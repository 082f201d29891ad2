//! Saytrix session store
//!
//! Owns the bearer token and user profile, persists them through a
//! [`Storage`] backend and hands the token to outgoing requests as a
//! [`TokenSource`](saytrix_http::TokenSource).

pub mod error;
pub mod session;
pub mod storage;

pub use error::{AuthError, AuthFailureKind, StorageError};
pub use session::{SessionStore, TOKEN_KEY, TokenStatus, USER_KEY, UserProfile};
pub use storage::{MemoryStorage, Storage};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
