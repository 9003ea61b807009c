mod auth;
pub mod secrets;
pub mod storage;

pub use auth::AuthManager;
pub use auth::AuthState;
pub use auth::AuthorizationRedirect;
pub use auth::CompletedAuthorization;
pub use secrets::EnvSecretStore;
pub use secrets::RemoteSecretStore;
pub use secrets::SecretStore;
pub use storage::FileStorage;
pub use storage::MemoryStorage;
pub use storage::SessionStorage;
