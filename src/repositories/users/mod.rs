pub mod credential_store;
pub mod user_repo;

pub use credential_store::{CredentialStore, ProfilePatch};
pub use user_repo::UserRepository;
