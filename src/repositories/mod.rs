pub mod users;

pub use users::{CredentialStore, ProfilePatch, UserRepository};
