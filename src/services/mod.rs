pub mod assets;
pub mod auth;
pub mod users;

pub use assets::AssetHostClient;
pub use auth::TokenService;
pub use users::UserService;
