pub mod asset_host;

pub use asset_host::{AssetHostClient, UploadedAsset};
