//! Configuration section definitions.
//!
//! Each module corresponds to a section in `asset_id.toml`:
//!
//! | Module    | TOML Section  | Purpose                                 |
//! |-----------|---------------|-----------------------------------------|
//! | `assets`  | `[assets]`    | Public root, catalog entries, rewriting |
//! | `publish` | `[publish]`   | Workers, key prefix, cache headers      |
//! | `store`   | `[store]`     | Object store endpoint and credentials   |

mod assets;
mod publish;
mod store;

pub use assets::AssetsConfig;
pub use publish::PublishConfig;
pub use store::StoreConfig;
