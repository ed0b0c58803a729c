//! Catalog - (category, tool) から capability インスタンスへの対応表
//!
//! 起動時に一度だけ構築し、`freeze()` 後は読み取り専用です。

mod entry;
mod store;

pub use self::store::ServiceCatalog;
