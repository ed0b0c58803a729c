//! App - 起動時の組み立て
//!
//! catalog への登録・policy 宣言・必須 category の検証をまとめ、
//! freeze 済みの Resolver を返します。

pub mod builder;

pub use self::builder::{BuildError, CatalogBuilder};
