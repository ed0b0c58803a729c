//! Capability - 業務サービスの契約
//!
//! 各 capability interface は object-safe な async trait で、
//! catalog には `Arc<dyn Trait>` として登録されます。
//!
//! # 二層構造
//! - **表層**: `QueryWarningService` などの trait - 型安全
//! - **内部**: `Capability` marker - `dyn Trait` に名前を付け、catalog が型消去して保持する
//!
//! `register::<dyn QueryWarningService>(..)` に渡せるのは
//! `QueryWarningService` を実装したインスタンスだけなので、
//! 「インスタンスが capability を満たすか」はコンパイル時に保証されます。

pub mod services;

#[cfg(test)]
pub(crate) mod fixtures;

pub use self::services::{BatchProcessService, DefectOperateService, QueryWarningService};

/// Capability は catalog に登録できる trait object 型
///
/// `dyn QueryWarningService` のような unsized 型に実装します。
///
/// # Trait Bounds
/// - `Send + Sync`: 複数のリクエストから同時に共有されるため
/// - `'static`: `Arc` ごと型消去して catalog に格納するため
pub trait Capability: Send + Sync + 'static {
    /// エラーメッセージやログに出す capability 名
    const NAME: &'static str;
}

impl Capability for dyn QueryWarningService {
    const NAME: &'static str = "QueryWarningService";
}

impl Capability for dyn DefectOperateService {
    const NAME: &'static str = "DefectOperateService";
}

impl Capability for dyn BatchProcessService {
    const NAME: &'static str = "BatchProcessService";
}
