//! CatalogEntry - 型消去された capability インスタンス
//!
//! # 学習ポイント
//! - `Arc<dyn Trait>` をさらに `Box<dyn Any>` に包む二段の型消去
//! - `downcast_ref::<Arc<C>>()` で登録時の capability と照合する

use std::any::Any;
use std::sync::Arc;

use crate::capability::Capability;

/// 1 つの ServiceKey に紐づく長寿命のインスタンス
///
/// 中身は常に `Arc<C>`（C は登録時の capability）。
/// 登録後は不変で、解決のたびに `Arc` を clone して共有します。
pub(crate) struct CatalogEntry {
    capability: &'static str,
    instance: Box<dyn Any + Send + Sync>,
}

impl CatalogEntry {
    pub(crate) fn new<C: Capability + ?Sized>(instance: Arc<C>) -> Self {
        Self {
            capability: C::NAME,
            instance: Box::new(instance),
        }
    }

    pub(crate) fn capability(&self) -> &'static str {
        self.capability
    }

    /// 要求された capability で登録されていれば共有参照を返す
    pub(crate) fn downcast<C: Capability + ?Sized>(&self) -> Option<Arc<C>> {
        self.instance.downcast_ref::<Arc<C>>().cloned()
    }
}

impl std::fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}
