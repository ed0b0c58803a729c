//! CatalogBuilder - 起動時のワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - freeze してから `Arc` に移すことで、以降の変更をコンパイル時に禁止する

use std::sync::Arc;

use tracing::{info, warn};

use crate::capability::Capability;
use crate::catalog::ServiceCatalog;
use crate::config::{ConfigError, WiringConfig};
use crate::domain::errors::RegistryError;
use crate::domain::key::Category;
use crate::domain::policy::FallbackPolicy;
use crate::resolver::Resolver;

/// CatalogBuilder は catalog を組み立てて Resolver を返す
///
/// # 使用例
/// ```ignore
/// let resolver = CatalogBuilder::new()
///     .declare("defect-operate", FallbackPolicy::ExactOnly)?
///     .register::<dyn QueryWarningService>("query-warning", "DEFAULT", Arc::new(CommonQuery))?
///     .expect_categories(&["query-warning"])?
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - expect_categories() で必須の category を宣言
/// - build() 時に「期待集合 ⊆ 登録済み category」をチェック
/// - 不足があれば BuildError を返す
pub struct CatalogBuilder {
    catalog: ServiceCatalog,
    expected: Vec<Category>,
}

/// BuildError は起動時の組み立てエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Missing categories: {0:?}. These categories were expected but nothing is registered.")]
    MissingCategories(Vec<String>),
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self {
            catalog: ServiceCatalog::new(),
            expected: Vec::new(),
        }
    }

    /// 設定ファイルの policy と期待 category を取り込む
    pub fn with_config(mut self, config: &WiringConfig) -> Result<Self, BuildError> {
        for (category, category_config) in &config.categories {
            self.catalog
                .declare_category(category, category_config.fallback)?;
        }
        let expected: Vec<&str> = config.expect.iter().map(String::as_str).collect();
        Ok(self.expect_categories(&expected)?)
    }

    pub fn declare(mut self, category: &str, policy: FallbackPolicy) -> Result<Self, RegistryError> {
        self.catalog.declare_category(category, policy)?;
        Ok(self)
    }

    pub fn register<C: Capability + ?Sized>(
        mut self,
        category: &str,
        tool: &str,
        instance: Arc<C>,
    ) -> Result<Self, RegistryError> {
        self.catalog.register(category, tool, instance)?;
        Ok(self)
    }

    /// 必須 category を追加（重複は無視）
    pub fn expect_categories(mut self, categories: &[&str]) -> Result<Self, RegistryError> {
        for &raw in categories {
            let category = Category::new(raw)?;
            if !self.expected.contains(&category) {
                self.expected.push(category);
            }
        }
        Ok(self)
    }

    /// 検証して freeze し、Resolver を生成
    ///
    /// # 検証
    /// - 期待 category に一つも登録がなければ BuildError::MissingCategories
    /// - ToDefault なのに DEFAULT 実装がない期待 category は warn のみ
    pub fn build(mut self) -> Result<Resolver, BuildError> {
        let registered = self.catalog.categories();
        let missing: Vec<String> = self
            .expected
            .iter()
            .filter(|c| !registered.contains(c))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(BuildError::MissingCategories(missing));
        }

        for category in &self.expected {
            if self.catalog.fallback_policy(category).allows_default()
                && !self.catalog.has_default(category)
            {
                warn!(%category, "category falls back to DEFAULT but has no DEFAULT implementation");
            }
        }

        self.catalog.freeze();
        info!(entries = self.catalog.len(), "resolver ready");
        Ok(Resolver::new(Arc::new(self.catalog))?)
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
