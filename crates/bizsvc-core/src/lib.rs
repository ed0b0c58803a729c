//! bizsvc-core
//!
//! 告警（defect）API の業務サービス振り分けレジストリ。
//! 「どのツールの告警か」と「どの業務 capability か」から、
//! 登録済みの実装を 1 つ選んで返します。
//!
//! # モジュール構成
//! - **domain**: ServiceKey / Category / ToolName、FallbackPolicy、エラー、リクエスト VO
//! - **capability**: capability interface（QueryWarningService など）と Capability marker
//! - **catalog**: (category, tool) -> インスタンスの対応表（起動時に構築して freeze）
//! - **resolver**: exact -> DEFAULT の順で解決する Resolver
//! - **app**: CatalogBuilder（起動時ワイヤリングと fail-fast 検証）
//! - **api**: request handler 側の facade（DefectApi）
//! - **config / logging / observability**: 設定ファイル、tracing 初期化、状態ビュー

pub mod domain;
pub mod capability;
pub mod catalog;
pub mod resolver;
pub mod app;
pub mod api;
pub mod config;
pub mod logging;
pub mod observability;

pub use self::api::{ApiError, DefectApi};
pub use self::app::{BuildError, CatalogBuilder};
pub use self::capability::{BatchProcessService, Capability, DefectOperateService, QueryWarningService};
pub use self::catalog::ServiceCatalog;
pub use self::config::{ConfigError, WiringConfig};
pub use self::domain::{
    BizOperation, Category, ErrorKind, FallbackPolicy, RegistryError, ServiceError, ServiceKey,
    ToolName,
};
pub use self::resolver::{Resolution, Resolver};
