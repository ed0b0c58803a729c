use std::sync::Arc;

use bizsvc_core::{
    BatchProcessService, BuildError, CatalogBuilder, DefectOperateService, QueryWarningService,
    Resolver, WiringConfig,
};

use crate::services::{
    AssignBatchProcessor, ClocQueryWarningService, CommonDefectOperateService,
    CommonQueryWarningService, IgnoreBatchProcessor,
};

/// Register every available implementation and freeze the catalog.
///
/// Runs once before any request is served.
pub fn build_resolver(config: &WiringConfig) -> Result<Resolver, BuildError> {
    let common_query: Arc<dyn QueryWarningService> = Arc::new(CommonQueryWarningService);
    let cloc_query: Arc<dyn QueryWarningService> = Arc::new(ClocQueryWarningService);
    let operate: Arc<dyn DefectOperateService> = Arc::new(CommonDefectOperateService::default());
    let ignore: Arc<dyn BatchProcessService> = Arc::new(IgnoreBatchProcessor);
    let assign: Arc<dyn BatchProcessService> = Arc::new(AssignBatchProcessor);

    let resolver = CatalogBuilder::new()
        .with_config(config)?
        .register("query-warning", "DEFAULT", common_query)?
        .register("query-warning", "CLOC", cloc_query)?
        .register("defect-operate", "DEFAULT", operate)?
        .register("batch-process:IGNORE", "DEFAULT", ignore)?
        .register("batch-process:ASSIGN", "DEFAULT", assign)?
        .build()?;
    Ok(resolver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizsvc_core::RegistryError;

    #[test]
    fn default_wiring_builds() {
        let resolver = build_resolver(&WiringConfig::default()).unwrap();
        assert_eq!(resolver.catalog().len(), 5);
        assert!(
            resolver
                .resolve::<dyn QueryWarningService>("query-warning", "pylint")
                .is_ok()
        );
    }

    #[test]
    fn shipped_config_builds() {
        let config = WiringConfig::from_toml_str(include_str!("../wiring.toml")).unwrap();
        let resolver = build_resolver(&config).unwrap();
        assert!(resolver.catalog().is_frozen());
    }

    #[test]
    fn config_can_require_missing_category() {
        let config = WiringConfig::from_toml_str(r#"expect = ["batch-process:REVERT"]"#).unwrap();
        assert!(matches!(
            build_resolver(&config),
            Err(BuildError::MissingCategories(_))
        ));
    }

    #[test]
    fn config_can_disable_fallback() {
        let config = WiringConfig::from_toml_str(
            r#"
            [categories."defect-operate"]
            fallback = "exact-only"
            "#,
        )
        .unwrap();
        let resolver = build_resolver(&config).unwrap();
        let err = resolver
            .resolve::<dyn DefectOperateService>("defect-operate", "lint")
            .err()
            .unwrap();
        assert!(matches!(err, RegistryError::ServiceNotFound { .. }));
    }
}
