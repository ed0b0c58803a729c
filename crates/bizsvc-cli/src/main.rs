mod cli;
mod services;
mod wiring;

use clap::Parser;
use serde::Serialize;

use bizsvc_core::domain::request::BatchDefectProcessRequest;
use bizsvc_core::{
    BatchProcessService, DefectApi, DefectOperateService, QueryWarningService, Resolution,
    Resolver, WiringConfig,
};

use crate::cli::{CapabilityArg, Cli, Commands};

/// resolve コマンドの出力
#[derive(Debug, Serialize)]
struct ResolveReport {
    capability: &'static str,
    requested: String,
    matched: String,
    via_fallback: bool,
}

impl ResolveReport {
    fn new<C: bizsvc_core::Capability + ?Sized>(
        requested: String,
        resolution: &Resolution<C>,
    ) -> Self {
        Self {
            capability: C::NAME,
            requested,
            matched: resolution.matched.to_string(),
            via_fallback: resolution.via_fallback,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn resolve(
    resolver: &Resolver,
    capability: CapabilityArg,
    category: &str,
    tool: &str,
) -> Result<ResolveReport, bizsvc_core::RegistryError> {
    let requested = format!("{category}/{tool}");
    // capability は型引数なので、ここで一度だけ列挙する
    let report = match capability {
        CapabilityArg::QueryWarning => ResolveReport::new(
            requested,
            &resolver.resolve_detailed::<dyn QueryWarningService>(category, tool)?,
        ),
        CapabilityArg::DefectOperate => ResolveReport::new(
            requested,
            &resolver.resolve_detailed::<dyn DefectOperateService>(category, tool)?,
        ),
        CapabilityArg::BatchProcess => ResolveReport::new(
            requested,
            &resolver.resolve_detailed::<dyn BatchProcessService>(category, tool)?,
        ),
    };
    Ok(report)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    bizsvc_core::logging::init(if cli.verbose { "debug" } else { "info" })?;

    // (A) 設定を読み、起動時に catalog を組み立てて freeze
    let config = match &cli.config {
        Some(path) => WiringConfig::load(path)?,
        None => WiringConfig::default(),
    };
    let resolver = wiring::build_resolver(&config)?;

    // (B) request handler 相当の facade に Resolver を渡す
    let api = DefectApi::new(resolver.clone());

    match cli.command {
        Commands::Catalog { json } => {
            if json {
                print_json(&resolver.catalog().stats())?;
            } else {
                for key in resolver.catalog().keys() {
                    println!("{key}");
                }
            }
        }
        Commands::Resolve {
            capability,
            category,
            tool,
        } => {
            let report = resolve(&resolver, capability, &category, &tool)?;
            print_json(&report)?;
        }
        Commands::Query {
            tool,
            task_id,
            status,
        } => {
            let rsp = api
                .query_checkers_and_authors(task_id, &tool, status.as_deref())
                .await?;
            print_json(&rsp)?;
        }
        Commands::Cloc {
            tool,
            task_id,
            order,
        } => {
            let rsp = api
                .query_cloc_list(task_id, &tool, order.map(Into::into))
                .await?;
            print_json(&rsp)?;
        }
        Commands::Batch {
            tool,
            biz_type,
            task_id,
            user,
            defects,
        } => {
            let request = BatchDefectProcessRequest {
                tool_name: tool,
                biz_type,
                defect_keys: defects,
                ..Default::default()
            };
            let processed = api.batch_defect_process(task_id, &user, request).await?;
            print_json(&serde_json::json!({ "processed": processed }))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizsvc_core::RegistryError;
    use rstest::rstest;

    fn resolver() -> Resolver {
        wiring::build_resolver(&WiringConfig::default()).unwrap()
    }

    #[rstest]
    #[case::query_override(CapabilityArg::QueryWarning, "query-warning", "cloc", "QUERY-WARNING/CLOC", false)]
    #[case::query_default(CapabilityArg::QueryWarning, "query-warning", "pylint", "QUERY-WARNING/DEFAULT", true)]
    #[case::operate(CapabilityArg::DefectOperate, "defect-operate", "LINT", "DEFECT-OPERATE/DEFAULT", true)]
    #[case::batch(CapabilityArg::BatchProcess, "batch-process:ignore", "DEFAULT", "BATCH-PROCESS:IGNORE/DEFAULT", false)]
    fn resolve_reports_matched_key(
        #[case] capability: CapabilityArg,
        #[case] category: &str,
        #[case] tool: &str,
        #[case] matched: &str,
        #[case] via_fallback: bool,
    ) {
        let report = resolve(&resolver(), capability, category, tool).unwrap();
        assert_eq!(report.requested, format!("{category}/{tool}"));
        assert_eq!(report.matched, matched);
        assert_eq!(report.via_fallback, via_fallback);
    }

    #[test]
    fn resolve_names_the_requested_capability() {
        let report = resolve(
            &resolver(),
            CapabilityArg::BatchProcess,
            "batch-process:ASSIGN",
            "lint",
        )
        .unwrap();
        assert_eq!(report.capability, "BatchProcessService");
    }

    #[test]
    fn resolve_with_wrong_capability_is_mismatch() {
        let err = resolve(
            &resolver(),
            CapabilityArg::BatchProcess,
            "query-warning",
            "cloc",
        )
        .err()
        .unwrap();
        assert!(matches!(err, RegistryError::CapabilityMismatch { .. }));
    }

    #[test]
    fn report_serializes_for_json_output() {
        let report = resolve(&resolver(), CapabilityArg::QueryWarning, "query-warning", "cloc")
            .unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["capability"], "QueryWarningService");
        assert_eq!(value["via_fallback"], false);
    }
}
