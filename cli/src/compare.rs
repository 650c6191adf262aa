use crate::cli::{CompareTarget, GlobalArgs};
use crate::context::{self, AppContext};
use crate::error::{CliError, Result, ResultExt};
use crate::progress::with_spinner;
use crate::ui;
use report_api::renderers::diff_table;
use report_api::{extract_report_id, ComparisonRequest, ReportMapping};

pub fn execute(global: &GlobalArgs, target: CompareTarget) -> Result<()> {
    let ctx = AppContext::load(global)?;
    context::block_on(async {
        let request = match target {
            CompareTarget::Reports {
                report_id_1,
                report_id_2,
                stage1,
                stage2,
                insert,
            } => ComparisonRequest::new(report_id_1, report_id_2)
                .with_stages(stage1, stage2)
                .with_insert_flag(insert),
            CompareTarget::Mapping { mapping_id, insert } => {
                let mappings = with_spinner("Loading report mappings", ctx.client.report_mappings())
                    .await
                    .with_context(|| "Failed to load report mappings")?;
                let mapping = find_mapping(&mappings, mapping_id)?;
                ComparisonRequest::from_mapping(mapping)?.with_insert_flag(insert)
            }
        };
        compare(&ctx, &request).await
    })
}

async fn compare(ctx: &AppContext, request: &ComparisonRequest) -> Result<()> {
    if let Ok(mut url) = ctx.client.endpoint("api/reportComparison") {
        request.apply_to(&mut url);
        ctx.verbose(&format!("GET {url}"));
    }

    let response = with_spinner("Comparing reports", ctx.client.compare_reports(request))
        .await
        .with_context(|| "Comparison failed")?;

    ui::section_header("Report Comparison");
    ui::field("Report 1", &request.report_id_1.to_string());
    ui::field("Report 2", &request.report_id_2.to_string());
    if let Some(stage) = request.stage_id_1 {
        ui::field("Stage 1", &stage.to_string());
    }
    if let Some(stage) = request.stage_id_2 {
        ui::field("Stage 2", &stage.to_string());
    }
    ui::field("Total differences", &response.data.len().to_string());

    if response.data.is_empty() {
        ui::success_message("No differences found");
    } else {
        ui::block(&diff_table(&response.data));
    }
    if let Some(message) = response.message.as_deref() {
        ui::info_message(message);
    }
    Ok(())
}

fn find_mapping(mappings: &[ReportMapping], mapping_id: i64) -> Result<&ReportMapping> {
    let mapping = mappings
        .iter()
        .find(|m| m.id == mapping_id)
        .ok_or_else(|| CliError::Other(format!("Mapping {mapping_id} not found")))?;

    // Surface the parse error with the mapping it came from
    extract_report_id(&mapping.original_report_name)
        .with_context(|| format!("Mapping {mapping_id} cannot be compared"))?;
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_api::ItemStatus;

    fn mapping(id: i64, name: &str) -> ReportMapping {
        ReportMapping {
            id,
            original_report_name: name.to_string(),
            inserted_report_id: Some(900),
            status: ItemStatus::Success,
            error_message: None,
            created_at: None,
        }
    }

    #[test]
    fn test_find_mapping() {
        let mappings = vec![mapping(1, "Report_1366_latest"), mapping(2, "draft")];
        assert_eq!(find_mapping(&mappings, 1).unwrap().id, 1);

        let err = find_mapping(&mappings, 2).unwrap_err();
        assert!(err.user_message().starts_with("Mapping 2 cannot be compared"));

        assert!(find_mapping(&mappings, 3).is_err());
    }
}
