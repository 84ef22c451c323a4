//! Sales Report Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::{ItemBreakdown, ReportRepository};
use crate::utils::AppResult;
use crate::utils::time;

// ============================================================================
// Query Parameters and Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SalesReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Summary over completed orders in the requested range
#[derive(Debug, Clone, Serialize)]
pub struct SalesSummary {
    pub total_revenue: f64,
    pub total_orders: i64,
    pub start_date: String,
    pub end_date: String,
}

/// Full sales report response
#[derive(Debug, Clone, Serialize)]
pub struct SalesReportResponse {
    pub summary: SalesSummary,
    pub item_breakdown: Vec<ItemBreakdown>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/admin/reports/sales - 日期范围销售报表
///
/// 两端日期默认为今天 (UTC)；范围对两个边界日都是闭区间，
/// 内部以「结束日次日零点」为排他上界。
pub async fn sales(
    State(state): State<ServerState>,
    Query(query): Query<SalesReportQuery>,
) -> AppResult<Json<SalesReportResponse>> {
    let start = match &query.start_date {
        Some(s) => time::parse_date(s)?,
        None => time::today_utc(),
    };
    let end = match &query.end_date {
        Some(s) => time::parse_date(s)?,
        None => time::today_utc(),
    };

    let start_millis = time::day_start_millis(start);
    let end_millis = time::day_end_millis(end);

    tracing::debug!(
        start = %start,
        end = %end,
        "Generating sales report"
    );

    let repo = ReportRepository::new(state.get_db());
    let (total_revenue, total_orders) = repo.sales_summary(start_millis, end_millis).await?;
    let item_breakdown = repo.item_breakdown(start_millis, end_millis).await?;

    Ok(Json(SalesReportResponse {
        summary: SalesSummary {
            total_revenue,
            total_orders,
            start_date: start.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
        },
        item_breakdown,
    }))
}
