use crate::error::AppError;
use crate::export::ExportFile;
use crate::handlers::page::{render, PageContext};
use crate::models::expense::CategoryTotals;
use crate::models::user::CurrentUser;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Extension, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tower_sessions::Session;

#[derive(Template)]
#[template(path = "charts.html")]
struct ChartsTemplate {
    ctx: PageContext,
}

/// GET /graficos - Chart page; data is fetched from the JSON endpoint
pub async fn charts_page(Extension(user): Extension<CurrentUser>, session: Session) -> Response {
    let template = ChartsTemplate {
        ctx: PageContext::load(&session, Some(user)).await,
    };
    render(&template)
}

/// GET /api/gastos_tipos - Totals per category
pub async fn category_totals(
    State(state): State<AppState>,
) -> Result<Json<CategoryTotals>, AppError> {
    Ok(Json(state.report_service.category_totals().await?))
}

/// GET /export/excel/{obra_id} - Spreadsheet download
pub async fn export_excel(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> Result<Response, AppError> {
    let file = state.report_service.export_spreadsheet(project_id).await?;
    Ok(attachment(file))
}

/// GET /export/pdf/{obra_id} - PDF download
pub async fn export_pdf(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> Result<Response, AppError> {
    let file = state.report_service.export_pdf(project_id).await?;
    Ok(attachment(file))
}

fn attachment(file: ExportFile) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", file.filename);
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response()
}
