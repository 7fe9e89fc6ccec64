/// Knowledge template handlers - the create flow's download endpoint and
/// the editor availability flag
use actix_web::{web, HttpResponse};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::{permissions, Principal};

const TEMPLATE_MD: &str = include_str!("../../templates/knowledge_template.md");
const TEMPLATE_IPYNB: &str = include_str!("../../templates/knowledge_template.ipynb");

/// Download a blank knowledge template as an attachment.
pub async fn download_template(format: web::Path<String>) -> Result<HttpResponse> {
    let (body, content_type) = match format.as_str() {
        "md" => (TEMPLATE_MD, "text/markdown; charset=utf-8"),
        "ipynb" => (TEMPLATE_IPYNB, "application/x-ipynb+json"),
        other => {
            return Err(AppError::NotFound(format!(
                "no knowledge template for format `{}`",
                other
            )))
        }
    };

    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=knowledge_template.{}", format),
        ))
        .body(body))
}

/// Report whether the web editor is enabled for this deployment.
pub async fn editor_config(
    config: web::Data<Config>,
    principal: Principal,
) -> Result<HttpResponse> {
    permissions::check_index_view(&principal)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "web_editor_enabled": !config.index.web_editor_prefixes.is_empty(),
    })))
}
