//! Category API handlers.
//!
//! ```text
//! GET /api/v1/categories
//! POST /api/v1/categories {"name":"Roofing","icon":"roof"}
//! GET /api/v1/categories/manage
//! GET /api/v1/categories/{category_id}
//! PUT /api/v1/categories/{category_id}
//! DELETE /api/v1/categories/{category_id}
//! ```
//!
//! Everything except the plain listing requires the `Admin` role.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Category, CategoryDeletion, CategoryDraft, CategoryId, CategoryOverview, Error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{invalid_form, parse_id};

#[derive(Debug, Deserialize)]
pub(super) struct CategoryPath {
    category_id: String,
}

impl CategoryPath {
    fn parse(self) -> Result<CategoryId, Error> {
        parse_id(&self.category_id, "categoryId")
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: String,
    pub icon: Option<String>,
}

impl CategoryRequest {
    fn draft(&self) -> Result<CategoryDraft, Error> {
        CategoryDraft::try_new(&self.name, self.icon.as_deref())
            .map_err(|errors| invalid_form(&errors, self))
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.as_str().to_owned(),
            icon: category.icon,
        }
    }
}

/// A category on the admin management page.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOverviewResponse {
    #[serde(flatten)]
    pub category: CategoryResponse,
    pub topic_count: u64,
}

impl From<CategoryOverview> for CategoryOverviewResponse {
    fn from(overview: CategoryOverview) -> Self {
        Self {
            category: CategoryResponse::from(overview.category),
            topic_count: overview.topic_count,
        }
    }
}

/// List categories ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "Categories", body = [CategoryResponse]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "listCategories",
    security([])
)]
#[get("/categories")]
pub async fn list_categories(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<CategoryResponse>>> {
    let categories = state.categories_query.list_categories().await?;
    Ok(web::Json(categories.into_iter().map(Into::into).collect()))
}

/// Every category with the number of topics filed under it.
#[utoipa::path(
    get,
    path = "/api/v1/categories/manage",
    responses(
        (status = 200, description = "Categories with topic counts", body = [CategoryOverviewResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "manageCategories"
)]
#[get("/categories/manage")]
pub async fn manage_categories(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CategoryOverviewResponse>>> {
    let actor = session.require_actor(state.identity.as_ref()).await?;
    let overview = state.categories_query.manage_categories(&actor).await?;
    Ok(web::Json(overview.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Created category", body = CategoryResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "createCategory"
)]
#[post("/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CategoryRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor(state.identity.as_ref()).await?;
    let draft = payload.draft()?;
    let category = state.categories.create_category(&actor, draft).await?;
    Ok(HttpResponse::Created().json(CategoryResponse::from(category)))
}

/// Current values for the category edit form.
#[utoipa::path(
    get,
    path = "/api/v1/categories/{category_id}",
    params(("category_id" = String, Path, description = "Category identifier")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "getCategory"
)]
#[get("/categories/{category_id}")]
pub async fn get_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CategoryPath>,
) -> ApiResult<web::Json<CategoryResponse>> {
    let category_id = path.into_inner().parse()?;
    let actor = session.require_actor(state.identity.as_ref()).await?;
    let category = state
        .categories_query
        .category_for_edit(&actor, &category_id)
        .await?;
    Ok(web::Json(category.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/{category_id}",
    params(("category_id" = String, Path, description = "Category identifier")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Updated category", body = CategoryResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "updateCategory"
)]
#[put("/categories/{category_id}")]
pub async fn update_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CategoryPath>,
    payload: web::Json<CategoryRequest>,
) -> ApiResult<web::Json<CategoryResponse>> {
    let category_id = path.into_inner().parse()?;
    let actor = session.require_actor(state.identity.as_ref()).await?;
    let draft = payload.draft()?;
    let category = state
        .categories
        .update_category(&actor, &category_id, draft)
        .await?;
    Ok(web::Json(category.into()))
}

/// Delete a category nobody files topics under.
///
/// A category still in use is left untouched and reported as a conflict
/// whose details carry the blocking `topicCount`.
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{category_id}",
    params(("category_id" = String, Path, description = "Category identifier")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Topics still use the category", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "deleteCategory"
)]
#[delete("/categories/{category_id}")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CategoryPath>,
) -> ApiResult<HttpResponse> {
    let category_id = path.into_inner().parse()?;
    let actor = session.require_actor(state.identity.as_ref()).await?;
    match state
        .categories
        .delete_category(&actor, &category_id)
        .await?
    {
        CategoryDeletion::Deleted => Ok(HttpResponse::NoContent().finish()),
        CategoryDeletion::Blocked {
            reason,
            topic_count,
        } => Err(Error::conflict(reason).with_details(json!({ "topicCount": topic_count }))),
    }
}

#[cfg(test)]
#[path = "categories_tests.rs"]
mod tests;
