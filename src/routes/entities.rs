use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::put,
};

use crate::{
    dto::media::ImageUploadRequest,
    error::{AppError, AppResult},
    i18n::Lang,
    models::{Brand, Entity},
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    state::AppState,
};

fn default_lang(state: &AppState) -> Lang {
    Lang::from_code(&state.config.gateway.language).unwrap_or(Lang::Ar001)
}

pub async fn list<E: Entity>(
    state: &AppState,
    query: &ListQuery,
) -> AppResult<Json<ApiResponse<Vec<E>>>> {
    let filter = query.to_filter(default_lang(state));
    let listing = state.entities::<E>().list(&filter).await?;
    let meta = Meta::listing(listing.total, listing.items.len());
    Ok(Json(ApiResponse::success(
        format!("{} list", E::LABEL),
        listing.items,
        Some(meta),
    )))
}

pub async fn get_one<E: Entity>(state: &AppState, id: i64) -> AppResult<Json<ApiResponse<E>>> {
    let entity = state.entities::<E>().get(id).await?;
    Ok(Json(ApiResponse::success(E::LABEL, entity, None)))
}

pub async fn create<E: Entity>(
    state: &AppState,
    form: &E::Form,
) -> AppResult<(StatusCode, Json<ApiResponse<E>>)> {
    let entity = state.entities::<E>().create(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            format!("{} created", E::LABEL),
            entity,
            Some(Meta::empty()),
        )),
    ))
}

pub async fn update<E: Entity>(
    state: &AppState,
    id: i64,
    form: &E::Form,
) -> AppResult<Json<ApiResponse<E>>> {
    let entity = state.entities::<E>().update(id, form).await?;
    Ok(Json(ApiResponse::success(
        format!("{} updated", E::LABEL),
        entity,
        Some(Meta::empty()),
    )))
}

pub async fn deactivate<E: Entity>(state: &AppState, id: i64) -> AppResult<Json<ApiResponse<E>>> {
    let entity = state.entities::<E>().deactivate(id).await?;
    Ok(Json(ApiResponse::success(
        format!("{} deactivated", E::LABEL),
        entity,
        Some(Meta::empty()),
    )))
}

/// One documented REST module per entity, all sharing the handlers above.
macro_rules! entity_routes {
    (
        $module:ident,
        $entity:ident,
        $form:ident,
        tag = $tag:literal,
        collection = $collection:literal,
        item = $item:literal
    ) => {
        pub mod $module {
            use axum::{
                Json, Router,
                extract::{Path, Query, State},
                http::StatusCode,
                routing::get,
            };

            use crate::{
                dto::{entities::*, specifications::*},
                error::AppResult,
                models::$entity,
                response::ApiResponse,
                routes::params::ListQuery,
                state::AppState,
            };

            pub fn router() -> Router<AppState> {
                Router::new()
                    .route("/", get(list).post(create))
                    .route("/{id}", get(get_one).put(update).delete(deactivate))
            }

            #[utoipa::path(
                get,
                path = $collection,
                params(ListQuery),
                responses(
                    (status = 200, description = "Filtered list", body = ApiResponse<Vec<$entity>>),
                    (status = 503, description = "GraphQL server unreachable"),
                ),
                tag = $tag
            )]
            pub async fn list(
                State(state): State<AppState>,
                Query(query): Query<ListQuery>,
            ) -> AppResult<Json<ApiResponse<Vec<$entity>>>> {
                crate::routes::entities::list::<$entity>(&state, &query).await
            }

            #[utoipa::path(
                get,
                path = $item,
                params(("id" = i64, Path, description = "Record id")),
                responses(
                    (status = 200, description = "Single record", body = ApiResponse<$entity>),
                    (status = 404, description = "Not found"),
                ),
                tag = $tag
            )]
            pub async fn get_one(
                State(state): State<AppState>,
                Path(id): Path<i64>,
            ) -> AppResult<Json<ApiResponse<$entity>>> {
                crate::routes::entities::get_one::<$entity>(&state, id).await
            }

            #[utoipa::path(
                post,
                path = $collection,
                request_body = $form,
                responses(
                    (status = 201, description = "Created", body = ApiResponse<$entity>),
                    (status = 400, description = "Validation failed"),
                ),
                tag = $tag
            )]
            pub async fn create(
                State(state): State<AppState>,
                Json(form): Json<$form>,
            ) -> AppResult<(StatusCode, Json<ApiResponse<$entity>>)> {
                crate::routes::entities::create::<$entity>(&state, &form).await
            }

            #[utoipa::path(
                put,
                path = $item,
                params(("id" = i64, Path, description = "Record id")),
                request_body = $form,
                responses(
                    (status = 200, description = "Updated", body = ApiResponse<$entity>),
                    (status = 400, description = "Validation failed"),
                ),
                tag = $tag
            )]
            pub async fn update(
                State(state): State<AppState>,
                Path(id): Path<i64>,
                Json(form): Json<$form>,
            ) -> AppResult<Json<ApiResponse<$entity>>> {
                crate::routes::entities::update::<$entity>(&state, id, &form).await
            }

            #[utoipa::path(
                delete,
                path = $item,
                params(("id" = i64, Path, description = "Record id")),
                responses(
                    (status = 200, description = "Marked inactive", body = ApiResponse<$entity>),
                    (status = 500, description = "Rejected upstream, possibly because of related records"),
                ),
                tag = $tag
            )]
            pub async fn deactivate(
                State(state): State<AppState>,
                Path(id): Path<i64>,
            ) -> AppResult<Json<ApiResponse<$entity>>> {
                crate::routes::entities::deactivate::<$entity>(&state, id).await
            }
        }
    };
}

entity_routes!(brands, Brand, BrandForm, tag = "Brands", collection = "/api/brands", item = "/api/brands/{id}");
entity_routes!(models, CarModel, ModelForm, tag = "Models", collection = "/api/models", item = "/api/models/{id}");
entity_routes!(trims, Trim, TrimForm, tag = "Trims", collection = "/api/trims", item = "/api/trims/{id}");
entity_routes!(colors, Color, ColorForm, tag = "Colors", collection = "/api/colors", item = "/api/colors/{id}");
entity_routes!(years, Year, YearForm, tag = "Years", collection = "/api/years", item = "/api/years/{id}");
entity_routes!(cars, Car, CarForm, tag = "Cars", collection = "/api/cars", item = "/api/cars/{id}");
entity_routes!(
    variants,
    Variant,
    VariantForm,
    tag = "Variants",
    collection = "/api/variants",
    item = "/api/variants/{id}"
);

pub mod specifications {
    entity_routes!(
        categories,
        SpecCategory,
        SpecCategoryForm,
        tag = "Specifications",
        collection = "/api/specifications/categories",
        item = "/api/specifications/categories/{id}"
    );
    entity_routes!(
        units,
        SpecUnit,
        SpecUnitForm,
        tag = "Specifications",
        collection = "/api/specifications/units",
        item = "/api/specifications/units/{id}"
    );
    entity_routes!(
        attributes,
        SpecAttribute,
        SpecAttributeForm,
        tag = "Specifications",
        collection = "/api/specifications/attributes",
        item = "/api/specifications/attributes/{id}"
    );
    entity_routes!(
        values,
        SpecValue,
        SpecValueForm,
        tag = "Specifications",
        collection = "/api/specifications/values",
        item = "/api/specifications/values/{id}"
    );
    entity_routes!(
        templates,
        SpecTemplate,
        SpecTemplateForm,
        tag = "Specifications",
        collection = "/api/specifications/templates",
        item = "/api/specifications/templates/{id}"
    );
}

pub fn specification_router() -> Router<AppState> {
    Router::new()
        .nest("/categories", specifications::categories::router())
        .nest("/units", specifications::units::router())
        .nest("/attributes", specifications::attributes::router())
        .nest("/values", specifications::values::router())
        .nest("/templates", specifications::templates::router())
}

pub fn brand_router() -> Router<AppState> {
    brands::router().route("/{id}/logo", put(upload_brand_logo))
}

#[utoipa::path(
    put,
    path = "/api/brands/{id}/logo",
    params(("id" = i64, Path, description = "Brand id")),
    request_body = ImageUploadRequest,
    responses(
        (status = 200, description = "Logo stored", body = ApiResponse<Brand>),
        (status = 400, description = "Unsupported, oversized or undecodable image"),
    ),
    tag = "Brands"
)]
pub async fn upload_brand_logo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ImageUploadRequest>,
) -> AppResult<Json<ApiResponse<Brand>>> {
    let image = payload.into_image().map_err(AppError::Validation)?;
    let brand = state.entities::<Brand>().upload_logo(id, &image).await?;
    Ok(Json(ApiResponse::success(
        "Brand logo updated",
        brand,
        Some(Meta::empty()),
    )))
}
