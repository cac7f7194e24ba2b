use std::marker::PhantomData;

use serde_json::{Map, Value};

use crate::{
    dto::entities::{EntityForm, FormMode},
    error::{AppError, AppResult, GatewayError, GatewayResult},
    graphql::{GraphQLClient, RequestOptions, documents, variables},
    i18n::Lang,
    media::ImageFile,
    models::{Brand, Entity, records},
    routes::params::SortOrder,
};

/// List filters. Search and sort always run locally on fetched rows;
/// entities with server-side filtering also turn the rest into query
/// variables through [`Entity::list_variables`].
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub include_inactive: bool,
    pub search: Option<String>,
    pub sort: Option<(SortOrder, Lang)>,
    pub status: Option<String>,
    pub brand_id: Option<i64>,
    pub model_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct Listing<E> {
    pub items: Vec<E>,
    /// Rows returned upstream, before filtering.
    pub total: usize,
}

/// Inactive rows are hidden unless asked for; search is a lowercase
/// substring match over every translation and the display name.
pub fn apply_filter<E: Entity>(items: Vec<E>, filter: &ListFilter) -> Vec<E> {
    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut items: Vec<E> = items
        .into_iter()
        .filter(|e| filter.include_inactive || e.is_active())
        .filter(|e| needle.as_deref().is_none_or(|n| e.matches(n)))
        .collect();

    if let Some((order, lang)) = filter.sort {
        items.sort_by_cached_key(|e| e.label(lang).to_lowercase());
        if matches!(order, SortOrder::Desc) {
            items.reverse();
        }
    }
    items
}

/// List/get/create/update/deactivate for one entity type.
pub struct EntityService<E> {
    client: GraphQLClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> EntityService<E> {
    pub fn new(client: GraphQLClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    pub async fn fetch_all(
        &self,
        filter: &ListFilter,
        options: RequestOptions,
    ) -> GatewayResult<Vec<E>> {
        let data: Value = self
            .client
            .query(E::LIST, E::list_variables(filter), options)
            .await?;
        records(data)
    }

    pub async fn list(&self, filter: &ListFilter) -> AppResult<Listing<E>> {
        let all = self.fetch_all(filter, RequestOptions::default()).await?;
        let total = all.len();
        Ok(Listing {
            items: apply_filter(all, filter),
            total,
        })
    }

    pub async fn get(&self, id: i64) -> AppResult<E> {
        let vars = variables([("id", E::id_variable(id))]);
        let data: Value = self
            .client
            .query(E::GET, vars, RequestOptions::default())
            .await?;
        records::<E>(data)?
            .into_iter()
            .find(|e| e.id() == id)
            .ok_or(AppError::NotFound)
    }

    pub async fn create(&self, form: &E::Form) -> AppResult<E> {
        let values = form.to_values(FormMode::Create).map_err(AppError::Validation)?;
        let vars = variables([("values", Value::Object(values))]);
        let created = self.write(E::CREATE, vars).await?;
        tracing::info!(entity = E::LABEL, id = created.id(), "created");
        Ok(created)
    }

    pub async fn update(&self, id: i64, form: &E::Form) -> AppResult<E> {
        let values = form.to_values(FormMode::Update).map_err(AppError::Validation)?;
        if values.is_empty() {
            return Err(AppError::Validation("No changes to save".to_string()));
        }
        let vars = variables([("id", E::id_variable(id)), ("values", Value::Object(values))]);
        let updated = self.write(E::UPDATE, vars).await?;
        tracing::info!(entity = E::LABEL, id, "updated");
        Ok(updated)
    }

    /// Soft delete: the record stays but is marked inactive.
    pub async fn deactivate(&self, id: i64) -> AppResult<E> {
        let vars = variables([("id", E::id_variable(id))]);
        match self.write(E::DEACTIVATE, vars).await {
            Ok(entity) => {
                tracing::info!(entity = E::LABEL, id, "deactivated");
                Ok(entity)
            }
            // The server does not say which dependents block the change.
            Err(AppError::Gateway(message)) => Err(AppError::Gateway(format!(
                "Failed to delete {}. It may have related records. ({message})",
                E::LABEL.to_lowercase()
            ))),
            Err(err) => Err(err),
        }
    }

    async fn write(&self, mutation: &str, vars: Map<String, Value>) -> AppResult<E> {
        let data: Value = self
            .client
            .mutate(mutation, vars, RequestOptions::default())
            .await?;
        records::<E>(data)?.into_iter().next().ok_or_else(|| {
            AppError::from(GatewayError::InvalidResponse(format!(
                "{} mutation returned no record",
                E::ROOT
            )))
        })
    }
}

impl EntityService<Brand> {
    /// Validates the image and stores it as the brand logo.
    pub async fn upload_logo(&self, id: i64, image: &ImageFile) -> AppResult<Brand> {
        let mime = image.validate().into_result().map_err(AppError::Validation)?;
        tracing::debug!(id, mime = mime.mime, bytes = image.size(), "uploading brand logo");
        let vars = variables([
            ("id", Brand::id_variable(id)),
            ("logo", Value::String(image.to_base64())),
        ]);
        self.write(documents::UPLOAD_CAR_BRAND_LOGO, vars).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::Year;

    fn years() -> Vec<Year> {
        serde_json::from_value(json!([
            {"id": 1, "name": {"en_US": "2023"}, "active": true},
            {"id": 2, "name": {"en_US": "2024", "ar_001": "٢٠٢٤"}, "active": false},
            {"id": 3, "name": {"en_US": "2025"}, "active": true},
        ]))
        .unwrap()
    }

    #[test]
    fn inactive_rows_hidden_by_default() {
        let ids: Vec<i64> = apply_filter(years(), &ListFilter::default())
            .iter()
            .map(|y| y.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn search_and_sort_apply_together() {
        let filter = ListFilter {
            include_inactive: true,
            search: Some(" 202 ".into()),
            sort: Some((SortOrder::Desc, Lang::EnUs)),
            ..ListFilter::default()
        };
        let ids: Vec<i64> = apply_filter(years(), &filter).iter().map(|y| y.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let filter = ListFilter {
            include_inactive: true,
            search: Some("٢٠٢٤".into()),
            ..ListFilter::default()
        };
        assert_eq!(apply_filter(years(), &filter).len(), 1);
    }
}
