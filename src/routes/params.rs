use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{i18n::Lang, services::entity_service::ListFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Include deactivated rows.
    pub include_inactive: Option<bool>,
    /// Case-insensitive search over every translation.
    pub q: Option<String>,
    /// Sort by display label; unsorted when omitted.
    pub sort_order: Option<SortOrder>,
    /// Label language for sorting, `en`/`ar` or an Odoo code.
    pub lang: Option<String>,
    /// Car status such as `published`; ignored by other lists.
    pub status: Option<String>,
    /// Cars of one brand; ignored by other lists.
    pub brand_id: Option<i64>,
    /// Cars of one model; ignored by other lists.
    pub model_id: Option<i64>,
}

impl ListQuery {
    pub fn to_filter(&self, default_lang: Lang) -> ListFilter {
        let lang = self
            .lang
            .as_deref()
            .and_then(Lang::from_locale)
            .unwrap_or(default_lang);
        ListFilter {
            include_inactive: self.include_inactive.unwrap_or(false),
            search: self.q.clone(),
            sort: self.sort_order.map(|order| (order, lang)),
            status: self.status.clone(),
            brand_id: self.brand_id,
            model_id: self.model_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_hide_inactive_and_skip_sorting() {
        let filter = ListQuery::default().to_filter(Lang::Ar001);
        assert!(!filter.include_inactive);
        assert!(filter.search.is_none());
        assert!(filter.sort.is_none());
    }

    #[test]
    fn locale_picks_sort_language() {
        let query = ListQuery {
            sort_order: Some(SortOrder::Desc),
            lang: Some("en".into()),
            ..ListQuery::default()
        };
        assert_eq!(
            query.to_filter(Lang::Ar001).sort,
            Some((SortOrder::Desc, Lang::EnUs))
        );
    }
}
