use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::{
    dto::{
        entities::{
            BrandForm, CarForm, ColorForm, EntityForm, ModelForm, TrimForm, VariantForm, YearForm,
        },
        specifications::{
            SpecAttributeForm, SpecCategoryForm, SpecTemplateForm, SpecUnitForm, SpecValueForm,
        },
    },
    error::{GatewayError, GatewayResult},
    graphql::{Domain, documents},
    i18n::{Lang, Translations},
    services::entity_service::ListFilter,
};

/// A catalogue record managed through the GraphQL endpoint.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// GraphQL root field, e.g. `CarBrand`.
    const ROOT: &'static str;
    const LABEL: &'static str;
    const LIST: &'static str;
    const GET: &'static str;
    const CREATE: &'static str;
    const UPDATE: &'static str;
    const DEACTIVATE: &'static str;

    type Form: EntityForm;

    fn id(&self) -> i64;
    fn name(&self) -> &Translations;
    fn display_name(&self) -> Option<&str>;
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);

    /// Most models take the id as `String!`.
    fn id_variable(id: i64) -> Value {
        Value::String(id.to_string())
    }

    /// Variables for the list query. Most lists fetch every row and filter
    /// locally.
    fn list_variables(_filter: &ListFilter) -> Map<String, Value> {
        Map::new()
    }

    fn label(&self, lang: Lang) -> String {
        let name = self.name().display(lang);
        if name.is_empty() {
            self.display_name().unwrap_or_default().to_string()
        } else {
            name
        }
    }

    fn matches(&self, needle_lower: &str) -> bool {
        self.name().matches(needle_lower)
            || self
                .display_name()
                .is_some_and(|d| d.to_lowercase().contains(needle_lower))
    }
}

/// Pulls the records under `root` out of a response `data` member. The
/// server answers with a list for reads and a single object for writes.
pub fn records<E: Entity>(data: Value) -> GatewayResult<Vec<E>> {
    let node = match data {
        Value::Object(mut map) => map.remove(E::ROOT).unwrap_or(Value::Null),
        Value::Null => Value::Null,
        other => {
            return Err(GatewayError::InvalidResponse(format!(
                "expected an object with {}, got {other}",
                E::ROOT
            )));
        }
    };
    let items = match node {
        Value::Array(items) => items,
        Value::Null | Value::Bool(false) => Vec::new(),
        single => vec![single],
    };
    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item)
                .map_err(|e| GatewayError::InvalidResponse(format!("{}: {e}", E::ROOT)))
        })
        .collect()
}

/// Odoo encodes "no value" as `false`.
fn falsy<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => Ok(None),
        value => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn falsy_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(falsy::<D, Vec<T>>(deserializer)?.unwrap_or_default())
}

fn default_active() -> bool {
    true
}

const CAR_LIST_ORDER: &str = "write_date desc";

/// Embedded many2one / one2many target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ref {
    pub id: i64,
    #[serde(default)]
    pub name: Translations,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Brand {
    pub id: i64,
    #[serde(default)]
    pub name: Translations,
    #[serde(default)]
    pub description: Translations,
    #[serde(default, deserialize_with = "falsy")]
    pub slug: Option<String>,
    /// Base64 image content.
    #[serde(default, deserialize_with = "falsy")]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub display_name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, deserialize_with = "falsy")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub write_date: Option<String>,
    #[serde(default, deserialize_with = "falsy_vec")]
    pub model_ids: Vec<Ref>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CarModel {
    pub id: i64,
    #[serde(default)]
    pub name: Translations,
    #[serde(default)]
    pub description: Translations,
    #[serde(default, deserialize_with = "falsy")]
    pub display_name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, deserialize_with = "falsy")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub write_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub brand_id: Option<Ref>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Trim {
    pub id: i64,
    #[serde(default)]
    pub name: Translations,
    #[serde(default)]
    pub description: Translations,
    #[serde(default, deserialize_with = "falsy")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub display_name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, deserialize_with = "falsy")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub write_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub model_id: Option<Ref>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Color {
    pub id: i64,
    #[serde(default)]
    pub name: Translations,
    #[serde(default)]
    pub description: Translations,
    #[serde(default, deserialize_with = "falsy")]
    pub code: Option<String>,
    /// `#RRGGBB` swatch.
    #[serde(default, deserialize_with = "falsy")]
    pub color_picker: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub display_name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, deserialize_with = "falsy")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub write_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Year {
    pub id: i64,
    #[serde(default)]
    pub name: Translations,
    #[serde(default)]
    pub description: Translations,
    #[serde(default, deserialize_with = "falsy")]
    pub display_name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, deserialize_with = "falsy")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub write_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Variant {
    pub id: i64,
    #[serde(default)]
    pub name: Translations,
    #[serde(default)]
    pub description: Translations,
    #[serde(default, deserialize_with = "falsy")]
    pub display_name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub reserved_quantity: i64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub price_with_vat: f64,
    #[serde(default, deserialize_with = "falsy")]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub barcode: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub write_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub car_id: Option<Ref>,
    #[serde(default, deserialize_with = "falsy")]
    pub color_id: Option<Ref>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Car {
    pub id: i64,
    #[serde(default)]
    pub name: Translations,
    #[serde(default)]
    pub description: Translations,
    #[serde(default, deserialize_with = "falsy")]
    pub display_name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    /// `draft`, `published`, `out_of_stock`, `discontinued` or `coming_soon`.
    #[serde(default, deserialize_with = "falsy")]
    pub status: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub sequence: i64,
    #[serde(default)]
    pub cash_price: f64,
    #[serde(default)]
    pub cash_price_with_vat: f64,
    #[serde(default)]
    pub finance_price: f64,
    #[serde(default)]
    pub vat_percentage: f64,
    #[serde(default)]
    pub specification_completion: f64,
    #[serde(default)]
    pub has_active_offer: bool,
    #[serde(default, deserialize_with = "falsy")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub write_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub brand_id: Option<Ref>,
    #[serde(default, deserialize_with = "falsy")]
    pub model_id: Option<Ref>,
    #[serde(default, deserialize_with = "falsy")]
    pub trim_id: Option<Ref>,
    #[serde(default, deserialize_with = "falsy")]
    pub year_id: Option<Ref>,
    #[serde(default, deserialize_with = "falsy")]
    pub primary_color_id: Option<Ref>,
    #[serde(default, deserialize_with = "falsy_vec")]
    pub color_ids: Vec<Ref>,
}

/// Groups specification attributes, e.g. "Engine" or "Safety".
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpecCategory {
    pub id: i64,
    #[serde(default)]
    pub name: Translations,
    #[serde(default)]
    pub description: Translations,
    #[serde(default, deserialize_with = "falsy")]
    pub display_name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub sequence: i64,
    #[serde(default, deserialize_with = "falsy")]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_website_visible: bool,
    #[serde(default)]
    pub is_information_category: bool,
    #[serde(default)]
    pub attribute_count: i64,
    #[serde(default, deserialize_with = "falsy")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub write_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpecUnit {
    pub id: i64,
    #[serde(default)]
    pub name: Translations,
    #[serde(default)]
    pub description: Translations,
    #[serde(default, deserialize_with = "falsy")]
    pub display_name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, deserialize_with = "falsy")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub category: Option<String>,
    #[serde(default)]
    pub conversion_factor: f64,
    #[serde(default, deserialize_with = "falsy")]
    pub display_position: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub write_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpecAttribute {
    pub id: i64,
    #[serde(default)]
    pub name: Translations,
    #[serde(default)]
    pub description: Translations,
    #[serde(default, deserialize_with = "falsy")]
    pub display_name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, deserialize_with = "falsy")]
    pub display_type: Option<String>,
    #[serde(default)]
    pub sequence: i64,
    #[serde(default)]
    pub is_filterable: bool,
    #[serde(default)]
    pub is_key_attribute: bool,
    #[serde(default, deserialize_with = "falsy")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub write_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub spec_category_id: Option<Ref>,
    #[serde(default, deserialize_with = "falsy_vec")]
    pub value_ids: Vec<Ref>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpecValue {
    pub id: i64,
    #[serde(default)]
    pub name: Translations,
    #[serde(default)]
    pub description: Translations,
    #[serde(default, deserialize_with = "falsy")]
    pub display_name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub sequence: i64,
    #[serde(default, deserialize_with = "falsy")]
    pub html_color: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default, deserialize_with = "falsy")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub write_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub attribute_id: Option<Ref>,
    #[serde(default, deserialize_with = "falsy")]
    pub unit_id: Option<Ref>,
}

/// One attribute slot of a specification template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemplateLine {
    pub id: i64,
    #[serde(default)]
    pub sequence: i64,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default = "default_active")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_filterable: bool,
    #[serde(default, deserialize_with = "falsy")]
    pub placeholder: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub help_text: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub attribute_id: Option<Ref>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpecTemplate {
    pub id: i64,
    #[serde(default)]
    pub name: Translations,
    #[serde(default)]
    pub description: Translations,
    #[serde(default, deserialize_with = "falsy")]
    pub display_name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub sequence: i64,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub website_visible: bool,
    #[serde(default, deserialize_with = "falsy")]
    pub display_style: Option<String>,
    #[serde(default)]
    pub category_count: i64,
    #[serde(default, deserialize_with = "falsy")]
    pub create_date: Option<String>,
    #[serde(default, deserialize_with = "falsy")]
    pub write_date: Option<String>,
    #[serde(default, deserialize_with = "falsy_vec")]
    pub specification_line_ids: Vec<TemplateLine>,
}

macro_rules! impl_entity {
    (
        $ty:ty,
        $form:ty,
        $root:literal,
        $label:literal,
        [$list:path, $get:path, $create:path, $update:path, $deactivate:path]
        $(, { $($extra:item)* })?
    ) => {
        impl Entity for $ty {
            const ROOT: &'static str = $root;
            const LABEL: &'static str = $label;
            const LIST: &'static str = $list;
            const GET: &'static str = $get;
            const CREATE: &'static str = $create;
            const UPDATE: &'static str = $update;
            const DEACTIVATE: &'static str = $deactivate;

            type Form = $form;

            fn id(&self) -> i64 {
                self.id
            }

            fn name(&self) -> &Translations {
                &self.name
            }

            fn display_name(&self) -> Option<&str> {
                self.display_name.as_deref()
            }

            fn is_active(&self) -> bool {
                self.active
            }

            fn set_active(&mut self, active: bool) {
                self.active = active;
            }

            $($($extra)*)?
        }
    };
}

impl_entity!(
    Brand,
    BrandForm,
    "CarBrand",
    "Brand",
    [
        documents::GET_CAR_BRANDS,
        documents::GET_CAR_BRAND_BY_ID,
        documents::CREATE_CAR_BRAND,
        documents::UPDATE_CAR_BRAND,
        documents::DEACTIVATE_CAR_BRAND
    ]
);

impl_entity!(
    CarModel,
    ModelForm,
    "CarModel",
    "Model",
    [
        documents::GET_CAR_MODELS,
        documents::GET_CAR_MODEL_BY_ID,
        documents::CREATE_CAR_MODEL,
        documents::UPDATE_CAR_MODEL,
        documents::DEACTIVATE_CAR_MODEL
    ]
);

impl_entity!(
    Trim,
    TrimForm,
    "CarTrim",
    "Trim",
    [
        documents::GET_CAR_TRIMS,
        documents::GET_CAR_TRIM_BY_ID,
        documents::CREATE_CAR_TRIM,
        documents::UPDATE_CAR_TRIM,
        documents::DEACTIVATE_CAR_TRIM
    ]
);

impl_entity!(
    Color,
    ColorForm,
    "CarColor",
    "Color",
    [
        documents::GET_CAR_COLORS,
        documents::GET_CAR_COLOR_BY_ID,
        documents::CREATE_CAR_COLOR,
        documents::UPDATE_CAR_COLOR,
        documents::DEACTIVATE_CAR_COLOR
    ]
);

impl_entity!(
    Year,
    YearForm,
    "CarYear",
    "Year",
    [
        documents::GET_CAR_YEARS,
        documents::GET_CAR_YEAR_BY_ID,
        documents::CREATE_CAR_YEAR,
        documents::UPDATE_CAR_YEAR,
        documents::DEACTIVATE_CAR_YEAR
    ]
);

impl_entity!(
    Variant,
    VariantForm,
    "AlromaihCarVariant",
    "Variant",
    [
        documents::GET_CAR_VARIANTS,
        documents::GET_CAR_VARIANT_BY_ID,
        documents::CREATE_CAR_VARIANT,
        documents::UPDATE_CAR_VARIANT,
        documents::DEACTIVATE_CAR_VARIANT
    ],
    {
        // Variant documents declare `$id: Int!`.
        fn id_variable(id: i64) -> Value {
            Value::from(id)
        }
    }
);

impl_entity!(
    Car,
    CarForm,
    "AlromaihCar",
    "Car",
    [
        documents::GET_CARS,
        documents::GET_CAR_BY_ID,
        documents::CREATE_CAR,
        documents::UPDATE_CAR,
        documents::DEACTIVATE_CAR
    ],
    {
        fn id_variable(id: i64) -> Value {
            Value::from(id)
        }

        /// Cars push active/status/brand/model filters to the server and
        /// come back most recently updated first.
        fn list_variables(filter: &ListFilter) -> Map<String, Value> {
            let mut domain = Domain::new();
            if !filter.include_inactive {
                domain = domain.term("active", "=", true);
            }
            if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
                domain = domain.term("status", "=", status);
            }
            if let Some(brand_id) = filter.brand_id {
                domain = domain.term("brand_id", "=", brand_id);
            }
            if let Some(model_id) = filter.model_id {
                domain = domain.term("model_id", "=", model_id);
            }
            let mut vars = Map::new();
            vars.insert("domain".into(), domain.into_value());
            vars.insert("order".into(), Value::from(CAR_LIST_ORDER));
            vars
        }
    }
);

impl_entity!(
    SpecCategory,
    SpecCategoryForm,
    "ProductAttributeCategory",
    "Specification category",
    [
        documents::GET_SPEC_CATEGORIES,
        documents::GET_SPEC_CATEGORY_BY_ID,
        documents::CREATE_SPEC_CATEGORY,
        documents::UPDATE_SPEC_CATEGORY,
        documents::DEACTIVATE_SPEC_CATEGORY
    ]
);

impl_entity!(
    SpecUnit,
    SpecUnitForm,
    "ProductAttributeUnit",
    "Unit",
    [
        documents::GET_SPEC_UNITS,
        documents::GET_SPEC_UNIT_BY_ID,
        documents::CREATE_SPEC_UNIT,
        documents::UPDATE_SPEC_UNIT,
        documents::DEACTIVATE_SPEC_UNIT
    ]
);

impl_entity!(
    SpecAttribute,
    SpecAttributeForm,
    "ProductAttribute",
    "Attribute",
    [
        documents::GET_SPEC_ATTRIBUTES,
        documents::GET_SPEC_ATTRIBUTE_BY_ID,
        documents::CREATE_SPEC_ATTRIBUTE,
        documents::UPDATE_SPEC_ATTRIBUTE,
        documents::DEACTIVATE_SPEC_ATTRIBUTE
    ]
);

impl_entity!(
    SpecValue,
    SpecValueForm,
    "ProductAttributeValue",
    "Attribute value",
    [
        documents::GET_SPEC_VALUES,
        documents::GET_SPEC_VALUE_BY_ID,
        documents::CREATE_SPEC_VALUE,
        documents::UPDATE_SPEC_VALUE,
        documents::DEACTIVATE_SPEC_VALUE
    ]
);

impl_entity!(
    SpecTemplate,
    SpecTemplateForm,
    "AlromaihCarSpecificationTemplate",
    "Specification template",
    [
        documents::GET_SPEC_TEMPLATES,
        documents::GET_SPEC_TEMPLATE_BY_ID,
        documents::CREATE_SPEC_TEMPLATE,
        documents::UPDATE_SPEC_TEMPLATE,
        documents::DEACTIVATE_SPEC_TEMPLATE
    ]
);
