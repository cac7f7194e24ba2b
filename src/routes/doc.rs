use utoipa::{
    Modify, OpenApi,
    openapi::{
        self, OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        entities::{
            BrandForm, CarForm, CarStatus, ColorForm, ModelForm, TrimForm, VariantForm, YearForm,
        },
        media::ImageUploadRequest,
        settings::{ApiProfile, HeaderEntry, SaveApiProfileRequest},
        specifications::{
            DisplayStyle, SpecAttributeForm, SpecCategoryForm, SpecTemplateForm, SpecUnitForm,
            SpecValueForm, TemplateLineForm,
        },
    },
    graphql::{ConfigReport, ConnectionReport, GraphQLErrorItem, GraphQLRequest},
    i18n::{FormState, Lang, Translations},
    models::{
        Brand, Car, CarModel, Color, Ref, SpecAttribute, SpecCategory, SpecTemplate, SpecUnit,
        SpecValue, TemplateLine, Trim, Variant, Year,
    },
    response::{ApiResponse, Meta},
    routes::{
        entities::{
            self, brands, cars, colors, models,
            specifications::{attributes, categories, templates, units, values},
            trims, variants, years,
        },
        graphql, health, params, settings,
    },
};

/// Documents the upstream key header; browsers never send it.
struct UpstreamKeyAddon;

impl Modify for UpstreamKeyAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "upstream_api_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-KEY"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        graphql::proxy_graphql,
        brands::list,
        brands::get_one,
        brands::create,
        brands::update,
        brands::deactivate,
        entities::upload_brand_logo,
        models::list,
        models::get_one,
        models::create,
        models::update,
        models::deactivate,
        trims::list,
        trims::get_one,
        trims::create,
        trims::update,
        trims::deactivate,
        colors::list,
        colors::get_one,
        colors::create,
        colors::update,
        colors::deactivate,
        years::list,
        years::get_one,
        years::create,
        years::update,
        years::deactivate,
        variants::list,
        variants::get_one,
        variants::create,
        variants::update,
        variants::deactivate,
        cars::list,
        cars::get_one,
        cars::create,
        cars::update,
        cars::deactivate,
        categories::list,
        categories::get_one,
        categories::create,
        categories::update,
        categories::deactivate,
        units::list,
        units::get_one,
        units::create,
        units::update,
        units::deactivate,
        attributes::list,
        attributes::get_one,
        attributes::create,
        attributes::update,
        attributes::deactivate,
        values::list,
        values::get_one,
        values::create,
        values::update,
        values::deactivate,
        templates::list,
        templates::get_one,
        templates::create,
        templates::update,
        templates::deactivate,
        settings::get_api_config,
        settings::save_api_config,
        settings::clear_api_config,
        settings::test_api_config,
        settings::gateway_report
    ),
    components(
        schemas(
            Brand,
            CarModel,
            Trim,
            Color,
            Year,
            Variant,
            Car,
            SpecCategory,
            SpecUnit,
            SpecAttribute,
            SpecValue,
            SpecTemplate,
            TemplateLine,
            Ref,
            Translations,
            FormState,
            Lang,
            BrandForm,
            ModelForm,
            TrimForm,
            ColorForm,
            YearForm,
            VariantForm,
            CarForm,
            CarStatus,
            SpecCategoryForm,
            SpecUnitForm,
            SpecAttributeForm,
            SpecValueForm,
            SpecTemplateForm,
            TemplateLineForm,
            DisplayStyle,
            ImageUploadRequest,
            GraphQLRequest,
            GraphQLErrorItem,
            ApiProfile,
            HeaderEntry,
            SaveApiProfileRequest,
            ConnectionReport,
            ConfigReport,
            params::SortOrder,
            health::HealthData,
            Meta,
            ApiResponse<Brand>,
            ApiResponse<ApiProfile>
        )
    ),
    modifiers(&UpstreamKeyAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "GraphQL", description = "Key-holding proxy to the Odoo GraphQL endpoint"),
        (name = "Brands", description = "Car brands"),
        (name = "Models", description = "Car models"),
        (name = "Trims", description = "Car trims"),
        (name = "Colors", description = "Car colors"),
        (name = "Years", description = "Model years"),
        (name = "Variants", description = "Sellable variants"),
        (name = "Cars", description = "Cars, filtered upstream by status, brand and model"),
        (name = "Specifications", description = "Specification categories, units, attributes, values and templates"),
        (name = "Settings", description = "API testing profile and gateway report"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
