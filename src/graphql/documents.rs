//! GraphQL documents for the dealership catalogue.
//!
//! Translatable fields carry `@multiLang` so the server returns a
//! `{lang: text}` map instead of the current-language string. Deactivation
//! is a plain update that only sets `active: false`. Specification
//! models keep untranslated names and are read without `@multiLang`.

macro_rules! brand_fields {
    () => {
        "id name @multiLang description @multiLang slug logo display_name active create_date write_date model_ids { id name @multiLang }"
    };
}

macro_rules! model_fields {
    () => {
        "id name @multiLang description @multiLang display_name active create_date write_date brand_id { id name @multiLang }"
    };
}

macro_rules! trim_fields {
    () => {
        "id name @multiLang description @multiLang code display_name active create_date write_date model_id { id name @multiLang }"
    };
}

macro_rules! color_fields {
    () => {
        "id name @multiLang description @multiLang code color_picker display_name active create_date write_date"
    };
}

macro_rules! year_fields {
    () => {
        "id name @multiLang description @multiLang display_name active create_date write_date"
    };
}

macro_rules! variant_fields {
    () => {
        "id name @multiLang description @multiLang display_name active is_primary stock_quantity reserved_quantity price price_with_vat sku barcode create_date write_date car_id { id name @multiLang } color_id { id name @multiLang }"
    };
}

macro_rules! car_fields {
    () => {
        "id name @multiLang description @multiLang display_name cash_price cash_price_with_vat finance_price vat_percentage status active is_featured sequence specification_completion has_active_offer create_date write_date brand_id { id name @multiLang } model_id { id name @multiLang } trim_id { id name @multiLang } year_id { id name @multiLang } primary_color_id { id name @multiLang } color_ids { id name @multiLang }"
    };
}

macro_rules! spec_category_fields {
    () => {
        "id name description display_name active sequence icon is_website_visible is_information_category attribute_count create_date write_date"
    };
}

macro_rules! spec_unit_fields {
    () => {
        "id name description display_name active code category conversion_factor display_position create_date write_date"
    };
}

macro_rules! spec_attribute_fields {
    () => {
        "id name description display_name active display_type sequence is_filterable is_key_attribute create_date write_date spec_category_id { id name } value_ids { id name }"
    };
}

macro_rules! spec_value_fields {
    () => {
        "id name display_name active sequence html_color is_custom create_date write_date attribute_id { id name } unit_id { id name }"
    };
}

macro_rules! spec_template_fields {
    () => {
        "id name description display_name active sequence is_default website_visible display_style category_count create_date write_date specification_line_ids { id sequence is_required is_visible is_filterable placeholder help_text attribute_id { id name } }"
    };
}

/// Query/get/create/update/deactivate documents for a model whose id is
/// `$id_type` and whose write input is `<Root>Values`.
macro_rules! crud_documents {
    (
        $root:literal,
        $id_type:literal,
        $fields:ident,
        $list:ident = $list_op:literal,
        $get:ident = $get_op:literal,
        $create:ident = $create_op:literal,
        $update:ident = $update_op:literal,
        $deactivate:ident = $deactivate_op:literal
    ) => {
        pub const $list: &str = concat!("query ", $list_op, " { ", $root, " { ", $fields!(), " } }");
        pub const $get: &str = concat!(
            "query ", $get_op, "($id: ", $id_type, ") { ", $root, "(id: $id) { ",
            $fields!(),
            " } }"
        );
        pub const $create: &str = concat!(
            "mutation ", $create_op, "($values: ", $root, "Values!) { ", $root, "(", $root, "Values: $values) { ",
            $fields!(),
            " } }"
        );
        pub const $update: &str = concat!(
            "mutation ", $update_op, "($id: ", $id_type, ", $values: ", $root, "Values!) { ", $root,
            "(id: $id, ", $root, "Values: $values) { ",
            $fields!(),
            " } }"
        );
        pub const $deactivate: &str = concat!(
            "mutation ", $deactivate_op, "($id: ", $id_type, ") { ", $root, "(id: $id, ", $root,
            "Values: { active: false }) { ",
            $fields!(),
            " } }"
        );
    };
}

pub const GET_CAR_BRANDS: &str = concat!("query GetCarBrands { CarBrand { ", brand_fields!(), " } }");
pub const GET_CAR_BRAND_BY_ID: &str = concat!(
    "query GetCarBrandById($id: String!) { CarBrand(id: $id) { ",
    brand_fields!(),
    " } }"
);
pub const CREATE_CAR_BRAND: &str = concat!(
    "mutation CreateCarBrand($values: CarBrandValues!) { CarBrand(CarBrandValues: $values) { ",
    brand_fields!(),
    " } }"
);
pub const UPDATE_CAR_BRAND: &str = concat!(
    "mutation UpdateCarBrand($id: String!, $values: CarBrandValues!) { CarBrand(id: $id, CarBrandValues: $values) { ",
    brand_fields!(),
    " } }"
);
pub const DEACTIVATE_CAR_BRAND: &str = concat!(
    "mutation DeactivateCarBrand($id: String!) { CarBrand(id: $id, CarBrandValues: { active: false }) { ",
    brand_fields!(),
    " } }"
);
pub const UPLOAD_CAR_BRAND_LOGO: &str = concat!(
    "mutation UploadCarBrandLogo($id: String!, $logo: String!) { CarBrand(id: $id, CarBrandValues: { logo: $logo }) { ",
    brand_fields!(),
    " } }"
);

pub const GET_CAR_MODELS: &str = concat!("query GetCarModels { CarModel { ", model_fields!(), " } }");
pub const GET_CAR_MODEL_BY_ID: &str = concat!(
    "query GetCarModelById($id: String!) { CarModel(id: $id) { ",
    model_fields!(),
    " } }"
);
pub const CREATE_CAR_MODEL: &str = concat!(
    "mutation CreateCarModel($values: CarModelValues!) { CarModel(CarModelValues: $values) { ",
    model_fields!(),
    " } }"
);
pub const UPDATE_CAR_MODEL: &str = concat!(
    "mutation UpdateCarModel($id: String!, $values: CarModelValues!) { CarModel(id: $id, CarModelValues: $values) { ",
    model_fields!(),
    " } }"
);
pub const DEACTIVATE_CAR_MODEL: &str = concat!(
    "mutation DeactivateCarModel($id: String!) { CarModel(id: $id, CarModelValues: { active: false }) { ",
    model_fields!(),
    " } }"
);

pub const GET_CAR_TRIMS: &str = concat!("query GetCarTrims { CarTrim { ", trim_fields!(), " } }");
pub const GET_CAR_TRIM_BY_ID: &str = concat!(
    "query GetCarTrimById($id: String!) { CarTrim(id: $id) { ",
    trim_fields!(),
    " } }"
);
pub const CREATE_CAR_TRIM: &str = concat!(
    "mutation CreateCarTrim($values: CarTrimValues!) { CarTrim(CarTrimValues: $values) { ",
    trim_fields!(),
    " } }"
);
pub const UPDATE_CAR_TRIM: &str = concat!(
    "mutation UpdateCarTrim($id: String!, $values: CarTrimValues!) { CarTrim(id: $id, CarTrimValues: $values) { ",
    trim_fields!(),
    " } }"
);
pub const DEACTIVATE_CAR_TRIM: &str = concat!(
    "mutation DeactivateCarTrim($id: String!) { CarTrim(id: $id, CarTrimValues: { active: false }) { ",
    trim_fields!(),
    " } }"
);

pub const GET_CAR_COLORS: &str = concat!("query GetCarColors { CarColor { ", color_fields!(), " } }");
pub const GET_CAR_COLOR_BY_ID: &str = concat!(
    "query GetCarColorById($id: String!) { CarColor(id: $id) { ",
    color_fields!(),
    " } }"
);
pub const CREATE_CAR_COLOR: &str = concat!(
    "mutation CreateCarColor($values: CarColorValues!) { CarColor(CarColorValues: $values) { ",
    color_fields!(),
    " } }"
);
pub const UPDATE_CAR_COLOR: &str = concat!(
    "mutation UpdateCarColor($id: String!, $values: CarColorValues!) { CarColor(id: $id, CarColorValues: $values) { ",
    color_fields!(),
    " } }"
);
pub const DEACTIVATE_CAR_COLOR: &str = concat!(
    "mutation DeactivateCarColor($id: String!) { CarColor(id: $id, CarColorValues: { active: false }) { ",
    color_fields!(),
    " } }"
);

pub const GET_CAR_YEARS: &str = concat!("query GetCarYears { CarYear { ", year_fields!(), " } }");
pub const GET_CAR_YEAR_BY_ID: &str = concat!(
    "query GetCarYearById($id: String!) { CarYear(id: $id) { ",
    year_fields!(),
    " } }"
);
pub const CREATE_CAR_YEAR: &str = concat!(
    "mutation CreateCarYear($values: CarYearValues!) { CarYear(CarYearValues: $values) { ",
    year_fields!(),
    " } }"
);
pub const UPDATE_CAR_YEAR: &str = concat!(
    "mutation UpdateCarYear($id: String!, $values: CarYearValues!) { CarYear(id: $id, CarYearValues: $values) { ",
    year_fields!(),
    " } }"
);
pub const DEACTIVATE_CAR_YEAR: &str = concat!(
    "mutation DeactivateCarYear($id: String!) { CarYear(id: $id, CarYearValues: { active: false }) { ",
    year_fields!(),
    " } }"
);

pub const GET_CAR_VARIANTS: &str = concat!(
    "query GetCarVariants { AlromaihCarVariant { ",
    variant_fields!(),
    " } }"
);
pub const GET_CAR_VARIANT_BY_ID: &str = concat!(
    "query GetCarVariantById($id: Int!) { AlromaihCarVariant(id: $id) { ",
    variant_fields!(),
    " } }"
);
pub const CREATE_CAR_VARIANT: &str = concat!(
    "mutation CreateCarVariant($values: AlromaihCarVariantValues!) { AlromaihCarVariant(AlromaihCarVariantValues: $values) { ",
    variant_fields!(),
    " } }"
);
pub const UPDATE_CAR_VARIANT: &str = concat!(
    "mutation UpdateCarVariant($id: Int!, $values: AlromaihCarVariantValues!) { AlromaihCarVariant(id: $id, AlromaihCarVariantValues: $values) { ",
    variant_fields!(),
    " } }"
);
pub const DEACTIVATE_CAR_VARIANT: &str = concat!(
    "mutation DeactivateCarVariant($id: Int!) { AlromaihCarVariant(id: $id, AlromaihCarVariantValues: { active: false }) { ",
    variant_fields!(),
    " } }"
);

/// Cars are filtered upstream: `$domain` carries Odoo search terms and
/// `$order` the sort, e.g. `write_date desc`.
pub const GET_CARS: &str = concat!(
    "query GetCars($domain: [String], $order: String) { AlromaihCar(domain: $domain, order: $order) { ",
    car_fields!(),
    " } }"
);
pub const GET_CAR_BY_ID: &str = concat!(
    "query GetCarById($id: Int!) { AlromaihCar(id: $id) { ",
    car_fields!(),
    " } }"
);
pub const CREATE_CAR: &str = concat!(
    "mutation CreateCar($values: AlromaihCarValues!) { AlromaihCar(AlromaihCarValues: $values) { ",
    car_fields!(),
    " } }"
);
pub const UPDATE_CAR: &str = concat!(
    "mutation UpdateCar($id: Int!, $values: AlromaihCarValues!) { AlromaihCar(id: $id, AlromaihCarValues: $values) { ",
    car_fields!(),
    " } }"
);
pub const DEACTIVATE_CAR: &str = concat!(
    "mutation DeactivateCar($id: Int!) { AlromaihCar(id: $id, AlromaihCarValues: { active: false }) { ",
    car_fields!(),
    " } }"
);

crud_documents!(
    "ProductAttributeCategory",
    "String!",
    spec_category_fields,
    GET_SPEC_CATEGORIES = "GetProductAttributeCategories",
    GET_SPEC_CATEGORY_BY_ID = "GetProductAttributeCategoryById",
    CREATE_SPEC_CATEGORY = "CreateProductAttributeCategory",
    UPDATE_SPEC_CATEGORY = "UpdateProductAttributeCategory",
    DEACTIVATE_SPEC_CATEGORY = "DeactivateProductAttributeCategory"
);

crud_documents!(
    "ProductAttributeUnit",
    "String!",
    spec_unit_fields,
    GET_SPEC_UNITS = "GetProductAttributeUnits",
    GET_SPEC_UNIT_BY_ID = "GetProductAttributeUnitById",
    CREATE_SPEC_UNIT = "CreateProductAttributeUnit",
    UPDATE_SPEC_UNIT = "UpdateProductAttributeUnit",
    DEACTIVATE_SPEC_UNIT = "DeactivateProductAttributeUnit"
);

crud_documents!(
    "ProductAttribute",
    "String!",
    spec_attribute_fields,
    GET_SPEC_ATTRIBUTES = "GetProductAttributes",
    GET_SPEC_ATTRIBUTE_BY_ID = "GetProductAttributeById",
    CREATE_SPEC_ATTRIBUTE = "CreateProductAttribute",
    UPDATE_SPEC_ATTRIBUTE = "UpdateProductAttribute",
    DEACTIVATE_SPEC_ATTRIBUTE = "DeactivateProductAttribute"
);

crud_documents!(
    "ProductAttributeValue",
    "String!",
    spec_value_fields,
    GET_SPEC_VALUES = "GetProductAttributeValues",
    GET_SPEC_VALUE_BY_ID = "GetProductAttributeValueById",
    CREATE_SPEC_VALUE = "CreateProductAttributeValue",
    UPDATE_SPEC_VALUE = "UpdateProductAttributeValue",
    DEACTIVATE_SPEC_VALUE = "DeactivateProductAttributeValue"
);

crud_documents!(
    "AlromaihCarSpecificationTemplate",
    "String!",
    spec_template_fields,
    GET_SPEC_TEMPLATES = "GetSpecificationTemplates",
    GET_SPEC_TEMPLATE_BY_ID = "GetSpecificationTemplateById",
    CREATE_SPEC_TEMPLATE = "CreateSpecificationTemplate",
    UPDATE_SPEC_TEMPLATE = "UpdateSpecificationTemplate",
    DEACTIVATE_SPEC_TEMPLATE = "DeactivateSpecificationTemplate"
);
