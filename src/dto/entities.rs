use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::i18n::FormState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

/// Edit payload for one entity type, converted into the server's
/// `*Values` input object.
pub trait EntityForm: DeserializeOwned + Send + Sync + 'static {
    fn to_values(&self, mode: FormMode) -> Result<Map<String, Value>, String>;
}

/// Name/description/active handling shared by every form. Creation needs
/// a name in at least one language and defaults to active.
pub(crate) fn base_values(
    name: Option<&FormState>,
    description: Option<&FormState>,
    active: Option<bool>,
    mode: FormMode,
) -> Result<Map<String, Value>, String> {
    let mut values = Map::new();

    match (name, mode) {
        (Some(name), _) => name.require("Name")?,
        (None, FormMode::Create) => {
            return Err("Name is required in at least one language (English or Arabic)".into());
        }
        (None, FormMode::Update) => {}
    }

    for (key, field) in [("name_translations", name), ("description_translations", description)] {
        if let Some(payload) = field.map(FormState::to_wire_payload).filter(|p| !p.is_empty()) {
            values.insert(key.to_string(), serde_json::to_value(payload).map_err(|e| e.to_string())?);
        }
    }

    match (active, mode) {
        (Some(active), _) => {
            values.insert("active".into(), Value::Bool(active));
        }
        (None, FormMode::Create) => {
            values.insert("active".into(), Value::Bool(true));
        }
        (None, FormMode::Update) => {}
    }

    Ok(values)
}

pub(crate) fn put_text(values: &mut Map<String, Value>, key: &str, text: &Option<String>) {
    if let Some(text) = text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        values.insert(key.to_string(), Value::String(text.to_string()));
    }
}

pub(crate) fn require_ref(
    values: &mut Map<String, Value>,
    key: &str,
    id: Option<i64>,
    mode: FormMode,
    label: &str,
) -> Result<(), String> {
    match (id, mode) {
        (Some(id), _) if id > 0 => {
            values.insert(key.to_string(), Value::from(id));
            Ok(())
        }
        (Some(_), _) => Err(format!("{label} id must be positive")),
        (None, FormMode::Create) => Err(format!("{label} is required")),
        (None, FormMode::Update) => Ok(()),
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BrandForm {
    pub name: Option<FormState>,
    pub description: Option<FormState>,
    pub slug: Option<String>,
    pub active: Option<bool>,
}

impl EntityForm for BrandForm {
    fn to_values(&self, mode: FormMode) -> Result<Map<String, Value>, String> {
        let mut values = base_values(self.name.as_ref(), self.description.as_ref(), self.active, mode)?;
        put_text(&mut values, "slug", &self.slug);
        Ok(values)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ModelForm {
    pub name: Option<FormState>,
    pub description: Option<FormState>,
    pub brand_id: Option<i64>,
    pub active: Option<bool>,
}

impl EntityForm for ModelForm {
    fn to_values(&self, mode: FormMode) -> Result<Map<String, Value>, String> {
        let mut values = base_values(self.name.as_ref(), self.description.as_ref(), self.active, mode)?;
        require_ref(&mut values, "brand_id", self.brand_id, mode, "Brand")?;
        Ok(values)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TrimForm {
    pub name: Option<FormState>,
    pub description: Option<FormState>,
    pub model_id: Option<i64>,
    pub code: Option<String>,
    pub active: Option<bool>,
}

impl EntityForm for TrimForm {
    fn to_values(&self, mode: FormMode) -> Result<Map<String, Value>, String> {
        let mut values = base_values(self.name.as_ref(), self.description.as_ref(), self.active, mode)?;
        require_ref(&mut values, "model_id", self.model_id, mode, "Model")?;
        put_text(&mut values, "code", &self.code);
        Ok(values)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ColorForm {
    pub name: Option<FormState>,
    pub description: Option<FormState>,
    pub code: Option<String>,
    pub color_picker: Option<String>,
    pub active: Option<bool>,
}

pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl EntityForm for ColorForm {
    fn to_values(&self, mode: FormMode) -> Result<Map<String, Value>, String> {
        if let Some(hex) = self.color_picker.as_deref().map(str::trim).filter(|h| !h.is_empty()) {
            if !is_hex_color(hex) {
                return Err(format!("Invalid color value {hex}, expected #RRGGBB"));
            }
        }
        let mut values = base_values(self.name.as_ref(), self.description.as_ref(), self.active, mode)?;
        put_text(&mut values, "code", &self.code);
        put_text(&mut values, "color_picker", &self.color_picker);
        Ok(values)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct YearForm {
    pub name: Option<FormState>,
    pub description: Option<FormState>,
    pub active: Option<bool>,
}

pub const MIN_YEAR: u16 = 1900;
pub const MAX_YEAR: u16 = 2100;

/// A model year is exactly four digits within [`MIN_YEAR`, `MAX_YEAR`].
pub fn validate_year(text: &str) -> Result<u16, String> {
    let text = text.trim();
    if text.len() != 4 || !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("Year must be a 4-digit number, got \"{text}\""));
    }
    let year: u16 = text.parse().map_err(|_| format!("Invalid year \"{text}\""))?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(format!("Year must be between {MIN_YEAR} and {MAX_YEAR}"));
    }
    Ok(year)
}

impl EntityForm for YearForm {
    /// The English name is the year itself; the Arabic name is free text
    /// and may use Arabic-Indic digits.
    fn to_values(&self, mode: FormMode) -> Result<Map<String, Value>, String> {
        match (&self.name, mode) {
            (Some(name), _) => {
                if name.en_us.trim().is_empty() {
                    return Err("Year is required in English".into());
                }
                validate_year(&name.en_us)?;
            }
            (None, FormMode::Create) => return Err("Year is required in English".into()),
            (None, FormMode::Update) => {}
        }
        base_values(self.name.as_ref(), self.description.as_ref(), self.active, mode)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct VariantForm {
    pub name: Option<FormState>,
    pub description: Option<FormState>,
    pub car_id: Option<i64>,
    pub color_id: Option<i64>,
    pub is_primary: Option<bool>,
    pub stock_quantity: Option<i64>,
    pub reserved_quantity: Option<i64>,
    pub price: Option<f64>,
    pub price_with_vat: Option<f64>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub active: Option<bool>,
}

impl EntityForm for VariantForm {
    fn to_values(&self, mode: FormMode) -> Result<Map<String, Value>, String> {
        // Variants are named after their car and color, so the name is optional.
        let name = self.name.as_ref().filter(|n| !n.is_blank());
        let mode_for_name = if name.is_none() { FormMode::Update } else { mode };
        let active = match mode {
            FormMode::Create => Some(self.active.unwrap_or(true)),
            FormMode::Update => self.active,
        };
        let mut values = base_values(name, self.description.as_ref(), active, mode_for_name)?;

        require_ref(&mut values, "car_id", self.car_id, mode, "Car")?;
        require_ref(&mut values, "color_id", self.color_id, mode, "Color")?;

        for (key, qty) in [
            ("stock_quantity", self.stock_quantity),
            ("reserved_quantity", self.reserved_quantity),
        ] {
            if let Some(qty) = qty {
                if qty < 0 {
                    return Err(format!("{key} cannot be negative"));
                }
                values.insert(key.into(), Value::from(qty));
            }
        }
        if let (Some(stock), Some(reserved)) = (self.stock_quantity, self.reserved_quantity) {
            if reserved > stock {
                return Err("reserved_quantity cannot exceed stock_quantity".into());
            }
        }

        for (key, price) in [("price", self.price), ("price_with_vat", self.price_with_vat)] {
            if let Some(price) = price {
                if !price.is_finite() || price < 0.0 {
                    return Err(format!("{key} must be a non-negative number"));
                }
                values.insert(key.into(), Value::from(price));
            }
        }

        if let Some(primary) = self.is_primary {
            values.insert("is_primary".into(), Value::Bool(primary));
        }
        put_text(&mut values, "sku", &self.sku);
        put_text(&mut values, "barcode", &self.barcode);
        Ok(values)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CarStatus {
    Draft,
    Published,
    OutOfStock,
    Discontinued,
    ComingSoon,
}

impl CarStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CarStatus::Draft => "draft",
            CarStatus::Published => "published",
            CarStatus::OutOfStock => "out_of_stock",
            CarStatus::Discontinued => "discontinued",
            CarStatus::ComingSoon => "coming_soon",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CarForm {
    pub name: Option<FormState>,
    pub description: Option<FormState>,
    pub brand_id: Option<i64>,
    pub model_id: Option<i64>,
    pub trim_id: Option<i64>,
    pub year_id: Option<i64>,
    pub primary_color_id: Option<i64>,
    /// Replaces the available colors.
    pub color_ids: Option<Vec<i64>>,
    pub cash_price: Option<f64>,
    pub finance_price: Option<f64>,
    pub vat_percentage: Option<f64>,
    pub status: Option<CarStatus>,
    pub is_featured: Option<bool>,
    pub sequence: Option<i64>,
    pub active: Option<bool>,
}

impl EntityForm for CarForm {
    fn to_values(&self, mode: FormMode) -> Result<Map<String, Value>, String> {
        let mut values = base_values(self.name.as_ref(), self.description.as_ref(), self.active, mode)?;

        require_ref(&mut values, "brand_id", self.brand_id, mode, "Brand")?;
        require_ref(&mut values, "model_id", self.model_id, mode, "Model")?;
        require_ref(&mut values, "year_id", self.year_id, mode, "Year")?;
        require_ref(&mut values, "trim_id", self.trim_id, FormMode::Update, "Trim")?;
        require_ref(&mut values, "primary_color_id", self.primary_color_id, FormMode::Update, "Primary color")?;

        if let Some(ids) = &self.color_ids {
            if ids.iter().any(|id| *id <= 0) {
                return Err("Color ids must be positive".into());
            }
            values.insert("color_ids".into(), Value::from(ids.clone()));
        }

        for (key, price) in [("cash_price", self.cash_price), ("finance_price", self.finance_price)] {
            if let Some(price) = price {
                if !price.is_finite() || price < 0.0 {
                    return Err(format!("{key} must be a non-negative number"));
                }
                values.insert(key.into(), Value::from(price));
            }
        }
        if let Some(vat) = self.vat_percentage {
            if !(0.0..=100.0).contains(&vat) {
                return Err("vat_percentage must be between 0 and 100".into());
            }
            values.insert("vat_percentage".into(), Value::from(vat));
        }

        if let Some(status) = self.status {
            values.insert("status".into(), Value::from(status.as_str()));
        }
        if let Some(featured) = self.is_featured {
            values.insert("is_featured".into(), Value::Bool(featured));
        }
        if let Some(sequence) = self.sequence {
            values.insert("sequence".into(), Value::from(sequence));
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn create_brand_omits_blank_arabic_and_defaults_active() {
        let form = BrandForm {
            name: Some(FormState::new("Toyota", "")),
            ..Default::default()
        };
        let values = form.to_values(FormMode::Create).unwrap();
        assert_eq!(
            Value::Object(values),
            json!({"name_translations": {"en_US": "Toyota"}, "active": true})
        );
    }

    #[test]
    fn create_requires_a_name() {
        let err = BrandForm::default().to_values(FormMode::Create).unwrap_err();
        assert!(err.contains("Name is required"));

        let form = BrandForm {
            name: Some(FormState::new("", " ")),
            ..Default::default()
        };
        assert!(form.to_values(FormMode::Create).is_err());
    }

    #[test]
    fn update_sends_only_changed_fields() {
        let form = BrandForm {
            slug: Some("toyota".into()),
            ..Default::default()
        };
        let values = form.to_values(FormMode::Update).unwrap();
        assert_eq!(Value::Object(values), json!({"slug": "toyota"}));
    }

    #[test]
    fn model_needs_brand_on_create_only() {
        let form = ModelForm {
            name: Some(FormState::new("Camry", "")),
            ..Default::default()
        };
        assert_eq!(form.to_values(FormMode::Create).unwrap_err(), "Brand is required");
        assert!(form.to_values(FormMode::Update).is_ok());
    }

    #[test]
    fn year_names_are_validated() {
        assert_eq!(validate_year("2024"), Ok(2024));
        assert!(validate_year("24").is_err());
        assert!(validate_year("1899").is_err());
        assert!(validate_year("20a4").is_err());

        let form = YearForm {
            name: Some(FormState::new("2101", "")),
            ..Default::default()
        };
        assert!(form.to_values(FormMode::Create).is_err());
    }

    #[test]
    fn year_accepts_arabic_digits_but_needs_an_english_year() {
        let form = YearForm {
            name: Some(FormState::new("2024", "٢٠٢٤")),
            ..Default::default()
        };
        let values = form.to_values(FormMode::Create).unwrap();
        assert_eq!(
            values["name_translations"],
            json!({"en_US": "2024", "ar_001": "٢٠٢٤"})
        );

        let arabic_only = YearForm {
            name: Some(FormState::new("", "2024")),
            ..Default::default()
        };
        assert_eq!(
            arabic_only.to_values(FormMode::Create).unwrap_err(),
            "Year is required in English"
        );
        assert!(arabic_only.to_values(FormMode::Update).is_err());
        assert!(YearForm::default().to_values(FormMode::Create).is_err());
        assert!(YearForm::default().to_values(FormMode::Update).is_ok());
    }

    #[test]
    fn color_picker_must_be_hex() {
        let form = ColorForm {
            name: Some(FormState::new("Pearl White", "")),
            color_picker: Some("white".into()),
            ..Default::default()
        };
        assert!(form.to_values(FormMode::Create).is_err());
        assert!(is_hex_color("#A1b2C3"));
    }

    #[test]
    fn variant_requires_car_and_color_but_not_name() {
        let form = VariantForm {
            car_id: Some(4),
            color_id: Some(2),
            stock_quantity: Some(3),
            ..Default::default()
        };
        let values = form.to_values(FormMode::Create).unwrap();
        assert_eq!(values["car_id"], json!(4));
        assert_eq!(values["active"], json!(true));
        assert!(values.get("name_translations").is_none());

        let missing = VariantForm {
            car_id: Some(4),
            ..Default::default()
        };
        assert_eq!(missing.to_values(FormMode::Create).unwrap_err(), "Color is required");
    }

    #[test]
    fn variant_reserved_cannot_exceed_stock() {
        let form = VariantForm {
            car_id: Some(1),
            color_id: Some(1),
            stock_quantity: Some(1),
            reserved_quantity: Some(2),
            ..Default::default()
        };
        assert!(form.to_values(FormMode::Create).is_err());
    }

    #[test]
    fn car_needs_brand_model_and_year_on_create() {
        let form = CarForm {
            name: Some(FormState::new("Camry GLE 2024", "")),
            brand_id: Some(1),
            model_id: Some(2),
            ..Default::default()
        };
        assert_eq!(form.to_values(FormMode::Create).unwrap_err(), "Year is required");

        let form = CarForm {
            year_id: Some(3),
            color_ids: Some(vec![5, 6]),
            status: Some(CarStatus::ComingSoon),
            vat_percentage: Some(15.0),
            ..form
        };
        let values = form.to_values(FormMode::Create).unwrap();
        assert_eq!(values["color_ids"], json!([5, 6]));
        assert_eq!(values["status"], "coming_soon");
        assert_eq!(values["active"], true);
        assert!(values.get("trim_id").is_none());
    }

    #[test]
    fn car_rejects_out_of_range_vat_and_negative_prices() {
        let form = CarForm {
            vat_percentage: Some(120.0),
            ..Default::default()
        };
        assert!(form.to_values(FormMode::Update).is_err());

        let form = CarForm {
            cash_price: Some(-1.0),
            ..Default::default()
        };
        assert!(form.to_values(FormMode::Update).is_err());
    }
}
