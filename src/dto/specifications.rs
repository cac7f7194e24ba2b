use serde::Deserialize;
use serde_json::{Map, Value, json};
use utoipa::ToSchema;

use crate::{
    dto::entities::{EntityForm, FormMode, base_values, is_hex_color, put_text, require_ref},
    i18n::FormState,
};

fn put_bool(values: &mut Map<String, Value>, key: &str, flag: Option<bool>) {
    if let Some(flag) = flag {
        values.insert(key.to_string(), Value::Bool(flag));
    }
}

fn put_sequence(values: &mut Map<String, Value>, sequence: Option<i64>) -> Result<(), String> {
    if let Some(sequence) = sequence {
        if sequence < 0 {
            return Err("sequence cannot be negative".into());
        }
        values.insert("sequence".into(), Value::from(sequence));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SpecCategoryForm {
    pub name: Option<FormState>,
    pub description: Option<FormState>,
    pub sequence: Option<i64>,
    pub icon: Option<String>,
    pub is_website_visible: Option<bool>,
    pub is_information_category: Option<bool>,
    pub active: Option<bool>,
}

impl EntityForm for SpecCategoryForm {
    fn to_values(&self, mode: FormMode) -> Result<Map<String, Value>, String> {
        let mut values = base_values(self.name.as_ref(), self.description.as_ref(), self.active, mode)?;
        put_sequence(&mut values, self.sequence)?;
        put_text(&mut values, "icon", &self.icon);
        put_bool(&mut values, "is_website_visible", self.is_website_visible);
        put_bool(&mut values, "is_information_category", self.is_information_category);
        Ok(values)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SpecUnitForm {
    pub name: Option<FormState>,
    pub description: Option<FormState>,
    pub code: Option<String>,
    pub category: Option<String>,
    /// Multiplier to the category's base unit.
    pub conversion_factor: Option<f64>,
    pub display_position: Option<String>,
    pub active: Option<bool>,
}

impl EntityForm for SpecUnitForm {
    fn to_values(&self, mode: FormMode) -> Result<Map<String, Value>, String> {
        let mut values = base_values(self.name.as_ref(), self.description.as_ref(), self.active, mode)?;
        put_text(&mut values, "code", &self.code);
        put_text(&mut values, "category", &self.category);
        put_text(&mut values, "display_position", &self.display_position);
        if let Some(factor) = self.conversion_factor {
            if !factor.is_finite() || factor <= 0.0 {
                return Err("conversion_factor must be greater than zero".into());
            }
            values.insert("conversion_factor".into(), Value::from(factor));
        }
        Ok(values)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SpecAttributeForm {
    pub name: Option<FormState>,
    pub description: Option<FormState>,
    pub display_type: Option<String>,
    pub sequence: Option<i64>,
    pub spec_category_id: Option<i64>,
    pub is_filterable: Option<bool>,
    pub is_key_attribute: Option<bool>,
    pub active: Option<bool>,
}

impl EntityForm for SpecAttributeForm {
    fn to_values(&self, mode: FormMode) -> Result<Map<String, Value>, String> {
        let mut values = base_values(self.name.as_ref(), self.description.as_ref(), self.active, mode)?;
        put_text(&mut values, "display_type", &self.display_type);
        put_sequence(&mut values, self.sequence)?;
        require_ref(&mut values, "spec_category_id", self.spec_category_id, FormMode::Update, "Category")?;
        put_bool(&mut values, "is_filterable", self.is_filterable);
        put_bool(&mut values, "is_key_attribute", self.is_key_attribute);
        Ok(values)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SpecValueForm {
    pub name: Option<FormState>,
    pub attribute_id: Option<i64>,
    pub unit_id: Option<i64>,
    pub html_color: Option<String>,
    pub sequence: Option<i64>,
    pub is_custom: Option<bool>,
    pub active: Option<bool>,
}

impl EntityForm for SpecValueForm {
    fn to_values(&self, mode: FormMode) -> Result<Map<String, Value>, String> {
        if let Some(hex) = self.html_color.as_deref().map(str::trim).filter(|h| !h.is_empty()) {
            if !is_hex_color(hex) {
                return Err(format!("Invalid color value {hex}, expected #RRGGBB"));
            }
        }
        let mut values = base_values(self.name.as_ref(), None, self.active, mode)?;
        require_ref(&mut values, "attribute_id", self.attribute_id, mode, "Attribute")?;
        require_ref(&mut values, "unit_id", self.unit_id, FormMode::Update, "Unit")?;
        put_text(&mut values, "html_color", &self.html_color);
        put_sequence(&mut values, self.sequence)?;
        put_bool(&mut values, "is_custom", self.is_custom);
        Ok(values)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStyle {
    Tabs,
    Accordion,
    GroupedList,
    SingleTable,
}

impl DisplayStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayStyle::Tabs => "tabs",
            DisplayStyle::Accordion => "accordion",
            DisplayStyle::GroupedList => "grouped_list",
            DisplayStyle::SingleTable => "single_table",
        }
    }
}

/// A template line to add (no `id`) or change (with `id`).
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TemplateLineForm {
    pub id: Option<i64>,
    pub attribute_id: Option<i64>,
    pub sequence: Option<i64>,
    pub is_required: Option<bool>,
    pub is_visible: Option<bool>,
    pub is_filterable: Option<bool>,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
}

impl TemplateLineForm {
    /// Odoo one2many command: `[0, 0, vals]` creates, `[1, id, vals]` updates.
    fn to_command(&self) -> Result<Value, String> {
        let mode = if self.id.is_some() { FormMode::Update } else { FormMode::Create };
        let mut values = Map::new();
        require_ref(&mut values, "attribute_id", self.attribute_id, mode, "Line attribute")?;
        put_sequence(&mut values, self.sequence)?;
        put_bool(&mut values, "is_required", self.is_required);
        put_bool(&mut values, "is_visible", self.is_visible);
        put_bool(&mut values, "is_filterable", self.is_filterable);
        put_text(&mut values, "placeholder", &self.placeholder);
        put_text(&mut values, "help_text", &self.help_text);
        match self.id {
            None => Ok(json!([0, 0, values])),
            Some(id) if id > 0 => Ok(json!([1, id, values])),
            Some(_) => Err("Line id must be positive".into()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SpecTemplateForm {
    pub name: Option<FormState>,
    pub description: Option<FormState>,
    pub sequence: Option<i64>,
    pub is_default: Option<bool>,
    pub website_visible: Option<bool>,
    pub display_style: Option<DisplayStyle>,
    pub lines: Option<Vec<TemplateLineForm>>,
    /// Lines to delete from the template.
    pub remove_line_ids: Option<Vec<i64>>,
    pub active: Option<bool>,
}

impl EntityForm for SpecTemplateForm {
    fn to_values(&self, mode: FormMode) -> Result<Map<String, Value>, String> {
        let mut values = base_values(self.name.as_ref(), self.description.as_ref(), self.active, mode)?;
        put_sequence(&mut values, self.sequence)?;
        put_bool(&mut values, "is_default", self.is_default);
        put_bool(&mut values, "website_visible", self.website_visible);
        if let Some(style) = self.display_style {
            values.insert("display_style".into(), Value::from(style.as_str()));
        }

        let mut commands = Vec::new();
        for line in self.lines.iter().flatten() {
            commands.push(line.to_command()?);
        }
        for id in self.remove_line_ids.iter().flatten() {
            if *id <= 0 {
                return Err("Line id must be positive".into());
            }
            commands.push(json!([2, id]));
        }
        if !commands.is_empty() {
            values.insert("specification_line_ids".into(), Value::Array(commands));
        }
        Ok(values)
    }
}
