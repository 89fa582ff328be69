//! Schema editor over one database's ordered property list.

use crate::model::property::{
    OptionId, PropertyOption, PropertySchema, PropertyType, OPTION_COLORS,
};
use crate::schema::SchemaError;
use serde::{Deserialize, Serialize};

/// Name given to a property added without one.
pub const DEFAULT_PROPERTY_NAME: &str = "New Property";

/// Partial property update. Present fields replace the stored ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<PropertyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<PropertyOption>>,
}

/// One schema operation, in transport-friendly form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SchemaOperation {
    AddProperty {
        #[serde(default)]
        name: Option<String>,
        #[serde(default, rename = "type")]
        kind: Option<PropertyType>,
    },
    UpdateProperty {
        property_id: String,
        patch: PropertyPatch,
    },
    DeleteProperty {
        property_id: String,
    },
    AddOption {
        property_id: String,
        label: String,
    },
    RemoveOption {
        property_id: String,
        option_id: OptionId,
    },
    UpdateOptionColor {
        property_id: String,
        option_id: OptionId,
        color: String,
    },
    UpdateOptionLabel {
        property_id: String,
        option_id: OptionId,
        label: String,
    },
}

/// Editor over a database page's property schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaEditor {
    properties: Vec<PropertySchema>,
}

impl SchemaEditor {
    pub fn new(properties: Vec<PropertySchema>) -> Self {
        Self { properties }
    }

    pub fn properties(&self) -> &[PropertySchema] {
        &self.properties
    }

    pub fn into_properties(self) -> Vec<PropertySchema> {
        self.properties
    }

    /// Appends a property with a fresh id.
    ///
    /// Defaults to `New Property` of type `text`. Select-family properties
    /// start with an empty option list.
    pub fn add_property(
        &mut self,
        name: Option<String>,
        kind: Option<PropertyType>,
    ) -> &PropertySchema {
        let kind = kind.unwrap_or(PropertyType::Text);
        let mut property =
            PropertySchema::new(name.unwrap_or_else(|| DEFAULT_PROPERTY_NAME.to_string()), kind);
        if kind.is_select_family() {
            property.options = Some(Vec::new());
        }
        self.properties.push(property);
        let last = self.properties.len() - 1;
        &self.properties[last]
    }

    /// Merges `patch` into the matching property.
    ///
    /// Stored row values are not migrated when `type` changes.
    pub fn update_property(
        &mut self,
        property_id: &str,
        patch: PropertyPatch,
    ) -> Result<(), SchemaError> {
        let property = self.property_mut(property_id)?;
        if let Some(name) = patch.name {
            property.name = name;
        }
        if let Some(kind) = patch.kind {
            property.kind = kind;
            if kind.is_select_family() && property.options.is_none() {
                property.options = Some(Vec::new());
            }
        }
        if let Some(options) = patch.options {
            property.options = Some(options);
        }
        Ok(())
    }

    /// Removes the matching property; row values under its id stay orphaned.
    pub fn delete_property(&mut self, property_id: &str) -> Result<PropertySchema, SchemaError> {
        let index = self
            .properties
            .iter()
            .position(|property| property.id == property_id)
            .ok_or_else(|| SchemaError::PropertyNotFound(property_id.to_string()))?;
        Ok(self.properties.remove(index))
    }

    /// Appends a `gray` option with a trimmed label to a select property.
    pub fn add_option(
        &mut self,
        property_id: &str,
        label: &str,
    ) -> Result<PropertyOption, SchemaError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(SchemaError::InvalidOptionLabel);
        }
        let options = self.options_mut(property_id)?;
        let option = PropertyOption::new(label);
        options.push(option.clone());
        Ok(option)
    }

    pub fn remove_option(&mut self, property_id: &str, option_id: &str) -> Result<(), SchemaError> {
        let options = self.options_mut(property_id)?;
        let index = options
            .iter()
            .position(|option| option.id == option_id)
            .ok_or_else(|| option_not_found(property_id, option_id))?;
        options.remove(index);
        Ok(())
    }

    pub fn update_option_color(
        &mut self,
        property_id: &str,
        option_id: &str,
        color: &str,
    ) -> Result<(), SchemaError> {
        if !OPTION_COLORS.contains(&color) {
            return Err(SchemaError::UnknownColor(color.to_string()));
        }
        self.option_mut(property_id, option_id)?.color = color.to_string();
        Ok(())
    }

    pub fn update_option_label(
        &mut self,
        property_id: &str,
        option_id: &str,
        label: &str,
    ) -> Result<(), SchemaError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(SchemaError::InvalidOptionLabel);
        }
        self.option_mut(property_id, option_id)?.label = label.to_string();
        Ok(())
    }

    /// Dispatches one [`SchemaOperation`].
    pub fn apply(&mut self, operation: SchemaOperation) -> Result<(), SchemaError> {
        match operation {
            SchemaOperation::AddProperty { name, kind } => {
                self.add_property(name, kind);
                Ok(())
            }
            SchemaOperation::UpdateProperty { property_id, patch } => {
                self.update_property(&property_id, patch)
            }
            SchemaOperation::DeleteProperty { property_id } => {
                self.delete_property(&property_id).map(|_| ())
            }
            SchemaOperation::AddOption { property_id, label } => {
                self.add_option(&property_id, &label).map(|_| ())
            }
            SchemaOperation::RemoveOption {
                property_id,
                option_id,
            } => self.remove_option(&property_id, &option_id),
            SchemaOperation::UpdateOptionColor {
                property_id,
                option_id,
                color,
            } => self.update_option_color(&property_id, &option_id, &color),
            SchemaOperation::UpdateOptionLabel {
                property_id,
                option_id,
                label,
            } => self.update_option_label(&property_id, &option_id, &label),
        }
    }

    fn property_mut(&mut self, property_id: &str) -> Result<&mut PropertySchema, SchemaError> {
        self.properties
            .iter_mut()
            .find(|property| property.id == property_id)
            .ok_or_else(|| SchemaError::PropertyNotFound(property_id.to_string()))
    }

    fn options_mut(&mut self, property_id: &str) -> Result<&mut Vec<PropertyOption>, SchemaError> {
        let property = self.property_mut(property_id)?;
        if !property.kind.is_select_family() {
            return Err(SchemaError::NotSelectProperty(property_id.to_string()));
        }
        Ok(property.options.get_or_insert_with(Vec::new))
    }

    fn option_mut(
        &mut self,
        property_id: &str,
        option_id: &str,
    ) -> Result<&mut PropertyOption, SchemaError> {
        self.options_mut(property_id)?
            .iter_mut()
            .find(|option| option.id == option_id)
            .ok_or_else(|| option_not_found(property_id, option_id))
    }
}

fn option_not_found(property_id: &str, option_id: &str) -> SchemaError {
    SchemaError::OptionNotFound {
        property_id: property_id.to_string(),
        option_id: option_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{PropertyPatch, SchemaEditor, SchemaOperation, DEFAULT_PROPERTY_NAME};
    use crate::model::property::{PropertyType, DEFAULT_OPTION_COLOR};
    use crate::schema::SchemaError;

    #[test]
    fn add_property_uses_defaults_and_appends() {
        let mut editor = SchemaEditor::default();
        let first_id = editor.add_property(None, None).id.clone();
        editor.add_property(Some("Stage".to_string()), Some(PropertyType::Select));

        let properties = editor.properties();
        assert_eq!(properties[0].id, first_id);
        assert_eq!(properties[0].name, DEFAULT_PROPERTY_NAME);
        assert_eq!(properties[0].kind, PropertyType::Text);
        assert_eq!(properties[1].options, Some(Vec::new()));
    }

    #[test]
    fn add_option_trims_label_and_defaults_color() {
        let mut editor = SchemaEditor::default();
        let id = editor
            .add_property(None, Some(PropertyType::Select))
            .id
            .clone();

        let option = editor.add_option(&id, "  Done ").unwrap();
        assert_eq!(option.label, "Done");
        assert_eq!(option.color, DEFAULT_OPTION_COLOR);

        assert_eq!(
            editor.add_option(&id, "   ").unwrap_err(),
            SchemaError::InvalidOptionLabel
        );
    }

    #[test]
    fn option_operations_require_select_family() {
        let mut editor = SchemaEditor::default();
        let id = editor.add_property(None, None).id.clone();
        assert_eq!(
            editor.add_option(&id, "A").unwrap_err(),
            SchemaError::NotSelectProperty(id)
        );
    }

    #[test]
    fn option_edits_keep_option_id() {
        let mut editor = SchemaEditor::default();
        let id = editor
            .add_property(None, Some(PropertyType::MultiSelect))
            .id
            .clone();
        let option = editor.add_option(&id, "A").unwrap();

        editor.update_option_color(&id, &option.id, "green").unwrap();
        editor.update_option_label(&id, &option.id, "Alpha").unwrap();

        let stored = editor.properties()[0].option(&option.id).unwrap();
        assert_eq!(stored.label, "Alpha");
        assert_eq!(stored.color, "green");
        assert_eq!(
            editor
                .update_option_color(&id, &option.id, "teal")
                .unwrap_err(),
            SchemaError::UnknownColor("teal".to_string())
        );

        editor.remove_option(&id, &option.id).unwrap();
        assert!(editor.properties()[0].options().is_empty());
    }

    #[test]
    fn type_change_to_select_initializes_options() {
        let mut editor = SchemaEditor::default();
        let id = editor.add_property(None, None).id.clone();
        editor
            .update_property(
                &id,
                PropertyPatch {
                    kind: Some(PropertyType::Select),
                    ..PropertyPatch::default()
                },
            )
            .unwrap();
        assert_eq!(editor.properties()[0].options, Some(Vec::new()));
    }

    #[test]
    fn delete_unknown_property_is_rejected() {
        let mut editor = SchemaEditor::default();
        assert_eq!(
            editor.delete_property("missing").unwrap_err(),
            SchemaError::PropertyNotFound("missing".to_string())
        );
    }

    #[test]
    fn operations_deserialize_from_tagged_json() {
        let op: SchemaOperation =
            serde_json::from_str(r#"{"op":"addProperty","name":"Due","type":"date"}"#).unwrap();
        let mut editor = SchemaEditor::default();
        editor.apply(op).unwrap();
        assert_eq!(editor.properties()[0].name, "Due");
        assert_eq!(editor.properties()[0].kind, PropertyType::Date);
    }
}
