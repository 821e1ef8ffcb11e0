use aws_sdk_dynamodb::types::{AttributeDefinition, KeySchemaElement, KeyType, ScalarAttributeType};

use crate::error::Result;

/// Scalar type of a key attribute.
///
/// DynamoDB only needs types declared for attributes that take part in a key;
/// every other attribute is schemaless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Represents a string field.
    String,
    /// Represents a number field.
    Number,
}

impl FieldType {
    fn scalar_type(self) -> ScalarAttributeType {
        match self {
            FieldType::String => ScalarAttributeType::S,
            FieldType::Number => ScalarAttributeType::N,
        }
    }
}

/// A key attribute: its name and scalar type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    name: String,
    field_type: FieldType,
}

impl KeyAttribute {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub(crate) fn attribute_definition(&self) -> Result<AttributeDefinition> {
        Ok(AttributeDefinition::builder()
            .attribute_name(&self.name)
            .attribute_type(self.field_type.scalar_type())
            .build()?)
    }

    pub(crate) fn key_schema_element(&self, key_type: KeyType) -> Result<KeySchemaElement> {
        Ok(KeySchemaElement::builder()
            .attribute_name(&self.name)
            .key_type(key_type)
            .build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_definition_types() {
        let id = KeyAttribute::new("book_id", FieldType::Number);
        let definition = id.attribute_definition().unwrap();
        assert_eq!(definition.attribute_name(), "book_id");
        assert_eq!(definition.attribute_type(), &ScalarAttributeType::N);

        let title = KeyAttribute::new("title", FieldType::String);
        let definition = title.attribute_definition().unwrap();
        assert_eq!(definition.attribute_type(), &ScalarAttributeType::S);
    }

    #[test]
    fn test_key_schema_element() {
        let title = KeyAttribute::new("title", FieldType::String);
        let element = title.key_schema_element(KeyType::Range).unwrap();
        assert_eq!(element.attribute_name(), "title");
        assert_eq!(element.key_type(), &KeyType::Range);
    }
}
