use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;
use std::fmt::Display;

/// A raw DynamoDB item: attribute names mapped to typed values.
///
/// Keys for item-level requests, records written to the table and the
/// attribute sets the service hands back (replaced, updated or deleted
/// attributes) are all carried as `Item`s.
///
/// # Example
///
/// ```
/// use books_dynamodb::dynamodb::Item;
///
/// let key = Item::new()
///     .set_number("book_id", 1001)
///     .set_string("title", "Americanah");
/// assert_eq!(key.get_number("book_id"), Some(1001.0));
/// ```
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Item {
    pub(crate) attributes: HashMap<String, AttributeValue>,
}

impl Item {
    /// Creates a new empty `Item`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a string attribute.
    pub fn set_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(key.into(), AttributeValue::S(value.into()));
        self
    }

    /// Sets a number attribute.
    ///
    /// DynamoDB transmits numbers as strings, so anything with a numeric
    /// `Display` form is accepted.
    pub fn set_number(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.attributes
            .insert(key.into(), AttributeValue::N(value.to_string()));
        self
    }

    /// Gets the raw value of an attribute.
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Gets the value of an attribute as a string.
    ///
    /// Returns `None` if the attribute doesn't exist or is not a string.
    pub fn get_string(&self, key: &str) -> Option<&String> {
        self.attributes.get(key).and_then(|av| av.as_s().ok())
    }

    /// Gets the value of an attribute as a number (f64).
    ///
    /// Returns `None` if the attribute doesn't exist, is not a number, or can't be parsed as f64.
    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.attributes
            .get(key)
            .and_then(|av| av.as_n().ok())
            .and_then(|n| n.parse().ok())
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Renders the attributes as `name=value` pairs ordered by name.
    pub(crate) fn describe_key(&self) -> String {
        let mut names: Vec<&String> = self.attributes.keys().collect();
        names.sort();
        names
            .into_iter()
            .map(|name| match &self.attributes[name] {
                AttributeValue::S(s) => format!("{name}={s:?}"),
                AttributeValue::N(n) => format!("{name}={n}"),
                other => format!("{name}={other:?}"),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn into_attributes(self) -> HashMap<String, AttributeValue> {
        self.attributes
    }
}

impl From<HashMap<String, AttributeValue>> for Item {
    fn from(attributes: HashMap<String, AttributeValue>) -> Self {
        Self { attributes }
    }
}
