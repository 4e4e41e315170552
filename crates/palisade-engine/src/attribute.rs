//! Typed attribute definitions.
//!
//! An attribute names one context field, normalizes raw values into its
//! declared type, and optionally validates the normalized result. Attributes
//! are built once at policy-definition time and shared read-only across
//! evaluations.

use std::fmt;
use std::sync::Arc;

use palisade_types::AttributeValue;

use crate::error::ConversionError;

/// Validation predicate applied to a converted, non-null value.
pub type Validator = Arc<dyn Fn(&AttributeValue) -> bool + Send + Sync>;

// ============================================================================
// AttributeType
// ============================================================================

/// The target type an attribute normalizes raw context values into.
#[derive(Debug, Clone)]
pub enum AttributeType {
    /// UTF-8 text; non-text input renders via its canonical string form.
    Text,
    /// 64-bit integer; reals truncate toward zero, text parses as base-10.
    Integer,
    /// Closed enumeration over the listed member names.
    Enum {
        /// Member names in declaration order.
        members: Vec<String>,
    },
    /// Ordered sequence; each element converts through the nested attribute.
    List {
        /// The element attribute applied to every entry.
        element: Box<Attribute>,
    },
}

impl AttributeType {
    /// Short name used in conversion error messages.
    fn target_name(&self) -> &'static str {
        match self {
            AttributeType::Text => "text",
            AttributeType::Integer => "integer",
            AttributeType::Enum { .. } => "enumeration",
            AttributeType::List { .. } => "list",
        }
    }
}

// ============================================================================
// Attribute
// ============================================================================

/// A named, typed, validated accessor into a context map.
///
/// Two attributes with the same name are independent objects; the engine
/// does not deduplicate by name.
#[derive(Clone)]
pub struct Attribute {
    name: String,
    attribute_type: AttributeType,
    validator: Option<Validator>,
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("type", &self.attribute_type)
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

impl Attribute {
    fn new(name: impl Into<String>, attribute_type: AttributeType, validator: Option<Validator>) -> Self {
        Self {
            name: name.into(),
            attribute_type,
            validator,
        }
    }

    /// A text attribute accepting any value via its canonical string form.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Text, None)
    }

    /// A text attribute with a validation predicate.
    pub fn text_with(
        name: impl Into<String>,
        validator: impl Fn(&AttributeValue) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, AttributeType::Text, Some(Arc::new(validator)))
    }

    /// An integer attribute.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Integer, None)
    }

    /// An integer attribute with a validation predicate.
    pub fn integer_with(
        name: impl Into<String>,
        validator: impl Fn(&AttributeValue) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, AttributeType::Integer, Some(Arc::new(validator)))
    }

    /// An enumeration attribute over the given member names.
    pub fn enumeration(
        name: impl Into<String>,
        members: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::new(
            name,
            AttributeType::Enum {
                members: members.into_iter().map(Into::into).collect(),
            },
            None,
        )
    }

    /// A list attribute whose elements convert through `element`.
    ///
    /// List validation holds iff every converted element individually
    /// validates; a null entry never validates.
    pub fn list(name: impl Into<String>, element: Attribute) -> Self {
        Self::new(
            name,
            AttributeType::List {
                element: Box::new(element),
            },
            None,
        )
    }

    /// The context-map key this attribute reads.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared target type.
    pub fn attribute_type(&self) -> &AttributeType {
        &self.attribute_type
    }

    /// Converts a raw context value into this attribute's type.
    ///
    /// `Null` converts to `Null` without invoking coercion or the validator.
    /// Otherwise the kind-specific coercion runs first, then the validator on
    /// the non-null result; a validator rejection fails with
    /// [`ConversionError::Rejected`] naming the attribute and raw value.
    pub fn convert(&self, raw: &AttributeValue) -> Result<AttributeValue, ConversionError> {
        if raw.is_null() {
            return Ok(AttributeValue::Null);
        }
        let converted = self.coerce(raw)?;
        if let Some(validate) = &self.validator {
            if !converted.is_null() && !validate(&converted) {
                return Err(ConversionError::Rejected {
                    attribute: self.name.clone(),
                    value: raw.to_string(),
                });
            }
        }
        Ok(converted)
    }

    /// Whether the raw value converts and validates.
    ///
    /// Never fails: any conversion failure is `false`, as is a null input.
    pub fn is_valid(&self, raw: &AttributeValue) -> bool {
        matches!(self.convert(raw), Ok(converted) if !converted.is_null())
    }

    fn coerce(&self, raw: &AttributeValue) -> Result<AttributeValue, ConversionError> {
        match &self.attribute_type {
            AttributeType::Text => Ok(match raw {
                AttributeValue::Text(_) => raw.clone(),
                other => AttributeValue::Text(other.to_string()),
            }),
            AttributeType::Integer => self.coerce_integer(raw),
            AttributeType::Enum { members } => self.coerce_member(members, raw),
            AttributeType::List { element } => self.coerce_list(element, raw),
        }
    }

    fn coerce_integer(&self, raw: &AttributeValue) -> Result<AttributeValue, ConversionError> {
        match raw {
            AttributeValue::Integer(_) => Ok(raw.clone()),
            AttributeValue::Real(r) => Ok(AttributeValue::Integer(r.trunc() as i64)),
            AttributeValue::Text(s) => match s.parse::<i64>() {
                Ok(parsed) => Ok(AttributeValue::Integer(parsed)),
                Err(source) => Err(ConversionError::UnparsableInteger {
                    attribute: self.name.clone(),
                    value: s.clone(),
                    source,
                }),
            },
            other => Err(self.type_mismatch(other)),
        }
    }

    fn coerce_member(
        &self,
        members: &[String],
        raw: &AttributeValue,
    ) -> Result<AttributeValue, ConversionError> {
        match raw {
            AttributeValue::Symbol(s) => {
                if members.iter().any(|m| m == s) {
                    Ok(raw.clone())
                } else {
                    Err(ConversionError::UnknownMember {
                        attribute: self.name.clone(),
                        value: s.clone(),
                    })
                }
            }
            AttributeValue::Text(s) => {
                // Exact match first, then a case-insensitive scan in
                // declaration order.
                if let Some(member) = members.iter().find(|m| *m == s) {
                    return Ok(AttributeValue::Symbol(member.clone()));
                }
                if let Some(member) = members.iter().find(|m| m.eq_ignore_ascii_case(s)) {
                    return Ok(AttributeValue::Symbol(member.clone()));
                }
                Err(ConversionError::UnknownMember {
                    attribute: self.name.clone(),
                    value: s.clone(),
                })
            }
            other => Err(self.type_mismatch(other)),
        }
    }

    fn coerce_list(
        &self,
        element: &Attribute,
        raw: &AttributeValue,
    ) -> Result<AttributeValue, ConversionError> {
        let converted: Vec<AttributeValue> = match raw {
            AttributeValue::List(items) => items
                .iter()
                .map(|item| element.convert(item))
                .collect::<Result<_, _>>()?,
            AttributeValue::Text(s) if s.contains(',') => s
                .split(',')
                .map(|segment| element.convert(&AttributeValue::Text(segment.trim().to_string())))
                .collect::<Result<_, _>>()?,
            single => vec![element.convert(single)?],
        };
        // A null entry (one that converted to Null) never validates.
        if converted.iter().any(AttributeValue::is_null) {
            return Err(ConversionError::Rejected {
                attribute: self.name.clone(),
                value: raw.to_string(),
            });
        }
        Ok(AttributeValue::List(converted))
    }

    fn type_mismatch(&self, raw: &AttributeValue) -> ConversionError {
        ConversionError::TypeMismatch {
            attribute: self.name.clone(),
            target: self.attribute_type.target_name(),
            value: raw.to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
