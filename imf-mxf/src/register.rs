//! Metadata register
//!
//! The projector does not hard-code metadata set layouts. It asks a
//! [`Register`] for the type definition of a set key and decodes the set's
//! properties field by field. The SMPTE register itself is not bundled; callers
//! supply definitions, typically loaded from JSON with [`MemoryRegister::from_json`].

use crate::error::{MxfError, Result};
use crate::ul::UniversalLabel;
use serde::{Deserialize, Serialize};

/// Lookup of metadata set definitions by set key
pub trait Register {
    /// Definition of the set identified by `key`
    fn lookup(&self, key: &UniversalLabel) -> Option<&TypeDefinition>;
}

/// Named value of an enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerationValue {
    pub value: i64,
    pub name: String,
}

/// Member of a record (fixed-layout group)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMember {
    pub symbol: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// Encoding of a field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "uint8")]
    UInt8,
    #[serde(rename = "uint16")]
    UInt16,
    #[serde(rename = "uint32")]
    UInt32,
    #[serde(rename = "uint64")]
    UInt64,
    #[serde(rename = "int8")]
    Int8,
    #[serde(rename = "int16")]
    Int16,
    #[serde(rename = "int32")]
    Int32,
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "rational")]
    Rational,
    #[serde(rename = "uuid")]
    Uuid,
    /// 16-byte Universal Label (AUID)
    #[serde(rename = "label")]
    Label,
    #[serde(rename = "iso7_string")]
    Iso7String,
    #[serde(rename = "utf16_string")]
    Utf16String,
    /// Integer of `width` bytes with named values
    #[serde(rename = "enumeration")]
    Enumeration {
        width: usize,
        values: Vec<EnumerationValue>,
    },
    #[serde(rename = "record")]
    Record(Vec<RecordMember>),
    /// Counted array with an 8-byte header (count, item size)
    #[serde(rename = "batch")]
    Batch(Box<FieldType>),
    /// Array of strong references to other sets, resolved and nested
    #[serde(rename = "strong_reference_array")]
    StrongReferenceArray,
}

impl FieldType {
    /// Encoded size when the type has one
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            FieldType::UInt8 | FieldType::Int8 | FieldType::Boolean => Some(1),
            FieldType::UInt16 | FieldType::Int16 => Some(2),
            FieldType::UInt32 | FieldType::Int32 => Some(4),
            FieldType::UInt64 | FieldType::Int64 | FieldType::Rational => Some(8),
            FieldType::Uuid | FieldType::Label => Some(16),
            FieldType::Enumeration { width, .. } => Some(*width),
            FieldType::Record(members) => members
                .iter()
                .map(|m| m.field_type.fixed_width())
                .sum(),
            FieldType::Iso7String
            | FieldType::Utf16String
            | FieldType::Batch(_)
            | FieldType::StrongReferenceArray => None,
        }
    }

    /// Register type name, used for unnamed batch items
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::UInt8 => "UInt8",
            FieldType::UInt16 => "UInt16",
            FieldType::UInt32 => "UInt32",
            FieldType::UInt64 => "UInt64",
            FieldType::Int8 => "Int8",
            FieldType::Int16 => "Int16",
            FieldType::Int32 => "Int32",
            FieldType::Int64 => "Int64",
            FieldType::Boolean => "Boolean",
            FieldType::Rational => "Rational",
            FieldType::Uuid => "UUID",
            FieldType::Label => "AUID",
            FieldType::Iso7String => "ISO7String",
            FieldType::Utf16String => "UTF16String",
            FieldType::Enumeration { .. } => "Enumeration",
            FieldType::Record(_) => "Record",
            FieldType::Batch(_) => "Batch",
            FieldType::StrongReferenceArray => "StrongReference",
        }
    }
}

/// Definition of one property of a set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub symbol: String,
    pub key: UniversalLabel,
    /// Overrides the set namespace when present
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDefinition {
    pub fn new(
        symbol: impl Into<String>,
        key: impl Into<UniversalLabel>,
        field_type: FieldType,
    ) -> Self {
        FieldDefinition {
            symbol: symbol.into(),
            key: key.into(),
            namespace: None,
            field_type,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

/// Definition of a metadata set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub key: UniversalLabel,
    pub symbol: String,
    pub namespace: String,
    /// Fields in document order
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl TypeDefinition {
    pub fn new(
        key: impl Into<UniversalLabel>,
        symbol: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        TypeDefinition {
            key: key.into(),
            symbol: symbol.into(),
            namespace: namespace.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Position and definition of the field keyed by `key`, ignoring the version byte
    pub fn field(&self, key: &UniversalLabel) -> Option<(usize, &FieldDefinition)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, f)| f.key.matches_item(&key.0))
    }
}

/// Register held in memory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRegister {
    #[serde(default)]
    definitions: Vec<TypeDefinition>,
}

impl MemoryRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load definitions from JSON (`{ "definitions": [...] }`)
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| MxfError::Projection {
            set: "register".into(),
            message: e.to_string(),
        })
    }

    pub fn with_definition(mut self, definition: TypeDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.definitions.iter()
    }
}

impl Register for MemoryRegister {
    fn lookup(&self, key: &UniversalLabel) -> Option<&TypeDefinition> {
        self.definitions.iter().find(|d| key.matches_set(&d.key.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ul::labels;

    const JSON: &str = r#"{
        "definitions": [
            {
                "key": "urn:smpte:ul:060e2b34.02530101.0d010101.01014800",
                "symbol": "WAVEPCMDescriptor",
                "namespace": "http://www.smpte-ra.org/reg/395/2014/13/1/aaf",
                "fields": [
                    { "symbol": "SampleRate", "key": "urn:smpte:ul:060e2b34.01010101.04060101.00000000", "type": "rational" },
                    { "symbol": "ChannelCount", "key": "urn:smpte:ul:060e2b34.01010105.04020101.04000000", "type": "uint32" },
                    { "symbol": "SubDescriptors", "key": "urn:smpte:ul:060e2b34.01010109.06010104.06100000", "type": "strong_reference_array" },
                    { "symbol": "Containers", "key": "urn:smpte:ul:060e2b34.01010105.01020210.02010000", "type": { "batch": "label" } },
                    { "symbol": "Layout", "key": "urn:smpte:ul:060e2b34.01010101.04010301.04000000",
                      "type": { "enumeration": { "width": 1, "values": [ { "value": 0, "name": "FullFrame" } ] } } }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let register = MemoryRegister::from_json(JSON).unwrap();
        assert_eq!(register.len(), 1);

        let definition = register
            .lookup(&UniversalLabel(labels::WAVE_AUDIO_DESCRIPTOR))
            .unwrap();
        assert_eq!(definition.symbol, "WAVEPCMDescriptor");
        assert_eq!(definition.fields.len(), 5);
        assert_eq!(definition.fields[2].field_type, FieldType::StrongReferenceArray);
        assert_eq!(
            definition.fields[3].field_type,
            FieldType::Batch(Box::new(FieldType::Label))
        );

        let (index, field) = definition
            .field(&UniversalLabel(labels::CHANNEL_COUNT))
            .unwrap();
        assert_eq!(index, 1);
        assert_eq!(field.field_type, FieldType::UInt32);
    }

    #[test]
    fn test_lookup_ignores_registry_designator() {
        let mut key = labels::CDCI_DESCRIPTOR;
        key[5] = 0x7F;
        let register = MemoryRegister::new().with_definition(TypeDefinition::new(
            key,
            "CDCIDescriptor",
            "urn:test",
        ));
        assert!(register
            .lookup(&UniversalLabel(labels::CDCI_DESCRIPTOR))
            .is_some());
        assert!(register
            .lookup(&UniversalLabel(labels::RGBA_DESCRIPTOR))
            .is_none());
    }

    #[test]
    fn test_invalid_json() {
        let err = MemoryRegister::from_json("{ \"definitions\": 3 }").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Projection);
    }

    #[test]
    fn test_fixed_width() {
        assert_eq!(FieldType::Rational.fixed_width(), Some(8));
        assert_eq!(FieldType::Utf16String.fixed_width(), None);
        let record = FieldType::Record(vec![
            RecordMember {
                symbol: "A".into(),
                field_type: FieldType::UInt16,
            },
            RecordMember {
                symbol: "B".into(),
                field_type: FieldType::Label,
            },
        ]);
        assert_eq!(record.fixed_width(), Some(18));
    }
}
