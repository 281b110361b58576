//! Register-driven projection of metadata sets into XML documents
//!
//! A set is projected by looking its key up in a [`Register`], resolving each
//! local tag through the primer pack to a property UL, finding that property
//! in the type definition, and decoding the value with the field's type.
//! Sub-descriptors reached through strong reference arrays are projected
//! recursively and nested under the referencing field.

use crate::error::{MxfError, Result};
use crate::header::{decode_iso7, decode_utf16};
use crate::klv::{KlvHeader, LocalSetReader};
use crate::primer::PrimerPack;
use crate::register::{FieldType, Register, TypeDefinition};
use crate::types::Rational;
use crate::ul::{labels, UniversalLabel};
use byteorder::{BigEndian, ByteOrder};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::HashMap;
use uuid::Uuid;

/// Deepest chain of nested strong references that will be followed
const MAX_REFERENCE_DEPTH: usize = 16;

/// KLV packet of a metadata set with its value materialized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triplet {
    pub header: KlvHeader,
    pub value: Vec<u8>,
}

impl Triplet {
    /// Decode a triplet from bytes that start at its key
    pub fn parse(data: &[u8], offset: u64, max_length_field_size: usize) -> Result<Self> {
        let header = KlvHeader::parse(data, offset, max_length_field_size)?;
        let start = header.kl_size() as usize;
        let len = header.value_len()?;
        let value = data
            .get(start..start.saturating_add(len))
            .ok_or(MxfError::InsufficientData {
                offset: header.value_offset(),
                needed: len,
                available: data.len().saturating_sub(start),
            })?;
        Ok(Triplet {
            header,
            value: value.to_vec(),
        })
    }

    pub fn key(&self) -> &UniversalLabel {
        &self.header.key
    }

    /// Instance UID property, resolved through `primer`
    pub fn instance_uid(&self, primer: &PrimerPack) -> Result<Option<Uuid>> {
        let Some(tag) = primer.reverse_lookup(&labels::INSTANCE_UID) else {
            return Ok(None);
        };
        for item in LocalSetReader::new(&self.value, self.header.value_offset()) {
            let item = item?;
            if item.tag == tag {
                return Ok(Uuid::from_slice(item.value).ok());
            }
        }
        Ok(None)
    }
}

/// Content of a document node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
    Text(String),
    Children(Vec<DocumentNode>),
}

/// Namespace-qualified element of a projected document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentNode {
    pub namespace: String,
    pub name: String,
    pub content: NodeContent,
}

impl DocumentNode {
    pub fn text(
        namespace: impl Into<String>,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        DocumentNode {
            namespace: namespace.into(),
            name: name.into(),
            content: NodeContent::Text(text.into()),
        }
    }

    pub fn element(
        namespace: impl Into<String>,
        name: impl Into<String>,
        children: Vec<DocumentNode>,
    ) -> Self {
        DocumentNode {
            namespace: namespace.into(),
            name: name.into(),
            content: NodeContent::Children(children),
        }
    }

    /// Child elements (empty for text nodes)
    pub fn children(&self) -> &[DocumentNode] {
        match &self.content {
            NodeContent::Children(children) => children,
            NodeContent::Text(_) => &[],
        }
    }

    /// First child element named `name`
    pub fn child(&self, name: &str) -> Option<&DocumentNode> {
        self.children().iter().find(|c| c.name == name)
    }

    /// Text content (None for element nodes)
    pub fn text_content(&self) -> Option<&str> {
        match &self.content {
            NodeContent::Text(text) => Some(text),
            NodeContent::Children(_) => None,
        }
    }

    fn collect_namespaces<'a>(&'a self, namespaces: &mut Vec<&'a str>) {
        if !namespaces.contains(&self.namespace.as_str()) {
            namespaces.push(&self.namespace);
        }
        for child in self.children() {
            child.collect_namespaces(namespaces);
        }
    }

    /// Render as an XML fragment, declaring namespace prefixes `r0`, `r1`, ... on the root
    pub fn to_xml(&self) -> Result<String> {
        let mut namespaces = Vec::new();
        self.collect_namespaces(&mut namespaces);
        let prefixes: HashMap<&str, String> = namespaces
            .iter()
            .enumerate()
            .map(|(i, ns)| (*ns, format!("r{}", i)))
            .collect();

        let mut writer = Writer::new(Vec::new());
        self.write_xml(&mut writer, &prefixes, Some(namespaces.as_slice()))?;

        String::from_utf8(writer.into_inner()).map_err(|e| xml_error(&self.name, e))
    }

    fn write_xml(
        &self,
        writer: &mut Writer<Vec<u8>>,
        prefixes: &HashMap<&str, String>,
        declarations: Option<&[&str]>,
    ) -> Result<()> {
        let prefix = prefixes
            .get(self.namespace.as_str())
            .map(String::as_str)
            .unwrap_or("r0");
        let qualified = format!("{}:{}", prefix, self.name);

        let mut start = BytesStart::new(qualified.as_str());
        if let Some(namespaces) = declarations {
            for (i, ns) in namespaces.iter().enumerate() {
                let attribute = format!("xmlns:r{}", i);
                start.push_attribute((attribute.as_str(), *ns));
            }
        }

        writer.write_event(Event::Start(start)).map_err(|e| xml_error(&self.name, e))?;
        match &self.content {
            NodeContent::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| xml_error(&self.name, e))?,
            NodeContent::Children(children) => {
                for child in children {
                    child.write_xml(writer, prefixes, None)?;
                }
            }
        }
        writer
            .write_event(Event::End(BytesEnd::new(qualified.as_str())))
            .map_err(|e| xml_error(&self.name, e))?;
        Ok(())
    }
}

/// Projects metadata sets through a register
pub struct DescriptorProjector<'a> {
    register: &'a dyn Register,
    primer: &'a PrimerPack,
    referenced: HashMap<Uuid, Triplet>,
}

impl<'a> DescriptorProjector<'a> {
    pub fn new(register: &'a dyn Register, primer: &'a PrimerPack) -> Self {
        DescriptorProjector {
            register,
            primer,
            referenced: HashMap::new(),
        }
    }

    /// Make a set available to strong reference arrays under its instance UID
    pub fn add_referenced_set(&mut self, uid: Uuid, triplet: Triplet) {
        self.referenced.insert(uid, triplet);
    }

    pub fn with_referenced_set(mut self, uid: Uuid, triplet: Triplet) -> Self {
        self.add_referenced_set(uid, triplet);
        self
    }

    /// Project one set
    pub fn project(&self, triplet: &Triplet) -> Result<DocumentNode> {
        self.project_at_depth(triplet, 0)
    }

    fn project_at_depth(&self, triplet: &Triplet, depth: usize) -> Result<DocumentNode> {
        let key = *triplet.key();
        let definition = self
            .register
            .lookup(&key)
            .ok_or(MxfError::UnknownSet { key })?;

        let mut fields: Vec<(usize, DocumentNode)> = Vec::new();
        for item in LocalSetReader::new(&triplet.value, triplet.header.value_offset()) {
            let item = item?;
            let Some(property) = self.primer.lookup(item.tag) else {
                log::warn!(
                    "{}: local tag {:04x} at offset {} is not in the primer pack",
                    definition.symbol,
                    item.tag,
                    item.offset
                );
                continue;
            };
            let Some((index, field)) = definition.field(property) else {
                log::warn!(
                    "{}: property {} is not in the register definition",
                    definition.symbol,
                    property.to_urn()
                );
                continue;
            };

            let namespace = field
                .namespace
                .clone()
                .unwrap_or_else(|| definition.namespace.clone());
            let content = self.decode(
                definition,
                &field.symbol,
                &namespace,
                &field.field_type,
                item.value,
                depth,
            )?;
            fields.push((
                index,
                DocumentNode {
                    namespace,
                    name: field.symbol.clone(),
                    content,
                },
            ));
        }

        // Register field order, stream order among repeats
        fields.sort_by_key(|(index, _)| *index);

        Ok(DocumentNode::element(
            definition.namespace.clone(),
            definition.symbol.clone(),
            fields.into_iter().map(|(_, node)| node).collect(),
        ))
    }

    fn decode(
        &self,
        definition: &TypeDefinition,
        field: &str,
        namespace: &str,
        field_type: &FieldType,
        bytes: &[u8],
        depth: usize,
    ) -> Result<NodeContent> {
        let width_error = |expected: usize| MxfError::FieldWidth {
            set: definition.symbol.clone(),
            field: field.to_string(),
            expected,
            actual: bytes.len(),
        };
        if let Some(expected) = field_type.fixed_width() {
            if bytes.len() != expected {
                return Err(width_error(expected));
            }
        }

        let text = match field_type {
            FieldType::UInt8 => bytes[0].to_string(),
            FieldType::UInt16 => BigEndian::read_u16(bytes).to_string(),
            FieldType::UInt32 => BigEndian::read_u32(bytes).to_string(),
            FieldType::UInt64 => BigEndian::read_u64(bytes).to_string(),
            FieldType::Int8 => (bytes[0] as i8).to_string(),
            FieldType::Int16 => BigEndian::read_i16(bytes).to_string(),
            FieldType::Int32 => BigEndian::read_i32(bytes).to_string(),
            FieldType::Int64 => BigEndian::read_i64(bytes).to_string(),
            FieldType::Boolean => (bytes[0] != 0).to_string(),
            FieldType::Rational => Rational::new(
                BigEndian::read_i32(&bytes[0..4]),
                BigEndian::read_i32(&bytes[4..8]),
            )
            .to_string(),
            FieldType::Uuid => Uuid::from_slice(bytes)
                .map_err(|e| MxfError::Projection {
                    set: definition.symbol.clone(),
                    message: e.to_string(),
                })?
                .urn()
                .to_string(),
            FieldType::Label => UniversalLabel::from_slice(bytes)
                .ok_or_else(|| width_error(16))?
                .to_urn(),
            FieldType::Iso7String => decode_iso7(bytes),
            FieldType::Utf16String => {
                if bytes.len() % 2 != 0 {
                    return Err(width_error(bytes.len() + 1));
                }
                decode_utf16(bytes)
            }
            FieldType::Enumeration { width, values } => {
                let raw = bytes
                    .iter()
                    .take(*width)
                    .fold(0i64, |acc, b| (acc << 8) | *b as i64);
                values
                    .iter()
                    .find(|v| v.value == raw)
                    .map(|v| v.name.clone())
                    .unwrap_or_else(|| raw.to_string())
            }
            FieldType::Record(members) => {
                let mut children = Vec::with_capacity(members.len());
                let mut position = 0;
                for (i, member) in members.iter().enumerate() {
                    let rest = &bytes[position..];
                    // Only the last member may take a variable number of bytes
                    let size = match member.field_type.fixed_width() {
                        Some(size) => size,
                        None if i + 1 == members.len() => rest.len(),
                        None => {
                            return Err(MxfError::Projection {
                                set: definition.symbol.clone(),
                                message: format!(
                                    "record member {} of {} has no fixed width",
                                    member.symbol, field
                                ),
                            })
                        }
                    };
                    let member_bytes = rest
                        .get(..size)
                        .ok_or_else(|| width_error(position.saturating_add(size)))?;
                    let content = self.decode(
                        definition,
                        &member.symbol,
                        namespace,
                        &member.field_type,
                        member_bytes,
                        depth,
                    )?;
                    children.push(DocumentNode {
                        namespace: namespace.to_string(),
                        name: member.symbol.clone(),
                        content,
                    });
                    position += size;
                }
                if position != bytes.len() {
                    return Err(width_error(position));
                }
                return Ok(NodeContent::Children(children));
            }
            FieldType::Batch(item_type) => {
                let (count, item_size, items) = split_batch(bytes).ok_or_else(|| width_error(8))?;
                if let Some(expected) = item_type.fixed_width() {
                    if item_size != expected {
                        return Err(MxfError::FieldWidth {
                            set: definition.symbol.clone(),
                            field: field.to_string(),
                            expected,
                            actual: item_size,
                        });
                    }
                }
                if count > 0 && item_size == 0 {
                    return Err(MxfError::Projection {
                        set: definition.symbol.clone(),
                        message: format!("{} declares {} items of zero bytes", field, count),
                    });
                }
                let expected = count.saturating_mul(item_size);
                if items.len() != expected {
                    return Err(width_error(expected.saturating_add(8)));
                }

                let mut children = Vec::with_capacity(count.min(items.len()));
                for chunk in items.chunks(item_size.max(1)).take(count) {
                    let content =
                        self.decode(definition, field, namespace, item_type, chunk, depth)?;
                    children.push(DocumentNode {
                        namespace: namespace.to_string(),
                        name: item_type.type_name().to_string(),
                        content,
                    });
                }
                return Ok(NodeContent::Children(children));
            }
            FieldType::StrongReferenceArray => {
                let (count, item_size, items) = split_batch(bytes).ok_or_else(|| width_error(8))?;
                if count > 0 && item_size != 16 {
                    return Err(MxfError::FieldWidth {
                        set: definition.symbol.clone(),
                        field: field.to_string(),
                        expected: 16,
                        actual: item_size,
                    });
                }
                let expected = count.saturating_mul(16);
                if items.len() != expected {
                    return Err(width_error(expected.saturating_add(8)));
                }
                if depth >= MAX_REFERENCE_DEPTH {
                    return Err(MxfError::Projection {
                        set: definition.symbol.clone(),
                        message: format!(
                            "strong references nested deeper than {}",
                            MAX_REFERENCE_DEPTH
                        ),
                    });
                }

                let mut children = Vec::with_capacity(count);
                for chunk in items.chunks(16) {
                    let uid = Uuid::from_slice(chunk).map_err(|e| MxfError::Projection {
                        set: definition.symbol.clone(),
                        message: e.to_string(),
                    })?;
                    match self.referenced.get(&uid) {
                        Some(target) => children.push(self.project_at_depth(target, depth + 1)?),
                        None => log::warn!(
                            "{}: {} references missing set {}",
                            definition.symbol,
                            field,
                            uid
                        ),
                    }
                }
                return Ok(NodeContent::Children(children));
            }
        };

        Ok(NodeContent::Text(text))
    }
}

fn xml_error(set: &str, e: impl std::fmt::Display) -> MxfError {
    MxfError::Projection {
        set: set.to_string(),
        message: e.to_string(),
    }
}

/// Split a batch into `(count, item size, item bytes)`
fn split_batch(bytes: &[u8]) -> Option<(usize, usize, &[u8])> {
    if bytes.len() < 8 {
        return None;
    }
    let count = BigEndian::read_u32(&bytes[0..4]) as usize;
    let item_size = BigEndian::read_u32(&bytes[4..8]) as usize;
    Some((count, item_size, &bytes[8..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::tests::{
        batch, local_set, rational, soundfield_group, standard_primer, uid, wave_descriptor,
    };
    use crate::klv::MAX_LENGTH_FIELD_SIZE;
    use crate::register::{FieldDefinition, MemoryRegister, TypeDefinition};

    const AAF: &str = "http://www.smpte-ra.org/reg/395/2014/13/1/aaf";
    const MCA: &str = "http://www.smpte-ra.org/reg/335/2012";

    fn primer() -> PrimerPack {
        let data = standard_primer();
        let header = KlvHeader::parse(&data, 0, MAX_LENGTH_FIELD_SIZE).unwrap();
        PrimerPack::parse(header, &data[header.kl_size() as usize..]).unwrap()
    }

    fn triplet(data: &[u8]) -> Triplet {
        Triplet::parse(data, 0, MAX_LENGTH_FIELD_SIZE).unwrap()
    }

    fn register() -> MemoryRegister {
        MemoryRegister::new()
            .with_definition(
                TypeDefinition::new(labels::WAVE_AUDIO_DESCRIPTOR, "WAVEPCMDescriptor", AAF)
                    .with_field(FieldDefinition::new(
                        "InstanceID",
                        labels::INSTANCE_UID,
                        FieldType::Uuid,
                    ))
                    .with_field(FieldDefinition::new(
                        "SubDescriptors",
                        labels::SUB_DESCRIPTORS,
                        FieldType::StrongReferenceArray,
                    ))
                    .with_field(FieldDefinition::new(
                        "ChannelCount",
                        labels::CHANNEL_COUNT,
                        FieldType::UInt32,
                    ))
                    .with_field(FieldDefinition::new(
                        "SampleRate",
                        labels::SAMPLE_RATE,
                        FieldType::Rational,
                    )),
            )
            .with_definition(
                TypeDefinition::new(
                    labels::SOUNDFIELD_GROUP_LABEL_SUB_DESCRIPTOR,
                    "SoundfieldGroupLabelSubDescriptor",
                    AAF,
                )
                .with_field(
                    FieldDefinition::new(
                        "MCATagSymbol",
                        labels::MCA_TAG_SYMBOL,
                        FieldType::Utf16String,
                    )
                    .with_namespace(MCA),
                )
                .with_field(
                    FieldDefinition::new(
                        "RFC5646SpokenLanguage",
                        labels::RFC5646_SPOKEN_LANGUAGE,
                        FieldType::Iso7String,
                    )
                    .with_namespace(MCA),
                ),
            )
    }

    #[test]
    fn test_project_in_register_order() {
        let primer = primer();
        let register = register();
        let projector = DescriptorProjector::new(&register, &primer);

        let document = projector.project(&triplet(&wave_descriptor(1, &[]))).unwrap();
        assert_eq!(document.name, "WAVEPCMDescriptor");
        assert_eq!(document.namespace, AAF);

        let names: Vec<&str> = document.children().iter().map(|c| c.name.as_str()).collect();
        // Register order; fields without definitions are skipped
        assert_eq!(names, vec!["InstanceID", "SubDescriptors", "ChannelCount", "SampleRate"]);
        assert_eq!(document.child("ChannelCount").unwrap().text_content(), Some("2"));
        assert_eq!(document.child("SampleRate").unwrap().text_content(), Some("24/1"));
        assert!(document
            .child("InstanceID")
            .unwrap()
            .text_content()
            .unwrap()
            .starts_with("urn:uuid:"));
    }

    #[test]
    fn test_strong_references_nest() {
        let primer = primer();
        let register = register();
        let sub = triplet(&soundfield_group(10, Some("en")));
        let projector = DescriptorProjector::new(&register, &primer)
            .with_referenced_set(Uuid::from_bytes(uid(10)), sub);

        let document = projector
            .project(&triplet(&wave_descriptor(1, &[uid(10), uid(11)])))
            .unwrap();
        let subs = document.child("SubDescriptors").unwrap().children();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].name, "SoundfieldGroupLabelSubDescriptor");
        assert_eq!(
            subs[0].child("RFC5646SpokenLanguage").unwrap().text_content(),
            Some("en")
        );
        assert_eq!(subs[0].child("MCATagSymbol").unwrap().namespace, MCA);
    }

    #[test]
    fn test_unknown_set() {
        let primer = primer();
        let register = MemoryRegister::new();
        let projector = DescriptorProjector::new(&register, &primer);

        let err = projector.project(&triplet(&wave_descriptor(1, &[]))).unwrap_err();
        match err {
            MxfError::UnknownSet { key } => {
                assert!(key.matches_set(&labels::WAVE_AUDIO_DESCRIPTOR))
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_field_width_mismatch() {
        let primer = primer();
        let register = register();
        let projector = DescriptorProjector::new(&register, &primer);

        let bad = local_set(
            labels::WAVE_AUDIO_DESCRIPTOR,
            &[(0x3D07, vec![0, 2])],
        );
        let err = projector.project(&triplet(&bad)).unwrap_err();
        assert!(matches!(
            err,
            MxfError::FieldWidth {
                expected: 4,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_record_and_batch() {
        let primer = primer();
        let register = MemoryRegister::new().with_definition(
            TypeDefinition::new(labels::PREFACE, "Preface", AAF)
                .with_field(FieldDefinition::new(
                    "EssenceContainers",
                    labels::ESSENCE_CONTAINERS,
                    FieldType::Batch(Box::new(FieldType::Label)),
                ))
                .with_field(FieldDefinition::new(
                    "SampleRate",
                    labels::SAMPLE_RATE,
                    FieldType::Record(vec![
                        crate::register::RecordMember {
                            symbol: "Numerator".into(),
                            field_type: FieldType::Int32,
                        },
                        crate::register::RecordMember {
                            symbol: "Denominator".into(),
                            field_type: FieldType::Int32,
                        },
                    ]),
                )),
        );
        let projector = DescriptorProjector::new(&register, &primer);

        let preface = local_set(
            labels::PREFACE,
            &[
                (0x3B0A, batch(&[labels::ESSENCE_JPEG2000])),
                (0x3001, rational(30000, 1001)),
            ],
        );
        let document = projector.project(&triplet(&preface)).unwrap();

        let containers = document.child("EssenceContainers").unwrap().children();
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].name, "AUID");
        assert_eq!(
            containers[0].text_content(),
            Some(UniversalLabel(labels::ESSENCE_JPEG2000).to_urn().as_str())
        );

        let rate = document.child("SampleRate").unwrap();
        assert_eq!(rate.child("Numerator").unwrap().text_content(), Some("30000"));
        assert_eq!(rate.child("Denominator").unwrap().text_content(), Some("1001"));
    }

    fn record_register(members: Vec<(&str, FieldType)>) -> MemoryRegister {
        let members = members
            .into_iter()
            .map(|(symbol, field_type)| crate::register::RecordMember {
                symbol: symbol.into(),
                field_type,
            })
            .collect();
        MemoryRegister::new().with_definition(
            TypeDefinition::new(labels::PREFACE, "Preface", AAF).with_field(FieldDefinition::new(
                "SampleRate",
                labels::SAMPLE_RATE,
                FieldType::Record(members),
            )),
        )
    }

    #[test]
    fn test_record_shorter_than_members() {
        let primer = primer();
        let register = record_register(vec![
            ("First", FieldType::UInt64),
            ("Second", FieldType::UInt64),
            ("Name", FieldType::Iso7String),
        ]);
        let projector = DescriptorProjector::new(&register, &primer);

        let preface = local_set(labels::PREFACE, &[(0x3001, rational(24, 1))]);
        let err = projector.project(&triplet(&preface)).unwrap_err();
        assert!(matches!(
            err,
            MxfError::FieldWidth {
                expected: 16,
                actual: 8,
                ..
            }
        ));
    }

    #[test]
    fn test_record_with_trailing_string() {
        let primer = primer();
        let register = record_register(vec![
            ("Index", FieldType::UInt32),
            ("Name", FieldType::Iso7String),
        ]);
        let projector = DescriptorProjector::new(&register, &primer);

        let preface = local_set(labels::PREFACE, &[(0x3001, vec![0, 0, 0, 3, b'a', b'b'])]);
        let document = projector.project(&triplet(&preface)).unwrap();
        let rate = document.child("SampleRate").unwrap();
        assert_eq!(rate.child("Index").unwrap().text_content(), Some("3"));
        assert_eq!(rate.child("Name").unwrap().text_content(), Some("ab"));
    }

    #[test]
    fn test_record_with_inner_string() {
        let primer = primer();
        let register = record_register(vec![
            ("Name", FieldType::Iso7String),
            ("Index", FieldType::UInt32),
        ]);
        let projector = DescriptorProjector::new(&register, &primer);

        let preface = local_set(labels::PREFACE, &[(0x3001, vec![b'a', 0, 0, 0, 3])]);
        let err = projector.project(&triplet(&preface)).unwrap_err();
        assert!(matches!(err, MxfError::Projection { .. }));
    }

    #[test]
    fn test_batch_of_zero_sized_items() {
        let primer = primer();
        let register = MemoryRegister::new().with_definition(
            TypeDefinition::new(labels::PREFACE, "Preface", AAF).with_field(
                FieldDefinition::new(
                    "EssenceContainers",
                    labels::ESSENCE_CONTAINERS,
                    FieldType::Batch(Box::new(FieldType::Utf16String)),
                ),
            ),
        );
        let projector = DescriptorProjector::new(&register, &primer);

        let mut header = u32::MAX.to_be_bytes().to_vec();
        header.extend_from_slice(&0u32.to_be_bytes());
        let preface = local_set(labels::PREFACE, &[(0x3B0A, header)]);
        let err = projector.project(&triplet(&preface)).unwrap_err();
        assert!(matches!(err, MxfError::Projection { .. }));
        assert!(err.to_string().contains("4294967295 items of zero bytes"));
    }

    #[test]
    fn test_to_xml() {
        let document = DocumentNode::element(
            AAF,
            "WAVEPCMDescriptor",
            vec![
                DocumentNode::text(AAF, "ChannelCount", "2"),
                DocumentNode::text(MCA, "MCATagName", "L & R"),
            ],
        );
        let xml = document.to_xml().unwrap();

        assert!(xml.starts_with("<r0:WAVEPCMDescriptor"));
        assert!(xml.contains(&format!("xmlns:r0=\"{}\"", AAF)));
        assert!(xml.contains(&format!("xmlns:r1=\"{}\"", MCA)));
        assert!(xml.contains("<r0:ChannelCount>2</r0:ChannelCount>"));
        assert!(xml.contains("<r1:MCATagName>L &amp; R</r1:MCATagName>"));
        assert!(xml.ends_with("</r0:WAVEPCMDescriptor>"));
    }

    #[test]
    fn test_triplet_instance_uid() {
        let primer = primer();
        let sub = triplet(&soundfield_group(7, None));
        assert_eq!(
            sub.instance_uid(&primer).unwrap(),
            Some(Uuid::from_bytes(uid(7)))
        );
    }
}
