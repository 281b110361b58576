//! Header partition metadata
//!
//! The header partition starts with its partition pack, optionally followed by
//! fill, then the primer pack and the header metadata sets. Only the sets an
//! IMF essence reader needs are decoded:
//!
//! - the preface (operational pattern, essence containers)
//! - CDCI, RGBA and wave audio essence descriptors
//! - JPEG 2000 and multichannel audio (ST 377-4) sub-descriptors
//!
//! Every other set is counted and skipped.

use crate::config::ReaderConfig;
use crate::cursor::ByteCursor;
use crate::error::{MxfError, Result};
use crate::klv::{KlvHeader, LocalSetReader};
use crate::partition::PartitionPack;
use crate::primer::PrimerPack;
use crate::types::{EssenceType, FrameLayout, FrameSize, Rational};
use crate::ul::{labels, LabelKind, UniversalLabel, UL};
use std::collections::HashMap;
use uuid::Uuid;

/// A local-set item whose tag was resolved through the primer pack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Local tag
    pub tag: u16,
    /// Property UL from the primer pack
    pub key: UniversalLabel,
    /// Raw value bytes
    pub value: Vec<u8>,
    /// Resource offset of the local tag
    pub offset: u64,
}

/// Properties of one metadata set, in stream order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySet {
    properties: Vec<Property>,
    unresolved: usize,
}

impl PropertySet {
    /// Walk a local set value and resolve each tag through `primer`
    pub fn parse(value: &[u8], value_offset: u64, primer: &PrimerPack) -> Result<Self> {
        let mut set = PropertySet::default();
        for item in LocalSetReader::new(value, value_offset) {
            let item = item?;
            match primer.lookup(item.tag) {
                Some(key) => set.properties.push(Property {
                    tag: item.tag,
                    key: *key,
                    value: item.value.to_vec(),
                    offset: item.offset,
                }),
                None => {
                    log::debug!(
                        "Local tag {:04x} at offset {} is not in the primer pack",
                        item.tag,
                        item.offset
                    );
                    set.unresolved += 1;
                }
            }
        }
        Ok(set)
    }

    /// Property by UL, ignoring the UL version byte
    pub fn get(&self, key: &UL) -> Option<&Property> {
        self.properties.iter().find(|p| p.key.matches_item(key))
    }

    pub fn contains(&self, key: &UL) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Items skipped because their tag had no primer entry
    pub fn unresolved_count(&self) -> usize {
        self.unresolved
    }

    fn fixed<const N: usize>(&self, key: &UL) -> Result<Option<[u8; N]>> {
        let Some(property) = self.get(key) else {
            return Ok(None);
        };
        let bytes: [u8; N] = property
            .value
            .as_slice()
            .try_into()
            .map_err(|_| MxfError::InvalidKlv {
                message: format!(
                    "property {} is {} bytes, expected {}",
                    property.key.to_urn(),
                    property.value.len(),
                    N
                ),
                offset: property.offset,
            })?;
        Ok(Some(bytes))
    }

    pub fn u8(&self, key: &UL) -> Result<Option<u8>> {
        Ok(self.fixed::<1>(key)?.map(|b| b[0]))
    }

    pub fn u16(&self, key: &UL) -> Result<Option<u16>> {
        Ok(self.fixed::<2>(key)?.map(u16::from_be_bytes))
    }

    pub fn u32(&self, key: &UL) -> Result<Option<u32>> {
        Ok(self.fixed::<4>(key)?.map(u32::from_be_bytes))
    }

    pub fn u64(&self, key: &UL) -> Result<Option<u64>> {
        Ok(self.fixed::<8>(key)?.map(u64::from_be_bytes))
    }

    pub fn rational(&self, key: &UL) -> Result<Option<Rational>> {
        Ok(self
            .fixed::<8>(key)?
            .and_then(|b| Rational::from_bytes(&b)))
    }

    pub fn uuid(&self, key: &UL) -> Result<Option<Uuid>> {
        Ok(self.fixed::<16>(key)?.map(Uuid::from_bytes))
    }

    pub fn label(&self, key: &UL) -> Result<Option<UniversalLabel>> {
        Ok(self.fixed::<16>(key)?.map(UniversalLabel))
    }

    /// Batch or array of 16-byte items (ULs or UUIDs)
    pub fn batch16(&self, key: &UL) -> Result<Option<Vec<[u8; 16]>>> {
        let Some(property) = self.get(key) else {
            return Ok(None);
        };
        let mut cursor = ByteCursor::with_base_offset(&property.value, property.offset + 4);
        let count = cursor.read_u32()?;
        let item_size = cursor.read_u32()?;
        if count > 0 && item_size != 16 {
            return Err(MxfError::InvalidKlv {
                message: format!(
                    "property {} has batch items of {} bytes, expected 16",
                    property.key.to_urn(),
                    item_size
                ),
                offset: property.offset,
            });
        }

        let items = (0..count)
            .map(|_| cursor.read_array::<16>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(items))
    }

    /// UTF-16BE string with trailing NULs removed
    pub fn utf16_string(&self, key: &UL) -> Result<Option<String>> {
        let Some(property) = self.get(key) else {
            return Ok(None);
        };
        Ok(Some(decode_utf16(&property.value)))
    }

    /// ISO 7-bit string with trailing NULs removed
    pub fn iso7_string(&self, key: &UL) -> Result<Option<String>> {
        let Some(property) = self.get(key) else {
            return Ok(None);
        };
        Ok(Some(decode_iso7(&property.value)))
    }
}

/// Decode a UTF-16BE string, dropping trailing NULs
pub fn decode_utf16(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
        .trim_end_matches('\0')
        .to_string()
}

/// Decode an ISO 7-bit string, dropping trailing NULs
pub fn decode_iso7(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches('\0')
        .to_string()
}

/// Essence descriptor class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    /// CDCI picture essence descriptor
    CdciPicture,
    /// RGBA picture essence descriptor
    RgbaPicture,
    /// Wave audio essence descriptor
    WaveAudio,
}

impl DescriptorKind {
    pub fn is_picture(&self) -> bool {
        matches!(self, DescriptorKind::CdciPicture | DescriptorKind::RgbaPicture)
    }

    pub fn essence_type(&self) -> EssenceType {
        if self.is_picture() {
            EssenceType::MainImageSequence
        } else {
            EssenceType::MainAudioSequence
        }
    }
}

/// Sub-descriptor class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubDescriptorKind {
    SoundFieldGroupLabel,
    AudioChannelLabel,
    GroupOfSoundFieldGroupsLabel,
    Jpeg2000Picture,
}

/// Picture-specific descriptor fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PictureDescriptor {
    pub frame_layout: Option<FrameLayout>,
    pub stored_width: Option<u32>,
    pub stored_height: Option<u32>,
    /// Bits per component (CDCI only)
    pub component_depth: Option<u32>,
}

impl PictureDescriptor {
    /// Stored frame size when both dimensions are present
    pub fn stored_size(&self) -> Option<FrameSize> {
        Some(FrameSize::new(self.stored_width?, self.stored_height?))
    }
}

/// Audio-specific descriptor fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioDescriptor {
    pub audio_sampling_rate: Option<Rational>,
    pub locked: Option<bool>,
    pub channel_count: Option<u32>,
    pub quantization_bits: Option<u32>,
    pub block_align: Option<u16>,
}

/// Essence descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EssenceDescriptor {
    pub kind: DescriptorKind,
    /// KLV header of the set
    pub header: KlvHeader,
    pub instance_uid: Option<Uuid>,
    /// All resolved properties, decoded or not
    pub properties: PropertySet,
    /// Strong references to sub-descriptors, in stream order
    pub sub_descriptor_refs: Vec<Uuid>,
    pub sample_rate: Option<Rational>,
    pub container_duration: Option<u64>,
    pub essence_container: Option<UniversalLabel>,
    pub picture: Option<PictureDescriptor>,
    pub audio: Option<AudioDescriptor>,
}

/// Multichannel audio labelling fields (ST 377-4)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct McaLabel {
    pub label_dictionary_id: Option<UniversalLabel>,
    pub link_id: Option<Uuid>,
    pub tag_symbol: Option<String>,
    pub tag_name: Option<String>,
    pub channel_id: Option<u32>,
    /// RFC 5646 language tag
    pub spoken_language: Option<String>,
}

/// Sub-descriptor referenced from an essence descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubDescriptor {
    pub kind: SubDescriptorKind,
    pub header: KlvHeader,
    pub instance_uid: Option<Uuid>,
    pub properties: PropertySet,
    /// Present for the three MCA label sub-descriptors
    pub mca: Option<McaLabel>,
}

impl SubDescriptor {
    /// RFC 5646 spoken language of an MCA label sub-descriptor
    pub fn spoken_language(&self) -> Option<&str> {
        self.mca.as_ref()?.spoken_language.as_deref()
    }
}

/// Preface set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preface {
    pub header: KlvHeader,
    pub instance_uid: Option<Uuid>,
    pub operational_pattern: Option<UniversalLabel>,
    pub essence_containers: Vec<UniversalLabel>,
}

/// Header metadata set understood by this crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterchangeObject {
    Preface(Preface),
    EssenceDescriptor(EssenceDescriptor),
    SubDescriptor(SubDescriptor),
}

impl InterchangeObject {
    /// KLV header of the set
    pub fn header(&self) -> &KlvHeader {
        match self {
            InterchangeObject::Preface(p) => &p.header,
            InterchangeObject::EssenceDescriptor(d) => &d.header,
            InterchangeObject::SubDescriptor(s) => &s.header,
        }
    }

    pub fn instance_uid(&self) -> Option<Uuid> {
        match self {
            InterchangeObject::Preface(p) => p.instance_uid,
            InterchangeObject::EssenceDescriptor(d) => d.instance_uid,
            InterchangeObject::SubDescriptor(s) => s.instance_uid,
        }
    }

    /// Sub-descriptors this object references (empty unless a descriptor)
    pub fn sub_descriptor_refs(&self) -> &[Uuid] {
        match self {
            InterchangeObject::EssenceDescriptor(d) => &d.sub_descriptor_refs,
            _ => &[],
        }
    }

    /// Kind of essence this object describes
    pub fn essence_kind(&self) -> EssenceType {
        match self {
            InterchangeObject::Preface(_) => EssenceType::Unknown,
            InterchangeObject::EssenceDescriptor(d) => d.kind.essence_type(),
            InterchangeObject::SubDescriptor(s) => match s.kind {
                SubDescriptorKind::Jpeg2000Picture => EssenceType::MainImageSequence,
                _ => EssenceType::MainAudioSequence,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum SetClass {
    Preface,
    Descriptor(DescriptorKind),
    Sub(SubDescriptorKind),
}

const SET_CLASSES: [(&UL, SetClass); 8] = [
    (&labels::PREFACE, SetClass::Preface),
    (
        &labels::CDCI_DESCRIPTOR,
        SetClass::Descriptor(DescriptorKind::CdciPicture),
    ),
    (
        &labels::RGBA_DESCRIPTOR,
        SetClass::Descriptor(DescriptorKind::RgbaPicture),
    ),
    (
        &labels::WAVE_AUDIO_DESCRIPTOR,
        SetClass::Descriptor(DescriptorKind::WaveAudio),
    ),
    (
        &labels::JPEG2000_SUB_DESCRIPTOR,
        SetClass::Sub(SubDescriptorKind::Jpeg2000Picture),
    ),
    (
        &labels::AUDIO_CHANNEL_LABEL_SUB_DESCRIPTOR,
        SetClass::Sub(SubDescriptorKind::AudioChannelLabel),
    ),
    (
        &labels::SOUNDFIELD_GROUP_LABEL_SUB_DESCRIPTOR,
        SetClass::Sub(SubDescriptorKind::SoundFieldGroupLabel),
    ),
    (
        &labels::GROUP_OF_SOUNDFIELD_GROUPS_LABEL_SUB_DESCRIPTOR,
        SetClass::Sub(SubDescriptorKind::GroupOfSoundFieldGroupsLabel),
    ),
];

fn classify(key: &UniversalLabel) -> Option<SetClass> {
    SET_CLASSES
        .iter()
        .find(|(pattern, _)| key.matches_set(pattern))
        .map(|(_, class)| *class)
}

fn parse_object(
    class: SetClass,
    header: KlvHeader,
    value: &[u8],
    primer: &PrimerPack,
) -> Result<InterchangeObject> {
    let properties = PropertySet::parse(value, header.value_offset(), primer)?;
    let instance_uid = properties.uuid(&labels::INSTANCE_UID)?;

    let object = match class {
        SetClass::Preface => InterchangeObject::Preface(Preface {
            header,
            instance_uid,
            operational_pattern: properties.label(&labels::OPERATIONAL_PATTERN)?,
            essence_containers: properties
                .batch16(&labels::ESSENCE_CONTAINERS)?
                .unwrap_or_default()
                .into_iter()
                .map(UniversalLabel)
                .collect(),
        }),
        SetClass::Descriptor(kind) => {
            let picture = if kind.is_picture() {
                Some(PictureDescriptor {
                    frame_layout: properties.u8(&labels::FRAME_LAYOUT)?.map(FrameLayout::from),
                    stored_width: properties.u32(&labels::STORED_WIDTH)?,
                    stored_height: properties.u32(&labels::STORED_HEIGHT)?,
                    component_depth: properties.u32(&labels::COMPONENT_DEPTH)?,
                })
            } else {
                None
            };
            let audio = if kind == DescriptorKind::WaveAudio {
                Some(AudioDescriptor {
                    audio_sampling_rate: properties.rational(&labels::AUDIO_SAMPLING_RATE)?,
                    locked: properties.u8(&labels::LOCKED)?.map(|b| b != 0),
                    channel_count: properties.u32(&labels::CHANNEL_COUNT)?,
                    quantization_bits: properties.u32(&labels::QUANTIZATION_BITS)?,
                    block_align: properties.u16(&labels::BLOCK_ALIGN)?,
                })
            } else {
                None
            };

            InterchangeObject::EssenceDescriptor(EssenceDescriptor {
                kind,
                header,
                instance_uid,
                sub_descriptor_refs: properties
                    .batch16(&labels::SUB_DESCRIPTORS)?
                    .unwrap_or_default()
                    .into_iter()
                    .map(Uuid::from_bytes)
                    .collect(),
                sample_rate: properties.rational(&labels::SAMPLE_RATE)?,
                container_duration: properties.u64(&labels::CONTAINER_DURATION)?,
                essence_container: properties.label(&labels::ESSENCE_CONTAINER)?,
                picture,
                audio,
                properties,
            })
        }
        SetClass::Sub(kind) => {
            let mca = if kind == SubDescriptorKind::Jpeg2000Picture {
                None
            } else {
                Some(McaLabel {
                    label_dictionary_id: properties.label(&labels::MCA_LABEL_DICTIONARY_ID)?,
                    link_id: properties.uuid(&labels::MCA_LINK_ID)?,
                    tag_symbol: properties.utf16_string(&labels::MCA_TAG_SYMBOL)?,
                    tag_name: properties.utf16_string(&labels::MCA_TAG_NAME)?,
                    channel_id: properties.u32(&labels::MCA_CHANNEL_ID)?,
                    spoken_language: properties.iso7_string(&labels::RFC5646_SPOKEN_LANGUAGE)?,
                })
            };

            InterchangeObject::SubDescriptor(SubDescriptor {
                kind,
                header,
                instance_uid,
                properties,
                mca,
            })
        }
    };

    Ok(object)
}

/// Parsed header partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPartition {
    partition_pack: PartitionPack,
    primer_pack: PrimerPack,
    objects: Vec<InterchangeObject>,
    sub_descriptor_index: HashMap<Uuid, usize>,
    ignored_sets: usize,
}

impl HeaderPartition {
    /// Parse a header partition from bytes starting at its partition pack.
    ///
    /// `offset` is the resource offset of `data[0]`.
    pub fn parse(data: &[u8], offset: u64, config: &ReaderConfig) -> Result<Self> {
        let max_lfs = config.max_length_field_size;
        let partition_pack = PartitionPack::parse(data, offset, max_lfs)?;

        let mut cursor = ByteCursor::with_base_offset(data, offset);
        cursor.skip(to_len(partition_pack.header.total_size(), offset)?)?;

        // Fill items may sit between the partition pack and the primer pack
        let primer_header = loop {
            if cursor.is_eof() {
                return Err(MxfError::Structural(format!(
                    "header partition at offset {} has no primer pack",
                    offset
                )));
            }
            let header = KlvHeader::read(&mut cursor, max_lfs)?;
            if header.key.is_fill_item() {
                cursor.skip(header.value_len()?)?;
                continue;
            }
            if !header.key.is_primer_pack() {
                return Err(MxfError::Structural(format!(
                    "expected primer pack at offset {}, found {}",
                    header.offset, header.key
                )));
            }
            break header;
        };

        let primer_value = cursor.read_bytes(primer_header.value_len()?)?;
        let primer_pack = PrimerPack::parse(primer_header, primer_value)?;

        let primer_start = (primer_header.offset - offset) as usize;
        let metadata_end = if partition_pack.header_byte_count == 0 {
            data.len()
        } else {
            let declared = (primer_start as u64).saturating_add(partition_pack.header_byte_count);
            declared.min(data.len() as u64) as usize
        };

        let mut objects = Vec::new();
        let mut ignored_sets = 0usize;

        while cursor.position() < metadata_end {
            config.check_cancelled()?;

            let header = KlvHeader::read(&mut cursor, max_lfs)?;
            let key = header.key;
            let kind = key.kind();
            if matches!(
                kind,
                LabelKind::PartitionPack
                    | LabelKind::IndexTable
                    | LabelKind::RandomIndexPack
                    | LabelKind::EssenceElement
            ) {
                log::debug!("Header metadata ends at {} ({})", header.offset, key);
                break;
            }

            let value = cursor.read_bytes(header.value_len()?)?;
            match (kind, classify(&key)) {
                (LabelKind::FillItem, _) => {}
                (LabelKind::MetadataSet, Some(class)) => {
                    objects.push(parse_object(class, header, value, &primer_pack)?)
                }
                _ => {
                    log::debug!("Skipping {} at offset {}", key, header.offset);
                    ignored_sets += 1;
                }
            }
        }

        let mut sub_descriptor_index = HashMap::new();
        for (i, object) in objects.iter().enumerate() {
            if let InterchangeObject::SubDescriptor(_) = object {
                if let Some(uid) = object.instance_uid() {
                    sub_descriptor_index.insert(uid, i);
                }
            }
        }

        for object in &objects {
            for uid in object.sub_descriptor_refs() {
                if !sub_descriptor_index.contains_key(uid) {
                    log::warn!(
                        "Descriptor at offset {} references missing sub-descriptor {}",
                        object.header().offset,
                        uid
                    );
                }
            }
        }

        log::debug!(
            "Header partition at offset {}: {} sets decoded, {} skipped",
            offset,
            objects.len(),
            ignored_sets
        );

        Ok(HeaderPartition {
            partition_pack,
            primer_pack,
            objects,
            sub_descriptor_index,
            ignored_sets,
        })
    }

    pub fn partition_pack(&self) -> &PartitionPack {
        &self.partition_pack
    }

    pub fn primer_pack(&self) -> &PrimerPack {
        &self.primer_pack
    }

    /// Decoded sets in stream order
    pub fn objects(&self) -> &[InterchangeObject] {
        &self.objects
    }

    /// Number of header metadata sets that were not decoded
    pub fn ignored_set_count(&self) -> usize {
        self.ignored_sets
    }

    pub fn preface(&self) -> Option<&Preface> {
        self.objects.iter().find_map(|o| match o {
            InterchangeObject::Preface(p) => Some(p),
            _ => None,
        })
    }

    /// Essence descriptors in stream order
    pub fn essence_descriptors(&self) -> Vec<&EssenceDescriptor> {
        self.objects
            .iter()
            .filter_map(|o| match o {
                InterchangeObject::EssenceDescriptor(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    fn has_descriptor(&self, kind: DescriptorKind) -> bool {
        self.essence_descriptors().iter().any(|d| d.kind == kind)
    }

    pub fn has_cdci_picture_essence_descriptor(&self) -> bool {
        self.has_descriptor(DescriptorKind::CdciPicture)
    }

    pub fn has_rgba_picture_essence_descriptor(&self) -> bool {
        self.has_descriptor(DescriptorKind::RgbaPicture)
    }

    pub fn has_wave_audio_essence_descriptor(&self) -> bool {
        self.has_descriptor(DescriptorKind::WaveAudio)
    }

    /// Sub-descriptors referenced by `descriptor`, in reference order.
    ///
    /// References with no matching sub-descriptor are left out.
    pub fn sub_descriptors(&self, descriptor: &EssenceDescriptor) -> Vec<&SubDescriptor> {
        descriptor
            .sub_descriptor_refs
            .iter()
            .filter_map(|uid| self.sub_descriptor(uid))
            .collect()
    }

    /// Sub-descriptor by instance UID
    pub fn sub_descriptor(&self, uid: &Uuid) -> Option<&SubDescriptor> {
        match self.objects.get(*self.sub_descriptor_index.get(uid)?)? {
            InterchangeObject::SubDescriptor(s) => Some(s),
            _ => None,
        }
    }

    fn sub_descriptors_of(&self, kind: SubDescriptorKind) -> Vec<&SubDescriptor> {
        self.objects
            .iter()
            .filter_map(|o| match o {
                InterchangeObject::SubDescriptor(s) if s.kind == kind => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn sound_field_group_label_sub_descriptors(&self) -> Vec<&SubDescriptor> {
        self.sub_descriptors_of(SubDescriptorKind::SoundFieldGroupLabel)
    }

    pub fn audio_channel_label_sub_descriptors(&self) -> Vec<&SubDescriptor> {
        self.sub_descriptors_of(SubDescriptorKind::AudioChannelLabel)
    }
}

fn to_len(size: u64, offset: u64) -> Result<usize> {
    usize::try_from(size).map_err(|_| MxfError::InvalidKlv {
        message: format!("packet of {} bytes is not addressable", size),
        offset,
    })
}
