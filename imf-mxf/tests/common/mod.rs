//! Synthetic MXF track files for integration tests

#![allow(dead_code)]

use imf_mxf::{labels, UL};

pub const TAG_SUB_DESCRIPTORS: u16 = 0xFF01;
pub const TAG_SPOKEN_LANGUAGE: u16 = 0xFF02;
pub const TAG_TAG_SYMBOL: u16 = 0xFF03;

/// JPEG 2000 picture element key
pub const PICTURE_ELEMENT: UL = [
    0x06, 0x0E, 0x2B, 0x34, 0x01, 0x02, 0x01, 0x01, 0x0D, 0x01, 0x03, 0x01, 0x15, 0x01, 0x08,
    0x01,
];

/// KLV with a 4-byte BER length
pub fn klv(key: UL, value: &[u8]) -> Vec<u8> {
    let mut data = key.to_vec();
    data.push(0x83);
    data.extend_from_slice(&(value.len() as u32).to_be_bytes()[1..]);
    data.extend_from_slice(value);
    data
}

pub struct PackFields<'a> {
    pub key: UL,
    pub operational_pattern: UL,
    pub this_partition: u64,
    pub body_sid: u32,
    pub index_byte_count: u64,
    pub header_byte_count: u64,
    pub essence_containers: &'a [UL],
}

pub fn partition_pack(fields: &PackFields<'_>) -> Vec<u8> {
    let mut value = Vec::new();
    value.extend_from_slice(&1u16.to_be_bytes());
    value.extend_from_slice(&3u16.to_be_bytes());
    value.extend_from_slice(&1u32.to_be_bytes());
    value.extend_from_slice(&fields.this_partition.to_be_bytes());
    value.extend_from_slice(&0u64.to_be_bytes());
    value.extend_from_slice(&0u64.to_be_bytes());
    value.extend_from_slice(&fields.header_byte_count.to_be_bytes());
    value.extend_from_slice(&fields.index_byte_count.to_be_bytes());
    value.extend_from_slice(&0u32.to_be_bytes());
    value.extend_from_slice(&0u64.to_be_bytes());
    value.extend_from_slice(&fields.body_sid.to_be_bytes());
    value.extend_from_slice(&fields.operational_pattern);
    value.extend_from_slice(&(fields.essence_containers.len() as u32).to_be_bytes());
    value.extend_from_slice(&16u32.to_be_bytes());
    for ec in fields.essence_containers {
        value.extend_from_slice(ec);
    }
    klv(fields.key, &value)
}

pub fn primer() -> Vec<u8> {
    let entries: [(u16, UL); 15] = [
        (0x3C0A, labels::INSTANCE_UID),
        (0x3B09, labels::OPERATIONAL_PATTERN),
        (0x3B0A, labels::ESSENCE_CONTAINERS),
        (0x3001, labels::SAMPLE_RATE),
        (0x3002, labels::CONTAINER_DURATION),
        (0x3004, labels::ESSENCE_CONTAINER),
        (0x320C, labels::FRAME_LAYOUT),
        (0x3203, labels::STORED_WIDTH),
        (0x3202, labels::STORED_HEIGHT),
        (0x3D03, labels::AUDIO_SAMPLING_RATE),
        (0x3D07, labels::CHANNEL_COUNT),
        (0x3D01, labels::QUANTIZATION_BITS),
        (TAG_SUB_DESCRIPTORS, labels::SUB_DESCRIPTORS),
        (TAG_SPOKEN_LANGUAGE, labels::RFC5646_SPOKEN_LANGUAGE),
        (TAG_TAG_SYMBOL, labels::MCA_TAG_SYMBOL),
    ];
    let mut value = (entries.len() as u32).to_be_bytes().to_vec();
    value.extend_from_slice(&18u32.to_be_bytes());
    for (tag, ul) in entries {
        value.extend_from_slice(&tag.to_be_bytes());
        value.extend_from_slice(&ul);
    }
    klv(labels::PRIMER_PACK, &value)
}

pub fn local_set(key: UL, items: &[(u16, Vec<u8>)]) -> Vec<u8> {
    let mut value = Vec::new();
    for (tag, item) in items {
        value.extend_from_slice(&tag.to_be_bytes());
        value.extend_from_slice(&(item.len() as u16).to_be_bytes());
        value.extend_from_slice(item);
    }
    klv(key, &value)
}

pub fn batch(items: &[[u8; 16]]) -> Vec<u8> {
    let mut data = (items.len() as u32).to_be_bytes().to_vec();
    data.extend_from_slice(&16u32.to_be_bytes());
    for item in items {
        data.extend_from_slice(item);
    }
    data
}

pub fn rational(n: i32, d: i32) -> Vec<u8> {
    let mut data = n.to_be_bytes().to_vec();
    data.extend_from_slice(&d.to_be_bytes());
    data
}

pub fn uid(n: u8) -> [u8; 16] {
    let mut bytes = [0u8; 16];
    bytes[0] = 0xB0;
    bytes[15] = n;
    bytes
}

pub fn preface(operational_pattern: UL, essence_containers: &[UL]) -> Vec<u8> {
    local_set(
        labels::PREFACE,
        &[
            (0x3C0A, uid(1).to_vec()),
            (0x3B09, operational_pattern.to_vec()),
            (0x3B0A, batch(essence_containers)),
        ],
    )
}

pub fn cdci_descriptor() -> Vec<u8> {
    local_set(
        labels::CDCI_DESCRIPTOR,
        &[
            (0x3C0A, uid(2).to_vec()),
            (0x3001, rational(24, 1)),
            (0x3002, 48u64.to_be_bytes().to_vec()),
            (0x3004, labels::ESSENCE_JPEG2000.to_vec()),
            (0x320C, vec![0]),
            (0x3203, 3840u32.to_be_bytes().to_vec()),
            (0x3202, 2160u32.to_be_bytes().to_vec()),
        ],
    )
}

pub fn wave_descriptor(sub_descriptors: &[[u8; 16]]) -> Vec<u8> {
    local_set(
        labels::WAVE_AUDIO_DESCRIPTOR,
        &[
            (0x3C0A, uid(3).to_vec()),
            (0x3001, rational(24, 1)),
            (0x3004, labels::ESSENCE_WAVE_CLIP.to_vec()),
            (0x3D03, rational(48000, 1)),
            (0x3D07, 6u32.to_be_bytes().to_vec()),
            (0x3D01, 24u32.to_be_bytes().to_vec()),
            (TAG_SUB_DESCRIPTORS, batch(sub_descriptors)),
        ],
    )
}

pub fn soundfield_group(instance: [u8; 16], language: Option<&str>) -> Vec<u8> {
    let symbol: Vec<u8> = "sg51".encode_utf16().flat_map(|u| u.to_be_bytes()).collect();
    let mut items = vec![(0x3C0A, instance.to_vec()), (TAG_TAG_SYMBOL, symbol)];
    if let Some(language) = language {
        items.push((TAG_SPOKEN_LANGUAGE, language.as_bytes().to_vec()));
    }
    local_set(labels::SOUNDFIELD_GROUP_LABEL_SUB_DESCRIPTOR, &items)
}

pub fn rip(entries: &[(u32, u64)]) -> Vec<u8> {
    let mut value = Vec::new();
    for (sid, offset) in entries {
        value.extend_from_slice(&sid.to_be_bytes());
        value.extend_from_slice(&offset.to_be_bytes());
    }
    let overall = (16 + 4 + value.len() + 4) as u32;
    value.extend_from_slice(&overall.to_be_bytes());
    klv(labels::RANDOM_INDEX_PACK, &value)
}

/// Layout of a synthetic track file
pub struct TrackFile {
    pub operational_pattern: UL,
    pub essence_containers: Vec<UL>,
    pub header_sets: Vec<Vec<u8>>,
    pub body_index_byte_count: u64,
    pub with_footer: bool,
}

impl TrackFile {
    pub fn picture() -> Self {
        TrackFile {
            operational_pattern: labels::OP1A,
            essence_containers: vec![labels::ESSENCE_JPEG2000],
            header_sets: vec![
                preface(labels::OP1A, &[labels::ESSENCE_JPEG2000]),
                cdci_descriptor(),
            ],
            body_index_byte_count: 0,
            with_footer: true,
        }
    }

    /// Audio track file with one sound field group per language entry
    pub fn audio(languages: &[Option<&str>]) -> Self {
        let groups: Vec<[u8; 16]> = (0..languages.len()).map(|i| uid(10 + i as u8)).collect();
        let mut header_sets = vec![
            preface(labels::OP1A, &[labels::ESSENCE_WAVE_CLIP]),
            wave_descriptor(&groups),
        ];
        for (group, language) in groups.iter().zip(languages) {
            header_sets.push(soundfield_group(*group, *language));
        }

        TrackFile {
            operational_pattern: labels::OP1A,
            essence_containers: vec![labels::ESSENCE_WAVE_CLIP],
            header_sets,
            body_index_byte_count: 0,
            with_footer: true,
        }
    }

    /// File bytes and the partition offsets listed in its RIP
    pub fn build_with_offsets(&self) -> (Vec<u8>, Vec<u64>) {
        let mut metadata = primer();
        for set in &self.header_sets {
            metadata.extend_from_slice(set);
        }

        let mut file = partition_pack(&PackFields {
            key: labels::HEADER_PARTITION_CLOSED_COMPLETE,
            operational_pattern: self.operational_pattern,
            this_partition: 0,
            body_sid: 0,
            index_byte_count: 0,
            header_byte_count: metadata.len() as u64,
            essence_containers: &self.essence_containers,
        });
        file.extend_from_slice(&metadata);
        let mut entries = vec![(0u32, 0u64)];

        let body = file.len() as u64;
        file.extend_from_slice(&partition_pack(&PackFields {
            key: labels::BODY_PARTITION_CLOSED_COMPLETE,
            operational_pattern: self.operational_pattern,
            this_partition: body,
            body_sid: 1,
            index_byte_count: self.body_index_byte_count,
            header_byte_count: 0,
            essence_containers: &self.essence_containers,
        }));
        file.extend_from_slice(&klv(PICTURE_ELEMENT, &[0xFF, 0x4F, 0xFF, 0x51]));
        entries.push((1, body));

        if self.with_footer {
            let footer = file.len() as u64;
            file.extend_from_slice(&partition_pack(&PackFields {
                key: labels::FOOTER_PARTITION,
                operational_pattern: self.operational_pattern,
                this_partition: footer,
                body_sid: 0,
                index_byte_count: 0,
                header_byte_count: 0,
                essence_containers: &self.essence_containers,
            }));
            entries.push((0, footer));
        }

        file.extend_from_slice(&rip(&entries));
        (file, entries.iter().map(|(_, offset)| *offset).collect())
    }

    pub fn build(&self) -> Vec<u8> {
        self.build_with_offsets().0
    }
}
