//! IMF essence component constraints (SMPTE ST 2067-5)
//!
//! Applied on top of OP1A. An IMF track file carries exactly one kind of
//! essence, described by a single CDCI, RGBA or wave audio descriptor, in a
//! single generic container.

use crate::compliance::{ComplianceReport, ImfRule, Stage};
use crate::error::{MxfError, Result};
use crate::header::{DescriptorKind, EssenceDescriptor, HeaderPartition};
use crate::op1a::{HeaderPartitionOp1a, Op1aPartitions};
use crate::partition::PartitionPack;
use crate::types::EssenceType;
use crate::ul::UniversalLabel;

/// Generic container mapping kinds allowed in IMF track files
const MAPPING_JPEG2000: u8 = 0x0C;
const MAPPING_UNCOMPRESSED_PICTURE: u8 = 0x05;
const MAPPING_BROADCAST_WAVE: u8 = 0x06;

/// Whether `label` is a generic container mapping an IMF track file may use
pub fn is_allowed_essence_container(label: &UniversalLabel) -> bool {
    match label.generic_container_mapping() {
        Some((MAPPING_JPEG2000, _)) | Some((MAPPING_UNCOMPRESSED_PICTURE, _)) => true,
        // Frame or clip wrapped
        Some((MAPPING_BROADCAST_WAVE, wrapping)) => matches!(wrapping, 0x01 | 0x02),
        _ => false,
    }
}

fn check_containers(pack: &PartitionPack, report: &mut ComplianceReport) {
    for label in &pack.essence_containers {
        if !is_allowed_essence_container(label) {
            report.push(
                ImfRule::GenericContainer,
                Some(pack.offset()),
                format!(
                    "{:?} partition declares essence container {} which is not allowed",
                    pack.kind,
                    label.to_urn()
                ),
            );
        }
    }
}

/// Partition packs that satisfy OP1A and IMF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImfPartitions {
    partitions: Op1aPartitions,
}

impl ImfPartitions {
    pub fn validate(partitions: Op1aPartitions) -> Result<Self> {
        let mut report = ComplianceReport::new(Stage::Imf);

        let header = partitions.header();
        if header.essence_containers.len() != 1 {
            report.push(
                ImfRule::SingleEssenceContainer,
                Some(header.offset()),
                format!(
                    "header partition declares {} essence containers, expected 1",
                    header.essence_containers.len()
                ),
            );
        }

        for pack in partitions.partitions() {
            if pack.has_essence() && pack.has_index_table() {
                report.push(
                    ImfRule::EssenceAndIndexMixed,
                    Some(pack.offset()),
                    format!(
                        "partition carries essence (body SID {}) and {} bytes of index table",
                        pack.body_sid, pack.index_byte_count
                    ),
                );
            }
            check_containers(pack, &mut report);
        }

        if !report.passed() {
            return Err(MxfError::ImfCompliance(report));
        }
        Ok(ImfPartitions { partitions })
    }

    /// All partition packs in resource order
    pub fn partitions(&self) -> &[PartitionPack] {
        self.partitions.partitions()
    }

    pub fn op1a(&self) -> &Op1aPartitions {
        &self.partitions
    }

    pub fn into_partitions(self) -> Vec<PartitionPack> {
        self.partitions.into_partitions()
    }
}

fn missing_fields(descriptor: &EssenceDescriptor) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if descriptor.sample_rate.is_none() {
        missing.push("SampleRate");
    }

    if descriptor.kind.is_picture() {
        let picture = descriptor.picture.clone().unwrap_or_default();
        if picture.frame_layout.is_none() {
            missing.push("FrameLayout");
        }
        if picture.stored_width.is_none() {
            missing.push("StoredWidth");
        }
        if picture.stored_height.is_none() {
            missing.push("StoredHeight");
        }
    } else {
        let audio = descriptor.audio.clone().unwrap_or_default();
        if audio.audio_sampling_rate.is_none() {
            missing.push("AudioSamplingRate");
        }
        if audio.channel_count.is_none() {
            missing.push("ChannelCount");
        }
        if audio.quantization_bits.is_none() {
            missing.push("QuantizationBits");
        }
    }
    missing
}

/// Header partition that satisfies OP1A and IMF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPartitionImf {
    header: HeaderPartitionOp1a,
}

impl HeaderPartitionImf {
    pub fn validate(header: HeaderPartitionOp1a) -> Result<Self> {
        let mut report = ComplianceReport::new(Stage::Imf);
        let partition = header.header_partition();

        let descriptors = partition.essence_descriptors();
        if descriptors.len() != 1 {
            let kinds: Vec<String> = descriptors.iter().map(|d| format!("{:?}", d.kind)).collect();
            report.push(
                ImfRule::DescriptorCount,
                Some(partition.partition_pack().offset()),
                format!(
                    "found {} essence descriptors [{}], expected exactly one CDCI, RGBA or wave audio descriptor",
                    descriptors.len(),
                    kinds.join(", ")
                ),
            );
        }

        for descriptor in &descriptors {
            let missing = missing_fields(descriptor);
            if !missing.is_empty() {
                report.push(
                    ImfRule::RequiredField,
                    Some(descriptor.header.offset),
                    format!(
                        "{:?} descriptor is missing {}",
                        descriptor.kind,
                        missing.join(", ")
                    ),
                );
            }
            if let Some(label) = descriptor.essence_container {
                if !is_allowed_essence_container(&label) {
                    report.push(
                        ImfRule::GenericContainer,
                        Some(descriptor.header.offset),
                        format!(
                            "{:?} descriptor uses essence container {} which is not allowed",
                            descriptor.kind,
                            label.to_urn()
                        ),
                    );
                }
            }
        }

        check_containers(partition.partition_pack(), &mut report);

        if !report.passed() {
            return Err(MxfError::ImfCompliance(report));
        }
        Ok(HeaderPartitionImf { header })
    }

    pub fn header_partition(&self) -> &HeaderPartition {
        self.header.header_partition()
    }

    /// The single essence descriptor
    pub fn essence_descriptor(&self) -> Option<&EssenceDescriptor> {
        self.header_partition().essence_descriptors().into_iter().next()
    }

    /// Essence type implied by the essence descriptor
    pub fn essence_type(&self) -> EssenceType {
        let partition = self.header_partition();
        if partition.has_cdci_picture_essence_descriptor()
            || partition.has_rgba_picture_essence_descriptor()
        {
            EssenceType::MainImageSequence
        } else if partition.has_wave_audio_essence_descriptor() {
            EssenceType::MainAudioSequence
        } else {
            EssenceType::Unknown
        }
    }

    /// Descriptor kind of the single essence descriptor
    pub fn descriptor_kind(&self) -> Option<DescriptorKind> {
        self.essence_descriptor().map(|d| d.kind)
    }

    pub fn into_header_partition(self) -> HeaderPartition {
        self.header.into_header_partition()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReaderConfig;
    use crate::header::tests::{
        cdci_descriptor, header_partition_bytes, local_set, rational, uid, wave_descriptor,
    };
    use crate::klv::MAX_LENGTH_FIELD_SIZE;
    use crate::partition::tests::pack_bytes;
    use crate::ul::{labels, UL};

    fn op1a_header(sets: &[Vec<u8>], essence_containers: &[UL]) -> HeaderPartitionOp1a {
        let data = header_partition_bytes(sets, essence_containers);
        let header = HeaderPartition::parse(&data, 0, &ReaderConfig::default()).unwrap();
        HeaderPartitionOp1a::validate(header).unwrap()
    }

    fn op1a_partitions(packs: &[(UL, u32, u64, Vec<UL>)]) -> Op1aPartitions {
        let packs = packs
            .iter()
            .enumerate()
            .map(|(i, (key, sid, index, ecs))| {
                let data = pack_bytes(*key, labels::OP1A, *sid, *index, 0, ecs);
                PartitionPack::parse(&data, i as u64 * 1000, MAX_LENGTH_FIELD_SIZE).unwrap()
            })
            .collect();
        Op1aPartitions::validate(packs).unwrap()
    }

    fn report(err: MxfError) -> ComplianceReport {
        match err {
            MxfError::ImfCompliance(report) => report,
            other => panic!("expected IMF failure, got {:?}", other),
        }
    }

    #[test]
    fn test_allowed_essence_containers() {
        assert!(is_allowed_essence_container(&UniversalLabel(labels::ESSENCE_JPEG2000)));
        assert!(is_allowed_essence_container(&UniversalLabel(labels::ESSENCE_UNCOMPRESSED)));
        assert!(is_allowed_essence_container(&UniversalLabel(labels::ESSENCE_WAVE_CLIP)));
        assert!(!is_allowed_essence_container(&UniversalLabel(labels::ESSENCE_MPEG2)));
        assert!(!is_allowed_essence_container(&UniversalLabel(labels::PREFACE)));

        let mut custom_wrapped = labels::ESSENCE_WAVE_CLIP;
        custom_wrapped[14] = 0x7F;
        assert!(!is_allowed_essence_container(&UniversalLabel(custom_wrapped)));
    }

    #[test]
    fn test_picture_header_passes() {
        let header = op1a_header(&[cdci_descriptor(1)], &[labels::ESSENCE_JPEG2000]);
        let imf = HeaderPartitionImf::validate(header).unwrap();
        assert_eq!(imf.essence_type(), EssenceType::MainImageSequence);
        assert_eq!(imf.descriptor_kind(), Some(DescriptorKind::CdciPicture));
    }

    #[test]
    fn test_two_descriptors_fail_imf_only() {
        let header = op1a_header(
            &[cdci_descriptor(1), wave_descriptor(2, &[])],
            &[labels::ESSENCE_JPEG2000],
        );
        let report = report(HeaderPartitionImf::validate(header).unwrap_err());
        assert_eq!(report.stage, Stage::Imf);
        assert!(report.has_violation(ImfRule::DescriptorCount));
    }

    #[test]
    fn test_missing_required_fields() {
        let sparse = local_set(
            labels::WAVE_AUDIO_DESCRIPTOR,
            &[(0x3C0A, uid(1).to_vec()), (0x3D03, rational(48000, 1))],
        );
        let header = op1a_header(&[sparse], &[labels::ESSENCE_WAVE_CLIP]);
        let report = report(HeaderPartitionImf::validate(header).unwrap_err());

        let violations = report.violations_of(ImfRule::RequiredField);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("SampleRate"));
        assert!(violations[0].message.contains("ChannelCount"));
        assert!(violations[0].message.contains("QuantizationBits"));
        assert!(!violations[0].message.contains("AudioSamplingRate"));
    }

    #[test]
    fn test_disallowed_partition_container() {
        let header = op1a_header(&[cdci_descriptor(1)], &[labels::ESSENCE_MPEG2]);
        let report = report(HeaderPartitionImf::validate(header).unwrap_err());
        assert!(report.has_violation(ImfRule::GenericContainer));
    }

    #[test]
    fn test_imf_partitions() {
        let ec = vec![labels::ESSENCE_JPEG2000];
        let partitions = op1a_partitions(&[
            (labels::HEADER_PARTITION_CLOSED_COMPLETE, 0, 0, ec.clone()),
            (labels::BODY_PARTITION_CLOSED_COMPLETE, 1, 0, ec.clone()),
            (labels::FOOTER_PARTITION, 0, 256, ec),
        ]);
        let imf = ImfPartitions::validate(partitions).unwrap();
        assert_eq!(imf.partitions().len(), 3);
    }

    #[test]
    fn test_partition_violations() {
        let partitions = op1a_partitions(&[
            (labels::HEADER_PARTITION_CLOSED_COMPLETE, 0, 0, vec![]),
            (labels::BODY_PARTITION_CLOSED_COMPLETE, 1, 128, vec![]),
        ]);
        let report = report(ImfPartitions::validate(partitions).unwrap_err());
        assert!(report.has_violation(ImfRule::SingleEssenceContainer));
        let mixed = report.violations_of(ImfRule::EssenceAndIndexMixed);
        assert_eq!(mixed.len(), 1);
        assert_eq!(mixed[0].offset, Some(1000));
    }
}
