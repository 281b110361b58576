//! Operational Pattern 1A constraints (SMPTE ST 378)
//!
//! OP1A files hold a single material package playing a single source
//! package. Structurally that means one header partition at the front,
//! every partition labelled OP1A, and a single essence container set.

use crate::compliance::{ComplianceReport, Op1aRule, Stage};
use crate::error::{MxfError, Result};
use crate::header::HeaderPartition;
use crate::partition::PartitionPack;
use crate::ul::UniversalLabel;
use std::collections::BTreeSet;

fn container_set(pack: &PartitionPack) -> BTreeSet<UniversalLabel> {
    pack.essence_containers.iter().copied().collect()
}

fn check_operational_pattern(pack: &PartitionPack, report: &mut ComplianceReport) {
    if !pack.operational_pattern.is_op1a() {
        report.push(
            Op1aRule::OperationalPattern,
            Some(pack.offset()),
            format!(
                "{:?} partition uses operational pattern {:?}, expected OP1A",
                pack.kind, pack.operational_pattern
            ),
        );
    }
}

/// Partition packs of a file that satisfy OP1A, in resource order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Op1aPartitions {
    partitions: Vec<PartitionPack>,
}

impl Op1aPartitions {
    /// Check the partition list against every OP1A rule
    pub fn validate(partitions: Vec<PartitionPack>) -> Result<Self> {
        let mut report = ComplianceReport::new(Stage::Op1a);

        let header_count = partitions.iter().filter(|p| p.is_header()).count();
        match partitions.first() {
            None => report.push(
                Op1aRule::SingleHeaderPartition,
                None,
                "file lists no partitions",
            ),
            Some(first) if !first.is_header() => report.push(
                Op1aRule::SingleHeaderPartition,
                Some(first.offset()),
                format!("first partition is a {:?} partition", first.kind),
            ),
            Some(_) => {}
        }
        if header_count > 1 {
            report.push(
                Op1aRule::SingleHeaderPartition,
                None,
                format!("found {} header partitions, expected 1", header_count),
            );
        }

        for pack in &partitions {
            check_operational_pattern(pack, &mut report);
        }

        if let Some(header) = partitions.iter().find(|p| p.is_header()) {
            let expected = container_set(header);
            for pack in partitions.iter().filter(|p| !p.essence_containers.is_empty()) {
                if container_set(pack) != expected {
                    report.push(
                        Op1aRule::EssenceContainerConsistency,
                        Some(pack.offset()),
                        format!(
                            "{:?} partition declares {} essence container(s) that differ from the header partition",
                            pack.kind,
                            pack.essence_containers.len()
                        ),
                    );
                }
            }
        }

        let footers: Vec<usize> = partitions
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_footer())
            .map(|(i, _)| i)
            .collect();
        if footers.len() > 1 {
            report.push(
                Op1aRule::FooterPosition,
                None,
                format!("found {} footer partitions", footers.len()),
            );
        }
        if let Some(&i) = footers.first() {
            if i + 1 != partitions.len() {
                report.push(
                    Op1aRule::FooterPosition,
                    Some(partitions[i].offset()),
                    "footer partition is not the last partition",
                );
            }
        }

        if !report.passed() {
            return Err(MxfError::Op1aCompliance(report));
        }
        Ok(Op1aPartitions { partitions })
    }

    /// The header partition pack
    pub fn header(&self) -> &PartitionPack {
        // validate() guarantees the first pack is the header
        &self.partitions[0]
    }

    pub fn body(&self) -> Vec<&PartitionPack> {
        self.partitions.iter().filter(|p| p.is_body()).collect()
    }

    pub fn footer(&self) -> Option<&PartitionPack> {
        self.partitions.iter().find(|p| p.is_footer())
    }

    /// All partition packs in resource order
    pub fn partitions(&self) -> &[PartitionPack] {
        &self.partitions
    }

    pub fn into_partitions(self) -> Vec<PartitionPack> {
        self.partitions
    }
}

/// Header partition that satisfies OP1A
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPartitionOp1a {
    header: HeaderPartition,
}

impl HeaderPartitionOp1a {
    pub fn validate(header: HeaderPartition) -> Result<Self> {
        let mut report = ComplianceReport::new(Stage::Op1a);
        let pack = header.partition_pack();

        if !pack.is_header() {
            report.push(
                Op1aRule::HeaderPartitionKind,
                Some(pack.offset()),
                format!("header metadata read from a {:?} partition", pack.kind),
            );
        }
        check_operational_pattern(pack, &mut report);

        if let Some(preface) = header.preface() {
            match preface.operational_pattern {
                Some(op) if op.is_op1a() => {}
                Some(op) => report.push(
                    Op1aRule::PrefaceOperationalPattern,
                    Some(preface.header.offset),
                    format!("preface operational pattern is {:?}, expected OP1A", op),
                ),
                None => report.push(
                    Op1aRule::PrefaceOperationalPattern,
                    Some(preface.header.offset),
                    "preface has no operational pattern",
                ),
            }
        }

        if !report.passed() {
            return Err(MxfError::Op1aCompliance(report));
        }
        Ok(HeaderPartitionOp1a { header })
    }

    pub fn header_partition(&self) -> &HeaderPartition {
        &self.header
    }

    pub fn into_header_partition(self) -> HeaderPartition {
        self.header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReaderConfig;
    use crate::header::tests::{cdci_descriptor, header_partition_bytes, local_set};
    use crate::klv::MAX_LENGTH_FIELD_SIZE;
    use crate::partition::tests::pack_bytes;
    use crate::ul::{labels, UL};

    fn pack(key: UL, op: UL, essence_containers: &[UL], offset: u64) -> PartitionPack {
        let data = pack_bytes(key, op, 0, 0, 0, essence_containers);
        PartitionPack::parse(&data, offset, MAX_LENGTH_FIELD_SIZE).unwrap()
    }

    fn report(err: MxfError) -> ComplianceReport {
        match err {
            MxfError::Op1aCompliance(report) => report,
            other => panic!("expected OP1A failure, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_partitions() {
        let ec = [labels::ESSENCE_JPEG2000];
        let partitions = Op1aPartitions::validate(vec![
            pack(labels::HEADER_PARTITION_CLOSED_COMPLETE, labels::OP1A, &ec, 0),
            pack(labels::BODY_PARTITION_CLOSED_COMPLETE, labels::OP1A, &[], 1000),
            pack(labels::FOOTER_PARTITION, labels::OP1A, &ec, 2000),
        ])
        .unwrap();

        assert_eq!(partitions.header().offset(), 0);
        assert_eq!(partitions.body().len(), 1);
        assert_eq!(partitions.footer().unwrap().offset(), 2000);
        assert_eq!(partitions.partitions().len(), 3);
    }

    #[test]
    fn test_all_violations_collected() {
        let err = Op1aPartitions::validate(vec![
            pack(labels::BODY_PARTITION_CLOSED_COMPLETE, labels::OP1A, &[], 0),
            pack(labels::HEADER_PARTITION_CLOSED_COMPLETE, labels::OP_ATOM, &[], 100),
            pack(
                labels::HEADER_PARTITION_CLOSED_COMPLETE,
                labels::OP1A,
                &[labels::ESSENCE_MPEG2],
                200,
            ),
        ])
        .unwrap_err();

        let report = report(err);
        assert_eq!(report.stage, Stage::Op1a);
        assert_eq!(report.violations_of(Op1aRule::SingleHeaderPartition).len(), 2);
        assert!(report.has_violation(Op1aRule::OperationalPattern));
        assert!(report.has_violation(Op1aRule::EssenceContainerConsistency));
    }

    #[test]
    fn test_footer_must_be_last() {
        let err = Op1aPartitions::validate(vec![
            pack(labels::HEADER_PARTITION_CLOSED_COMPLETE, labels::OP1A, &[], 0),
            pack(labels::FOOTER_PARTITION, labels::OP1A, &[], 100),
            pack(labels::BODY_PARTITION_CLOSED_COMPLETE, labels::OP1A, &[], 200),
        ])
        .unwrap_err();
        let report = report(err);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].offset, Some(100));
    }

    #[test]
    fn test_empty_partition_list() {
        let report = report(Op1aPartitions::validate(Vec::new()).unwrap_err());
        assert!(report.has_violation(Op1aRule::SingleHeaderPartition));
    }

    #[test]
    fn test_header_partition_op1a() {
        let data = header_partition_bytes(&[cdci_descriptor(1)], &[labels::ESSENCE_JPEG2000]);
        let header = HeaderPartition::parse(&data, 0, &ReaderConfig::default()).unwrap();
        let validated = HeaderPartitionOp1a::validate(header).unwrap();
        assert_eq!(validated.header_partition().essence_descriptors().len(), 1);
    }

    #[test]
    fn test_preface_operational_pattern() {
        let preface = local_set(labels::PREFACE, &[(0x3B09, labels::OP_ATOM.to_vec())]);
        let data = header_partition_bytes(&[preface], &[]);
        let header = HeaderPartition::parse(&data, 0, &ReaderConfig::default()).unwrap();

        let report = report(HeaderPartitionOp1a::validate(header).unwrap_err());
        assert!(report.has_violation(Op1aRule::PrefaceOperationalPattern));
        assert!(!report.has_violation(Op1aRule::OperationalPattern));
    }
}
