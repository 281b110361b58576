//! IMF essence reader
//!
//! Every query starts from the random index pack at the end of the resource
//! and reads only the byte ranges it needs. Nothing is cached between queries.

use crate::config::ReaderConfig;
use crate::error::{MxfError, Result};
use crate::header::{EssenceDescriptor, HeaderPartition, InterchangeObject};
use crate::imf::{HeaderPartitionImf, ImfPartitions};
use crate::klv::{KlvHeader, KEY_FIELD_SIZE};
use crate::op1a::{HeaderPartitionOp1a, Op1aPartitions};
use crate::partition::PartitionPack;
use crate::projector::{DescriptorProjector, DocumentNode, Triplet};
use crate::register::Register;
use crate::rip::{self, RandomIndexPack, OVERALL_LENGTH_SIZE};
use crate::source::ByteRangeSource;
use crate::types::EssenceType;

/// Reader over an MXF resource carrying IMF essence
#[derive(Debug, Clone)]
pub struct EssenceReader<S> {
    source: S,
    config: ReaderConfig,
}

impl<S: ByteRangeSource> EssenceReader<S> {
    /// Create a reader with the default configuration
    pub fn new(source: S) -> Self {
        Self::with_config(source, ReaderConfig::default())
    }

    pub fn with_config(source: S, config: ReaderConfig) -> Self {
        EssenceReader { source, config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Locate and parse the random index pack
    pub fn random_index_pack(&self) -> Result<RandomIndexPack> {
        let size = self.source.size()?;
        if size < OVERALL_LENGTH_SIZE {
            return Err(MxfError::Structural(format!(
                "resource of {} bytes is too small to hold a random index pack",
                size
            )));
        }

        let tail = self.source.range(size - OVERALL_LENGTH_SIZE, size - 1)?;
        let last4: [u8; 4] = tail.as_slice().try_into().map_err(|_| {
            MxfError::Structural(format!("expected 4 trailing bytes, got {}", tail.len()))
        })?;
        let (start, end) = rip::pack_bounds(size, last4)?;

        let data = self.source.range(start, end - 1)?;
        RandomIndexPack::parse(&data, start, size, self.config.max_length_field_size)
    }

    /// Read the partition pack at `offset` with two bounded range reads
    fn read_partition_pack(&self, offset: u64, size: u64) -> Result<PartitionPack> {
        let max_lfs = self.config.max_length_field_size;

        let prefix_end = offset
            .saturating_add((KEY_FIELD_SIZE + max_lfs) as u64)
            .min(size);
        let prefix = self.source.range(offset, prefix_end - 1)?;
        let header = KlvHeader::parse(&prefix, offset, max_lfs)?;

        let end = header.end_offset().min(size);
        let data = self.source.range(offset, end - 1)?;
        PartitionPack::parse(&data, offset, max_lfs)
    }

    /// Every partition pack listed by the random index pack, validated against
    /// OP1A and then IMF
    pub fn partition_packs(&self) -> Result<Vec<PartitionPack>> {
        let rip = self.random_index_pack()?;
        let size = self.source.size()?;

        let packs = rip
            .partition_offsets()
            .into_iter()
            .map(|offset| self.read_partition_pack(offset, size))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("Read {} partition packs", packs.len());

        let op1a = Op1aPartitions::validate(packs)?;
        Ok(ImfPartitions::validate(op1a)?.into_partitions())
    }

    /// Byte span `[start, end)` of the header partition
    fn header_partition_span(&self) -> Result<(u64, u64)> {
        let rip = self.random_index_pack()?;
        let offsets = rip.partition_offsets();

        let start = *offsets.first().ok_or_else(|| {
            MxfError::Structural("random index pack lists no partitions".into())
        })?;
        let end = match offsets.get(1) {
            Some(next) => *next,
            None => self.source.size()?,
        };

        if end <= start {
            return Err(MxfError::Structural(format!(
                "header partition at offset {} is followed by a partition at offset {}",
                start, end
            )));
        }
        if end - start > self.config.max_header_partition_size {
            return Err(MxfError::Structural(format!(
                "header partition spans {} bytes, more than the configured maximum of {}",
                end - start,
                self.config.max_header_partition_size
            )));
        }
        Ok((start, end))
    }

    /// Parse the header partition and validate it against OP1A and then IMF
    pub fn header_partition(&self) -> Result<HeaderPartitionImf> {
        let (start, end) = self.header_partition_span()?;
        let data = self.source.range(start, end - 1)?;

        let header = HeaderPartition::parse(&data, start, &self.config)?;
        HeaderPartitionImf::validate(HeaderPartitionOp1a::validate(header)?)
    }

    /// Essence descriptors of the validated header partition
    pub fn essence_descriptors(&self) -> Result<Vec<EssenceDescriptor>> {
        let header = self.header_partition()?;
        Ok(header
            .header_partition()
            .essence_descriptors()
            .into_iter()
            .cloned()
            .collect())
    }

    fn read_triplet(&self, header: &KlvHeader) -> Result<Triplet> {
        let (start, end) = header.packet_range();
        let data = self.source.range(start, end)?;
        Triplet::parse(&data, start, self.config.max_length_field_size)
    }

    /// Project each essence descriptor, with its sub-descriptors nested, through `register`
    pub fn essence_descriptor_documents(
        &self,
        register: &dyn Register,
    ) -> Result<Vec<DocumentNode>> {
        let imf = self.header_partition()?;
        let header = imf.header_partition();

        let mut projector = DescriptorProjector::new(register, header.primer_pack());
        for object in header.objects() {
            if let InterchangeObject::SubDescriptor(sub) = object {
                if let Some(uid) = sub.instance_uid {
                    projector.add_referenced_set(uid, self.read_triplet(&sub.header)?);
                }
            }
        }

        header
            .essence_descriptors()
            .into_iter()
            .map(|descriptor| projector.project(&self.read_triplet(&descriptor.header)?))
            .collect()
    }

    /// Essence type of the track file
    pub fn essence_type(&self) -> Result<EssenceType> {
        Ok(self.header_partition()?.essence_type())
    }

    /// RFC 5646 spoken language shared by the sound field group label sub-descriptors.
    ///
    /// `Ok(None)` when none of them declares a language.
    pub fn audio_spoken_language(&self) -> Result<Option<String>> {
        let imf = self.header_partition()?;
        let essence_type = imf.essence_type();
        if essence_type != EssenceType::MainAudioSequence {
            return Err(MxfError::EssenceTypeMismatch {
                query: "audio spoken language",
                actual: essence_type,
            });
        }

        let mut languages: Vec<String> = Vec::new();
        for sub in imf.header_partition().sound_field_group_label_sub_descriptors() {
            match sub.spoken_language() {
                Some(language) if !language.is_empty() => {
                    if !languages.iter().any(|l| l == language) {
                        languages.push(language.to_string());
                    }
                }
                _ => {}
            }
        }

        match languages.len() {
            0 => Ok(None),
            1 => Ok(languages.pop()),
            _ => Err(MxfError::LanguageMismatch { languages }),
        }
    }
}
