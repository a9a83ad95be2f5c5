//! Fastq records as returned by the fastq catalog.
//!
//! Only the attributes requirement evaluation reads are typed. Everything else
//! is carried through `extra` so a record can be handed back to the caller
//! unchanged.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// An optional catalog attribute that remembers whether its key was sent.
///
/// Fields of this type are declared with
/// `#[serde(default, skip_serializing_if = "Field::is_absent")]` so a missing
/// key stays missing and an explicit `null` stays `null`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field<T> {
    #[default]
    Absent,
    Null,
    Present(T),
}

impl<T> Field<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Present)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Present(value) => value.serialize(serializer),
            Self::Absent | Self::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StorageClass {
    Standard,
    StandardIa,
    IntelligentTiering,
    GlacierIr,
    Glacier,
    DeepArchive,
    Other(String),
}

impl StorageClass {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Standard => "Standard",
            Self::StandardIa => "StandardIa",
            Self::IntelligentTiering => "IntelligentTiering",
            Self::GlacierIr => "GlacierIr",
            Self::Glacier => "Glacier",
            Self::DeepArchive => "DeepArchive",
            Self::Other(value) => value,
        }
    }

    /// Tiers that can be read without a restore.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Standard | Self::StandardIa | Self::IntelligentTiering | Self::GlacierIr
        )
    }
}

impl From<String> for StorageClass {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Standard" => Self::Standard,
            "StandardIa" => Self::StandardIa,
            "IntelligentTiering" => Self::IntelligentTiering,
            "GlacierIr" => Self::GlacierIr,
            "Glacier" => Self::Glacier,
            "DeepArchive" => Self::DeepArchive,
            _ => Self::Other(value),
        }
    }
}

impl From<StorageClass> for String {
    fn from(value: StorageClass) -> Self {
        match value {
            StorageClass::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompressionFormat {
    Ora,
    Gzip,
    Other(String),
}

impl CompressionFormat {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ora => "ORA",
            Self::Gzip => "GZIP",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for CompressionFormat {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ORA" => Self::Ora,
            "GZIP" => Self::Gzip,
            _ => Self::Other(value),
        }
    }
}

impl From<CompressionFormat> for String {
    fn from(value: CompressionFormat) -> Self {
        match value {
            CompressionFormat::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// One side (R1 or R2) of a read set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadFile {
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub storage_class: Field<StorageClass>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub s3_uri: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub gzip_compression_size_in_bytes: Field<u64>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub raw_md5sum: Field<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadSet {
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub r1: Field<ReadFile>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub r2: Field<ReadFile>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub compression_format: Field<CompressionFormat>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReadSet {
    pub fn members(&self) -> impl Iterator<Item = &ReadFile> {
        self.r1.value().into_iter().chain(self.r2.value())
    }

    pub fn is_ora(&self) -> bool {
        matches!(self.compression_format.value(), Some(CompressionFormat::Ora))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    pub library_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastqRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub read_set: Field<ReadSet>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub qc: Field<Value>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub ntsm: Field<Value>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub read_count: Field<u64>,
    pub library: Library,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastqRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastqSet {
    pub id: String,
    #[serde(default)]
    pub fastq_set: Vec<FastqRef>,
}

/// Member ids of every set, in set order then member order. Duplicates are kept.
pub fn flatten_fastq_set_ids(sets: &[FastqSet]) -> Vec<String> {
    sets.iter()
        .flat_map(|set| set.fastq_set.iter().map(|member| member.id.clone()))
        .collect()
}
