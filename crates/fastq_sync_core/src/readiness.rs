//! Requirement evaluation for one fastq or a list of fastqs.
//!
//! Predicates are pure functions of a record plus the checker's configuration
//! (active bucket prefix and [`EvaluationMode`]). The archival policy gate runs
//! before any requirement is classified and aborts the whole evaluation.

use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::model::FastqRecord;
use crate::requirements::{EvaluationMode, Requirement, RequirementSet};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequirementSplit {
    pub satisfied: RequirementSet,
    pub unsatisfied: RequirementSet,
}

impl RequirementSplit {
    pub fn is_fully_satisfied(&self) -> bool {
        self.unsatisfied.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessChecker {
    bucket_prefix: String,
    mode: EvaluationMode,
}

impl ReadinessChecker {
    pub fn new(bucket_prefix: impl Into<String>, mode: EvaluationMode) -> Self {
        Self {
            bucket_prefix: bucket_prefix.into(),
            mode,
        }
    }

    pub fn bucket_prefix(&self) -> &str {
        &self.bucket_prefix
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// Every present read file is in an online tier under the bucket prefix.
    ///
    /// A read set with neither R1 nor R2 passes vacuously.
    pub fn has_active_read_set(&self, record: &FastqRecord) -> bool {
        let Some(read_set) = record.read_set.value() else {
            return false;
        };

        read_set.members().all(|file| {
            file.storage_class
                .value()
                .is_some_and(|class| class.is_active())
                && file
                    .s3_uri
                    .value()
                    .is_some_and(|uri| uri.starts_with(&self.bucket_prefix))
        })
    }

    pub fn has_qc(&self, record: &FastqRecord) -> bool {
        record.qc.is_present()
    }

    pub fn has_fingerprint(&self, record: &FastqRecord) -> bool {
        record.ntsm.is_present()
    }

    /// ORA read sets must record the gzip size and raw md5 of every read file.
    pub fn has_compression_metadata(&self, record: &FastqRecord) -> bool {
        if !self.has_active_read_set(record) {
            return false;
        }
        let Some(read_set) = record.read_set.value() else {
            return false;
        };
        if !read_set.is_ora() {
            return true;
        }

        read_set.members().all(|file| {
            file.gzip_compression_size_in_bytes.is_present() && file.raw_md5sum.is_present()
        })
    }

    pub fn has_read_count_information(&self, record: &FastqRecord) -> bool {
        match self.mode {
            // Existing callers rely on this mirroring the compression check.
            EvaluationMode::Compatible => self.has_compression_metadata(record),
            EvaluationMode::Strict => {
                self.has_active_read_set(record) && record.read_count.is_present()
            }
        }
    }

    pub fn is_satisfied(&self, requirement: Requirement, record: &FastqRecord) -> bool {
        match requirement {
            Requirement::ActiveReadSet => self.has_active_read_set(record),
            Requirement::Qc => self.has_qc(record),
            Requirement::Fingerprint => self.has_fingerprint(record),
            Requirement::FileCompressionInformation => self.has_compression_metadata(record),
            Requirement::ReadCountInformation => self.has_read_count_information(record),
        }
    }

    /// Split `requirements` into satisfied and unsatisfied for one record.
    ///
    /// Fails with [`SyncError::UnarchivingNotPermitted`] when an active read
    /// set is required, the record has data but it is archived, and
    /// unarchiving is not allowed. A record without a read set is simply
    /// unsatisfied.
    pub fn evaluate(
        &self,
        record: &FastqRecord,
        requirements: &RequirementSet,
        is_unarchiving_allowed: bool,
    ) -> Result<RequirementSplit, SyncError> {
        if !is_unarchiving_allowed
            && requirements.contains(&Requirement::ActiveReadSet)
            && record.read_set.is_present()
            && !self.has_active_read_set(record)
        {
            return Err(SyncError::UnarchivingNotPermitted {
                fastq_id: record.id.clone(),
            });
        }

        let mut split = RequirementSplit::default();
        for &requirement in requirements {
            if self.is_satisfied(requirement, record) {
                split.satisfied.insert(requirement);
            } else {
                split.unsatisfied.insert(requirement);
            }
        }
        Ok(split)
    }

    /// A requirement is satisfied only if every record satisfies it.
    ///
    /// Once a record fails a requirement it stays unsatisfied for the rest of
    /// the scan. The first archival gate failure aborts the aggregation.
    pub fn evaluate_all(
        &self,
        records: &[FastqRecord],
        requirements: &RequirementSet,
        is_unarchiving_allowed: bool,
    ) -> Result<RequirementSplit, SyncError> {
        let mut satisfied = requirements.clone();
        for record in records {
            let split = self.evaluate(record, requirements, is_unarchiving_allowed)?;
            for requirement in &split.unsatisfied {
                satisfied.remove(requirement);
            }
        }

        let unsatisfied = requirements.difference(&satisfied).copied().collect();
        Ok(RequirementSplit {
            satisfied,
            unsatisfied,
        })
    }

    /// Ids of the records missing at least one requirement, in input order.
    pub fn records_missing_requirements(
        &self,
        records: &[FastqRecord],
        requirements: &RequirementSet,
        is_unarchiving_allowed: bool,
    ) -> Result<Vec<String>, SyncError> {
        let mut missing = Vec::new();
        for record in records {
            let split = self.evaluate(record, requirements, is_unarchiving_allowed)?;
            if !split.is_fully_satisfied() {
                missing.push(record.id.clone());
            }
        }
        Ok(missing)
    }
}
