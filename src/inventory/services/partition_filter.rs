use crate::inventory::domain::{HostType, Partition, TagKey};
use crate::shared::Result;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Maximum number of exclude patterns
const MAX_EXCLUDE_PATTERNS: usize = 64;

/// Maximum length of a single exclude pattern
const MAX_PATTERN_LENGTH: usize = 255;

/// PartitionFilter - decides which collected partitions make it into the inventory
///
/// A partition is kept when:
/// - it is not a VIOS, unless VIOS partitions are included
/// - for every filtered tag key, one of its values is in the allow-list (case-insensitive)
/// - its name matches no partition exclusion pattern
/// - neither its system name nor its MTMS matches a system exclusion pattern
///
/// Exclusion patterns support `*` wildcards and remember whether they matched anything.
#[derive(Debug, Default)]
pub struct PartitionFilter {
    include_vios: bool,
    allowed: BTreeMap<TagKey, Vec<String>>,
    excluded_partitions: Vec<ExcludePattern>,
    excluded_systems: Vec<ExcludePattern>,
}

impl PartitionFilter {
    /// # Errors
    /// - Too many patterns (> MAX_EXCLUDE_PATTERNS in one list)
    /// - Invalid pattern format (empty, too long, only wildcards, invalid characters)
    pub fn new(
        include_vios: bool,
        allowed: BTreeMap<TagKey, Vec<String>>,
        exclude_partitions: Vec<String>,
        exclude_systems: Vec<String>,
    ) -> Result<Self> {
        Ok(Self {
            include_vios,
            allowed: allowed
                .into_iter()
                .map(|(key, values)| (key, values.iter().map(|v| v.to_lowercase()).collect()))
                .collect(),
            excluded_partitions: compile_patterns(exclude_partitions)?,
            excluded_systems: compile_patterns(exclude_systems)?,
        })
    }

    pub fn include_vios(&self) -> bool {
        self.include_vios
    }

    /// Returns true when the partition belongs in the inventory
    pub fn accepts(&self, partition: &Partition) -> bool {
        if partition.host_type() == HostType::Vios && !self.include_vios {
            return false;
        }

        for (key, allowed) in &self.allowed {
            let mut values = partition.tag_values(*key);
            if !values.any(|v| allowed.contains(&v.to_lowercase())) {
                return false;
            }
        }

        // Evaluate every pattern so match tracking stays accurate
        let name_hit = self
            .excluded_partitions
            .iter()
            .fold(false, |hit, p| p.matches(partition.name()) | hit);
        let mtms = partition.mtms().to_string();
        let system_hit = self.excluded_systems.iter().fold(false, |hit, p| {
            (p.matches(partition.system_name()) | p.matches(&mtms)) | hit
        });

        !(name_hit || system_hit)
    }

    /// Exclusion patterns that did not match any partition or system so far
    pub fn get_unmatched_patterns(&self) -> Vec<String> {
        self.excluded_partitions
            .iter()
            .chain(self.excluded_systems.iter())
            .filter(|p| !p.matched.load(Ordering::Relaxed))
            .map(|p| p.original.clone())
            .collect()
    }
}

fn compile_patterns(patterns: Vec<String>) -> Result<Vec<ExcludePattern>> {
    if patterns.len() > MAX_EXCLUDE_PATTERNS {
        anyhow::bail!(
            "Too many exclusion patterns: {} (maximum: {})",
            patterns.len(),
            MAX_EXCLUDE_PATTERNS
        );
    }
    patterns.into_iter().map(ExcludePattern::new).collect()
}

#[derive(Debug)]
struct ExcludePattern {
    original: String,
    parts: Vec<String>,
    matched: AtomicBool,
}

impl ExcludePattern {
    fn new(pattern: String) -> Result<Self> {
        validate_pattern(&pattern)?;
        let parts = pattern.split('*').map(str::to_string).collect();
        Ok(Self {
            original: pattern,
            parts,
            matched: AtomicBool::new(false),
        })
    }

    fn matches(&self, candidate: &str) -> bool {
        let is_match = glob_match(&self.parts, candidate);
        if is_match {
            self.matched.store(true, Ordering::Relaxed);
        }
        is_match
    }
}

/// Anchored wildcard match. `parts` is the pattern split on `*`;
/// a single part means no wildcard and requires equality.
fn glob_match(parts: &[String], candidate: &str) -> bool {
    match parts {
        [] => candidate.is_empty(),
        [exact] => candidate == exact,
        [first, middle @ .., last] => {
            if !candidate.starts_with(first.as_str()) {
                return false;
            }
            let mut rest = &candidate[first.len()..];
            for part in middle {
                match rest.find(part.as_str()) {
                    Some(pos) => rest = &rest[pos + part.len()..],
                    None => return false,
                }
            }
            rest.len() >= last.len() && rest.ends_with(last.as_str())
        }
    }
}

fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        anyhow::bail!("Exclusion pattern cannot be empty");
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        anyhow::bail!(
            "Exclusion pattern is too long: '{}' ({} chars). Maximum: {} chars",
            pattern,
            pattern.len(),
            MAX_PATTERN_LENGTH
        );
    }

    if let Some(ch) = pattern
        .chars()
        .find(|c| !(c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '*')))
    {
        anyhow::bail!(
            "Exclusion pattern contains invalid character '{}' in pattern '{}'. \
             Only alphanumeric, hyphens, underscores, dots, and asterisks (*) are allowed.",
            ch,
            pattern
        );
    }

    if pattern.chars().all(|c| c == '*') {
        anyhow::bail!(
            "Exclusion pattern cannot contain only wildcards: '{}'",
            pattern
        );
    }

    Ok(())
}
