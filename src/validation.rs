//! Name validation for stages, projects, pipelines and output files.
//!
//! Names end up as segments of filesystem paths handed to the execution
//! engine, so they are checked before anything is registered.

use anyhow::{bail, Result};

/// Separator joining stage names into a chain key.
pub const CHAIN_SEPARATOR: &str = ".";

/// Maximum allowed length for a single name segment.
pub const MAX_NAME_LENGTH: usize = 128;

/// Maximum allowed length for descriptions.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Reserved names that cannot be used as segments (case-insensitive).
const RESERVED_NAMES: &[&str] = &[
    ".", "..", "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7",
    "com8", "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Validates a single chain segment (one project, pipeline or stage name).
///
/// A segment is valid if:
/// - It is not empty
/// - It is no longer than MAX_NAME_LENGTH characters
/// - It contains only alphanumeric characters, dashes, and underscores
/// - It does not use reserved system names
///
/// # Examples
///
/// ```
/// use stagechain::validation::validate_segment;
///
/// assert!(validate_segment("trim_bbmap").is_ok());
/// assert!(validate_segment("by-ID").is_ok());
/// assert!(validate_segment("").is_err());
/// assert!(validate_segment("import.trim").is_err());
/// ```
pub fn validate_segment(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("name cannot be empty");
    }

    if name.len() > MAX_NAME_LENGTH {
        bail!(
            "name too long: {} characters (max {})",
            name.len(),
            MAX_NAME_LENGTH
        );
    }

    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_chars {
        bail!("name '{name}' contains invalid characters. Use only alphanumeric characters, dashes (-), and underscores (_)");
    }

    let lower = name.to_lowercase();
    if RESERVED_NAMES.contains(&lower.as_str()) {
        bail!("name '{name}' uses a reserved name");
    }

    Ok(())
}

/// Validates a stage name, which may span several chain segments.
pub fn validate_stage_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("name cannot be empty");
    }
    for segment in name.split(CHAIN_SEPARATOR) {
        validate_segment(segment)?;
    }
    Ok(())
}

/// Validates an output filename declared by a stage.
///
/// Filenames may contain dots (`reads.fastq`) but never path separators.
pub fn validate_filename(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("output filename cannot be empty");
    }
    if name.contains('/') || name.contains('\\') {
        bail!("output filename '{name}' must not contain path separators");
    }
    if name == "." || name == ".." {
        bail!("output filename '{name}' uses a reserved name");
    }
    if name.chars().any(|c| c.is_control()) {
        bail!("output filename '{name}' contains control characters");
    }
    Ok(())
}

/// Validates that a description is within acceptable length limits.
pub fn validate_description(description: &str) -> Result<()> {
    if description.len() > MAX_DESCRIPTION_LENGTH {
        bail!(
            "Description too long: {} characters (max {})",
            description.len(),
            MAX_DESCRIPTION_LENGTH
        );
    }

    Ok(())
}

/// Clap value parser for chain arguments (`proj.import.trim`).
pub fn clap_chain_validator(s: &str) -> Result<String, String> {
    for segment in s.split(CHAIN_SEPARATOR) {
        validate_segment(segment).map_err(|e| e.to_string())?;
    }
    Ok(s.to_string())
}

/// Clap value parser for a single name argument.
pub fn clap_name_validator(s: &str) -> Result<String, String> {
    validate_segment(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}
