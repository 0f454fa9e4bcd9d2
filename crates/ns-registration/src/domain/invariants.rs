//! # Domain Invariants
//!
//! Business rules checked before or while composing an attempt.

use super::errors::{RegistrationError, Result};

/// Top-level domain accepted for registration.
pub const SUI_TLD: &str = "sui";

/// Minimum label length that can be registered.
pub const MIN_LABEL_LENGTH: usize = 3;

/// Maximum label length (DNS label limit).
pub const MAX_LABEL_LENGTH: usize = 63;

fn invalid_name(name: &str, reason: &str) -> RegistrationError {
    RegistrationError::InvalidDomainName {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Invariant: the name is a registrable second-level `.sui` name.
///
/// Lower-case only, exactly one label before the TLD, label of
/// `[a-z0-9-]` between 3 and 63 characters, no hyphen at either end.
pub fn invariant_domain_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid_name(name, "empty name"));
    }
    if name.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(invalid_name(name, "must be lower-case"));
    }

    let labels: Vec<&str> = name.split('.').collect();
    match labels.as_slice() {
        [label, tld] if *tld == SUI_TLD => invariant_label(name, label),
        [_, _] | [_] => Err(invalid_name(name, "must end in .sui")),
        _ => Err(invalid_name(name, "subdomains cannot be registered")),
    }
}

fn invariant_label(name: &str, label: &str) -> Result<()> {
    if label.len() < MIN_LABEL_LENGTH {
        return Err(invalid_name(name, "label shorter than 3 characters"));
    }
    if label.len() > MAX_LABEL_LENGTH {
        return Err(invalid_name(name, "label longer than 63 characters"));
    }
    if !label
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(invalid_name(name, "label may only contain a-z, 0-9 and '-'"));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(invalid_name(name, "label cannot start or end with '-'"));
    }
    Ok(())
}

/// Invariant: duration is a positive number of years within the bound.
pub fn invariant_duration(years: u8, max: u8) -> Result<()> {
    if years == 0 || years > max {
        return Err(RegistrationError::InvalidDuration { years, max });
    }
    Ok(())
}

/// Invariant: quote is no older than `max_age_secs`.
///
/// A publish time in the future (clock skew) is accepted.
pub fn invariant_quote_fresh(feed: &str, publish_time: u64, now: u64, max_age_secs: u64) -> Result<()> {
    if now.saturating_sub(publish_time) > max_age_secs {
        return Err(RegistrationError::StaleQuote {
            feed: feed.to_string(),
            publish_time,
            now,
            max_age_secs,
        });
    }
    Ok(())
}

/// Invariant: estimated spend does not exceed the caller's ceiling.
pub fn invariant_within_ceiling(estimated: u64, ceiling: u64) -> Result<()> {
    if estimated > ceiling {
        return Err(RegistrationError::PriceCeilingExceeded { estimated, ceiling });
    }
    Ok(())
}

/// Invariant: a result reference points strictly backwards.
pub fn invariant_backward_reference(index: u16, len: usize) -> Result<()> {
    if usize::from(index) >= len {
        return Err(RegistrationError::InvalidHandle {
            index,
            len,
            reason: "refers to an operation not yet appended".to_string(),
        });
    }
    Ok(())
}
