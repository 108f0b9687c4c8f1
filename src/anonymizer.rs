//! PII redaction.
//!
//! An ordered list of regex substitution passes. Order matters: the generic
//! capitalized-name pass runs over text the specific passes (email, phone,
//! digits, address lines, self-introductions) have already rewritten.
//! Recall is traded for auditability; the common-name pass is a closed
//! allow-list, not entity recognition.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;
use tracing::debug;

use crate::models::RedactionField;

/// Placeholder for email addresses
pub const EMAIL_PLACEHOLDER: &str = "[REDACTED_EMAIL]";
/// Placeholder for phone numbers
pub const PHONE_PLACEHOLDER: &str = "[REDACTED_PHONE]";
/// Placeholder for numeric ids and address values
pub const GENERIC_PLACEHOLDER: &str = "[REDACTED]";
/// Placeholder for names
pub const NAME_PLACEHOLDER: &str = "[REDACTED_NAME]";
/// Placeholder for social handles
pub const HANDLE_PLACEHOLDER: &str = "[REDACTED_HANDLE]";

// Compile patterns once at startup
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[\w.+-]+@[\w-]+\.[\w.-]+\b").expect("Invalid regex: email pattern")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?\d[\d\-\s()]{6,}\d").expect("Invalid regex: phone pattern")
});

static ID_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4,}\b").expect("Invalid regex: id number pattern"));

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(address|location)\s*:\s*[^\n]+").expect("Invalid regex: address pattern")
});

// Introduction phrase is case-insensitive, the name itself must be capitalized
static INTRODUCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b((?i:my name is|i am|i'm|this is))\s+[A-Z][A-Za-z\-']{1,20}\b")
        .expect("Invalid regex: introduction pattern")
});

static CAPITALIZED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][A-Za-z\-']{1,20}\b").expect("Invalid regex: capitalized word pattern")
});

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w{3,}").expect("Invalid regex: handle pattern"));

/// Common first names, matched case-insensitively against capitalized tokens.
pub const COMMON_FIRST_NAMES: &[&str] = &[
    "aaron", "abdul", "abigail", "aditi", "adrian", "ahmed", "aina", "akiko", "alex", "alice",
    "alisha", "aliya", "allan", "amal", "amara", "aman", "amber", "amina", "amir", "amy",
    "andrea", "andrew", "anita", "ankur", "anna", "anushka", "arjun", "arthur", "ashley",
    "ashwin", "ben", "benjamin", "bianca", "brandon", "brian", "bruno", "carlos", "carla",
    "charles", "chloe", "christian", "clara", "daniel", "diego", "divya", "dmitri", "edward",
    "elena", "eli", "elias", "emily", "emma", "eric", "erika", "eva", "felix", "fernando",
    "fiona", "gabriel", "george", "grace", "harish", "harry", "hector", "henry", "isha", "ivan",
    "jack", "jacob", "james", "jane", "jasmine", "jay", "jean", "jessica", "john", "jordan",
    "jose", "joseph", "josh", "joy", "juan", "julia", "justin", "karen", "karim", "katie",
    "kevin", "krishna", "laura", "leo", "liam", "lina", "linda", "lisa", "lucas", "luis",
    "luna", "maria", "marie", "mark", "marta", "michael", "mina", "mira", "mohammed", "monica",
    "nadia", "nina", "noah", "omar", "oscar", "paul", "peter", "priya", "raj", "rakesh", "ram",
    "ravi", "rebecca", "rita", "robert", "rohit", "rosa", "roy", "ryan", "sachin", "sara",
    "sarah", "sam", "samantha", "samir", "sanjay", "sean", "selena", "shaun", "shiva",
    "shivani", "shreya", "simon", "sofia", "sunita", "suraj", "susan", "tarun", "tina", "uma",
    "vanessa", "vikas", "william", "yasmin", "yusuf", "zara",
];

static NAME_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| COMMON_FIRST_NAMES.iter().copied().collect());

/// Output of [`anonymize`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anonymized {
    /// Redacted, whitespace-trimmed text
    pub safe_text: String,
    /// True if any pass rewrote the text
    pub changed: bool,
    /// Kinds of PII removed, in label order
    pub redacted_fields: BTreeSet<RedactionField>,
}

impl Anonymized {
    /// Redacted fields as an ordered list
    #[must_use]
    pub fn fields(&self) -> Vec<RedactionField> {
        self.redacted_fields.iter().copied().collect()
    }
}

/// Redact PII from `text`.
///
/// Passes run in a fixed order; a field label is recorded only when its pass
/// replaced at least one span. `changed` compares the redacted text with the
/// input before trimming, so surrounding whitespace alone never counts as a
/// redaction.
#[must_use]
pub fn anonymize(text: &str) -> Anonymized {
    let mut fields = BTreeSet::new();
    let mut current = text.to_string();

    current = substitute(&EMAIL_RE, current, EMAIL_PLACEHOLDER, RedactionField::Email, &mut fields);
    current = substitute(&PHONE_RE, current, PHONE_PLACEHOLDER, RedactionField::Phone, &mut fields);
    current = substitute(
        &ID_NUMBER_RE,
        current,
        GENERIC_PLACEHOLDER,
        RedactionField::IdNumber,
        &mut fields,
    );
    current = substitute(
        &ADDRESS_RE,
        current,
        "${1}: [REDACTED]",
        RedactionField::Address,
        &mut fields,
    );
    current = substitute(
        &INTRODUCTION_RE,
        current,
        "${1} [REDACTED_NAME]",
        RedactionField::Name,
        &mut fields,
    );
    current = redact_common_names(current, &mut fields);
    current = substitute(
        &HANDLE_RE,
        current,
        HANDLE_PLACEHOLDER,
        RedactionField::SocialHandle,
        &mut fields,
    );

    let changed = current != text;
    if changed {
        debug!(fields = ?fields, "Redacted PII from intake text");
    }

    Anonymized {
        safe_text: current.trim().to_string(),
        changed,
        redacted_fields: fields,
    }
}

/// True if `token` is in the common first-name dictionary (any case)
#[must_use]
pub fn is_common_first_name(token: &str) -> bool {
    NAME_SET.contains(token.to_lowercase().as_str())
}

fn substitute(
    pattern: &Regex,
    text: String,
    replacement: &str,
    field: RedactionField,
    fields: &mut BTreeSet<RedactionField>,
) -> String {
    if !pattern.is_match(&text) {
        return text;
    }
    fields.insert(field);
    pattern.replace_all(&text, replacement).into_owned()
}

fn redact_common_names(text: String, fields: &mut BTreeSet<RedactionField>) -> String {
    let mut found = false;
    let redacted = CAPITALIZED_RE
        .replace_all(&text, |caps: &Captures<'_>| {
            let token = &caps[0];
            if is_common_first_name(token) {
                found = true;
                NAME_PLACEHOLDER.to_string()
            } else {
                token.to_string()
            }
        })
        .into_owned();

    if found {
        fields.insert(RedactionField::Name);
        redacted
    } else {
        text
    }
}
