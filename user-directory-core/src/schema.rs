//! Field constraint table and form validation.
//!
//! The same static table drives server-side validation and is served to
//! clients that build the user form dynamically.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::UserFormData;

/// The input type of a form field (affects UI rendering).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Plain text input.
    Text,
    /// Email address input.
    Email,
    /// Telephone number input.
    Tel,
}

/// Character-class rule a field value must satisfy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FieldPattern {
    /// ASCII letters and whitespace only.
    Letters,
    /// Optional leading `+`, then ASCII digits, whitespace, `(`, `)` and `-`.
    Phone,
    /// `local@domain.tld` address form.
    EmailAddress,
}

/// Definition of a single user form field and its rules.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConstraint {
    /// Machine-readable field key (e.g., `"firstName"`).
    pub name: &'static str,
    /// Human-readable label (e.g., `"First Name"`).
    pub label: &'static str,
    /// Input type for UI rendering.
    #[serde(rename = "type")]
    pub input_type: FieldType,
    pub placeholder: &'static str,
    pub required: bool,
    /// Minimum length in characters.
    pub min_len: usize,
    /// Maximum length in characters.
    pub max_len: usize,
    pub pattern: FieldPattern,
    /// Subject used in length messages, e.g. "First name".
    #[serde(skip)]
    subject: &'static str,
    /// Unit used in length messages ("characters" or "digits").
    #[serde(skip)]
    unit: &'static str,
    /// Message for a pattern mismatch.
    #[serde(skip)]
    pattern_message: &'static str,
}

/// Every field of the user form, in display order.
pub static USER_FIELDS: [FieldConstraint; 4] = [
    FieldConstraint {
        name: "firstName",
        label: "First Name",
        input_type: FieldType::Text,
        placeholder: "Enter first name",
        required: true,
        min_len: 2,
        max_len: 50,
        pattern: FieldPattern::Letters,
        subject: "First name",
        unit: "characters",
        pattern_message: "First name can only contain letters",
    },
    FieldConstraint {
        name: "lastName",
        label: "Last Name",
        input_type: FieldType::Text,
        placeholder: "Enter last name",
        required: true,
        min_len: 2,
        max_len: 50,
        pattern: FieldPattern::Letters,
        subject: "Last name",
        unit: "characters",
        pattern_message: "Last name can only contain letters",
    },
    FieldConstraint {
        name: "phone",
        label: "Phone Number",
        input_type: FieldType::Tel,
        placeholder: "+1 (555) 123-4567",
        required: true,
        min_len: 10,
        max_len: 15,
        pattern: FieldPattern::Phone,
        subject: "Phone number",
        unit: "digits",
        pattern_message: "Please enter a valid phone number",
    },
    FieldConstraint {
        name: "email",
        label: "Email Address",
        input_type: FieldType::Email,
        placeholder: "john.doe@example.com",
        required: true,
        min_len: 5,
        max_len: 100,
        pattern: FieldPattern::EmailAddress,
        subject: "Email",
        unit: "characters",
        pattern_message: "Please enter a valid email address",
    },
];

#[allow(clippy::expect_used)]
static LETTERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("letters pattern"));

#[allow(clippy::expect_used)]
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s()\-]+$").expect("phone pattern"));

#[allow(clippy::expect_used)]
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern")
});

impl FieldPattern {
    /// Whether `value` satisfies this pattern.
    #[must_use]
    pub fn matches(self, value: &str) -> bool {
        match self {
            Self::Letters => LETTERS_RE.is_match(value),
            Self::Phone => PHONE_RE.is_match(value),
            // regex has no lookaround, so the dot rules are checked by hand
            Self::EmailAddress => {
                !value.starts_with('.') && !value.contains("..") && EMAIL_RE.is_match(value)
            }
        }
    }
}

impl FieldConstraint {
    /// Check one value, pushing every violated rule onto `issues`.
    fn check(&self, value: &str, issues: &mut Vec<FieldIssue>) {
        let len = value.chars().count();
        let mut push = |message: String| {
            issues.push(FieldIssue {
                field: self.name.to_string(),
                message,
            });
        };

        // email reports format before length
        if self.pattern == FieldPattern::EmailAddress && !self.pattern.matches(value) {
            push(self.pattern_message.to_string());
        }
        if len < self.min_len {
            push(format!(
                "{} must be at least {} {}",
                self.subject, self.min_len, self.unit
            ));
        }
        if len > self.max_len {
            push(format!(
                "{} must be less than {} {}",
                self.subject, self.max_len, self.unit
            ));
        }
        if self.pattern != FieldPattern::EmailAddress && !self.pattern.matches(value) {
            push(self.pattern_message.to_string());
        }
    }
}

/// A single violated field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Machine-readable field key.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

/// All rule violations found in one form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldIssue>);

impl ValidationErrors {
    #[must_use]
    pub fn issues(&self) -> &[FieldIssue] {
        &self.0
    }

    /// Whether any issue concerns `field`.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|i| i.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed")?;
        for (i, issue) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{}: {}", issue.field, issue.message)?;
        }
        Ok(())
    }
}

/// Validate a full user form against [`USER_FIELDS`].
pub fn validate_user_form(form: &UserFormData) -> Result<(), ValidationErrors> {
    let values = [
        form.first_name.as_str(),
        form.last_name.as_str(),
        form.phone.as_str(),
        form.email.as_str(),
    ];

    let mut issues = Vec::new();
    for (constraint, value) in USER_FIELDS.iter().zip(values) {
        constraint.check(value, &mut issues);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(issues))
    }
}
