//! User record model and field validation.
//!
//! A [`User`] only exists in a validated state. Incoming payloads arrive as
//! [`UserDraft`] (full replacement) or [`UserPatch`] (partial update) with
//! every field optional, and become a [`User`] through
//! [`UserDraft::into_user`], which reports every broken field rule at once.

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Sequential user identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A single broken field rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserViolation {
    /// Email is absent or blank.
    EmptyEmail,
    /// Email does not look like `local@domain`.
    InvalidEmail,
    /// First name is absent or blank.
    EmptyFirstName,
    /// Last name is absent or blank.
    EmptyLastName,
    /// Birth date is absent.
    MissingBirthDate,
    /// Birth date is today or later.
    BirthDateNotInPast,
}

impl UserViolation {
    /// JSON field name the violation refers to.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::EmptyFirstName => "firstName",
            Self::EmptyLastName => "lastName",
            Self::MissingBirthDate | Self::BirthDateNotInPast => "birthDate",
        }
    }

    /// Machine-readable violation code.
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyEmail => "empty_email",
            Self::InvalidEmail => "invalid_email",
            Self::EmptyFirstName => "empty_first_name",
            Self::EmptyLastName => "empty_last_name",
            Self::MissingBirthDate => "missing_birth_date",
            Self::BirthDateNotInPast => "birth_date_not_in_past",
        }
    }
}

impl fmt::Display for UserViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::EmptyEmail => "Email cannot be blank",
            Self::InvalidEmail => "Email is not valid",
            Self::EmptyFirstName => "First name cannot be blank",
            Self::EmptyLastName => "Last name cannot be blank",
            Self::MissingBirthDate => "Birth date cannot be null",
            Self::BirthDateNotInPast => "Birth date must be in the past",
        };
        f.write_str(message)
    }
}

impl std::error::Error for UserViolation {}

/// Every rule a candidate record broke, in field order.
///
/// ## Invariants
/// - Never empty when produced by [`UserDraft::into_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserViolations(Vec<UserViolation>);

impl UserViolations {
    /// Wrap a list of violations.
    pub fn new(violations: Vec<UserViolation>) -> Self {
        Self(violations)
    }

    /// The first broken rule, reported as the headline message.
    pub fn first(&self) -> Option<UserViolation> {
        self.0.first().copied()
    }

    /// Iterate over every broken rule.
    pub fn iter(&self) -> impl Iterator<Item = UserViolation> + '_ {
        self.0.iter().copied()
    }

    /// Number of broken rules.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no rule was broken.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UserViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut violations = self.0.iter();
        if let Some(first) = violations.next() {
            write!(f, "{first}")?;
        }
        for violation in violations {
            write!(f, "; {violation}")?;
        }
        Ok(())
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^\s@]+@[^\s@]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|text| text.trim().is_empty())
}

/// Stored user record.
///
/// ## Invariants
/// - `email`, `first_name` and `last_name` are non-blank; `email` is
///   syntactically valid.
/// - `birth_date` was strictly in the past when the record was validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    email: String,
    first_name: String,
    last_name: String,
    birth_date: NaiveDate,
    address: Option<String>,
    phone_number: Option<String>,
}

impl User {
    /// Stable identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Contact email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Given name.
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Family name.
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Calendar birth date.
    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    /// Optional postal address.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Optional phone number.
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }
}

/// Unvalidated user fields used for creation and full replacement.
///
/// Absent optional fields stay absent on the stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
    /// Contact email address.
    pub email: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Calendar birth date.
    pub birth_date: Option<NaiveDate>,
    /// Optional postal address.
    pub address: Option<String>,
    /// Optional phone number.
    pub phone_number: Option<String>,
}

impl UserDraft {
    /// Collect every broken field rule relative to `today`.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use userbase::domain::{UserDraft, UserViolation};
    ///
    /// let today = NaiveDate::from_ymd_opt(2026, 10, 18).expect("date");
    /// let draft = UserDraft {
    ///     email: Some("bademail".to_owned()),
    ///     ..UserDraft::default()
    /// };
    /// let violations = draft.violations(today);
    /// assert_eq!(violations.first(), Some(UserViolation::InvalidEmail));
    /// ```
    pub fn violations(&self, today: NaiveDate) -> UserViolations {
        let mut violations = Vec::new();

        match self.email.as_deref() {
            email if is_blank(email) => violations.push(UserViolation::EmptyEmail),
            Some(email) if !email_regex().is_match(email) => {
                violations.push(UserViolation::InvalidEmail);
            }
            _ => {}
        }
        if is_blank(self.first_name.as_deref()) {
            violations.push(UserViolation::EmptyFirstName);
        }
        if is_blank(self.last_name.as_deref()) {
            violations.push(UserViolation::EmptyLastName);
        }
        match self.birth_date {
            None => violations.push(UserViolation::MissingBirthDate),
            Some(birth_date) if birth_date >= today => {
                violations.push(UserViolation::BirthDateNotInPast);
            }
            Some(_) => {}
        }

        UserViolations::new(violations)
    }

    /// Validate the draft and stamp it with `id`.
    ///
    /// # Errors
    /// Returns every broken rule when the draft is not a valid record.
    pub fn into_user(self, id: UserId, today: NaiveDate) -> Result<User, UserViolations> {
        let violations = self.violations(today);
        let Self {
            email: Some(email),
            first_name: Some(first_name),
            last_name: Some(last_name),
            birth_date: Some(birth_date),
            address,
            phone_number,
        } = self
        else {
            return Err(violations);
        };
        if !violations.is_empty() {
            return Err(violations);
        }

        Ok(User {
            id,
            email,
            first_name,
            last_name,
            birth_date,
            address,
            phone_number,
        })
    }
}

impl From<User> for UserDraft {
    fn from(value: User) -> Self {
        let User {
            id: _,
            email,
            first_name,
            last_name,
            birth_date,
            address,
            phone_number,
        } = value;
        Self {
            email: Some(email),
            first_name: Some(first_name),
            last_name: Some(last_name),
            birth_date: Some(birth_date),
            address,
            phone_number,
        }
    }
}

/// Partial update: only supplied fields overwrite the stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// Replacement email address.
    pub email: Option<String>,
    /// Replacement given name.
    pub first_name: Option<String>,
    /// Replacement family name.
    pub last_name: Option<String>,
    /// Replacement birth date.
    pub birth_date: Option<NaiveDate>,
    /// Replacement postal address.
    pub address: Option<String>,
    /// Replacement phone number.
    pub phone_number: Option<String>,
}

impl UserPatch {
    /// Merge the supplied fields over a copy of `existing`.
    ///
    /// The result is unvalidated; run it through [`UserDraft::into_user`].
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use userbase::domain::{UserDraft, UserId, UserPatch};
    ///
    /// let today = NaiveDate::from_ymd_opt(2026, 10, 18).expect("date");
    /// let existing = UserDraft {
    ///     email: Some("jim@example.com".to_owned()),
    ///     first_name: Some("Jim".to_owned()),
    ///     last_name: Some("Karry".to_owned()),
    ///     birth_date: NaiveDate::from_ymd_opt(1985, 5, 15),
    ///     ..UserDraft::default()
    /// }
    /// .into_user(UserId::new(1), today)
    /// .expect("valid user");
    ///
    /// let patch = UserPatch {
    ///     address: Some("New York".to_owned()),
    ///     ..UserPatch::default()
    /// };
    /// let merged = patch.apply_to(&existing);
    /// assert_eq!(merged.first_name.as_deref(), Some("Jim"));
    /// assert_eq!(merged.address.as_deref(), Some("New York"));
    /// ```
    pub fn apply_to(self, existing: &User) -> UserDraft {
        let mut candidate = UserDraft::from(existing.clone());
        let Self {
            email,
            first_name,
            last_name,
            birth_date,
            address,
            phone_number,
        } = self;

        if email.is_some() {
            candidate.email = email;
        }
        if first_name.is_some() {
            candidate.first_name = first_name;
        }
        if last_name.is_some() {
            candidate.last_name = last_name;
        }
        if birth_date.is_some() {
            candidate.birth_date = birth_date;
        }
        if address.is_some() {
            candidate.address = address;
        }
        if phone_number.is_some() {
            candidate.phone_number = phone_number;
        }
        candidate
    }
}
