use chrono::Datelike;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Maximum length of an expense label, enforced at the form boundary.
pub const MAX_LABEL_LEN: usize = 200;

/// Identifier of an expense entry.
///
/// Persisted entries carry the server-assigned id. An entry created
/// optimistically, before the server has confirmed it, carries a locally
/// generated `Pending` id (epoch millis at creation) so the UI can tell
/// confirmed and unconfirmed records apart without string comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseId {
    /// Local placeholder id for an in-flight optimistic entry.
    Pending(i64),
    /// Server-assigned id of a persisted entry.
    Persisted(String),
}

impl ExpenseId {
    /// Generate a pending id from the current instant.
    pub fn pending_now() -> Self {
        ExpenseId::Pending(chrono::Utc::now().timestamp_millis())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ExpenseId::Pending(_))
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Distinct from any server id; servers never issue this prefix.
            ExpenseId::Pending(millis) => write!(f, "optimistic-{}", millis),
            ExpenseId::Persisted(id) => write!(f, "{}", id),
        }
    }
}

impl Serialize for ExpenseId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExpenseId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Anything coming off the wire is a persisted record.
        String::deserialize(deserializer).map(ExpenseId::Persisted)
    }
}

/// A single ledger entry.
///
/// Within a month's list, ordering is newest-first; an optimistic entry is
/// prepended ahead of everything already fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    /// Fixed two-decimal numeric string, never a binary float.
    pub amount: String,
    /// Optional free-text label (max 200 characters).
    pub label: Option<String>,
    /// Calendar date of the expense, YYYY-MM-DD.
    pub expense_date: String,
    /// RFC 3339 timestamp; server-assigned for persisted entries.
    pub created_at: String,
}

impl Expense {
    /// Synthesize the provisional entry for an optimistic insert.
    ///
    /// Carries the submitted fields through unchanged, with a locally
    /// generated pending id and the current instant as `created_at`.
    pub fn provisional(body: &ExpenseCreateBody) -> Self {
        Expense {
            id: ExpenseId::pending_now(),
            amount: body.amount.clone(),
            label: body.label.clone(),
            expense_date: body.expense_date.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Body of `POST /expenses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCreateBody {
    /// Positive numeric string with at most two decimals.
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Calendar date of the expense, YYYY-MM-DD.
    pub expense_date: String,
}

impl ExpenseCreateBody {
    /// Form-boundary validation. The create flow itself is never invoked
    /// with a body that fails these checks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_valid_amount(&self.amount) {
            return Err(ValidationError::InvalidAmount);
        }
        if let Some(label) = &self.label {
            if label.chars().count() > MAX_LABEL_LEN {
                return Err(ValidationError::LabelTooLong);
            }
        }
        if !is_valid_date(&self.expense_date) {
            return Err(ValidationError::InvalidDate);
        }
        Ok(())
    }
}

/// The user's budget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Positive numeric string with at most two decimals.
    pub monthly_income: String,
    /// Numeric string between 0 and 100.
    pub savings_percentage: String,
    pub updated_at: String,
}

/// Body of `PUT /config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigUpdateBody {
    pub monthly_income: String,
    pub savings_percentage: String,
}

impl ConfigUpdateBody {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_valid_amount(&self.monthly_income) {
            return Err(ValidationError::InvalidAmount);
        }
        if !is_valid_percentage(&self.savings_percentage) {
            return Err(ValidationError::InvalidPercentage);
        }
        Ok(())
    }
}

/// Why a submitted form value was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("amount must be a positive number with at most two decimals")]
    InvalidAmount,
    #[error("label must be at most {MAX_LABEL_LEN} characters")]
    LabelTooLong,
    #[error("date must be YYYY-MM-DD")]
    InvalidDate,
    #[error("savings percentage must be between 0 and 100")]
    InvalidPercentage,
}

/// Check that `input` is digits with an optional dot and at most two
/// decimals, and parses to a strictly positive value.
pub fn is_valid_amount(input: &str) -> bool {
    if !has_valid_decimal_shape(input) {
        return false;
    }
    // Strictly positive: at least one non-zero digit somewhere.
    input.bytes().any(|b| (b'1'..=b'9').contains(&b))
}

/// Check that `input` is a numeric string (at most two decimals) between
/// 0 and 100 inclusive.
pub fn is_valid_percentage(input: &str) -> bool {
    if !has_valid_decimal_shape(input) {
        return false;
    }
    let (int_part, frac_part) = match input.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (input, None),
    };
    let int_value = match int_part.parse::<u32>() {
        Ok(value) => value,
        Err(_) => return false,
    };
    match int_value {
        0..=99 => true,
        100 => frac_part.map_or(true, |frac| frac.bytes().all(|b| b == b'0')),
        _ => false,
    }
}

/// Digits, optional dot, one or two decimal digits. No sign, no exponent.
fn has_valid_decimal_shape(input: &str) -> bool {
    let (int_part, frac_part) = match input.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (input, None),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match frac_part {
        Some(frac) => {
            !frac.is_empty() && frac.len() <= 2 && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => true,
    }
}

/// Check that `input` is a plausible YYYY-MM-DD calendar date string.
pub fn is_valid_date(input: &str) -> bool {
    let parts: Vec<&str> = input.split('-').collect();
    if parts.len() != 3 || parts[0].len() != 4 || parts[1].len() != 2 || parts[2].len() != 2 {
        return false;
    }
    let (year, month, day) = match (
        parts[0].parse::<u32>(),
        parts[1].parse::<u32>(),
        parts[2].parse::<u32>(),
    ) {
        (Ok(y), Ok(m), Ok(d)) => (y, m, d),
        _ => return false,
    };
    let _ = year;
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// The ledger month being viewed, the `YYYY-MM` part of every expense
/// cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthKeyError> {
        if !(1..=12).contains(&month) {
            return Err(MonthKeyError::MonthOutOfRange);
        }
        Ok(MonthKey { year, month })
    }

    /// The current calendar month from the local clock.
    pub fn current() -> Self {
        let now = chrono::Local::now();
        MonthKey {
            year: now.year(),
            month: now.month(),
        }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            MonthKey { year: self.year - 1, month: 12 }
        } else {
            MonthKey { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            MonthKey { year: self.year + 1, month: 1 }
        } else {
            MonthKey { year: self.year, month: self.month + 1 }
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year_part, month_part) = s.split_once('-').ok_or(MonthKeyError::InvalidFormat)?;
        if year_part.len() != 4 || month_part.len() != 2 {
            return Err(MonthKeyError::InvalidFormat);
        }
        let year = year_part
            .parse::<i32>()
            .map_err(|_| MonthKeyError::InvalidFormat)?;
        let month = month_part
            .parse::<u32>()
            .map_err(|_| MonthKeyError::InvalidFormat)?;
        MonthKey::new(year, month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MonthKeyError {
    #[error("month key must be YYYY-MM")]
    InvalidFormat,
    #[error("month must be between 01 and 12")]
    MonthOutOfRange,
}

/// A failed API call, normalized from a non-2xx response or a transport
/// error. The create flow only distinguishes failed from succeeded; the
/// detail is for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("api error ({status}): {message}")]
pub struct ApiError {
    /// HTTP status, or 0 when the request never produced a response.
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

impl ApiError {
    /// A transport-level failure with no HTTP response.
    pub fn network(message: impl Into<String>) -> Self {
        ApiError {
            status: 0,
            code: None,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Wire shape of a backend error body: `{"error": {"code", "message"}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}
