//! Field kinds: the syntactic rules and normalization specific to each gateway data type.

use std::sync::LazyLock;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use nps_proto::format::{DATE_FORMAT, DATETIME_FORMAT, TIME_FORMAT, strip_amount_separators};
use regex::Regex;

use super::FieldInput;
use crate::error::Constraint;

static ALFA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").expect("valid alfa regex"));

static ALFANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("valid alfanumeric regex"));

static ORDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9 _\-.]+$").expect("valid order regex"));

static MERCHANT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9 _]+$").expect("valid merchant id regex"));

static COUNTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid country regex"));

// Dot-atom or quoted-string local part, RFC 2822 section 3.2.5.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(^[-!#$%&'*+/=?^_`{}|~0-9A-Z]+(\.[-!#$%&'*+/=?^_`{}|~0-9A-Z]+)*",
        r#"|^"([\x01-\x08\x0b\x0c\x0e-\x1f!#-\[\]-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*""#,
        r")@(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?$",
    ))
    .expect("valid email regex")
});

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^\b((?:[a-z][\w-]+:(?:/{1,3}|[a-z0-9%])|www\d{0,3}[.]|[a-z0-9.\-]+[.][a-z]{2,4}/)",
        r"(?:[^\s()<>]+|\(([^\s()<>]+|(\([^\s()<>]+\)))*\))+",
        r#"(?:\(([^\s()<>]+|(\([^\s()<>]+\)))*\)|[^\s`!()\[\]{};:'".,<>?«»“”‘’]))"#,
    ))
    .expect("valid url regex")
});

static VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]\.[0-9]").expect("valid version regex"));

/// Maximum URL length enforced by [`FieldKind::url`].
pub const DEFAULT_URL_MAX_LENGTH: usize = 255;

/// The gateway data type of a field.
///
/// Each kind normalizes its input and checks its own character set or format
/// before the generic [`FieldSpec`](super::FieldSpec) rules run. Kind checks
/// only apply to non-empty values; the empty string is governed by
/// [`FieldSpec::null`](super::FieldSpec::null).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Decimal digits only, passed as a string (e.g., `"032"`).
    Numeric,
    /// Money in minor currency units; `,` and `.` are stripped first.
    Amount,
    /// ASCII letters only.
    Alfa,
    /// ASCII letters and digits.
    Alfanumeric,
    /// Letters, digits, space, `_`, `-` and `.`.
    Order,
    /// Letters, digits, space and `_`.
    MerchantId,
    /// Three upper-case letters (ISO 3166-1 alpha-3 shape).
    Country,
    /// Email address, optionally checked against an RFC 2822 pattern.
    Email {
        /// Check the address format.
        validate: bool,
    },
    /// URL, optionally checked against a URL pattern.
    Url {
        /// Check the URL format.
        validate: bool,
        /// Maximum length, enforced whether or not `validate` is set.
        max_length: usize,
    },
    /// Date stored as `YYYY-MM-DD`.
    Date {
        /// Read back today's date instead of the stored value.
        today: bool,
    },
    /// Date-time stored as `YYYY-MM-DD HH:MM:SS`.
    DateTime {
        /// Read back the current local time instead of the stored value.
        now: bool,
    },
    /// Time of day stored as `HH:MM:SS`.
    Time {
        /// Read back the current local time instead of the stored value.
        now: bool,
    },
    /// 32 hexadecimal characters.
    Md5,
    /// Protocol version, optionally checked against `d.d`.
    Version {
        /// Check the version format.
        validate: bool,
    },
}

impl FieldKind {
    /// Email without format validation.
    #[must_use]
    pub const fn email() -> Self {
        Self::Email { validate: false }
    }

    /// URL with format validation and the default maximum length.
    #[must_use]
    pub const fn url() -> Self {
        Self::Url {
            validate: true,
            max_length: DEFAULT_URL_MAX_LENGTH,
        }
    }

    /// Date holding a fixed value.
    #[must_use]
    pub const fn date() -> Self {
        Self::Date { today: false }
    }

    /// Date-time holding a fixed value.
    #[must_use]
    pub const fn datetime() -> Self {
        Self::DateTime { now: false }
    }

    /// Time holding a fixed value.
    #[must_use]
    pub const fn time() -> Self {
        Self::Time { now: false }
    }

    /// Returns the current value for kinds that track the clock.
    ///
    /// Such fields are recomputed on every read rather than stored.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        match self {
            Self::Date { today: true } => {
                Some(Local::now().date_naive().format(DATE_FORMAT).to_string())
            }
            Self::DateTime { now: true } => {
                Some(Local::now().naive_local().format(DATETIME_FORMAT).to_string())
            }
            Self::Time { now: true } => Some(Local::now().time().format(TIME_FORMAT).to_string()),
            _ => None,
        }
    }

    /// Converts `input` to its canonical string form and applies the kind's own checks.
    ///
    /// On failure the best-effort normalized value is returned alongside the
    /// violated rule for error reporting.
    pub(crate) fn normalize(self, input: FieldInput) -> Result<String, (String, Constraint)> {
        match self {
            Self::Date { .. } => normalize_date(input),
            Self::DateTime { .. } => normalize_datetime(input),
            Self::Time { .. } => normalize_time(input),
            _ => {
                let text = match input {
                    FieldInput::Text(text) => text,
                    other => return Err((other.to_string(), Constraint::InputKind("a text value"))),
                };
                let value = if self == Self::Amount {
                    strip_amount_separators(&text)
                } else {
                    text
                };
                if value.is_empty() {
                    return Ok(value);
                }
                match self.violation(&value) {
                    Some(constraint) => Err((value, constraint)),
                    None => Ok(value),
                }
            }
        }
    }

    fn violation(self, value: &str) -> Option<Constraint> {
        match self {
            Self::Numeric | Self::Amount => {
                (!value.bytes().all(|b| b.is_ascii_digit())).then_some(Constraint::NotNumeric)
            }
            Self::Alfa => charset(&ALFA, value, "ASCII letters"),
            Self::Alfanumeric => charset(&ALFANUMERIC, value, "ASCII letters and digits"),
            Self::Order => charset(&ORDER, value, "letters, digits, spaces, \"_\", \"-\" and \".\""),
            Self::MerchantId => charset(&MERCHANT_ID, value, "letters, digits, spaces and \"_\""),
            Self::Country => charset(&COUNTRY, value, "ISO 3166-1 alpha-3 country codes"),
            Self::Email { validate } => {
                (validate && !EMAIL.is_match(value)).then_some(Constraint::Email)
            }
            Self::Url {
                validate,
                max_length,
            } => {
                if validate && !URL.is_match(value) {
                    Some(Constraint::Url)
                } else if value.chars().count() > max_length {
                    Some(Constraint::MaxLength(max_length))
                } else {
                    None
                }
            }
            Self::Md5 => (value.len() != 32 || !value.bytes().all(|b| b.is_ascii_hexdigit()))
                .then_some(Constraint::Md5),
            Self::Version { validate } => {
                (validate && !VERSION.is_match(value)).then_some(Constraint::Version)
            }
            Self::Text | Self::Date { .. } | Self::DateTime { .. } | Self::Time { .. } => None,
        }
    }
}

fn charset(regex: &Regex, value: &str, description: &'static str) -> Option<Constraint> {
    (!regex.is_match(value)).then_some(Constraint::Charset(description))
}

fn normalize_date(input: FieldInput) -> Result<String, (String, Constraint)> {
    match input {
        FieldInput::Text(text) if text.is_empty() => Ok(text),
        FieldInput::Text(text) => match NaiveDate::parse_from_str(&text, DATE_FORMAT) {
            Ok(date) => Ok(date.format(DATE_FORMAT).to_string()),
            Err(_) => Err((text, Constraint::Format(DATE_FORMAT))),
        },
        FieldInput::Date(date) => Ok(date.format(DATE_FORMAT).to_string()),
        FieldInput::DateTime(datetime) => Ok(datetime.date().format(DATE_FORMAT).to_string()),
        FieldInput::Time(_) => Err((input.to_string(), Constraint::InputKind("a date"))),
    }
}

fn normalize_datetime(input: FieldInput) -> Result<String, (String, Constraint)> {
    match input {
        FieldInput::Text(text) if text.is_empty() => Ok(text),
        FieldInput::Text(text) => match NaiveDateTime::parse_from_str(&text, DATETIME_FORMAT) {
            Ok(datetime) => Ok(datetime.format(DATETIME_FORMAT).to_string()),
            Err(_) => Err((text, Constraint::Format(DATETIME_FORMAT))),
        },
        FieldInput::DateTime(datetime) => Ok(datetime.format(DATETIME_FORMAT).to_string()),
        FieldInput::Date(_) | FieldInput::Time(_) => {
            Err((input.to_string(), Constraint::InputKind("a date-time")))
        }
    }
}

fn normalize_time(input: FieldInput) -> Result<String, (String, Constraint)> {
    match input {
        FieldInput::Text(text) if text.is_empty() => Ok(text),
        FieldInput::Text(text) => match NaiveTime::parse_from_str(&text, TIME_FORMAT) {
            Ok(time) => Ok(time.format(TIME_FORMAT).to_string()),
            Err(_) => Err((text, Constraint::Format(TIME_FORMAT))),
        },
        FieldInput::Time(time) => Ok(time.format(TIME_FORMAT).to_string()),
        FieldInput::DateTime(datetime) => Ok(datetime.time().format(TIME_FORMAT).to_string()),
        FieldInput::Date(_) => Err((input.to_string(), Constraint::InputKind("a time"))),
    }
}
