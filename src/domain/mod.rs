use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};

pub const DEFAULT_GRADUATION_YEAR: i32 = 2024;

/// Years offered by the entry form. The core accepts any integer year.
pub const GRADUATION_YEAR_OPTIONS: [i32; 4] = [2024, 2025, 2026, 2027];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingRequiredField,
    InvalidGraduationYear { value: String },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingRequiredField => "missing_required_field",
            Self::InvalidGraduationYear { .. } => "invalid_graduation_year",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequiredField => write!(f, "Please fill in all fields"),
            Self::InvalidGraduationYear { value } => {
                write!(f, "invalid graduation_year: {value:?}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentRecord {
    pub id: u64,
    pub name: String,
    pub major: String,
    pub email: String,
    pub graduation_year: i32,
}

/// A draft that passed validation, with its year already coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub major: String,
    pub email: String,
    pub graduation_year: i32,
}

impl NewStudent {
    pub fn into_record(self, id: u64) -> StudentRecord {
        StudentRecord {
            id,
            name: self.name,
            major: self.major,
            email: self.email,
            graduation_year: self.graduation_year,
        }
    }
}

/// Raw value forwarded from an input event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FieldValue {
    Number(#[serde(deserialize_with = "deserialize_whole_number")] i32),
    Text(String),
}

fn deserialize_whole_number<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = f64::deserialize(deserializer)?;
    whole_number_to_i32(n).ok_or_else(|| de::Error::custom(format!("not a whole i32: {n}")))
}

fn whole_number_to_i32(n: f64) -> Option<i32> {
    if n.is_finite() && n.fract() == 0.0 && n >= i32::MIN as f64 && n <= i32::MAX as f64 {
        Some(n as i32)
    } else {
        None
    }
}

impl FieldValue {
    pub fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Major,
    Email,
    GraduationYear,
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Major => "major",
            Self::Email => "email",
            Self::GraduationYear => "graduation_year",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDraftField {
    pub field: String,
}

impl std::fmt::Display for UnknownDraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown draft field: {}", self.field)
    }
}

impl std::error::Error for UnknownDraftField {}

impl FromStr for DraftField {
    type Err = UnknownDraftField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "major" => Ok(Self::Major),
            "email" => Ok(Self::Email),
            "graduation_year" | "graduationYear" => Ok(Self::GraduationYear),
            other => Err(UnknownDraftField {
                field: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DraftRecord {
    pub name: String,
    pub major: String,
    pub email: String,
    pub graduation_year: FieldValue,
}

impl DraftRecord {
    pub fn with_graduation_year(graduation_year: i32) -> Self {
        Self {
            name: String::new(),
            major: String::new(),
            email: String::new(),
            graduation_year: FieldValue::Number(graduation_year),
        }
    }

    pub fn set(&mut self, field: DraftField, value: FieldValue) {
        match field {
            DraftField::Name => self.name = value.into_text(),
            DraftField::Major => self.major = value.into_text(),
            DraftField::Email => self.email = value.into_text(),
            DraftField::GraduationYear => self.graduation_year = value,
        }
    }

    /// Checks the required text fields, then coerces the year.
    ///
    /// Only exact-empty strings are rejected; whitespace-only values pass. The email is not
    /// checked for format.
    pub fn validate(&self) -> Result<NewStudent, ValidationError> {
        validate_required_fields(&self.name, &self.major, &self.email)?;
        let graduation_year = coerce_graduation_year(&self.graduation_year)?;
        Ok(NewStudent {
            name: self.name.clone(),
            major: self.major.clone(),
            email: self.email.clone(),
            graduation_year,
        })
    }
}

impl Default for DraftRecord {
    fn default() -> Self {
        Self::with_graduation_year(DEFAULT_GRADUATION_YEAR)
    }
}

pub fn validate_required_fields(
    name: &str,
    major: &str,
    email: &str,
) -> Result<(), ValidationError> {
    if name.is_empty() || major.is_empty() || email.is_empty() {
        return Err(ValidationError::MissingRequiredField);
    }
    Ok(())
}

/// Numeric parse of the stored year.
///
/// Text is trimmed and read as a decimal number, so `"2025.0"` and `"2.025e3"` both give 2025.
/// Empty or whitespace-only text gives 0. Fractional, non-finite, or out-of-range values are
/// rejected.
pub fn coerce_graduation_year(value: &FieldValue) -> Result<i32, ValidationError> {
    match value {
        FieldValue::Number(n) => Ok(*n),
        FieldValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(whole_number_to_i32)
                .ok_or_else(|| ValidationError::InvalidGraduationYear { value: s.clone() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled_draft() -> DraftRecord {
        let mut draft = DraftRecord::default();
        draft.set(DraftField::Name, "Ana".into());
        draft.set(DraftField::Major, "Physics".into());
        draft.set(DraftField::Email, "ana@x.edu".into());
        draft
    }

    #[test]
    fn default_draft_is_empty_with_default_year() {
        let draft = DraftRecord::default();
        assert_eq!(draft.name, "");
        assert_eq!(draft.major, "");
        assert_eq!(draft.email, "");
        assert_eq!(draft.graduation_year, FieldValue::Number(2024));
    }

    #[test]
    fn each_empty_required_field_is_rejected() {
        for field in [DraftField::Name, DraftField::Major, DraftField::Email] {
            let mut draft = filled_draft();
            draft.set(field, "".into());
            assert_eq!(
                draft.validate(),
                Err(ValidationError::MissingRequiredField),
                "field {}",
                field.as_str()
            );
        }
    }

    #[test]
    fn whitespace_only_fields_pass_validation() {
        let mut draft = DraftRecord::default();
        draft.set(DraftField::Name, " ".into());
        draft.set(DraftField::Major, "\t".into());
        draft.set(DraftField::Email, "  ".into());
        let student = draft.validate().unwrap();
        assert_eq!(student.name, " ");
        assert_eq!(student.email, "  ");
    }

    #[test]
    fn email_format_is_not_checked() {
        let mut draft = filled_draft();
        draft.set(DraftField::Email, "not-an-email".into());
        assert_eq!(draft.validate().unwrap().email, "not-an-email");
    }

    #[test]
    fn text_and_number_years_coerce_to_the_same_value() {
        let mut as_text = filled_draft();
        as_text.set(DraftField::GraduationYear, "2025".into());
        let mut as_number = filled_draft();
        as_number.set(DraftField::GraduationYear, 2025.into());

        assert_eq!(as_text.validate().unwrap().graduation_year, 2025);
        assert_eq!(as_text.validate(), as_number.validate());
    }

    #[test]
    fn year_outside_options_is_accepted() {
        assert_eq!(coerce_graduation_year(&FieldValue::Number(1999)), Ok(1999));
        assert_eq!(coerce_graduation_year(&" 2031 ".into()), Ok(2031));
    }

    #[test]
    fn year_text_uses_numeric_parse() {
        assert_eq!(coerce_graduation_year(&"2025.0".into()), Ok(2025));
        assert_eq!(coerce_graduation_year(&"2.025e3".into()), Ok(2025));
        assert_eq!(coerce_graduation_year(&"".into()), Ok(0));
        assert_eq!(coerce_graduation_year(&"   ".into()), Ok(0));
    }

    #[test]
    fn fractional_or_unbounded_year_is_rejected() {
        for raw in ["2025.5", "inf", "NaN", "1e12"] {
            assert_eq!(
                coerce_graduation_year(&raw.into()),
                Err(ValidationError::InvalidGraduationYear {
                    value: raw.to_string()
                }),
                "{raw}"
            );
        }
    }

    #[test]
    fn non_numeric_year_is_rejected() {
        assert_eq!(
            coerce_graduation_year(&"next year".into()),
            Err(ValidationError::InvalidGraduationYear {
                value: "next year".to_string()
            })
        );
    }

    #[test]
    fn missing_field_wins_over_bad_year() {
        let mut draft = DraftRecord::default();
        draft.set(DraftField::GraduationYear, "abc".into());
        assert_eq!(draft.validate(), Err(ValidationError::MissingRequiredField));
    }

    #[test]
    fn numbers_for_text_fields_are_stored_as_text() {
        let mut draft = DraftRecord::default();
        draft.set(DraftField::Name, 42.into());
        assert_eq!(draft.name, "42");
    }

    #[test]
    fn parses_field_names() {
        assert_eq!("name".parse::<DraftField>(), Ok(DraftField::Name));
        assert_eq!(
            "graduationYear".parse::<DraftField>(),
            Ok(DraftField::GraduationYear)
        );
        assert_eq!(
            "graduation_year".parse::<DraftField>(),
            Ok(DraftField::GraduationYear)
        );
        let err = "id".parse::<DraftField>().unwrap_err();
        assert_eq!(err.to_string(), "unknown draft field: id");
    }

    #[test]
    fn field_value_deserializes_numbers_and_strings() {
        let n: FieldValue = serde_json::from_str("2026").unwrap();
        let s: FieldValue = serde_json::from_str("\"2026\"").unwrap();
        assert_eq!(n, FieldValue::Number(2026));
        assert_eq!(s, FieldValue::Text("2026".to_string()));
    }

    #[test]
    fn field_value_accepts_whole_floats_only() {
        let whole: FieldValue = serde_json::from_str("2025.0").unwrap();
        assert_eq!(whole, FieldValue::Number(2025));
        assert!(serde_json::from_str::<FieldValue>("2025.5").is_err());
        assert!(serde_json::from_str::<FieldValue>("1e12").is_err());
    }

    #[test]
    fn year_options_match_default_year() {
        assert!(GRADUATION_YEAR_OPTIONS.contains(&DEFAULT_GRADUATION_YEAR));
    }

    #[test]
    fn missing_field_message_is_generic() {
        assert_eq!(
            ValidationError::MissingRequiredField.to_string(),
            "Please fill in all fields"
        );
        assert_eq!(
            ValidationError::MissingRequiredField.code(),
            "missing_required_field"
        );
    }
}
