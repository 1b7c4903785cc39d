//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper runs before any port is called, so a rejected request never
//! touches storage.

use serde_json::{Value, json};

use crate::domain::{
    AgeRange, CatalogId, CatalogSelection, DietType, Error, FieldUpdate, Gender, Period,
    ProfileName, checked_measurement,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidIdList,
    InvalidPeriod,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidIdList => "invalid_id_list",
            ErrorCode::InvalidPeriod => "invalid_period",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: &Value) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    ValidationError::new(field, format!("missing required field: {}", field.as_str()))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_value_error(field: FieldName, value: &Value, message: &str) -> Error {
    ValidationError::new(field, format!("{}: {message}", field.as_str()))
        .with_value(ErrorCode::InvalidValue, value)
}

fn invalid_id_list_error(field: FieldName, value: &Value) -> Error {
    ValidationError::new(
        field,
        format!("{} must be a list of positive integer ids", field.as_str()),
    )
    .with_value(ErrorCode::InvalidIdList, value)
}

/// Parse the `period` query parameter; absent means [`Period::Week`].
pub(crate) fn parse_period(raw: Option<&str>) -> Result<Period, Error> {
    let Some(raw) = raw else {
        return Ok(Period::default());
    };
    raw.parse().map_err(|err| {
        ValidationError::new(FieldName::new("period"), format!("{err}"))
            .with_value(ErrorCode::InvalidPeriod, &Value::String(raw.to_owned()))
    })
}

/// Parse a catalog id list. Anything other than a JSON array of positive
/// integers is rejected.
pub(crate) fn parse_catalog_ids(value: &Value, field: FieldName) -> Result<CatalogSelection, Error> {
    let Value::Array(items) = value else {
        return Err(invalid_id_list_error(field, value));
    };
    let ids = items
        .iter()
        .map(|item| {
            item.as_i64()
                .and_then(|raw| CatalogId::new(raw).ok())
                .ok_or_else(|| invalid_id_list_error(field, value))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CatalogSelection::new(ids))
}

/// Parse an id list that must be present.
pub(crate) fn required_catalog_ids(
    update: FieldUpdate<Value>,
    field: FieldName,
) -> Result<CatalogSelection, Error> {
    match update {
        FieldUpdate::Unchanged => Err(missing_field_error(field)),
        FieldUpdate::Set(value) => parse_catalog_ids(&value, field),
        FieldUpdate::Clear => Err(invalid_id_list_error(field, &Value::Null)),
    }
}

/// Optional id list in a partial update; `null` is not a list.
pub(crate) fn optional_catalog_ids(
    update: FieldUpdate<Value>,
    field: FieldName,
) -> Result<Option<CatalogSelection>, Error> {
    match update {
        FieldUpdate::Unchanged => Ok(None),
        FieldUpdate::Set(value) => parse_catalog_ids(&value, field).map(Some),
        FieldUpdate::Clear => Err(invalid_id_list_error(field, &Value::Null)),
    }
}

fn as_text(value: &Value, field: FieldName) -> Result<String, Error> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| invalid_value_error(field, value, "must be a string"))
}

/// Parse an optional name; it may be replaced but never cleared.
pub(crate) fn parse_name(update: FieldUpdate<Value>) -> Result<Option<ProfileName>, Error> {
    let field = FieldName::new("name");
    match update {
        FieldUpdate::Unchanged => Ok(None),
        FieldUpdate::Clear => Err(invalid_value_error(field, &Value::Null, "must not be null")),
        FieldUpdate::Set(value) => {
            let raw = as_text(&value, field)?;
            ProfileName::new(&raw)
                .map(Some)
                .map_err(|err| invalid_value_error(field, &value, &err.to_string()))
        }
    }
}

/// Parse a tri-state text field with a domain parser.
pub(crate) fn parse_text_update<T, E>(
    update: FieldUpdate<Value>,
    field: FieldName,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Result<FieldUpdate<T>, Error>
where
    E: std::fmt::Display,
{
    update.try_map(|value| {
        let raw = as_text(&value, field)?;
        parse(&raw).map_err(|err| invalid_value_error(field, &value, &err.to_string()))
    })
}

pub(crate) fn parse_diet_type(update: FieldUpdate<Value>) -> Result<FieldUpdate<DietType>, Error> {
    parse_text_update(update, FieldName::new("diet_type"), str::parse::<DietType>)
}

pub(crate) fn parse_gender(update: FieldUpdate<Value>) -> Result<FieldUpdate<Gender>, Error> {
    parse_text_update(update, FieldName::new("gender"), str::parse::<Gender>)
}

pub(crate) fn parse_age_range(update: FieldUpdate<Value>) -> Result<FieldUpdate<AgeRange>, Error> {
    parse_text_update(update, FieldName::new("age_range"), |raw: &str| {
        AgeRange::new(raw)
    })
}

/// Parse a tri-state height or weight.
pub(crate) fn parse_measurement(
    update: FieldUpdate<Value>,
    field: FieldName,
) -> Result<FieldUpdate<f64>, Error> {
    update.try_map(|value| {
        value
            .as_f64()
            .and_then(checked_measurement)
            .ok_or_else(|| invalid_value_error(field, &value, "must be a positive number"))
    })
}
