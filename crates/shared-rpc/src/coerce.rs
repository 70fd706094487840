//! Payload coercion: opaque envelope data into concrete typed values.
//!
//! Decoding is target-type-driven and explicit at each call site. Policy:
//!
//! 1. Absent or null data is an empty result, not an error.
//! 2. An ordered sequence decodes element-wise, preserving order.
//! 3. A single record decodes directly; when a sequence was expected it is
//!    wrapped into a one-element sequence.
//!
//! Failure to decode is a [`CoerceError`], never a silent null.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Errors from payload coercion.
#[derive(Debug, Error)]
pub enum CoerceError {
    /// The payload does not fit the requested target shape.
    #[error("cannot decode payload into {target}: {source}")]
    Shape {
        /// Name of the requested target type.
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

fn shape_error<T>(source: serde_json::Error) -> CoerceError {
    CoerceError::Shape {
        target: std::any::type_name::<T>(),
        source,
    }
}

/// Decode opaque data into a single typed record.
///
/// Absent or null data yields `None`.
pub fn decode_item<T: DeserializeOwned>(data: Option<&Value>) -> Result<Option<T>, CoerceError> {
    match data {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(shape_error::<T>),
    }
}

/// Decode opaque data into an ordered sequence of typed records.
///
/// Absent or null data yields an empty sequence; a single record wraps into
/// a one-element sequence.
pub fn decode_list<T: DeserializeOwned>(data: Option<&Value>) -> Result<Vec<T>, CoerceError> {
    match data {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| serde_json::from_value(item.clone()).map_err(shape_error::<T>))
            .collect(),
        Some(value) => serde_json::from_value(value.clone())
            .map(|item| vec![item])
            .map_err(shape_error::<T>),
    }
}
