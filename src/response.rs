//! Standard response envelope: `{"success": true, "<key>": payload}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Success envelope carrying one payload under a resource key (`merchant`, `items`, ...).
pub struct Success<T> {
    key: &'static str,
    payload: T,
}

impl<T> Success<T> {
    pub fn new(key: &'static str, payload: T) -> Self {
        Success { key, payload }
    }
}

impl<T: Serialize> Serialize for Success<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("success", &true)?;
        map.serialize_entry(self.key, &self.payload)?;
        map.end()
    }
}

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub fn success<T: Serialize>(key: &'static str, payload: T) -> Success<T> {
    Success::new(key, payload)
}
