use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::cart::CartItem;

/// Which in-progress form a draft belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DraftFlow {
    Booking,
    Checkout,
}

impl DraftFlow {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftFlow::Booking => "booking",
            DraftFlow::Checkout => "checkout",
        }
    }

    /// Tab-scoped storage slot holding this flow's session id.
    pub fn session_key(&self) -> String {
        format!("storefront:{}:session", self.as_str())
    }
}

impl fmt::Display for DraftFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque client-generated id correlating autosaves of one tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Field name to current value for whatever form is being edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct FormSnapshot(Map<String, Value>);

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str).map(str::trim)
    }

    /// Null, blank strings and empty collections count as not filled in.
    pub fn is_filled(&self, field: &str) -> bool {
        match self.get(field) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(Value::Array(values)) => !values.is_empty(),
            Some(Value::Object(map)) => !map.is_empty(),
            Some(Value::Bool(_) | Value::Number(_)) => true,
        }
    }

    /// Copies every field of `other` over this snapshot.
    pub fn merge(&mut self, other: &FormSnapshot) {
        for (field, value) in &other.0 {
            self.0.insert(field.clone(), value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Everything a draft save carries. Each save sends the full snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DraftSnapshot {
    pub form: FormSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart: Option<Vec<CartItem>>,
}

impl DraftSnapshot {
    pub fn form(form: FormSnapshot) -> Self {
        Self { form, cart: None }
    }

    pub fn with_cart(form: FormSnapshot, cart: Vec<CartItem>) -> Self {
        Self {
            form,
            cart: Some(cart),
        }
    }
}
