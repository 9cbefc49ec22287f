use std::fmt::{self, Display};
use std::str::FromStr;

use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

/// Store-assigned surrogate key of a [`Promotion`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct PromotionId(pub i64);

impl Display for PromotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<PromotionId> for Bson {
    fn from(id: PromotionId) -> Bson {
        Bson::Int64(id.0)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Promotype {
    BuyOneGetOneFree,
    Get20PercentOff,
    #[default]
    Unknown,
}

impl Promotype {
    pub const ALL: [Promotype; 3] = [
        Promotype::BuyOneGetOneFree,
        Promotype::Get20PercentOff,
        Promotype::Unknown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Promotype::BuyOneGetOneFree => "BUYONEGETONEFREE",
            Promotype::Get20PercentOff => "GET20PERCENTOFF",
            Promotype::Unknown => "UNKNOWN",
        }
    }
}

impl Display for Promotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Promotype {
    type Err = Error;

    fn from_str(s: &str) -> Result<Promotype, Error> {
        Promotype::ALL
            .iter()
            .copied()
            .find(|promotype| promotype.name() == s)
            .ok_or_else(|| Error::validation(format!("Invalid attribute: promotype {}", s)))
    }
}

/// A promotion as it lives in the store.
///
/// `id` is `None` until the store assigns one on insert, and `name` is `None`
/// until the promotion has been populated from a request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Promotion {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<PromotionId>,
    pub name: Option<String>,
    pub category: String,
    pub available: bool,
    pub promotype: Promotype,
}

impl Promotion {
    pub fn new() -> Promotion {
        Promotion::default()
    }

    /// Fills this promotion from an untyped json object, leaving `id` alone.
    ///
    /// `name` and `category` are required strings. `available` must be a real
    /// boolean and defaults to `false`. `promotype` must be the exact name of a
    /// [`Promotype`] and defaults to `UNKNOWN`. Nothing is modified on failure.
    pub fn populate(&mut self, data: &Value) -> Result<&mut Promotion, Error> {
        let data = data.as_object().ok_or_else(|| {
            Error::validation("Invalid promotion: body of request contained bad or no data")
        })?;

        let name = required_string(data, "name")?;
        if name.is_empty() {
            return Err(Error::validation("Invalid promotion: name must not be empty"));
        }
        let category = required_string(data, "category")?;

        let available = match data.get("available") {
            None => false,
            Some(Value::Bool(available)) => *available,
            Some(other) => {
                return Err(Error::validation(format!(
                    "Invalid type for boolean [available]: {}",
                    json_type(other)
                )))
            }
        };

        let promotype = match data.get("promotype") {
            None => Promotype::Unknown,
            Some(Value::String(promotype)) => promotype.parse()?,
            Some(other) => {
                return Err(Error::validation(format!(
                    "Invalid type for [promotype]: {}",
                    json_type(other)
                )))
            }
        };

        self.name = Some(name.to_owned());
        self.category = category.to_owned();
        self.available = available;
        self.promotype = promotype;

        Ok(self)
    }
}

impl Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("<unnamed>");
        match self.id {
            Some(id) => write!(f, "<Promotion {} id=[{}]>", name, id),
            None => write!(f, "<Promotion {} id=[None]>", name),
        }
    }
}

fn required_string<'a>(data: &'a Map<String, Value>, key: &str) -> Result<&'a str, Error> {
    match data.get(key) {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(Error::validation(format!(
            "Invalid type for [{}]: {}",
            key,
            json_type(other)
        ))),
        None => Err(Error::validation(format!(
            "Invalid promotion: missing {}",
            key
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
