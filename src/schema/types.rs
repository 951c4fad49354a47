// src/schema/types.rs

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A canonical listing field. Declaration order is the canonical column order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum Field {
    #[serde(rename = "ID")]
    Id,
    #[serde(rename = "Address")]
    Address,
    #[serde(rename = "Asking Price")]
    AskingPrice,
    #[serde(rename = "Bathrooms")]
    Bathrooms,
    #[serde(rename = "Bedrooms")]
    Bedrooms,
    #[serde(rename = "DOM")]
    Dom,
    #[serde(rename = "Living Area")]
    LivingArea,
    #[serde(rename = "Garage")]
    Garage,
    #[serde(rename = "Lot Area")]
    LotArea,
    #[serde(rename = "Municipality")]
    Municipality,
    #[serde(rename = "Rooms")]
    Rooms,
    #[serde(rename = "Sold Price")]
    SoldPrice,
    #[serde(rename = "Status")]
    Status,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::Id,
        Field::Address,
        Field::AskingPrice,
        Field::Bathrooms,
        Field::Bedrooms,
        Field::Dom,
        Field::LivingArea,
        Field::Garage,
        Field::LotArea,
        Field::Municipality,
        Field::Rooms,
        Field::SoldPrice,
        Field::Status,
    ];

    /// Fields coerced to numbers by the formatter and averaged by the analytics engine.
    pub const NUMERIC: [Field; 8] = [
        Field::Bathrooms,
        Field::Bedrooms,
        Field::Dom,
        Field::LivingArea,
        Field::Garage,
        Field::LotArea,
        Field::Rooms,
        Field::SoldPrice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Id => "ID",
            Field::Address => "Address",
            Field::AskingPrice => "Asking Price",
            Field::Bathrooms => "Bathrooms",
            Field::Bedrooms => "Bedrooms",
            Field::Dom => "DOM",
            Field::LivingArea => "Living Area",
            Field::Garage => "Garage",
            Field::LotArea => "Lot Area",
            Field::Municipality => "Municipality",
            Field::Rooms => "Rooms",
            Field::SoldPrice => "Sold Price",
            Field::Status => "Status",
        }
    }

    /// Resolve a canonical name. Unknown names are a configuration error.
    pub fn from_name(name: &str) -> Result<Self> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == name.trim())
            .ok_or_else(|| anyhow!("unknown canonical field `{}`", name))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
