// src/schema/profile.rs

use anyhow::{bail, Context, Result};
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};
use tracing::{debug, info};

use super::Field;

/// Canonical field → external column name, as exported by Centris.
const DEFAULT_MAPPING: [(Field, &str); 13] = [
    (Field::Id, "Centris No."),
    (Field::Address, "Address"),
    (Field::AskingPrice, "Asked/Sold Price"),
    (Field::Bathrooms, "Bathrooms (number)"),
    (Field::Bedrooms, "Bedrooms (number)"),
    (Field::Dom, "DOM"),
    (Field::LivingArea, "Living Area (Imperial)"),
    (Field::Garage, "Garage (number)"),
    (Field::LotArea, "Lot Area (Imperial)"),
    (Field::Municipality, "Mun./Bor."),
    (Field::Rooms, "Rms"),
    (Field::SoldPrice, "Sold / Rented Price"),
    (Field::Status, "ST"),
];

/// Immutable mapping from canonical fields to the external column names
/// expected to hold them. Fields without an entry are never located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    mapping: BTreeMap<Field, String>,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self {
            mapping: DEFAULT_MAPPING
                .iter()
                .map(|(f, ext)| (*f, ext.to_string()))
                .collect(),
        }
    }
}

impl FieldSpec {
    /// Build a spec from `(field, external name)` pairs, rejecting blank or
    /// shared external names.
    pub fn new<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Field, S)>,
        S: Into<String>,
    {
        let mut mapping = BTreeMap::new();
        let mut owners: HashMap<String, Field> = HashMap::new();

        for (field, external) in pairs {
            let external = external.into();
            if external.trim().is_empty() {
                bail!("field `{}` maps to a blank external column", field);
            }
            if let Some(prev) = owners.insert(external.clone(), field) {
                if prev != field {
                    bail!(
                        "external column `{}` is claimed by both `{}` and `{}`",
                        external,
                        prev,
                        field
                    );
                }
            }
            mapping.insert(field, external);
        }

        Ok(Self { mapping })
    }

    /// External column name configured for `field`, if any.
    pub fn external_name(&self, field: Field) -> Option<&str> {
        self.mapping.get(&field).map(String::as_str)
    }

    /// Configured pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.mapping.iter().map(|(f, ext)| (*f, ext.as_str()))
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Parse a YAML profile: a map of canonical name → external name (or null).
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let raw: BTreeMap<String, Option<String>> =
            serde_yaml::from_str(text).context("parsing YAML field profile")?;
        Self::from_raw(raw)
    }

    /// Parse a JSON profile with the same shape as the YAML one.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: BTreeMap<String, Option<String>> =
            serde_json::from_str(text).context("parsing JSON field profile")?;
        Self::from_raw(raw)
    }

    /// Load a profile from disk; `.yaml`/`.yml` is read as YAML, anything else as JSON.
    #[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading field profile {:?}", path))?;

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        let spec = if is_yaml {
            Self::from_yaml_str(&text)
        } else {
            Self::from_json_str(&text)
        }
        .with_context(|| format!("loading field profile {:?}", path))?;

        info!(mapped = spec.len(), "field profile loaded");
        Ok(spec)
    }

    fn from_raw(raw: BTreeMap<String, Option<String>>) -> Result<Self> {
        let mut pairs = Vec::with_capacity(raw.len());
        for (name, external) in raw {
            let field = Field::from_name(&name)?;
            match external {
                Some(ext) => pairs.push((field, ext)),
                None => debug!(field = %field, "field left unmapped by profile"),
            }
        }
        Self::new(pairs)
    }
}
