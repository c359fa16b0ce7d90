//! Rate tables and their JSON file store.
//!
//! The store is deliberately simple: the whole document is read on load and
//! replaced on save. Concurrent writers race and the last rename wins.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, check_amount};

pub const DEFAULT_RATE_FILE: &str = "rates.json";

/// A JSON document kept in a single file.
#[derive(Debug, Clone)]
pub struct RateStore<T> {
    path: PathBuf,
    _doc: PhantomData<fn() -> T>,
}

impl<T> RateStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _doc: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document, falling back to `T::default()` when the file
    /// does not exist yet. A file that exists but cannot be read or parsed
    /// is an error.
    pub fn load_or_default(&self) -> Result<T> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %self.path.display(), "rate file not found, using defaults");
                Ok(T::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the document to a sibling temp file and renames it over the
    /// target, so readers never see a partial file.
    pub fn save(&self, doc: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(doc)?;
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        tracing::info!(path = %self.path.display(), "saved rate file");
        Ok(())
    }
}

/// Visiting card prices: finish -> quantity -> price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardRates(BTreeMap<String, BTreeMap<u32, f64>>);

impl Default for CardRates {
    fn default() -> Self {
        let table = [
            ("Gloss", 400.0, 700.0),
            ("Matte", 450.0, 800.0),
            ("Synthetic", 700.0, 1200.0),
            ("Normal", 300.0, 500.0),
        ];
        Self(
            table
                .into_iter()
                .map(|(finish, p500, p1000)| {
                    (finish.to_string(), BTreeMap::from([(500, p500), (1000, p1000)]))
                })
                .collect(),
        )
    }
}

impl CardRates {
    pub fn finishes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn quantities(&self, finish: &str) -> Result<Vec<u32>> {
        let (_, prices) = self.find(finish)?;
        Ok(prices.keys().copied().collect())
    }

    /// Price for `quantity` cards. Finish names match case-insensitively.
    pub fn base_rate(&self, finish: &str, quantity: u32) -> Result<f64> {
        let (name, prices) = self.find(finish)?;
        prices
            .get(&quantity)
            .copied()
            .ok_or_else(|| Error::UnknownQuantity {
                finish: name.to_string(),
                quantity,
            })
    }

    /// Sets a price, adding the finish or quantity if it is new.
    pub fn set_rate(&mut self, finish: &str, quantity: u32, price: f64) -> Result<()> {
        let price = check_amount(price)?;
        let key = match self.find(finish) {
            Ok((name, _)) => name.to_string(),
            Err(_) => finish.trim().to_string(),
        };
        if key.is_empty() {
            return Err(self.unknown_finish(finish));
        }
        self.0.entry(key).or_default().insert(quantity, price);
        Ok(())
    }

    fn find(&self, finish: &str) -> Result<(&str, &BTreeMap<u32, f64>)> {
        let finish = finish.trim();
        self.0
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(finish))
            .map(|(name, prices)| (name.as_str(), prices))
            .ok_or_else(|| self.unknown_finish(finish))
    }

    fn unknown_finish(&self, finish: &str) -> Error {
        Error::UnknownFinish {
            finish: finish.trim().to_string(),
            known: self.finishes().collect::<Vec<_>>().join(", "),
        }
    }
}

/// Flex banner prices per square foot, by material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlexRates(BTreeMap<String, f64>);

impl Default for FlexRates {
    fn default() -> Self {
        Self(
            [("Normal", 12.0), ("Star", 18.0), ("Blackout", 24.0), ("Vinyl", 35.0)]
                .into_iter()
                .map(|(kind, rate)| (kind.to_string(), rate))
                .collect(),
        )
    }
}

impl FlexRates {
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn rate(&self, kind: &str) -> Result<f64> {
        let kind = kind.trim();
        self.0
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(kind))
            .map(|(_, rate)| *rate)
            .ok_or_else(|| self.unknown_kind(kind))
    }

    pub fn set_rate(&mut self, kind: &str, rate: f64) -> Result<()> {
        let rate = check_amount(rate)?;
        let kind = kind.trim();
        if kind.is_empty() {
            return Err(self.unknown_kind(kind));
        }
        let key = self
            .0
            .keys()
            .find(|name| name.eq_ignore_ascii_case(kind))
            .cloned()
            .unwrap_or_else(|| kind.to_string());
        self.0.insert(key, rate);
        Ok(())
    }

    fn unknown_kind(&self, kind: &str) -> Error {
        Error::UnknownFlexType {
            kind: kind.trim().to_string(),
            known: self.kinds().collect::<Vec<_>>().join(", "),
        }
    }
}

/// Everything the shop keeps in its rate file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct RateBook {
    pub cards: CardRates,
    pub flex: FlexRates,
}

#[derive(Deserialize)]
struct RateBookFields {
    cards: CardRates,
    #[serde(default)]
    flex: FlexRates,
}

// Older files hold only the card table at the top level.
impl TryFrom<serde_json::Value> for RateBook {
    type Error = serde_json::Error;

    fn try_from(value: serde_json::Value) -> std::result::Result<Self, Self::Error> {
        if value.get("cards").is_some_and(serde_json::Value::is_object) {
            let RateBookFields { cards, flex } = serde_json::from_value(value)?;
            Ok(RateBook { cards, flex })
        } else {
            Ok(RateBook {
                cards: serde_json::from_value(value)?,
                flex: FlexRates::default(),
            })
        }
    }
}
