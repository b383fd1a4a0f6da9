use crate::error::{RouletteError, RouletteResult};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Non-empty list of trimmed, non-blank labels, in wheel order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct WheelItems(Vec<String>);

impl WheelItems {
    /// # Errors
    ///
    /// [`RouletteError::BlankItem`] for an item that is empty once trimmed,
    /// [`RouletteError::EmptyItems`] for an empty list.
    pub fn new<I, T>(items: I) -> RouletteResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut out = Vec::new();
        for (i, item) in items.into_iter().enumerate() {
            let trimmed = item.as_ref().trim();
            if trimmed.is_empty() {
                return Err(RouletteError::BlankItem(i));
            }
            out.push(trimmed.to_string());
        }
        if out.is_empty() {
            return Err(RouletteError::EmptyItems);
        }
        Ok(Self(out))
    }

    /// Comma-separated labels; blank fragments are dropped rather than
    /// rejected.
    pub fn parse_csv(raw: &str) -> RouletteResult<Self> {
        Self::new(raw.split(',').map(str::trim).filter(|s| !s.is_empty()))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Default for WheelItems {
    fn default() -> Self {
        Self((1..=6).map(|i| format!("Item {i}")).collect())
    }
}

impl Deref for WheelItems {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl TryFrom<Vec<String>> for WheelItems {
    type Error = RouletteError;

    fn try_from(items: Vec<String>) -> RouletteResult<Self> {
        Self::new(items)
    }
}

impl From<WheelItems> for Vec<String> {
    fn from(items: WheelItems) -> Self {
        items.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_keeps_order() {
        let items = WheelItems::new(["  A", "B ", "C"]).unwrap();
        assert_eq!(items.as_slice(), ["A", "B", "C"]);
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn rejects_blank_and_empty() {
        assert_eq!(WheelItems::new(["A", "  "]), Err(RouletteError::BlankItem(1)));
        assert_eq!(WheelItems::new(Vec::<String>::new()), Err(RouletteError::EmptyItems));
    }

    #[test]
    fn csv_drops_empty_fragments() {
        let items = WheelItems::parse_csv("pizza, sushi,, ,tacos").unwrap();
        assert_eq!(items.as_slice(), ["pizza", "sushi", "tacos"]);
        assert_eq!(WheelItems::parse_csv(" , ,"), Err(RouletteError::EmptyItems));
    }

    #[test]
    fn default_has_six_items() {
        let items = WheelItems::default();
        assert_eq!(items.len(), 6);
        assert_eq!(items[0], "Item 1");
    }

    #[test]
    fn json_round_trip_validates() {
        let items: WheelItems = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(items.len(), 2);
        assert!(serde_json::from_str::<WheelItems>("[]").is_err());
    }
}
