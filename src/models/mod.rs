//! Data models for normalized boutique items

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product scraped from a single item page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub code: String,
    pub name: String,
    pub description: String,
    pub designer: String,
    pub gender: Gender,
    pub raw_color: Option<String>,
    pub color: Option<String>,
    pub image_urls: Vec<String>,
    pub link: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub usd_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub sale_discount: Decimal,
    pub stock_status: BTreeMap<String, StockCode>,
    #[serde(rename = "type")]
    pub item_type: Option<ItemType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
}

/// Garment category code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemType {
    #[serde(rename = "A")]
    Apparel,
    #[serde(rename = "S")]
    Shoes,
    #[serde(rename = "B")]
    Bags,
    #[serde(rename = "J")]
    Jewelry,
    #[serde(rename = "R")]
    Accessories,
}

impl ItemType {
    pub const ALL: [Self; 5] = [
        Self::Apparel,
        Self::Shoes,
        Self::Bags,
        Self::Jewelry,
        Self::Accessories,
    ];

    /// File the partitioner writes names of this type into
    pub fn partition_file_name(self) -> &'static str {
        match self {
            Self::Apparel => "clothes.json",
            Self::Shoes => "shoes.json",
            Self::Bags => "bags.json",
            Self::Jewelry => "jewelry.json",
            Self::Accessories => "accs.json",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::Apparel => "A",
            Self::Shoes => "S",
            Self::Bags => "B",
            Self::Jewelry => "J",
            Self::Accessories => "R",
        };
        f.write_str(code)
    }
}

/// Stock status of one size, serialized as its numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum StockCode {
    OutOfStock,
    InStock,
}

impl From<StockCode> for u8 {
    fn from(code: StockCode) -> Self {
        match code {
            StockCode::OutOfStock => 1,
            StockCode::InStock => 3,
        }
    }
}

impl TryFrom<u8> for StockCode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::OutOfStock),
            3 => Ok(Self::InStock),
            other => Err(format!("unknown stock code {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> Item {
        Item {
            code: "Ribbon-Landscape-Sweatshirt".to_string(),
            name: "Ribbon Landscape Sweatshirt".to_string(),
            description: "Ribbon landscape sweatshirt by clover canyon.".to_string(),
            designer: "Clover Canyon".to_string(),
            gender: Gender::Female,
            raw_color: None,
            color: None,
            image_urls: vec!["http://www.oxygenboutique.com/GetImage/a.jpg".to_string()],
            link: "http://www.oxygenboutique.com/Ribbon-Landscape-Sweatshirt.aspx".to_string(),
            usd_price: Decimal::new(43091, 2),
            sale_discount: Decimal::new(30, 2),
            stock_status: BTreeMap::from([
                ("L".to_string(), StockCode::InStock),
                ("XS".to_string(), StockCode::OutOfStock),
            ]),
            item_type: Some(ItemType::Apparel),
        }
    }

    #[test]
    fn item_serializes_with_letter_codes_and_numeric_stock() {
        let json = serde_json::to_value(sample_item()).unwrap();

        assert_eq!(json["gender"], "F");
        assert_eq!(json["type"], "A");
        assert_eq!(json["usd_price"], "430.91");
        assert_eq!(json["sale_discount"], 0.3);
        assert_eq!(json["stock_status"]["XS"], 1);
        assert_eq!(json["stock_status"]["L"], 3);
        assert!(json["color"].is_null());
        assert!(json["raw_color"].is_null());
    }

    #[test]
    fn unknown_stock_code_is_rejected() {
        let result: Result<StockCode, _> = serde_json::from_str("2");
        assert!(result.is_err());
    }

    #[test]
    fn unresolved_type_serializes_as_null() {
        let mut item = sample_item();
        item.item_type = None;
        let json = serde_json::to_value(item).unwrap();
        assert!(json["type"].is_null());
    }
}
