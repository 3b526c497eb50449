//! # Item output
//!
//! Scraped items are written as one pretty-printed JSON array (`items.json`).
//! Order carries no meaning.
//!
//! The partitioner reads that file back and writes the names of each type
//! into its own list (`clothes.json`, `shoes.json`, `accs.json`, ...), so the
//! classifier's decisions can be reviewed by eye. Items whose type could not
//! be settled are logged instead.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::models::{Item, ItemType};

/// Writes scraped items to a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn write_items(&self, items: &[Item]) -> Result<()> {
        let body = serde_json::to_vec_pretty(items)?;
        tokio::fs::write(&self.path, body)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        info!("Wrote {} items to {}", items.len(), self.path.display());
        Ok(())
    }
}

pub async fn read_items(path: &Path) -> Result<Vec<Item>> {
    let body = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&body).with_context(|| format!("Invalid item file {}", path.display()))
}

/// Item names grouped by type
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Partition {
    pub by_type: BTreeMap<ItemType, Vec<String>>,
    /// Codes of items without a type
    pub unresolved: Vec<String>,
}

pub fn partition_items(items: &[Item]) -> Partition {
    let mut partition = Partition::default();
    for item in items {
        match item.item_type {
            Some(item_type) => partition
                .by_type
                .entry(item_type)
                .or_default()
                .push(item.name.clone()),
            None => {
                warn!(
                    "Unresolved type for {} ({}), sizes: {:?}",
                    item.code,
                    item.name,
                    item.stock_status.keys().collect::<Vec<_>>()
                );
                partition.unresolved.push(item.code.clone());
            }
        }
    }
    partition
}

/// Splits an item file into one name list per type inside `out_dir`.
pub async fn write_partition(items_path: &Path, out_dir: &Path) -> Result<Partition> {
    let items = read_items(items_path).await?;
    let partition = partition_items(&items);

    for item_type in ItemType::ALL {
        let names = partition.by_type.get(&item_type).cloned().unwrap_or_default();
        let path = out_dir.join(item_type.partition_file_name());
        tokio::fs::write(&path, serde_json::to_vec(&names)?)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("{}: {} items -> {}", item_type, names.len(), path.display());
    }

    info!("{} items with unresolved type", partition.unresolved.len());
    Ok(partition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, StockCode};
    use rust_decimal::Decimal;

    fn item(code: &str, item_type: Option<ItemType>) -> Item {
        Item {
            code: code.to_string(),
            name: code.replace('-', " "),
            description: String::new(),
            designer: "Designer".to_string(),
            gender: Gender::Female,
            raw_color: None,
            color: None,
            image_urls: Vec::new(),
            link: format!("http://www.oxygenboutique.com/{code}.aspx"),
            usd_price: Decimal::new(10000, 2),
            sale_discount: Decimal::ZERO,
            stock_status: BTreeMap::from([("8".to_string(), StockCode::InStock)]),
            item_type,
        }
    }

    #[test]
    fn partition_groups_names_by_type() {
        let items = vec![
            item("Silk-Dress", Some(ItemType::Apparel)),
            item("Suede-Slide", Some(ItemType::Shoes)),
            item("Wool-Coat", Some(ItemType::Apparel)),
            item("Mystery", None),
        ];
        let partition = partition_items(&items);

        assert_eq!(
            partition.by_type.get(&ItemType::Apparel),
            Some(&vec!["Silk Dress".to_string(), "Wool Coat".to_string()])
        );
        assert_eq!(
            partition.by_type.get(&ItemType::Shoes),
            Some(&vec!["Suede Slide".to_string()])
        );
        assert_eq!(partition.unresolved, vec!["Mystery".to_string()]);
    }

    #[tokio::test]
    async fn sink_output_feeds_partition_files() {
        let dir = tempfile::tempdir().unwrap();
        let items_path = dir.path().join("items.json");
        let sink = JsonFileSink::new(&items_path);

        sink.write_items(&[
            item("Silk-Dress", Some(ItemType::Apparel)),
            item("Beanie", Some(ItemType::Accessories)),
        ])
        .await
        .unwrap();

        write_partition(&items_path, dir.path()).await.unwrap();

        let accs: Vec<String> =
            serde_json::from_slice(&std::fs::read(dir.path().join("accs.json")).unwrap()).unwrap();
        let shoes: Vec<String> =
            serde_json::from_slice(&std::fs::read(dir.path().join("shoes.json")).unwrap()).unwrap();
        assert_eq!(accs, vec!["Beanie".to_string()]);
        assert!(shoes.is_empty());
    }

    #[tokio::test]
    async fn missing_item_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_items(&dir.path().join("absent.json")).await.is_err());
    }
}
