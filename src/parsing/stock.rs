use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::StockCode;

static SOLD_OUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*-\s*sold\s*out").expect("valid sold out regex"));

/// Removes every `- Sold Out` marker from a size label.
pub fn strip_sold_out(label: &str) -> String {
    SOLD_OUT_RE.replace_all(label, "").into_owned()
}

fn is_sold_out(label: &str) -> bool {
    SOLD_OUT_RE.is_match(label)
}

/// Maps size-select options to stock codes.
///
/// The first option is the "Select size" placeholder and never appears in
/// the result. Labels are kept verbatim apart from marker removal.
pub fn map_stock_status<S: AsRef<str>>(options: &[S]) -> BTreeMap<String, StockCode> {
    options
        .iter()
        .skip(1)
        .map(|option| {
            let option = option.as_ref();
            if is_sold_out(option) {
                (strip_sold_out(option), StockCode::OutOfStock)
            } else {
                (option.to_string(), StockCode::InStock)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_skipped() {
        let status = map_stock_status(&["Select size", "S", "M"]);
        assert_eq!(status.len(), 2);
        assert!(!status.contains_key("Select size"));
    }

    #[test]
    fn sold_out_sizes_are_stripped_and_flagged() {
        let status = map_stock_status(&["Select", "XS - Sold Out", "S", "M -SOLD OUT", "L"]);
        assert_eq!(status.get("XS"), Some(&StockCode::OutOfStock));
        assert_eq!(status.get("M"), Some(&StockCode::OutOfStock));
        assert_eq!(status.get("S"), Some(&StockCode::InStock));
        assert_eq!(status.get("L"), Some(&StockCode::InStock));
        assert!(status.keys().all(|k| !k.to_lowercase().contains("sold")));
    }

    #[test]
    fn labels_are_not_normalized() {
        let status = map_stock_status(&["Select", "One Size", "one size"]);
        assert_eq!(status.len(), 2);
    }

    #[test]
    fn empty_or_placeholder_only_gives_empty_map() {
        assert!(map_stock_status::<&str>(&[]).is_empty());
        assert!(map_stock_status(&["Select size"]).is_empty());
    }

    #[test]
    fn strip_sold_out_leaves_plain_labels_alone() {
        assert_eq!(strip_sold_out("UK 6"), "UK 6");
        assert_eq!(strip_sold_out("38.5 - sold out"), "38.5");
    }
}
