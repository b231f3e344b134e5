//! Output formatting for shop rankings (table, JSON, markdown, CSV).

use crate::basket::{ShopId, ShopPriceMap, ShopTotal};
use crate::config::OutputFormat;
use serde::Serialize;

/// Flat row shape used for JSON output.
#[derive(Serialize)]
struct RankedRow<'a> {
    shop: &'a str,
    total_items: u32,
    total_price: f64,
}

/// Formats basket results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the ranked list of shops stocking the full basket.
    pub fn format_ranking(&self, ranked: &[(ShopId, ShopTotal)]) -> String {
        if ranked.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No shop stocks the full list.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_ranking(ranked),
            OutputFormat::Table => self.table_ranking(ranked),
            OutputFormat::Markdown => self.markdown_ranking(ranked),
            OutputFormat::Csv => self.csv_ranking(ranked),
        }
    }

    /// Formats one item's per-shop price listing.
    pub fn format_shop_prices(&self, item_key: &str, prices: &ShopPriceMap) -> String {
        if prices.is_empty() {
            return match self.format {
                OutputFormat::Json => "{}".to_string(),
                OutputFormat::Csv => "shop,price".to_string(),
                _ => format!("No shop sells '{}'.", item_key),
            };
        }

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(prices).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => {
                let mut lines = Vec::new();
                lines.push(format!("Prices for {}", item_key));
                lines.push(format!("{:<12}  {:>10}", "Shop", "Price"));
                lines.push(format!("{:-<12}  {:-<10}", "", ""));
                for (shop, price) in by_shop_id(prices) {
                    lines.push(format!("{:<12}  {:>10.2}", shop, price));
                }
                lines.join("\n")
            }
            OutputFormat::Markdown => {
                let mut lines = Vec::new();
                lines.push("| Shop | Price |".to_string());
                lines.push("|------|-------|".to_string());
                for (shop, price) in by_shop_id(prices) {
                    lines.push(format!("| {} | {:.2} |", shop, price));
                }
                lines.join("\n")
            }
            OutputFormat::Csv => {
                let mut lines = vec!["shop,price".to_string()];
                for (shop, price) in by_shop_id(prices) {
                    lines.push(format!("{},{:.2}", csv_escape(shop), price));
                }
                lines.join("\n")
            }
        }
    }

    // JSON formatting

    fn json_ranking(&self, ranked: &[(ShopId, ShopTotal)]) -> String {
        let rows: Vec<RankedRow> = ranked
            .iter()
            .map(|(shop, totals)| RankedRow {
                shop: shop.as_str(),
                total_items: totals.total_items,
                total_price: totals.total_price,
            })
            .collect();

        serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_ranking(&self, ranked: &[(ShopId, ShopTotal)]) -> String {
        let mut lines = Vec::new();

        lines.push(format!("{:<4}  {:<12}  {:>6}  {:>12}", "Rank", "Shop", "Items", "Total"));
        lines.push(format!("{:-<4}  {:-<12}  {:-<6}  {:-<12}", "", "", "", ""));

        for (rank, (shop, totals)) in ranked.iter().enumerate() {
            lines.push(format!(
                "{:<4}  {:<12}  {:>6}  {:>12.2}",
                rank + 1,
                shop,
                totals.total_items,
                totals.total_price
            ));
        }

        lines.push(String::new());
        lines.push(format!("{} shop(s) stock the full list", ranked.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_ranking(&self, ranked: &[(ShopId, ShopTotal)]) -> String {
        let mut lines = Vec::new();

        lines.push("| Rank | Shop | Items | Total |".to_string());
        lines.push("|------|------|-------|-------|".to_string());

        for (rank, (shop, totals)) in ranked.iter().enumerate() {
            lines.push(format!(
                "| {} | {} | {} | {:.2} |",
                rank + 1,
                shop,
                totals.total_items,
                totals.total_price
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} shop(s) stock the full list*", ranked.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "rank,shop,total_items,total_price".to_string()
    }

    fn csv_ranking(&self, ranked: &[(ShopId, ShopTotal)]) -> String {
        let mut lines = vec![self.csv_header()];

        for (rank, (shop, totals)) in ranked.iter().enumerate() {
            lines.push(format!(
                "{},{},{},{:.2}",
                rank + 1,
                csv_escape(shop),
                totals.total_items,
                totals.total_price
            ));
        }

        lines.join("\n")
    }
}

/// Orders a price listing by numeric shop id ascending ("2" before "10"),
/// falling back to string order for non-numeric ids.
fn by_shop_id(prices: &ShopPriceMap) -> Vec<(&str, f64)> {
    let mut entries: Vec<(&str, f64)> =
        prices.iter().map(|(shop, price)| (shop.as_str(), *price)).collect();

    entries.sort_by(|a, b| match (a.0.parse::<u64>(), b.0.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.0.cmp(b.0),
    });

    entries
}

/// Quotes a CSV field when it contains separators or quotes.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
