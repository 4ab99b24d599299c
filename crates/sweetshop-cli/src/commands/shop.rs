//! Catalog commands: browsing for everyone, editing for admins.

use super::ClientContext;
use anyhow::Context;
use sweetshop_client::{Filters, SweetApi, SweetCatalog};
use sweetshop_core::api_types::CreateSweetRequest;
use sweetshop_core::{Price, Sweet, SweetId, SweetPatch};

pub async fn list(ctx: &ClientContext) -> anyhow::Result<()> {
    search(ctx, Filters::default()).await
}

pub async fn search(ctx: &ClientContext, filters: Filters) -> anyhow::Result<()> {
    let mut catalog = SweetCatalog::new(ctx.authenticated()?);
    catalog.set_filters(filters);
    let sweets = catalog.refresh().await?;
    print_sweets(ctx, sweets)
}

pub async fn show(ctx: &ClientContext, id: SweetId) -> anyhow::Result<()> {
    let sweet = ctx.authenticated()?.get(id).await?;
    print_sweets(ctx, std::slice::from_ref(&sweet))
}

pub async fn buy(ctx: &ClientContext, id: SweetId, quantity: u32) -> anyhow::Result<()> {
    let sweet = ctx.authenticated()?.purchase(id, quantity).await?;
    let total = sweet
        .price
        .times(quantity)
        .context("total price is out of range")?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&sweet)?);
    } else {
        println!("{}", purchase_summary(&sweet, quantity, total));
    }
    Ok(())
}

pub async fn add(ctx: &ClientContext, request: CreateSweetRequest) -> anyhow::Result<()> {
    let sweet = ctx.authenticated()?.create(&request).await?;
    println!("✔ Added sweet #{}", sweet.id);
    print_sweets(ctx, std::slice::from_ref(&sweet))
}

pub async fn edit(ctx: &ClientContext, id: SweetId, patch: SweetPatch) -> anyhow::Result<()> {
    if patch.is_empty() {
        anyhow::bail!("nothing to change; pass at least one of --name, --category, --price, --quantity");
    }
    let sweet = ctx.authenticated()?.update(id, &patch).await?;
    println!("✔ Updated sweet #{}", sweet.id);
    print_sweets(ctx, std::slice::from_ref(&sweet))
}

pub async fn remove(ctx: &ClientContext, id: SweetId) -> anyhow::Result<()> {
    ctx.authenticated()?.delete(id).await?;
    println!("✔ Removed sweet #{id}");
    Ok(())
}

pub async fn restock(ctx: &ClientContext, id: SweetId, quantity: u32) -> anyhow::Result<()> {
    let sweet = ctx.authenticated()?.restock(id, quantity).await?;
    println!("✔ Restocked {} by {}; {} in stock", sweet.name, quantity, sweet.quantity);
    Ok(())
}

fn print_sweets(ctx: &ClientContext, sweets: &[Sweet]) -> anyhow::Result<()> {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(sweets)?);
    } else {
        print!("{}", render_table(sweets));
    }
    Ok(())
}

pub fn purchase_summary(sweet: &Sweet, quantity: u32, total: Price) -> String {
    format!(
        "✔ Bought {} × {} for {} ({} left)",
        quantity, sweet.name, total, sweet.quantity
    )
}

/// Fixed-width table of sweets.
pub fn render_table(sweets: &[Sweet]) -> String {
    if sweets.is_empty() {
        return "No sweets found.\n".to_string();
    }

    let width = |values: &mut dyn Iterator<Item = usize>, header: &str| {
        values.max().unwrap_or(0).max(header.chars().count())
    };
    let name_w = width(&mut sweets.iter().map(|s| s.name.chars().count()), "NAME");
    let cat_w = width(&mut sweets.iter().map(|s| s.category.chars().count()), "CATEGORY");

    let mut out = format!(
        "{:>4}  {:<name_w$}  {:<cat_w$}  {:>8}  {:>6}\n",
        "ID", "NAME", "CATEGORY", "PRICE", "STOCK"
    );
    for sweet in sweets {
        let stock = if sweet.quantity == 0 {
            "out".to_string()
        } else {
            sweet.quantity.to_string()
        };
        out.push_str(&format!(
            "{:>4}  {:<name_w$}  {:<cat_w$}  {:>8}  {:>6}\n",
            sweet.id,
            sweet.name,
            sweet.category,
            sweet.price.to_string(),
            stock
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweet(id: SweetId, name: &str, category: &str, cents: i64, quantity: u32) -> Sweet {
        Sweet {
            id,
            name: name.into(),
            category: category.into(),
            price: Price::from_cents(cents).unwrap(),
            quantity,
        }
    }

    #[test]
    fn table_aligns_columns() {
        let table = render_table(&[
            sweet(1, "Dark Chocolate Truffle", "Chocolate", 250, 50),
            sweet(12, "Lollipop Swirl", "Hard Candy", 50, 0),
        ]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("  ID  NAME"));
        assert!(lines[1].contains("Dark Chocolate Truffle  Chocolate"));
        assert!(lines[1].ends_with("2.50      50"));
        assert!(lines[2].ends_with("0.50     out"));
        assert!(lines.iter().all(|l| l.chars().count() == lines[0].chars().count()));
    }

    #[test]
    fn empty_table() {
        assert_eq!(render_table(&[]), "No sweets found.\n");
    }

    #[test]
    fn purchase_summary_shows_total() {
        let fudge = sweet(5, "Caramel Fudge", "Fudge", 300, 37);
        let total = fudge.price.times(3).unwrap();
        assert_eq!(
            purchase_summary(&fudge, 3, total),
            "✔ Bought 3 × Caramel Fudge for 9.00 (37 left)"
        );
    }
}
