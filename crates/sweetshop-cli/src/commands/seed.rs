//! `sweetshop seed` - load the sample catalog straight into the database.

use sweetshop_core::{NewSweet, Price};
use sweetshop_store::{StoreOptions, SweetStore, open_and_init};

/// (name, category, price in cents, quantity)
pub const SAMPLE_SWEETS: [(&str, &str, i64, u32); 8] = [
    ("Dark Chocolate Truffle", "Chocolate", 250, 50),
    ("Gummy Bears", "Gummies", 120, 100),
    ("Sour Worms", "Gummies", 150, 75),
    ("Mint Hard Candy", "Hard Candy", 80, 200),
    ("Caramel Fudge", "Fudge", 300, 40),
    ("Lollipop Swirl", "Hard Candy", 50, 150),
    ("Peanut Butter Cup", "Chocolate", 180, 60),
    ("Licorice Twists", "Licorice", 200, 80),
];

/// Insert the samples. An inventory that already has sweets is left alone
/// unless `force` is set. Returns the number of sweets inserted.
pub async fn seed(database: &str, force: bool) -> anyhow::Result<usize> {
    let pool = open_and_init(&StoreOptions {
        sqlite_path: database.to_string(),
        ..StoreOptions::default()
    })
    .await?;
    let store = SweetStore::new(pool.clone());

    let existing = store.list().await?.len();
    if existing > 0 && !force {
        println!("Inventory already holds {existing} sweets; pass --force to add the samples anyway.");
        pool.close().await;
        return Ok(0);
    }

    for (name, category, cents, quantity) in SAMPLE_SWEETS {
        let sweet = store
            .create(&NewSweet {
                name: name.to_string(),
                category: category.to_string(),
                price: Price::from_cents(cents)?,
                quantity,
            })
            .await?;
        println!("  + {} ({}) {} × {}", sweet.name, sweet.category, sweet.price, sweet.quantity);
    }
    pool.close().await;

    println!("✔ Added {} sample sweets.", SAMPLE_SWEETS.len());
    Ok(SAMPLE_SWEETS.len())
}
