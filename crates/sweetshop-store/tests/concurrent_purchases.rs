//! Purchases racing on the same row through a multi-connection pool.

use sweetshop_core::{NewSweet, Price};
use sweetshop_store::{StoreError, StoreOptions, SweetStore, open_and_init};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_purchases_never_oversell() {
    let dir = tempfile::tempdir().unwrap();
    let options = StoreOptions {
        sqlite_path: dir.path().join("shop.sqlite").to_string_lossy().into_owned(),
        max_connections: 8,
        ..StoreOptions::default()
    };
    let pool = open_and_init(&options).await.unwrap();
    let store = SweetStore::new(pool.clone());

    let sweet = store
        .create(&NewSweet {
            name: "Caramel Fudge".into(),
            category: "Fudge".into(),
            price: Price::from_cents(300).unwrap(),
            quantity: 10,
        })
        .await
        .unwrap();

    let handles: Vec<_> = (0..25)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.purchase(sweet.id, 1).await })
        })
        .collect();

    let mut sold = 0;
    let mut refused = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => sold += 1,
            Err(StoreError::InsufficientStock { .. }) => refused += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(sold, 10);
    assert_eq!(refused, 15);
    assert_eq!(store.get(sweet.id).await.unwrap().quantity, 0);
    pool.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_purchases_and_restocks_balance() {
    let dir = tempfile::tempdir().unwrap();
    let options = StoreOptions {
        sqlite_path: dir.path().join("shop.sqlite").to_string_lossy().into_owned(),
        max_connections: 8,
        ..StoreOptions::default()
    };
    let pool = open_and_init(&options).await.unwrap();
    let store = SweetStore::new(pool.clone());

    let sweet = store
        .create(&NewSweet {
            name: "Licorice Twists".into(),
            category: "Licorice".into(),
            price: Price::from_cents(200).unwrap(),
            quantity: 100,
        })
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..40 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                store.purchase(sweet.id, 2).await.map(|_| ())
            } else {
                store.restock(sweet.id, 1).await.map(|_| ())
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // 20 purchases of 2 and 20 restocks of 1.
    assert_eq!(store.get(sweet.id).await.unwrap().quantity, 100 - 40 + 20);
    pool.close().await;
}
