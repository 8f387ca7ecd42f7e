use chrono::Utc;
use cryptoiq_core::common::Tier;
use cryptoiq_core::store::error::StoreError;
use cryptoiq_core::store::port::{
    HoldingDraft, PaymentRecord, PaymentStore, PortfolioStore, ProfileStore,
};
use cryptoiq_store::db;
use cryptoiq_store::payment::SqlitePaymentStore;
use cryptoiq_store::portfolio::SqlitePortfolioStore;
use cryptoiq_store::profile::SqliteProfileStore;
use rust_decimal_macros::dec;
use tempfile::tempdir;

fn payment(reference: &str, user_id: &str) -> PaymentRecord {
    PaymentRecord {
        reference: reference.to_string(),
        user_id: user_id.to_string(),
        status: "success".to_string(),
        amount: 500_000,
        currency: "NGN".to_string(),
        channel: "card".to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_profile_lifecycle() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let pool = db::connect(tmp.path()).await?;
    let profiles = SqliteProfileStore::new(pool.clone());
    let payments = SqlitePaymentStore::new(pool);

    // 首次确保档案：默认 free
    let created = profiles.ensure_profile("u1", "alice@example.com").await?;
    assert_eq!(created.role, Tier::Free);

    // 升级后再次 ensure 不会降级，只同步邮箱
    payments.apply_premium_payment(&payment("ref_u1", "u1")).await?;
    let again = profiles.ensure_profile("u1", "alice@new.example.com").await?;
    assert_eq!(again.role, Tier::Premium);
    assert_eq!(again.email, "alice@new.example.com");

    // 邮箱反查忽略大小写
    let found = profiles.find_by_email("ALICE@NEW.example.com").await?;
    assert_eq!(found.map(|p| p.id), Some("u1".to_string()));
    assert!(profiles.find_by_email("nobody@example.com").await?.is_none());
    assert!(profiles.get_profile("ghost").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_holdings_are_scoped_to_owner() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let pool = db::connect(tmp.path()).await?;
    let store = SqlitePortfolioStore::new(pool);

    let btc = store
        .insert_holding(
            "alice",
            &HoldingDraft {
                coin: "BTC".to_string(),
                amount: dec!(0.5),
                buy_price: dec!(30000.25),
            },
        )
        .await?;
    store
        .insert_holding(
            "bob",
            &HoldingDraft {
                coin: "ETH".to_string(),
                amount: dec!(2),
                buy_price: dec!(1800),
            },
        )
        .await?;

    // 金额以 TEXT 保存后无损还原
    let alice = store.list_holdings("alice").await?;
    assert_eq!(alice.len(), 1);
    assert_eq!(alice[0].amount, dec!(0.5));
    assert_eq!(alice[0].buy_price, dec!(30000.25));

    // bob 无法修改或删除 alice 的记录
    let hijack = HoldingDraft {
        coin: "DOGE".to_string(),
        amount: dec!(1),
        buy_price: dec!(1),
    };
    assert!(matches!(
        store.update_holding("bob", &btc.id, &hijack).await,
        Err(StoreError::NotFound)
    ));
    assert!(matches!(
        store.delete_holding("bob", &btc.id).await,
        Err(StoreError::NotFound)
    ));

    // alice 自己整体更新
    let updated = store
        .update_holding(
            "alice",
            &btc.id,
            &HoldingDraft {
                coin: "BTC".to_string(),
                amount: dec!(1.25),
                buy_price: dec!(28000),
            },
        )
        .await?;
    assert_eq!(updated.amount, dec!(1.25));
    assert_eq!(updated.created_at, btc.created_at);

    store.delete_holding("alice", &btc.id).await?;
    assert!(store.list_holdings("alice").await?.is_empty());
    assert_eq!(store.list_holdings("bob").await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_premium_payment_applies_once_per_reference() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let pool = db::connect(tmp.path()).await?;
    let profiles = SqliteProfileStore::new(pool.clone());
    let payments = SqlitePaymentStore::new(pool.clone());

    profiles.ensure_profile("u1", "u1@example.com").await?;
    assert!(payments.get_payment("ref_1").await?.is_none());

    assert!(payments.apply_premium_payment(&payment("ref_1", "u1")).await?);
    assert_eq!(
        profiles.get_profile("u1").await?.map(|p| p.role),
        Some(Tier::Premium)
    );

    // 人为降级后重放同一参考号，不会再次升级
    sqlx::query("UPDATE profiles SET role = 'free' WHERE id = 'u1'")
        .execute(&pool)
        .await?;
    assert!(!payments.apply_premium_payment(&payment("ref_1", "u1")).await?);
    assert_eq!(
        profiles.get_profile("u1").await?.map(|p| p.role),
        Some(Tier::Free)
    );

    let stored = payments.get_payment("ref_1").await?.expect("payment stored");
    assert_eq!(stored.user_id, "u1");
    assert_eq!(stored.amount, 500_000);
    Ok(())
}

#[tokio::test]
async fn test_payment_for_unknown_user_rolls_back() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let pool = db::connect(tmp.path()).await?;
    let payments = SqlitePaymentStore::new(pool);

    assert!(matches!(
        payments.apply_premium_payment(&payment("ref_ghost", "ghost")).await,
        Err(StoreError::NotFound)
    ));
    // 回滚后流水不存在
    assert!(payments.get_payment("ref_ghost").await?.is_none());
    Ok(())
}
