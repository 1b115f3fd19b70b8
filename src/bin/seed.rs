use chrono::Utc;
use fashion_storefront::{
    catalog::FilterSpec,
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    seed::{demo_banners, demo_products},
    store::{BannerStore, PgStore, ProductStore, RecordStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(config.require_database_url()?).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;
    let store = PgStore::new(orm);

    seed_products(&store).await?;
    seed_banners(&store).await?;

    println!("Seed completed");
    Ok(())
}

async fn seed_products(store: &dyn RecordStore) -> anyhow::Result<()> {
    if !store.list_products(&FilterSpec::new()).await?.is_empty() {
        println!("Catalog already has products, skipping");
        return Ok(());
    }

    let mut count = 0;
    for product in demo_products() {
        let product = store.insert_product(product).await?;
        println!("Seeded product {} ({})", product.id, product.name);
        count += 1;
    }
    println!("Seeded {count} products");
    Ok(())
}

async fn seed_banners(store: &dyn RecordStore) -> anyhow::Result<()> {
    if !store.list_active_banners().await?.is_empty() {
        println!("Active banners present, skipping");
        return Ok(());
    }

    for banner in demo_banners(Utc::now()) {
        let banner = store.insert_banner(banner).await?;
        println!("Seeded banner {} ({})", banner.id, banner.title);
    }
    Ok(())
}
