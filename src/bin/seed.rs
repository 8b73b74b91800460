use halotekno_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    services::auth_service::hash_password,
};
use sqlx::PgPool;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;
    let pool = orm.get_postgres_connection_pool();

    let super_admin_id =
        ensure_user(pool, "superadmin@halotekno.id", "superadmin123", "Super Admin", "SUPER_ADMIN", None).await?;
    ensure_user(pool, "admin@halotekno.id", "admin12345", "Admin", "ADMIN", None).await?;
    let customer_id =
        ensure_user(pool, "customer@halotekno.id", "customer123", "Budi Santoso", "CUSTOMER", None).await?;
    let mitra_user_id =
        ensure_user(pool, "mitra@halotekno.id", "mitra12345", "Servis Jaya", "MITRA", Some("APPROVED")).await?;
    let tech_user_id =
        ensure_user(pool, "teknisi@halotekno.id", "teknisi123", "Andi Teknisi", "CUSTOMER", None).await?;

    let technician_id = ensure_technician(pool, tech_user_id).await?;
    seed_services(pool, technician_id).await?;
    ensure_mitra(pool, mitra_user_id).await?;
    seed_products(pool).await?;
    seed_rental_items(pool).await?;

    println!(
        "Seed completed. Super admin ID: {super_admin_id}, Customer ID: {customer_id}, Technician ID: {technician_id}"
    );
    Ok(())
}

async fn ensure_user(
    pool: &PgPool,
    email: &str,
    password: &str,
    name: &str,
    role: &str,
    mitra_status: Option<&str>,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, name, role, mitra_status)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role, mitra_status = EXCLUDED.mitra_status
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .bind(role)
    .bind(mitra_status)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn ensure_technician(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Uuid> {
    let (technician_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO technicians (id, user_id, bio, experience, specialties)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id) DO UPDATE SET bio = EXCLUDED.bio
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind("Teknisi smartphone dan laptop")
    .bind(5)
    .bind(vec!["smartphone".to_string(), "laptop".to_string()])
    .fetch_one(pool)
    .await?;

    println!("Ensured technician {technician_id}");
    Ok(technician_id)
}

async fn seed_services(pool: &PgPool, technician_id: Uuid) -> anyhow::Result<()> {
    let existing: (i64,) = sqlx::query_as("SELECT count(*) FROM services WHERE technician_id = $1")
        .bind(technician_id)
        .fetch_one(pool)
        .await?;
    if existing.0 > 0 {
        return Ok(());
    }

    let services: [(&str, &str, Option<i64>, Option<i64>, Option<i64>); 3] = [
        ("Ganti LCD", "smartphone", Some(350_000), None, None),
        ("Ganti Baterai", "smartphone", None, Some(150_000), Some(300_000)),
        ("Install Ulang Laptop", "laptop", Some(100_000), None, None),
    ];
    for (name, category, price, min_price, max_price) in services {
        sqlx::query(
            r#"
            INSERT INTO services (id, technician_id, name, category, price, min_price, max_price)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(technician_id)
        .bind(name)
        .bind(category)
        .bind(price)
        .bind(min_price)
        .bind(max_price)
        .execute(pool)
        .await?;
    }

    println!("Seeded services");
    Ok(())
}

async fn ensure_mitra(pool: &PgPool, user_id: Uuid) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO mitras (id, user_id, business_name, address, city, province, is_approved)
        VALUES ($1, $2, $3, $4, $5, $6, TRUE)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind("Servis Jaya")
    .bind("Jl. Merdeka No. 10")
    .bind("Bandung")
    .bind("Jawa Barat")
    .execute(pool)
    .await?;

    println!("Ensured mitra storefront");
    Ok(())
}

async fn seed_products(pool: &PgPool) -> anyhow::Result<()> {
    let products = vec![
        ("LCD iPhone 11", "Original LCD replacement", "lcd", 850_000_i64, 10),
        ("Baterai Samsung A52", "Battery 4500mAh", "battery", 250_000, 25),
        ("Flexible Charger Xiaomi", "Charging port flex", "flex", 75_000, 3),
        ("Kamera Belakang Oppo", "Rear camera module", "camera", 320_000, 0),
    ];

    for (name, desc, category, price, stock) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, category, price, stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(category)
        .bind(price)
        .bind(stock)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}

async fn seed_rental_items(pool: &PgPool) -> anyhow::Result<()> {
    let items = vec![
        ("Solder Station Quick 861DW", "tools", 50_000_i64, 4),
        ("Mikroskop Stereo", "tools", 75_000, 2),
        ("Power Supply DC 30V", "tools", 40_000, 5),
    ];

    for (name, category, price_per_day, stock) in items {
        sqlx::query(
            r#"
            INSERT INTO rental_items (id, name, category, price_per_day, stock)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(category)
        .bind(price_per_day)
        .bind(stock)
        .execute(pool)
        .await?;
    }

    println!("Seeded rental items");
    Ok(())
}
