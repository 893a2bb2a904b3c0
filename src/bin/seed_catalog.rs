//! Seed the product catalog with the starter range and a few reviews
//!
//! Does nothing when the catalog already has products.

use nomad_spoon::config;
use nomad_spoon::db::{migrations, Database};
use nomad_spoon::models::{CategoryTag, Product, ProductCreate, Review, ReviewCreate};

struct SeedProduct {
    slug: &'static str,
    name: &'static str,
    description: &'static str,
    weight_g: i64,
    price: f64,
    mrp: f64,
    rating: f64,
    value_proposition: &'static str,
    tag: CategoryTag,
    reviews: &'static [(&'static str, &'static str, f64, i64)],
}

const CATALOG: &[SeedProduct] = &[
    SeedProduct {
        slug: "berry-nut-energy-bar",
        name: "Berry Nut Energy Bar",
        description: "Cranberries, almonds and oats bound with date paste.",
        weight_g: 60,
        price: 99.0,
        mrp: 120.0,
        rating: 4.6,
        value_proposition: "Steady energy for long treks",
        tag: CategoryTag::Maintain,
        reviews: &[
            ("Ananya", "Kept me going on the Hampta Pass trek.", 5.0, 3),
            ("Rohit", "A little sweet but very filling.", 4.0, 12),
        ],
    },
    SeedProduct {
        slug: "trail-muesli-mix",
        name: "Trail Muesli Mix",
        description: "Rolled oats, seeds and dried fruit, just add water or milk.",
        weight_g: 400,
        price: 349.0,
        mrp: 399.0,
        rating: 4.4,
        value_proposition: "Balanced breakfast in two minutes",
        tag: CategoryTag::Maintain,
        reviews: &[("Farah", "Easy camp breakfast.", 4.5, 6)],
    },
    SeedProduct {
        slug: "peanut-power-gainer",
        name: "Peanut Power Gainer",
        description: "Peanut butter, whey and jaggery blend, 520 kcal per serving.",
        weight_g: 1000,
        price: 899.0,
        mrp: 1099.0,
        rating: 4.7,
        value_proposition: "Calorie-dense, high protein",
        tag: CategoryTag::Gain,
        reviews: &[("Vikram", "Finally putting on weight.", 5.0, 20)],
    },
    SeedProduct {
        slug: "dry-fruit-laddoo",
        name: "Dry Fruit Laddoo",
        description: "Dates, cashews and ghee, no refined sugar.",
        weight_g: 250,
        price: 299.0,
        mrp: 349.0,
        rating: 4.5,
        value_proposition: "Nutrient-dense snack",
        tag: CategoryTag::Gain,
        reviews: &[],
    },
    SeedProduct {
        slug: "millet-protein-crisps",
        name: "Millet Protein Crisps",
        description: "Baked ragi and jowar crisps with pea protein.",
        weight_g: 90,
        price: 129.0,
        mrp: 149.0,
        rating: 4.3,
        value_proposition: "Low calorie, high fiber",
        tag: CategoryTag::Loss,
        reviews: &[("Sneha", "Crunchy and not oily.", 4.0, 2)],
    },
    SeedProduct {
        slug: "green-tea-soup-sachets",
        name: "Green Tea Soup Sachets",
        description: "Instant vegetable soup with green tea extract.",
        weight_g: 120,
        price: 199.0,
        mrp: 249.0,
        rating: 4.1,
        value_proposition: "Warm, light and portion-controlled",
        tag: CategoryTag::Loss,
        reviews: &[],
    },
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = config::database_path();
    println!("Database path: {}", db_path.display());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&db_path)?;
    database.with_conn(migrations::run_migrations)?;

    let existing = database.with_conn(|conn| Product::count(conn))?;
    if existing > 0 {
        println!("Catalog already has {} products, nothing to do", existing);
        return Ok(());
    }

    let (products, reviews) = database.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        let mut review_total = 0;

        for seed in CATALOG {
            let product = Product::create(&tx, &ProductCreate {
                slug: seed.slug.to_string(),
                name: seed.name.to_string(),
                description: seed.description.to_string(),
                weight_g: seed.weight_g,
                price: seed.price,
                mrp: seed.mrp,
                rating: seed.rating,
                review_count: seed.reviews.len() as i64,
                value_proposition: seed.value_proposition.to_string(),
                category_tag: seed.tag,
                image_url: Some(format!("assets/images/products/{}.png", seed.slug)),
            })?;

            for (user_name, text, rating, days_ago) in seed.reviews {
                let created_at = chrono::Utc::now() - chrono::Duration::days(*days_ago);
                Review::create(&tx, &ReviewCreate {
                    product_id: product.id,
                    user_name: user_name.to_string(),
                    review_text: text.to_string(),
                    rating: *rating,
                    created_at: Some(created_at.format("%Y-%m-%d %H:%M:%S").to_string()),
                })?;
                review_total += 1;
            }
        }

        tx.commit()?;
        Ok((CATALOG.len(), review_total))
    })?;

    println!("Seeded {} products and {} reviews", products, reviews);
    Ok(())
}
