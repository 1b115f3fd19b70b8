//! Demo catalog used by the in-memory store and the `seed` binary.

use chrono::{DateTime, Duration, Utc};

use crate::models::{NewBanner, NewProduct};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn product(
    name: &str,
    brand: &str,
    price: i64,
    discount_price: Option<i64>,
    sizes: &[&str],
    colors: &[&str],
    category: &str,
    subcategory: &str,
    in_stock: bool,
    description: &str,
) -> NewProduct {
    let slug = name.to_lowercase().replace(' ', "-");
    NewProduct {
        name: name.to_string(),
        brand: brand.to_string(),
        price,
        discount_price,
        images: vec![
            format!("https://images.example.com/{slug}/front.jpg"),
            format!("https://images.example.com/{slug}/back.jpg"),
        ],
        sizes: strings(sizes),
        colors: strings(colors),
        category: category.to_string(),
        subcategory: subcategory.to_string(),
        in_stock,
        description: description.to_string(),
    }
}

pub fn demo_products() -> Vec<NewProduct> {
    vec![
        product(
            "Floral Wrap Dress",
            "Zara",
            2999,
            Some(1999),
            &["XS", "S", "M", "L"],
            &["Pink", "Blue"],
            "Women",
            "Dresses",
            true,
            "Lightweight wrap dress with a floral print.",
        ),
        product(
            "Slim Fit Oxford Shirt",
            "H&M",
            1499,
            None,
            &["S", "M", "L", "XL"],
            &["White", "Blue"],
            "Men",
            "Shirts",
            true,
            "Cotton oxford shirt with a button-down collar.",
        ),
        product(
            "High Rise Skinny Jeans",
            "Levis",
            3499,
            Some(2799),
            &["26", "28", "30", "32"],
            &["Blue", "Black"],
            "Women",
            "Jeans",
            true,
            "Stretch denim with a high rise.",
        ),
        product(
            "Classic Leather Jacket",
            "Allen Solly",
            7999,
            Some(5999),
            &["M", "L", "XL"],
            &["Black", "Brown"],
            "Men",
            "Jackets",
            false,
            "Genuine leather biker jacket.",
        ),
        product(
            "Kids Graphic Tee",
            "H&M",
            599,
            None,
            &["4Y", "6Y", "8Y"],
            &["Yellow", "Red"],
            "Kids",
            "T-Shirts",
            true,
            "Soft cotton tee with a playful print.",
        ),
        product(
            "Pleated Midi Skirt",
            "Mango",
            2499,
            Some(1249),
            &["XS", "S", "M"],
            &["Green", "Black"],
            "Women",
            "Skirts",
            true,
            "Flowing satin-finish midi skirt.",
        ),
        product(
            "Running Sneakers",
            "Nike",
            5999,
            Some(4799),
            &["7", "8", "9", "10"],
            &["White", "Black"],
            "Footwear",
            "Sneakers",
            true,
            "Cushioned everyday running shoe.",
        ),
        product(
            "Wool Blend Overcoat",
            "Mango",
            8999,
            None,
            &["S", "M", "L"],
            &["Grey", "Black"],
            "Men",
            "Coats",
            true,
            "Tailored overcoat in a warm wool blend.",
        ),
    ]
}

pub fn demo_banners(now: DateTime<Utc>) -> Vec<NewBanner> {
    vec![
        NewBanner {
            title: "End of Season Sale".into(),
            description: "Up to 50% off on dresses and skirts.".into(),
            cta_text: "Shop Women".into(),
            cta_link: "/category/women".into(),
            background_color: "#FDE2E4".into(),
            is_active: true,
            priority: 1,
            start_date: now,
            end_date: Some(now + Duration::days(30)),
            created_at: now,
        },
        NewBanner {
            title: "New Footwear Arrivals".into(),
            description: "Fresh sneakers for every run.".into(),
            cta_text: "Explore".into(),
            cta_link: "/category/footwear".into(),
            background_color: "#E2ECE9".into(),
            is_active: true,
            priority: 2,
            start_date: now,
            end_date: None,
            created_at: now,
        },
    ]
}
