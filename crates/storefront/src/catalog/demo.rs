//! Demo catalog data.

use webshop_core::{Category, CategoryId, Price, Product, ProductOption};

const LOREM_LONG: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor \
    incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud exercitation \
    ullamco laboris nisi ut aliquip ex ea commodo consequat. Duis aute irure dolor in reprehenderit in \
    voluptate velit esse cillum dolore eu fugiat nulla pariatur. Excepteur sint occaecat cupidatat non \
    proident, sunt in culpa qui officia deserunt mollit anim id est laborum.";

fn placeholder_image(width: u32, height: u32) -> String {
    format!("https://picsum.photos/{width}/{height}")
}

struct Seed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    cents: u32,
    category: &'static str,
    stock: u32,
    rating: f64,
    reviews: u32,
    sku: &'static str,
    image_height: u32,
}

impl Seed {
    fn into_product(self) -> Product {
        Product {
            description: self.description.to_string(),
            image_url: placeholder_image(400, self.image_height),
            category: self.category.to_string(),
            stock: self.stock,
            rating: Some(self.rating),
            reviews: Some(self.reviews),
            sku: Some(self.sku.to_string()),
            long_description: Some(LOREM_LONG.to_string()),
            ..Product::new(self.id, self.name, Price::from_cents(self.cents))
        }
    }
}

pub(super) fn products() -> Vec<Product> {
    let seeds = [
        Seed {
            id: "1",
            name: "Classic Tee",
            description: "A comfortable and stylish classic t-shirt.",
            cents: 2999,
            category: "Apparel",
            stock: 100,
            rating: 4.5,
            reviews: 120,
            sku: "TS001",
            image_height: 400,
        },
        Seed {
            id: "2",
            name: "Modern Hoodie",
            description: "Warm and modern hoodie for all seasons.",
            cents: 5999,
            category: "Apparel",
            stock: 50,
            rating: 4.8,
            reviews: 90,
            sku: "HD002",
            image_height: 401,
        },
        Seed {
            id: "3",
            name: "Smart Watch",
            description: "Stay connected with this amazing smart watch.",
            cents: 19999,
            category: "Electronics",
            stock: 30,
            rating: 4.2,
            reviews: 200,
            sku: "SW003",
            image_height: 402,
        },
        Seed {
            id: "4",
            name: "Wireless Headphones",
            description: "Immersive sound experience.",
            cents: 9999,
            category: "Electronics",
            stock: 75,
            rating: 4.6,
            reviews: 150,
            sku: "HP004",
            image_height: 403,
        },
        Seed {
            id: "5",
            name: "Yoga Mat",
            description: "Premium quality yoga mat.",
            cents: 3999,
            category: "Sports",
            stock: 120,
            rating: 4.9,
            reviews: 250,
            sku: "YM005",
            image_height: 404,
        },
        Seed {
            id: "6",
            name: "Coffee Maker",
            description: "Brew your perfect coffee every morning.",
            cents: 7999,
            category: "Home Goods",
            stock: 40,
            rating: 4.3,
            reviews: 80,
            sku: "CM006",
            image_height: 405,
        },
    ];

    let mut products: Vec<Product> = seeds.into_iter().map(Seed::into_product).collect();
    if let [tee, hoodie, ..] = products.as_mut_slice() {
        tee.options = vec![ProductOption::new("Size", ["S", "M", "L", "XL"])];
        hoodie.options = vec![
            ProductOption::new("Size", ["M", "L", "XL"]),
            ProductOption::new("Color", ["Black", "Gray"]),
        ];
    }
    products
}

pub(super) fn categories() -> Vec<Category> {
    [
        ("apparel", "Apparel"),
        ("electronics", "Electronics"),
        ("sports", "Sports"),
        ("home-goods", "Home Goods"),
        ("books", "Books"),
    ]
    .into_iter()
    .zip(200..)
    .map(|((id, name), height)| Category {
        id: CategoryId::new(id),
        name: name.to_string(),
        image_url: Some(placeholder_image(300, height)),
    })
    .collect()
}
