//! Store-specific extraction for pages classified as e-commerce.

use super::patterns::PRICE_RE;
use super::push_unique;
use crate::document::{element_text, select_within, PageDocument};
use crate::types::record::{EcommerceData, PriceRange, Product, StoreFeatures};

const MAX_PRODUCTS: usize = 50;
const MAX_CATEGORIES: usize = 20;

const PRODUCT_CARD_SELECTOR: &str = r#"[class*="product-card"], [class*="product-item"], [class*="product-tile"], [class*="grid-product"], li.product, [itemtype*="schema.org/Product"]"#;
const PRODUCT_NAME_SELECTOR: &str = r#"[class*="title"], [class*="name"], [itemprop="name"], h2, h3, h4, a"#;
const CATEGORY_LINK_SELECTOR: &str =
    r#"a[href*="/collections/"], a[href*="/category/"], a[href*="/categories/"], a[href*="/shop/"], a[href*="/product-category/"]"#;

pub fn extract_ecommerce(doc: &PageDocument) -> EcommerceData {
    let products = products(doc);
    let price_range = price_range(doc, &products);

    EcommerceData {
        categories: categories(doc),
        store_features: store_features(doc),
        products,
        price_range,
    }
}

fn products(doc: &PageDocument) -> Vec<Product> {
    let mut products: Vec<Product> = Vec::new();

    for card in doc.select(PRODUCT_CARD_SELECTOR) {
        if products.len() >= MAX_PRODUCTS {
            break;
        }

        let Some(name) = select_within(card, PRODUCT_NAME_SELECTOR)
            .into_iter()
            .map(element_text)
            .find(|t| (2..=120).contains(&t.chars().count()) && !PRICE_RE.is_match(t))
        else {
            continue;
        };

        if products.iter().any(|p| p.name == name) {
            continue;
        }

        let text = element_text(card);
        products.push(Product {
            name,
            price: PRICE_RE.find(&text).map(|m| m.as_str().to_string()),
        });
    }

    products
}

fn categories(doc: &PageDocument) -> Vec<String> {
    let mut categories = Vec::new();
    for link in doc.select(CATEGORY_LINK_SELECTOR) {
        let label = element_text(link);
        if (2..=50).contains(&label.chars().count()) {
            push_unique(&mut categories, label, MAX_CATEGORIES);
        }
    }
    categories
}

/// Min/max over product prices, falling back to every price on the page.
fn price_range(doc: &PageDocument, products: &[Product]) -> Option<PriceRange> {
    let mut tokens: Vec<String> = products.iter().filter_map(|p| p.price.clone()).collect();
    if tokens.is_empty() {
        let text = doc.visible_text(&[]);
        tokens = PRICE_RE
            .find_iter(&text)
            .map(|m| m.as_str().to_string())
            .collect();
    }

    let mut parsed = tokens.iter().filter_map(|t| parse_price(t));
    let (currency, first) = parsed.next()?;
    let (min, max) = parsed.fold((first, first), |(lo, hi), (_, value)| {
        (lo.min(value), hi.max(value))
    });

    Some(PriceRange { min, max, currency })
}

/// `"$1,299.00"` → `("USD", 1299.0)`.
pub fn parse_price(token: &str) -> Option<(String, f64)> {
    let currency = match token.chars().next()? {
        '$' => "USD",
        '€' => "EUR",
        '£' => "GBP",
        _ => return None,
    };
    let digits: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value = digits.parse::<f64>().ok()?;
    Some((currency.to_string(), value))
}

fn store_features(doc: &PageDocument) -> StoreFeatures {
    let lower = doc.source().to_lowercase();
    StoreFeatures {
        has_cart: doc.count(r#"[class*="cart"], [href*="/cart"]"#) > 0
            || lower.contains("add to cart"),
        has_search: doc.count(r#"input[type="search"], form[action*="search"]"#) > 0,
        has_wishlist: lower.contains("wishlist") || lower.contains("wish list"),
        has_reviews: doc.count(r#"[class*="review"], [class*="rating"]"#) > 0,
        free_shipping: lower.contains("free shipping") || lower.contains("free delivery"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORE: &str = r#"<html><body>
        <header><input type="search" name="q"><a href="/cart">Cart (0)</a></header>
        <nav>
            <a href="/collections/shoes">Shoes</a>
            <a href="/collections/bags">Bags</a>
            <a href="/collections/shoes">Shoes</a>
        </nav>
        <div class="product-card"><h3>Trail Runner</h3><span>$89.00</span></div>
        <div class="product-card"><h3>City Tote</h3><span>$1,250.00</span></div>
        <div class="product-card"><h3>Trail Runner</h3><span>$89.00</span></div>
        <div class="product-card"><h3>Wool Socks</h3><span>$12</span></div>
        <p>Free shipping on orders over $50</p>
    </body></html>"#;

    #[test]
    fn test_products_are_deduplicated_by_name() {
        let data = extract_ecommerce(&PageDocument::parse(STORE));
        let names: Vec<_> = data.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Trail Runner", "City Tote", "Wool Socks"]);
        assert_eq!(data.products[1].price.as_deref(), Some("$1,250.00"));
    }

    #[test]
    fn test_categories_and_price_range() {
        let data = extract_ecommerce(&PageDocument::parse(STORE));
        assert_eq!(data.categories, vec!["Shoes", "Bags"]);
        let range = data.price_range.unwrap();
        assert_eq!(range.currency, "USD");
        assert_eq!(range.min, 12.0);
        assert_eq!(range.max, 1250.0);
    }

    #[test]
    fn test_store_features() {
        let data = extract_ecommerce(&PageDocument::parse(STORE));
        let features = data.store_features;
        assert!(features.has_cart);
        assert!(features.has_search);
        assert!(features.free_shipping);
        assert!(!features.has_wishlist);
        assert!(!features.has_reviews);
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("€ 1,200.50"), Some(("EUR".into(), 1200.5)));
        assert_eq!(parse_price("£9"), Some(("GBP".into(), 9.0)));
        assert_eq!(parse_price("19"), None);
    }

    #[test]
    fn test_empty_page() {
        let data = extract_ecommerce(&PageDocument::parse("<p>nothing to buy</p>"));
        assert_eq!(data, EcommerceData::default());
    }
}
