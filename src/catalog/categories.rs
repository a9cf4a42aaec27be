use crate::models::product::Product;
use std::collections::BTreeSet;

/// Label that stands for "every category" in category pickers
pub const ALL_CATEGORIES: &str = "Todas";

/// Raw API category names and the names shown to shoppers
const CATEGORY_NAMES: [(&str, &str); 12] = [
    ("categoria 1", "Electrónica"),
    ("categoria 2", "Hogar y Cocina"),
    ("categoria 3", "Ropa y Accesorios"),
    ("categoria 4", "Libros y Papelería"),
    ("categoria 5", "Juguetes y Juegos"),
    ("categoria 6", "Deportes y Aire Libre"),
    ("categoria 7", "Alimentos y Bebidas"),
    ("categoria 8", "Belleza y Salud"),
    ("categoria 9", "Automotriz"),
    ("categoria 10", "Herramientas"),
    ("boca", "Merchandising"),
    ("hola", "Miscelánea"),
];

/// Display name for a raw category; unknown categories are shown as-is
pub fn display_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    CATEGORY_NAMES
        .iter()
        .find(|(key, _)| *key == lowered)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Raw category for a display name; anything unknown is assumed to be raw
pub fn raw_name(display: &str) -> String {
    CATEGORY_NAMES
        .iter()
        .find(|(_, name)| *name == display)
        .map(|(key, _)| key.to_string())
        .unwrap_or_else(|| display.to_string())
}

/// Sorted, deduplicated display names of the known categories plus any
/// category that appears on a product
pub fn display_categories(products: &[Product]) -> Vec<String> {
    CATEGORY_NAMES
        .iter()
        .map(|(key, _)| *key)
        .chain(
            products
                .iter()
                .map(|p| p.categoria.as_str())
                .filter(|c| !c.is_empty()),
        )
        .map(display_name)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_in(categoria: &str) -> Product {
        Product {
            id: Some("1".to_string()),
            name: String::new(),
            precio: None,
            description: String::new(),
            categoria: categoria.to_string(),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("categoria 1"), "Electrónica");
        assert_eq!(display_name("BOCA"), "Merchandising");
        assert_eq!(display_name("Vinos"), "Vinos");
    }

    #[test]
    fn test_raw_name() {
        assert_eq!(raw_name("Hogar y Cocina"), "categoria 2");
        assert_eq!(raw_name("Vinos"), "Vinos");
    }

    #[test]
    fn test_display_categories_merges_product_categories() {
        let products = vec![product_in("Vinos"), product_in("categoria 3"), product_in("")];
        let categories = display_categories(&products);

        assert_eq!(categories.len(), 13);
        assert!(categories.contains(&"Vinos".to_string()));
        assert!(categories.windows(2).all(|w| w[0] < w[1]));
    }
}
