use crate::models::product::{lenient_price, Product};
use serde::{Deserialize, Serialize};

/// One line item in the cart: product display fields plus a quantity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID the line is keyed on
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Unit price at the time the product was added
    #[serde(default, deserialize_with = "lenient_price")]
    pub precio: Option<f64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categoria: String,
    #[serde(default, rename = "imageUrl")]
    pub image_url: String,
    /// Always >= 1 while the line is in the cart
    pub quantity: u32,
}

impl CartLine {
    pub fn from_product(id: String, product: &Product) -> Self {
        Self {
            id,
            name: product.name.clone(),
            precio: product.precio,
            description: product.description.clone(),
            categoria: product.categoria.clone(),
            image_url: product.image_url.clone(),
            quantity: 1,
        }
    }

    /// Price times quantity, counting a missing price as 0
    pub fn subtotal(&self) -> f64 {
        self.precio.unwrap_or(0.0) * f64::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_line_with_text_price() {
        let line: CartLine =
            serde_json::from_str(r#"{"id": "4", "name": "Mate", "precio": "2.50", "quantity": 3}"#)
                .unwrap();
        assert_eq!(line.precio, Some(2.5));
        assert_eq!(line.subtotal(), 7.5);
    }

    #[test]
    fn test_subtotal_without_price() {
        let product = Product {
            id: Some("1".to_string()),
            name: "Sin precio".to_string(),
            precio: None,
            description: String::new(),
            categoria: String::new(),
            image_url: String::new(),
        };
        let line = CartLine::from_product("1".to_string(), &product);
        assert_eq!(line.quantity, 1);
        assert_eq!(line.subtotal(), 0.0);
    }
}
