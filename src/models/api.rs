use crate::models::cart::CartLine;
use crate::models::product::Product;
use crate::models::session::Session;
use crate::models::user::UserProfile;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Product form as submitted from the admin panel
///
/// `precio` is accepted as a number or as text and parsed during validation.
/// `categoria` may hold either the raw API category or its display name.
#[derive(Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub precio: Value,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categoria: String,
    #[serde(default, rename = "imageUrl", alias = "imgUrl")]
    pub image_url: String,
}

#[derive(Deserialize)]
pub struct AddToCartRequest {
    pub product_id: String,
}

#[derive(Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub search: String,
    /// Raw or display category name; empty or "Todas" means every category
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_page() -> usize {
    1
}

#[derive(Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
    #[serde(flatten)]
    pub session: Session,
}

#[derive(Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub id: u32,
    pub user: UserProfile,
}

#[derive(Serialize, Deserialize)]
pub struct CartResponse {
    pub success: bool,
    pub items: Vec<CartLine>,
    pub count: u32,
    pub total: f64,
}

#[derive(Serialize, Deserialize)]
pub struct ProductPageResponse {
    pub success: bool,
    pub products: Vec<Product>,
    pub page: usize,
    pub total_pages: usize,
    pub total_products: usize,
    /// Set when the last catalog call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

#[derive(Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Vec<String>,
}
