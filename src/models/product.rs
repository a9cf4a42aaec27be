use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A product as returned by the remote products API
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ApiProduct")]
pub struct Product {
    /// Opaque identifier assigned by the API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Unit price; text prices are coerced, anything non-numeric becomes None
    pub precio: Option<f64>,
    pub description: String,
    pub categoria: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// Wire shape of a product; older records use `idProducto` and `imgUrl`,
/// and some carry both spellings
#[derive(Deserialize)]
struct ApiProduct {
    #[serde(default, deserialize_with = "opaque_id")]
    id: Option<String>,
    #[serde(default, rename = "idProducto", deserialize_with = "opaque_id")]
    legacy_id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default, deserialize_with = "lenient_price")]
    precio: Option<f64>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    categoria: String,
    #[serde(default, rename = "imageUrl")]
    image_url: Option<String>,
    #[serde(default, rename = "imgUrl")]
    legacy_image_url: Option<String>,
}

impl From<ApiProduct> for Product {
    fn from(raw: ApiProduct) -> Self {
        Self {
            id: raw.id.or(raw.legacy_id),
            name: raw.name,
            precio: raw.precio,
            description: raw.description,
            categoria: raw.categoria,
            image_url: raw.image_url.or(raw.legacy_image_url).unwrap_or_default(),
        }
    }
}

/// Product fields sent to the API on create and update
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductDraft {
    pub name: String,
    pub precio: f64,
    pub description: String,
    pub categoria: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

impl Product {
    pub fn price_or_zero(&self) -> f64 {
        self.precio.unwrap_or(0.0)
    }

    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            precio: self.price_or_zero(),
            description: self.description.clone(),
            categoria: self.categoria.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

impl ProductDraft {
    pub fn into_product(self, id: Option<String>) -> Product {
        Product {
            id,
            name: self.name,
            precio: Some(self.precio),
            description: self.description,
            categoria: self.categoria,
            image_url: self.image_url,
        }
    }
}

/// Parse a price that may arrive as a JSON number or as numeric text
pub fn coerce_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|p| p.is_finite()),
        _ => None,
    }
}

pub(crate) fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_price(&value))
}

fn opaque_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "product id must be a string or number, got {}",
            other
        ))),
    }
}
