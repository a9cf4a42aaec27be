use crate::catalog::categories::raw_name;
use crate::core::error::ValidationError;
use crate::models::api::{ProductForm, RegisterRequest};
use crate::models::product::{coerce_price, ProductDraft};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Registration fields that passed validation
#[derive(Debug, PartialEq)]
pub struct ValidatedRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Check a registration form the way the sign-up page does before the
/// registry is touched
pub fn validate_registration(form: RegisterRequest) -> Result<ValidatedRegistration, ValidationError> {
    let username = form.username.trim().to_string();
    let email = form.email.trim().to_string();

    if username.is_empty() {
        return Err(ValidationError::MissingField("username"));
    }
    if email.is_empty() {
        return Err(ValidationError::MissingField("email"));
    }
    if form.password.is_empty() {
        return Err(ValidationError::MissingField("password"));
    }
    if form.confirm_password.is_empty() {
        return Err(ValidationError::MissingField("confirm_password"));
    }

    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }

    if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }

    if !looks_like_email(&email) {
        return Err(ValidationError::InvalidEmail(email));
    }

    Ok(ValidatedRegistration {
        username,
        email,
        password: form.password,
    })
}

/// Non-blank text, an `@`, more text, a dot, more text
fn looks_like_email(email: &str) -> bool {
    email.split_whitespace().any(|token| {
        token.char_indices().any(|(at, c)| {
            if c != '@' || at == 0 {
                return false;
            }
            let domain = &token[at + 1..];
            domain
                .char_indices()
                .any(|(dot, c)| c == '.' && dot > 0 && dot + 1 < domain.len())
        })
    })
}

/// Check an admin product form and build the payload for the API
///
/// Name, price and category are required. The price may be a number or
/// numeric text. Display category names are stored under their raw name.
pub fn validate_product(form: ProductForm) -> Result<ProductDraft, ValidationError> {
    let name = form.name.trim().to_string();
    if name.is_empty() {
        return Err(ValidationError::MissingField("name"));
    }

    let precio = match &form.precio {
        serde_json::Value::Null => return Err(ValidationError::MissingField("precio")),
        serde_json::Value::String(s) if s.trim().is_empty() => {
            return Err(ValidationError::MissingField("precio"))
        }
        value => coerce_price(value).ok_or_else(|| ValidationError::InvalidPrice(value.to_string()))?,
    };

    let categoria = form.categoria.trim();
    if categoria.is_empty() {
        return Err(ValidationError::MissingField("categoria"));
    }

    Ok(ProductDraft {
        name,
        precio,
        description: form.description,
        categoria: raw_name(categoria),
        image_url: form.image_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registration(password: &str, confirm: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: "ana".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    fn product_form(precio: serde_json::Value, categoria: &str) -> ProductForm {
        ProductForm {
            name: "Mate".to_string(),
            precio,
            description: "Calabaza".to_string(),
            categoria: categoria.to_string(),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_valid_registration() {
        let valid = validate_registration(registration("secreto1", "secreto1", " ana@example.com ")).unwrap();
        assert_eq!(valid.email, "ana@example.com");
        assert_eq!(valid.username, "ana");
    }

    #[test]
    fn test_registration_missing_field() {
        let mut form = registration("secreto1", "secreto1", "ana@example.com");
        form.username = "  ".to_string();
        assert_eq!(
            validate_registration(form),
            Err(ValidationError::MissingField("username"))
        );
    }

    #[test]
    fn test_registration_password_rules() {
        assert_eq!(
            validate_registration(registration("secreto1", "secreto2", "ana@example.com")),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            validate_registration(registration("abc", "abc", "ana@example.com")),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
    }

    #[test]
    fn test_email_shape() {
        assert!(looks_like_email("a@b.co"));
        assert!(looks_like_email("ana.perez@mail.example.com"));
        assert!(!looks_like_email("ana@example"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("ana@.com"));
        assert!(!looks_like_email("ana@example."));
        assert!(!looks_like_email("ana example.com"));
    }

    #[test]
    fn test_valid_product_with_text_price() {
        let draft = validate_product(product_form(json!("12.50"), "Hogar y Cocina")).unwrap();
        assert_eq!(draft.precio, 12.5);
        assert_eq!(draft.categoria, "categoria 2");
    }

    #[test]
    fn test_product_keeps_unknown_category() {
        let draft = validate_product(product_form(json!(3), "Vinos")).unwrap();
        assert_eq!(draft.categoria, "Vinos");
    }

    #[test]
    fn test_product_required_fields() {
        assert_eq!(
            validate_product(product_form(json!(null), "boca")),
            Err(ValidationError::MissingField("precio"))
        );
        assert_eq!(
            validate_product(product_form(json!(""), "boca")),
            Err(ValidationError::MissingField("precio"))
        );
        assert_eq!(
            validate_product(product_form(json!(1), "")),
            Err(ValidationError::MissingField("categoria"))
        );
    }

    #[test]
    fn test_product_invalid_price() {
        assert!(matches!(
            validate_product(product_form(json!("caro"), "boca")),
            Err(ValidationError::InvalidPrice(_))
        ));
    }
}
