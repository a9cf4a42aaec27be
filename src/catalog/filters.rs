use crate::catalog::categories::{raw_name, ALL_CATEGORIES};
use crate::models::product::Product;

pub const DEFAULT_PRODUCTS_PER_PAGE: usize = 8;

/// One page of a filtered product listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number that was requested
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Keep products whose name or description contains `search` and whose
/// category equals `category`, both ignoring case
///
/// An empty category, or the "every category" label, matches everything.
/// Display category names are resolved to their raw API names first.
pub fn filter_products(products: &[Product], search: &str, category: &str) -> Vec<Product> {
    let search = search.to_lowercase();
    let category = if category.is_empty() || category == ALL_CATEGORIES {
        String::new()
    } else {
        raw_name(category).to_lowercase()
    };

    products
        .iter()
        .filter(|p| {
            let matches_search = p.name.to_lowercase().contains(&search)
                || p.description.to_lowercase().contains(&search);
            let matches_category = category.is_empty() || p.categoria.to_lowercase() == category;
            matches_search && matches_category
        })
        .cloned()
        .collect()
}

/// Slice out a 1-based page; pages past the end are empty
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total_pages = items.len().div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page);
    let page_items = items
        .get(start..)
        .map(|rest| rest.iter().take(per_page).cloned().collect())
        .unwrap_or_default();

    Page {
        items: page_items,
        page,
        total_pages,
        total_items: items.len(),
    }
}
