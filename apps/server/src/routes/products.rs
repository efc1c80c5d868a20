//! Product catalogue handlers.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taller_core::validation::{validate_new_product, validate_product_update, validate_search_query};
use taller_core::{CoreError, NewProduct, Product, ProductFilter, ProductUpdate};
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::state::AppState;

/// Query string accepted by `GET /api/products`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub low_stock: Option<String>,
}

impl ListParams {
    fn into_filter(self) -> ApiResult<ProductFilter> {
        let search = match self.search {
            Some(raw) => validate_search_query(&raw)?,
            None => None,
        };
        let category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let low_stock = matches!(
            self.low_stock.as_deref().map(str::trim),
            Some("true") | Some("1")
        );

        Ok(ProductFilter {
            search,
            category,
            low_stock,
        })
    }
}

pub async fn list_products(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Product>>> {
    let Query(params) = params?;
    let filter = params.into_filter()?;
    debug!(?filter, "Listing products");

    let products = state.db.products().list(&filter).await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Product>> {
    let Path(id) = id?;
    let product = state
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or(CoreError::ProductNotFound(id))?;
    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(new_product) = body?;
    validate_new_product(&new_product)?;

    let product = state.db.products().insert(&new_product).await?;
    info!(id = product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ProductUpdate>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let Path(id) = id?;
    let Json(update) = body?;
    validate_product_update(&update)?;

    let product = state
        .db
        .products()
        .update(id, &update)
        .await?
        .ok_or(CoreError::ProductNotFound(id))?;
    info!(id, "Product updated");
    Ok(Json(product))
}

/// Deleting an unknown id is not an error.
pub async fn delete_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let existed = state.db.products().delete(id).await?;
    info!(id, existed, "Product delete requested");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_stock_flag_parsing() {
        let parse = |raw: Option<&str>| {
            ListParams {
                low_stock: raw.map(str::to_string),
                ..Default::default()
            }
            .into_filter()
            .unwrap()
            .low_stock
        };

        assert!(parse(Some("true")));
        assert!(parse(Some("1")));
        assert!(!parse(Some("false")));
        assert!(!parse(Some("")));
        assert!(!parse(None));
    }

    #[test]
    fn blank_search_and_category_are_dropped() {
        let filter = ListParams {
            search: Some("   ".to_string()),
            category: Some(" ".to_string()),
            low_stock: None,
        }
        .into_filter()
        .unwrap();

        assert_eq!(filter.search, None);
        assert_eq!(filter.category, None);
    }
}
