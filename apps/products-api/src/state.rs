//! Application state management

use domain_products::{ProductRepository, ProductService};

/// Shared application state, generic over the product store in use
#[derive(Clone)]
pub struct AppState<R: ProductRepository> {
    pub config: crate::config::Config,
    pub service: ProductService<R>,
}
