//! Products Domain
//!
//! CRUD over a single `Product { id, name, price }` entity with one business
//! rule: no two distinct products may share both name and price.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, status-code contract
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Lookup, listing, uniqueness-checked save, delete
//! └──────┬──────┘
//!        │  Mapper (Product ⇄ ProductRecord)
//! ┌──────▼──────┐
//! │ Repository  │  ← Store trait + in-memory and PostgreSQL implementations
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{
//!     handlers,
//!     repository::InMemoryProductRepository,
//!     service::ProductService,
//! };
//!
//! let repository = InMemoryProductRepository::new();
//! let service = ProductService::new(repository);
//!
//! // Mount under `/product`
//! let router = axum::Router::new().nest("/product", handlers::router(service));
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod mapper;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{Product, ProductPayload, ProductRecord};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
