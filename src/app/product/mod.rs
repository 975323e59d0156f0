pub mod handler;
pub mod model;
pub mod service;

pub use model::{DeleteResponse, Product, ProductPayload};
pub use service::{PgProductService, ProductService};
