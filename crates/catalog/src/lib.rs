//! Catalog module: brands and products, per tenant.
//!
//! Entities and their DTO projections, the `BrandCreated` domain event, the
//! repository contracts, and the request/handler triads for each use case.

pub mod brand;
pub mod brands;
pub mod dto;
pub mod product;
pub mod products;
pub mod repository;

#[cfg(test)]
pub(crate) mod test_support;

pub use brand::{Brand, BrandCreated, BrandId};
pub use brands::{
    CreateBrandHandler, CreateBrandRequest, GetBrandHandler, GetBrandRequest, ListBrandsHandler,
    ListBrandsRequest,
};
pub use dto::{BrandDto, ProductDetailsDto, ProductDto};
pub use product::{Product, ProductId};
pub use products::{
    CreateProductHandler, CreateProductRequest, GetProductDetailsHandler, GetProductDetailsRequest,
    ListProductsHandler, ListProductsRequest,
};
pub use repository::{BrandRepository, ProductRepository};
