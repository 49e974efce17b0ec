//! Read-only transport projections of catalog entities.
//!
//! DTOs own their data; nothing here points back into an entity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Brand, Product};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<&Brand> for BrandDto {
    fn from(b: &Brand) -> Self {
        Self {
            id: *b.brand_id().0.as_uuid(),
            name: b.name().to_string(),
            description: b.description().map(str::to_string),
        }
    }
}

/// List-row view of a product with its brand flattened in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub rate: Decimal,
    pub image_path: Option<String>,
    pub brand_id: Uuid,
    pub brand_name: Option<String>,
}

impl ProductDto {
    pub fn project(product: &Product, brand: Option<&Brand>) -> Self {
        Self {
            id: *product.product_id().0.as_uuid(),
            name: product.name().to_string(),
            description: product.description().map(str::to_string),
            rate: product.rate(),
            image_path: product.image_path().map(str::to_string),
            brand_id: *product.brand_id().0.as_uuid(),
            brand_name: brand.map(|b| b.name().to_string()),
        }
    }
}

/// Detail view of a product with a nested brand projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetailsDto {
    pub id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub rate: Decimal,
    pub image_path: Option<String>,
    pub brand: Option<BrandDto>,
}

impl ProductDetailsDto {
    /// `brand` is `None` when the referenced brand no longer exists.
    pub fn project(product: &Product, brand: Option<&Brand>) -> Self {
        Self {
            id: *product.product_id().0.as_uuid(),
            name: Some(product.name().to_string()),
            description: product.description().map(str::to_string),
            rate: product.rate(),
            image_path: product.image_path().map(str::to_string),
            brand: brand.map(BrandDto::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketdesk_core::TenantKey;

    use crate::{BrandId, ProductId};

    fn fixtures() -> (Brand, Product) {
        let tenant = TenantKey::new("acme").unwrap();
        let brand = Brand::new(BrandId::new(), tenant.clone(), "Contoso", Some("Outdoor gear".into()));
        let product = Product::new(
            ProductId::new(),
            tenant,
            "Trail Shoe",
            Some("Waterproof".into()),
            Decimal::new(12950, 2),
            Some("img/trail-shoe.png".into()),
            brand.brand_id(),
        )
        .unwrap();
        (brand, product)
    }

    #[test]
    fn details_projection_preserves_every_field() {
        let (brand, product) = fixtures();
        let dto = ProductDetailsDto::project(&product, Some(&brand));

        assert_eq!(dto.id, *product.product_id().0.as_uuid());
        assert_eq!(dto.name.as_deref(), Some("Trail Shoe"));
        assert_eq!(dto.description.as_deref(), Some("Waterproof"));
        assert_eq!(dto.rate, Decimal::new(12950, 2));
        assert_eq!(dto.image_path.as_deref(), Some("img/trail-shoe.png"));

        let nested = dto.brand.expect("brand projection");
        assert_eq!(nested, BrandDto::from(&brand));
        assert_eq!(nested.name, "Contoso");
        assert_eq!(nested.description.as_deref(), Some("Outdoor gear"));
    }

    #[test]
    fn missing_brand_projects_as_none() {
        let (_, product) = fixtures();
        assert_eq!(ProductDetailsDto::project(&product, None).brand, None);
        assert_eq!(ProductDto::project(&product, None).brand_name, None);
    }

    #[test]
    fn details_serialize_with_exactly_the_listed_fields() {
        let (brand, product) = fixtures();
        let json = serde_json::to_value(ProductDetailsDto::project(&product, Some(&brand))).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["brand", "description", "id", "image_path", "name", "rate"]);
        assert_eq!(json["rate"], "129.50");
    }

    #[test]
    fn list_projection_flattens_brand_name() {
        let (brand, product) = fixtures();
        let dto = ProductDto::project(&product, Some(&brand));
        assert_eq!(dto.brand_id, *brand.brand_id().0.as_uuid());
        assert_eq!(dto.brand_name.as_deref(), Some("Contoso"));
    }
}
