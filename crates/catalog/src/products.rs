//! Product use cases.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use validator::Validate;

use marketdesk_core::{Request, RequestError, RequestHandler, TenantKey};

use crate::{
    BrandId, BrandRepository, Product, ProductDetailsDto, ProductDto, ProductId, ProductRepository,
};

fn brand_not_found(id: BrandId) -> RequestError {
    RequestError::not_found(format!("Brand {id} Not Found."))
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct CreateProductRequest {
    pub tenant: TenantKey,

    #[validate(
        custom(function = "marketdesk_core::validation::not_blank", message = "'Name' must not be empty."),
        length(max = 75, message = "'Name' must be 75 characters or fewer.")
    )]
    pub name: String,

    pub description: Option<String>,

    #[validate(custom(function = "crate::product::validate_rate"))]
    pub rate: Decimal,

    #[validate(length(max = 2048, message = "'Image Path' must be 2048 characters or fewer."))]
    pub image_path: Option<String>,

    pub brand_id: BrandId,
}

impl Request for CreateProductRequest {
    type Response = ProductId;
}

/// Creates a product under an existing brand of the same tenant.
pub struct CreateProductHandler<P: ?Sized, B: ?Sized> {
    products: Arc<P>,
    brands: Arc<B>,
}

impl<P: ?Sized, B: ?Sized> CreateProductHandler<P, B> {
    pub fn new(products: Arc<P>, brands: Arc<B>) -> Self {
        Self { products, brands }
    }
}

#[async_trait]
impl<P, B> RequestHandler<CreateProductRequest> for CreateProductHandler<P, B>
where
    P: ProductRepository + ?Sized,
    B: BrandRepository + ?Sized,
{
    #[tracing::instrument(skip(self, request), fields(tenant = %request.tenant, brand_id = %request.brand_id))]
    async fn handle(&self, request: CreateProductRequest) -> Result<ProductId, RequestError> {
        if self.brands.get(&request.tenant, request.brand_id).await?.is_none() {
            return Err(brand_not_found(request.brand_id));
        }

        let product = Product::new(
            ProductId::new(),
            request.tenant,
            request.name,
            request.description,
            request.rate,
            request.image_path,
            request.brand_id,
        )?;
        let id = product.product_id();

        self.products.add(product).await?;
        self.products.save_changes().await?;

        tracing::info!(product_id = %id, "product created");
        Ok(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct GetProductDetailsRequest {
    pub tenant: TenantKey,
    pub id: ProductId,
}

impl Request for GetProductDetailsRequest {
    type Response = ProductDetailsDto;
}

pub struct GetProductDetailsHandler<P: ?Sized, B: ?Sized> {
    products: Arc<P>,
    brands: Arc<B>,
}

impl<P: ?Sized, B: ?Sized> GetProductDetailsHandler<P, B> {
    pub fn new(products: Arc<P>, brands: Arc<B>) -> Self {
        Self { products, brands }
    }
}

#[async_trait]
impl<P, B> RequestHandler<GetProductDetailsRequest> for GetProductDetailsHandler<P, B>
where
    P: ProductRepository + ?Sized,
    B: BrandRepository + ?Sized,
{
    async fn handle(&self, request: GetProductDetailsRequest) -> Result<ProductDetailsDto, RequestError> {
        let Some(product) = self.products.get(&request.tenant, request.id).await? else {
            return Err(RequestError::not_found(format!("Product {} Not Found.", request.id)));
        };
        let brand = self.brands.get(&request.tenant, product.brand_id()).await?;
        Ok(ProductDetailsDto::project(&product, brand.as_ref()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ListProductsRequest {
    pub tenant: TenantKey,
}

impl Request for ListProductsRequest {
    type Response = Vec<ProductDto>;
}

pub struct ListProductsHandler<P: ?Sized, B: ?Sized> {
    products: Arc<P>,
    brands: Arc<B>,
}

impl<P: ?Sized, B: ?Sized> ListProductsHandler<P, B> {
    pub fn new(products: Arc<P>, brands: Arc<B>) -> Self {
        Self { products, brands }
    }
}

#[async_trait]
impl<P, B> RequestHandler<ListProductsRequest> for ListProductsHandler<P, B>
where
    P: ProductRepository + ?Sized,
    B: BrandRepository + ?Sized,
{
    async fn handle(&self, request: ListProductsRequest) -> Result<Vec<ProductDto>, RequestError> {
        let mut products = self.products.list(&request.tenant).await?;
        products.sort_by(|a, b| a.name().cmp(b.name()));

        let brands: HashMap<BrandId, _> = self
            .brands
            .list(&request.tenant)
            .await?
            .into_iter()
            .map(|b| (b.brand_id(), b))
            .collect();

        Ok(products
            .iter()
            .map(|p| ProductDto::project(p, brands.get(&p.brand_id())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketdesk_core::Pipeline;
    use proptest::prelude::*;

    use crate::Brand;
    use crate::test_support::{StagedBrands, StagedProducts, acme, globex};

    fn create(brand_id: BrandId, name: &str, rate: Decimal) -> CreateProductRequest {
        CreateProductRequest {
            tenant: acme(),
            name: name.to_string(),
            description: None,
            rate,
            image_path: None,
            brand_id,
        }
    }

    fn catalog() -> (Arc<StagedProducts>, Arc<StagedBrands>, BrandId) {
        let brand = Brand::new(BrandId::new(), acme(), "Contoso", None);
        let id = brand.brand_id();
        (
            Arc::new(StagedProducts::default()),
            Arc::new(StagedBrands::with([brand])),
            id,
        )
    }

    #[tokio::test]
    async fn create_then_get_details_with_brand() {
        let (products, brands, brand_id) = catalog();
        let create_p = Pipeline::validated(CreateProductHandler::new(products.clone(), brands.clone()));
        let id = create_p
            .send(create(brand_id, "Trail Shoe", Decimal::new(4999, 2)))
            .await
            .unwrap();

        let details = Pipeline::validated(GetProductDetailsHandler::new(products, brands))
            .send(GetProductDetailsRequest { tenant: acme(), id })
            .await
            .unwrap();

        assert_eq!(details.name.as_deref(), Some("Trail Shoe"));
        assert_eq!(details.rate, Decimal::new(4999, 2));
        assert_eq!(details.brand.map(|b| b.name).as_deref(), Some("Contoso"));
    }

    #[tokio::test]
    async fn unknown_brand_is_not_found_and_nothing_is_saved() {
        let (products, brands, _) = catalog();
        let missing = BrandId::new();
        let err = Pipeline::validated(CreateProductHandler::new(products.clone(), brands))
            .send(create(missing, "Trail Shoe", Decimal::ONE))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), format!("Brand {missing} Not Found."));
        assert_eq!(products.committed_len(), 0);
    }

    #[tokio::test]
    async fn brand_of_another_tenant_is_invisible() {
        let (products, brands, brand_id) = catalog();
        let mut request = create(brand_id, "Trail Shoe", Decimal::ONE);
        request.tenant = globex();

        let err = Pipeline::validated(CreateProductHandler::new(products, brands))
            .send(request)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn missing_product_message() {
        let (products, brands, _) = catalog();
        let id = ProductId::new();
        let err = Pipeline::validated(GetProductDetailsHandler::new(products, brands))
            .send(GetProductDetailsRequest { tenant: acme(), id })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), format!("Product {id} Not Found."));
    }

    #[tokio::test]
    async fn list_is_sorted_and_carries_brand_name() {
        let (products, brands, brand_id) = catalog();
        let create_p = Pipeline::validated(CreateProductHandler::new(products.clone(), brands.clone()));
        for name in ["Sandal", "Boot"] {
            create_p.send(create(brand_id, name, Decimal::TEN)).await.unwrap();
        }

        let rows = Pipeline::validated(ListProductsHandler::new(products, brands))
            .send(ListProductsRequest { tenant: acme() })
            .await
            .unwrap();

        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Boot", "Sandal"]);
        assert!(rows.iter().all(|r| r.brand_name.as_deref() == Some("Contoso")));
    }

    #[tokio::test]
    async fn rates_outside_the_stored_precision_are_rejected() {
        let (products, brands, brand_id) = catalog();
        let p = Pipeline::validated(CreateProductHandler::new(products.clone(), brands));

        for (rate, message) in [
            (Decimal::new(19999, 3), crate::product::RATE_TOO_PRECISE),
            (Decimal::new(1_000_000_000_000_000_000, 0), crate::product::RATE_TOO_LARGE),
        ] {
            match p.send(create(brand_id, "Widget", rate)).await.unwrap_err() {
                RequestError::Validation(e) => assert_eq!(e.errors()[0].message, message),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
        assert_eq!(products.committed_len(), 0);

        p.send(create(brand_id, "Widget", Decimal::new(19990, 3))).await.unwrap();
        assert_eq!(products.committed_len(), 1);
    }

    proptest! {
        #[test]
        fn negative_rates_never_reach_the_handler(cents in i64::MIN / 2..0i64) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (products, brands, brand_id) = catalog();
            let err = rt
                .block_on(
                    Pipeline::validated(CreateProductHandler::new(products.clone(), brands))
                        .send(create(brand_id, "Widget", Decimal::new(cents, 2))),
                )
                .unwrap_err();
            match err {
                RequestError::Validation(e) => prop_assert!(e.has_field("rate")),
                other => prop_assert!(false, "expected validation error, got {other:?}"),
            }
            prop_assert_eq!(products.committed_len(), 0);
        }
    }
}
