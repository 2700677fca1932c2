//! Conversions from Cosmic wire types to core records.

use chrono::{DateTime, Utc};
use styleshop_core::{
    Collection, CollectionId, CollectionRef, Image, Price, Product, ProductId, Rating, Review,
    ReviewId,
};

use crate::cosmic::types::{
    CollectionMetadata, CosmicFile, CosmicObject, ObjectRef, ProductMetadata, ReviewMetadata,
};

/// Blank strings from the CMS mean "not set".
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn convert_image(file: Option<CosmicFile>) -> Option<Image> {
    file.filter(|f| !f.url.is_empty()).map(|f| Image {
        url: f.url,
        imgix_url: non_blank(f.imgix_url),
    })
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Convert a collection object.
pub fn convert_collection(object: CosmicObject<CollectionMetadata>) -> Collection {
    let CosmicObject {
        id,
        slug,
        title,
        metadata,
        ..
    } = object;

    Collection {
        id: CollectionId::new(id),
        slug,
        name: non_blank(metadata.name).unwrap_or(title),
        description: non_blank(metadata.description),
        image: convert_image(metadata.collection_image),
    }
}

fn convert_collection_ref(reference: ObjectRef<CollectionMetadata>) -> Option<CollectionRef> {
    match reference {
        ObjectRef::Expanded(object) => {
            let collection = convert_collection(*object);
            Some(collection.to_ref())
        }
        ObjectRef::Id(id) if id.trim().is_empty() => None,
        ObjectRef::Id(id) => Some(CollectionRef::bare(CollectionId::new(id))),
    }
}

/// Convert a product object.
///
/// Returns `None` when the product has no usable price; such objects are
/// half-edited drafts and cannot be sold.
pub fn convert_product(object: CosmicObject<ProductMetadata>) -> Option<Product> {
    let CosmicObject {
        id,
        slug,
        title,
        metadata,
        ..
    } = object;

    let Some(price) = metadata.price.and_then(|amount| Price::new(amount).ok()) else {
        tracing::warn!(product_id = %id, slug = %slug, "Skipping product without a valid price");
        return None;
    };

    Some(Product {
        id: ProductId::new(id),
        slug,
        name: non_blank(metadata.name).unwrap_or(title),
        description: non_blank(metadata.description),
        price,
        image: convert_image(metadata.product_image),
        collection: metadata.collection.and_then(convert_collection_ref),
        in_stock: metadata.in_stock,
    })
}

/// Convert a list of product objects, dropping unsellable ones.
pub fn convert_products(objects: Vec<CosmicObject<ProductMetadata>>) -> Vec<Product> {
    objects.into_iter().filter_map(convert_product).collect()
}

/// Convert a review object.
pub fn convert_review(object: CosmicObject<ReviewMetadata>) -> Review {
    let created_at = parse_timestamp(object.created_at.as_deref());
    let CosmicObject {
        id,
        slug,
        title,
        metadata,
        ..
    } = object;

    let product_id = metadata.product.and_then(|reference| match reference {
        ObjectRef::Expanded(product) => Some(ProductId::new(product.id)),
        ObjectRef::Id(id) if id.trim().is_empty() => None,
        ObjectRef::Id(id) => Some(ProductId::new(id)),
    });

    Review {
        id: ReviewId::new(id),
        slug,
        customer_name: non_blank(metadata.customer_name).unwrap_or(title),
        rating: Rating {
            key: metadata.rating.key,
            value: metadata.rating.value,
        },
        comment: non_blank(metadata.comment),
        product_id,
        created_at,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::cosmic::types::ObjectsResponse;

    fn products_from(value: serde_json::Value) -> Vec<Product> {
        let response: ObjectsResponse<ProductMetadata> = serde_json::from_value(value).unwrap();
        convert_products(response.objects)
    }

    #[test]
    fn test_convert_product_with_expanded_collection() {
        let products = products_from(json!({
            "objects": [{
                "id": "p1",
                "slug": "red-shirt",
                "title": "Red Shirt",
                "metadata": {
                    "name": "Red Shirt",
                    "description": "Soft cotton",
                    "price": 20,
                    "product_image": { "url": "https://cdn/x.jpg", "imgix_url": "https://imgix/x.jpg" },
                    "collection": {
                        "id": "c1",
                        "slug": "summer",
                        "title": "Summer",
                        "metadata": { "name": "Summer Collection" }
                    },
                    "in_stock": true
                }
            }],
            "total": 1
        }));

        assert_eq!(products.len(), 1);
        let product = &products[0];
        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(product.price.amount(), Decimal::from(20));
        assert_eq!(product.description.as_deref(), Some("Soft cotton"));
        assert!(product.in_stock);

        let collection = product.collection.as_ref().unwrap();
        assert_eq!(collection.id.as_str(), "c1");
        assert_eq!(collection.name.as_deref(), Some("Summer Collection"));
        assert_eq!(
            product.image.as_ref().unwrap().imgix_url.as_deref(),
            Some("https://imgix/x.jpg")
        );
    }

    #[test]
    fn test_convert_product_with_bare_collection_and_blanks() {
        let products = products_from(json!({
            "objects": [{
                "id": "p2",
                "slug": "blue-hat",
                "title": "Blue Hat",
                "metadata": {
                    "price": "50.00",
                    "description": "",
                    "collection": "c9",
                    "in_stock": false
                }
            }]
        }));

        let product = &products[0];
        assert_eq!(product.name, "Blue Hat");
        assert_eq!(product.description, None);
        assert_eq!(product.image, None);
        assert_eq!(
            product.collection,
            Some(CollectionRef::bare(CollectionId::new("c9")))
        );
    }

    #[test]
    fn test_products_without_price_are_dropped() {
        let products = products_from(json!({
            "objects": [
                { "id": "a", "slug": "a", "title": "A", "metadata": { "in_stock": true } },
                { "id": "b", "slug": "b", "title": "B", "metadata": { "price": -1 } },
                { "id": "c", "slug": "c", "title": "C", "metadata": { "price": 5, "collection": null } }
            ]
        }));

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id.as_str(), "c");
        assert_eq!(products[0].collection, None);
    }

    #[test]
    fn test_convert_review() {
        let response: ObjectsResponse<ReviewMetadata> = serde_json::from_value(json!({
            "objects": [{
                "id": "r1",
                "slug": "great-shirt",
                "title": "Great shirt",
                "created_at": "2024-03-01T12:00:00.000Z",
                "metadata": {
                    "customer_name": "Alex",
                    "rating": { "key": "5", "value": "5 Stars" },
                    "comment": "Love it",
                    "product": { "id": "p1", "slug": "red-shirt", "title": "Red Shirt", "metadata": { "price": 20 } }
                }
            }]
        }))
        .unwrap();

        let review = convert_review(response.objects.into_iter().next().unwrap());
        assert_eq!(review.customer_name, "Alex");
        assert_eq!(review.rating.stars(), Some(5));
        assert_eq!(review.product_id, Some(ProductId::new("p1")));
        assert!(review.created_at.is_some());
    }

    #[test]
    fn test_convert_review_without_rating_or_product() {
        let response: ObjectsResponse<ReviewMetadata> = serde_json::from_value(json!({
            "objects": [{
                "id": "r2",
                "slug": "no-rating",
                "title": "Sam",
                "metadata": { "product": "" }
            }]
        }))
        .unwrap();

        let review = convert_review(response.objects.into_iter().next().unwrap());
        assert_eq!(review.customer_name, "Sam");
        assert_eq!(review.rating.stars(), None);
        assert_eq!(review.product_id, None);
        assert_eq!(review.created_at, None);
    }
}
