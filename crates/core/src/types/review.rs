//! Customer reviews and the rating summary shown on product pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ProductId, ReviewId};

/// Lowest star rating a review may carry.
pub const MIN_STARS: u8 = 1;
/// Highest star rating a review may carry.
pub const MAX_STARS: u8 = 5;

/// Raw rating as stored by the CMS select-dropdown (`key` is the star count).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub key: String,
    pub value: String,
}

impl Rating {
    /// Star count, if the key is an integer within `MIN_STARS..=MAX_STARS`.
    ///
    /// Malformed or out-of-range keys yield `None`; they are never clamped.
    #[must_use]
    pub fn stars(&self) -> Option<u8> {
        self.key
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|stars| (MIN_STARS..=MAX_STARS).contains(stars))
    }
}

/// A customer review of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub slug: String,
    pub customer_name: String,
    pub rating: Rating,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Aggregate of the valid ratings across a set of reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RatingSummary {
    /// Mean star rating over valid reviews.
    pub average: Option<f64>,
    /// Mean rounded to the nearest whole star, for star widgets.
    pub rounded: Option<u8>,
    /// Number of reviews with a valid rating.
    pub count: usize,
    /// Number of reviews whose rating was malformed or out of range.
    pub ignored: usize,
}

impl RatingSummary {
    /// Summarize the ratings of `reviews`.
    #[must_use]
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let mut total: u32 = 0;
        let mut count: usize = 0;
        for stars in reviews.iter().filter_map(|r| r.rating.stars()) {
            total += u32::from(stars);
            count += 1;
        }

        let ignored = reviews.len() - count;
        if count == 0 {
            return Self {
                ignored,
                ..Self::default()
            };
        }

        #[allow(clippy::cast_precision_loss)] // review counts are tiny
        let average = f64::from(total) / count as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // within 1..=5
        let rounded = average.round() as u8;

        Self {
            average: Some(average),
            rounded: Some(rounded),
            count,
            ignored,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn review(key: &str) -> Review {
        Review {
            id: ReviewId::new(format!("r-{key}")),
            slug: format!("review-{key}"),
            customer_name: "Sam".to_string(),
            rating: Rating {
                key: key.to_string(),
                value: format!("{key} stars"),
            },
            comment: None,
            product_id: Some(ProductId::new("p1")),
            created_at: None,
        }
    }

    #[test]
    fn test_stars_range() {
        assert_eq!(review("1").rating.stars(), Some(1));
        assert_eq!(review("5").rating.stars(), Some(5));
        assert_eq!(review("0").rating.stars(), None);
        assert_eq!(review("6").rating.stars(), None);
        assert_eq!(review("-2").rating.stars(), None);
        assert_eq!(review("four").rating.stars(), None);
        assert_eq!(review("4.5").rating.stars(), None);
    }

    #[test]
    fn test_summary_ignores_invalid() {
        let reviews = vec![review("5"), review("4"), review("banana"), review("9")];
        let summary = RatingSummary::from_reviews(&reviews);

        assert_eq!(summary.count, 2);
        assert_eq!(summary.ignored, 2);
        assert!((summary.average.unwrap() - 4.5).abs() < f64::EPSILON);
        assert_eq!(summary.rounded, Some(5));
    }

    #[test]
    fn test_summary_empty() {
        let summary = RatingSummary::from_reviews(&[]);
        assert_eq!(summary, RatingSummary::default());

        let only_bad = RatingSummary::from_reviews(&[review("x")]);
        assert_eq!(only_bad.average, None);
        assert_eq!(only_bad.ignored, 1);
    }
}
