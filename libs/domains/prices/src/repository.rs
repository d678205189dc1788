use async_trait::async_trait;
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::datetime;
use crate::error::PriceResult;
use crate::models::{Price, PriceQuery};

/// Read-only access to the price store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceRepository: Send + Sync {
    /// Resolve the single winning price for the query, or `Ok(None)` when no
    /// entry applies ("no applicable price" is a valid outcome, not an error).
    ///
    /// A candidate matches when its (brand_id, product_id) equal the query's
    /// and its inclusive validity window covers `as_of`. Among matches the
    /// highest `priority` wins; equal priorities fall back to the lowest
    /// `price_list`, so repeated calls over unchanged data always return the
    /// same row.
    ///
    /// Store faults surface unchanged; classifying them is the resilient
    /// proxy's job.
    async fn find_applicable(&self, query: PriceQuery) -> PriceResult<Option<Price>>;
}

/// In-memory implementation of PriceRepository (tests, local development).
#[derive(Debug, Default, Clone)]
pub struct InMemoryPriceRepository {
    prices: Arc<RwLock<Vec<Price>>>,
}

impl InMemoryPriceRepository {
    pub fn new(prices: Vec<Price>) -> Self {
        Self {
            prices: Arc::new(RwLock::new(prices)),
        }
    }

    /// The demo price list for brand 1 / product 35455: one base price for
    /// the second half of 2020 plus three higher-priority promotional
    /// windows overlapping it.
    pub fn with_sample_data() -> Self {
        fn row(price_list: i32, start: &str, end: &str, priority: i32, price: Decimal) -> Price {
            Price {
                brand_id: 1,
                product_id: 35455,
                price_list,
                start_date: datetime::parse_application_date(start).expect("valid sample date"),
                end_date: datetime::parse_application_date(end).expect("valid sample date"),
                priority,
                price,
                currency: "EUR".to_string(),
            }
        }

        Self::new(vec![
            row(
                1,
                "14/06/2020 00:00:00",
                "31/12/2020 23:59:59",
                0,
                Decimal::new(3550, 2),
            ),
            row(
                2,
                "14/06/2020 15:00:00",
                "14/06/2020 18:30:00",
                1,
                Decimal::new(2545, 2),
            ),
            row(
                3,
                "15/06/2020 00:00:00",
                "15/06/2020 11:00:00",
                1,
                Decimal::new(3050, 2),
            ),
            row(
                4,
                "15/06/2020 16:00:00",
                "31/12/2020 23:59:59",
                1,
                Decimal::new(3895, 2),
            ),
        ])
    }
}

#[async_trait]
impl PriceRepository for InMemoryPriceRepository {
    async fn find_applicable(&self, query: PriceQuery) -> PriceResult<Option<Price>> {
        let prices = self.prices.read().await;

        let winner = prices
            .iter()
            .filter(|p| {
                p.brand_id == query.brand_id
                    && p.product_id == query.product_id
                    && p.start_date <= query.as_of
                    && query.as_of <= p.end_date
            })
            // highest priority wins; lowest price_list breaks ties
            .min_by_key(|p| (Reverse(p.priority), p.price_list))
            .cloned();

        Ok(winner)
    }
}
