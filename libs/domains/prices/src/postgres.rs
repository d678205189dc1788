use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entity::{Column, Entity};
use crate::error::PriceResult;
use crate::models::{Price, PriceQuery};
use crate::repository::PriceRepository;

/// PostgreSQL implementation of PriceRepository.
#[derive(Clone)]
pub struct PgPriceRepository {
    db: DatabaseConnection,
}

impl PgPriceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PriceRepository for PgPriceRepository {
    async fn find_applicable(&self, query: PriceQuery) -> PriceResult<Option<Price>> {
        let row = Entity::find()
            .filter(Column::BrandId.eq(query.brand_id))
            .filter(Column::ProductId.eq(query.product_id))
            .filter(Column::StartDate.lte(query.as_of))
            .filter(Column::EndDate.gte(query.as_of))
            .order_by_desc(Column::Priority)
            .order_by_asc(Column::PriceList)
            .limit(1)
            .one(&self.db)
            .await?;

        Ok(row.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime;
    use crate::entity;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn query() -> PriceQuery {
        PriceQuery {
            brand_id: 1,
            product_id: 35455,
            as_of: datetime::parse_application_date("14/06/2020 16:00:00").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_maps_returned_row_to_domain_price() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![entity::Model {
                id: 2,
                brand_id: 1,
                product_id: 35455,
                price_list: 2,
                start_date: datetime::parse_application_date("14/06/2020 15:00:00").unwrap(),
                end_date: datetime::parse_application_date("14/06/2020 18:30:00").unwrap(),
                priority: 1,
                price: sea_orm::entity::prelude::Decimal::new(2545, 2),
                currency: "EUR".to_string(),
            }]])
            .into_connection();

        let repo = PgPriceRepository::new(db);
        let price = repo.find_applicable(query()).await.unwrap().unwrap();
        assert_eq!(price.price_list, 2);
        assert_eq!(price.currency, "EUR");
    }

    #[tokio::test]
    async fn test_empty_result_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();

        let repo = PgPriceRepository::new(db);
        assert!(repo.find_applicable(query()).await.unwrap().is_none());
    }
}
