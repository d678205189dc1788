use sea_orm::entity::prelude::*;

/// Sea-ORM entity for the `prices` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "prices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub brand_id: i32,
    pub product_id: i32,
    pub price_list: i32,
    pub start_date: DateTime,
    pub end_date: DateTime,
    pub priority: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    #[sea_orm(column_type = "String(StringLen::N(3))")]
    pub currency: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Price {
    fn from(model: Model) -> Self {
        Self {
            brand_id: model.brand_id,
            product_id: model.product_id,
            price_list: model.price_list,
            start_date: model.start_date,
            end_date: model.end_date,
            priority: model.priority,
            price: model.price,
            currency: model.currency,
        }
    }
}
