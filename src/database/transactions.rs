use chrono::Utc;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, EntityTrait, QueryFilter,
};

use super::{Database, found, listed, succeeded};
use crate::{
    entity::purchases::{ActiveModel, Column, Entity as Purchases, Model as PurchaseModel},
    models::Transaction,
    sanitize::{sanitize, unsanitize},
};

impl Database {
    /// Record a purchase. The timestamp is assigned by the database.
    pub async fn add_transaction(
        &self,
        user_id: i32,
        product_id: i32,
        price: f64,
        shipping_price: f64,
        shipping_address: &str,
    ) -> bool {
        let active = ActiveModel {
            purchase_id: NotSet,
            date: NotSet,
            user_id: Set(user_id),
            product_id: Set(product_id),
            price: Set(price),
            shipping_address: Set(sanitize(shipping_address)),
            shipping_price: Set(shipping_price),
        };

        succeeded(
            "add_transaction",
            Purchases::insert(active)
                .exec_without_returning(self.connection())
                .await,
        )
    }

    pub async fn get_transaction(&self, id: i32) -> Option<Transaction> {
        found(
            "get_transaction",
            Purchases::find_by_id(id).one(self.connection()).await,
        )
        .map(transaction_from_entity)
    }

    pub async fn get_transactions(&self) -> Vec<Transaction> {
        listed("get_transactions", Purchases::find().all(self.connection()).await)
            .into_iter()
            .map(transaction_from_entity)
            .collect()
    }

    pub async fn get_transactions_for_user(&self, user_id: i32) -> Vec<Transaction> {
        listed(
            "get_transactions_for_user",
            Purchases::find()
                .filter(Column::UserId.eq(user_id))
                .all(self.connection())
                .await,
        )
        .into_iter()
        .map(transaction_from_entity)
        .collect()
    }
}

fn transaction_from_entity(model: PurchaseModel) -> Transaction {
    Transaction {
        id: model.purchase_id,
        user_id: model.user_id,
        product_id: model.product_id,
        price: model.price,
        shipping_price: model.shipping_price,
        shipping_address: unsanitize(&model.shipping_address),
        date: model.date.with_timezone(&Utc),
    }
}
