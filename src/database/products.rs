use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, EntityTrait, QueryFilter, QuerySelect,
    sea_query::Expr,
};

use super::{Database, found, listed, non_empty, succeeded};
use crate::{
    entity::product::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    models::{Product, ProductChanges},
    sanitize::{sanitize, unsanitize},
};

impl Database {
    /// Insert a product. `None` leaves the image column NULL; any string, empty included, is kept.
    pub async fn add_product(
        &self,
        name: &str,
        manufacturer_id: i32,
        price: f64,
        stock: i32,
        image: Option<&str>,
        description: &str,
    ) -> bool {
        let active = ActiveModel {
            product_id: NotSet,
            name: Set(sanitize(name)),
            manufacturer_id: Set(manufacturer_id),
            price: Set(price),
            stock: Set(stock),
            image: Set(image.map(sanitize)),
            description: Set(sanitize(description)),
        };

        succeeded(
            "add_product",
            Products::insert(active).exec_without_returning(self.connection()).await,
        )
    }

    pub async fn get_product(&self, id: i32) -> Option<Product> {
        found("get_product", Products::find_by_id(id).one(self.connection()).await)
            .map(product_from_entity)
    }

    pub async fn get_products(&self) -> Vec<Product> {
        listed("get_products", Products::find().all(self.connection()).await)
            .into_iter()
            .map(product_from_entity)
            .collect()
    }

    pub async fn get_products_by_manufacturer(&self, manufacturer_id: i32) -> Vec<Product> {
        listed(
            "get_products_by_manufacturer",
            Products::find()
                .filter(Column::ManufacturerId.eq(manufacturer_id))
                .all(self.connection())
                .await,
        )
        .into_iter()
        .map(product_from_entity)
        .collect()
    }

    pub async fn get_product_name(&self, id: i32) -> Option<String> {
        if let Some(name) = self.cache.product_name(id) {
            return Some(name);
        }

        let name = found(
            "get_product_name",
            Products::find_by_id(id)
                .select_only()
                .column(Column::Name)
                .into_tuple::<String>()
                .one(self.connection())
                .await,
        )
        .map(|raw| unsanitize(&raw))?;

        self.cache.put_product_name(id, name.clone());
        Some(name)
    }

    pub async fn edit_product(&self, id: i32, changes: ProductChanges) -> bool {
        let mut update = Products::update_many().filter(Column::ProductId.eq(id));
        let mut touched = false;
        let mut renamed = false;

        if let Some(name) = non_empty(&changes.name) {
            update = update.col_expr(Column::Name, Expr::value(sanitize(name)));
            touched = true;
            renamed = true;
        }
        if let Some(manufacturer_id) = changes.manufacturer_id {
            update = update.col_expr(Column::ManufacturerId, Expr::value(manufacturer_id));
            touched = true;
        }
        if let Some(price) = changes.price {
            update = update.col_expr(Column::Price, Expr::value(price));
            touched = true;
        }
        if let Some(stock) = changes.stock {
            update = update.col_expr(Column::Stock, Expr::value(stock));
            touched = true;
        }
        if let Some(image) = changes.image.as_deref() {
            update = update.col_expr(Column::Image, Expr::value(sanitize(image)));
            touched = true;
        }
        if let Some(description) = changes.description.as_deref() {
            update = update.col_expr(Column::Description, Expr::value(sanitize(description)));
            touched = true;
        }

        if !touched {
            tracing::debug!(product_id = id, "edit_product called without changes");
            return true;
        }

        let result = update.exec(self.connection()).await;
        if renamed {
            self.cache.forget_product_name(id);
        }
        succeeded("edit_product", result)
    }

    /// Take one unit out of stock in a single `stock = stock - 1` statement.
    pub async fn decrease_product_stock(&self, id: i32) -> bool {
        succeeded(
            "decrease_product_stock",
            Products::update_many()
                .col_expr(Column::Stock, Expr::col(Column::Stock).sub(1))
                .filter(Column::ProductId.eq(id))
                .exec(self.connection())
                .await,
        )
    }

    pub async fn delete_product(&self, id: i32) -> bool {
        let result = Products::delete_by_id(id).exec(self.connection()).await;
        self.cache.forget_product_name(id);
        self.cache.forget_product_rating(id);
        succeeded("delete_product", result)
    }
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.product_id,
        name: unsanitize(&model.name),
        manufacturer_id: model.manufacturer_id,
        price: model.price,
        stock: model.stock,
        image: model.image.map(|i| unsanitize(&i)),
        description: unsanitize(&model.description),
    }
}
