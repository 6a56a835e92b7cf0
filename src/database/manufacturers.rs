use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, EntityTrait, QueryFilter, QuerySelect,
    sea_query::Expr,
};

use super::{Database, found, listed, non_empty, succeeded};
use crate::{
    entity::manufacturer::{
        ActiveModel, Column, Entity as Manufacturers, Model as ManufacturerModel,
    },
    models::{Manufacturer, ManufacturerChanges},
    sanitize::{sanitize, unsanitize},
};

impl Database {
    pub async fn add_manufacturer(&self, name: &str, website: &str) -> bool {
        let active = ActiveModel {
            m_id: NotSet,
            website: Set(sanitize(website)),
            company_name: Set(sanitize(name)),
        };

        succeeded(
            "add_manufacturer",
            Manufacturers::insert(active)
                .exec_without_returning(self.connection())
                .await,
        )
    }

    pub async fn get_manufacturer(&self, id: i32) -> Option<Manufacturer> {
        found(
            "get_manufacturer",
            Manufacturers::find_by_id(id).one(self.connection()).await,
        )
        .map(manufacturer_from_entity)
    }

    pub async fn get_manufacturers(&self) -> Vec<Manufacturer> {
        listed(
            "get_manufacturers",
            Manufacturers::find().all(self.connection()).await,
        )
        .into_iter()
        .map(manufacturer_from_entity)
        .collect()
    }

    pub async fn get_manufacturer_name(&self, id: i32) -> Option<String> {
        if let Some(name) = self.cache.manufacturer_name(id) {
            return Some(name);
        }

        let name = found(
            "get_manufacturer_name",
            Manufacturers::find_by_id(id)
                .select_only()
                .column(Column::CompanyName)
                .into_tuple::<String>()
                .one(self.connection())
                .await,
        )
        .map(|raw| unsanitize(&raw))?;

        self.cache.put_manufacturer_name(id, name.clone());
        Some(name)
    }

    pub async fn edit_manufacturer(&self, id: i32, changes: ManufacturerChanges) -> bool {
        let mut update = Manufacturers::update_many().filter(Column::MId.eq(id));
        let mut touched = false;
        let mut renamed = false;

        if let Some(name) = non_empty(&changes.name) {
            update = update.col_expr(Column::CompanyName, Expr::value(sanitize(name)));
            touched = true;
            renamed = true;
        }
        if let Some(website) = changes.website.as_deref() {
            update = update.col_expr(Column::Website, Expr::value(sanitize(website)));
            touched = true;
        }

        if !touched {
            tracing::debug!(manufacturer_id = id, "edit_manufacturer called without changes");
            return true;
        }

        let result = update.exec(self.connection()).await;
        if renamed {
            self.cache.forget_manufacturer_name(id);
        }
        succeeded("edit_manufacturer", result)
    }
}

fn manufacturer_from_entity(model: ManufacturerModel) -> Manufacturer {
    Manufacturer {
        id: model.m_id,
        name: unsanitize(&model.company_name),
        website: unsanitize(&model.website),
    }
}
