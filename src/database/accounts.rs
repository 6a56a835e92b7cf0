use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, EntityTrait, QueryFilter, QuerySelect,
    sea_query::Expr,
};

use super::{Database, found, listed, non_empty, succeeded};
use crate::{
    entity::users::{ActiveModel, Column, Entity as Users, Model as UserModel},
    models::{Account, AccountChanges, NewAccount, Role},
    password,
    sanitize::{sanitize, unsanitize},
};

impl Database {
    pub async fn add_user(&self, account: NewAccount) -> bool {
        let password = match password::hash(&account.password) {
            Ok(digest) => digest,
            Err(err) => {
                tracing::error!(error = %err, "failed to hash password");
                return false;
            }
        };

        let active = ActiveModel {
            user_id: NotSet,
            username: Set(sanitize(&account.username)),
            email: Set(sanitize(&account.email)),
            password: Set(password),
            first_name: Set(sanitize(&account.first_name)),
            last_name: Set(sanitize(&account.last_name)),
            address: Set(sanitize(&account.address)),
            phone: Set(sanitize(&account.phone)),
            is_admin: Set(account.role.is_admin()),
        };

        succeeded(
            "add_user",
            Users::insert(active).exec_without_returning(self.connection()).await,
        )
    }

    pub async fn get_user(&self, id: i32) -> Option<Account> {
        found(
            "get_user",
            Users::find_by_id(id).one(self.connection()).await,
        )
        .map(account_from_entity)
    }

    /// Look an account up by login name and check the password against its digest.
    pub async fn get_user_by_credentials(&self, username: &str, password: &str) -> Option<Account> {
        let user = found(
            "get_user_by_credentials",
            Users::find()
                .filter(Column::Username.eq(sanitize(username)))
                .one(self.connection())
                .await,
        )?;

        if !password::verify(password, &user.password) {
            return None;
        }
        Some(account_from_entity(user))
    }

    pub async fn get_users(&self) -> Vec<Account> {
        listed("get_users", Users::find().all(self.connection()).await)
            .into_iter()
            .map(account_from_entity)
            .collect()
    }

    pub async fn get_user_name(&self, id: i32) -> Option<String> {
        if let Some(name) = self.cache.user_name(id) {
            return Some(name);
        }

        let name = found(
            "get_user_name",
            Users::find_by_id(id)
                .select_only()
                .column(Column::Username)
                .into_tuple::<String>()
                .one(self.connection())
                .await,
        )
        .map(|raw| unsanitize(&raw))?;

        self.cache.put_user_name(id, name.clone());
        Some(name)
    }

    pub async fn check_for_existing_account(&self, username: &str) -> bool {
        found(
            "check_for_existing_account",
            Users::find()
                .select_only()
                .column(Column::UserId)
                .filter(Column::Username.eq(sanitize(username)))
                .into_tuple::<i32>()
                .one(self.connection())
                .await,
        )
        .is_some()
    }

    pub async fn edit_user(&self, id: i32, changes: AccountChanges) -> bool {
        let mut update = Users::update_many().filter(Column::UserId.eq(id));
        let mut touched = false;
        let mut renamed = false;

        if let Some(username) = non_empty(&changes.username) {
            update = update.col_expr(Column::Username, Expr::value(sanitize(username)));
            touched = true;
            renamed = true;
        }
        if let Some(email) = non_empty(&changes.email) {
            update = update.col_expr(Column::Email, Expr::value(sanitize(email)));
            touched = true;
        }
        if let Some(first_name) = non_empty(&changes.first_name) {
            update = update.col_expr(Column::FirstName, Expr::value(sanitize(first_name)));
            touched = true;
        }
        if let Some(last_name) = non_empty(&changes.last_name) {
            update = update.col_expr(Column::LastName, Expr::value(sanitize(last_name)));
            touched = true;
        }
        // an empty phone number is a valid value
        if let Some(phone) = changes.phone.as_deref() {
            update = update.col_expr(Column::Phone, Expr::value(sanitize(phone)));
            touched = true;
        }
        if let Some(address) = non_empty(&changes.address) {
            update = update.col_expr(Column::Address, Expr::value(sanitize(address)));
            touched = true;
        }
        if let Some(role) = changes.role {
            update = update.col_expr(Column::IsAdmin, Expr::value(role.is_admin()));
            touched = true;
        }
        if let Some(password) = non_empty(&changes.password) {
            let digest = match password::hash(password) {
                Ok(digest) => digest,
                Err(err) => {
                    tracing::error!(error = %err, user_id = id, "failed to hash password");
                    return false;
                }
            };
            update = update.col_expr(Column::Password, Expr::value(digest));
            touched = true;
        }

        if !touched {
            tracing::debug!(user_id = id, "edit_user called without changes");
            return true;
        }

        let result = update.exec(self.connection()).await;
        if renamed {
            self.cache.forget_user_name(id);
        }
        succeeded("edit_user", result)
    }
}

fn account_from_entity(model: UserModel) -> Account {
    Account {
        id: model.user_id,
        username: unsanitize(&model.username),
        email: unsanitize(&model.email),
        first_name: unsanitize(&model.first_name),
        last_name: unsanitize(&model.last_name),
        phone: unsanitize(&model.phone),
        address: unsanitize(&model.address),
        role: Role::from_admin_flag(model.is_admin),
    }
}
