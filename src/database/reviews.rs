use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, QuerySelect,
    sea_query::Expr,
};

use super::{Database, found, listed, succeeded};
use crate::{
    entity::reviews::{ActiveModel, Column, Entity as Reviews, Model as ReviewModel},
    models::{Rating, Review},
    sanitize::{sanitize, unsanitize},
};

#[derive(Debug, FromQueryResult)]
struct RatingSummary {
    average: Option<f64>,
}

impl Database {
    /// Insert a review. The rating range is the caller's concern.
    pub async fn add_review(&self, user_id: i32, product_id: i32, rating: i32, comment: &str) -> bool {
        let active = ActiveModel {
            review_id: NotSet,
            user_id: Set(user_id),
            product_id: Set(product_id),
            rating: Set(rating),
            comment: Set(sanitize(comment)),
        };

        let result = Reviews::insert(active)
            .exec_without_returning(self.connection())
            .await;
        self.cache.forget_product_rating(product_id);
        succeeded("add_review", result)
    }

    pub async fn get_review(&self, id: i32) -> Option<Review> {
        found("get_review", Reviews::find_by_id(id).one(self.connection()).await)
            .map(review_from_entity)
    }

    pub async fn get_reviews(&self) -> Vec<Review> {
        listed("get_reviews", Reviews::find().all(self.connection()).await)
            .into_iter()
            .map(review_from_entity)
            .collect()
    }

    pub async fn get_reviews_for_product(&self, product_id: i32) -> Vec<Review> {
        listed(
            "get_reviews_for_product",
            Reviews::find()
                .filter(Column::ProductId.eq(product_id))
                .all(self.connection())
                .await,
        )
        .into_iter()
        .map(review_from_entity)
        .collect()
    }

    pub async fn check_for_existing_review(&self, product_id: i32, user_id: i32) -> bool {
        found(
            "check_for_existing_review",
            Reviews::find()
                .select_only()
                .column(Column::ReviewId)
                .filter(Column::ProductId.eq(product_id))
                .filter(Column::UserId.eq(user_id))
                .into_tuple::<i32>()
                .one(self.connection())
                .await,
        )
        .is_some()
    }

    /// Average rating of a product divided by 10, or `Unrated` when it has no reviews.
    pub async fn get_review_rating(&self, product_id: i32) -> Rating {
        if let Some(rating) = self.cache.product_rating(product_id) {
            return Rating::Rated(rating);
        }

        let average = found(
            "get_review_rating",
            Reviews::find()
                .select_only()
                .column_as(Expr::cust("AVG(\"rating\")::float8"), "average")
                .filter(Column::ProductId.eq(product_id))
                .into_model::<RatingSummary>()
                .one(self.connection())
                .await,
        )
        .and_then(|summary| summary.average);

        match average {
            Some(average) => {
                let rating = average / 10.0;
                self.cache.put_product_rating(product_id, rating);
                Rating::Rated(rating)
            }
            None => Rating::Unrated,
        }
    }
}

fn review_from_entity(model: ReviewModel) -> Review {
    Review {
        id: model.review_id,
        user_id: model.user_id,
        product_id: model.product_id,
        rating: model.rating,
        comment: unsanitize(&model.comment),
    }
}
