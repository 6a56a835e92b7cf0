pub mod manufacturer;
pub mod product;
pub mod purchases;
pub mod reviews;
pub mod users;

pub use manufacturer::Entity as Manufacturers;
pub use product::Entity as Products;
pub use purchases::Entity as Purchases;
pub use reviews::Entity as Reviews;
pub use users::Entity as Users;
