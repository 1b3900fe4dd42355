//! Cloud DB for MySQL data sources

mod image_products;
mod products;

pub use image_products::{
    MysqlImageProductModel, MysqlImageProductsConfig, MysqlImageProductsDataSource, MysqlImageProductsState,
};
pub use products::{
    flatten_mysql_products, MysqlProductModel, MysqlProductsConfig, MysqlProductsDataSource, MysqlProductsState,
};
