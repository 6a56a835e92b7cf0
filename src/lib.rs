pub mod cache;
pub mod config;
pub mod database;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod models;
pub mod password;
pub mod response;
pub mod routes;
pub mod sanitize;
pub mod services;
pub mod state;
