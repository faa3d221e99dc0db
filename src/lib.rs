//! Storefront core: a validated shopping cart, auto-saved draft sessions and
//! the booking/checkout review flows, plus the axum API that stores drafts
//! and accepts reservations and orders.

pub mod audit;
pub mod cart;
pub mod client;
pub mod config;
pub mod db;
pub mod drafts;
pub mod dto;
pub mod entity;
pub mod error;
pub mod flow;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
