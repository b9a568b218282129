//! Chowcart
//!
//! Headless client core for a food-ordering app: a single-restaurant cart
//! with durable snapshots, a checkout flow, and order-status polling over
//! a bearer-authenticated REST backend.

pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod context;
pub mod orders;
pub mod prices;
pub mod storage;
