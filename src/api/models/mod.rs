pub mod account;
pub mod affiliate;
pub mod challenge;
pub mod common;
pub mod coupon;
pub mod error;
pub mod notification;
pub mod support;
pub mod user;
