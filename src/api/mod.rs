pub mod accounts;
pub mod affiliates;
pub mod challenges;
pub mod email;
pub mod health;
pub mod models;
pub mod notifications;
pub mod support;
pub mod users;
