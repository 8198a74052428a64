pub mod affiliate;
pub mod challenge_pricing;
pub mod challenge_type;
pub mod coupon;
pub mod monitoring_log;
pub mod mt5_account;
pub mod mt5_account_snapshot;
pub mod mt5_analytics_cache;
pub mod notification;
pub mod pagination;
pub mod payout;
pub mod referral;
pub mod rule_violation;
pub mod support_ticket;
pub mod ticket_message;
pub mod user_challenge;
pub mod user_profile;
