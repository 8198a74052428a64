table! {
    affiliates (id) {
        id -> Uuid,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        user_id -> Varchar,
        referral_code -> Varchar,
        commission_rate -> Numeric,
        total_referrals -> Int4,
        total_earnings -> Numeric,
        available_balance -> Numeric,
        status -> Int2,
    }
}

table! {
    challenge_pricing (id) {
        id -> Uuid,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        challenge_type_id -> Uuid,
        account_size -> Numeric,
        price -> Numeric,
    }
}

table! {
    challenge_types (id) {
        id -> Uuid,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        code -> Varchar,
        display_name -> Varchar,
        description -> Nullable<Varchar>,
    }
}

table! {
    coupons (id) {
        id -> Uuid,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        code -> Varchar,
        discount_percent -> Int4,
        is_active -> Bool,
        expires_at -> Nullable<Timestamp>,
        max_uses -> Nullable<Int4>,
        used_count -> Int4,
        challenge_type -> Varchar,
    }
}

table! {
    monitoring_logs (id) {
        id -> Uuid,
        created_at -> Timestamp,
        challenge_id -> Uuid,
        log_type -> Varchar,
        message -> Varchar,
    }
}

table! {
    mt5_account_snapshots (id) {
        id -> Uuid,
        created_at -> Timestamp,
        challenge_id -> Uuid,
        balance -> Numeric,
        equity -> Numeric,
        daily_pnl -> Numeric,
        total_pnl -> Numeric,
        is_latest -> Bool,
    }
}

table! {
    mt5_accounts (id) {
        id -> Uuid,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        user_id -> Varchar,
        challenge_id -> Uuid,
        account_number -> Varchar,
        password -> Varchar,
        server -> Varchar,
        balance -> Numeric,
        equity -> Numeric,
        status -> Int2,
    }
}

table! {
    mt5_analytics_cache (id) {
        id -> Uuid,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        challenge_id -> Uuid,
        starting_balance -> Numeric,
        current_balance -> Numeric,
        current_equity -> Numeric,
        total_pnl -> Numeric,
        challenge_status -> Varchar,
        is_valid -> Bool,
    }
}

table! {
    notifications (id) {
        id -> Uuid,
        created_at -> Timestamp,
        user_id -> Varchar,
        title -> Varchar,
        message -> Varchar,
        kind -> Varchar,
        is_read -> Bool,
    }
}

table! {
    payouts (id) {
        id -> Uuid,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        affiliate_id -> Uuid,
        amount -> Numeric,
        status -> Int2,
    }
}

table! {
    referrals (id) {
        id -> Uuid,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        affiliate_id -> Uuid,
        referred_user_id -> Varchar,
        status -> Int2,
        purchase_amount -> Nullable<Numeric>,
        commission_amount -> Nullable<Numeric>,
    }
}

table! {
    rule_violations (id) {
        id -> Uuid,
        created_at -> Timestamp,
        challenge_id -> Uuid,
        rule -> Varchar,
        severity -> Int2,
        description -> Nullable<Varchar>,
        resolved -> Bool,
    }
}

table! {
    support_tickets (id) {
        id -> Uuid,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        user_id -> Varchar,
        subject -> Varchar,
        status -> Int2,
    }
}

table! {
    ticket_messages (id) {
        id -> Uuid,
        created_at -> Timestamp,
        ticket_id -> Uuid,
        sender_id -> Varchar,
        body -> Varchar,
        from_support -> Bool,
    }
}

table! {
    user_challenges (id) {
        id -> Uuid,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        user_id -> Varchar,
        challenge_type_id -> Uuid,
        account_size -> Numeric,
        amount_paid -> Numeric,
        status -> Int2,
        current_phase -> Int4,
        phase_one_completed -> Bool,
        phase_two_completed -> Bool,
        trading_account_number -> Nullable<Varchar>,
        trading_account_password -> Nullable<Varchar>,
        trading_server -> Nullable<Varchar>,
        credentials_sent -> Bool,
        purchase_date -> Timestamp,
        start_date -> Nullable<Timestamp>,
        admin_note -> Nullable<Varchar>,
    }
}

table! {
    user_profiles (id) {
        id -> Uuid,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        user_id -> Varchar,
        email -> Varchar,
        first_name -> Nullable<Varchar>,
        last_name -> Nullable<Varchar>,
        friendly_id -> Nullable<Varchar>,
    }
}

joinable!(challenge_pricing -> challenge_types (challenge_type_id));
joinable!(payouts -> affiliates (affiliate_id));
joinable!(referrals -> affiliates (affiliate_id));
joinable!(ticket_messages -> support_tickets (ticket_id));
joinable!(user_challenges -> challenge_types (challenge_type_id));

allow_tables_to_appear_in_same_query!(
    affiliates,
    challenge_pricing,
    challenge_types,
    coupons,
    monitoring_logs,
    mt5_account_snapshots,
    mt5_accounts,
    mt5_analytics_cache,
    notifications,
    payouts,
    referrals,
    rule_violations,
    support_tickets,
    ticket_messages,
    user_challenges,
    user_profiles,
);
