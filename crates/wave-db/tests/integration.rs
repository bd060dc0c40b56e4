//! Offline unit tests for wave-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;
use wave_core::{AppConfig, Environment};
use wave_db::{AnnouncementRow, DrawerSettingsRow, PoolConfig, ProgressBarRow};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`DrawerSettingsRow`] has all
/// expected fields with the correct types. No database required.
#[test]
fn drawer_settings_row_has_expected_fields() {
    let row = DrawerSettingsRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        shop: "demo.myshopify.com".to_string(),
        is_enabled: true,
        position: "right".to_string(),
        width: 400_i32,
        background_color: "#ffffff".to_string(),
        text_color: "#000000".to_string(),
        close_button_color: "#000000".to_string(),
        show_trigger_button: true,
        open_on_cart_click: true,
        component_order: wave_core::drawer::default_component_order(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.id, 1);
    assert_eq!(row.position, "right");
    assert_eq!(row.component_order.len(), 4);
}

#[test]
fn progress_bar_row_carries_decimal_goal() {
    let row = ProgressBarRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        shop: "demo.myshopify.com".to_string(),
        is_enabled: true,
        title: "Almost there".to_string(),
        goal_amount: Decimal::new(10_000, 2), // 100.00
        goal_text: "Free Shipping".to_string(),
        background_color: "#e5e7eb".to_string(),
        progress_color: "#10b981".to_string(),
        text_color: "#000000".to_string(),
        show_percentage: true,
        show_amount: true,
        height: 20_i32,
        border_radius: 10_i32,
        display_order: 0_i32,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.goal_amount.to_string(), "100.00");
    assert_eq!(row.goal_text, "Free Shipping");
}

#[test]
fn announcement_row_optional_link_fields_default_to_none() {
    let row = AnnouncementRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        shop: "demo.myshopify.com".to_string(),
        is_enabled: false,
        title: "Summer sale".to_string(),
        message: "20% off this week".to_string(),
        background_color: "#f3f4f6".to_string(),
        text_color: "#000000".to_string(),
        font_size: 14_i32,
        font_weight: "normal".to_string(),
        link: None,
        link_text: None,
        display_order: 0_i32,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert!(row.link.is_none());
    assert!(row.link_text.is_none());
}
