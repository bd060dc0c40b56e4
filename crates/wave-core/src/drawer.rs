//! Drawer domain vocabulary: component ordering, merchant-facing defaults,
//! and parsing for the small closed enums the admin API accepts.

/// Canonical component ids, in default display order.
pub const DEFAULT_COMPONENT_ORDER: [&str; 4] =
    ["cart", "announcements", "progress", "recommendations"];

/// Default component order as owned strings, for row construction.
#[must_use]
pub fn default_component_order() -> Vec<String> {
    DEFAULT_COMPONENT_ORDER
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Which edge of the viewport the drawer slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Left,
    Right,
}

impl Position {
    /// Parse the admin-supplied value; only `left` and `right` are valid.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Position::Left),
            "right" => Some(Position::Right),
            _ => None,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Left => write!(f, "left"),
            Position::Right => write!(f, "right"),
        }
    }
}

/// Layout of the recommendation widget's product cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationLayout {
    Grid,
    List,
}

impl RecommendationLayout {
    /// Parse the admin-supplied value; only `grid` and `list` are valid.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "grid" => Some(RecommendationLayout::Grid),
            "list" => Some(RecommendationLayout::List),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecommendationLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationLayout::Grid => write!(f, "grid"),
            RecommendationLayout::List => write!(f, "list"),
        }
    }
}

/// Returns true for a `#rgb` or `#rrggbb` hex color literal.
#[must_use]
pub fn is_hex_color(s: &str) -> bool {
    let Some(digits) = s.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Merchant-facing defaults, mirrored by the column defaults in the schema.
/// Used to synthesize a response for shops that have never saved settings.
pub mod defaults {
    pub mod drawer {
        pub const POSITION: &str = "right";
        pub const WIDTH: i32 = 400;
        pub const BACKGROUND_COLOR: &str = "#ffffff";
        pub const TEXT_COLOR: &str = "#000000";
        pub const CLOSE_BUTTON_COLOR: &str = "#000000";
    }

    pub mod announcement {
        pub const BACKGROUND_COLOR: &str = "#f3f4f6";
        pub const TEXT_COLOR: &str = "#000000";
        pub const FONT_SIZE: i32 = 14;
        pub const FONT_WEIGHT: &str = "normal";
    }

    pub mod progress_bar {
        pub const GOAL_AMOUNT: &str = "100";
        pub const GOAL_TEXT: &str = "Free Shipping";
        pub const BACKGROUND_COLOR: &str = "#e5e7eb";
        pub const PROGRESS_COLOR: &str = "#10b981";
        pub const TEXT_COLOR: &str = "#000000";
        pub const HEIGHT: i32 = 20;
        pub const BORDER_RADIUS: i32 = 10;
    }

    pub mod recommendation {
        pub const TITLE: &str = "Recommended for you";
        pub const NUMBER_OF_PRODUCTS: i32 = 4;
        pub const LAYOUT: &str = "grid";
        pub const CARD_BACKGROUND_COLOR: &str = "#ffffff";
        pub const CARD_BORDER_RADIUS: i32 = 8;
        pub const TITLE_COLOR: &str = "#000000";
        pub const TITLE_FONT_SIZE: i32 = 16;
        pub const PRICE_COLOR: &str = "#000000";
        pub const PRICE_FONT_SIZE: i32 = 14;
        pub const BUTTON_BACKGROUND_COLOR: &str = "#000000";
        pub const BUTTON_TEXT_COLOR: &str = "#ffffff";
        pub const BUTTON_FONT_SIZE: i32 = 14;
        pub const DISPLAY_ORDER: i32 = 3;
    }
}
