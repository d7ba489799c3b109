//! Consumer-facing blog category.
//!
//! The consumer UI groups posts by a Vietnamese slug (`y-te`, `suc-khoe`,
//! `thuoc`) where the admin side uses [`BlogPostType`].

use serde::{Deserialize, Serialize};

use crate::domain::entities::BlogPostType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConsumerCategory {
    #[default]
    #[serde(rename = "y-te")]
    YTe,
    #[serde(rename = "suc-khoe")]
    SucKhoe,
    #[serde(rename = "thuoc")]
    Thuoc,
}

impl ConsumerCategory {
    /// Unknown values fall back to `y-te`.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "suc-khoe" => Self::SucKhoe,
            "thuoc" => Self::Thuoc,
            _ => Self::YTe,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::YTe => "y-te",
            Self::SucKhoe => "suc-khoe",
            Self::Thuoc => "thuoc",
        }
    }

    /// Admin type this category filters on.
    pub fn to_post_type(self) -> BlogPostType {
        match self {
            Self::YTe => BlogPostType::Health,
            Self::SucKhoe => BlogPostType::Wellness,
            Self::Thuoc => BlogPostType::Medicine,
        }
    }

    /// Types without a consumer counterpart are shown as `y-te`.
    pub fn from_post_type(post_type: BlogPostType) -> Self {
        match post_type {
            BlogPostType::Wellness => Self::SucKhoe,
            BlogPostType::Medicine => Self::Thuoc,
            _ => Self::YTe,
        }
    }
}

impl std::fmt::Display for ConsumerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
