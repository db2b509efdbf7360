//! Static pricing plans (display data, no CRUD).

use serde::Serialize;

/// A credit bundle offered on the pricing page.
#[derive(Debug, Clone, Serialize)]
pub struct PricingPlan {
    pub id: &'static str,
    pub name: &'static str,
    /// Price in VND
    pub price: u64,
    /// Character credits granted
    pub credits: u64,
    pub features: &'static [&'static str],
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub popular: bool,
}

/// The three plans shown by the storefront.
pub const PRICING_PLANS: &[PricingPlan] = &[
    PricingPlan {
        id: "plan_starter",
        name: "Khởi đầu",
        price: 99_000,
        credits: 100_000,
        features: &["100,000 ký tự", "Giọng nói cơ bản", "Hỗ trợ email"],
        popular: false,
    },
    PricingPlan {
        id: "plan_pro",
        name: "Chuyên nghiệp",
        price: 249_000,
        credits: 500_000,
        features: &[
            "500,000 ký tự",
            "Giọng nói cao cấp",
            "API Access",
            "Hỗ trợ ưu tiên",
        ],
        popular: true,
    },
    PricingPlan {
        id: "plan_business",
        name: "Doanh nghiệp",
        price: 799_000,
        credits: 2_000_000,
        features: &[
            "2,000,000 ký tự",
            "Tất cả giọng nói",
            "Tùy chỉnh giọng",
            "Quản lý nhóm",
        ],
        popular: false,
    },
];
