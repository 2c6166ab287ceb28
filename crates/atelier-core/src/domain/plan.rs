//! 収益化プランと、成功したワークフローの集約結果

use serde::{Deserialize, Serialize};

use super::ids::WorkflowId;
use super::product::{GeneratedProduct, PublishResult};
use super::social::SocialPostResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenuePlan {
    #[serde(default = "enabled")]
    pub upsell_enabled: bool,

    #[serde(default = "enabled")]
    pub bundle_enabled: bool,

    #[serde(default)]
    pub ad_campaign_seed_keywords: Vec<String>,
}

fn enabled() -> bool {
    true
}

impl RevenuePlan {
    /// 決定的なプラン: アップセル・バンドルを有効化し、広告キーワードは niche → title の順
    pub fn seeded(niche: &str, title: &str) -> Self {
        Self {
            upsell_enabled: true,
            bundle_enabled: true,
            ad_campaign_seed_keywords: vec![niche.to_string(), title.to_string()],
        }
    }
}

/// 完了したワークフローが生み出したものすべて
///
/// 出品結果・投稿結果はリクエストの指定順に並ぶ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationResult {
    pub workflow_id: WorkflowId,
    pub generated_product: GeneratedProduct,
    pub channel_publications: Vec<PublishResult>,
    #[serde(default)]
    pub social_posts: Vec<SocialPostResult>,
    pub revenue_plan: RevenuePlan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_plan_orders_niche_before_title() {
        let plan = RevenuePlan::seeded("animals", "Geometric Fox Tee");
        assert!(plan.upsell_enabled);
        assert!(plan.bundle_enabled);
        assert_eq!(plan.ad_campaign_seed_keywords, ["animals", "Geometric Fox Tee"]);
    }

    #[test]
    fn flags_default_to_enabled() {
        let plan: RevenuePlan = serde_json::from_str("{}").unwrap();
        assert!(plan.upsell_enabled && plan.bundle_enabled);
        assert!(plan.ad_campaign_seed_keywords.is_empty());
    }
}
