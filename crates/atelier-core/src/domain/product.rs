//! 商品入力と、そこから派生する生成物・出品結果

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::errors::ValidationError;
use super::ids::ProductId;

/// 商品を出品できる販売先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Pod,
    Website,
    Marketplace,
    SocialCommerce,
    Woocommerce,
    Printify,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Pod,
        Channel::Website,
        Channel::Marketplace,
        Channel::SocialCommerce,
        Channel::Woocommerce,
        Channel::Printify,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Pod => "pod",
            Channel::Website => "website",
            Channel::Marketplace => "marketplace",
            Channel::SocialCommerce => "social_commerce",
            Channel::Woocommerce => "woocommerce",
            Channel::Printify => "printify",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 呼び出し側が商品化したい内容
///
/// # 検証
/// - 文字列長は文字数（バイト数ではない）で数える
/// - `target_channels` は 1 件以上かつ重複なし
/// - `base_price` は有限かつ 0 より大きい
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub title: String,
    pub niche: String,
    pub style_prompt: String,

    /// 出品先チャネル（指定順、重複なし）
    pub target_channels: Vec<Channel>,

    pub base_price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_url: Option<Url>,

    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ProductInput {
    pub const TITLE_LEN: (usize, usize) = (3, 160);
    pub const NICHE_LEN: (usize, usize) = (2, 120);
    pub const STYLE_PROMPT_LEN: (usize, usize) = (10, 1200);

    /// 必須フィールドのみのコンストラクタ。任意フィールドは空で始まる
    pub fn new(
        title: impl Into<String>,
        niche: impl Into<String>,
        style_prompt: impl Into<String>,
        target_channels: Vec<Channel>,
        base_price: f64,
    ) -> Self {
        Self {
            title: title.into(),
            niche: niche.into(),
            style_prompt: style_prompt.into(),
            target_channels,
            base_price,
            destination_url: None,
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_destination_url(mut self, url: Url) -> Self {
        self.destination_url = Some(url);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_length("title", &self.title, Self::TITLE_LEN)?;
        check_length("niche", &self.niche, Self::NICHE_LEN)?;
        check_length("style_prompt", &self.style_prompt, Self::STYLE_PROMPT_LEN)?;

        if self.target_channels.is_empty() {
            return Err(ValidationError::new(
                "target_channels",
                "at least one channel is required",
            ));
        }
        let mut seen = HashSet::with_capacity(self.target_channels.len());
        if let Some(dup) = self.target_channels.iter().find(|c| !seen.insert(**c)) {
            return Err(ValidationError::new(
                "target_channels",
                format!("target_channels must be unique ({dup} listed twice)"),
            ));
        }

        if !self.base_price.is_finite() || self.base_price <= 0.0 {
            return Err(ValidationError::new(
                "base_price",
                "must be greater than 0",
            ));
        }

        if let Some(url) = &self.destination_url
            && !matches!(url.scheme(), "http" | "https")
        {
            return Err(ValidationError::new(
                "destination_url",
                format!("unsupported scheme {:?}", url.scheme()),
            ));
        }
        Ok(())
    }
}

/// 文字数が範囲内か検証（両端を含む）
pub(crate) fn check_length(
    field: &'static str,
    value: &str,
    (min, max): (usize, usize),
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::new(
            field,
            format!("length must be between {min} and {max} characters (got {len})"),
        ));
    }
    Ok(())
}

/// DesignEngine の生成物。生成後は変更しない
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedProduct {
    pub product_id: ProductId,
    pub title: String,
    pub design_url: String,
    pub variants: Vec<String>,
    pub base_price: f64,
}

/// 1 チャネルへの出品成功結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub channel: Channel,
    pub listing_id: String,
    pub status: String,
    pub listing_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn valid() -> ProductInput {
        ProductInput::new(
            "Geometric Fox Tee",
            "animals",
            "Minimal geometric fox artwork with warm tones.",
            vec![Channel::Pod, Channel::Website],
            21.0,
        )
    }

    #[test]
    fn valid_input_passes() {
        assert!(valid().validate().is_ok());
    }

    #[rstest]
    #[case::short_title(|p: &mut ProductInput| p.title = "ab".into(), "title")]
    #[case::long_title(|p: &mut ProductInput| p.title = "x".repeat(161), "title")]
    #[case::short_niche(|p: &mut ProductInput| p.niche = "a".into(), "niche")]
    #[case::short_prompt(|p: &mut ProductInput| p.style_prompt = "too short".into(), "style_prompt")]
    #[case::no_channels(|p: &mut ProductInput| p.target_channels.clear(), "target_channels")]
    #[case::duplicate_channel(
        |p: &mut ProductInput| p.target_channels.push(Channel::Pod),
        "target_channels"
    )]
    #[case::zero_price(|p: &mut ProductInput| p.base_price = 0.0, "base_price")]
    #[case::nan_price(|p: &mut ProductInput| p.base_price = f64::NAN, "base_price")]
    #[case::ftp_url(
        |p: &mut ProductInput| p.destination_url = Some(Url::parse("ftp://x.example").unwrap()),
        "destination_url"
    )]
    fn invalid_input_names_the_field(
        #[case] mutate: fn(&mut ProductInput),
        #[case] field: &str,
    ) {
        let mut input = valid();
        mutate(&mut input);
        let err = input.validate().unwrap_err();
        assert_eq!(err.field(), field);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let mut input = valid();
        input.title = "ééé".into();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn channel_uses_snake_case_on_the_wire() {
        let json = serde_json::to_string(&Channel::SocialCommerce).unwrap();
        assert_eq!(json, "\"social_commerce\"");
        assert_eq!(Channel::SocialCommerce.to_string(), "social_commerce");
    }

    #[test]
    fn metadata_and_destination_default_when_absent() {
        let json = r#"{
            "title": "Botanical Hoodie",
            "niche": "nature",
            "style_prompt": "Bold botanical design for hoodie print.",
            "target_channels": ["pod"],
            "base_price": 29.99
        }"#;
        let input: ProductInput = serde_json::from_str(json).unwrap();
        assert!(input.destination_url.is_none());
        assert!(input.metadata.is_empty());
    }
}
