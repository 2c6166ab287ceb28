//! SNS 宣伝: 投稿先プラットフォーム、キャプションテンプレート、投稿結果

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::ValidationError;
use super::product::check_length;

/// 商品を宣伝できる SNS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialPlatform {
    Instagram,
    Facebook,
    Pinterest,
    X,
    Tiktok,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 5] = [
        SocialPlatform::Instagram,
        SocialPlatform::Facebook,
        SocialPlatform::Pinterest,
        SocialPlatform::X,
        SocialPlatform::Tiktok,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SocialPlatform::Instagram => "instagram",
            SocialPlatform::Facebook => "facebook",
            SocialPlatform::Pinterest => "pinterest",
            SocialPlatform::X => "x",
            SocialPlatform::Tiktok => "tiktok",
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_CAPTION_TEMPLATE: &str = "{title} now live. Shop now: {listing_url}";

fn default_caption_template() -> String {
    DEFAULT_CAPTION_TEMPLATE.to_string()
}

/// どこに投稿し、何を書くか
///
/// テンプレートの規則は [`SocialPostRequest::render_caption`] を参照。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPostRequest {
    #[serde(default)]
    pub platforms: Vec<SocialPlatform>,

    #[serde(default = "default_caption_template")]
    pub caption_template: String,

    #[serde(default)]
    pub hashtags: Vec<String>,
}

impl Default for SocialPostRequest {
    fn default() -> Self {
        Self {
            platforms: Vec::new(),
            caption_template: default_caption_template(),
            hashtags: Vec::new(),
        }
    }
}

impl SocialPostRequest {
    pub const CAPTION_TEMPLATE_LEN: (usize, usize) = (10, 500);
    pub const MAX_HASHTAGS: usize = 20;

    pub fn new(platforms: Vec<SocialPlatform>) -> Self {
        Self {
            platforms,
            ..Self::default()
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.caption_template = template.into();
        self
    }

    pub fn with_hashtags<I, S>(mut self, hashtags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hashtags = hashtags.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_length(
            "caption_template",
            &self.caption_template,
            Self::CAPTION_TEMPLATE_LEN,
        )?;
        if self.hashtags.len() > Self::MAX_HASHTAGS {
            return Err(ValidationError::new(
                "hashtags",
                format!(
                    "at most {} hashtags are allowed (got {})",
                    Self::MAX_HASHTAGS,
                    self.hashtags.len()
                ),
            ));
        }
        Ok(())
    }

    /// テンプレートを埋め、ハッシュタグを半角スペース区切りで末尾に付ける
    ///
    /// # 置換規則
    /// - `{title}` / `{listing_url}` だけがプレースホルダー
    /// - `{{` と `}}` はそれぞれ `{` / `}` にエスケープされる
    /// - それ以外の波括弧はそのまま残す
    /// - 1 パスで走査するため、`title` や `listing_url` の中身が再解釈されることはない
    pub fn render_caption(&self, title: &str, listing_url: &str) -> String {
        let mut caption = String::with_capacity(self.caption_template.len() + listing_url.len());
        let mut rest = self.caption_template.as_str();
        while let Some(start) = rest.find(['{', '}']) {
            caption.push_str(&rest[..start]);
            let tail = &rest[start..];
            if let Some(after) = tail.strip_prefix("{{") {
                caption.push('{');
                rest = after;
            } else if let Some(after) = tail.strip_prefix("}}") {
                caption.push('}');
                rest = after;
            } else if let Some(after) = tail.strip_prefix("{title}") {
                caption.push_str(title);
                rest = after;
            } else if let Some(after) = tail.strip_prefix("{listing_url}") {
                caption.push_str(listing_url);
                rest = after;
            } else {
                caption.push_str(&tail[..1]);
                rest = &tail[1..];
            }
        }
        caption.push_str(rest);

        if !self.hashtags.is_empty() {
            caption.push(' ');
            caption.push_str(&self.hashtags.join(" "));
        }
        caption
    }
}

/// SNS に渡した 1 件の投稿
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPostResult {
    pub platform: SocialPlatform,
    pub status: String,
    pub post_id: String,
}
