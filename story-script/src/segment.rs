use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const DEFAULT_SPEAKER: &str = "narrator";
pub const DEFAULT_SPEED_MS: u64 = 30;

/// Text presentation effect of a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum EffectKind {
    #[default]
    FadeIn,
    Typewriter,
    Shake,
    Wave,
}

impl EffectKind {
    /// 大小写不敏感，未知名字回退到 fadein
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "typewriter" => EffectKind::Typewriter,
            "shake" => EffectKind::Shake,
            "wave" => EffectKind::Wave,
            _ => EffectKind::FadeIn,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::FadeIn => "fadein",
            EffectKind::Typewriter => "typewriter",
            EffectKind::Shake => "shake",
            EffectKind::Wave => "wave",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct BackgroundSpec {
    pub image: Option<String>,
    /// Lower-cased effect tags collected from `effects` and `effect`.
    pub tags: BTreeSet<String>,
    pub fade_ms: Option<f64>,
    pub shake_ms: Option<f64>,
    pub shake_strength: Option<i64>,
}

impl BackgroundSpec {
    pub fn wants_fade(&self) -> bool {
        self.tags.contains("fade") || self.tags.contains("fadein")
    }

    pub fn wants_shake(&self) -> bool {
        self.tags.contains("shake")
    }

    /// Lenient reading of a `background` value: anything that is not an
    /// object yields `None`, odd field types are skipped.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let image = obj
            .get("image")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let mut tags = BTreeSet::new();
        match obj.get("effects") {
            Some(Value::String(s)) => {
                tags.insert(s.to_lowercase());
            }
            Some(Value::Array(items)) => {
                for item in items {
                    let tag = match item {
                        Value::String(s) => s.to_lowercase(),
                        other => other.to_string().to_lowercase(),
                    };
                    tags.insert(tag);
                }
            }
            _ => {}
        }
        if let Some(Value::String(single)) = obj.get("effect") {
            tags.insert(single.to_lowercase());
        }

        Some(Self {
            image,
            tags,
            fade_ms: obj.get("fade_ms").and_then(Value::as_f64),
            shake_ms: obj.get("shake_ms").and_then(Value::as_f64),
            shake_strength: obj.get("shake_strength").and_then(|v| {
                v.as_i64().or_else(|| v.as_f64().map(|f| f as i64))
            }),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Choice {
    pub label: String,
    pub next: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub id: String,
    pub text: String,
    pub effect: EffectKind,
    pub speed_ms: u64,
    pub background: Option<BackgroundSpec>,
    pub character_image: Option<String>,
    pub speaker: String,
    pub next: Option<String>,
    pub choices: Vec<Choice>,
}

impl Segment {
    pub fn text_only(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            effect: EffectKind::FadeIn,
            speed_ms: DEFAULT_SPEED_MS,
            background: None,
            character_image: None,
            speaker: DEFAULT_SPEAKER.to_string(),
            next: None,
            choices: Vec::new(),
        }
    }

    /// 有选项时选项优先，`next` 不再生效
    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }

    pub fn next_id(&self) -> Option<&str> {
        if self.has_choices() {
            None
        } else {
            self.next.as_deref()
        }
    }
}

/// Segment id as written in the source: string or number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    pub(crate) fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawChoice {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    next: Option<RawId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSegment {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    effect: Option<String>,
    #[serde(default)]
    speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_background")]
    background: Option<BackgroundSpec>,
    #[serde(default)]
    character_image: Option<String>,
    #[serde(default)]
    speaker: Option<String>,
    #[serde(default)]
    pub(crate) next: Option<RawId>,
    #[serde(default)]
    pub(crate) choices: Option<Vec<RawChoice>>,
}

impl RawSegment {
    pub(crate) fn into_segment(self, id: String, implicit_next: Option<String>) -> Segment {
        let speed_ms = self
            .speed
            .map(|s| if s.is_finite() && s >= 1.0 { s as u64 } else { 1 })
            .unwrap_or(DEFAULT_SPEED_MS);

        let choices = self
            .choices
            .unwrap_or_default()
            .into_iter()
            .map(|c| Choice {
                label: c.label.unwrap_or_default(),
                next: c.next.map(RawId::into_string).unwrap_or_default(),
            })
            .collect();

        Segment {
            id,
            text: self.text.unwrap_or_default(),
            effect: self.effect.as_deref().map(EffectKind::parse).unwrap_or_default(),
            speed_ms,
            background: self.background,
            character_image: self.character_image.filter(|s| !s.is_empty()),
            speaker: self.speaker.unwrap_or_else(|| DEFAULT_SPEAKER.to_string()),
            next: self.next.map(RawId::into_string).or(implicit_next),
            choices,
        }
    }
}

fn lenient_background<'de, D>(deserializer: D) -> Result<Option<BackgroundSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let spec = BackgroundSpec::from_value(&value);
    if spec.is_none() && !value.is_null() {
        log::warn!("Ignoring background that is not an object: {}", value);
    }
    Ok(spec)
}
