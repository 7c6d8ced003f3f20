use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ScriptError;
use crate::segment::{RawId, RawSegment, Segment};

pub const DEFAULT_TITLE: &str = "Adventure";

#[derive(Debug, Deserialize)]
struct RawScript {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    start: Option<RawId>,
    #[serde(default)]
    segments: Option<Value>,
}

/// All segments of one script, normalized to an id -> segment graph.
/// Built once at load time and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ScriptGraph {
    title: String,
    start_id: String,
    is_linear: bool,
    total_count: usize,
    order: Vec<String>,
    segments: HashMap<String, Segment>,
}

impl ScriptGraph {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        log::info!("Loading script from {:?}", path);
        let source = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let graph = Self::from_json_str(&source)?;
        log::info!(
            "Script '{}' loaded: {} segments ({})",
            graph.title,
            graph.total_count,
            if graph.is_linear { "linear" } else { "graph" }
        );
        Ok(graph)
    }

    /// Never fails: an unreadable or malformed script becomes a single inert
    /// segment whose text reports the problem.
    pub fn load_or_fallback(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            log::error!("Script {:?} failed to load: {}", path, e);
            Self::error_graph(&format!("Failed to load script: {}", e))
        })
    }

    pub fn error_graph(message: &str) -> Self {
        let segment = Segment::text_only("0", message);
        let mut segments = HashMap::new();
        segments.insert("0".to_string(), segment);
        Self {
            title: DEFAULT_TITLE.to_string(),
            start_id: "0".to_string(),
            is_linear: true,
            total_count: 1,
            order: vec!["0".to_string()],
            segments,
        }
    }

    pub fn from_json_str(source: &str) -> Result<Self, ScriptError> {
        let raw: RawScript = serde_json::from_str(source)?;
        let title = raw.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let start = raw.start.map(RawId::into_string);

        match raw.segments.unwrap_or(Value::Array(Vec::new())) {
            Value::Array(items) => Self::from_sequence(title, start, items),
            Value::Object(map) => Self::from_mapping(title, start, map),
            other => Err(ScriptError::shape(format!(
                "`segments` must be a list or an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    fn from_sequence(title: String, start: Option<String>, items: Vec<Value>) -> Result<Self, ScriptError> {
        let total = items.len();
        let mut order = Vec::with_capacity(total);
        let mut segments = HashMap::with_capacity(total);

        for (i, item) in items.into_iter().enumerate() {
            let raw: RawSegment = serde_json::from_value(item)
                .map_err(|e| ScriptError::shape(format!("segment {}: {}", i, e)))?;
            // 只有既没有 next 也没有 choices 字段时才补隐式连线
            let implicit_next = if raw.next.is_none() && raw.choices.is_none() && i + 1 < total {
                Some((i + 1).to_string())
            } else {
                None
            };
            let id = i.to_string();
            order.push(id.clone());
            segments.insert(id.clone(), raw.into_segment(id, implicit_next));
        }

        Ok(Self {
            title,
            start_id: start.unwrap_or_else(|| "0".to_string()),
            is_linear: true,
            total_count: total,
            order,
            segments,
        })
    }

    fn from_mapping(
        title: String,
        start: Option<String>,
        map: serde_json::Map<String, Value>,
    ) -> Result<Self, ScriptError> {
        let total = map.len();
        let mut order = Vec::with_capacity(total);
        let mut segments = HashMap::with_capacity(total);

        for (key, item) in map {
            let raw: RawSegment = serde_json::from_value(item)
                .map_err(|e| ScriptError::shape(format!("segment '{}': {}", key, e)))?;
            order.push(key.clone());
            segments.insert(key.clone(), raw.into_segment(key, None));
        }

        let start_id = start
            .or_else(|| order.first().cloned())
            .unwrap_or_default();

        Ok(Self {
            title,
            start_id,
            is_linear: false,
            total_count: total,
            order,
            segments,
        })
    }

    pub fn get(&self, id: &str) -> Option<&Segment> {
        self.segments.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.segments.contains_key(id)
    }

    /// Segment ids in source order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start_id(&self) -> &str {
        &self.start_id
    }

    pub fn is_linear(&self) -> bool {
        self.is_linear
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }
}

/// Title and size of a script file, read without building the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptSummary {
    pub title: String,
    pub segment_count: usize,
}

impl ScriptSummary {
    pub fn peek(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&source)?;
        let title = value
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_TITLE)
            .to_string();
        let segment_count = match value.get("segments") {
            Some(Value::Array(items)) => items.len(),
            Some(Value::Object(map)) => map.len(),
            _ => 0,
        };
        Ok(Self { title, segment_count })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
