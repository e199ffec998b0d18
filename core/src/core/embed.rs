use serde::{Deserialize, Serialize};

/// Embed color for ratings A and B.
pub const COLOR_GOOD: u32 = 0x609f43;
/// Embed color for rating C.
pub const COLOR_WARN: u32 = 0xffa200;
/// Embed color for ratings D and E.
pub const COLOR_BAD: u32 = 0xf2462c;

/// Chat embed as understood by the host client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    pub fields: Vec<EmbedField>,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Embed {
    pub fn rich(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            color: None,
            fields: Vec::new(),
            kind: "rich".to_string(),
        }
    }

    pub fn push_field(&mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
    }

    pub fn field(&self, name: &str) -> Option<&EmbedField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Maps the overall letter grade onto an embed color.
/// Unknown grades leave the embed uncolored.
pub fn rating_color(rating: &str) -> Option<u32> {
    match rating {
        "A" | "B" => Some(COLOR_GOOD),
        "C" => Some(COLOR_WARN),
        "D" | "E" => Some(COLOR_BAD),
        _ => None,
    }
}
