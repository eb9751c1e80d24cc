use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of an [`Action`]. The backend sends either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionId::Number(n) => write!(f, "{n}"),
            ActionId::Text(s) => f.write_str(s),
        }
    }
}

/// Lifecycle status of an [`Action`].
///
/// The backend is inconsistent here too: `"active"`, `"1"`, `1`, `true` and the Spanish
/// `"activo"` all mean active. Anything unrecognised is kept verbatim in [`ActionStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ActionStatus {
    Active,
    Inactive,
    Deleted,
    Other(String),
}

impl ActionStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "active" | "activo" | "1" | "true" => ActionStatus::Active,
            "inactive" | "inactivo" | "0" | "false" => ActionStatus::Inactive,
            "deleted" | "eliminado" => ActionStatus::Deleted,
            _ => ActionStatus::Other(raw.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ActionStatus::Active => "Active",
            ActionStatus::Inactive => "Inactive",
            ActionStatus::Deleted => "Deleted",
            ActionStatus::Other(raw) => raw,
        }
    }
}

impl Default for ActionStatus {
    fn default() -> Self {
        ActionStatus::Other(String::new())
    }
}

impl<'de> Deserialize<'de> for ActionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
            Flag(bool),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Text(s)) => ActionStatus::parse(&s),
            Some(Raw::Number(n)) => ActionStatus::parse(&n.to_string()),
            Some(Raw::Flag(b)) => ActionStatus::parse(&b.to_string()),
            None => ActionStatus::default(),
        })
    }
}

/// Decodes an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One administrable action (category) as returned by the listing endpoint.
///
/// Items are never edited locally: the list only changes by re-fetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: ActionId,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub status: ActionStatus,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Action {
    /// The image to show for this action: `imageUrl`, then `logo`, then `icon`.
    pub fn icon_ref(&self) -> Option<&str> {
        [&self.image_url, &self.logo, &self.icon]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .find(|v| !v.is_empty())
    }

    /// Case-insensitive substring match on name or description.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }
}

/// Binary attachment uploaded as the `icon` multipart field.
#[derive(Clone, PartialEq)]
pub struct IconFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for IconFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Payload for creating a new action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionForm {
    pub name: String,
    pub description: String,
    pub color: Option<String>,
    pub is_active: bool,
    pub icon: Option<IconFile>,
}

impl ActionForm {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            color: None,
            is_active: true,
            icon: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn with_icon(mut self, icon: IconFile) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Wire encoding of the status field.
    pub fn status_field(&self) -> &'static str {
        if self.is_active {
            "1"
        } else {
            "0"
        }
    }

    /// The color as submitted: trimmed, `#`-prefixed, absent when blank.
    pub fn normalized_color(&self) -> Option<String> {
        let color = self.color.as_deref()?.trim();
        if color.is_empty() {
            None
        } else if color.starts_with('#') {
            Some(color.to_string())
        } else {
            Some(format!("#{color}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_decodes_numeric_id_and_status() {
        let action: Action = serde_json::from_value(json!({
            "id": 7,
            "name": "Recycle",
            "description": "Sort the trash",
            "status": 1,
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(action.id, ActionId::Number(7));
        assert_eq!(action.status, ActionStatus::Active);
        assert_eq!(action.id.to_string(), "7");
        assert!(action.icon_ref().is_none());
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let action: Action = serde_json::from_value(json!({
            "id": 3,
            "name": null,
            "description": null,
            "status": null,
            "createdAt": null
        }))
        .unwrap();

        assert_eq!(action.name, "");
        assert_eq!(action.description, "");
        assert_eq!(action.created_at, "");
        assert_eq!(action.status, ActionStatus::default());
    }

    #[test]
    fn test_missing_name_is_still_rejected() {
        let decoded = serde_json::from_value::<Action>(json!({ "id": 3 }));
        assert!(decoded.is_err());
    }

    #[test]
    fn test_status_keeps_unknown_values() {
        assert_eq!(ActionStatus::parse("Inactivo"), ActionStatus::Inactive);
        assert_eq!(ActionStatus::parse("eliminado"), ActionStatus::Deleted);
        let other = ActionStatus::parse("pending");
        assert_eq!(other.label(), "pending");
    }

    #[test]
    fn test_icon_ref_prefers_image_url() {
        let action: Action = serde_json::from_value(json!({
            "id": "a1",
            "name": "Plant",
            "icon": "icon.png",
            "logo": "",
            "imageUrl": "https://cdn/x.png"
        }))
        .unwrap();
        assert_eq!(action.icon_ref(), Some("https://cdn/x.png"));
    }

    #[test]
    fn test_form_encodes_status_and_color() {
        let form = ActionForm::new("Donate", "Give to the food bank").with_color("1e3a5f");
        assert_eq!(form.status_field(), "1");
        assert_eq!(form.normalized_color().as_deref(), Some("#1e3a5f"));

        let form = form.inactive().with_color("  ");
        assert_eq!(form.status_field(), "0");
        assert_eq!(form.normalized_color(), None);
    }
}
