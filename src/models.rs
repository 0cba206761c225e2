use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

pub type Id = i64;

/// Ingredient name -> price. Kept as raw JSON so numbers survive untouched.
pub type Prices = Map<String, Value>;

/// Keys a recipe update is allowed to replace, in merge order.
pub const MERGE_KEYS: [&str; 3] = ["name", "resources", "cat"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default = "empty_object")]
    pub prices: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>, // unknown top-level keys, written back as-is
}

fn empty_object() -> Value { Value::Object(Map::new()) }

impl Default for Document {
    fn default() -> Self {
        Self { recipes: Vec::new(), prices: empty_object(), extra: Map::new() }
    }
}

/// A stored recipe, kept exactly as it appears in the file (key order,
/// number forms, unknown fields). Entries without a usable numeric id load
/// fine and are simply never matched by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipe(pub Value);

impl Recipe {
    pub fn fields(&self) -> Option<&Map<String, Value>> { self.0.as_object() }
    pub fn get(&self, key: &str) -> Option<&Value> { self.fields().and_then(|f| f.get(key)) }
    pub fn id(&self) -> Option<&Value> { self.get("id") }
    pub fn name(&self) -> Option<&str> { self.get("name").and_then(Value::as_str) }
    pub fn cat(&self) -> Option<&str> { self.get("cat").and_then(Value::as_str) }
    pub fn resources(&self) -> Option<&Value> { self.get("resources") }

    /// Numeric equality, so a stored `3.0` matches id 3; strings never match.
    pub fn has_id(&self, id: Id) -> bool {
        match self.id() {
            Some(Value::Number(n)) => match n.as_i64() {
                Some(v) => v == id,
                None => n.as_f64() == Some(id as f64),
            },
            _ => false,
        }
    }

    /// Shallow merge: a key present in the patch is copied over even when
    /// its value is null or empty. Non-object entries are left alone.
    pub fn apply(&mut self, patch: &RecipePatch) {
        let Some(fields) = self.0.as_object_mut() else { return };
        for key in MERGE_KEYS {
            if let Some(v) = patch.0.get(key) {
                fields.insert(key.to_string(), v.clone());
            }
        }
    }
}

/// Body of `PUT /api/recipes/{id}`. Must be a JSON object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipePatch(pub Map<String, Value>);

/// Body of `POST /api/auth`. A missing or non-string `password` counts as
/// a wrong password rather than a malformed request.
#[derive(Debug, Default, ToSchema)]
pub struct AuthRequest {
    pub password: Option<String>,
}

impl AuthRequest {
    pub fn password(&self) -> &str { self.password.as_deref().unwrap_or_default() }
}

impl From<Map<String, Value>> for AuthRequest {
    fn from(body: Map<String, Value>) -> Self {
        Self { password: body.get("password").and_then(Value::as_str).map(str::to_owned) }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
