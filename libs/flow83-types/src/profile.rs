use serde::{Deserialize, Serialize};

/// Mentor profile as returned by `GET /api/auth/user`.
///
/// Profile fields are optional because a freshly registered user has not
/// filled any of them in yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User ID assigned by the backend
    pub id: String,

    /// User's email address
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    /// Field of expertise (e.g., "leadership coaching")
    #[serde(default)]
    pub specialty: Option<String>,

    /// How the mentor works with participants
    #[serde(default)]
    pub methodology: Option<String>,

    /// Free-form differentiator. Never required.
    #[serde(default)]
    pub unique_approach: Option<String>,

    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// Profile fields that must be filled in before the app unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    FirstName,
    LastName,
    Specialty,
    Methodology,
}

impl ProfileField {
    /// Required fields in display order.
    pub const REQUIRED: [ProfileField; 4] = [
        ProfileField::FirstName,
        ProfileField::LastName,
        ProfileField::Specialty,
        ProfileField::Methodology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileField::FirstName => "firstName",
            ProfileField::LastName => "lastName",
            ProfileField::Specialty => "specialty",
            ProfileField::Methodology => "methodology",
        }
    }

    /// Returns the field's value on `profile`, treating whitespace-only as empty.
    pub fn value_in<'a>(&self, profile: &'a UserProfile) -> Option<&'a str> {
        let raw = match self {
            ProfileField::FirstName => profile.first_name.as_deref(),
            ProfileField::LastName => profile.last_name.as_deref(),
            ProfileField::Specialty => profile.specialty.as_deref(),
            ProfileField::Methodology => profile.methodology.as_deref(),
        };
        raw.map(str::trim).filter(|v| !v.is_empty())
    }
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
