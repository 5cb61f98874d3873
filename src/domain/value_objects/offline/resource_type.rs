use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Messages,
    Documents,
    Appointments,
    Notes,
    Assessments,
    CrisisPlans,
}

impl ResourceType {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceType::Messages => "messages",
            ResourceType::Documents => "documents",
            ResourceType::Appointments => "appointments",
            ResourceType::Notes => "notes",
            ResourceType::Assessments => "assessments",
            ResourceType::CrisisPlans => "crisis_plans",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "messages" => Ok(ResourceType::Messages),
            "documents" => Ok(ResourceType::Documents),
            "appointments" => Ok(ResourceType::Appointments),
            "notes" => Ok(ResourceType::Notes),
            "assessments" => Ok(ResourceType::Assessments),
            "crisis_plans" => Ok(ResourceType::CrisisPlans),
            other => Err(format!("Unknown resource type: {other}")),
        }
    }

    /// Resource types shielded from quota eviction when
    /// `prioritize_critical_data` is on.
    pub fn is_critical(&self) -> bool {
        matches!(self, ResourceType::CrisisPlans | ResourceType::Assessments)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
