use serde::{
    Deserialize,
    Serialize,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub plan: ZonePlan,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZonePlan {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// The identifier a single query is filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeId<'a> {
    Zone(&'a str),
    Account(&'a str),
}

/// Selects the zones zone-level datasets iterate over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneFilter {
    pub eligible_plan: String,
    pub zone_name: Option<String>,
}

impl ZoneFilter {
    /// A zone is eligible when it is on the eligible plan and, if a zone name is
    /// configured, carries exactly that name.
    pub fn matches(&self, zone: &Zone) -> bool {
        if zone.plan.name != self.eligible_plan {
            return false;
        }
        match &self.zone_name {
            Some(name) => zone.name == *name,
            None => true,
        }
    }

    pub fn eligible<'z>(&'z self, zones: &'z [Zone]) -> impl Iterator<Item = &'z Zone> + 'z {
        zones.iter().filter(move |zone| self.matches(zone))
    }
}
