use std::collections::BTreeSet;

use foundation::color::{Rgb, Rgba};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// One of the site's fixed thematic sections.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainId {
    Landing,
    Backend,
    Cloud,
    Ai,
    Web3,
}

impl DomainId {
    pub const ALL: [DomainId; 5] = [
        DomainId::Landing,
        DomainId::Backend,
        DomainId::Cloud,
        DomainId::Ai,
        DomainId::Web3,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DomainId::Landing => "landing",
            DomainId::Backend => "backend",
            DomainId::Cloud => "cloud",
            DomainId::Ai => "ai",
            DomainId::Web3 => "web3",
        }
    }
}

impl std::fmt::Display for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DomainId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        DomainId::ALL
            .into_iter()
            .find(|d| d.as_str() == needle)
            .ok_or_else(|| CatalogError::UnknownDomain(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainColors {
    /// `#rrggbb`
    pub primary: String,
    /// `#rrggbb`
    pub secondary: String,
    /// Any CSS colour accepted by [`Rgba::parse_css`].
    pub glow: String,
}

/// Parsed form of [`DomainColors`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Palette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub glow: Rgba,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainDescriptor {
    pub id: DomainId,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub route: String,
    pub colors: DomainColors,
    #[serde(default)]
    pub loader_messages: Vec<String>,
    #[serde(default)]
    pub avatar_form: String,
    pub order: u32,
}

impl DomainDescriptor {
    pub fn palette(&self) -> Result<Palette, CatalogError> {
        let invalid = |field: &'static str, value: &str| CatalogError::InvalidColor {
            domain: self.id.to_string(),
            field,
            value: value.to_string(),
        };
        Ok(Palette {
            primary: Rgb::from_hex(&self.colors.primary)
                .map_err(|_| invalid("primary", &self.colors.primary))?,
            secondary: Rgb::from_hex(&self.colors.secondary)
                .map_err(|_| invalid("secondary", &self.colors.secondary))?,
            glow: Rgba::parse_css(&self.colors.glow)
                .map_err(|_| invalid("glow", &self.colors.glow))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CatalogFile {
    domains: Vec<DomainDescriptor>,
}

/// Immutable, validated domain table ordered by `order`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCatalog {
    domains: Vec<DomainDescriptor>,
}

impl DomainCatalog {
    /// Validates that every [`DomainId`] appears exactly once, orders are
    /// unique, colours parse and routes are absolute.
    pub fn from_descriptors(domains: Vec<DomainDescriptor>) -> Result<Self, CatalogError> {
        let mut ids = BTreeSet::new();
        let mut orders = BTreeSet::new();
        for d in &domains {
            if !ids.insert(d.id) {
                return Err(CatalogError::DuplicateDomain(d.id.to_string()));
            }
            if !orders.insert(d.order) {
                return Err(CatalogError::DuplicateOrder(d.order));
            }
            if !d.route.starts_with('/') {
                return Err(CatalogError::InvalidRoute {
                    domain: d.id.to_string(),
                    route: d.route.clone(),
                });
            }
            d.palette()?;
        }
        if let Some(missing) = DomainId::ALL.into_iter().find(|id| !ids.contains(id)) {
            return Err(CatalogError::MissingDomain(missing.to_string()));
        }
        Ok(Self::new_unchecked(domains))
    }

    pub(crate) fn new_unchecked(mut domains: Vec<DomainDescriptor>) -> Self {
        domains.sort_by_key(|d| d.order);
        Self { domains }
    }

    /// Parses `{"domains": [...]}`.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_json::from_str(raw).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_descriptors(file.domains)
    }

    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        let file = CatalogFile {
            domains: self.domains.clone(),
        };
        serde_json::to_string_pretty(&file).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    pub fn get(&self, id: DomainId) -> Option<&DomainDescriptor> {
        self.domains.iter().find(|d| d.id == id)
    }

    /// Descriptors in sequence order.
    pub fn ordered(&self) -> &[DomainDescriptor] {
        &self.domains
    }

    pub fn order(&self) -> Vec<DomainId> {
        self.domains.iter().map(|d| d.id).collect()
    }

    pub fn by_route(&self, route: &str) -> Option<&DomainDescriptor> {
        let route = route.trim_end_matches('/');
        self.domains
            .iter()
            .find(|d| d.route.trim_end_matches('/') == route)
    }

    /// The domain after `id` in sequence order; `None` at the end.
    pub fn next(&self, id: DomainId) -> Option<DomainId> {
        let idx = self.domains.iter().position(|d| d.id == id)?;
        self.domains.get(idx + 1).map(|d| d.id)
    }

    /// The domain before `id` in sequence order; `None` at the start.
    pub fn prev(&self, id: DomainId) -> Option<DomainId> {
        let idx = self.domains.iter().position(|d| d.id == id)?;
        idx.checked_sub(1).map(|i| self.domains[i].id)
    }

    pub fn loader_messages(&self, id: DomainId) -> &[String] {
        self.get(id).map(|d| d.loader_messages.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::{DomainCatalog, DomainId};
    use crate::builtin::BUILTIN;
    use crate::error::CatalogError;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_domain_ids_case_insensitively() {
        assert_eq!("Web3".parse::<DomainId>().unwrap(), DomainId::Web3);
        assert_eq!(" ai ".parse::<DomainId>().unwrap(), DomainId::Ai);
        assert_eq!(
            "mobile".parse::<DomainId>(),
            Err(CatalogError::UnknownDomain("mobile".to_string()))
        );
    }

    #[test]
    fn navigation_stops_at_the_ends() {
        let c = &*BUILTIN;
        assert_eq!(c.next(DomainId::Landing), Some(DomainId::Backend));
        assert_eq!(c.next(DomainId::Web3), None);
        assert_eq!(c.prev(DomainId::Landing), None);
        assert_eq!(c.prev(DomainId::Cloud), Some(DomainId::Backend));
    }

    #[test]
    fn looks_up_by_route() {
        let c = &*BUILTIN;
        assert_eq!(c.by_route("/cloud").map(|d| d.id), Some(DomainId::Cloud));
        assert_eq!(c.by_route("/cloud/").map(|d| d.id), Some(DomainId::Cloud));
        assert_eq!(c.by_route("/").map(|d| d.id), Some(DomainId::Landing));
        assert!(c.by_route("/blog").is_none());
    }

    #[test]
    fn json_round_trip_preserves_table() {
        let raw = BUILTIN.to_json_pretty().unwrap();
        let parsed = DomainCatalog::from_json(&raw).unwrap();
        assert_eq!(parsed, *BUILTIN);
    }

    #[test]
    fn rejects_duplicate_and_missing_domains() {
        let mut domains = BUILTIN.ordered().to_vec();
        let mut dup = domains[1].clone();
        dup.order = 99;
        domains.push(dup);
        assert_eq!(
            DomainCatalog::from_descriptors(domains),
            Err(CatalogError::DuplicateDomain("backend".to_string()))
        );

        let domains: Vec<_> = BUILTIN
            .ordered()
            .iter()
            .filter(|d| d.id != DomainId::Ai)
            .cloned()
            .collect();
        assert_eq!(
            DomainCatalog::from_descriptors(domains),
            Err(CatalogError::MissingDomain("ai".to_string()))
        );
    }

    #[test]
    fn rejects_bad_colours_and_routes() {
        let mut domains = BUILTIN.ordered().to_vec();
        domains[2].colors.glow = "glowy".to_string();
        assert_eq!(
            DomainCatalog::from_descriptors(domains),
            Err(CatalogError::InvalidColor {
                domain: "cloud".to_string(),
                field: "glow",
                value: "glowy".to_string(),
            })
        );

        let mut domains = BUILTIN.ordered().to_vec();
        domains[0].route = "home".to_string();
        assert!(matches!(
            DomainCatalog::from_descriptors(domains),
            Err(CatalogError::InvalidRoute { .. })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            DomainCatalog::from_json("{\"domains\": 3}"),
            Err(CatalogError::Parse(_))
        ));
    }
}
