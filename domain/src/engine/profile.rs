//! Engine profile: the immutable identity of a capability provider.
//!
//! A profile names an engine, classifies it (domain plus subdomains), lists
//! what it can evaluate and which other engines it logically requires.
//! Profiles are only obtainable through [`EngineProfileBuilder::build`],
//! which rejects malformed definitions.

use crate::core::confidence::Confidence;
use crate::core::error::DomainError;
use crate::engine::insight::Insight;
use serde::{Deserialize, Serialize};

/// Identity and classification of an engine
///
/// # Example
///
/// ```
/// use council_domain::EngineProfile;
///
/// let profile = EngineProfile::builder("utilitarian")
///     .name("Utilitarian Ethics")
///     .domain("ethics")
///     .subdomain("consequences")
///     .capability("harm-analysis")
///     .tradition("consequentialism")
///     .build()
///     .unwrap();
///
/// assert!(profile.in_domain("consequences"));
/// assert!(profile.has_capability("harm-analysis"));
/// assert_eq!(profile.perspective(), "consequentialism");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EngineProfileRecord", into = "EngineProfileRecord")]
pub struct EngineProfile {
    id: String,
    name: String,
    domain: String,
    subdomains: Vec<String>,
    capabilities: Vec<String>,
    dependencies: Vec<String>,
    tradition: Option<String>,
    description: Option<String>,
    version: String,
}

impl EngineProfile {
    /// Start building a profile for the given id
    pub fn builder(id: impl Into<String>) -> EngineProfileBuilder {
        EngineProfileBuilder::default().id(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn subdomains(&self) -> &[String] {
        &self.subdomains
    }

    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    /// Declared dependencies, in declaration order
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn tradition(&self) -> Option<&str> {
        self.tradition.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Every domain label this engine is discoverable under (domain first)
    pub fn domain_labels(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.domain.as_str()).chain(self.subdomains.iter().map(String::as_str))
    }

    /// Check whether this engine advertises the given capability tag
    pub fn has_capability(&self, tag: &str) -> bool {
        self.capabilities.iter().any(|c| c == tag)
    }

    /// Check whether this engine belongs to the domain (or one of its subdomains)
    pub fn in_domain(&self, domain: &str) -> bool {
        self.domain_labels().any(|d| d == domain)
    }

    /// Display label used on insights: the tradition when present, else the name
    pub fn perspective(&self) -> &str {
        self.tradition.as_deref().unwrap_or(&self.name)
    }

    /// Create an insight attributed to this engine.
    ///
    /// The confidence is clamped to the ceiling by [`Confidence`].
    pub fn insight(&self, content: impl Into<String>, confidence: impl Into<Confidence>) -> Insight {
        Insight::new(
            self.id.clone(),
            self.domain.clone(),
            self.perspective().to_string(),
            content,
            confidence,
        )
    }
}

/// Builder for [`EngineProfile`]
#[derive(Debug, Clone, Default)]
pub struct EngineProfileBuilder {
    id: Option<String>,
    name: Option<String>,
    domain: Option<String>,
    subdomains: Vec<String>,
    capabilities: Vec<String>,
    dependencies: Vec<String>,
    tradition: Option<String>,
    description: Option<String>,
    version: Option<String>,
}

impl EngineProfileBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.subdomains.push(subdomain.into());
        self
    }

    pub fn subdomains<I, S>(mut self, subdomains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subdomains.extend(subdomains.into_iter().map(Into::into));
        self
    }

    pub fn capability(mut self, tag: impl Into<String>) -> Self {
        self.capabilities.push(tag.into());
        self
    }

    pub fn capabilities<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn dependency(mut self, id: impl Into<String>) -> Self {
        self.dependencies.push(id.into());
        self
    }

    pub fn dependencies<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn tradition(mut self, tradition: impl Into<String>) -> Self {
        self.tradition = Some(tradition.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Validate and produce the profile.
    ///
    /// Fails with [`DomainError::MissingField`] when the id, domain or
    /// capability set is absent, and with [`DomainError::InvalidConfiguration`]
    /// for blank tags, blank dependency ids or a self-dependency.
    pub fn build(self) -> Result<EngineProfile, DomainError> {
        let id = required(self.id, "id")?;
        let domain = required(self.domain, "domain")?;

        let capabilities = normalize(self.capabilities, "capability tag")?;
        if capabilities.is_empty() {
            return Err(DomainError::MissingField("capabilities"));
        }

        let subdomains: Vec<String> = normalize(self.subdomains, "subdomain")?
            .into_iter()
            .filter(|s| *s != domain)
            .collect();

        let dependencies = normalize(self.dependencies, "dependency id")?;
        if dependencies.iter().any(|d| *d == id) {
            return Err(DomainError::InvalidConfiguration(format!(
                "engine `{}` cannot depend on itself",
                id
            )));
        }

        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| id.clone());

        Ok(EngineProfile {
            id,
            name,
            domain,
            subdomains,
            capabilities,
            dependencies,
            tradition: self.tradition.filter(|t| !t.trim().is_empty()),
            description: self.description,
            version: self.version.unwrap_or_else(|| "1.0.0".to_string()),
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, DomainError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(DomainError::MissingField(field))
}

/// Trim, reject blanks and drop duplicates while keeping first-seen order
fn normalize(values: Vec<String>, what: &str) -> Result<Vec<String>, DomainError> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(DomainError::InvalidConfiguration(format!(
                "{} cannot be empty",
                what
            )));
        }
        if !out.contains(&value) {
            out.push(value);
        }
    }
    Ok(out)
}

/// Serializable shape of an [`EngineProfile`], used by persistence collaborators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineProfileRecord {
    pub id: String,
    pub name: String,
    pub domain: String,
    pub subdomains: Vec<String>,
    pub capabilities: Vec<String>,
    pub dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tradition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
}

impl From<EngineProfile> for EngineProfileRecord {
    fn from(profile: EngineProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            domain: profile.domain,
            subdomains: profile.subdomains,
            capabilities: profile.capabilities,
            dependencies: profile.dependencies,
            tradition: profile.tradition,
            description: profile.description,
            version: profile.version,
        }
    }
}

impl TryFrom<EngineProfileRecord> for EngineProfile {
    type Error = DomainError;

    fn try_from(record: EngineProfileRecord) -> Result<Self, Self::Error> {
        let mut builder = EngineProfile::builder(record.id)
            .name(record.name)
            .domain(record.domain)
            .subdomains(record.subdomains)
            .capabilities(record.capabilities)
            .dependencies(record.dependencies);
        if let Some(tradition) = record.tradition {
            builder = builder.tradition(tradition);
        }
        if let Some(description) = record.description {
            builder = builder.description(description);
        }
        if !record.version.is_empty() {
            builder = builder.version(record.version);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> EngineProfileBuilder {
        EngineProfile::builder("logic")
            .domain("reasoning")
            .capability("validity")
    }

    #[test]
    fn test_build_minimal() {
        let profile = base().build().unwrap();
        assert_eq!(profile.id(), "logic");
        assert_eq!(profile.name(), "logic");
        assert_eq!(profile.perspective(), "logic");
        assert_eq!(profile.version(), "1.0.0");
        assert!(profile.dependencies().is_empty());
    }

    #[test]
    fn test_missing_id() {
        let err = EngineProfileBuilder::default()
            .domain("reasoning")
            .capability("validity")
            .build()
            .unwrap_err();
        assert_eq!(err, DomainError::MissingField("id"));

        let err = EngineProfile::builder("   ")
            .domain("reasoning")
            .capability("validity")
            .build()
            .unwrap_err();
        assert_eq!(err, DomainError::MissingField("id"));
    }

    #[test]
    fn test_missing_domain() {
        let err = EngineProfile::builder("logic")
            .capability("validity")
            .build()
            .unwrap_err();
        assert_eq!(err, DomainError::MissingField("domain"));
    }

    #[test]
    fn test_missing_capabilities() {
        let err = EngineProfile::builder("logic")
            .domain("reasoning")
            .build()
            .unwrap_err();
        assert_eq!(err, DomainError::MissingField("capabilities"));
    }

    #[test]
    fn test_blank_dependency_rejected() {
        let err = base().dependency(" ").build().unwrap_err();
        assert!(matches!(err, DomainError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_self_dependency_rejected() {
        let err = base().dependency("logic").build().unwrap_err();
        assert!(err.to_string().contains("cannot depend on itself"));
    }

    #[test]
    fn test_duplicates_collapsed() {
        let profile = base()
            .capability("validity")
            .capability("fallacies")
            .dependency("a")
            .dependency("a")
            .build()
            .unwrap();
        assert_eq!(profile.capabilities(), ["validity", "fallacies"]);
        assert_eq!(profile.dependencies(), ["a"]);
    }

    #[test]
    fn test_domain_membership_includes_subdomains() {
        let profile = base().subdomain("deduction").build().unwrap();
        assert!(profile.in_domain("reasoning"));
        assert!(profile.in_domain("deduction"));
        assert!(!profile.in_domain("ethics"));
        assert_eq!(
            profile.domain_labels().collect::<Vec<_>>(),
            vec!["reasoning", "deduction"]
        );
    }

    #[test]
    fn test_insight_is_attributed_and_clamped() {
        let profile = base().name("Logic Engine").build().unwrap();
        let insight = profile.insight("valid argument", 0.95);
        assert_eq!(insight.engine_id(), "logic");
        assert_eq!(insight.domain(), "reasoning");
        assert_eq!(insight.perspective(), "Logic Engine");
        assert_eq!(insight.confidence().value(), 0.618);
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let profile = base().tradition("formal").build().unwrap();
        let json = serde_json::to_string(&profile).unwrap();
        let back: EngineProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);

        let invalid = r#"{"id":"x","domain":"d","capabilities":[]}"#;
        assert!(serde_json::from_str::<EngineProfile>(invalid).is_err());
    }
}
