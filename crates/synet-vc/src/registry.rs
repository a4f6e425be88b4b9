//! # Subject Type Registry
//!
//! Maps every [`CredentialType`] to the [`SubjectShape`] of its subject:
//! which members are required, which are optional, and what kind of value
//! each one holds. The validator checks subjects against these shapes, the
//! schema exporter renders them as JSON Schema, and [`classify`] uses them
//! to infer a tag for an untyped subject.
//!
//! ## Composition
//!
//! Shapes are assembled from field lists rather than inherited: the base
//! (`holder`), then a category base (identity, authorization, asset,
//! governance), then the variant's own members. The registry is built once
//! per process and never changes.
//!
//! ## Classification
//!
//! A variant *matches* a subject when all of its required members are
//! present (non-null). The most specific match (most required members)
//! wins. Equally specific matches are reported together and resolve to
//! [`ValidationFailure::AmbiguousSubjectType`]; no match resolves to
//! [`ValidationFailure::UnknownCredentialType`].

use std::sync::OnceLock;

use serde::Serialize;
use serde_json::Value;
use synet_core::{FieldPath, ValidationFailure};

use crate::types::CredentialType;

/// The kind of value a subject member holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// JSON string.
    String,
    /// Array of strings.
    StringList,
    /// JSON number.
    Number,
    /// RFC 3339 timestamp string.
    Timestamp,
    /// A [`SynetHolder`](crate::SynetHolder) object.
    Holder,
    /// A holder object, or a bare holder id lifted to one on normalization.
    HolderRef,
    /// Array of holder objects.
    HolderList,
    /// A [`VerifiableResource`](crate::VerifiableResource) object.
    VerifiableResource,
    /// A [`CredentialDelegation`](crate::CredentialDelegation) object.
    Delegation,
    /// One of the [`Intelligence`](crate::Intelligence) values.
    Intelligence,
    /// Any JSON object.
    OpenMap,
}

impl FieldKind {
    /// Short description used in diagnostics (`expected ...`).
    pub fn describe(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::StringList => "array of strings",
            Self::Number => "number",
            Self::Timestamp => "RFC 3339 timestamp",
            Self::Holder => "holder object",
            Self::HolderRef => "holder object or holder id",
            Self::HolderList => "array of holder objects",
            Self::VerifiableResource => "verifiable resource object",
            Self::Delegation => "delegation object",
            Self::Intelligence => "one of Human, AI, Hybrid, Swarm, Superintelligent",
            Self::OpenMap => "object",
        }
    }
}

/// One member of a subject shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Wire name.
    pub name: &'static str,
    /// Value kind.
    pub kind: FieldKind,
    /// Whether the member must be present.
    pub required: bool,
}

impl FieldSpec {
    const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// The structure of one subject variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectShape {
    /// The tag the shape belongs to.
    pub credential_type: CredentialType,
    /// Members in composition order: base, category, variant.
    pub fields: Vec<FieldSpec>,
}

impl SubjectShape {
    /// Required members, in composition order.
    pub fn required(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Optional members, in composition order.
    pub fn optional(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| !f.required)
    }

    /// Look up a member by wire name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of required members; the specificity used for tie-breaks.
    pub fn specificity(&self) -> usize {
        self.required().count()
    }

    /// Whether every required member is present (and not null) in `object`.
    pub fn is_satisfied_by(&self, object: &serde_json::Map<String, Value>) -> bool {
        self.required()
            .all(|f| object.get(f.name).is_some_and(|v| !v.is_null()))
    }
}

// ---------------------------------------------------------------------------
// Field lists
// ---------------------------------------------------------------------------

use FieldKind as K;

const BASE: &[FieldSpec] = &[FieldSpec::required("holder", K::Holder)];

const ISSUED: &[FieldSpec] = &[FieldSpec::required("issuedBy", K::Holder)];

const IDENTITY: &[FieldSpec] = &[FieldSpec::optional("scope", K::StringList)];

const AUTHORIZATION: &[FieldSpec] = &[
    FieldSpec::required("authorizedBy", K::Holder),
    FieldSpec::optional("scope", K::String),
    FieldSpec::optional("metadata", K::OpenMap),
    FieldSpec::optional("schemaUri", K::String),
    FieldSpec::optional("verifiableResource", K::VerifiableResource),
];

const ASSET: &[FieldSpec] = &[
    FieldSpec::optional("delegated", K::Delegation),
    FieldSpec::optional("parentAssetId", K::String),
    FieldSpec::optional("schemaUri", K::String),
    FieldSpec::optional("metadata", K::OpenMap),
    FieldSpec::optional("verifiableResource", K::VerifiableResource),
];

const GOVERNANCE: &[FieldSpec] = &[
    FieldSpec::optional("metadata", K::OpenMap),
    FieldSpec::optional("schemaUri", K::String),
    FieldSpec::optional("verifiableResource", K::VerifiableResource),
];

const ROOT_IDENTITY: &[FieldSpec] = &[
    FieldSpec::required("networkId", K::String),
    FieldSpec::required("poolCidr", K::String),
    FieldSpec::optional("url", K::String),
];

const GATEWAY_IDENTITY: &[FieldSpec] = &[
    FieldSpec::required("networkId", K::String),
    FieldSpec::optional("regionId", K::String),
    FieldSpec::optional("cidr", K::String),
    FieldSpec::optional("ip", K::String),
    FieldSpec::optional("ipPoolId", K::String),
    FieldSpec::optional("publicKeyHex", K::String),
];

const MARKET_IDENTITY: &[FieldSpec] = &[
    FieldSpec::required("marketId", K::String),
    FieldSpec::required("title", K::String),
    FieldSpec::optional("description", K::String),
    FieldSpec::optional("category", K::String),
    FieldSpec::optional("tags", K::StringList),
    FieldSpec::optional("url", K::String),
];

const INTELLIGENCE_AUTHORIZATION: &[FieldSpec] = &[
    FieldSpec::required("intelligence", K::Intelligence),
    FieldSpec::optional("witnesses", K::HolderList),
    FieldSpec::optional("certifications", K::StringList),
];

const GATEWAY_AUTHORIZATION: &[FieldSpec] = &[
    FieldSpec::required("networkId", K::String),
    FieldSpec::required("regionId", K::String),
    FieldSpec::required("ip", K::String),
    FieldSpec::required("cidr", K::String),
    FieldSpec::required("ipPoolId", K::String),
    FieldSpec::optional("validUntil", K::Timestamp),
];

const FUNGIBLE_ASSET: &[FieldSpec] = &[
    FieldSpec::required("quantity", K::Number),
    FieldSpec::required("totalSupply", K::Number),
];

const NON_FUNGIBLE_ASSET: &[FieldSpec] = &[FieldSpec::required("uniqueIdentifier", K::String)];

const DATA_ASSET: &[FieldSpec] = &[
    FieldSpec::required("licensedBy", K::HolderRef),
    FieldSpec::required("scope", K::StringList),
];

const IP_POOL_ASSET: &[FieldSpec] = &[
    FieldSpec::required("networkId", K::String),
    FieldSpec::required("cidr", K::String),
    FieldSpec::required("regionId", K::String),
];

const IP_ASSET: &[FieldSpec] = &[
    FieldSpec::required("networkId", K::String),
    FieldSpec::required("ip", K::String),
];

const POLICY: &[FieldSpec] = &[
    FieldSpec::required("policyId", K::String),
    FieldSpec::optional("version", K::String),
];

const ROOT_POLICY: &[FieldSpec] = &[
    FieldSpec::required("networkId", K::String),
    FieldSpec::required("policyId", K::String),
    FieldSpec::required("version", K::String),
];

const NETWORK_DECLARATION: &[FieldSpec] = &[
    FieldSpec::required("networkId", K::String),
    FieldSpec::required("policyId", K::String),
    FieldSpec::optional("ipv4", K::String),
    FieldSpec::optional("ipv6", K::String),
    FieldSpec::optional("cidr", K::String),
    FieldSpec::optional("networkType", K::String),
    FieldSpec::optional("topology", K::String),
    FieldSpec::optional("rootUrl", K::String),
];

const ROUTING: &[FieldSpec] = &[
    FieldSpec::required("ip", K::String),
    FieldSpec::required("publicKey", K::String),
    FieldSpec::required("endpoint", K::String),
    FieldSpec::required("networkId", K::String),
    FieldSpec::optional("regionId", K::String),
    FieldSpec::optional("metadata", K::OpenMap),
];

fn variant_fields(credential_type: CredentialType) -> &'static [FieldSpec] {
    use CredentialType as T;
    match credential_type {
        T::Identity => &[],
        T::RootIdentity => ROOT_IDENTITY,
        T::GatewayIdentity => GATEWAY_IDENTITY,
        T::MarketIdentity => MARKET_IDENTITY,
        T::Authorization => &[],
        T::IntelligenceAuthorization => INTELLIGENCE_AUTHORIZATION,
        T::GatewayAuthorization => GATEWAY_AUTHORIZATION,
        T::FungibleAsset => FUNGIBLE_ASSET,
        T::NonFungibleAsset => NON_FUNGIBLE_ASSET,
        T::DataAsset => DATA_ASSET,
        T::IpPoolAsset => IP_POOL_ASSET,
        T::IpAsset => IP_ASSET,
        T::Policy => POLICY,
        T::RootPolicy => ROOT_POLICY,
        T::NetworkDeclaration => NETWORK_DECLARATION,
        T::Routing => ROUTING,
    }
}

fn compose(credential_type: CredentialType) -> SubjectShape {
    use crate::types::SubjectFamily as F;
    let category: &[&[FieldSpec]] = match credential_type.family() {
        F::Identity => &[ISSUED, IDENTITY],
        F::Authorization => &[AUTHORIZATION],
        // DataAsset's scope is required and declared by the variant.
        F::Asset => &[ISSUED, ASSET],
        F::Governance | F::Declaration => &[ISSUED, GOVERNANCE],
        F::Routing => &[ISSUED],
    };

    let mut fields: Vec<FieldSpec> = BASE.to_vec();
    for list in category.iter().copied().chain([variant_fields(credential_type)]) {
        for spec in list {
            // A variant redeclaring a category member overrides it in place.
            match fields.iter_mut().find(|f| f.name == spec.name) {
                Some(existing) => *existing = *spec,
                None => fields.push(*spec),
            }
        }
    }

    SubjectShape {
        credential_type,
        fields,
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// All subject shapes, indexed by credential type.
#[derive(Debug)]
pub struct SubjectRegistry {
    shapes: Vec<SubjectShape>,
}

impl SubjectRegistry {
    fn build() -> Self {
        Self {
            shapes: CredentialType::ALL.into_iter().map(compose).collect(),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static SubjectRegistry {
        static REGISTRY: OnceLock<SubjectRegistry> = OnceLock::new();
        REGISTRY.get_or_init(Self::build)
    }

    /// The shape of a known credential type.
    pub fn shape(&self, credential_type: CredentialType) -> &SubjectShape {
        // `shapes` is built from `CredentialType::ALL` in order.
        let index = CredentialType::ALL
            .iter()
            .position(|t| *t == credential_type)
            .unwrap_or_default();
        &self.shapes[index]
    }

    /// All shapes, in tag declaration order.
    pub fn shapes(&self) -> impl Iterator<Item = &SubjectShape> {
        self.shapes.iter()
    }

    /// The shape registered for a wire tag.
    ///
    /// # Errors
    ///
    /// `UnknownCredentialType` (at the root path) if `tag` is not a
    /// recognized credential type.
    pub fn shape_for(&self, tag: &str) -> Result<&SubjectShape, ValidationFailure> {
        CredentialType::parse(tag)
            .map(|t| self.shape(t))
            .ok_or_else(|| ValidationFailure::UnknownCredentialType {
                path: FieldPath::root(),
                tag: tag.to_string(),
            })
    }

    /// Every variant whose required members are present in `subject`.
    pub fn classify(&self, subject: &Value) -> Classification {
        let mut matches: Vec<(CredentialType, usize)> = match subject.as_object() {
            Some(object) => self
                .shapes
                .iter()
                .filter(|s| s.is_satisfied_by(object))
                .map(|s| (s.credential_type, s.specificity()))
                .collect(),
            None => Vec::new(),
        };
        // Most specific first; ties keep declaration order.
        matches.sort_by(|a, b| b.1.cmp(&a.1));

        let top = matches.first().map(|m| m.1).unwrap_or_default();
        let best = matches
            .iter()
            .take_while(|m| m.1 == top)
            .map(|m| m.0)
            .collect();

        Classification {
            candidates: matches.into_iter().map(|m| m.0).collect(),
            best,
        }
    }
}

/// The shape registered for a wire tag, from the global registry.
pub fn shape_for(tag: &str) -> Result<&'static SubjectShape, ValidationFailure> {
    SubjectRegistry::global().shape_for(tag)
}

/// Classify an untyped subject against the global registry.
pub fn classify(subject: &Value) -> Classification {
    SubjectRegistry::global().classify(subject)
}

/// The outcome of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Every matching variant, most specific first.
    pub candidates: Vec<CredentialType>,
    /// The most specific matches. One entry when unambiguous.
    pub best: Vec<CredentialType>,
}

impl Classification {
    /// The single winning variant, if there is exactly one.
    pub fn unique(&self) -> Option<CredentialType> {
        match self.best.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Whether several variants tie for most specific.
    pub fn is_ambiguous(&self) -> bool {
        self.best.len() > 1
    }

    /// Turn the classification into a single tag.
    ///
    /// # Errors
    ///
    /// `AmbiguousSubjectType` for a tie, `UnknownCredentialType` when
    /// nothing matched. Both are reported at `path`.
    pub fn resolve(&self, path: &FieldPath) -> Result<CredentialType, ValidationFailure> {
        match self.best.as_slice() {
            [only] => Ok(*only),
            [] => Err(ValidationFailure::UnknownCredentialType {
                path: path.clone(),
                tag: "no credential type matches the subject's fields".to_string(),
            }),
            tied => Err(ValidationFailure::AmbiguousSubjectType {
                path: path.clone(),
                candidates: tied.iter().map(|t| t.as_str().to_string()).collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use synet_core::Rule;

    fn required_names(t: CredentialType) -> Vec<&'static str> {
        let mut names: Vec<_> = SubjectRegistry::global()
            .shape(t)
            .required()
            .map(|f| f.name)
            .collect();
        names.sort_unstable();
        names
    }

    fn subject_with(keys: &[&str]) -> Value {
        let mut map = serde_json::Map::new();
        for k in keys {
            map.insert((*k).to_string(), json!("x"));
        }
        Value::Object(map)
    }

    #[test]
    fn shape_index_matches_tag() {
        for t in CredentialType::ALL {
            assert_eq!(SubjectRegistry::global().shape(t).credential_type, t);
        }
    }

    #[test]
    fn variant_field_lists_are_static_tables() {
        let lists: Vec<&'static [FieldSpec]> =
            CredentialType::ALL.iter().copied().map(variant_fields).collect();
        assert_eq!(lists.len(), CredentialType::ALL.len());
        assert!(variant_fields(CredentialType::Identity).is_empty());
        assert!(variant_fields(CredentialType::Authorization).is_empty());
        let routing: &'static [FieldSpec] = variant_fields(CredentialType::Routing);
        assert_eq!(routing.iter().filter(|f| f.required).count(), 4);
    }

    #[test]
    fn required_fields_match_variant_table() {
        use CredentialType as T;
        let table: &[(T, &[&str])] = &[
            (T::Identity, &["holder", "issuedBy"]),
            (T::RootIdentity, &["holder", "issuedBy", "networkId", "poolCidr"]),
            (T::GatewayIdentity, &["holder", "issuedBy", "networkId"]),
            (T::MarketIdentity, &["holder", "issuedBy", "marketId", "title"]),
            (T::Authorization, &["holder", "authorizedBy"]),
            (T::IntelligenceAuthorization, &["holder", "authorizedBy", "intelligence"]),
            (
                T::GatewayAuthorization,
                &["holder", "authorizedBy", "networkId", "regionId", "ip", "cidr", "ipPoolId"],
            ),
            (T::FungibleAsset, &["holder", "issuedBy", "quantity", "totalSupply"]),
            (T::NonFungibleAsset, &["holder", "issuedBy", "uniqueIdentifier"]),
            (T::DataAsset, &["holder", "issuedBy", "licensedBy", "scope"]),
            (T::IpPoolAsset, &["holder", "issuedBy", "networkId", "cidr", "regionId"]),
            (T::IpAsset, &["holder", "issuedBy", "networkId", "ip"]),
            (T::Policy, &["holder", "issuedBy", "policyId"]),
            (T::RootPolicy, &["holder", "issuedBy", "networkId", "policyId", "version"]),
            (T::NetworkDeclaration, &["holder", "issuedBy", "networkId", "policyId"]),
            (T::Routing, &["holder", "issuedBy", "ip", "publicKey", "endpoint", "networkId"]),
        ];
        assert_eq!(table.len(), CredentialType::ALL.len());
        for (t, expected) in table {
            let mut expected = expected.to_vec();
            expected.sort_unstable();
            assert_eq!(required_names(*t), expected, "required fields of {t}");
        }
    }

    #[test]
    fn data_asset_scope_is_required_list() {
        let shape = SubjectRegistry::global().shape(CredentialType::DataAsset);
        let scope = shape.field("scope").unwrap();
        assert!(scope.required);
        assert_eq!(scope.kind, FieldKind::StringList);
        assert_eq!(shape.fields.iter().filter(|f| f.name == "scope").count(), 1);
    }

    #[test]
    fn authorization_scope_is_single_string() {
        let shape = SubjectRegistry::global().shape(CredentialType::GatewayAuthorization);
        assert_eq!(shape.field("scope").unwrap().kind, FieldKind::String);
        assert_eq!(shape.field("validUntil").unwrap().kind, FieldKind::Timestamp);
    }

    #[test]
    fn shape_for_unknown_tag() {
        let err = shape_for("VerifiableCredential").unwrap_err();
        assert_eq!(err.rule(), Rule::UnknownCredentialType);
        assert!(shape_for("IpAssetCredential").is_ok());
    }

    #[test]
    fn each_required_set_classifies_to_its_own_variant() {
        for shape in SubjectRegistry::global().shapes() {
            let names: Vec<_> = shape.required().map(|f| f.name).collect();
            let c = classify(&subject_with(&names));
            assert_eq!(c.unique(), Some(shape.credential_type), "{names:?}");
        }
    }

    #[test]
    fn holder_and_issuer_classify_as_identity() {
        let c = classify(&subject_with(&["holder", "issuedBy"]));
        assert_eq!(c.unique(), Some(CredentialType::Identity));
        assert_eq!(c.candidates, vec![CredentialType::Identity]);
    }

    #[test]
    fn network_id_makes_gateway_identity_win() {
        let c = classify(&subject_with(&["holder", "issuedBy", "networkId"]));
        assert_eq!(c.unique(), Some(CredentialType::GatewayIdentity));
        assert_eq!(
            c.candidates,
            vec![CredentialType::GatewayIdentity, CredentialType::Identity]
        );
    }

    #[test]
    fn optional_overlap_does_not_change_winner() {
        // `regionId` is optional for GatewayIdentity and adds no specificity.
        let c = classify(&subject_with(&["holder", "issuedBy", "networkId", "regionId"]));
        assert_eq!(c.unique(), Some(CredentialType::GatewayIdentity));
    }

    #[test]
    fn true_tie_is_ambiguous() {
        let c = classify(&subject_with(&[
            "holder",
            "issuedBy",
            "networkId",
            "poolCidr",
            "policyId",
        ]));
        assert!(c.is_ambiguous());
        assert_eq!(
            c.best,
            vec![CredentialType::RootIdentity, CredentialType::NetworkDeclaration]
        );
        let err = c.resolve(&FieldPath::root().field("credentialSubject")).unwrap_err();
        assert_eq!(err.rule(), Rule::AmbiguousSubjectType);
        assert_eq!(err.path().to_string(), "credentialSubject");
    }

    #[test]
    fn no_match_is_unknown() {
        let c = classify(&subject_with(&["holder"]));
        assert!(c.best.is_empty());
        let err = c.resolve(&FieldPath::root()).unwrap_err();
        assert_eq!(err.rule(), Rule::UnknownCredentialType);
        assert!(classify(&json!("not an object")).candidates.is_empty());
    }

    #[test]
    fn null_members_do_not_count_as_present() {
        let c = classify(&json!({"holder": {"id": "a"}, "issuedBy": null}));
        assert!(c.candidates.is_empty());
    }
}
