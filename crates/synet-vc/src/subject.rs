//! # Credential Subjects
//!
//! One record type per [`CredentialType`], each carrying the fields of its
//! category base (identity, authorization, asset, governance) flattened in.
//! [`CredentialSubject`] is the closed sum over all of them.
//!
//! Every record keeps unrecognized members in `extra` so a subject
//! round-trips without loss. Optional members are omitted on output when
//! absent.
//!
//! Field sets here and the shapes in [`crate::registry`] describe the same
//! thing; a test keeps them in lockstep.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use synet_core::Timestamp;

use crate::delegation::CredentialDelegation;
use crate::holder::SynetHolder;
use crate::resource::VerifiableResource;
use crate::types::{CredentialType, Intelligence};

/// Free-form metadata attached to a subject.
pub type Metadata = BTreeMap<String, Value>;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// `IdentityCredential` subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentitySubject {
    /// The identified party.
    pub holder: SynetHolder,
    /// The issuing party.
    #[serde(rename = "issuedBy")]
    pub issued_by: SynetHolder,
    /// Claim purposes or restrictions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<String>>,
    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `RootIdentityCredential` subject: the operator of a network root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootIdentitySubject {
    /// The identified party.
    pub holder: SynetHolder,
    /// The issuing party.
    #[serde(rename = "issuedBy")]
    pub issued_by: SynetHolder,
    /// Network the root operates.
    #[serde(rename = "networkId")]
    pub network_id: String,
    /// IP range operated by the root.
    #[serde(rename = "poolCidr")]
    pub pool_cidr: String,
    /// Claim purposes or restrictions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<String>>,
    /// More information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `GatewayIdentityCredential` subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayIdentitySubject {
    /// The identified gateway.
    pub holder: SynetHolder,
    /// The issuing party.
    #[serde(rename = "issuedBy")]
    pub issued_by: SynetHolder,
    /// Network the gateway belongs to.
    #[serde(rename = "networkId")]
    pub network_id: String,
    /// Claim purposes or restrictions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<String>>,
    /// Region served.
    #[serde(rename = "regionId", default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,
    /// Address range served.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    /// Gateway address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Pool the address is drawn from.
    #[serde(rename = "ipPoolId", default, skip_serializing_if = "Option::is_none")]
    pub ip_pool_id: Option<String>,
    /// Current public key, for rotation.
    #[serde(rename = "publicKeyHex", default, skip_serializing_if = "Option::is_none")]
    pub public_key_hex: Option<String>,
    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `MarketIdentityCredential` subject: a listing in a network market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketIdentitySubject {
    /// The listed party.
    pub holder: SynetHolder,
    /// The issuing party.
    #[serde(rename = "issuedBy")]
    pub issued_by: SynetHolder,
    /// Market the listing belongs to.
    #[serde(rename = "marketId")]
    pub market_id: String,
    /// Listing title.
    pub title: String,
    /// Claim purposes or restrictions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Vec<String>>,
    /// Listing description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Listing category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Search tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Listing URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

/// `AuthorizationCredential` subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationSubject {
    /// The authorized party.
    pub holder: SynetHolder,
    /// Who granted the authorization.
    #[serde(rename = "authorizedBy")]
    pub authorized_by: SynetHolder,
    /// What is authorized. A single string, unlike identity scopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Schema of the authorized payload.
    #[serde(rename = "schemaUri", default, skip_serializing_if = "Option::is_none")]
    pub schema_uri: Option<String>,
    /// Supporting document.
    #[serde(
        rename = "verifiableResource",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub verifiable_resource: Option<VerifiableResource>,
    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `IntelligenceAuthorizationCredential` subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceAuthorizationSubject {
    /// The authorized party.
    pub holder: SynetHolder,
    /// Who granted the authorization.
    #[serde(rename = "authorizedBy")]
    pub authorized_by: SynetHolder,
    /// The kind of intelligence authorized.
    pub intelligence: Intelligence,
    /// What is authorized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Schema of the authorized payload.
    #[serde(rename = "schemaUri", default, skip_serializing_if = "Option::is_none")]
    pub schema_uri: Option<String>,
    /// Supporting document.
    #[serde(
        rename = "verifiableResource",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub verifiable_resource: Option<VerifiableResource>,
    /// Parties attesting to the authorization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witnesses: Option<Vec<SynetHolder>>,
    /// Certification references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<String>>,
    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `GatewayAuthorizationCredential` subject: permission to run a gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayAuthorizationSubject {
    /// The authorized gateway.
    pub holder: SynetHolder,
    /// Who granted the authorization.
    #[serde(rename = "authorizedBy")]
    pub authorized_by: SynetHolder,
    /// Network.
    #[serde(rename = "networkId")]
    pub network_id: String,
    /// Region.
    #[serde(rename = "regionId")]
    pub region_id: String,
    /// Assigned address.
    pub ip: String,
    /// Assigned range.
    pub cidr: String,
    /// Pool the address is drawn from.
    #[serde(rename = "ipPoolId")]
    pub ip_pool_id: String,
    /// End of the authorization.
    #[serde(rename = "validUntil", default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<Timestamp>,
    /// What is authorized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Schema of the authorized payload.
    #[serde(rename = "schemaUri", default, skip_serializing_if = "Option::is_none")]
    pub schema_uri: Option<String>,
    /// Supporting document.
    #[serde(
        rename = "verifiableResource",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub verifiable_resource: Option<VerifiableResource>,
    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// `FungibleAssetCredential` subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FungibleAssetSubject {
    /// Owner.
    pub holder: SynetHolder,
    /// Issuer of the asset.
    #[serde(rename = "issuedBy")]
    pub issued_by: SynetHolder,
    /// Units held.
    pub quantity: Number,
    /// Units in existence.
    #[serde(rename = "totalSupply")]
    pub total_supply: Number,
    /// Active delegation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegated: Option<CredentialDelegation>,
    /// Asset this one derives from.
    #[serde(rename = "parentAssetId", default, skip_serializing_if = "Option::is_none")]
    pub parent_asset_id: Option<String>,
    /// Schema of the asset payload.
    #[serde(rename = "schemaUri", default, skip_serializing_if = "Option::is_none")]
    pub schema_uri: Option<String>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Backing content.
    #[serde(
        rename = "verifiableResource",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub verifiable_resource: Option<VerifiableResource>,
    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `NonFungibleAssetCredential` subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonFungibleAssetSubject {
    /// Owner.
    pub holder: SynetHolder,
    /// Issuer of the asset.
    #[serde(rename = "issuedBy")]
    pub issued_by: SynetHolder,
    /// Identifier unique within the issuer.
    #[serde(rename = "uniqueIdentifier")]
    pub unique_identifier: String,
    /// Active delegation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegated: Option<CredentialDelegation>,
    /// Asset this one derives from.
    #[serde(rename = "parentAssetId", default, skip_serializing_if = "Option::is_none")]
    pub parent_asset_id: Option<String>,
    /// Schema of the asset payload.
    #[serde(rename = "schemaUri", default, skip_serializing_if = "Option::is_none")]
    pub schema_uri: Option<String>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Backing content.
    #[serde(
        rename = "verifiableResource",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub verifiable_resource: Option<VerifiableResource>,
    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `DataAssetCredential` subject: licensed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataAssetSubject {
    /// Licensee.
    pub holder: SynetHolder,
    /// Issuer of the asset.
    #[serde(rename = "issuedBy")]
    pub issued_by: SynetHolder,
    /// Who owns or grants the license. A bare id on the wire is lifted to a
    /// holder during normalization.
    #[serde(rename = "licensedBy")]
    pub licensed_by: SynetHolder,
    /// Permitted uses, e.g. `analytics`, `training`.
    pub scope: Vec<String>,
    /// Active delegation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegated: Option<CredentialDelegation>,
    /// Asset this one derives from.
    #[serde(rename = "parentAssetId", default, skip_serializing_if = "Option::is_none")]
    pub parent_asset_id: Option<String>,
    /// Schema of the data.
    #[serde(rename = "schemaUri", default, skip_serializing_if = "Option::is_none")]
    pub schema_uri: Option<String>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// The data itself.
    #[serde(
        rename = "verifiableResource",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub verifiable_resource: Option<VerifiableResource>,
    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `IpPoolAssetCredential` subject: ownership of an address pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpPoolAssetSubject {
    /// Owner.
    pub holder: SynetHolder,
    /// Issuer of the asset.
    #[serde(rename = "issuedBy")]
    pub issued_by: SynetHolder,
    /// Network.
    #[serde(rename = "networkId")]
    pub network_id: String,
    /// Pool range.
    pub cidr: String,
    /// Region the pool is enforced in.
    #[serde(rename = "regionId")]
    pub region_id: String,
    /// Active delegation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegated: Option<CredentialDelegation>,
    /// Asset this one derives from.
    #[serde(rename = "parentAssetId", default, skip_serializing_if = "Option::is_none")]
    pub parent_asset_id: Option<String>,
    /// Schema of the asset payload.
    #[serde(rename = "schemaUri", default, skip_serializing_if = "Option::is_none")]
    pub schema_uri: Option<String>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Backing content.
    #[serde(
        rename = "verifiableResource",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub verifiable_resource: Option<VerifiableResource>,
    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `IpAssetCredential` subject: ownership of a single address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpAssetSubject {
    /// Owner.
    pub holder: SynetHolder,
    /// Issuer of the asset.
    #[serde(rename = "issuedBy")]
    pub issued_by: SynetHolder,
    /// Network.
    #[serde(rename = "networkId")]
    pub network_id: String,
    /// The address.
    pub ip: String,
    /// Active delegation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegated: Option<CredentialDelegation>,
    /// Pool this address was drawn from.
    #[serde(rename = "parentAssetId", default, skip_serializing_if = "Option::is_none")]
    pub parent_asset_id: Option<String>,
    /// Schema of the asset payload.
    #[serde(rename = "schemaUri", default, skip_serializing_if = "Option::is_none")]
    pub schema_uri: Option<String>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Backing content.
    #[serde(
        rename = "verifiableResource",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub verifiable_resource: Option<VerifiableResource>,
    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// ---------------------------------------------------------------------------
// Governance and declarations
// ---------------------------------------------------------------------------

/// `PolicyCredential` subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySubject {
    /// Party bound by the policy.
    pub holder: SynetHolder,
    /// Issuer of the policy.
    #[serde(rename = "issuedBy")]
    pub issued_by: SynetHolder,
    /// Policy identifier.
    #[serde(rename = "policyId")]
    pub policy_id: String,
    /// Policy version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Schema of the policy document.
    #[serde(rename = "schemaUri", default, skip_serializing_if = "Option::is_none")]
    pub schema_uri: Option<String>,
    /// The policy document.
    #[serde(
        rename = "verifiableResource",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub verifiable_resource: Option<VerifiableResource>,
    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `RootPolicyCredential` subject: the policy a network root enforces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootPolicySubject {
    /// Party bound by the policy.
    pub holder: SynetHolder,
    /// Issuer of the policy.
    #[serde(rename = "issuedBy")]
    pub issued_by: SynetHolder,
    /// Network.
    #[serde(rename = "networkId")]
    pub network_id: String,
    /// Policy identifier.
    #[serde(rename = "policyId")]
    pub policy_id: String,
    /// Policy version.
    pub version: String,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Schema of the policy document.
    #[serde(rename = "schemaUri", default, skip_serializing_if = "Option::is_none")]
    pub schema_uri: Option<String>,
    /// The policy document.
    #[serde(
        rename = "verifiableResource",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub verifiable_resource: Option<VerifiableResource>,
    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// `NetworkDeclarationCredential` subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDeclarationSubject {
    /// Declaring party.
    pub holder: SynetHolder,
    /// Issuer of the declaration.
    #[serde(rename = "issuedBy")]
    pub issued_by: SynetHolder,
    /// Declared network.
    #[serde(rename = "networkId")]
    pub network_id: String,
    /// Governing policy.
    #[serde(rename = "policyId")]
    pub policy_id: String,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Schema of the declaration document.
    #[serde(rename = "schemaUri", default, skip_serializing_if = "Option::is_none")]
    pub schema_uri: Option<String>,
    /// The declaration document.
    #[serde(
        rename = "verifiableResource",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub verifiable_resource: Option<VerifiableResource>,
    /// IPv4 range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<String>,
    /// IPv6 range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
    /// Network range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    /// e.g. `mesh`, `overlay`.
    #[serde(rename = "networkType", default, skip_serializing_if = "Option::is_none")]
    pub network_type: Option<String>,
    /// e.g. `star`, `hub-spoke`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<String>,
    /// Root node endpoint.
    #[serde(rename = "rootUrl", default, skip_serializing_if = "Option::is_none")]
    pub root_url: Option<String>,
    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// `RoutingCredential` subject: how to reach a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingSubject {
    /// The routed node.
    pub holder: SynetHolder,
    /// Issuer of the route.
    #[serde(rename = "issuedBy")]
    pub issued_by: SynetHolder,
    /// Node address.
    pub ip: String,
    /// Node public key.
    #[serde(rename = "publicKey")]
    pub public_key: String,
    /// Transport endpoint.
    pub endpoint: String,
    /// Network.
    #[serde(rename = "networkId")]
    pub network_id: String,
    /// Region.
    #[serde(rename = "regionId", default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// Members outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// ---------------------------------------------------------------------------
// Sum type and static binding
// ---------------------------------------------------------------------------

/// Any subject variant.
///
/// Serializes as the bare inner record. Deserialization classifies the
/// value by its fields (see [`crate::registry::classify`]) because a bare
/// subject carries no tag; inside an envelope the declared `type` decides.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CredentialSubject {
    /// `IdentityCredential`.
    Identity(IdentitySubject),
    /// `RootIdentityCredential`.
    RootIdentity(RootIdentitySubject),
    /// `GatewayIdentityCredential`.
    GatewayIdentity(GatewayIdentitySubject),
    /// `MarketIdentityCredential`.
    MarketIdentity(MarketIdentitySubject),
    /// `AuthorizationCredential`.
    Authorization(AuthorizationSubject),
    /// `IntelligenceAuthorizationCredential`.
    IntelligenceAuthorization(IntelligenceAuthorizationSubject),
    /// `GatewayAuthorizationCredential`.
    GatewayAuthorization(GatewayAuthorizationSubject),
    /// `FungibleAssetCredential`.
    FungibleAsset(FungibleAssetSubject),
    /// `NonFungibleAssetCredential`.
    NonFungibleAsset(NonFungibleAssetSubject),
    /// `DataAssetCredential`.
    DataAsset(DataAssetSubject),
    /// `IpPoolAssetCredential`.
    IpPoolAsset(IpPoolAssetSubject),
    /// `IpAssetCredential`.
    IpAsset(IpAssetSubject),
    /// `PolicyCredential`.
    Policy(PolicySubject),
    /// `RootPolicyCredential`.
    RootPolicy(RootPolicySubject),
    /// `NetworkDeclarationCredential`.
    NetworkDeclaration(NetworkDeclarationSubject),
    /// `RoutingCredential`.
    Routing(RoutingSubject),
}

macro_rules! with_variant {
    ($subject:expr, $inner:ident => $body:expr) => {
        match $subject {
            CredentialSubject::Identity($inner) => $body,
            CredentialSubject::RootIdentity($inner) => $body,
            CredentialSubject::GatewayIdentity($inner) => $body,
            CredentialSubject::MarketIdentity($inner) => $body,
            CredentialSubject::Authorization($inner) => $body,
            CredentialSubject::IntelligenceAuthorization($inner) => $body,
            CredentialSubject::GatewayAuthorization($inner) => $body,
            CredentialSubject::FungibleAsset($inner) => $body,
            CredentialSubject::NonFungibleAsset($inner) => $body,
            CredentialSubject::DataAsset($inner) => $body,
            CredentialSubject::IpPoolAsset($inner) => $body,
            CredentialSubject::IpAsset($inner) => $body,
            CredentialSubject::Policy($inner) => $body,
            CredentialSubject::RootPolicy($inner) => $body,
            CredentialSubject::NetworkDeclaration($inner) => $body,
            CredentialSubject::Routing($inner) => $body,
        }
    };
}

impl CredentialSubject {
    /// Decode a subject whose variant is already known.
    ///
    /// This is a plain typed decode. Callers holding untrusted input go
    /// through the validator, which normalizes and checks the shape first.
    pub fn from_value(
        credential_type: CredentialType,
        value: Value,
    ) -> Result<Self, serde_json::Error> {
        use CredentialType as T;
        Ok(match credential_type {
            T::Identity => Self::Identity(serde_json::from_value(value)?),
            T::RootIdentity => Self::RootIdentity(serde_json::from_value(value)?),
            T::GatewayIdentity => Self::GatewayIdentity(serde_json::from_value(value)?),
            T::MarketIdentity => Self::MarketIdentity(serde_json::from_value(value)?),
            T::Authorization => Self::Authorization(serde_json::from_value(value)?),
            T::IntelligenceAuthorization => {
                Self::IntelligenceAuthorization(serde_json::from_value(value)?)
            }
            T::GatewayAuthorization => Self::GatewayAuthorization(serde_json::from_value(value)?),
            T::FungibleAsset => Self::FungibleAsset(serde_json::from_value(value)?),
            T::NonFungibleAsset => Self::NonFungibleAsset(serde_json::from_value(value)?),
            T::DataAsset => Self::DataAsset(serde_json::from_value(value)?),
            T::IpPoolAsset => Self::IpPoolAsset(serde_json::from_value(value)?),
            T::IpAsset => Self::IpAsset(serde_json::from_value(value)?),
            T::Policy => Self::Policy(serde_json::from_value(value)?),
            T::RootPolicy => Self::RootPolicy(serde_json::from_value(value)?),
            T::NetworkDeclaration => Self::NetworkDeclaration(serde_json::from_value(value)?),
            T::Routing => Self::Routing(serde_json::from_value(value)?),
        })
    }

    /// Members outside the variant's known set.
    pub fn extra(&self) -> &BTreeMap<String, Value> {
        with_variant!(self, s => &s.extra)
    }
}

impl<'de> Deserialize<'de> for CredentialSubject {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        crate::validate::resolve_subject(&raw, None).map_err(serde::de::Error::custom)
    }
}

/// A value that can sit in a credential's `credentialSubject`.
///
/// Implemented by [`CredentialSubject`] and by every concrete subject
/// record, which lets [`SynetVerifiableCredential`](crate::SynetVerifiableCredential)
/// be used either dynamically or with a statically known variant.
pub trait Subject: Serialize + Clone + Sized {
    /// The tag this subject is declared under.
    fn credential_type(&self) -> CredentialType;

    /// The party the credential is about.
    fn holder(&self) -> &SynetHolder;

    /// Widen into the sum type.
    fn into_subject(self) -> CredentialSubject;

    /// Narrow from the sum type, handing the subject back on mismatch.
    fn try_from_subject(subject: CredentialSubject) -> Result<Self, CredentialSubject>;
}

/// A concrete subject record bound to exactly one tag.
pub trait TypedSubject: Subject {
    /// The tag of this record type.
    const CREDENTIAL_TYPE: CredentialType;
}

impl Subject for CredentialSubject {
    fn credential_type(&self) -> CredentialType {
        use CredentialType as T;
        match self {
            Self::Identity(_) => T::Identity,
            Self::RootIdentity(_) => T::RootIdentity,
            Self::GatewayIdentity(_) => T::GatewayIdentity,
            Self::MarketIdentity(_) => T::MarketIdentity,
            Self::Authorization(_) => T::Authorization,
            Self::IntelligenceAuthorization(_) => T::IntelligenceAuthorization,
            Self::GatewayAuthorization(_) => T::GatewayAuthorization,
            Self::FungibleAsset(_) => T::FungibleAsset,
            Self::NonFungibleAsset(_) => T::NonFungibleAsset,
            Self::DataAsset(_) => T::DataAsset,
            Self::IpPoolAsset(_) => T::IpPoolAsset,
            Self::IpAsset(_) => T::IpAsset,
            Self::Policy(_) => T::Policy,
            Self::RootPolicy(_) => T::RootPolicy,
            Self::NetworkDeclaration(_) => T::NetworkDeclaration,
            Self::Routing(_) => T::Routing,
        }
    }

    fn holder(&self) -> &SynetHolder {
        with_variant!(self, s => &s.holder)
    }

    fn into_subject(self) -> CredentialSubject {
        self
    }

    fn try_from_subject(subject: CredentialSubject) -> Result<Self, CredentialSubject> {
        Ok(subject)
    }
}

macro_rules! impl_typed_subject {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl Subject for $ty {
                fn credential_type(&self) -> CredentialType {
                    CredentialType::$variant
                }

                fn holder(&self) -> &SynetHolder {
                    &self.holder
                }

                fn into_subject(self) -> CredentialSubject {
                    CredentialSubject::$variant(self)
                }

                fn try_from_subject(subject: CredentialSubject) -> Result<Self, CredentialSubject> {
                    match subject {
                        CredentialSubject::$variant(s) => Ok(s),
                        other => Err(other),
                    }
                }
            }

            impl TypedSubject for $ty {
                const CREDENTIAL_TYPE: CredentialType = CredentialType::$variant;
            }

            impl From<$ty> for CredentialSubject {
                fn from(subject: $ty) -> Self {
                    CredentialSubject::$variant(subject)
                }
            }
        )*
    };
}

impl_typed_subject! {
    IdentitySubject => Identity,
    RootIdentitySubject => RootIdentity,
    GatewayIdentitySubject => GatewayIdentity,
    MarketIdentitySubject => MarketIdentity,
    AuthorizationSubject => Authorization,
    IntelligenceAuthorizationSubject => IntelligenceAuthorization,
    GatewayAuthorizationSubject => GatewayAuthorization,
    FungibleAssetSubject => FungibleAsset,
    NonFungibleAssetSubject => NonFungibleAsset,
    DataAssetSubject => DataAsset,
    IpPoolAssetSubject => IpPoolAsset,
    IpAssetSubject => IpAsset,
    PolicySubject => Policy,
    RootPolicySubject => RootPolicy,
    NetworkDeclarationSubject => NetworkDeclaration,
    RoutingSubject => Routing,
}
