//! # Closed Tag Sets
//!
//! [`CredentialType`] names every subject variant the network recognizes.
//! The string values are the wire tags that appear in a credential's `type`
//! sequence and are stable across releases. [`Intelligence`] is the closed
//! value set of `IntelligenceAuthorizationSubject.intelligence`.

use serde::{Deserialize, Serialize};

/// The category a subject variant extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubjectFamily {
    /// "I AM".
    Identity,
    /// "I CAN".
    Authorization,
    /// "I HAVE / USE / OWN".
    Asset,
    /// "I MUST".
    Governance,
    /// "I DECLARE TO BE TRUE".
    Declaration,
    /// Reachability claims for network nodes.
    Routing,
}

impl SubjectFamily {
    /// Returns the family name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "Identity",
            Self::Authorization => "Authorization",
            Self::Asset => "Asset",
            Self::Governance => "Governance",
            Self::Declaration => "Declaration",
            Self::Routing => "Routing",
        }
    }
}

impl std::fmt::Display for SubjectFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credential type tag. Every subject variant maps to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CredentialType {
    /// `IdentityCredential`.
    #[serde(rename = "IdentityCredential")]
    Identity,
    /// `RootIdentityCredential`.
    #[serde(rename = "RootIdentityCredential")]
    RootIdentity,
    /// `GatewayIdentityCredential`.
    #[serde(rename = "GatewayIdentityCredential")]
    GatewayIdentity,
    /// `MarketIdentityCredential`.
    #[serde(rename = "MarketIdentityCredential")]
    MarketIdentity,
    /// `AuthorizationCredential`.
    #[serde(rename = "AuthorizationCredential")]
    Authorization,
    /// `IntelligenceAuthorizationCredential`.
    #[serde(rename = "IntelligenceAuthorizationCredential")]
    IntelligenceAuthorization,
    /// `GatewayAuthorizationCredential`.
    #[serde(rename = "GatewayAuthorizationCredential")]
    GatewayAuthorization,
    /// `FungibleAssetCredential`.
    #[serde(rename = "FungibleAssetCredential")]
    FungibleAsset,
    /// `NonFungibleAssetCredential`.
    #[serde(rename = "NonFungibleAssetCredential")]
    NonFungibleAsset,
    /// `DataAssetCredential`.
    #[serde(rename = "DataAssetCredential")]
    DataAsset,
    /// `IpPoolAssetCredential`.
    #[serde(rename = "IpPoolAssetCredential")]
    IpPoolAsset,
    /// `IpAssetCredential`.
    #[serde(rename = "IpAssetCredential")]
    IpAsset,
    /// `PolicyCredential`.
    #[serde(rename = "PolicyCredential")]
    Policy,
    /// `RootPolicyCredential`.
    #[serde(rename = "RootPolicyCredential")]
    RootPolicy,
    /// `NetworkDeclarationCredential`.
    #[serde(rename = "NetworkDeclarationCredential")]
    NetworkDeclaration,
    /// `RoutingCredential`.
    #[serde(rename = "RoutingCredential")]
    Routing,
}

impl CredentialType {
    /// All credential types, in declaration order.
    pub const ALL: [CredentialType; 16] = [
        Self::Identity,
        Self::RootIdentity,
        Self::GatewayIdentity,
        Self::MarketIdentity,
        Self::Authorization,
        Self::IntelligenceAuthorization,
        Self::GatewayAuthorization,
        Self::FungibleAsset,
        Self::NonFungibleAsset,
        Self::DataAsset,
        Self::IpPoolAsset,
        Self::IpAsset,
        Self::Policy,
        Self::RootPolicy,
        Self::NetworkDeclaration,
        Self::Routing,
    ];

    /// The wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "IdentityCredential",
            Self::RootIdentity => "RootIdentityCredential",
            Self::GatewayIdentity => "GatewayIdentityCredential",
            Self::MarketIdentity => "MarketIdentityCredential",
            Self::Authorization => "AuthorizationCredential",
            Self::IntelligenceAuthorization => "IntelligenceAuthorizationCredential",
            Self::GatewayAuthorization => "GatewayAuthorizationCredential",
            Self::FungibleAsset => "FungibleAssetCredential",
            Self::NonFungibleAsset => "NonFungibleAssetCredential",
            Self::DataAsset => "DataAssetCredential",
            Self::IpPoolAsset => "IpPoolAssetCredential",
            Self::IpAsset => "IpAssetCredential",
            Self::Policy => "PolicyCredential",
            Self::RootPolicy => "RootPolicyCredential",
            Self::NetworkDeclaration => "NetworkDeclarationCredential",
            Self::Routing => "RoutingCredential",
        }
    }

    /// Look up a wire tag. Matching is exact and case-sensitive.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    /// The category this variant extends.
    pub fn family(&self) -> SubjectFamily {
        match self {
            Self::Identity | Self::RootIdentity | Self::GatewayIdentity | Self::MarketIdentity => {
                SubjectFamily::Identity
            }
            Self::Authorization | Self::IntelligenceAuthorization | Self::GatewayAuthorization => {
                SubjectFamily::Authorization
            }
            Self::FungibleAsset
            | Self::NonFungibleAsset
            | Self::DataAsset
            | Self::IpPoolAsset
            | Self::IpAsset => SubjectFamily::Asset,
            Self::Policy | Self::RootPolicy => SubjectFamily::Governance,
            Self::NetworkDeclaration => SubjectFamily::Declaration,
            Self::Routing => SubjectFamily::Routing,
        }
    }
}

impl std::fmt::Display for CredentialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CredentialType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown credential type: {s}"))
    }
}

/// The kind of intelligence an authorization is granted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intelligence {
    /// `Human`.
    Human,
    /// `AI`.
    #[serde(rename = "AI")]
    Ai,
    /// `Hybrid`.
    Hybrid,
    /// `Swarm`.
    Swarm,
    /// `Superintelligent`.
    Superintelligent,
}

impl Intelligence {
    /// All values, in declaration order.
    pub const ALL: [Intelligence; 5] = [
        Self::Human,
        Self::Ai,
        Self::Hybrid,
        Self::Swarm,
        Self::Superintelligent,
    ];

    /// The wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "Human",
            Self::Ai => "AI",
            Self::Hybrid => "Hybrid",
            Self::Swarm => "Swarm",
            Self::Superintelligent => "Superintelligent",
        }
    }

    /// Look up a wire value. Matching is exact and case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.as_str() == s)
    }
}

impl std::fmt::Display for Intelligence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
