//! Registry of the object identifiers this toolkit knows by name.
//!
//! Attribute types double as relative distinguished name short ids
//! (`CN`, `O`, ...). Locality and state are recognised when reading a name
//! but cannot be used to build one.

use sigil_asn1::ObjectIdentifier;

use crate::error::{Error, Result};

pub const COMMON_NAME: &[u64] = &[2, 5, 4, 3];
pub const SERIAL_NUMBER: &[u64] = &[2, 5, 4, 5];
pub const COUNTRY_NAME: &[u64] = &[2, 5, 4, 6];
pub const LOCALITY_NAME: &[u64] = &[2, 5, 4, 7];
pub const STATE_OR_PROVINCE_NAME: &[u64] = &[2, 5, 4, 8];
pub const ORGANIZATION_NAME: &[u64] = &[2, 5, 4, 10];
pub const ORGANIZATIONAL_UNIT_NAME: &[u64] = &[2, 5, 4, 11];
pub const USER_ID: &[u64] = &[0, 9, 2342, 19200300, 100, 1, 1];

pub const RSA_ENCRYPTION: &[u64] = &[1, 2, 840, 113549, 1, 1, 1];
pub const SHA1_WITH_RSA_ENCRYPTION: &[u64] = &[1, 2, 840, 113549, 1, 1, 5];
pub const SHA256_WITH_RSA_ENCRYPTION: &[u64] = &[1, 2, 840, 113549, 1, 1, 11];
pub const SHA384_WITH_RSA_ENCRYPTION: &[u64] = &[1, 2, 840, 113549, 1, 1, 12];
pub const SHA512_WITH_RSA_ENCRYPTION: &[u64] = &[1, 2, 840, 113549, 1, 1, 13];
pub const SHA224_WITH_RSA_ENCRYPTION: &[u64] = &[1, 2, 840, 113549, 1, 1, 14];

pub const EXTENSION_REQUEST: &[u64] = &[1, 2, 840, 113549, 1, 9, 14];
pub const EXTENSION_KEY_USAGE: &[u64] = &[2, 5, 29, 15];

struct RdnAttribute {
    short_id: &'static str,
    components: &'static [u64],
    buildable: bool,
}

const RDN_ATTRIBUTES: &[RdnAttribute] = &[
    RdnAttribute { short_id: "CN", components: COMMON_NAME, buildable: true },
    RdnAttribute { short_id: "C", components: COUNTRY_NAME, buildable: true },
    RdnAttribute { short_id: "L", components: LOCALITY_NAME, buildable: false },
    RdnAttribute { short_id: "ST", components: STATE_OR_PROVINCE_NAME, buildable: false },
    RdnAttribute { short_id: "O", components: ORGANIZATION_NAME, buildable: true },
    RdnAttribute { short_id: "OU", components: ORGANIZATIONAL_UNIT_NAME, buildable: true },
    RdnAttribute { short_id: "UID", components: USER_ID, buildable: true },
    RdnAttribute { short_id: "SN", components: SERIAL_NUMBER, buildable: true },
];

const NAMES: &[(&[u64], &str)] = &[
    (COMMON_NAME, "commonName"),
    (SERIAL_NUMBER, "serialNumber"),
    (COUNTRY_NAME, "countryName"),
    (LOCALITY_NAME, "localityName"),
    (STATE_OR_PROVINCE_NAME, "stateOrProvinceName"),
    (ORGANIZATION_NAME, "organizationName"),
    (ORGANIZATIONAL_UNIT_NAME, "organizationalUnitName"),
    (USER_ID, "userId"),
    (RSA_ENCRYPTION, "rsaEncryption"),
    (SHA1_WITH_RSA_ENCRYPTION, "sha1WithRSAEncryption"),
    (SHA224_WITH_RSA_ENCRYPTION, "sha224WithRSAEncryption"),
    (SHA256_WITH_RSA_ENCRYPTION, "sha256WithRSAEncryption"),
    (SHA384_WITH_RSA_ENCRYPTION, "sha384WithRSAEncryption"),
    (SHA512_WITH_RSA_ENCRYPTION, "sha512WithRSAEncryption"),
    (EXTENSION_REQUEST, "extensionRequest"),
    (EXTENSION_KEY_USAGE, "keyUsage"),
];

/// Short id (`CN`, `C`, `L`, `ST`, `O`, `OU`, `UID`, `SN`) of a name attribute type.
pub fn short_id_from_oid(oid: &ObjectIdentifier) -> Result<&'static str> {
    RDN_ATTRIBUTES
        .iter()
        .find(|attr| attr.components == oid.components())
        .map(|attr| attr.short_id)
        .ok_or_else(|| Error::UnresolvedOid(oid.clone()))
}

/// Attribute type for a short id. Only `CN`, `C`, `O`, `OU`, `UID` and `SN`
/// resolve.
pub fn oid_from_short_id(id: &str) -> Result<ObjectIdentifier> {
    RDN_ATTRIBUTES
        .iter()
        .find(|attr| attr.buildable && attr.short_id == id)
        .map(|attr| ObjectIdentifier::from(attr.components))
        .ok_or_else(|| Error::UnresolvedShortId(id.to_string()))
}

/// Conventional names for registered OIDs.
pub trait OidName {
    fn oid_name(&self) -> Option<&'static str>;
}

impl OidName for ObjectIdentifier {
    fn oid_name(&self) -> Option<&'static str> {
        NAMES
            .iter()
            .find(|(components, _)| *components == self.components())
            .map(|(_, name)| *name)
    }
}
