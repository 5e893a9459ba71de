//! Conversion between content identifiers, DNSLink names and DNS labels.
//!
//! Subdomain gateways put the root identifier in a single DNS label, so
//! every label produced here is case-insensitive and at most 63 bytes.
//! Encoders fail with `LabelTooLong` instead of truncating.

use cid::multibase::Base;
use cid::multihash::Multihash;
use cid::Cid;

use crate::hostname::error::{GatewayError, GatewayResult, DNS_LABEL_MAX_LENGTH};
use crate::hostname::types::Namespace;

/// Multicodec for libp2p public keys (peer identities as CIDs).
pub const LIBP2P_KEY_CODEC: u64 = 0x72;

/// Never valid inside a DNS label, so it can stand in for an escaped `-`.
const PLACEHOLDER: &str = "@";

/// Canonical subdomain label for `cid` in namespace `ns`.
///
/// Always CIDv1. Peer namespaces use base36 and the `libp2p-key` codec,
/// everything else base32. Falls back to base36 when base32 is too long.
pub fn encode_cid_for_subdomain(cid: &Cid, ns: Namespace) -> GatewayResult<String> {
    let (codec, base) = if ns.is_peer_identity() {
        (LIBP2P_KEY_CODEC, Base::Base36Lower)
    } else {
        (cid.codec(), Base::Base32Lower)
    };

    let canonical = Cid::new_v1(codec, cid.hash().to_owned());
    let label = encode_with_base(&canonical, base)?;
    if label.len() <= DNS_LABEL_MAX_LENGTH {
        return Ok(label);
    }

    let label = if base == Base::Base36Lower {
        label
    } else {
        encode_with_base(&canonical, Base::Base36Lower)?
    };
    if label.len() <= DNS_LABEL_MAX_LENGTH {
        return Ok(label);
    }

    Err(GatewayError::LabelTooLong { kind: "CID", label })
}

fn encode_with_base(cid: &Cid, base: Base) -> GatewayResult<String> {
    cid.to_string_of_base(base)
        .map_err(|e| GatewayError::malformed(format!("encoding CID: {e}")))
}

/// Parse a root identifier as a CID. `None` means "treat it as a DNS name".
///
/// User agents case-fold hostnames, so identifiers in a case-insensitive
/// multibase (base32 `b`, base36 `k`) are retried in lowercase.
pub fn decode_root_id_as_cid(root_id: &str) -> Option<Cid> {
    if let Ok(cid) = Cid::try_from(root_id) {
        return Some(cid);
    }
    match root_id.chars().next() {
        Some('b' | 'B' | 'k' | 'K') => Cid::try_from(root_id.to_ascii_lowercase().as_str()).ok(),
        _ => None,
    }
}

/// Decode a legacy base58btc peer ID (`Qm...`, `12D3Koo...`) into a
/// CIDv1 with the `libp2p-key` codec.
pub fn decode_peer_id(text: &str) -> Option<Cid> {
    if !(text.starts_with("Qm") || text.starts_with('1')) {
        return None;
    }
    let bytes = Base::Base58Btc.decode(text).ok()?;
    let hash = Multihash::<64>::from_bytes(&bytes).ok()?;
    Some(Cid::new_v1(LIBP2P_KEY_CODEC, hash))
}

fn is_peer_id(text: &str) -> bool {
    if decode_peer_id(text).is_some() {
        return true;
    }
    Cid::try_from(text)
        .map(|cid| cid.codec() == LIBP2P_KEY_CODEC)
        .unwrap_or(false)
}

fn is_domain_name(name: &str) -> bool {
    let name = name.strip_suffix('.').unwrap_or(name);
    !name.is_empty()
        && name.len() <= 253
        && name
            .split('.')
            .all(|label| !label.is_empty() && label.len() <= DNS_LABEL_MAX_LENGTH)
}

/// True if `name` looks like a DNS name and is not a peer identity.
pub fn is_domain_name_and_not_peer_id(name: &str) -> bool {
    !name.is_empty() && !is_peer_id(name) && is_domain_name(name)
}

/// Inline a DNSLink FQDN into one label: `my.v-long.example.com` → `my-v--long-example-com`.
pub fn encode_fqdn_as_label(fqdn: &str) -> GatewayResult<String> {
    let label = fqdn.replace('-', "--").replace('.', "-");
    if label.len() > DNS_LABEL_MAX_LENGTH {
        return Err(GatewayError::LabelTooLong {
            kind: "DNSLink",
            label,
        });
    }
    Ok(label)
}

/// Inverse of [`encode_fqdn_as_label`]: `my-v--long-example-com` → `my.v-long.example.com`.
pub fn decode_label_as_fqdn(label: &str) -> String {
    label
        .replace("--", PLACEHOLDER)
        .replace('-', ".")
        .replace(PLACEHOLDER, "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_DIR_V0: &str = "QmUNLLsPACCz1vLxQVkXqqLX5R1X345qqfHbsf67hvA3Nn";
    const EMPTY_DIR_V1: &str = "bafybeiczsscdsbs7ffqz55asqdf3smv6klcw3gofszvwlyarci47bgf354";

    fn ed25519_peer_id() -> String {
        // protobuf-wrapped ed25519 public key inlined with the identity hash
        let mut key = vec![0x08, 0x01, 0x12, 0x20];
        key.extend_from_slice(&[0x42; 32]);
        let hash = Multihash::<64>::wrap(0x00, &key).unwrap();
        Base::Base58Btc.encode(hash.to_bytes())
    }

    fn cid_with_digest(len: usize) -> Cid {
        Cid::new_v1(0x70, Multihash::<64>::wrap(0x12, &vec![7u8; len]).unwrap())
    }

    #[test]
    fn test_cidv0_becomes_base32_v1() {
        let cid = decode_root_id_as_cid(EMPTY_DIR_V0).unwrap();
        let label = encode_cid_for_subdomain(&cid, Namespace::Ipfs).unwrap();
        assert_eq!(label, EMPTY_DIR_V1);
    }

    #[test]
    fn test_canonical_label_is_stable() {
        let cid = decode_root_id_as_cid(EMPTY_DIR_V1).unwrap();
        let label = encode_cid_for_subdomain(&cid, Namespace::Ipfs).unwrap();
        assert_eq!(label, EMPTY_DIR_V1);

        let again = decode_root_id_as_cid(&label).unwrap();
        assert_eq!(encode_cid_for_subdomain(&again, Namespace::Ipfs).unwrap(), label);
    }

    #[test]
    fn test_mixed_case_base32_decodes() {
        let mixed = format!("bAFY{}", &EMPTY_DIR_V1[4..]);
        let cid = decode_root_id_as_cid(&mixed).unwrap();
        assert_eq!(
            encode_cid_for_subdomain(&cid, Namespace::Ipfs).unwrap(),
            EMPTY_DIR_V1
        );
    }

    #[test]
    fn test_dns_names_are_not_cids() {
        assert!(decode_root_id_as_cid("en.wikipedia-on-ipfs.org").is_none());
        assert!(decode_root_id_as_cid("my-v--long-example-com").is_none());
        assert!(decode_root_id_as_cid("").is_none());
    }

    #[test]
    fn test_peer_namespace_uses_base36_and_libp2p_key() {
        // dag-pb CID standing in for an RSA peer ID
        let cid = decode_root_id_as_cid(EMPTY_DIR_V0).unwrap();
        let label = encode_cid_for_subdomain(&cid, Namespace::Ipns).unwrap();
        assert!(label.starts_with('k'));
        assert!(label.len() <= DNS_LABEL_MAX_LENGTH);

        let decoded = decode_root_id_as_cid(&label).unwrap();
        assert_eq!(decoded.codec(), LIBP2P_KEY_CODEC);
        assert_eq!(decoded.hash(), cid.hash());
    }

    #[test]
    fn test_long_base32_falls_back_to_base36() {
        let cid = cid_with_digest(35);
        assert!(cid.to_string_of_base(Base::Base32Lower).unwrap().len() > DNS_LABEL_MAX_LENGTH);

        let label = encode_cid_for_subdomain(&cid, Namespace::Ipfs).unwrap();
        assert!(label.starts_with('k'));
        assert!(label.len() <= DNS_LABEL_MAX_LENGTH);
    }

    #[test]
    fn test_oversized_cid_is_rejected() {
        let cid = cid_with_digest(64);
        let err = encode_cid_for_subdomain(&cid, Namespace::Ipfs).unwrap_err();
        assert!(err.is_label_too_long());
        let err = encode_cid_for_subdomain(&cid, Namespace::Ipns).unwrap_err();
        assert!(err.is_label_too_long());
    }

    #[test]
    fn test_decode_peer_id() {
        let peer_id = ed25519_peer_id();
        assert!(peer_id.starts_with("12D3Koo"));

        let cid = decode_peer_id(&peer_id).unwrap();
        assert_eq!(cid.codec(), LIBP2P_KEY_CODEC);
        let label = encode_cid_for_subdomain(&cid, Namespace::Ipns).unwrap();
        assert!(label.starts_with('k'));
        assert!(label.len() <= DNS_LABEL_MAX_LENGTH);

        assert!(decode_peer_id("example.com").is_none());
    }

    #[test]
    fn test_domain_name_and_not_peer_id() {
        assert!(is_domain_name_and_not_peer_id("example.com"));
        assert!(is_domain_name_and_not_peer_id("example.com."));
        assert!(is_domain_name_and_not_peer_id("localhost"));
        assert!(!is_domain_name_and_not_peer_id(""));
        assert!(!is_domain_name_and_not_peer_id("a..b"));
        assert!(!is_domain_name_and_not_peer_id(&"a".repeat(64)));
        assert!(!is_domain_name_and_not_peer_id(&ed25519_peer_id()));
        assert!(!is_domain_name_and_not_peer_id(EMPTY_DIR_V0));
    }

    #[test]
    fn test_fqdn_label_examples() {
        assert_eq!(
            encode_fqdn_as_label("my.v-long.example.com").unwrap(),
            "my-v--long-example-com"
        );
        assert_eq!(
            decode_label_as_fqdn("my-v--long-example-com"),
            "my.v-long.example.com"
        );
        assert_eq!(
            encode_fqdn_as_label("en.wikipedia-on-ipfs.org").unwrap(),
            "en-wikipedia--on--ipfs-org"
        );
    }

    #[test]
    fn test_fqdn_label_round_trip() {
        let names = [
            "example.com",
            "my.v-long.example.com",
            "a-b-c.d-e.f",
            "x1.y2-z3.co",
            "docs.ipfs.tech",
            "single",
            "a--b.example",
        ];
        for name in names {
            let label = encode_fqdn_as_label(name).unwrap();
            assert!(!label.contains('.'));
            assert_eq!(decode_label_as_fqdn(&label), name, "label {label}");
        }
    }

    #[test]
    fn test_fqdn_label_too_long() {
        let fqdn = format!("{}.example.com", "a".repeat(60));
        let err = encode_fqdn_as_label(&fqdn).unwrap_err();
        assert!(err.is_label_too_long());
    }
}
