//! Message digesting
//!
//! Messages are hashed with a SHA-2 function and the digest is turned into the
//! representative `m` that the signature engine works with. The SHA extensions
//! probe runs once per process; its result is a plain [`CpuFeatures`] value that
//! [`HashBackend::select`] consumes, so nothing re-checks the CPU per call.

use crate::bigint::BigInt;
use crate::bignum::BigNum;
use crate::context::CurveContext;
use crate::error::{NrError, NrResult};
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlg {
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlg {
    /// Digest length in bytes
    pub fn output_len(&self) -> usize {
        match self {
            HashAlg::Sha224 => 28,
            HashAlg::Sha256 => 32,
            HashAlg::Sha384 => 48,
            HashAlg::Sha512 => 64,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace('-', "").as_str() {
            "sha224" => Some(HashAlg::Sha224),
            "sha256" => Some(HashAlg::Sha256),
            "sha384" => Some(HashAlg::Sha384),
            "sha512" => Some(HashAlg::Sha512),
            _ => None,
        }
    }
}

impl FromStr for HashAlg {
    type Err = NrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| NrError::Codec(format!("unknown hash {:?}", s)))
    }
}

impl fmt::Display for HashAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlg::Sha224 => write!(f, "SHA-224"),
            HashAlg::Sha256 => write!(f, "SHA-256"),
            HashAlg::Sha384 => write!(f, "SHA-384"),
            HashAlg::Sha512 => write!(f, "SHA-512"),
        }
    }
}

/// CPU capabilities relevant to hashing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuFeatures {
    pub sha: bool,
}

static CPU_FEATURES: OnceLock<CpuFeatures> = OnceLock::new();

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn probe_sha() -> bool {
    std::arch::is_x86_feature_detected!("sha") && std::arch::is_x86_feature_detected!("sse4.1")
}

#[cfg(target_arch = "aarch64")]
fn probe_sha() -> bool {
    std::arch::is_aarch64_feature_detected!("sha2")
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
fn probe_sha() -> bool {
    false
}

impl CpuFeatures {
    /// Capabilities of the running CPU, probed on first use
    pub fn detect() -> Self {
        *CPU_FEATURES.get_or_init(|| {
            let features = CpuFeatures { sha: probe_sha() };
            log::debug!("cpu features: {:?}", features);
            features
        })
    }
}

/// Compression path the capability probe expects `sha2` to take
///
/// `sha2` picks the SHA instructions on its own; this value only reports what the
/// probe found and does not change how a digest is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashBackend {
    Portable,
    ShaExtensions,
}

impl HashBackend {
    /// The SHA extensions only cover the 32-bit-word functions (SHA-224/256)
    pub fn select(alg: HashAlg, features: CpuFeatures) -> Self {
        match alg {
            HashAlg::Sha224 | HashAlg::Sha256 if features.sha => HashBackend::ShaExtensions,
            _ => HashBackend::Portable,
        }
    }
}

enum HashState {
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

/// Incremental hasher
pub struct MessageHasher {
    alg: HashAlg,
    backend: HashBackend,
    state: HashState,
}

impl MessageHasher {
    /// Creates a hasher, recording the path the CPU probe expects
    pub fn new(alg: HashAlg) -> Self {
        let backend = HashBackend::select(alg, CpuFeatures::detect());
        log::debug!("{} hasher, {:?} backend", alg, backend);
        let state = match alg {
            HashAlg::Sha224 => HashState::Sha224(Sha224::new()),
            HashAlg::Sha256 => HashState::Sha256(Sha256::new()),
            HashAlg::Sha384 => HashState::Sha384(Sha384::new()),
            HashAlg::Sha512 => HashState::Sha512(Sha512::new()),
        };
        Self {
            alg,
            backend,
            state,
        }
    }

    pub fn alg(&self) -> HashAlg {
        self.alg
    }

    /// Expected compression path, for reporting
    pub fn backend(&self) -> HashBackend {
        self.backend
    }

    pub fn update(&mut self, data: &[u8]) {
        match &mut self.state {
            HashState::Sha224(h) => h.update(data),
            HashState::Sha256(h) => h.update(data),
            HashState::Sha384(h) => h.update(data),
            HashState::Sha512(h) => h.update(data),
        }
    }

    pub fn finalize(self) -> Vec<u8> {
        match self.state {
            HashState::Sha224(h) => h.finalize().to_vec(),
            HashState::Sha256(h) => h.finalize().to_vec(),
            HashState::Sha384(h) => h.finalize().to_vec(),
            HashState::Sha512(h) => h.finalize().to_vec(),
        }
    }

    /// One-shot digest
    pub fn digest(alg: HashAlg, data: &[u8]) -> Vec<u8> {
        let mut h = Self::new(alg);
        h.update(data);
        h.finalize()
    }
}

/// Converts a digest into a message representative for `ctx`
///
/// The digest is read big-endian and truncated to its leftmost bitlength(n) bits,
/// then reduced modulo n. A zero representative cannot be signed.
pub fn message_representative<const N: usize>(
    digest: &[u8],
    ctx: &CurveContext<N>,
) -> NrResult<BigNum> {
    let bits = ctx.order().order_bits();
    let bytes = bits.div_ceil(8);

    let value = if digest.len() * 8 > bits {
        let extra = bytes * 8 - bits;
        BigInt::<N>::from_be_bytes(&digest[..bytes]).shr(extra)
    } else {
        BigInt::<N>::from_be_bytes(digest)
    };

    let m = ctx.order().reduce(&value);
    if m.is_zero() {
        return Err(NrError::MessageOutOfRange);
    }
    Ok(BigNum::from_bigint(&m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::CurveParams;

    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn backend_selection() {
        let with_sha = CpuFeatures { sha: true };
        let without = CpuFeatures { sha: false };
        assert_eq!(
            HashBackend::select(HashAlg::Sha256, with_sha),
            HashBackend::ShaExtensions
        );
        assert_eq!(
            HashBackend::select(HashAlg::Sha224, with_sha),
            HashBackend::ShaExtensions
        );
        assert_eq!(HashBackend::select(HashAlg::Sha512, with_sha), HashBackend::Portable);
        assert_eq!(HashBackend::select(HashAlg::Sha256, without), HashBackend::Portable);
    }

    #[test]
    fn detection_is_stable() {
        assert_eq!(CpuFeatures::detect(), CpuFeatures::detect());
    }

    #[test]
    fn incremental_matches_one_shot() {
        let mut h = MessageHasher::new(HashAlg::Sha256);
        assert_eq!(
            h.backend(),
            HashBackend::select(HashAlg::Sha256, CpuFeatures::detect())
        );
        h.update(b"ab");
        h.update(b"c");
        let digest = h.finalize();
        assert_eq!(digest, MessageHasher::digest(HashAlg::Sha256, b"abc"));
        assert_eq!(hex::encode(digest), ABC_SHA256);
    }

    #[test]
    fn output_lengths() {
        for alg in [HashAlg::Sha224, HashAlg::Sha256, HashAlg::Sha384, HashAlg::Sha512] {
            assert_eq!(MessageHasher::digest(alg, b"x").len(), alg.output_len());
        }
        assert_eq!(HashAlg::from_name("SHA-384"), Some(HashAlg::Sha384));
        assert_eq!(HashAlg::from_name("md5"), None);
        assert_eq!("sha512".parse::<HashAlg>(), Ok(HashAlg::Sha512));
        assert!(matches!("md5".parse::<HashAlg>(), Err(NrError::Codec(_))));
    }

    #[test]
    fn representative_on_p256_is_the_digest() {
        let ctx = CurveContext::<4>::from_params(&CurveParams::p256()).unwrap();
        let digest = MessageHasher::digest(HashAlg::Sha256, b"abc");
        let m = message_representative(&digest, &ctx).unwrap();
        assert_eq!(m.to_hex().to_lowercase(), ABC_SHA256);
    }

    #[test]
    fn representative_truncates_long_digests() {
        let ctx = CurveContext::<4>::from_params(&CurveParams::p256()).unwrap();
        let digest = MessageHasher::digest(HashAlg::Sha512, b"abc");
        let m = message_representative(&digest, &ctx).unwrap();
        let expected = BigNum::from_be_bytes(&digest[..32]);
        // leftmost 256 bits, below n for this digest
        assert_eq!(m, expected);
    }

    #[test]
    fn zero_representative_is_rejected() {
        let toy = CurveParams::from_json(
            r#"{"name":"toy","prime":"1f","a":"1","b":"1c",
                "generator":{"x":"0","y":"b"},"order":"17"}"#,
        )
        .unwrap();
        let ctx = CurveContext::<1>::from_params(&toy).unwrap();
        // 0xba >> 3 = 23 = n
        let digest = MessageHasher::digest(HashAlg::Sha256, b"abc");
        assert_eq!(
            message_representative(&digest, &ctx).unwrap_err(),
            NrError::MessageOutOfRange
        );
        assert_eq!(
            message_representative(&[0x40], &ctx).unwrap(),
            BigNum::from_u64(8)
        );
    }
}
