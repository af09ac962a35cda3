use crate::context;
use crate::error::{Error, Result};
use crate::format::Format;
use crate::keys_management::PrivateKey;
use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::point::AffineCoordinates;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{AffinePoint, ProjectivePoint};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::ops::{Add, Neg, Sub};

/// A point on secp256k1 other than the point at infinity.
///
/// Two keys are equal iff their uncompressed encodings are byte-identical,
/// whichever format they were imported from.
#[derive(Serialize, Deserialize, Clone, Copy)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct PublicKey {
    point: AffinePoint,
}

impl PublicKey {
    /// Lengths of the tag-stripped `X || Y` representation.
    pub const RAW_LENGTH: usize = 64;

    /// The generator point `G`.
    pub fn generator() -> PublicKey {
        context::generator()
    }

    /// Wraps an affine point already known not to be the identity.
    pub(crate) fn from_affine(point: AffinePoint) -> PublicKey {
        PublicKey { point }
    }

    fn from_projective(point: ProjectivePoint) -> Result<PublicKey> {
        if bool::from(point.is_identity()) {
            tracing::debug!("Group operation produced the point at infinity");
            return Err(Error::GroupOperationFailed);
        }
        Ok(PublicKey {
            point: point.to_affine(),
        })
    }

    pub(crate) fn to_projective(self) -> ProjectivePoint {
        ProjectivePoint::from(self.point)
    }

    /// Imports an encoded public key.
    ///
    /// When `declared` is `None` the format is inferred from the length:
    /// 32 bytes are x-only, 33 compressed and 65 uncompressed. X-only keys
    /// are lifted to the point with an even Y coordinate.
    #[tracing::instrument(name = "Importing secp256k1 public key", skip(bytes), fields(len = bytes.len()))]
    pub fn import(bytes: &[u8], declared: Option<Format>) -> Result<PublicKey> {
        let format = match declared {
            Some(format) if format.length() == bytes.len() => format,
            Some(format) => {
                return Err(Error::IncorrectByteCountOfPublicKey {
                    got: bytes.len(),
                    acceptable: vec![format.length()],
                })
            }
            None => Format::from_length(bytes.len()).ok_or_else(|| {
                Error::IncorrectByteCountOfPublicKey {
                    got: bytes.len(),
                    acceptable: Format::acceptable_lengths(),
                }
            })?,
        };

        // SEC1 also defines the compact (0x05) and hybrid (0x06, 0x07) tags,
        // which are not valid encodings here.
        if let (Some(even_tag), Some(odd_tag)) = (format.tag(false), format.tag(true)) {
            if bytes[0] != even_tag && bytes[0] != odd_tag {
                tracing::debug!(?format, tag = bytes[0], "Rejected unexpected SEC1 tag");
                return Err(Error::InvalidPoint);
            }
        }

        let sec1_key = match format {
            Format::XOnly => {
                let mut compressed = [0u8; 33];
                compressed[0] = 0x02;
                compressed[1..].copy_from_slice(bytes);
                k256::PublicKey::from_sec1_bytes(&compressed)
            }
            Format::Compressed | Format::Uncompressed => k256::PublicKey::from_sec1_bytes(bytes),
        }
        .map_err(|_| {
            tracing::debug!(?format, "Rejected bytes that are not a curve point");
            Error::InvalidPoint
        })?;

        Ok(PublicKey::from_affine(*sec1_key.as_affine()))
    }

    /// Imports the tag-stripped 64-byte `X || Y` form.
    pub fn from_raw_representation(bytes: &[u8]) -> Result<PublicKey> {
        if bytes.len() != Self::RAW_LENGTH {
            return Err(Error::IncorrectByteCountOfPublicKey {
                got: bytes.len(),
                acceptable: vec![Self::RAW_LENGTH],
            });
        }
        let mut uncompressed = [0u8; 65];
        uncompressed[0] = 0x04;
        uncompressed[1..].copy_from_slice(bytes);
        PublicKey::import(&uncompressed, Some(Format::Uncompressed))
    }

    pub fn serialize(&self, format: Format) -> Vec<u8> {
        match format {
            Format::Compressed => self.point.to_encoded_point(true).as_bytes().to_vec(),
            Format::Uncompressed => self.uncompressed().to_vec(),
            Format::XOnly => self.point.x().to_vec(),
        }
    }

    /// The canonical `0x04 || X || Y` encoding.
    pub fn uncompressed(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes.copy_from_slice(self.point.to_encoded_point(false).as_bytes());
        bytes
    }

    /// `X || Y` without the SEC1 tag.
    pub fn raw_representation(&self) -> [u8; 64] {
        let mut raw = [0u8; 64];
        raw.copy_from_slice(&self.uncompressed()[1..]);
        raw
    }

    pub fn x_only(&self) -> [u8; 32] {
        self.point.x().into()
    }

    pub fn has_even_y(&self) -> bool {
        !bool::from(self.point.y_is_odd())
    }

    /// Point addition. Fails when `other` is the negation of `self`.
    pub fn add(&self, other: &PublicKey) -> Result<PublicKey> {
        PublicKey::from_projective(self.to_projective() + other.to_projective())
    }

    pub fn negate(&self) -> PublicKey {
        PublicKey::from_affine((-self.to_projective()).to_affine())
    }

    /// `self + (-other)`; `p.subtract(&p)` always fails.
    pub fn subtract(&self, other: &PublicKey) -> Result<PublicKey> {
        self.add(&other.negate())
    }

    /// Multiplies this point by a non-zero scalar below the curve order,
    /// which never yields the identity in a prime-order group.
    pub fn scalar_multiply(&self, scalar: &PrivateKey) -> PublicKey {
        let product = self.to_projective() * scalar.as_scalar();
        PublicKey::from_affine(product.to_affine())
    }

    /// Left-to-right sum of `keys`.
    ///
    /// Fails with [`Error::InvalidParameter`] on an empty slice and with
    /// [`Error::GroupOperationFailed`] if any partial sum is the identity.
    #[tracing::instrument(name = "Summing secp256k1 public keys", skip(keys), fields(count = keys.len()))]
    pub fn sum(keys: &[PublicKey]) -> Result<PublicKey> {
        let (first, rest) = keys
            .split_first()
            .ok_or(Error::InvalidParameter("cannot sum an empty list of public keys"))?;
        rest.iter().try_fold(*first, |acc, key| acc.add(key))
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.uncompressed() == other.uncompressed()
    }
}

impl Eq for PublicKey {}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uncompressed().hash(state);
    }
}

use std::fmt;
impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.serialize(Format::Compressed)))
    }
}

impl Add<&PublicKey> for &PublicKey {
    type Output = Result<PublicKey>;

    fn add(self, other: &PublicKey) -> Result<PublicKey> {
        PublicKey::add(self, other)
    }
}

impl Sub<&PublicKey> for &PublicKey {
    type Output = Result<PublicKey>;

    fn sub(self, other: &PublicKey) -> Result<PublicKey> {
        self.subtract(other)
    }
}

impl Neg for PublicKey {
    type Output = PublicKey;

    fn neg(self) -> PublicKey {
        self.negate()
    }
}

impl TryFrom<Vec<u8>> for PublicKey {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<PublicKey> {
        PublicKey::import(&bytes, None)
    }
}

impl From<PublicKey> for Vec<u8> {
    fn from(public_key: PublicKey) -> Vec<u8> {
        public_key.serialize(Format::Compressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::multiple_of_generator;
    use hex_literal::hex;

    const G_X: [u8; 32] = hex!("79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798");
    const G_Y: [u8; 32] = hex!("483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8");
    const TWO_G: [u8; 65] = hex!(
        "04"
        "C6047F9441ED7D6D3045406E95C07CD85C778E4B8CEF3CA7ABAC09B95C709EE5"
        "1AE168FEA63DC339A3C58419466CEAEEF7F632653266D0E1236431A950CFE52A"
    );

    fn g(k: u8) -> PublicKey {
        multiple_of_generator(k).unwrap()
    }

    fn scalar(k: u64) -> PrivateKey {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&k.to_be_bytes());
        PrivateKey::import(&bytes).unwrap()
    }

    #[test]
    fn generator_point_coordinates() {
        let raw = PublicKey::generator().raw_representation();
        assert_eq!(raw[..32], G_X);
        assert_eq!(raw[32..], G_Y);
    }

    #[test]
    fn two_times_generator_matches_constant() {
        let expected = PublicKey::import(&TWO_G, None).unwrap();
        assert_eq!(PublicKey::generator().scalar_multiply(&scalar(2)), expected);
        assert_eq!(scalar(2).public_key(), expected);
    }

    #[test]
    fn scalar_multiples_are_consistent() {
        for k in 1..=6u8 {
            assert_eq!(g(k), scalar(k as u64).public_key());
        }
    }

    #[test]
    fn basic_addition() {
        let sum = (&g(2) + &g(3)).unwrap();
        assert_eq!(sum.serialize(Format::Compressed).len(), 33);
        assert_ne!(sum, g(2));
        assert_ne!(sum, g(3));
        assert_eq!(sum, g(5));
    }

    #[test]
    fn doubling_by_addition() {
        assert_eq!((&g(1) + &g(1)).unwrap(), g(2));
    }

    #[test]
    fn negation_is_an_involution() {
        let negated = g(2).negate();
        assert_ne!(negated, g(2));
        assert_eq!(negated.negate(), g(2));
        assert_eq!(-(-g(4)), g(4));
    }

    #[test]
    fn subtraction() {
        assert_eq!((&g(5) - &g(3)).unwrap(), g(2));
        assert_eq!((&g(3) - &g(2)).unwrap(), PublicKey::generator());
        assert_eq!(&g(2) - &g(2), Err(Error::GroupOperationFailed));
    }

    #[test]
    fn adding_the_negation_fails() {
        assert_eq!(g(2).add(&g(2).negate()), Err(Error::GroupOperationFailed));
    }

    #[test]
    fn sum_of_keys() {
        assert_eq!(PublicKey::sum(&[g(1), g(2), g(3)]).unwrap(), g(6));
        assert_eq!(PublicKey::sum(&[g(3)]).unwrap(), g(3));
        assert_eq!(PublicKey::sum(&[g(2), g(3)]).unwrap(), (&g(2) + &g(3)).unwrap());
        assert!(matches!(
            PublicKey::sum(&[]),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn sum_propagates_intermediate_infinity() {
        let keys = [g(1), g(1).negate(), g(1)];
        assert_eq!(PublicKey::sum(&keys), Err(Error::GroupOperationFailed));
    }

    #[test]
    fn round_trips_through_every_format() {
        let key = g(3);
        for format in [Format::Compressed, Format::Uncompressed] {
            let bytes = key.serialize(format);
            assert_eq!(bytes.len(), format.length());
            assert_eq!(PublicKey::import(&bytes, Some(format)).unwrap(), key);
            assert_eq!(PublicKey::import(&bytes, None).unwrap(), key);
        }
        let x_only = key.serialize(Format::XOnly);
        let imported = PublicKey::import(&x_only, None).unwrap();
        assert_eq!(imported.x_only(), key.x_only());
        assert!(imported.has_even_y());
    }

    #[test]
    fn x_only_import_loses_parity() {
        // 6G has an odd Y coordinate.
        let key = g(6);
        assert!(!key.has_even_y());
        let imported = PublicKey::import(&key.serialize(Format::XOnly), None).unwrap();
        assert_eq!(imported, key.negate());
    }

    #[test]
    fn raw_representation_round_trip() {
        let raw = g(4).raw_representation();
        assert_eq!(PublicKey::from_raw_representation(&raw).unwrap(), g(4));
        assert_eq!(
            PublicKey::from_raw_representation(&raw[1..]),
            Err(Error::IncorrectByteCountOfPublicKey {
                got: 63,
                acceptable: vec![64],
            })
        );
    }

    #[test]
    fn rejects_unsupported_lengths() {
        assert_eq!(
            PublicKey::import(&[0x02; 34], None),
            Err(Error::IncorrectByteCountOfPublicKey {
                got: 34,
                acceptable: vec![32, 33, 65],
            })
        );
        assert_eq!(
            PublicKey::import(&g(2).serialize(Format::Compressed), Some(Format::Uncompressed)),
            Err(Error::IncorrectByteCountOfPublicKey {
                got: 33,
                acceptable: vec![65],
            })
        );
    }

    #[test]
    fn rejects_points_off_the_curve() {
        let mut uncompressed = g(2).uncompressed();
        uncompressed[64] ^= 0x01;
        assert_eq!(PublicKey::import(&uncompressed, None), Err(Error::InvalidPoint));

        let mut compressed = g(2).serialize(Format::Compressed);
        compressed[0] = 0x05;
        assert_eq!(PublicKey::import(&compressed, None), Err(Error::InvalidPoint));

        // X = p is not a field element.
        let x = hex!("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F");
        assert_eq!(PublicKey::import(&x, None), Err(Error::InvalidPoint));
    }

    #[test]
    fn rejects_tags_outside_the_declared_format() {
        for tag in [0x00, 0x04, 0x05, 0x06, 0x07] {
            let mut compressed = g(2).serialize(Format::Compressed);
            compressed[0] = tag;
            assert_eq!(
                PublicKey::import(&compressed, Some(Format::Compressed)),
                Err(Error::InvalidPoint)
            );
            assert_eq!(PublicKey::import(&compressed, None), Err(Error::InvalidPoint));
            assert!(PublicKey::try_from(compressed).is_err());
        }
        for tag in [0x02, 0x03, 0x05, 0x06, 0x07] {
            let mut uncompressed = g(2).uncompressed();
            uncompressed[0] = tag;
            assert_eq!(
                PublicKey::import(&uncompressed, Some(Format::Uncompressed)),
                Err(Error::InvalidPoint)
            );
            assert_eq!(PublicKey::import(&uncompressed, None), Err(Error::InvalidPoint));
        }
        // The odd-Y tag is fine for a point whose Y is odd.
        assert!(PublicKey::import(&g(6).serialize(Format::Compressed), Some(Format::Compressed)).is_ok());
    }

    #[test]
    fn equality_ignores_import_format() {
        let from_compressed = PublicKey::import(&g(5).serialize(Format::Compressed), None).unwrap();
        let from_uncompressed = PublicKey::import(&g(5).uncompressed(), None).unwrap();
        assert_eq!(from_compressed, from_uncompressed);
    }

    #[test]
    fn serde_uses_compressed_bytes() {
        let json = serde_json::to_string(&g(2)).unwrap();
        let decoded: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, g(2));
        assert!(serde_json::from_str::<PublicKey>("[1,2,3]").is_err());
    }

    #[test]
    fn debug_prints_compressed_hex() {
        assert_eq!(
            format!("{:?}", g(6)),
            "PublicKey(03fff97bd5755eeea420453a14355235d382f6472f8568a18b2f057a1460297556)"
        );
    }
}
