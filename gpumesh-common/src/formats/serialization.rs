//! Binary serialization trait for format headers.

/// Trait for binary-serializable format headers.
///
/// The trait uses `Vec<u8>` for the return type because associated const
/// generics in return types (`[u8; Self::SIZE]`) are not yet stable in Rust.
/// For a fixed-size array, use the type-specific `to_bytes()` method.
///
/// # Example
///
/// ```
/// use gpumesh_common::formats::{BinarySerializable, GpuMeshHeader};
///
/// let header = GpuMeshHeader::new(4, 6);
///
/// // Using the trait (returns Vec<u8>)
/// let bytes = header.serialize();
/// let parsed = GpuMeshHeader::deserialize(&bytes).unwrap();
/// assert_eq!(parsed, header);
///
/// // Using the type-specific method (returns [u8; 8])
/// let bytes_array = header.to_bytes();
/// assert_eq!(bytes_array.as_slice(), bytes.as_slice());
/// ```
pub trait BinarySerializable: Sized {
    /// Size of the serialized header in bytes.
    const SIZE: usize;

    /// Serialize to bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Deserialize from bytes.
    ///
    /// Returns `None` if the byte slice is too short or contains invalid data.
    fn deserialize(bytes: &[u8]) -> Option<Self>;
}

impl BinarySerializable for super::GpuMeshHeader {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}
