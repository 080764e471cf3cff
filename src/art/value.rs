//! The opaque 8-byte value payload and its numeric views.
//!
//! The reference implementation stores values as a C `union` over a raw
//! pointer, `u64`, `i64`, or a pair of 32-bit halves, all reinterpreting
//! the same 8 bytes. Rust has no safe union-of-arbitrary-types, so `Value`
//! is a plain `[u8; 8]` newtype with explicit to/from conversions for each
//! view instead of a transmute.

/// An opaque 8-byte value, reinterpretable as any of the numeric views
/// used by [`crate::Tree::insert_increment`] / [`crate::Tree::delete_decrement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Value(pub(crate) [u8; 8]);

const _: () = assert!(std::mem::size_of::<Value>() == 8);

impl Value {
    /// The zero value, used as the starting point for increment operations.
    pub const ZERO: Value = Value([0; 8]);

    pub fn from_u64(v: u64) -> Self {
        Value(v.to_ne_bytes())
    }

    pub fn as_u64(self) -> u64 {
        u64::from_ne_bytes(self.0)
    }

    pub fn from_i64(v: i64) -> Self {
        Value(v.to_ne_bytes())
    }

    pub fn as_i64(self) -> i64 {
        i64::from_ne_bytes(self.0)
    }

    /// Pack a pair of unsigned halves, `a` in the low 4 bytes and `b` in
    /// the high 4 bytes (native endianness, matching the C union layout).
    pub fn from_halves_u32(a: u32, b: u32) -> Self {
        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(&a.to_ne_bytes());
        bytes[4..].copy_from_slice(&b.to_ne_bytes());
        Value(bytes)
    }

    pub fn as_halves_u32(self) -> (u32, u32) {
        let a = u32::from_ne_bytes(self.0[..4].try_into().unwrap());
        let b = u32::from_ne_bytes(self.0[4..].try_into().unwrap());
        (a, b)
    }

    pub fn from_halves_i32(a: i32, b: i32) -> Self {
        Self::from_halves_u32(a as u32, b as u32)
    }

    pub fn as_halves_i32(self) -> (i32, i32) {
        let (a, b) = self.as_halves_u32();
        (a as i32, b as i32)
    }

    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self::from_u64(ptr as u64)
    }

    pub fn as_ptr<T>(self) -> *const T {
        self.as_u64() as *const T
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::from_u64(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::from_i64(v)
    }
}

/// Which numeric view an increment/decrement operation addresses.
///
/// `REPLACE` from the reference C `artIncrementDesc` is deliberately not a
/// variant here: the original asserts if it ever reaches the public
/// increment entry points, and this port makes that state unrepresentable
/// instead of asserting against it at runtime (see [`Desc`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementDesc {
    /// Treat the value as a single `u64` counter.
    WholeU64,
    /// Treat the value as the low 32-bit half of a pair.
    AHalf,
    /// Treat the value as the high 32-bit half of a pair.
    BHalf,
}

/// Internal four-way descriptor shared by the plain (`Replace`) and
/// incrementing insert/delete code paths, mirroring the original
/// `artIncrementDesc`. Never exposed publicly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Desc {
    Replace,
    WholeU64,
    AHalf,
    BHalf,
}

impl From<IncrementDesc> for Desc {
    fn from(d: IncrementDesc) -> Self {
        match d {
            IncrementDesc::WholeU64 => Desc::WholeU64,
            IncrementDesc::AHalf => Desc::AHalf,
            IncrementDesc::BHalf => Desc::BHalf,
        }
    }
}

/// Apply one step of increment to `existing` per `desc`. Panics on
/// `Desc::Replace`, which a correctly-wired caller never passes here (see
/// the module doc on [`Desc`]).
pub(crate) fn increment(desc: Desc, existing: Value) -> Value {
    match desc {
        Desc::Replace => unreachable!("Desc::Replace must never reach increment()"),
        Desc::WholeU64 => Value::from_u64(existing.as_u64().wrapping_add(1)),
        Desc::AHalf => {
            let (a, b) = existing.as_halves_u32();
            Value::from_halves_u32(a.wrapping_add(1), b)
        }
        Desc::BHalf => {
            let (a, b) = existing.as_halves_u32();
            Value::from_halves_u32(a, b.wrapping_add(1))
        }
    }
}

/// The initial value for a counter that didn't exist yet: 1 in the
/// selected view, 0 elsewhere.
pub(crate) fn initial(desc: Desc) -> Value {
    match desc {
        Desc::Replace => unreachable!("Desc::Replace must never reach initial()"),
        Desc::WholeU64 => Value::from_u64(1),
        Desc::AHalf => Value::from_halves_u32(1, 0),
        Desc::BHalf => Value::from_halves_u32(0, 1),
    }
}

/// Apply one step of decrement to `existing` per `desc`, returning the new
/// value and whether the relevant counter has reached zero (at which point
/// the caller should actually remove the leaf, per `delete_decrement`'s
/// contract).
pub(crate) fn decrement(desc: Desc, existing: Value) -> (Value, bool) {
    match desc {
        Desc::Replace => unreachable!("Desc::Replace must never reach decrement()"),
        Desc::WholeU64 => {
            let v = existing.as_u64().wrapping_sub(1);
            (Value::from_u64(v), v == 0)
        }
        Desc::AHalf => {
            let (a, b) = existing.as_halves_u32();
            let a = a.wrapping_sub(1);
            (Value::from_halves_u32(a, b), a == 0)
        }
        Desc::BHalf => {
            let (a, b) = existing.as_halves_u32();
            let b = b.wrapping_sub(1);
            (Value::from_halves_u32(a, b), b == 0)
        }
    }
}
