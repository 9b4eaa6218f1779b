//! Serialization helper for floating-point fields of the Geory database.
//!
//! Geory writes whole-number seconds and metres as JSON integers
//! (`1672531200`, not `1672531200.0`). Emitting them the same way keeps a
//! merged file byte-comparable with the export it started from.

use serde::Serializer;

/// Largest magnitude below which every integer is exactly representable in an `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Serializes `value` as an integer when it has no fractional part, otherwise
/// as a float.
///
/// # Errors
///
/// Propagates the serializer's error.
#[allow(clippy::trivially_copy_pass_by_ref, clippy::float_cmp)]
pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        #[allow(clippy::cast_possible_truncation)]
        let whole = *value as i64;
        serializer.serialize_i64(whole)
    } else {
        serializer.serialize_f64(*value)
    }
}
