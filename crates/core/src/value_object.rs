//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. An
/// [`Email`](crate::Email) is a value object; a [`Customer`](crate::Customer)
/// is an entity.
///
/// ```
/// use banking_core::{Email, ValueObject};
///
/// fn assert_value_object<T: ValueObject>() {}
/// assert_value_object::<Email>();
///
/// let a = Email::parse("ada@example.com").unwrap();
/// let b = Email::parse("ada@example.com").unwrap();
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
