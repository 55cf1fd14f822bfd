/// A value a [`Store`](crate::Store) can hold.
///
/// `Partial` is the update type accepted by `set`: every top-level field is
/// optional, and [`merge`](State::merge) overwrites exactly the fields that
/// are present. Nested values are replaced wholesale, never merged.
///
/// Most states are declared with the [`state!`](crate::state) macro, which
/// generates the partial type and this impl. Implementing it by hand is fine
/// as long as `merge` stays shallow.
pub trait State: Clone + Send + Sync + 'static {
    type Partial: Default + Send + 'static;

    /// Overwrite the fields present in `partial`, keep the rest.
    fn merge(&mut self, partial: Self::Partial);
}

/// Declare a state struct together with its partial update type.
///
/// The partial type has one `Option` per field, derives `Clone` and
/// `Default`, and gets a builder-style setter named after each field.
///
/// # Examples
///
/// ```
/// use cachet::{state, State};
///
/// state! {
///     #[derive(Clone, Debug, PartialEq)]
///     pub struct Counter / CounterPatch {
///         pub count: i32,
///         pub label: String,
///     }
/// }
///
/// let mut counter = Counter { count: 1, label: "clicks".to_string() };
/// counter.merge(CounterPatch::default().count(2));
///
/// assert_eq!(counter, Counter { count: 2, label: "clicks".to_string() });
/// ```
#[macro_export]
macro_rules! state {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident / $partial:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        #[doc = concat!(
            "Partial update for [`", stringify!($name), "`]; absent fields keep their value."
        )]
        #[derive(Clone, Default)]
        $vis struct $partial {
            $( $field_vis $field: ::core::option::Option<$ty>, )*
        }

        #[allow(dead_code)]
        impl $partial {
            $(
                #[must_use]
                $field_vis fn $field(mut self, value: $ty) -> Self {
                    self.$field = ::core::option::Option::Some(value);
                    self
                }
            )*
        }

        impl $crate::State for $name {
            type Partial = $partial;

            fn merge(&mut self, partial: Self::Partial) {
                $(
                    if let ::core::option::Option::Some(value) = partial.$field {
                        self.$field = value;
                    }
                )*
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::State;

    crate::state! {
        #[derive(Clone, Debug, PartialEq)]
        struct Pair / PairPatch {
            a: i32,
            b: Vec<i32>,
        }
    }

    #[test]
    fn merge_replaces_only_present_fields() {
        let mut pair = Pair { a: 1, b: vec![2] };

        pair.merge(PairPatch::default().b(vec![3, 4]));
        assert_eq!(pair, Pair { a: 1, b: vec![3, 4] });

        pair.merge(PairPatch::default());
        assert_eq!(pair, Pair { a: 1, b: vec![3, 4] });
    }

    #[test]
    fn nested_values_are_replaced_not_merged() {
        let mut pair = Pair { a: 1, b: vec![1, 2, 3] };
        pair.merge(PairPatch::default().a(5).b(vec![9]));
        assert_eq!(pair, Pair { a: 5, b: vec![9] });
    }
}
