//! `define_port_error!` builds a port's error enum.
//!
//! Every variant carries named fields and a `thiserror` message. Each variant
//! also gets a snake_case constructor taking `impl Into<_>` per field, so
//! adapters write `ScanHistoryRepositoryError::query(err.to_string())`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),+ $(,)? } => $message:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field: $ty),+ },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                        Self::$variant { $($field: $field.into()),+ }
                    }
                }
            )+
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        /// Gateway-shaped error used to exercise the generated constructors.
        pub enum LabelStoreError {
            Unreachable { message: String } => "label store unreachable: {message}",
            Rejected { status: u16, message: String } => "label store returned {status}: {message}",
            UnknownCatalogEntry { kind: String } => "unknown {kind} id in selection",
        }
    }

    #[rstest]
    #[case(LabelStoreError::unreachable("timed out"), "label store unreachable: timed out")]
    #[case(LabelStoreError::rejected(502_u16, "bad gateway"), "label store returned 502: bad gateway")]
    #[case(LabelStoreError::unknown_catalog_entry("disease"), "unknown disease id in selection")]
    fn constructors_render_their_message(#[case] error: LabelStoreError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn constructors_convert_each_field() {
        assert_eq!(
            LabelStoreError::rejected(404_u16, String::from("missing")),
            LabelStoreError::Rejected {
                status: 404,
                message: "missing".to_owned(),
            }
        );
    }
}
