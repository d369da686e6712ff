//! Helper macro for declaring port error enums.
//!
//! Each generated enum derives `thiserror::Error`, gains a snake-case
//! constructor per variant, and converts into a
//! [`RemoteFailure`](crate::domain::ErrorCode::RemoteFailure) domain error
//! tagged with the port name.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident for $port:literal {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }

        impl From<$name> for $crate::domain::Error {
            fn from(value: $name) -> Self {
                $crate::domain::Error::remote(format!("{}: {}", $port, value))
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use crate::domain::{Error, ErrorCode};

    define_port_error! {
        pub enum SamplePortError for "sample store" {
            Offline => "sample store is offline",
            Rejected { message: String } => "rejected: {message}",
            Throttled { message: String, retry_after_secs: u32 } => "{message} (retry in {retry_after_secs}s)",
        }
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(SamplePortError::offline(), SamplePortError::Offline);
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SamplePortError::rejected("quota");
        assert_eq!(err.to_string(), "rejected: quota");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = SamplePortError::throttled("slow down", 30_u32);
        assert_eq!(err.to_string(), "slow down (retry in 30s)");
    }

    #[test]
    fn converts_into_remote_failure_naming_the_port() {
        let err: Error = SamplePortError::rejected("quota").into();
        assert_eq!(err.code(), ErrorCode::RemoteFailure);
        assert_eq!(err.message(), "sample store: rejected: quota");
    }
}
