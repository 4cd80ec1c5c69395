pub trait Inquire<DefaultValue = ()>
where
    Self: Sized,
{
    fn inquire(default: &DefaultValue) -> crate::Result<Self>;

    // If value is None, call `inquire` to get it
    fn unwrap_or_inquire(value: Option<Self>, default: &DefaultValue) -> crate::Result<Self> {
        match value {
            Some(value) => Ok(value),
            None => Self::inquire(default),
        }
    }
}

/// Macro to implement `Inquire` for enums that derive `EnumIter`
#[macro_export]
macro_rules! impl_inquire_selection {
    ($enum_name:ident, $message:expr) => {
        impl $crate::traits::Inquire for $enum_name {
            fn inquire(_: &()) -> $crate::Result<$enum_name> {
                let options: Vec<$enum_name> = <$enum_name as strum::IntoEnumIterator>::iter().collect();

                Ok(inquire::Select::new($message, options)
                    .with_formatter(&|a| format!("{a}"))
                    .prompt()?)
            }
        }
    };
}
