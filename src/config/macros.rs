/// Define a configuration struct with embedded defaults
///
/// Each field is declared with its type and default value in one place. The
/// macro generates the struct with public fields, a `Default` impl using the
/// declared values, and serde support where missing keys take their default.
///
/// # Example
/// ```rust,ignore
/// config_struct! {
///     pub struct CollectorConfig {
///         interval_secs: u64 = 60,
///         pool_delay_ms: u64 = 1000,
///     }
/// }
/// ```
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }
    };
}
