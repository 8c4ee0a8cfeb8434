//! Error macros for treesum

/// Macro for creating invalid value errors
#[macro_export]
macro_rules! bail_invalid {
    ($context:expr, $value:expr) => {
        return Err($crate::error::TreesumError::invalid_value($context, $value))
    };
}

/// Macro for creating usage errors
#[macro_export]
macro_rules! bail_usage {
    ($msg:expr) => {
        return Err($crate::error::TreesumError::UsageError($msg.to_string()))
    };
}

/// Macro for creating missing configuration errors
#[macro_export]
macro_rules! bail_missing_config {
    ($field:expr, $env_var:expr) => {
        return Err($crate::error::TreesumError::missing_config(
            $field, $env_var,
        ))
    };
}
