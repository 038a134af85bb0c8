//! Precedence rules for combining cloud and caller configuration.

use crate::core::ConfigObject;

/// Merge a cloud-retrieved configuration into a caller-supplied one.
///
/// The result starts as a copy of `user`. Cloud values apply only when present
/// and non-empty:
///
/// - `user`, `password`, `wallet_content`, `config_ttl`: filled in only when the
///   caller left them unset.
/// - `connect_string`: always taken from the cloud, and the caller's alternate
///   `connection_string` is cleared.
/// - driver tuning options: a cloud value overrides unless it is zero, `false`,
///   empty or `null`.
///
/// # Examples
///
/// ```rust
/// use cloud_config_resolver::core::{merge, ConfigObject};
///
/// let cloud = ConfigObject::new().with_user("a").with_connect_string("cs1");
/// let mut user = ConfigObject::new().with_user("b");
/// user.connection_string = Some("old".to_string());
///
/// let merged = merge(&cloud, &user);
/// assert_eq!(merged.user.as_deref(), Some("b"));
/// assert_eq!(merged.connect_string.as_deref(), Some("cs1"));
/// assert_eq!(merged.connection_string, None);
/// ```
pub fn merge(cloud: &ConfigObject, user: &ConfigObject) -> ConfigObject {
    let mut merged = user.clone();

    fill_if_absent(&mut merged.user, &cloud.user);
    fill_if_absent(&mut merged.password, &cloud.password);
    fill_if_absent(&mut merged.wallet_content, &cloud.wallet_content);

    if merged.config_ttl.is_none() {
        merged.config_ttl = cloud.config_ttl.filter(|ttl| *ttl != 0);
    }

    if let Some(connect_string) = present(&cloud.connect_string) {
        merged.connect_string = Some(connect_string.to_string());
        merged.connection_string = None;
    }

    merged.options.override_with(&cloud.options);
    merged
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn fill_if_absent(target: &mut Option<String>, cloud: &Option<String>) {
    if present(target).is_none() {
        if let Some(value) = present(cloud) {
            *target = Some(value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DriverOptions;

    #[test]
    fn test_user_wins_for_identity_fields() {
        let cloud = ConfigObject::new()
            .with_user("a")
            .with_password("cloud-pw")
            .with_connect_string("cs1");
        let mut user = ConfigObject::new().with_user("b");
        user.connection_string = Some("old".to_string());

        let merged = merge(&cloud, &user);
        assert_eq!(merged.user.as_deref(), Some("b"));
        assert_eq!(merged.password.as_deref(), Some("cloud-pw"));
        assert_eq!(merged.connect_string.as_deref(), Some("cs1"));
        assert_eq!(merged.connection_string, None);
    }

    #[test]
    fn test_cloud_connect_string_overrides() {
        let cloud = ConfigObject::new().with_connect_string("cloud");
        let user = ConfigObject::new().with_connect_string("local");

        let merged = merge(&cloud, &user);
        assert_eq!(merged.connect_string.as_deref(), Some("cloud"));
    }

    #[test]
    fn test_missing_cloud_connect_string_keeps_alternate() {
        let cloud = ConfigObject::new().with_user("a");
        let mut user = ConfigObject::new();
        user.connection_string = Some("old".to_string());

        let merged = merge(&cloud, &user);
        assert_eq!(merged.connection_string.as_deref(), Some("old"));
        assert_eq!(merged.user.as_deref(), Some("a"));
    }

    #[test]
    fn test_empty_cloud_values_ignored() {
        let cloud = ConfigObject::new().with_user("").with_connect_string("");
        let user = ConfigObject::new().with_connect_string("local");

        let merged = merge(&cloud, &user);
        assert_eq!(merged.user, None);
        assert_eq!(merged.connect_string.as_deref(), Some("local"));
    }

    #[test]
    fn test_empty_user_value_is_filled() {
        let cloud = ConfigObject::new().with_password("pw");
        let user = ConfigObject::new().with_password("");

        let merged = merge(&cloud, &user);
        assert_eq!(merged.password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_tuning_fields_cloud_wins() {
        let mut cloud = ConfigObject::new();
        cloud.options = DriverOptions {
            pool_max: Some(20),
            stmt_cache_size: Some(100),
            ..Default::default()
        };
        let mut user = ConfigObject::new();
        user.options = DriverOptions {
            pool_min: Some(1),
            pool_max: Some(4),
            ..Default::default()
        };

        let merged = merge(&cloud, &user);
        assert_eq!(merged.options.pool_min, Some(1));
        assert_eq!(merged.options.pool_max, Some(20));
        assert_eq!(merged.options.stmt_cache_size, Some(100));
    }

    #[test]
    fn test_zero_cloud_option_keeps_user_value() {
        let mut cloud = ConfigObject::new().with_connect_string("cs");
        cloud.options.pool_min = Some(0);
        cloud.config_ttl = Some(0);
        let mut user = ConfigObject::new();
        user.options.pool_min = Some(4);

        let merged = merge(&cloud, &user);
        assert_eq!(merged.options.pool_min, Some(4));
        assert_eq!(merged.config_ttl, None);
    }
}
