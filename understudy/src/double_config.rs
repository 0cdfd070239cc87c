use crate::Config;

/// Per-double options.
///
/// Created by [`Session::double`](crate::Session::double) from the session's
/// [`Config`], or customized via [`DoubleBuilder`](crate::DoubleBuilder).
///
/// - `spy`: calls no stub matches are forwarded to the template's
///   implementation of the member, if it has one. Without it, they return
///   [`Value::Undefined`](crate::Value::Undefined) and the template is
///   never invoked.
/// - `deep`: object members of the template become doubles themselves,
///   reachable through [`Double::nested`](crate::Double::nested). Those
///   are deep too but never spies, whatever `spy` says.
///
/// # Examples
///
/// ```rust
/// use understudy::{Config, DoubleConfig};
///
/// let config = DoubleConfig::new(&Config::default()).with_spy(true);
///
/// assert!(config.spy());
/// assert!(!config.deep());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DoubleConfig {
    spy: bool,
    deep: bool,
}

impl DoubleConfig {
    /// Create a new config inheriting defaults from the session [`Config`].
    pub fn new(session_config: &Config) -> Self {
        Self {
            spy: session_config.default_spy(),
            deep: session_config.default_deep(),
        }
    }

    pub fn with_spy(mut self, spy: bool) -> Self {
        self.spy = spy;
        self
    }

    pub fn spy(&self) -> bool {
        self.spy
    }

    pub fn with_deep(mut self, deep: bool) -> Self {
        self.deep = deep;
        self
    }

    pub fn deep(&self) -> bool {
        self.deep
    }
}

impl Default for DoubleConfig {
    fn default() -> Self {
        DoubleConfig::new(&Config::default())
    }
}

impl From<&Config> for DoubleConfig {
    fn from(config: &Config) -> Self {
        DoubleConfig::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inherits_session_defaults() {
        let session = Config::default().with_default_deep(true);
        let config = DoubleConfig::new(&session);
        assert!(config.deep());
        assert!(!config.spy());
    }

    #[test]
    fn overrides_are_independent() {
        let config = DoubleConfig::default().with_spy(true).with_deep(true).with_spy(false);
        assert!(!config.spy());
        assert!(config.deep());
    }
}
