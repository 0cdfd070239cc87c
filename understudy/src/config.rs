/// Session-wide defaults for the doubles a [`Session`](crate::Session) builds.
///
/// Individual doubles can override these via
/// [`DoubleBuilder`](crate::DoubleBuilder).
///
/// # Examples
///
/// ```rust
/// use understudy::Config;
///
/// let config = Config::default()
///     .with_default_spy(true)     // unmatched calls reach the real implementation
///     .with_default_deep(true);   // nested objects become doubles too
///
/// assert!(config.default_spy());
/// assert!(config.default_deep());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Whether unmatched calls delegate to the template's implementation.
    /// Default: false
    default_spy: bool,

    /// Whether nested object members are replaced by doubles.
    /// Default: false
    default_deep: bool,
}

impl Config {
    /// Set whether new doubles spy on their template by default.
    pub fn with_default_spy(mut self, spy: bool) -> Self {
        self.default_spy = spy;
        self
    }

    /// Returns whether new doubles spy on their template by default.
    pub fn default_spy(&self) -> bool {
        self.default_spy
    }

    /// Set whether new doubles wrap nested objects by default.
    pub fn with_default_deep(mut self, deep: bool) -> Self {
        self.default_deep = deep;
        self
    }

    /// Returns whether new doubles wrap nested objects by default.
    pub fn default_deep(&self) -> bool {
        self.default_deep
    }
}
