use crate::{Double, DoubleConfig, Result, Session, Template};

/// Builder for a double with custom options.
///
/// Returned by [`Session::build_double`]. Use this when a single double
/// needs different `spy`/`deep` settings than the session defaults.
///
/// Defaults are inherited from the session's [`Config`](crate::Config).
///
/// # Examples
///
/// ```rust,ignore
/// // Spy on a real implementation
/// let spy = session.build_double(template).spy(true).build()?;
///
/// // Replace the entire double config
/// let deep = session.build_double(template)
///     .config(DoubleConfig::default().with_deep(true))
///     .build()?;
/// ```
///
/// [`Session::build_double`]: crate::Session::build_double
pub struct DoubleBuilder<'a> {
    session: &'a Session,
    template: Template,
    config: DoubleConfig,
}

impl<'a> DoubleBuilder<'a> {
    pub(crate) fn new(session: &'a Session, template: Template) -> Self {
        let config = DoubleConfig::new(session.config());
        Self {
            session,
            template,
            config,
        }
    }

    /// Forward unmatched calls to the template's implementations.
    ///
    /// Shorthand for [`DoubleConfig::with_spy`].
    pub fn spy(mut self, spy: bool) -> Self {
        self.config = self.config.with_spy(spy);
        self
    }

    /// Wrap nested object members as doubles.
    ///
    /// Shorthand for [`DoubleConfig::with_deep`].
    pub fn deep(mut self, deep: bool) -> Self {
        self.config = self.config.with_deep(deep);
        self
    }

    /// Replace the entire [`DoubleConfig`] for this double.
    pub fn config<C>(mut self, config: C) -> Self
    where
        C: Into<DoubleConfig>,
    {
        self.config = config.into();
        self
    }

    /// Transform the current [`DoubleConfig`] with a closure.
    ///
    /// Unlike [`config()`](Self::config) which replaces the entire config,
    /// this preserves inherited defaults.
    pub fn with_config<F>(mut self, f: F) -> Self
    where
        F: FnOnce(DoubleConfig) -> DoubleConfig,
    {
        self.config = f(self.config);
        self
    }

    /// Build the double.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateMember`](crate::Error::DuplicateMember) if
    /// the template declares a member twice.
    pub fn build(self) -> Result<Double> {
        Double::build(self.session, self.template, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Value, args};

    fn template() -> Template {
        Template::new("obj").method_with("greeting", |_, _| Value::from("real"))
    }

    #[test]
    fn inherits_session_defaults() {
        let session = Session::new(Config::default().with_default_spy(true));
        let obj = session.build_double(template()).build().unwrap();
        assert_eq!(obj.call("greeting", args![]).unwrap(), Value::from("real"));
    }

    #[test]
    fn overrides_session_defaults() {
        let session = Session::new(Config::default().with_default_spy(true));
        let obj = session.build_double(template()).spy(false).build().unwrap();
        assert!(obj.call("greeting", args![]).unwrap().is_undefined());
    }

    #[test]
    fn with_config_keeps_inherited_fields() {
        let session = Session::new(Config::default().with_default_deep(true));
        let builder = session.build_double(template()).with_config(|c| c.with_spy(true));
        assert!(builder.config.spy());
        assert!(builder.config.deep());
    }
}
