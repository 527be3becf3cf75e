use miette::Result;

/// A settings table as deserialized from TOML, which still needs to be
/// validated (and have its paths created or filled in) before use.
pub trait ResolvableConfiguration {
    type Resolved;

    /// Validates the table and turns it into its `Resolved` form.
    fn resolve(self) -> Result<Self::Resolved>;
}


/// Like [`ResolvableConfiguration`], for tables that depend on
/// an already resolved table (e.g. on the base data directory).
pub trait ResolvableConfigurationWithContext {
    type Context;
    type Resolved;

    /// Validates the table against `context` and turns it into its `Resolved` form.
    fn resolve(self, context: Self::Context) -> Result<Self::Resolved>;
}
