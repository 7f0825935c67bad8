/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;

    /// Trimmed name used for ordering; blank names sort as the empty string.
    fn sort_name(&self) -> &str {
        self.name().trim()
    }
}
