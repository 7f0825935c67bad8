//! Locale-aware string comparison policies used for ordering names.

use std::cmp::Ordering;
use std::fmt;

use icu_collator::{CollatorOptions, Strength};
use icu_locid::Locale;

use crate::errors::{ReportError, ReportResult};

/// Compares two display strings for human-friendly ordering.
pub trait Collator {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

impl<F> Collator for F
where
    F: Fn(&str, &str) -> Ordering,
{
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self(a, b)
    }
}

/// Primary-strength collation for one locale: case and accents are ignored,
/// letters follow the locale's alphabet.
///
/// Strings that differ only below primary strength compare `Equal`, so a
/// stable sort keeps their input order.
pub struct PrimaryCollator {
    locale: Locale,
    inner: icu_collator::Collator,
}

impl PrimaryCollator {
    /// Collator for a BCP 47 tag such as `uk-UA`; `und` selects the root order.
    pub fn for_locale(tag: &str) -> ReportResult<Self> {
        let locale: Locale = tag
            .trim()
            .parse()
            .map_err(|err| ReportError::Config(format!("invalid locale `{tag}`: {err}")))?;
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Primary);
        let inner = icu_collator::Collator::try_new(&(&locale).into(), options).map_err(|err| {
            ReportError::Config(format!("no collation data for locale `{locale}`: {err}"))
        })?;
        Ok(Self { locale, inner })
    }

    pub fn locale(&self) -> String {
        self.locale.to_string()
    }
}

impl fmt::Debug for PrimaryCollator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimaryCollator")
            .field("locale", &self.locale.to_string())
            .finish()
    }
}

impl Collator for PrimaryCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self.inner.compare(a, b)
    }
}

/// Returns the comparison policy for a locale tag such as `en-US`.
pub fn collator_for_locale(tag: &str) -> ReportResult<Box<dyn Collator>> {
    let collator = PrimaryCollator::for_locale(tag)?;
    tracing::debug!(locale = %collator.locale(), "resolved primary collator");
    Ok(Box::new(collator))
}
