use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::collation::{collator_for_locale, Collator};
use crate::errors::{ReportError, ReportResult};
use crate::export::xlsx::DEFAULT_HEADER_FILL;

/// Overrides the application directory holding `config.json`.
pub const HOME_ENV_VAR: &str = "BUDGET_REPORTS_HOME";

const APP_DIR_NAME: &str = ".budget_reports";
const CONFIG_FILE_NAME: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub locale: String,
    pub currency: String,
    /// RGB fill behind spreadsheet header cells.
    pub header_fill: u32,
    pub labels: ReportLabels,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            header_fill: DEFAULT_HEADER_FILL,
            labels: ReportLabels::default(),
        }
    }
}

impl ReportConfig {
    /// Name ordering for the configured locale.
    pub fn collator(&self) -> ReportResult<Box<dyn Collator>> {
        collator_for_locale(&self.locale)
    }
}

/// User-visible strings placed into exported reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLabels {
    pub report: String,
    pub period: String,
    pub category: String,
    pub any_category: String,
    pub total: String,
    pub category_expenses_title: String,
    pub category_expenses_sheet: String,
    pub transactions_sheet: String,
    pub date: String,
    pub account: String,
    pub currency: String,
    pub amount: String,
    /// `{currency}` is replaced with the base currency code.
    pub amount_in_base: String,
    pub kind: String,
    pub direction: String,
    pub comment: String,
    pub income: String,
    pub expense: String,
    pub transfer: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            report: "Report".into(),
            period: "Period".into(),
            category: "Category".into(),
            any_category: "Any".into(),
            total: "Total".into(),
            category_expenses_title: "Expenses by category".into(),
            category_expenses_sheet: "Category expenses".into(),
            transactions_sheet: "Transactions".into(),
            date: "Date".into(),
            account: "Account".into(),
            currency: "Currency".into(),
            amount: "Amount".into(),
            amount_in_base: "Amount ({currency})".into(),
            kind: "Type".into(),
            direction: "Direction".into(),
            comment: "Comment".into(),
            income: "Income".into(),
            expense: "Expense".into(),
            transfer: "Transfer".into(),
        }
    }
}

impl ReportLabels {
    pub fn amount_in_base_for(&self, currency: &str) -> String {
        self.amount_in_base.replace("{currency}", currency.trim())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Manager rooted at `$BUDGET_REPORTS_HOME`, else `~/.budget_reports`.
    pub fn new() -> ReportResult<Self> {
        Self::with_base_dir(default_base_dir()?)
    }

    pub fn with_base_dir(base: PathBuf) -> ReportResult<Self> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE_NAME),
        })
    }

    pub fn load(&self) -> ReportResult<ReportConfig> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config = serde_json::from_str(&data)?;
            tracing::debug!(path = %self.path.display(), "loaded report configuration");
            Ok(config)
        } else {
            tracing::debug!(path = %self.path.display(), "no configuration file, using defaults");
            Ok(ReportConfig::default())
        }
    }

    pub fn save(&self, config: &ReportConfig) -> ReportResult<()> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::info!(path = %self.path.display(), "saved report configuration");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn default_base_dir() -> ReportResult<PathBuf> {
    if let Some(home) = env::var_os(HOME_ENV_VAR).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir()
        .map(|home| home.join(APP_DIR_NAME))
        .ok_or_else(|| ReportError::Config("unable to resolve the home directory".into()))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> ReportResult<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
